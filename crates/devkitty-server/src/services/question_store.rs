//! Question store service
//!
//! Uniform CRUD surface over whichever backend was resolved at startup.
//! Two steady states, `Connected` and `Fallback`, with one one-way
//! transition: the first failed live write moves the store to `Fallback`
//! for the rest of the process. Read failures never change the mode.

use crate::storage::{MemoryStore, Resolution};
use devkitty_core::{
    BackendMode, DevKittyError, Question, QuestionBackend, QuestionId, ReportedMode, StoreStatus,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct QuestionStore {
    backend: Option<Arc<dyn QuestionBackend>>,
    degraded: AtomicBool,
    fallback: MemoryStore,
}

impl QuestionStore {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            backend: resolution.backend,
            degraded: AtomicBool::new(false),
            fallback: MemoryStore::new(),
        }
    }

    /// Mode used for dispatch
    pub fn mode(&self) -> BackendMode {
        if self.live().is_some() {
            BackendMode::Connected
        } else {
            BackendMode::Fallback
        }
    }

    /// All records, most recently created first
    pub async fn list(&self) -> Vec<Question> {
        if let Some(backend) = self.live() {
            match backend.list().await {
                Ok(questions) => return questions,
                Err(e) => self.read_failed("list", backend.as_ref(), &e),
            }
        }

        self.fallback.list().await
    }

    pub async fn count(&self) -> u64 {
        if let Some(backend) = self.live() {
            match backend.count().await {
                Ok(count) => return count,
                Err(e) => self.read_failed("count", backend.as_ref(), &e),
            }
        }

        self.fallback.count().await
    }

    /// Create a record. Always succeeds: a failed live write degrades the
    /// store and the record lands in the fallback collection instead.
    pub async fn add(&self, category: &str, content: &str) -> Question {
        let question = Question::new(category, content);

        if let Some(backend) = self.live() {
            match backend.insert(&question).await {
                Ok(()) => {
                    debug!(backend = backend.kind(), "Question added: {}", question.id);
                    return question;
                }
                Err(e) => self.write_failed("add", backend.as_ref(), &e),
            }
        }

        self.fallback.insert(question.clone()).await;
        debug!("Question added to fallback store: {}", question.id);
        question
    }

    /// Replace category and content. An unknown id is a silent no-op.
    pub async fn update(&self, id: &QuestionId, category: &str, content: &str) {
        if let Some(backend) = self.live() {
            match backend.update(id, category, content).await {
                Ok(touched) => {
                    debug!(backend = backend.kind(), "Question {} updated ({} rows)", id, touched);
                    return;
                }
                Err(e) => self.write_failed("update", backend.as_ref(), &e),
            }
        }

        let found = self.fallback.update(id, category, content).await;
        debug!("Question {} updated in fallback store (found={})", id, found);
    }

    /// Remove a record. An unknown id is a silent no-op.
    pub async fn delete(&self, id: &QuestionId) {
        if let Some(backend) = self.live() {
            match backend.delete(id).await {
                Ok(removed) => {
                    debug!(backend = backend.kind(), "Question {} deleted ({} rows)", id, removed);
                    return;
                }
                Err(e) => self.write_failed("delete", backend.as_ref(), &e),
            }
        }

        let found = self.fallback.delete(id).await;
        debug!("Question {} deleted from fallback store (found={})", id, found);
    }

    /// Current mode and count for the health check.
    ///
    /// A failed probe of the live backend reports `error` without touching
    /// the dispatch mode.
    pub async fn status(&self) -> StoreStatus {
        match self.live() {
            Some(backend) => match backend.count().await {
                Ok(count) => StoreStatus::new(ReportedMode::Connected, count),
                Err(e) => {
                    warn!(backend = backend.kind(), "Status probe failed: {}", e);
                    StoreStatus::new(ReportedMode::Error, self.fallback.count().await)
                }
            },
            None => StoreStatus::new(ReportedMode::Fallback, self.fallback.count().await),
        }
    }

    fn live(&self) -> Option<&Arc<dyn QuestionBackend>> {
        if self.degraded.load(Ordering::Acquire) {
            None
        } else {
            self.backend.as_ref()
        }
    }

    fn read_failed(&self, op: &str, backend: &dyn QuestionBackend, e: &DevKittyError) {
        warn!(
            backend = backend.kind(),
            "Backend read failed during {}: {}. Serving fallback view", op, e
        );
    }

    fn write_failed(&self, op: &str, backend: &dyn QuestionBackend, e: &DevKittyError) {
        warn!(backend = backend.kind(), "Backend write failed during {}: {}", op, e);

        if self
            .degraded
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            warn!(
                backend = backend.kind(),
                "Switching to in-memory fallback store for the rest of this process"
            );
        }
    }
}
