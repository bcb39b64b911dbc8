//! Question record types

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Opaque question identifier, assigned by the store at creation time.
///
/// Ids are UUIDv7 strings: time-ordered and never reused within a process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for QuestionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted interview question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub category: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Question {
    /// Create a new record with a fresh id, stamped with the current time.
    ///
    /// The timestamp is truncated to microseconds, the finest precision the
    /// relational backends keep, so a record reads back exactly as created.
    pub fn new(category: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: QuestionId::generate(),
            category: category.into(),
            content: content.into(),
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// Replace the mutable fields. `id` and `created_at` are left untouched.
    pub fn revise(&mut self, category: &str, content: &str) {
        self.category = category.to_string();
        self.content = content.to_string();
    }
}

/// Category/content pair submitted by the web layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionInput {
    pub category: String,
    pub content: String,
}

impl QuestionInput {
    /// True when both fields carry non-whitespace text
    pub fn is_complete(&self) -> bool {
        !self.category.trim().is_empty() && !self.content.trim().is_empty()
    }
}
