//! Backend resolution
//!
//! Runs once at startup: picks the first configured connection target, tries
//! to connect within a bounded timeout and declares the persistence mode.
//! Every failure ends in `BackendMode::Fallback`; nothing is raised to the
//! caller.

use super::{PostgresBackend, SqliteBackend};
use devkitty_core::{BackendMode, DevKittyError, QuestionBackend, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

/// Outcome of backend resolution. `backend` is present iff `mode` is
/// `Connected`.
pub struct Resolution {
    pub mode: BackendMode,
    pub backend: Option<Arc<dyn QuestionBackend>>,
}

impl Resolution {
    pub fn connected(backend: Arc<dyn QuestionBackend>) -> Self {
        Self {
            mode: BackendMode::Connected,
            backend: Some(backend),
        }
    }

    pub fn fallback() -> Self {
        Self {
            mode: BackendMode::Fallback,
            backend: None,
        }
    }
}

/// Driver selected by the target's URL scheme
#[derive(Debug, PartialEq, Eq)]
enum ConnectionTarget<'a> {
    Sqlite(&'a str),
    Postgres(&'a str),
}

impl<'a> ConnectionTarget<'a> {
    fn parse(raw: &'a str) -> Result<Self> {
        let scheme = raw
            .split_once(':')
            .map(|(scheme, _)| scheme.to_ascii_lowercase())
            .unwrap_or_default();

        match scheme.as_str() {
            "sqlite" => Ok(ConnectionTarget::Sqlite(raw)),
            "postgres" | "postgresql" => Ok(ConnectionTarget::Postgres(raw)),
            "" => Err(DevKittyError::UnsupportedTarget(redact(raw))),
            _ => Err(DevKittyError::UnsupportedTarget(scheme)),
        }
    }
}

pub struct BackendResolver {
    timeout: Duration,
    accept_invalid_certs: bool,
}

impl BackendResolver {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            accept_invalid_certs: false,
        }
    }

    /// Skip server certificate validation for hosted databases
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Connect using the first non-empty candidate.
    ///
    /// Connection and schema preparation share one deadline of `timeout`.
    /// Later candidates are never tried.
    pub async fn resolve(&self, candidates: &[String]) -> Resolution {
        let Some(candidate) = first_candidate(candidates) else {
            info!("No database configured, using in-memory fallback store");
            return Resolution::fallback();
        };

        let target = redact(candidate);
        info!("Resolving question backend: {}", target);

        match self.connect(candidate).await {
            Ok(backend) => {
                info!(backend = backend.kind(), "Connected to {}", target);
                Resolution::connected(backend)
            }
            Err(e) if e.is_connection_failure() => {
                warn!(
                    "Database {} unavailable: {}. Using in-memory fallback store",
                    target, e
                );
                Resolution::fallback()
            }
            Err(e) => {
                warn!(
                    "Database {} has no usable questions table: {}. Using in-memory fallback store",
                    target, e
                );
                Resolution::fallback()
            }
        }
    }

    async fn connect(&self, candidate: &str) -> Result<Arc<dyn QuestionBackend>> {
        let deadline = Instant::now() + self.timeout;

        let backend: Arc<dyn QuestionBackend> = match ConnectionTarget::parse(candidate)? {
            ConnectionTarget::Sqlite(url) => {
                Arc::new(self.within(deadline, SqliteBackend::connect(url)).await?)
            }
            ConnectionTarget::Postgres(url) => Arc::new(
                self.within(
                    deadline,
                    PostgresBackend::connect(url, self.accept_invalid_certs, self.timeout),
                )
                .await?,
            ),
        };

        self.prepare_schema(backend.as_ref(), deadline).await?;

        Ok(backend)
    }

    /// Create the questions table; if that fails, accept an existing one.
    async fn prepare_schema(&self, backend: &dyn QuestionBackend, deadline: Instant) -> Result<()> {
        match self.within(deadline, backend.ensure_schema()).await {
            Ok(()) => Ok(()),
            Err(DevKittyError::Timeout(elapsed)) => Err(DevKittyError::Timeout(elapsed)),
            Err(e) => {
                warn!(
                    backend = backend.kind(),
                    "Could not create questions table ({}), checking for an existing one", e
                );
                self.within(deadline, backend.probe()).await
            }
        }
    }

    async fn within<T>(
        &self,
        deadline: Instant,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        tokio::time::timeout_at(deadline, fut)
            .await
            .map_err(|_| DevKittyError::Timeout(self.timeout))?
    }
}

fn first_candidate(candidates: &[String]) -> Option<&str> {
    candidates
        .iter()
        .map(|c| c.trim())
        .find(|c| !c.is_empty())
}

/// Hide credentials before a connection string is logged
fn redact(target: &str) -> String {
    match (target.find("://"), target.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end + 3 => {
            format!("{}://***{}", &target[..scheme_end], &target[at..])
        }
        _ => target.to_string(),
    }
}
