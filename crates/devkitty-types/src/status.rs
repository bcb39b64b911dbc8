//! Persistence mode and status types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which store CRUD operations dispatch to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    Connected,
    Fallback,
}

impl std::fmt::Display for BackendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendMode::Connected => write!(f, "connected"),
            BackendMode::Fallback => write!(f, "fallback"),
        }
    }
}

/// Mode as reported to the health check.
///
/// `Error` means the live backend could not be probed; it never changes the
/// mode used for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportedMode {
    Connected,
    Fallback,
    Error,
}

impl From<BackendMode> for ReportedMode {
    fn from(mode: BackendMode) -> Self {
        match mode {
            BackendMode::Connected => ReportedMode::Connected,
            BackendMode::Fallback => ReportedMode::Fallback,
        }
    }
}

impl std::fmt::Display for ReportedMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportedMode::Connected => write!(f, "connected"),
            ReportedMode::Fallback => write!(f, "fallback"),
            ReportedMode::Error => write!(f, "error"),
        }
    }
}

/// Snapshot returned by the store's status query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStatus {
    pub mode: ReportedMode,
    pub count: u64,
    pub timestamp: DateTime<Utc>,
}

impl StoreStatus {
    pub fn new(mode: ReportedMode, count: u64) -> Self {
        Self {
            mode,
            count,
            timestamp: Utc::now(),
        }
    }
}
