//! Error types for DevKitty persistence

use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DevKittyError>;

#[derive(Error, Debug)]
pub enum DevKittyError {
    #[error("No connection target configured")]
    NoCandidate,

    #[error("Unsupported connection target: {0}")]
    UnsupportedTarget(String),

    #[error("Connection unavailable: {0}")]
    ConnectionUnavailable(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl DevKittyError {
    /// Errors that mean the backend was never usable, as opposed to a
    /// failure of an individual call.
    pub fn is_connection_failure(&self) -> bool {
        matches!(
            self,
            DevKittyError::NoCandidate
                | DevKittyError::UnsupportedTarget(_)
                | DevKittyError::ConnectionUnavailable(_)
                | DevKittyError::Timeout(_)
        )
    }
}
