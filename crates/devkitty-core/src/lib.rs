//! DevKitty Core Library
//!
//! Error types and the port trait implemented by live question backends.

// Re-export pure types from devkitty-types
pub use devkitty_types::*;

pub mod error;
pub mod ports;

pub use error::{DevKittyError, Result};
pub use ports::QuestionBackend;
