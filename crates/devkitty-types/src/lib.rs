//! DevKitty Types - Pure type definitions
//!
//! Question records and persistence status types shared by the storage
//! ports and the server. No async runtime dependencies.

pub mod question;
pub mod status;

pub use question::*;
pub use status::*;
