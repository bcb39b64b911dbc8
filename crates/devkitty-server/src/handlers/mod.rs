//! HTTP handlers

pub mod health;
pub mod questions;

pub use health::health;

use axum::http::StatusCode;

/// Fallback for paths that match neither a route nor a static file
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Page not found")
}
