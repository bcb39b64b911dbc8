//! Health check handler

use crate::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use devkitty_core::ReportedMode;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    mode: ReportedMode,
    count: u64,
    timestamp: DateTime<Utc>,
    version: &'static str,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = state.store.status().await;

    Json(HealthResponse {
        mode: status.mode,
        count: status.count,
        timestamp: status.timestamp,
        version: env!("CARGO_PKG_VERSION"),
    })
}
