//! Operator view of the announcement subsystem.

use crate::AppState;
use axum::{extract::Extension, Json};
use barista_voice::ConnectionState;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Response body for `GET /api/announcer/status`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnnouncerStatusResponse {
    pub state: String,
    pub handshakes: u64,
    #[serde(rename = "lastError")]
    pub last_error: Option<String>,
}

/// Handler for `GET /api/announcer/status`.
///
/// Read-only: never triggers a handshake.
pub async fn announcer_status_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<AnnouncerStatusResponse> {
    let connection_state: ConnectionState = state.connections.state();
    Json(AnnouncerStatusResponse {
        state: connection_state.as_str().to_string(),
        handshakes: state.connections.handshake_count(),
        last_error: state.connections.last_error().map(|e| e.to_string()),
    })
}
