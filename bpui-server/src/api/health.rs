//! Backend status endpoint

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

/// Whether the backup plan can currently be read
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// `ok` or `unavailable`
    pub status: &'static str,
    /// Storage backend: `csv`, `sqlite` or `mysql`
    pub backend: &'static str,
    /// Number of entries in the plan, absent when unavailable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /health
///
/// Reads the whole plan; 503 when the backend cannot be read.
pub async fn backend_status(
    State(state): State<AppState>,
) -> (StatusCode, Json<StatusResponse>) {
    let backend = state.source.kind();

    match state.source.read_all().await {
        Ok(entries) => (
            StatusCode::OK,
            Json(StatusResponse {
                status: "ok",
                backend,
                entries: Some(entries.len()),
                error: None,
            }),
        ),
        Err(e) => {
            warn!("{} backend unavailable: {}", backend, e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(StatusResponse {
                    status: "unavailable",
                    backend,
                    entries: None,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(backend_status))
}
