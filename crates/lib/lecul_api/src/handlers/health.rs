//! Health endpoint — bootstrap check.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use lecul_core::persona::Persona;

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub completion_configured: bool,
    pub personas: Vec<Persona>,
}

/// `GET /api/health` — reports version and whether a completion credential is set.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: lecul_core::version(),
        completion_configured: state.responder.is_configured(),
        personas: Persona::ALL.to_vec(),
    })
}
