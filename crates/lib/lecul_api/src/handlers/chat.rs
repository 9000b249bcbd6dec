//! Chat request handler — the parody completion endpoint.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::error;

use lecul_core::chat::{ChatRequest, ChatRequestBody, ChatResponse};
use lecul_core::persona::Persona;

use crate::AppState;
use crate::error::AppResult;

/// `POST /api/lecul` — answer a message in the selected persona.
///
/// Returns 400 only when `message` is missing or empty. Every other outcome,
/// including a body that is not a JSON object and upstream failures, is a
/// 200 with a canned line. Field types are not checked here; see
/// [`ChatRequest::parse`].
pub async fn chat_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<ChatResponse>> {
    let mut rng = StdRng::from_os_rng();

    let body: ChatRequestBody = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(e) => {
            error!(error = %e, "unreadable chat request body");
            let line = Persona::default().config().error_line(&mut rng);
            return Ok(Json(ChatResponse::now(line)));
        }
    };

    let request = ChatRequest::parse(body)?;
    Ok(Json(state.responder.respond(&request, &mut rng).await))
}
