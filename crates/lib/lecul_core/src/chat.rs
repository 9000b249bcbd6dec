//! Chat exchange — request validation, persona selection, and the
//! fail-soft completion call.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use crate::completion::{CompletionPrompt, CompletionService};
use crate::persona::Persona;

/// Message returned to clients when `message` is missing or empty.
pub const MESSAGE_REQUIRED: &str = "Message is required";

/// Validation failures of an incoming chat body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("Message is required")]
    MissingMessage,
}

/// Raw chat body as received on the wire.
///
/// Fields stay untyped so a malformed `mode` or a non-string `message` does
/// not reject the whole body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequestBody {
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub mode: Option<Value>,
}

/// A validated chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub mode: Persona,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, mode: Persona) -> Self {
        Self {
            message: message.into(),
            mode,
        }
    }

    /// Validate a raw body.
    ///
    /// `null`, `false`, `0`, and `""` count as a missing message; other
    /// non-string values are sent as their JSON text. A `mode` that is not a
    /// known tag, including any non-string, resolves to [`Persona::Primary`].
    pub fn parse(body: ChatRequestBody) -> Result<Self, ChatError> {
        let message = body
            .message
            .and_then(message_text)
            .ok_or(ChatError::MissingMessage)?;
        Ok(Self {
            message,
            mode: Persona::from_tag(body.mode.as_ref().and_then(Value::as_str)),
        })
    }
}

fn message_text(value: Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Reply text plus the instant it was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(serialize_with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

impl ChatResponse {
    /// Response stamped with the current time.
    pub fn now(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            timestamp: Utc::now(),
        }
    }
}

/// `2026-10-16T09:30:00.123Z`
fn iso_millis<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Turns a validated request into a reply. Never fails.
///
/// Holds no mutable state; one instance is shared by every request.
#[derive(Clone, Default)]
pub struct Responder {
    completion: Option<Arc<dyn CompletionService>>,
}

impl Responder {
    /// `None` puts the responder in fallback-only mode: no network calls.
    pub fn new(completion: Option<Arc<dyn CompletionService>>) -> Self {
        Self { completion }
    }

    /// Whether a completion backend is configured.
    pub fn is_configured(&self) -> bool {
        self.completion.is_some()
    }

    pub async fn respond<R: Rng + Send>(&self, request: &ChatRequest, rng: &mut R) -> ChatResponse {
        let persona = request.mode.config();

        let Some(completion) = &self.completion else {
            debug!(mode = %request.mode, "no completion credential, using fallback line");
            return ChatResponse::now(persona.fallback_line(rng));
        };

        let prompt = CompletionPrompt {
            system: persona.system_prompt,
            user_message: &request.message,
        };

        match completion.complete(prompt).await {
            Ok(reply) => ChatResponse::now(reply.first_text().unwrap_or(persona.empty_reply)),
            Err(e) => {
                error!(mode = %request.mode, error = %e, "completion call failed");
                ChatResponse::now(persona.error_line(rng))
            }
        }
    }
}
