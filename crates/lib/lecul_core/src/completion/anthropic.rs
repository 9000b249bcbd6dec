//! Anthropic completion provider.
//!
//! Calls the Anthropic Messages API (`/v1/messages`) once per request. No
//! retry: a failed call surfaces as a [`CompletionError`] and the caller
//! decides what to show.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::{CompletionError, CompletionPrompt, CompletionReply, CompletionService};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_MAX_TOKENS: u32 = 500;
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Settings for [`AnthropicClient`].
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub api_key: String,
    /// Scheme + host (+ optional path prefix), without `/v1/messages`.
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
}

impl AnthropicConfig {
    /// Config with the default endpoint, model, and output bound.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [UserTurn<'a>; 1],
}

#[derive(Serialize)]
struct UserTurn<'a> {
    role: &'static str,
    content: &'a str,
}

/// Anthropic Messages API client.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicClient {
    pub fn new(client: Client, config: AnthropicConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &AnthropicConfig {
        &self.config
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionService for AnthropicClient {
    async fn complete(&self, prompt: CompletionPrompt<'_>) -> Result<CompletionReply, CompletionError> {
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system: prompt.system,
            messages: [UserTurn {
                role: "user",
                content: prompt.user_message,
            }],
        };

        debug!(model = %self.config.model, max_tokens = self.config.max_tokens, "calling Anthropic messages API");

        let resp = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| CompletionError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::Json;
    use axum::Router;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use serde_json::{Value, json};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });
        format!("http://{addr}")
    }

    fn client_for(base_url: String) -> AnthropicClient {
        AnthropicClient::new(
            Client::new(),
            AnthropicConfig {
                base_url,
                ..AnthropicConfig::new("sk-test")
            },
        )
    }

    const PROMPT: CompletionPrompt<'static> = CompletionPrompt {
        system: "sois drôle",
        user_message: "bonjour",
    };

    #[test]
    fn config_defaults() {
        let config = AnthropicConfig::new("k");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 500);
    }

    #[test]
    fn messages_url_tolerates_trailing_slash() {
        let client = client_for("http://localhost:9999/".into());
        assert_eq!(client.messages_url(), "http://localhost:9999/v1/messages");
    }

    #[tokio::test]
    async fn sends_single_user_turn_with_system_prompt() {
        let app = Router::new().route(
            "/v1/messages",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["x-api-key"], "sk-test");
                assert_eq!(headers["anthropic-version"], ANTHROPIC_VERSION);
                assert_eq!(body["model"], DEFAULT_MODEL);
                assert_eq!(body["max_tokens"], 500);
                assert_eq!(body["system"], "sois drôle");
                assert_eq!(
                    body["messages"],
                    json!([{"role": "user", "content": "bonjour"}])
                );
                Json(json!({
                    "id": "msg_01",
                    "type": "message",
                    "role": "assistant",
                    "content": [{"type": "text", "text": "fonction cassée()"}]
                }))
            }),
        );
        let client = client_for(serve(app).await);

        let reply = client.complete(PROMPT).await.expect("complete");
        assert_eq!(reply.first_text(), Some("fonction cassée()"));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let app = Router::new().route(
            "/v1/messages",
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid x-api-key") }),
        );
        let client = client_for(serve(app).await);

        match client.complete(PROMPT).await {
            Err(CompletionError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid x-api-key");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let app = Router::new().route("/v1/messages", post(|| async { "not json" }));
        let client = client_for(serve(app).await);

        assert!(matches!(
            client.complete(PROMPT).await,
            Err(CompletionError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_host_is_an_http_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);
        let client = client_for(format!("http://{addr}"));

        assert!(matches!(
            client.complete(PROMPT).await,
            Err(CompletionError::Http(_))
        ));
    }
}
