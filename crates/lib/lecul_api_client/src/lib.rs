//! # lecul_api_client
//!
//! Typed HTTP client for the Le Cul API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use lecul_core::chat::{ChatRequest, ChatResponse};
use lecul_core::persona::Persona;
use lecul_core::session::{ChatTransport, TransportError};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Errors returned by [`ApiClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the chat endpoint.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    chat_url: Url,
}

impl ApiClient {
    /// Client for the server rooted at `base_url` (e.g. `http://127.0.0.1:3000`).
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ClientError> {
        let chat_url = Url::parse(base_url)?.join("/api/lecul")?;
        Ok(Self { client, chat_url })
    }

    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }

    /// `POST /api/lecul`.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        let resp = self
            .client
            .post(self.chat_url.clone())
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error)
                .unwrap_or(text);
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }
}

#[async_trait]
impl ChatTransport for ApiClient {
    async fn send(&self, message: &str, mode: Persona) -> Result<ChatResponse, TransportError> {
        Ok(self.chat(&ChatRequest::new(message, mode)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_url_is_joined_onto_base() {
        let client = ApiClient::new("http://localhost:3000").expect("client");
        assert_eq!(client.chat_url().as_str(), "http://localhost:3000/api/lecul");

        let client = ApiClient::new("http://localhost:3000/ignored/").expect("client");
        assert_eq!(client.chat_url().as_str(), "http://localhost:3000/api/lecul");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn request_serializes_mode_tag() {
        let json = serde_json::to_value(ChatRequest::new("bonjour", Persona::Secondary))
            .expect("serialize");
        assert_eq!(json, serde_json::json!({"message": "bonjour", "mode": "secondary"}));
    }
}
