//! # lecul_api
//!
//! HTTP API library for Le Cul.

pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use lecul_core::chat::Responder;
use lecul_core::completion::CompletionService;
use lecul_core::completion::anthropic::AnthropicClient;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::error::AppError;
use crate::handlers::{chat, health};

pub const CHAT_PATH: &str = "/api/lecul";
pub const HEALTH_PATH: &str = "/api/health";

/// Shared application state passed to all handlers.
///
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: ApiConfig,
    /// Chat responder (fallback-only when no credential is configured).
    pub responder: Responder,
}

impl AppState {
    /// Build state from config, wiring the Anthropic client when a key is set.
    pub fn from_config(config: ApiConfig) -> Self {
        let completion = config.anthropic.clone().map(|anthropic| {
            Arc::new(AnthropicClient::new(reqwest::Client::new(), anthropic))
                as Arc<dyn CompletionService>
        });
        Self {
            responder: Responder::new(completion),
            config,
        }
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(CHAT_PATH, post(chat::chat_handler))
        .route(HEALTH_PATH, get(health::health_handler))
        .fallback(not_found)
        .layer(cors)
        .with_state(state)
}

async fn not_found(uri: axum::http::Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
