//! Completion module — calls to the hosted chat-completion service.
//!
//! # Public API
//!
//! - [`CompletionService`] — one-shot completion of a system prompt plus a
//!   single user turn
//! - [`anthropic::AnthropicClient`] — Anthropic Messages API implementation
//! - [`CompletionReply::first_text`] — text of the first content block, if textual

pub mod anthropic;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while calling the completion service.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Completion service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Completion response parse error: {0}")]
    Decode(String),
}

/// Instruction text plus the single user turn sent to the service.
#[derive(Debug, Clone, Copy)]
pub struct CompletionPrompt<'a> {
    pub system: &'a str,
    pub user_message: &'a str,
}

/// One block of generated content.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    /// Tool calls, thinking blocks, and anything else that is not plain text.
    #[serde(other)]
    Other,
}

/// Content returned by the completion service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CompletionReply {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

impl CompletionReply {
    /// Text of the first block, or `None` when absent or not textual.
    pub fn first_text(&self) -> Option<&str> {
        match self.content.first() {
            Some(ContentBlock::Text { text }) => Some(text),
            _ => None,
        }
    }
}

/// A hosted chat-completion backend.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Run one completion. No retries.
    async fn complete(&self, prompt: CompletionPrompt<'_>) -> Result<CompletionReply, CompletionError>;
}
