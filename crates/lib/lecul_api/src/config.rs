//! API server configuration.

use lecul_core::completion::anthropic::{
    AnthropicConfig, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
};
use tracing::warn;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3000").
    pub bind_addr: String,
    /// Completion backend settings. `None` when no API key is configured,
    /// which puts the chat endpoint in fallback-only mode.
    pub anthropic: Option<AnthropicConfig>,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable             | Default                       |
    /// |----------------------|-------------------------------|
    /// | `BIND_ADDR`          | `127.0.0.1:3000`              |
    /// | `ANTHROPIC_API_KEY`  | unset → fallback-only mode    |
    /// | `ANTHROPIC_BASE_URL` | `https://api.anthropic.com`   |
    /// | `LECUL_MODEL`        | `claude-3-haiku-20240307`     |
    /// | `LECUL_MAX_TOKENS`   | `500`                         |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same resolution as [`ApiConfig::from_env`] over an arbitrary lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::new(
            lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            lookup("ANTHROPIC_API_KEY"),
            AnthropicSettings {
                base_url: lookup("ANTHROPIC_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
                model: lookup("LECUL_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
                max_tokens: parse_max_tokens(lookup("LECUL_MAX_TOKENS")),
            },
        )
    }

    /// Builds a config from resolved values. An absent or empty `api_key`
    /// leaves the completion backend unconfigured and `settings` unused.
    pub fn new(bind_addr: String, api_key: Option<String>, settings: AnthropicSettings) -> Self {
        let anthropic = api_key
            .filter(|key| !key.is_empty())
            .map(|api_key| AnthropicConfig {
                api_key,
                base_url: settings.base_url,
                model: settings.model,
                max_tokens: settings.max_tokens,
            });
        Self {
            bind_addr,
            anthropic,
        }
    }
}

/// Completion settings that only apply once an API key is present.
#[derive(Clone, Debug)]
pub struct AnthropicSettings {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
}

impl Default for AnthropicSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

fn parse_max_tokens(raw: Option<String>) -> u32 {
    match raw.as_deref().map(str::parse::<u32>) {
        None => DEFAULT_MAX_TOKENS,
        Some(Ok(n)) if n > 0 => n,
        Some(_) => {
            warn!(value = ?raw, "invalid LECUL_MAX_TOKENS, using default");
            DEFAULT_MAX_TOKENS
        }
    }
}
