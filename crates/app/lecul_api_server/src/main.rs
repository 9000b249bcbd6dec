//! Le Cul API server binary.
//!
//! Prints `{"port": N}` to stdout once bound so a parent process or script
//! can discover an ephemeral port.

use clap::Parser;
use lecul_api::AppState;
use lecul_api::config::{AnthropicSettings, ApiConfig, DEFAULT_BIND_ADDR};
use lecul_core::completion::anthropic::{DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use tracing::{info, warn};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "lecul_api_server", about = "Le Cul API server")]
struct Args {
    /// Address to listen on (port 0 = ephemeral).
    #[arg(long, env = "BIND_ADDR", default_value = DEFAULT_BIND_ADDR)]
    bind: String,

    /// Anthropic API key. Without it every reply is a canned fallback line.
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    anthropic_api_key: Option<String>,

    /// Anthropic API base URL.
    #[arg(long, env = "ANTHROPIC_BASE_URL", default_value = DEFAULT_BASE_URL)]
    anthropic_base_url: String,

    /// Model identifier sent to the completion service.
    #[arg(long, env = "LECUL_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Maximum output tokens per completion.
    #[arg(
        long,
        env = "LECUL_MAX_TOKENS",
        default_value_t = DEFAULT_MAX_TOKENS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    max_tokens: u32,
}

impl Args {
    fn into_config(self) -> ApiConfig {
        ApiConfig::new(
            self.bind,
            self.anthropic_api_key,
            AnthropicSettings {
                base_url: self.anthropic_base_url,
                model: self.model,
                max_tokens: self.max_tokens,
            },
        )
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Write logs to stderr so stdout is reserved for the JSON port message.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,lecul_api=debug,lecul_core=debug".into()),
        )
        .init();

    let config = Args::parse().into_config();

    match &config.anthropic {
        Some(anthropic) => info!(
            model = %anthropic.model,
            max_tokens = anthropic.max_tokens,
            base_url = %anthropic.base_url,
            "completion service configured"
        ),
        None => warn!("ANTHROPIC_API_KEY not set, serving fallback lines only"),
    }

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    let app = lecul_api::router(AppState::from_config(config));

    println!("{}", serde_json::json!({"port": local_addr.port()}));
    info!(addr = %local_addr, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("failed to listen for shutdown signal: {e}");
                std::future::pending::<()>().await;
            }
            info!("shutting down");
        })
        .await?;

    Ok(())
}
