// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use clap::Parser;
use cli::{Cli, Commands, ServerArgs};
use lecul_api_client::ApiClient;
use lecul_core::chat::{ChatRequest, MESSAGE_REQUIRED};

mod cli;
mod logging;
mod repl;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = run().await {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let _logger = logging::init()?;

    let args = Cli::parse();

    match args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
        Commands::Chat(ServerArgs { server, mode }) => {
            let client = ApiClient::new(&server)?;
            log::info!("chatting with {} as {mode}", client.chat_url());
            repl::run(&client, mode).await?;
        }
        Commands::Ask { message, server } => {
            if message.trim().is_empty() {
                return Err(Error::Custom(MESSAGE_REQUIRED.into()));
            }
            let client = ApiClient::new(&server.server)?;
            let reply = client.chat(&ChatRequest::new(message, server.mode)).await?;
            println!("{}", reply.response);
        }
    }

    Ok(())
}
