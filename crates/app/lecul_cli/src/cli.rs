use clap::{Parser, Subcommand};
use lecul_api_client::DEFAULT_SERVER_URL;
use lecul_core::persona::Persona;

/// Chat with Le Cul, the coding assistant whose code never works.
#[derive(Parser, Debug)]
#[command(name = "lecul", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the version.
    Version,

    /// Start an interactive chat.
    Chat(ServerArgs),

    /// Send one message and print the reply.
    Ask {
        /// Message to send.
        message: String,

        #[command(flatten)]
        server: ServerArgs,
    },
}

#[derive(clap::Args, Debug)]
pub struct ServerArgs {
    /// Base URL of the Le Cul API server.
    #[arg(long, env = "LECUL_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server: String,

    /// Persona: `primary` or `secondary`.
    #[arg(long, default_value = "primary")]
    pub mode: Persona,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn chat_defaults() {
        let cli = Cli::try_parse_from(["lecul", "chat"]).expect("parse");
        match cli.command {
            Commands::Chat(args) => assert_eq!(args.mode, Persona::Primary),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn ask_with_mode() {
        let cli = Cli::try_parse_from([
            "lecul",
            "ask",
            "bonjour",
            "--mode",
            "secondary",
            "--server",
            "http://localhost:4000",
        ])
        .expect("parse");
        match cli.command {
            Commands::Ask { message, server } => {
                assert_eq!(message, "bonjour");
                assert_eq!(server.mode, Persona::Secondary);
                assert_eq!(server.server, "http://localhost:4000");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["lecul", "chat", "--mode", "tertiary"]).is_err());
    }
}
