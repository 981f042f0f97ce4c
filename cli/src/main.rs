mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{handle_ask, handle_ingest, handle_serve, handle_status, Cli, Commands};
use docqa_config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load_from(cli.config.as_deref())?;

    match cli.command {
        Commands::Ingest { force } => {
            handle_ingest(&config, force).await?;
        }
        Commands::Ask { question, top } => {
            handle_ask(&config, question, top).await?;
        }
        Commands::Serve { port } => {
            handle_serve(config, port).await?;
        }
        Commands::Status => {
            handle_status(&config)?;
        }
    }

    Ok(())
}
