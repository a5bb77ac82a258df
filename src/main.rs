//! Chat.ai - browser chat front-end for the Cohere chat API
//!
#![doc = "Main entry point for the Chat.ai application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chatai::cli::{Cli, Commands};
use chatai::commands;
use chatai::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose, cli.json_logs);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Serve { .. } => {
            tracing::info!("Starting browser chat server");
            commands::serve::run_serve(config).await?;
            Ok(())
        }
        Commands::Chat { .. } => {
            tracing::info!("Starting terminal chat mode");
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::Auth { api_key } => {
            tracing::info!("Storing API key for {}", config.provider.api_key_name);
            commands::auth::authenticate(config, api_key).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose { "chatai=debug" } else { "chatai=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
