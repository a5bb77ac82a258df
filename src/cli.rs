//! Command-line interface definition for Chat.ai
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for serving the browser chat, chatting in the
//! terminal, and storing the API key.

use clap::{Parser, Subcommand};

/// Chat.ai - browser chat front-end for the Cohere chat API
#[derive(Parser, Debug, Clone)]
#[command(name = "chatai")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Chat.ai
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the browser chat UI
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Chat with the model in the terminal
    Chat {
        /// Model identifier (overrides config)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Store the API key in the system keyring
    Auth {
        /// API key to store; prompted for when omitted
        #[arg(long, env = "CHATAI_AUTH_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            json_logs: false,
            command: Commands::Serve {
                host: None,
                port: None,
            },
        }
    }
}
