/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `serve`: Browser chat UI
- `chat`: Terminal chat
- `auth`: Store the API key in the system keyring

Each handler performs the startup steps (credential lookup, client
construction) before any session exists, so a missing key stops the
process up front.
*/

use crate::config::Config;
use crate::credentials::{KeyringStore, SecretStore};
use crate::error::{ChataiError, Result};
use crate::providers::create_client;
use crate::session::ChatSession;

// Special commands parser for terminal chat
pub mod special_commands;

// Browser chat command handler
pub mod serve {
    //! Starts the web host after resolving credentials.

    use super::*;
    use crate::server::{self, AppState, SessionStore};
    use crate::session::metrics::init_metrics_exporter;
    use crate::session::CompletionSettings;

    /// Serve the browser chat UI until Ctrl-C
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing, the client cannot be built,
    /// or the server cannot bind.
    pub async fn run_serve(config: Config) -> Result<()> {
        let client = create_client(&config.provider, &KeyringStore::new())?;
        init_metrics_exporter();

        let sessions = SessionStore::new(
            client,
            CompletionSettings::from(&config.provider),
            config.chat.greeting.clone(),
        )
        .with_idle_timeout(config.server.session_idle_timeout());
        let state = AppState::new(sessions, config.chat.clone());

        server::serve(&config.server, state).await
    }
}

// Terminal chat command handler
pub mod chat {
    //! Readline loop driving a single [`ChatSession`].

    use super::special_commands::{parse_special_command, print_help, SpecialCommand};
    use super::*;
    use crate::session::{Message, Role};
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start terminal chat
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing, the client cannot be built,
    /// or the terminal cannot be read.
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting terminal chat");

        let client = create_client(&config.provider, &KeyringStore::new())?;
        let mut session = ChatSession::from_config(client, &config.provider, &config.chat);
        let mut rl = DefaultEditor::new()?;

        println!("{}\n", config.chat.title.bold());
        print_message(&session.messages()[0]);

        loop {
            match rl.readline("> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::ShowUsage) => {
                            print_usage(&session);
                            continue;
                        }
                        Ok(SpecialCommand::ShowHistory) => {
                            for message in session.messages() {
                                print_message(message);
                            }
                            continue;
                        }
                        Ok(SpecialCommand::Help) => {
                            print_help();
                            continue;
                        }
                        Ok(SpecialCommand::Exit) => break,
                        Ok(SpecialCommand::None) => {}
                        Err(e) => {
                            eprintln!("{}", e.to_string().yellow());
                            continue;
                        }
                    }

                    rl.add_history_entry(trimmed)?;

                    println!("{}", "Thinking...".dimmed());
                    let reply = session.submit_message(&line).await?;
                    print_message(&Message::assistant(reply));
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            }
        }

        print_usage(&session);
        Ok(())
    }

    fn print_message(message: &Message) {
        match message.role {
            Role::User => println!("{} {}\n", "you:".cyan().bold(), message.content),
            _ => println!("{} {}\n", "bot:".green().bold(), message.content),
        }
    }

    fn print_usage(session: &ChatSession) {
        let usage = session.usage();
        let last = usage
            .last_used_display()
            .unwrap_or_else(|| "never".to_string());
        println!(
            "{}",
            format!("Replies: {}  Last used: {}", usage.count, last).dimmed()
        );
    }
}

// Credential storage command handler
pub mod auth {
    //! Stores the API key where the startup lookup will find it.

    use super::*;
    use rustyline::DefaultEditor;

    /// Store the API key in the system keyring
    ///
    /// Prompts for the key when `api_key` is `None`.
    ///
    /// # Errors
    ///
    /// Returns error if the key is blank or the keyring rejects it
    pub async fn authenticate(config: Config, api_key: Option<String>) -> Result<()> {
        let api_key = match api_key {
            Some(key) => key,
            None => {
                let mut rl = DefaultEditor::new()?;
                rl.readline(&format!("{}: ", config.provider.api_key_name))?
            }
        };

        store_api_key(&config, &KeyringStore::new(), &api_key)?;
        println!(
            "Stored {} in the system keyring.",
            config.provider.api_key_name
        );
        Ok(())
    }

    /// Write `api_key` under the configured credential name
    ///
    /// # Errors
    ///
    /// Returns [`ChataiError::MissingCredentials`] for a blank key
    pub fn store_api_key(config: &Config, store: &dyn SecretStore, api_key: &str) -> Result<()> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ChataiError::MissingCredentials(config.provider.api_key_name.clone()).into());
        }

        store.set(&config.provider.api_key_name, api_key)?;
        tracing::info!("Stored {} in secrets store", config.provider.api_key_name);
        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serve_halts_without_credentials() {
        let mut config = Config::default();
        config.provider.api_key_name = "CHATAI_TEST_SERVE_KEY_UNSET".to_string();

        let err = serve::run_serve(config).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChataiError>(),
            Some(ChataiError::MissingCredentials(_))
        ));
    }
}
