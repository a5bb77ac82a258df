//! Special commands parser for terminal chat
//!
//! Commands are prefixed with `/` and are case-insensitive. Anything else
//! is a message for the model.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),
}

/// Special commands that can be executed during terminal chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Show the usage counter
    ShowUsage,

    /// Reprint the conversation log
    ShowHistory,

    /// Display help information
    Help,

    /// Exit the chat
    Exit,

    /// Not a special command; send the input to the model
    None,
}

/// Parse one line of terminal input
///
/// # Errors
///
/// Returns [`CommandError::UnknownCommand`] for `/`-prefixed input that is
/// not a known command.
///
/// # Examples
///
/// ```
/// use chatai::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/usage").unwrap(), SpecialCommand::ShowUsage);
/// assert_eq!(parse_special_command("hello").unwrap(), SpecialCommand::None);
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lowered = trimmed.to_lowercase();

    match lowered.as_str() {
        "exit" | "quit" => return Ok(SpecialCommand::Exit),
        _ if !lowered.starts_with('/') => return Ok(SpecialCommand::None),
        _ => {}
    }

    match lowered.as_str() {
        "/usage" | "/stats" => Ok(SpecialCommand::ShowUsage),
        "/history" => Ok(SpecialCommand::ShowHistory),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" => Ok(SpecialCommand::Exit),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Print the special command reference
pub fn print_help() {
    println!(
        r#"
Special Commands for Terminal Chat
==================================

  /usage          - Show how many replies this session has received
  /history        - Reprint the conversation so far
  /help           - Show this help message
  /exit, /quit    - Leave the chat (also: exit, quit, Ctrl-D)

Anything else is sent to the model.
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_usage() {
        assert_eq!(parse_special_command("/usage"), Ok(SpecialCommand::ShowUsage));
        assert_eq!(parse_special_command("/STATS"), Ok(SpecialCommand::ShowUsage));
    }

    #[test]
    fn test_parse_history() {
        assert_eq!(
            parse_special_command("  /history  "),
            Ok(SpecialCommand::ShowHistory)
        );
    }

    #[test]
    fn test_parse_exit_variants() {
        for input in ["/exit", "/quit", "exit", "QUIT"] {
            assert_eq!(parse_special_command(input), Ok(SpecialCommand::Exit), "{}", input);
        }
    }

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(
            parse_special_command("what is /usage?"),
            Ok(SpecialCommand::None)
        );
        assert_eq!(parse_special_command("exit strategy"), Ok(SpecialCommand::None));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse_special_command("/mode write"),
            Err(CommandError::UnknownCommand("/mode write".to_string()))
        );
    }
}
