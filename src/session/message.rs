//! Chat message types
//!
//! A [`Message`] is one entry of a session's append-only log. Roles are
//! closed for the three roles the application produces, with an
//! [`Role::Other`] escape hatch so a log deserialized from elsewhere keeps
//! whatever role string it carried.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a chat message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// The person typing into the chat widget
    User,
    /// The model (and synthetic replies such as the greeting or errors)
    Assistant,
    /// Instructions injected by the application
    System,
    /// Any role name not listed above, kept verbatim
    Other(String),
}

impl Role {
    /// Lower-case role name as used in logs and on the web API
    pub fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
            Self::Other(name) => name,
        }
    }

    /// Display tag for the chat widget
    ///
    /// The widget only knows two bubbles: user input renders as `user`,
    /// everything else renders as `assistant`.
    pub fn display_tag(&self) -> &'static str {
        match self {
            Self::User => "user",
            _ => "assistant",
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "user" => Self::User,
            "assistant" => Self::Assistant,
            "system" => Self::System,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the conversation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Creates a new message with an arbitrary role
    pub fn new(role: impl Into<Role>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use chatai::session::{Message, Role};
    ///
    /// let msg = Message::user("Hello!");
    /// assert_eq!(msg.role, Role::User);
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Creates a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_roles_parse() {
        assert_eq!(Role::from("user"), Role::User);
        assert_eq!(Role::from("assistant"), Role::Assistant);
        assert_eq!(Role::from("system"), Role::System);
    }

    #[test]
    fn test_unknown_role_is_kept_verbatim() {
        let role = Role::from("Chatbot");
        assert_eq!(role, Role::Other("Chatbot".to_string()));
        assert_eq!(role.as_str(), "Chatbot");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[test]
    fn test_message_deserializes_unknown_role() {
        let msg: Message = serde_json::from_str(r#"{"role":"tool","content":"x"}"#).unwrap();
        assert_eq!(msg.role, Role::Other("tool".to_string()));
    }

    #[test]
    fn test_display_tag() {
        assert_eq!(Role::User.display_tag(), "user");
        assert_eq!(Role::Assistant.display_tag(), "assistant");
        assert_eq!(Role::System.display_tag(), "assistant");
        assert_eq!(Role::from("narrator").display_tag(), "assistant");
    }
}
