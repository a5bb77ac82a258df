//! Projection of the session log into provider chat history
//!
//! The provider names the model's turns `Chatbot`; the log names them
//! `assistant`. Anything the table does not recognize is sent as `User`.

use crate::providers::{ApiRole, HistoryEntry};
use crate::session::message::{Message, Role};

impl From<&Role> for ApiRole {
    fn from(role: &Role) -> Self {
        match role {
            Role::Assistant => ApiRole::Chatbot,
            Role::User => ApiRole::User,
            Role::System => ApiRole::System,
            Role::Other(name) => {
                tracing::debug!(role = %name, "Projecting unrecognized role as {}", ApiRole::User);
                ApiRole::User
            }
        }
    }
}

impl From<ApiRole> for Role {
    fn from(role: ApiRole) -> Self {
        match role {
            ApiRole::Chatbot => Role::Assistant,
            ApiRole::User => Role::User,
            ApiRole::System => Role::System,
        }
    }
}

/// Map `messages` to provider history entries, preserving order
///
/// # Examples
///
/// ```
/// use chatai::providers::ApiRole;
/// use chatai::session::{project_history, Message};
///
/// let history = project_history(&[Message::assistant("Hi"), Message::user("Hello")]);
/// assert_eq!(history[0].role, ApiRole::Chatbot);
/// assert_eq!(history[1].role, ApiRole::User);
/// ```
pub fn project_history(messages: &[Message]) -> Vec<HistoryEntry> {
    messages
        .iter()
        .map(|m| HistoryEntry::new(ApiRole::from(&m.role), m.content.clone()))
        .collect()
}
