//! The conversation session
//!
//! A [`ChatSession`] owns one client's message log and usage counter and
//! turns each user submission into exactly one completion call.

use std::sync::Arc;

use chrono::Local;

use crate::config::{ChatConfig, ProviderConfig};
use crate::error::{ChataiError, Result};
use crate::providers::{CompletionClient, CompletionRequest, HistoryEntry};
use crate::session::history::project_history;
use crate::session::message::{Message, Role};
use crate::session::metrics::CompletionMetrics;
use crate::session::usage::UsageStats;

/// Prefix of the assistant message shown when a completion call fails
pub const ERROR_PREFIX: &str = "⚠️ Error: ";

/// Model and sampling parameters sent with every call of a session
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub model: String,
    pub temperature: f32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self::from(&ProviderConfig::default())
    }
}

impl From<&ProviderConfig> for CompletionSettings {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }
}

/// One user's conversation
///
/// The log starts with a synthetic assistant greeting and grows by one user
/// and one assistant entry per submission, whether or not the call succeeds.
pub struct ChatSession {
    client: Arc<dyn CompletionClient>,
    settings: CompletionSettings,
    messages: Vec<Message>,
    usage: UsageStats,
}

impl ChatSession {
    /// Creates a session whose log holds only `greeting`
    pub fn new(
        client: Arc<dyn CompletionClient>,
        settings: CompletionSettings,
        greeting: impl Into<String>,
    ) -> Self {
        Self {
            client,
            settings,
            messages: vec![Message::assistant(greeting)],
            usage: UsageStats::new(),
        }
    }

    /// Creates a session from loaded configuration
    pub fn from_config(
        client: Arc<dyn CompletionClient>,
        provider: &ProviderConfig,
        chat: &ChatConfig,
    ) -> Self {
        Self::new(client, CompletionSettings::from(provider), chat.greeting.clone())
    }

    /// Submit user text and append the reply
    ///
    /// The returned string is the assistant entry that was appended: the
    /// model's reply on success, or an `⚠️ Error: ...` line when the call
    /// failed. Failures do not count toward usage.
    ///
    /// # Errors
    ///
    /// Returns [`ChataiError::EmptyMessage`] for blank input; the log is left
    /// untouched in that case. Completion failures are not errors here.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use chatai::providers::FakeCompletionClient;
    /// use chatai::session::{ChatSession, CompletionSettings};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> anyhow::Result<()> {
    /// let client = Arc::new(FakeCompletionClient::new());
    /// client.push_reply("Hi there!");
    ///
    /// let mut session = ChatSession::new(client, CompletionSettings::default(), "How can I help you today?");
    /// let reply = session.submit_message("Hello").await?;
    ///
    /// assert_eq!(reply, "Hi there!");
    /// assert_eq!(session.messages().len(), 3);
    /// assert_eq!(session.usage().count, 1);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn submit_message(&mut self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(ChataiError::EmptyMessage.into());
        }

        // The log is only touched after the call settles, so a dropped
        // future leaves the session as it was before the submission.
        let request = CompletionRequest {
            message: text.to_string(),
            chat_history: self.history_projection(),
            model: self.settings.model.clone(),
            temperature: self.settings.temperature,
        };

        tracing::debug!(
            backend = self.client.name(),
            model = %request.model,
            history = request.chat_history.len(),
            "Sending completion request"
        );

        let metrics = CompletionMetrics::start(self.client.name());
        let reply = match self.client.chat(&request).await {
            Ok(response) => {
                metrics.record_success();
                self.usage.record_success(Local::now());
                if let Some(tokens) = response.usage {
                    tracing::debug!(
                        input_tokens = tokens.input_tokens,
                        output_tokens = tokens.output_tokens,
                        total_tokens = tokens.total(),
                        "Completion succeeded"
                    );
                }
                response.text
            }
            Err(e) => {
                metrics.record_failure();
                tracing::warn!("Completion call failed: {:#}", e);
                format!("{}{}", ERROR_PREFIX, e)
            }
        };

        self.messages.push(Message::user(text));
        self.messages.push(Message::assistant(reply.clone()));
        Ok(reply)
    }

    /// History that the next call would carry, i.e. the whole log
    pub fn history_projection(&self) -> Vec<HistoryEntry> {
        project_history(&self.messages)
    }

    /// Append an arbitrary entry without calling the model
    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn usage(&self) -> &UsageStats {
        &self.usage
    }

    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false once constructed; the greeting is never removed
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of entries with the given role
    pub fn count_role(&self, role: &Role) -> usize {
        self.messages.iter().filter(|m| &m.role == role).count()
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("backend", &self.client.name())
            .field("settings", &self.settings)
            .field("messages", &self.messages.len())
            .field("usage", &self.usage)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ApiRole, FakeCompletionClient};

    const GREETING: &str = "How can I help you today?";

    fn session_with(client: &Arc<FakeCompletionClient>) -> ChatSession {
        ChatSession::new(client.clone(), CompletionSettings::default(), GREETING)
    }

    #[test]
    fn test_new_session_has_greeting() {
        let client = Arc::new(FakeCompletionClient::new());
        let session = session_with(&client);
        assert_eq!(session.messages(), &[Message::assistant(GREETING)]);
        assert_eq!(session.usage().count, 0);
        assert!(!session.is_empty());
    }

    #[tokio::test]
    async fn test_successful_submission() {
        let client = Arc::new(FakeCompletionClient::new());
        client.push_reply("Hi there!");
        let mut session = session_with(&client);

        let reply = session.submit_message("Hello").await.unwrap();

        assert_eq!(reply, "Hi there!");
        assert_eq!(
            session.messages(),
            &[
                Message::assistant(GREETING),
                Message::user("Hello"),
                Message::assistant("Hi there!"),
            ]
        );
        assert_eq!(session.usage().count, 1);
        assert!(session.usage().last_used.is_some());
    }

    #[tokio::test]
    async fn test_failed_submission() {
        let client = Arc::new(FakeCompletionClient::new());
        client.push_error("timeout");
        let mut session = session_with(&client);

        let reply = session.submit_message("Hello").await.unwrap();

        assert_eq!(reply, "⚠️ Error: timeout");
        assert_eq!(
            session.messages().last(),
            Some(&Message::assistant("⚠️ Error: timeout"))
        );
        assert_eq!(session.usage().count, 0);
        assert!(session.usage().last_used.is_none());
    }

    #[tokio::test]
    async fn test_request_shape() {
        let client = Arc::new(FakeCompletionClient::new());
        client.push_reply("first");
        client.push_reply("second");
        let mut session = session_with(&client);

        session.submit_message("one").await.unwrap();
        session.submit_message("two").await.unwrap();

        let requests = client.requests();
        assert_eq!(requests.len(), 2);

        let first = &requests[0];
        assert_eq!(first.message, "one");
        assert_eq!(first.model, "command-r");
        assert!((first.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(
            first.chat_history,
            vec![HistoryEntry::new(ApiRole::Chatbot, GREETING)]
        );

        let second = &requests[1];
        assert_eq!(second.message, "two");
        assert_eq!(
            second.chat_history,
            vec![
                HistoryEntry::new(ApiRole::Chatbot, GREETING),
                HistoryEntry::new(ApiRole::User, "one"),
                HistoryEntry::new(ApiRole::Chatbot, "first"),
            ]
        );
    }

    #[tokio::test]
    async fn test_error_reply_is_sent_as_history() {
        let client = Arc::new(FakeCompletionClient::new());
        client.push_error("boom");
        client.push_reply("recovered");
        let mut session = session_with(&client);

        session.submit_message("a").await.unwrap();
        let reply = session.submit_message("b").await.unwrap();

        assert_eq!(reply, "recovered");
        let last_request = client.requests().pop().unwrap();
        assert_eq!(
            last_request.chat_history.last(),
            Some(&HistoryEntry::new(ApiRole::Chatbot, "⚠️ Error: boom"))
        );
        assert_eq!(session.usage().count, 1);
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected() {
        let client = Arc::new(FakeCompletionClient::new());
        let mut session = session_with(&client);

        for text in ["", "   ", "\n\t"] {
            let err = session.submit_message(text).await.unwrap_err();
            assert!(matches!(
                err.downcast_ref::<ChataiError>(),
                Some(ChataiError::EmptyMessage)
            ));
        }

        assert_eq!(session.len(), 1);
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_system_and_unknown_roles_in_history() {
        let client = Arc::new(FakeCompletionClient::new());
        client.push_reply("ok");
        let mut session = session_with(&client);
        session.push_message(Message::system("Be brief"));
        session.push_message(Message::new("tool", "42"));

        session.submit_message("go").await.unwrap();

        let history = &client.requests()[0].chat_history;
        assert_eq!(history[1].role, ApiRole::System);
        assert_eq!(history[2].role, ApiRole::User);
        assert_eq!(session.count_role(&Role::Assistant), 2);
    }

    #[tokio::test]
    async fn test_cancelled_submission_leaves_log_untouched() {
        let client = Arc::new(
            FakeCompletionClient::new().with_delay(std::time::Duration::from_millis(500)),
        );
        let mut session = session_with(&client);

        let outcome = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            session.submit_message("Hello"),
        )
        .await;

        assert!(outcome.is_err());
        assert_eq!(session.messages(), &[Message::assistant(GREETING)]);
        assert_eq!(session.usage().count, 0);
        assert_eq!(client.requests().len(), 1);
    }

    #[test]
    fn test_settings_from_config() {
        let provider = ProviderConfig {
            model: "command-light".to_string(),
            temperature: 0.1,
            ..ProviderConfig::default()
        };
        let chat = ChatConfig {
            greeting: "Yo".to_string(),
            ..ChatConfig::default()
        };
        let session =
            ChatSession::from_config(Arc::new(FakeCompletionClient::new()), &provider, &chat);

        assert_eq!(session.settings().model, "command-light");
        assert_eq!(session.messages()[0].content, "Yo");
    }
}
