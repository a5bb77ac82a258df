//! Integration tests for the conversation session
//!
//! Covers the full submit cycle against a scripted client:
//! - greeting, reply and failure entries in the log
//! - history carried to the provider on each call
//! - usage counter and last-used timestamp

mod common;

use std::sync::Arc;
use std::time::Duration;

use chatai::error::ChataiError;
use chatai::providers::{ApiRole, FakeCompletionClient, HistoryEntry};
use chatai::session::{ChatSession, CompletionSettings, Message, Role, ERROR_PREFIX};
use common::{fake_session, GREETING};

#[tokio::test]
async fn test_fresh_session_holds_only_greeting() {
    let (session, client) = fake_session();

    assert_eq!(session.messages(), &[Message::assistant(GREETING)]);
    assert_eq!(session.usage().count, 0);
    assert!(session.usage().last_used.is_none());
    assert!(client.requests().is_empty());
}

#[tokio::test]
async fn test_first_exchange() {
    let (mut session, client) = fake_session();
    client.push_reply("Hi there!");

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

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].message, "Hello");
    assert_eq!(
        requests[0].chat_history,
        vec![HistoryEntry::new(ApiRole::Chatbot, GREETING)]
    );
    assert_eq!(requests[0].model, "command-r");
    assert!((requests[0].temperature - 0.7).abs() < f32::EPSILON);
}

#[tokio::test]
async fn test_second_call_carries_prior_exchange() {
    let (mut session, client) = fake_session();
    client.push_reply("Hi there!");
    client.push_reply("I'm fine.");

    session.submit_message("Hello").await.unwrap();
    session.submit_message("How are you?").await.unwrap();

    let second = &client.requests()[1];
    assert_eq!(second.message, "How are you?");
    assert_eq!(
        second.chat_history,
        vec![
            HistoryEntry::new(ApiRole::Chatbot, GREETING),
            HistoryEntry::new(ApiRole::User, "Hello"),
            HistoryEntry::new(ApiRole::Chatbot, "Hi there!"),
        ]
    );
    assert_eq!(session.len(), 5);
    assert_eq!(session.usage().count, 2);
}

#[tokio::test]
async fn test_failure_becomes_visible_reply() {
    let (mut session, client) = fake_session();
    client.push_error("timeout");

    let reply = session.submit_message("Hello").await.unwrap();

    assert_eq!(reply, "⚠️ Error: timeout");
    assert!(reply.starts_with(ERROR_PREFIX));
    assert_eq!(session.len(), 3);
    assert_eq!(session.messages()[2], Message::assistant("⚠️ Error: timeout"));
    assert_eq!(session.usage().count, 0);
    assert!(session.usage().last_used.is_none());
}

#[tokio::test]
async fn test_failure_does_not_touch_previous_timestamp() {
    let (mut session, client) = fake_session();
    client.push_reply("ok");
    client.push_error("down");

    session.submit_message("first").await.unwrap();
    let stamped = session.usage().last_used;

    session.submit_message("second").await.unwrap();

    assert_eq!(session.usage().count, 1);
    assert_eq!(session.usage().last_used, stamped);
}

#[tokio::test]
async fn test_failed_reply_is_sent_as_history_next_time() {
    let (mut session, client) = fake_session();
    client.push_error("timeout");
    client.push_reply("back");

    session.submit_message("Hello").await.unwrap();
    session.submit_message("Again").await.unwrap();

    let history = &client.requests()[1].chat_history;
    assert_eq!(
        history.last(),
        Some(&HistoryEntry::new(ApiRole::Chatbot, "⚠️ Error: timeout"))
    );
}

#[tokio::test]
async fn test_log_grows_by_two_per_submission() {
    let (mut session, client) = fake_session();
    client.push_reply("a");
    client.push_error("b");
    client.push_reply("c");
    client.push_error("d");

    for (n, text) in ["one", "two", "three", "four"].iter().enumerate() {
        session.submit_message(text).await.unwrap();
        assert_eq!(session.len(), 1 + 2 * (n + 1));
    }

    assert_eq!(session.count_role(&Role::User), 4);
    assert_eq!(session.usage().count, 2);
    assert!(session.usage().count as usize <= session.count_role(&Role::User));
}

#[tokio::test]
async fn test_empty_submission_is_rejected_without_call() {
    let (mut session, client) = fake_session();

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
async fn test_unknown_role_is_projected_as_user() {
    let (mut session, client) = fake_session();
    session.push_message(Message::new(Role::from("tool"), "lookup result"));

    session.submit_message("continue").await.unwrap();

    let history = &client.requests()[0].chat_history;
    assert_eq!(history[1], HistoryEntry::new(ApiRole::User, "lookup result"));
}

#[tokio::test]
async fn test_settings_are_fixed_per_session() {
    let client = Arc::new(FakeCompletionClient::new());
    let settings = CompletionSettings {
        model: "command-r-plus".to_string(),
        temperature: 0.2,
    };
    let mut session = ChatSession::new(client.clone(), settings, GREETING);

    session.submit_message("one").await.unwrap();
    session.submit_message("two").await.unwrap();

    for request in client.requests() {
        assert_eq!(request.model, "command-r-plus");
        assert!((request.temperature - 0.2).abs() < f32::EPSILON);
    }
}

#[tokio::test]
async fn test_sessions_do_not_share_state() {
    let client = Arc::new(FakeCompletionClient::new());
    let mut a = ChatSession::new(client.clone(), CompletionSettings::default(), GREETING);
    let b = ChatSession::new(client.clone(), CompletionSettings::default(), GREETING);

    a.submit_message("only a").await.unwrap();

    assert_eq!(a.len(), 3);
    assert_eq!(b.len(), 1);
    assert_eq!(b.usage().count, 0);
}

#[tokio::test]
async fn test_cancelled_submission_does_not_leave_dangling_user_entry() {
    let client = Arc::new(FakeCompletionClient::new().with_delay(Duration::from_millis(300)));
    let mut session = ChatSession::new(client.clone(), CompletionSettings::default(), GREETING);

    let cancelled =
        tokio::time::timeout(Duration::from_millis(50), session.submit_message("Hello")).await;
    assert!(cancelled.is_err());
    assert_eq!(session.len() % 2, 1);

    session.submit_message("Hello again").await.unwrap();

    assert_eq!(session.len(), 3);
    let retry = &client.requests()[1];
    assert_eq!(
        retry.chat_history,
        vec![HistoryEntry::new(ApiRole::Chatbot, GREETING)]
    );
}
