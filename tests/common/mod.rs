use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use chatai::providers::FakeCompletionClient;
use chatai::session::{ChatSession, CompletionSettings};

pub const GREETING: &str = "How can I help you today?";

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Fresh session over a shared fake client
#[allow(dead_code)]
pub fn fake_session() -> (ChatSession, Arc<FakeCompletionClient>) {
    let client = Arc::new(FakeCompletionClient::new());
    let session = ChatSession::new(client.clone(), CompletionSettings::default(), GREETING);
    (session, client)
}
