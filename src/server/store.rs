//! Live chat sessions of the web host
//!
//! One [`ChatSession`] exists per connected browser client. Sessions share
//! the completion client handle but nothing else; each sits behind its own
//! async mutex so a second submission cannot start while a reply is pending.
//!
//! Browsers do not always say goodbye, so a store built with an idle timeout
//! discards sessions that have not been looked up for that long. Expired
//! entries are swept on every `create`/`get` and by [`spawn_idle_sweeper`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use crate::error::{ChataiError, Result};
use crate::providers::CompletionClient;
use crate::session::metrics::{session_closed, session_opened};
use crate::session::{ChatSession, CompletionSettings};

/// Shared handle to one session
pub type SessionHandle = Arc<Mutex<ChatSession>>;

struct SessionEntry {
    handle: SessionHandle,
    last_active: Instant,
}

impl SessionEntry {
    /// Idle past `timeout` and not held by an in-flight request
    fn is_expired(&self, now: Instant, timeout: Duration) -> bool {
        now.duration_since(self.last_active) >= timeout && self.handle.try_lock().is_ok()
    }
}

/// Registry of live sessions keyed by id
pub struct SessionStore {
    client: Arc<dyn CompletionClient>,
    settings: CompletionSettings,
    greeting: String,
    idle_timeout: Option<Duration>,
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
}

impl SessionStore {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        settings: CompletionSettings,
        greeting: impl Into<String>,
    ) -> Self {
        Self {
            client,
            settings,
            greeting: greeting.into(),
            idle_timeout: None,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Discard sessions left idle for `timeout`; `None` keeps them until deleted
    pub fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout
    }

    /// Start a new session and return its id and handle
    pub fn create(&self) -> Result<(Uuid, SessionHandle)> {
        self.evict_expired()?;

        let id = Uuid::new_v4();
        let session = ChatSession::new(
            self.client.clone(),
            self.settings.clone(),
            self.greeting.clone(),
        );
        let handle = Arc::new(Mutex::new(session));

        self.write()?.insert(
            id,
            SessionEntry {
                handle: handle.clone(),
                last_active: Instant::now(),
            },
        );
        session_opened();
        tracing::info!(session = %id, "Session started");

        Ok((id, handle))
    }

    /// Look up a live session and mark it active
    ///
    /// # Errors
    ///
    /// Returns [`ChataiError::SessionNotFound`] for unknown, ended or expired ids
    pub fn get(&self, id: &Uuid) -> Result<SessionHandle> {
        self.evict_expired()?;

        let mut sessions = self.write()?;
        let entry = sessions
            .get_mut(id)
            .ok_or_else(|| ChataiError::SessionNotFound(id.to_string()))?;
        entry.last_active = Instant::now();
        Ok(entry.handle.clone())
    }

    /// End a session, dropping its log and usage counter
    ///
    /// # Errors
    ///
    /// Returns [`ChataiError::SessionNotFound`] for unknown or ended ids
    pub fn remove(&self, id: &Uuid) -> Result<()> {
        match self.write()?.remove(id) {
            Some(_) => {
                session_closed();
                tracing::info!(session = %id, "Session ended");
                Ok(())
            }
            None => Err(ChataiError::SessionNotFound(id.to_string()).into()),
        }
    }

    /// Drop every session idle past the timeout, returning how many went
    ///
    /// Sessions with a reply in flight are kept regardless of age.
    pub fn evict_expired(&self) -> Result<usize> {
        let Some(timeout) = self.idle_timeout else {
            return Ok(0);
        };

        let now = Instant::now();
        let mut sessions = self.write()?;
        let expired: Vec<Uuid> = sessions
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, timeout))
            .map(|(id, _)| *id)
            .collect();

        for id in &expired {
            sessions.remove(id);
            session_closed();
            tracing::info!(session = %id, "Session expired after {:?} idle", timeout);
        }

        Ok(expired.len())
    }

    pub fn len(&self) -> usize {
        self.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<Uuid, SessionEntry>>> {
        self.sessions
            .read()
            .map_err(|_| ChataiError::Config("session store lock poisoned".to_string()).into())
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<Uuid, SessionEntry>>> {
        self.sessions
            .write()
            .map_err(|_| ChataiError::Config("session store lock poisoned".to_string()).into())
    }
}

/// Periodically evict idle sessions in the background
///
/// Returns `None` when the store has no idle timeout.
pub fn spawn_idle_sweeper(store: Arc<SessionStore>) -> Option<JoinHandle<()>> {
    let timeout = store.idle_timeout()?;
    let period = timeout.min(Duration::from_secs(60));

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            match store.evict_expired() {
                Ok(0) => {}
                Ok(n) => tracing::debug!("Swept {} idle sessions", n),
                Err(e) => tracing::warn!("Idle session sweep failed: {:#}", e),
            }
        }
    }))
}
