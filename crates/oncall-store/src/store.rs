use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::debug;

use oncall_core::config::ChatConfig;
use oncall_core::types::{Message, Role};
use oncall_core::{OncallError, Session};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl From<StoreError> for OncallError {
    fn from(err: StoreError) -> Self {
        OncallError::Store(err.to_string())
    }
}

/// Capacity and lifetime limits for the store.
#[derive(Debug, Clone, Copy)]
pub struct StoreLimits {
    /// Messages retained per conversation, oldest evicted first.
    pub history_cap: usize,
    /// Live session ceiling; exceeding it evicts the least recently used.
    pub max_sessions: usize,
    /// Idle minutes after which a session is evicted.
    pub session_ttl_minutes: u32,
}

impl Default for StoreLimits {
    fn default() -> Self {
        Self {
            history_cap: 50,
            max_sessions: 1000,
            session_ttl_minutes: 720,
        }
    }
}

impl From<&ChatConfig> for StoreLimits {
    fn from(config: &ChatConfig) -> Self {
        Self {
            history_cap: config.history_cap,
            max_sessions: config.max_sessions,
            session_ttl_minutes: config.session_ttl_minutes,
        }
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    sessions: HashMap<String, Session>,
    messages: HashMap<String, Vec<Message>>,
}

/// Thread-safe store of sessions and their message history.
#[derive(Debug)]
pub struct ConversationStore {
    inner: Mutex<StoreInner>,
    limits: StoreLimits,
}

impl ConversationStore {
    pub fn new(limits: StoreLimits) -> Self {
        Self {
            inner: Mutex::new(StoreInner::default()),
            limits,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, StoreInner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Fetch a snapshot of the session, creating it with default state on
    /// first access.
    pub fn get_or_create(&self, id: &str) -> Result<Session, StoreError> {
        let mut inner = self.lock()?;
        Self::evict(&mut inner, &self.limits, id);
        let session = inner
            .sessions
            .entry(id.to_string())
            .or_insert_with(|| Session::new(id));
        Ok(session.clone())
    }

    /// Run a closure against the live session under the store lock.
    ///
    /// The session is created if missing and its activity timestamp is
    /// refreshed. This is the only mutation path, so a read-modify-write
    /// for one conversation id can never interleave with another.
    pub fn with_session<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Result<R, StoreError> {
        let mut inner = self.lock()?;
        Self::evict(&mut inner, &self.limits, id);
        let session = inner
            .sessions
            .entry(id.to_string())
            .or_insert_with(|| Session::new(id));
        session.touch();
        Ok(f(session))
    }

    /// Merge updated fields into the stored session.
    pub fn update(&self, session: Session) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.sessions.insert(session.id.clone(), session);
        Ok(())
    }

    /// Append a message to the conversation, truncating to the history cap.
    pub fn append(&self, id: &str, message: Message) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let history = inner.messages.entry(id.to_string()).or_default();
        history.push(message);
        let cap = self.limits.history_cap;
        if history.len() > cap {
            let excess = history.len() - cap;
            history.drain(..excess);
        }
        Ok(())
    }

    /// Convenience wrapper for the common role + content case.
    pub fn append_text(&self, id: &str, role: Role, content: &str) -> Result<(), StoreError> {
        self.append(id, Message::new(role, content))
    }

    /// Full message history, oldest first.
    pub fn history(&self, id: &str) -> Result<Vec<Message>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.messages.get(id).cloned().unwrap_or_default())
    }

    /// The most recent `n` messages, oldest first.
    pub fn recent_history(&self, id: &str, n: usize) -> Result<Vec<Message>, StoreError> {
        let inner = self.lock()?;
        let history = match inner.messages.get(id) {
            Some(h) => h,
            None => return Ok(Vec::new()),
        };
        let start = history.len().saturating_sub(n);
        Ok(history[start..].to_vec())
    }

    /// Remove a session and its history.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        let existed = inner.sessions.remove(id).is_some();
        inner.messages.remove(id);
        Ok(existed)
    }

    pub fn session_count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.sessions.len())
    }

    /// Drop sessions idle past the TTL, then least-recently-used sessions
    /// past the ceiling when `incoming_id` is about to create a new one.
    /// History is removed alongside the session.
    fn evict(inner: &mut StoreInner, limits: &StoreLimits, incoming_id: &str) {
        let cutoff = Utc::now() - Duration::minutes(i64::from(limits.session_ttl_minutes));
        let stale: Vec<String> = inner
            .sessions
            .values()
            .filter(|s| s.last_active_at < cutoff)
            .map(|s| s.id.clone())
            .collect();
        for id in &stale {
            inner.sessions.remove(id);
            inner.messages.remove(id);
            debug!("Evicted expired session {}", id);
        }

        if inner.sessions.contains_key(incoming_id) {
            return;
        }
        while inner.sessions.len() >= limits.max_sessions {
            let oldest = inner
                .sessions
                .values()
                .min_by_key(|s| s.last_active_at)
                .map(|s| s.id.clone());
            match oldest {
                Some(id) => {
                    inner.sessions.remove(&id);
                    inner.messages.remove(&id);
                    debug!("Evicted least recently used session {}", id);
                }
                None => break,
            }
        }
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(StoreLimits::default())
    }
}
