//! Signed-in session: persisted token and user profile, plus the broadcast
//! that tells every open screen when the auth state changes.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::User;
use crate::settings::UserSettings;

/// Storage key of the access token
pub const TOKEN_KEY: &str = "token";
/// Storage key of the serialized user profile
pub const USER_KEY: &str = "user";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Session storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session data is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

// ============================================================================
// Key/value storage
// ============================================================================

/// Minimal persistent string map backing the session
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&mut self, key: &str) -> Result<(), SessionError>;
}

/// In-memory store, used in tests and when no config directory exists
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// JSON file in the config directory holding every entry
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`
    pub fn open(path: PathBuf) -> Self {
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring unreadable session file {:?}: {}", path, e);
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        Self { path, entries }
    }

    /// Store in the standard config directory
    pub fn default_location() -> Result<Self, SessionError> {
        let dir = UserSettings::get_config_dir().ok_or(SessionError::NoConfigDir)?;
        Ok(Self::open(dir.join("session.json")))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn flush(&self) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

// ============================================================================
// Auth broadcast
// ============================================================================

/// Auth state change delivered to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(User),
    SignedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Fan-out of auth events to any number of subscribers
#[derive(Debug, Default)]
pub struct AuthBroadcast {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Sender<AuthEvent>)>,
}

impl AuthBroadcast {
    pub fn subscribe(&mut self) -> (SubscriptionId, Receiver<AuthEvent>) {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let (sender, receiver) = channel();
        self.subscribers.push((id, sender));
        (id, receiver)
    }

    /// Returns whether `id` was subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Deliver `event` to every live subscriber. Subscribers whose receiver
    /// was dropped are removed.
    pub fn publish(&mut self, event: AuthEvent) {
        debug!("Publishing auth event to {} subscriber(s)", self.subscribers.len());
        self.subscribers
            .retain(|(_, sender)| sender.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

// ============================================================================
// Session
// ============================================================================

pub struct Session {
    store: Box<dyn KeyValueStore>,
    broadcast: AuthBroadcast,
}

impl Session {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            store,
            broadcast: AuthBroadcast::default(),
        }
    }

    /// Session backed by the config directory, or memory if there is none
    pub fn load_default() -> Self {
        match FileStore::default_location() {
            Ok(store) => Self::new(Box::new(store)),
            Err(e) => {
                warn!("Session will not persist: {}", e);
                Self::new(Box::new(MemoryStore::default()))
            }
        }
    }

    pub fn broadcast(&mut self) -> &mut AuthBroadcast {
        &mut self.broadcast
    }

    pub fn subscribe(&mut self) -> (SubscriptionId, Receiver<AuthEvent>) {
        self.broadcast.subscribe()
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.broadcast.unsubscribe(id)
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Stored user profile, if present and parseable
    pub fn user(&self) -> Option<User> {
        let raw = self.store.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Stored user profile is unreadable: {}", e);
                None
            }
        }
    }

    /// Persist credentials. Subscribers are told only when `notify` is set;
    /// a fresh registration is stored without signing the UI in.
    pub fn login(&mut self, user: User, token: &str, notify: bool) -> Result<(), SessionError> {
        self.store.set(TOKEN_KEY, token)?;
        self.store.set(USER_KEY, &serde_json::to_string(&user)?)?;
        info!("Session stored for {}", user.email);
        if notify {
            self.broadcast.publish(AuthEvent::SignedIn(user));
        }
        Ok(())
    }

    /// Clear both entries and tell every subscriber
    pub fn logout(&mut self) -> Result<(), SessionError> {
        let result = self
            .store
            .remove(TOKEN_KEY)
            .and_then(|_| self.store.remove(USER_KEY));
        info!("Session cleared");
        self.broadcast.publish(AuthEvent::SignedOut);
        result
    }

    /// First half of a restore: the token to probe. Without one the session
    /// is announced as signed out.
    pub fn begin_restore(&mut self) -> Option<String> {
        let token = self.token();
        if token.is_none() {
            self.broadcast.publish(AuthEvent::SignedOut);
        }
        token
    }

    /// Second half of a restore, given the probe result
    pub fn complete_restore(&mut self, live: bool) -> Option<User> {
        let user = if live { self.user() } else { None };
        match &user {
            Some(user) => self.broadcast.publish(AuthEvent::SignedIn(user.clone())),
            None => self.broadcast.publish(AuthEvent::SignedOut),
        }
        user
    }

    /// Restore synchronously with `probe` deciding whether the token is live
    pub fn restore<P>(&mut self, probe: P) -> Option<User>
    where
        P: FnOnce(&str) -> bool,
    {
        let token = self.begin_restore()?;
        let live = probe(&token);
        self.complete_restore(live)
    }
}
