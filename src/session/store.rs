//! In-memory session store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use dashmap::DashMap;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::IdentityUser;
use crate::observability::metrics;

/// Upper bound on in-flight logins held at once.
pub const DEFAULT_MAX_PENDING_LOGINS: usize = 10_000;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// The signed-in user as exposed to handlers and `/api/auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub sub: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub email_verified: bool,
    pub picture: Option<String>,
}

impl SessionUser {
    /// Name to show in the navigation bar.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.sub)
    }
}

impl From<IdentityUser> for SessionUser {
    fn from(user: IdentityUser) -> Self {
        Self {
            sub: user.sub,
            name: user.name,
            email: user.email,
            email_verified: user.email_verified,
            picture: user.picture,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub user: SessionUser,
    /// Seconds since epoch.
    pub created_at: u64,
    pub expires_at: u64,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= now_secs()
    }
}

#[derive(Debug, Clone)]
struct PendingLogin {
    return_to: String,
    expires_at: u64,
    /// Insertion order, for eviction.
    seq: u64,
}

/// A thread-safe store of sessions and in-flight logins.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<Uuid, Session>>,
    pending: Arc<DashMap<String, PendingLogin>>,
    next_seq: Arc<AtomicU64>,
    ttl_secs: u64,
    login_ttl_secs: u64,
    max_pending: usize,
}

impl SessionStore {
    /// Create a new empty store.
    pub fn new(ttl_secs: u64, login_ttl_secs: u64) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            pending: Arc::new(DashMap::new()),
            next_seq: Arc::new(AtomicU64::new(0)),
            ttl_secs,
            login_ttl_secs,
            max_pending: DEFAULT_MAX_PENDING_LOGINS,
        }
    }

    /// Override the in-flight login cap.
    pub fn with_pending_limit(mut self, max_pending: usize) -> Self {
        self.max_pending = max_pending.max(1);
        self
    }

    /// Start a session for a freshly authenticated user.
    pub fn create(&self, user: SessionUser) -> Session {
        let now = now_secs();
        let session = Session {
            id: Uuid::new_v4(),
            user,
            created_at: now,
            expires_at: now.saturating_add(self.ttl_secs),
        };
        self.sessions.insert(session.id, session.clone());
        metrics::record_sessions(self.sessions.len());
        session
    }

    /// Live session by id. Expired sessions are dropped on access.
    pub fn get(&self, id: &Uuid) -> Option<Session> {
        let session = self.sessions.get(id).map(|r| r.value().clone())?;
        if session.is_expired() {
            self.remove(id);
            return None;
        }
        Some(session)
    }

    /// Record the provider's latest verification status.
    pub fn mark_verified(&self, id: &Uuid, verified: bool) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                entry.user.email_verified = verified;
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, id: &Uuid) -> Option<Session> {
        let removed = self.sessions.remove(id).map(|(_, s)| s);
        metrics::record_sessions(self.sessions.len());
        removed
    }

    /// Drop expired sessions and stale login states. Returns sessions removed.
    pub fn purge_expired(&self) -> usize {
        let now = now_secs();
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.expires_at > now);
        self.pending.retain(|_, p| p.expires_at > now);
        let removed = before.saturating_sub(self.sessions.len());
        metrics::record_sessions(self.sessions.len());
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// In-flight logins currently held.
    pub fn pending_logins(&self) -> usize {
        self.pending.len()
    }

    /// Register a login attempt; the returned `state` goes to the provider.
    ///
    /// At the cap, stale states are dropped first, then the oldest ones, so
    /// the map never exceeds `max_pending`.
    pub fn begin_login(&self, return_to: &str) -> String {
        if self.pending.len() >= self.max_pending {
            self.make_pending_room();
        }

        let state: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        self.pending.insert(
            state.clone(),
            PendingLogin {
                return_to: return_to.to_string(),
                expires_at: now_secs().saturating_add(self.login_ttl_secs),
                seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            },
        );
        state
    }

    fn make_pending_room(&self) {
        let now = now_secs();
        self.pending.retain(|_, p| p.expires_at > now);

        while self.pending.len() >= self.max_pending {
            let oldest = self
                .pending
                .iter()
                .min_by_key(|entry| entry.value().seq)
                .map(|entry| entry.key().clone());
            match oldest {
                Some(key) => {
                    self.pending.remove(&key);
                }
                None => break,
            }
        }
        tracing::debug!(pending = self.pending.len(), "Login state cap reached, evicted oldest");
    }

    /// Consume a login `state`. Unknown, reused or stale states yield `None`.
    pub fn complete_login(&self, state: &str) -> Option<String> {
        let (_, pending) = self.pending.remove(state)?;
        if pending.expires_at <= now_secs() {
            return None;
        }
        Some(pending.return_to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(verified: bool) -> SessionUser {
        SessionUser {
            sub: "auth0|42".into(),
            name: None,
            email: Some("fan@example.com".into()),
            email_verified: verified,
            picture: None,
        }
    }

    #[test]
    fn test_session_lifecycle() {
        let store = SessionStore::new(3600, 600);
        assert!(store.is_empty());

        let session = store.create(user(false));
        let loaded = store.get(&session.id).unwrap();
        assert_eq!(loaded.user.display_name(), "fan@example.com");
        assert!(!loaded.user.email_verified);

        assert!(store.mark_verified(&session.id, true));
        assert!(store.get(&session.id).unwrap().user.email_verified);

        store.remove(&session.id);
        assert!(store.get(&session.id).is_none());
        assert!(!store.mark_verified(&session.id, true));
    }

    #[test]
    fn test_expired_sessions() {
        let store = SessionStore::new(0, 0);
        let session = store.create(user(true));
        assert!(session.is_expired());
        assert_eq!(store.purge_expired(), 1);

        let again = store.create(user(true));
        assert!(store.get(&again.id).is_none());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_login_state_single_use() {
        let store = SessionStore::new(3600, 600);
        let state = store.begin_login("/dashboard");
        assert_eq!(state.len(), 32);

        assert_eq!(store.complete_login(&state).as_deref(), Some("/dashboard"));
        assert!(store.complete_login(&state).is_none());
        assert!(store.complete_login("forged").is_none());
    }

    #[test]
    fn test_pending_logins_are_capped() {
        let store = SessionStore::new(3600, 600).with_pending_limit(3);
        let first = store.begin_login("/first");
        for _ in 0..10 {
            store.begin_login("/");
        }
        assert_eq!(store.pending_logins(), 3);
        assert!(store.complete_login(&first).is_none());

        let newest = store.begin_login("/newest");
        assert_eq!(store.pending_logins(), 3);
        assert_eq!(store.complete_login(&newest).as_deref(), Some("/newest"));
    }

    #[test]
    fn test_stale_login_state() {
        let store = SessionStore::new(3600, 0);
        let state = store.begin_login("/");
        assert!(store.complete_login(&state).is_none());
    }
}
