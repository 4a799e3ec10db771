//! Session state and its tab-scoped backing store.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A bearer token and the instant it was issued.
///
/// The two are only ever stored and removed together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredToken {
    pub token: String,
    /// Epoch milliseconds.
    pub issued_at: i64,
}

impl StoredToken {
    pub fn new(token: impl Into<String>, issued_at: i64) -> Self {
        Self {
            token: token.into(),
            issued_at,
        }
    }

    /// Milliseconds elapsed between issue and `now_ms`.
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.issued_at)
    }
}

/// Snapshot of everything the store holds.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: Option<StoredToken>,
    pub display_email: Option<String>,
}

impl Session {
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.display_email.is_none()
    }
}

/// Backing storage for the session.
///
/// Implementations must be safe to share between tasks; the client holds
/// one as `Arc<dyn SessionStore>`.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Session;

    /// Replace any stored token (and its timestamp) with `token`.
    fn store_token(&self, token: StoredToken);

    fn store_display_email(&self, email: &str);

    /// Remove token, timestamp and display email. Idempotent.
    fn clear(&self);
}

/// In-memory store living as long as the process, the equivalent of a
/// browser tab's session storage.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        // The guarded value is plain data, so a poisoned lock is still usable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Session {
        self.lock().clone()
    }

    fn store_token(&self, token: StoredToken) {
        debug!(issued_at = token.issued_at, "Storing session token");
        self.lock().token = Some(token);
    }

    fn store_display_email(&self, email: &str) {
        self.lock().display_email = Some(email.to_string());
    }

    fn clear(&self) {
        let mut guard = self.lock();
        if !guard.is_empty() {
            debug!("Clearing session");
        }
        *guard = Session::default();
    }
}
