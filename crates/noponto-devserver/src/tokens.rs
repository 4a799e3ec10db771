//! Registry of bearer tokens issued by `/auth/login`.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct IssuedToken {
    email: String,
    issued_at: DateTime<Utc>,
}

/// Issues tokens and answers whether a presented token is still honoured.
#[derive(Clone)]
pub struct TokenRegistry {
    ttl: Duration,
    tokens: Arc<RwLock<HashMap<String, IssuedToken>>>,
}

impl TokenRegistry {
    pub fn new(ttl_ms: i64) -> Self {
        Self {
            ttl: Duration::milliseconds(ttl_ms),
            tokens: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Issue a fresh random token for `email`.
    pub async fn issue(&self, email: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let mut tokens = self.tokens.write().await;
        tokens.insert(
            token.clone(),
            IssuedToken {
                email: email.to_string(),
                issued_at: Utc::now(),
            },
        );
        token
    }

    /// The email the token was issued to, if the token is known and younger
    /// than the TTL.
    pub async fn validate(&self, token: &str) -> Option<String> {
        let tokens = self.tokens.read().await;
        let entry = tokens.get(token)?;
        if self.is_fresh(entry) {
            Some(entry.email.clone())
        } else {
            None
        }
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    /// Drop tokens older than the TTL.
    pub async fn purge_expired(&self) {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        let ttl = self.ttl;
        let now = Utc::now();
        tokens.retain(|_, entry| now - entry.issued_at < ttl);
        let removed = before - tokens.len();
        if removed > 0 {
            debug!(removed, "Purged expired tokens");
        }
    }

    fn is_fresh(&self, entry: &IssuedToken) -> bool {
        Utc::now() - entry.issued_at < self.ttl
    }
}
