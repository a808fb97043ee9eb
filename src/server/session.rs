// Admin sessions.
// Tokens issued after a correct admin password, carried in a cookie.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderMap, header::COOKIE};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::cache::Clock;

pub const SESSION_COOKIE: &str = "folio_session";

/// Default admin session lifetime: one day.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Live admin session tokens with their issue time. Cleared on restart.
///
/// A token stops counting as admin once it is older than the ttl; expired
/// tokens are dropped whenever a new session starts.
pub struct SessionStore {
    clock: Arc<dyn Clock>,
    ttl: Duration,
    tokens: RwLock<HashMap<Uuid, DateTime<Utc>>>,
}

impl SessionStore {
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            clock,
            ttl,
            tokens: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_live(&self, issued_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(issued_at)
            .to_std()
            .is_ok_and(|age| age < self.ttl)
    }

    /// Start an admin session and return its token.
    pub async fn create(&self) -> Uuid {
        let now = self.clock.now();
        let token = Uuid::new_v4();

        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, issued_at| self.is_live(*issued_at, now));
        if tokens.len() < before {
            debug!(expired = before - tokens.len(), "pruned admin sessions");
        }
        tokens.insert(token, now);
        token
    }

    pub async fn is_admin(&self, token: Uuid) -> bool {
        let now = self.clock.now();
        self.tokens
            .read()
            .await
            .get(&token)
            .is_some_and(|issued_at| self.is_live(*issued_at, now))
    }

    /// End a session. Returns false if the token was not known.
    pub async fn destroy(&self, token: Uuid) -> bool {
        self.tokens.write().await.remove(&token).is_some()
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }
}

/// Session token from the request's `Cookie` headers, if present and well formed.
pub fn session_token(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value that installs a session token.
pub fn session_cookie(token: Uuid, ttl: Duration) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        ttl.as_secs()
    )
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{}=; HttpOnly; Path=/; Max-Age=0", SESSION_COOKIE)
}
