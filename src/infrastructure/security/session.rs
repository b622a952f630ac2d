use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

use crate::domain::admin::AdminSession;
use crate::domain::error::{AppError, Result};

pub const SESSION_COOKIE: &str = "arima_session";

/// In-memory admin sessions keyed by an opaque random token.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, AdminSession>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_minutes: i64) -> Result<Self> {
        let ttl = Duration::try_minutes(ttl_minutes).ok_or_else(|| {
            AppError::ConfigError(format!("session ttl out of range: {} minutes", ttl_minutes))
        })?;
        Ok(Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        })
    }

    pub fn create(&self, username: &str) -> Result<AdminSession> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::SecurityError("session expiry overflows".to_string()))?;
        let session = AdminSession {
            token: Uuid::new_v4().simple().to_string(),
            username: username.to_string(),
            created_at: now,
            expires_at,
        };
        self.lock().insert(session.token.clone(), session.clone());
        Ok(session)
    }

    /// Returns the live session for `token`. Expired sessions are pruned.
    pub fn resolve(&self, token: &str) -> Option<AdminSession> {
        let now = Utc::now();
        let mut sessions = self.lock();
        sessions.retain(|_, session| !session.is_expired(now));
        sessions.get(token).cloned()
    }

    pub fn revoke(&self, token: &str) -> bool {
        self.lock().remove(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, AdminSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_resolve() {
        let store = SessionStore::new(30).unwrap();
        let session = store.create("admin").unwrap();
        assert_eq!(session.token.len(), 32);

        let resolved = store.resolve(&session.token).unwrap();
        assert_eq!(resolved.username, "admin");
        assert!(store.resolve("unknown").is_none());
    }

    #[test]
    fn test_revoke() {
        let store = SessionStore::new(30).unwrap();
        let session = store.create("admin").unwrap();
        assert!(store.revoke(&session.token));
        assert!(!store.revoke(&session.token));
        assert!(store.resolve(&session.token).is_none());
    }

    #[test]
    fn test_expired_sessions_are_pruned() {
        let store = SessionStore::new(0).unwrap();
        let session = store.create("admin").unwrap();
        assert!(store.resolve(&session.token).is_none());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_clones_share_sessions() {
        let store = SessionStore::new(30).unwrap();
        let other = store.clone();
        let session = store.create("admin").unwrap();
        assert!(other.resolve(&session.token).is_some());
    }

    #[test]
    fn test_out_of_range_ttl_is_rejected() {
        assert!(matches!(
            SessionStore::new(i64::MAX),
            Err(AppError::ConfigError(_))
        ));
        let store = SessionStore::new(525_600).unwrap();
        assert!(store.create("admin").is_ok());
    }
}
