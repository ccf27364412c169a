use rand::Rng;

use crate::domain::entities::SessionRecord;
use crate::domain::errors::SessionError;
use crate::domain::ports::{Clock, SessionStore};

// Session lifetime used when nothing else is configured.
pub const DEFAULT_SESSION_TTL_MS: u64 = 24 * 60 * 60 * 1000;

// 32 random bytes, hex encoded to 64 chars.
const TOKEN_BYTES: usize = 32;

// Token and record handed back after a session is created.
pub struct IssuedSession {
    pub token: String,
    pub record: SessionRecord,
}

/// Owns the token -> session mapping.
///
/// Handlers only ever see `create`, `validate` and `purge_expired`; the
/// backing store stays behind the [`SessionStore`] port. Expired records are
/// evicted lazily when `validate` trips over them.
pub struct SessionRegistry<C, S> {
    clock: C,
    store: S,
    ttl_ms: u64,
}

impl<C, S> SessionRegistry<C, S>
where
    C: Clock,
    S: SessionStore,
{
    pub fn new(clock: C, store: S, ttl_ms: u64) -> Self {
        Self {
            clock,
            store,
            ttl_ms,
        }
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    pub async fn create(&self, username: &str) -> Result<IssuedSession, SessionError> {
        let token = generate_session_token();
        let created_at = self.clock.now_epoch_millis();
        let record = SessionRecord {
            username: username.to_string(),
            created_at,
            expires_at: created_at.saturating_add(self.ttl_ms),
        };

        self.store
            .insert(token.clone(), record.clone())
            .await
            .map_err(|_| SessionError::StorageFailure)?;

        Ok(IssuedSession { token, record })
    }

    pub async fn validate(&self, token: Option<&str>) -> Result<SessionRecord, SessionError> {
        let token = match token {
            Some(token) if !token.is_empty() => token,
            _ => return Err(SessionError::MissingToken),
        };

        let session = self
            .store
            .get(token)
            .await
            .map_err(|_| SessionError::StorageFailure)?
            .ok_or(SessionError::InvalidSession)?;

        if session.is_expired(self.clock.now_epoch_millis()) {
            // Lazy eviction; a failed remove still reports the expiry.
            if let Err(err) = self.store.remove(token).await {
                tracing::warn!(error = %err, "failed to evict expired session");
            }
            return Err(SessionError::SessionExpired);
        }

        Ok(session)
    }

    pub async fn purge_expired(&self) -> Result<usize, SessionError> {
        self.store
            .remove_expired(self.clock.now_epoch_millis())
            .await
            .map_err(|_| SessionError::StorageFailure)
    }
}

fn generate_session_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill(&mut bytes);
    hex::encode(bytes)
}

// Short prefix of a token, safe to put in logs.
pub fn token_prefix(token: &str) -> &str {
    token.get(..8).unwrap_or(token)
}
