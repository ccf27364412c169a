use async_trait::async_trait;

use crate::domain::entities::{RealtimeSession, SessionRecord};
use crate::domain::errors::ExchangeError;

// Port for session storage used by the session registry.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, token: String, session: SessionRecord) -> Result<(), String>;
    async fn get(&self, token: &str) -> Result<Option<SessionRecord>, String>;
    async fn remove(&self, token: &str) -> Result<bool, String>;
    // Drops every record expired at `now_ms`, returning how many went.
    async fn remove_expired(&self, now_ms: u64) -> Result<usize, String>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_millis(&self) -> u64;
}

// Decides whether a submitted username/password pair may log in.
// Single-pair today; a multi-user backend only needs another impl.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

// The handler depends on this trait, not the concrete reqwest client.
#[async_trait]
pub trait RealtimeSessionProvider: Send + Sync {
    async fn create_session(&self) -> Result<RealtimeSession, ExchangeError>;
}
