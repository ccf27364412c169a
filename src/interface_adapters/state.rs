use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

use crate::domain::entities::SessionRecord;
use crate::domain::ports::{Clock, CredentialVerifier, RealtimeSessionProvider, SessionStore};
use crate::use_cases::SessionRegistry;

// Registry as wired into the running server.
pub type ProxySessionRegistry = SessionRegistry<SystemClock, InMemorySessionStore>;

// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    registry: Arc<ProxySessionRegistry>,
    // We use Arc<dyn Trait> to hold any implementation (dependency injection).
    verifier: Arc<dyn CredentialVerifier>,
    realtime: Arc<dyn RealtimeSessionProvider>,
    webrtc_url: Option<String>,
}

impl AppState {
    pub fn new(
        registry: ProxySessionRegistry,
        verifier: Arc<dyn CredentialVerifier>,
        realtime: Arc<dyn RealtimeSessionProvider>,
        webrtc_url: Option<String>,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            verifier,
            realtime,
            webrtc_url,
        }
    }

    pub fn session_registry(&self) -> &ProxySessionRegistry {
        &self.registry
    }

    pub(crate) fn verifier(&self) -> &dyn CredentialVerifier {
        self.verifier.as_ref()
    }

    pub(crate) fn realtime(&self) -> &dyn RealtimeSessionProvider {
        self.realtime.as_ref()
    }

    pub(crate) fn webrtc_url(&self) -> Option<&str> {
        self.webrtc_url.as_deref()
    }
}

// In-memory session store adapter; every call is a single locked map operation.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, SessionRecord>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn with_sessions(sessions: HashMap<String, SessionRecord>) -> Self {
        Self {
            sessions: Mutex::new(sessions),
        }
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, token: String, session: SessionRecord) -> Result<(), String> {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(token, session);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<SessionRecord>, String> {
        let sessions = self.sessions.lock().await;
        Ok(sessions.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> Result<bool, String> {
        let mut sessions = self.sessions.lock().await;
        Ok(sessions.remove(token).is_some())
    }

    async fn remove_expired(&self, now_ms: u64) -> Result<usize, String> {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now_ms));
        Ok(before - sessions.len())
    }
}

// System clock adapter used by the session registry.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_millis(&self) -> u64 {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
    }
}
