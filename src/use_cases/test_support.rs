use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::entities::{RealtimeSession, SessionRecord};
use crate::domain::errors::ExchangeError;
use crate::domain::ports::{Clock, RealtimeSessionProvider, SessionStore};

pub(crate) type SessionTable = Arc<Mutex<HashMap<String, SessionRecord>>>;

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) u64);

impl Clock for FixedClock {
    fn now_epoch_millis(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub insert: bool,
    pub get: bool,
    pub remove: bool,
}

#[derive(Clone)]
pub(crate) struct RecordingStore {
    sessions: SessionTable,
    failures: FailureFlags,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_session(
        &self,
        token: impl Into<String>,
        username: &str,
        created_at: u64,
        expires_at: u64,
    ) {
        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.insert(
            token.into(),
            SessionRecord {
                username: username.to_string(),
                created_at,
                expires_at,
            },
        );
    }

    pub(crate) fn get_test_session(&self, token: &str) -> Option<SessionRecord> {
        let guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.get(token).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.sessions.lock().expect("sessions mutex poisoned").len()
    }
}

#[async_trait]
impl SessionStore for RecordingStore {
    async fn insert(&self, token: String, session: SessionRecord) -> Result<(), String> {
        if self.failures.insert {
            return Err("insert failed".to_string());
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.insert(token, session);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<SessionRecord>, String> {
        if self.failures.get {
            return Err("get failed".to_string());
        }

        let guard = self.sessions.lock().expect("sessions mutex poisoned");
        Ok(guard.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> Result<bool, String> {
        if self.failures.remove {
            return Err("remove failed".to_string());
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        Ok(guard.remove(token).is_some())
    }

    async fn remove_expired(&self, now_ms: u64) -> Result<usize, String> {
        if self.failures.remove {
            return Err("remove failed".to_string());
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        let before = guard.len();
        guard.retain(|_, session| !session.is_expired(now_ms));
        Ok(before - guard.len())
    }
}

// Canned upstream that counts how often it was asked for a session.
pub(crate) struct StubProvider {
    pub calls: AtomicUsize,
    outcome: fn() -> Result<RealtimeSession, ExchangeError>,
}

impl StubProvider {
    pub(crate) fn new(outcome: fn() -> Result<RealtimeSession, ExchangeError>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            outcome,
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RealtimeSessionProvider for StubProvider {
    async fn create_session(&self) -> Result<RealtimeSession, ExchangeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.outcome)()
    }
}
