// Authenticated session record stored in memory, keyed by its token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionRecord {
    pub username: String,
    // Epoch milliseconds.
    pub created_at: u64,
    pub expires_at: u64,
}

impl SessionRecord {
    // A record is logically gone once its expiry is reached.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.expires_at <= now_ms
    }
}

// Realtime session minted by the upstream API.
// Either field may be missing upstream; both are relayed as-is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RealtimeSession {
    pub id: Option<String>,
    pub ephemeral_key: Option<String>,
}
