pub mod entities;
pub mod errors;
pub mod ports;

// Re-export the domain boundary types and ports.
pub use entities::{RealtimeSession, SessionRecord};
pub use errors::{AuthError, ExchangeError, SessionError};
pub use ports::{Clock, CredentialVerifier, RealtimeSessionProvider, SessionStore};
