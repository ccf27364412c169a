use std::fmt;

// Errors raised while logging in.
#[derive(Debug)]
pub enum AuthError {
    InvalidCredentials,
    StorageFailure,
}

// Errors raised by the session gate on protected routes.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionError {
    MissingToken,
    InvalidSession,
    SessionExpired,
    StorageFailure,
}

// Errors raised while exchanging a session for an ephemeral key.
#[derive(Debug)]
pub enum ExchangeError {
    // Upstream endpoint or key is not configured.
    Configuration,
    // Upstream answered with a non-success status.
    Upstream { status: u16, body: String },
    // Transport, timeout or decode failure.
    Internal(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "invalid username or password"),
            AuthError::StorageFailure => write!(f, "session storage error"),
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::MissingToken => write!(f, "Unauthorized: missing token"),
            SessionError::InvalidSession => write!(f, "Unauthorized: invalid session"),
            SessionError::SessionExpired => write!(f, "Unauthorized: expired session"),
            SessionError::StorageFailure => write!(f, "session storage error"),
        }
    }
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeError::Configuration => {
                write!(f, "upstream endpoint or api key not configured")
            }
            ExchangeError::Upstream { status, body } => {
                write!(f, "upstream error {status}: {body}")
            }
            ExchangeError::Internal(message) => write!(f, "token exchange failed: {message}"),
        }
    }
}

impl std::error::Error for AuthError {}
impl std::error::Error for SessionError {}
impl std::error::Error for ExchangeError {}
