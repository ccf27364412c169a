use subtle::ConstantTimeEq;

use crate::domain::ports::CredentialVerifier;

/// Accepts exactly one configured username/password pair.
///
/// With either half unset nothing matches, so every login is rejected.
/// Comparison runs in constant time over the bytes of both fields.
pub struct SingleUserVerifier {
    credentials: Option<(String, String)>,
}

impl SingleUserVerifier {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self {
            credentials: username.zip(password),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }
}

impl CredentialVerifier for SingleUserVerifier {
    fn verify(&self, username: &str, password: &str) -> bool {
        let Some((valid_username, valid_password)) = &self.credentials else {
            return false;
        };

        let username_ok = valid_username.as_bytes().ct_eq(username.as_bytes());
        let password_ok = valid_password.as_bytes().ct_eq(password.as_bytes());
        (username_ok & password_ok).into()
    }
}
