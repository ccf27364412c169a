use crate::domain::errors::AuthError;
use crate::domain::ports::{Clock, CredentialVerifier, SessionStore};
use crate::use_cases::session_registry::SessionRegistry;

// Response returned by the login use case.
pub struct LoginOutcome {
    pub token: String,
    pub expires_at: u64,
}

// Login use case with injected dependencies.
pub struct LoginUseCase<'a, C, S> {
    pub verifier: &'a dyn CredentialVerifier,
    pub registry: &'a SessionRegistry<C, S>,
}

impl<C, S> LoginUseCase<'_, C, S>
where
    C: Clock,
    S: SessionStore,
{
    // Missing fields never match; no session is created on a mismatch.
    pub async fn execute(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<LoginOutcome, AuthError> {
        let (Some(username), Some(password)) = (username, password) else {
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verifier.verify(username, password) {
            return Err(AuthError::InvalidCredentials);
        }

        // create() only fails when the store does.
        let issued = self
            .registry
            .create(username)
            .await
            .map_err(|_| AuthError::StorageFailure)?;

        Ok(LoginOutcome {
            token: issued.token,
            expires_at: issued.record.expires_at,
        })
    }
}
