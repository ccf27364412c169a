use crate::domain::errors::ExchangeError;
use crate::domain::ports::RealtimeSessionProvider;

// Payload relayed to a caller holding a valid session.
#[derive(Debug)]
pub struct TokenExchangeOutcome {
    pub session_id: Option<String>,
    pub ephemeral_key: Option<String>,
    pub webrtc_url: Option<String>,
}

// Mints an upstream realtime session for an already-validated caller.
pub struct TokenExchangeUseCase<'a> {
    pub provider: &'a dyn RealtimeSessionProvider,
    // Static value from configuration, never taken from upstream.
    pub webrtc_url: Option<String>,
}

impl TokenExchangeUseCase<'_> {
    pub async fn execute(self) -> Result<TokenExchangeOutcome, ExchangeError> {
        let session = self.provider.create_session().await?;

        Ok(TokenExchangeOutcome {
            session_id: session.id,
            ephemeral_key: session.ephemeral_key,
            webrtc_url: self.webrtc_url,
        })
    }
}
