use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::domain::entities::RealtimeSession;
use crate::domain::errors::ExchangeError;
use crate::domain::ports::RealtimeSessionProvider;

// Upstream coordinates for minting realtime sessions.
#[derive(Clone)]
pub struct RealtimeSettings {
    pub sessions_url: Option<String>,
    pub api_key: Option<String>,
    pub deployment: String,
    pub voice: String,
}

impl RealtimeSettings {
    pub fn is_configured(&self) -> bool {
        self.sessions_url.is_some() && self.api_key.is_some()
    }
}

#[derive(Debug, Serialize)]
struct CreateSessionRequest<'a> {
    model: &'a str,
    voice: &'a str,
}

// Reads `id` and `client_secret.value` off any JSON shape; fields that are
// missing or of another type come back as `None`. Only a `null` document has
// nothing to read from.
fn session_from_payload(payload: &Value) -> Result<RealtimeSession, ExchangeError> {
    if payload.is_null() {
        return Err(ExchangeError::Internal(
            "upstream returned a null session".to_string(),
        ));
    }

    let id = payload.get("id").and_then(Value::as_str).map(str::to_owned);
    let ephemeral_key = payload
        .get("client_secret")
        .and_then(|secret| secret.get("value"))
        .and_then(Value::as_str)
        .map(str::to_owned);

    Ok(RealtimeSession { id, ephemeral_key })
}

// Thin reqwest client for the Azure OpenAI realtime sessions endpoint.
#[derive(Clone)]
pub struct AzureRealtimeClient {
    http: reqwest::Client,
    settings: RealtimeSettings,
}

impl AzureRealtimeClient {
    pub fn new(settings: RealtimeSettings, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, settings })
    }
}

#[async_trait]
impl RealtimeSessionProvider for AzureRealtimeClient {
    async fn create_session(&self) -> Result<RealtimeSession, ExchangeError> {
        // Checked per request so a misconfigured server still answers.
        let (Some(url), Some(api_key)) = (
            self.settings.sessions_url.as_deref(),
            self.settings.api_key.as_deref(),
        ) else {
            return Err(ExchangeError::Configuration);
        };

        let res = self
            .http
            .post(url)
            .header("api-key", api_key)
            .json(&CreateSessionRequest {
                model: &self.settings.deployment,
                voice: &self.settings.voice,
            })
            .send()
            .await
            .map_err(|err| ExchangeError::Internal(err.to_string()))?;
        let status = res.status();

        // Keep upstream status and body so the handler can relay them.
        if !status.is_success() {
            // A body that cannot be read is a transport failure, not an empty reply.
            let body = res
                .text()
                .await
                .map_err(|err| ExchangeError::Internal(err.to_string()))?;
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                "upstream rejected session request"
            );
            return Err(ExchangeError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let payload = res
            .json::<Value>()
            .await
            .map_err(|err| ExchangeError::Internal(err.to_string()))?;

        session_from_payload(&payload)
    }
}
