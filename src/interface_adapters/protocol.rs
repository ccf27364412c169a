use serde::{Deserialize, Serialize};

// Header carrying the session token on protected routes.
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

// Request payload for login. Missing fields decode as None.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

// Response payload for login, shared by success and failure.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    pub message: String,
}

// Response payload for a successful token exchange.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub session_id: Option<String>,
    pub ephemeral_key: Option<String>,
    pub webrtc_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

// Error envelope for the session gate and token exchange.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
