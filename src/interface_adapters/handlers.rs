use crate::domain::entities::SessionRecord;
use crate::domain::errors::{AuthError, ExchangeError, SessionError};
use crate::interface_adapters::protocol::{
    ErrorResponse, HealthResponse, LoginRequest, LoginResponse, TokenResponse,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::session_registry::token_prefix;
use crate::use_cases::{LoginUseCase, TokenExchangeUseCase};
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::{debug, error, info, warn};

const LOGIN_SUCCEEDED: &str = "login succeeded";

// Handler for exchanging credentials for a session token.
#[tracing::instrument(name = "login", skip_all)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<LoginResponse>)> {
    // An unreadable body is just a login with no fields.
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            debug!(error = %rejection, "login body rejected");
            LoginRequest::default()
        }
    };

    let use_case = LoginUseCase {
        verifier: state.verifier(),
        registry: state.session_registry(),
    };

    let result = use_case
        .execute(payload.username.as_deref(), payload.password.as_deref())
        .await
        .map_err(map_auth_error)?;

    info!(
        token = token_prefix(&result.token),
        expires_at = result.expires_at,
        "session created"
    );

    Ok(Json(LoginResponse {
        success: true,
        session_token: Some(result.token),
        message: LOGIN_SUCCEEDED.to_string(),
    }))
}

// Handler for minting an upstream ephemeral key. Runs behind the session gate.
#[tracing::instrument(name = "get_token", skip_all, fields(username = %session.username))]
pub async fn get_token(
    State(state): State<AppState>,
    Extension(session): Extension<SessionRecord>,
) -> Result<Json<TokenResponse>, (StatusCode, Json<ErrorResponse>)> {
    let use_case = TokenExchangeUseCase {
        provider: state.realtime(),
        webrtc_url: state.webrtc_url().map(str::to_owned),
    };

    let result = use_case.execute().await.map_err(map_exchange_error)?;

    info!("ephemeral key issued");

    Ok(Json(TokenResponse {
        session_id: result.session_id,
        ephemeral_key: result.ephemeral_key,
        webrtc_url: result.webrtc_url,
    }))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// Helper to build a JSON error response.
fn error_response(status: StatusCode, error: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            details: None,
            message: None,
        }),
    )
}

fn map_auth_error(err: AuthError) -> (StatusCode, Json<LoginResponse>) {
    let status = match err {
        AuthError::InvalidCredentials => {
            warn!("login rejected");
            StatusCode::UNAUTHORIZED
        }
        AuthError::StorageFailure => {
            error!(error = %err, "login failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(LoginResponse {
            success: false,
            session_token: None,
            message: err.to_string(),
        }),
    )
}

// Maps session gate failures; the 401 variants differ by message only.
pub(crate) fn map_session_error(err: SessionError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        SessionError::MissingToken
        | SessionError::InvalidSession
        | SessionError::SessionExpired => {
            warn!(reason = %err, "session rejected");
            error_response(StatusCode::UNAUTHORIZED, &err.to_string())
        }
        SessionError::StorageFailure => {
            error!(error = %err, "session lookup failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}

fn map_exchange_error(err: ExchangeError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        ExchangeError::Configuration => {
            error!("upstream sessions url or api key not configured");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "configuration error")
        }
        ExchangeError::Upstream { status, body } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (
                status,
                Json(ErrorResponse {
                    error: "upstream API error".to_string(),
                    details: Some(body),
                    message: None,
                }),
            )
        }
        ExchangeError::Internal(message) => {
            error!(error = %message, "token exchange failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "token generation error".to_string(),
                    details: None,
                    message: Some(message),
                }),
            )
        }
    }
}
