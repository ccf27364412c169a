use crate::interface_adapters::handlers::map_session_error;
use crate::interface_adapters::protocol::{ErrorResponse, SESSION_TOKEN_HEADER};
use crate::interface_adapters::state::AppState;
use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

// Session gate for protected routes. On success the SessionRecord is placed
// in the request extensions for the downstream handler.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    // Owned copy so the request is not borrowed across the await. Non-UTF-8
    // values are kept lossily and fail as an invalid session.
    let token = request
        .headers()
        .get(SESSION_TOKEN_HEADER)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());

    let session = state
        .session_registry()
        .validate(token.as_deref())
        .await
        .map_err(map_session_error)?;

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}
