use crate::interface_adapters::handlers::{get_token, health, login};
use crate::interface_adapters::middleware::require_session;
use crate::interface_adapters::state::AppState;
use axum::{
    Router,
    http::Method,
    middleware,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    // Everything in here sits behind the session gate.
    let protected = Router::new()
        .route("/api/get-token", post(get_token))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/api/login", post(login))
        .route("/health", get(health))
        .merge(protected)
        .layer(cors)
        .with_state(state)
}
