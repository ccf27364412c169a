// Framework bootstrap for the proxy runtime.

use crate::frameworks::config::Config;
use crate::interface_adapters::clients::realtime::AzureRealtimeClient;
use crate::interface_adapters::credentials::SingleUserVerifier;
use crate::interface_adapters::routes;
use crate::interface_adapters::state::{AppState, InMemorySessionStore, SystemClock};
use crate::use_cases::SessionRegistry;

use std::io::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

fn init_runtime() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

// Serve on an already-bound listener. Does not touch global tracing state.
pub async fn run(listener: tokio::net::TcpListener, config: Config) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state(&config)?;

    if let Some(period) = config.session_sweep_interval {
        spawn_session_sweeper(state.clone(), period);
    }

    let app = routes::app(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let config = Config::from_env();
    let address = SocketAddr::new(config.host, config.port);

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener, config).await
}

fn build_state(config: &Config) -> Result<AppState> {
    let verifier = SingleUserVerifier::new(
        config.valid_username.clone(),
        config.valid_password.clone(),
    );
    if !verifier.is_configured() {
        tracing::warn!("VALID_USERNAME or VALID_PASSWORD not set; every login will be rejected");
    }

    if !config.realtime.is_configured() {
        tracing::warn!(
            "AZURE_OPENAI_SESSIONS_URL or AZURE_OPENAI_API_KEY not set; token exchange will fail"
        );
    }
    let realtime = AzureRealtimeClient::new(config.realtime.clone(), config.upstream_timeout)
        .map_err(|e| std::io::Error::other(format!("failed to initialize realtime client: {e}")))?;
    tracing::debug!(
        deployment = %config.realtime.deployment,
        voice = %config.realtime.voice,
        upstream_timeout_ms = duration_millis(config.upstream_timeout),
        "realtime client configured"
    );

    let registry = SessionRegistry::new(
        SystemClock,
        InMemorySessionStore::new(),
        duration_millis(config.session_ttl),
    );

    Ok(AppState::new(
        registry,
        Arc::new(verifier),
        Arc::new(realtime),
        config.webrtc_url.clone(),
    ))
}

// Saturates instead of wrapping for durations past u64 millis.
fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// Periodic purge on top of lazy eviction. Runs for the life of the process.
fn spawn_session_sweeper(state: AppState, period: Duration) {
    tracing::debug!(period_secs = period.as_secs(), "session sweeper enabled");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match state.session_registry().purge_expired().await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "expired sessions purged"),
                Err(e) => tracing::warn!(error = %e, "session sweep failed"),
            }
        }
    });
}
