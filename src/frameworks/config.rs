use std::{
    env,
    net::{IpAddr, Ipv4Addr},
    time::Duration,
};

use crate::interface_adapters::clients::realtime::RealtimeSettings;
use crate::use_cases::session_registry::DEFAULT_SESSION_TTL_MS;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DEPLOYMENT: &str = "gpt-realtime";
pub const DEFAULT_VOICE: &str = "verse";
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Process configuration, read once at startup and never mutated.
///
/// Empty environment values count as unset, so a blank
/// `AZURE_OPENAI_API_KEY` still yields the per-request configuration error.
#[derive(Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub valid_username: Option<String>,
    pub valid_password: Option<String>,
    pub realtime: RealtimeSettings,
    pub webrtc_url: Option<String>,
    pub session_ttl: Duration,
    pub upstream_timeout: Duration,
    // None disables the background sweep; expiry stays lazy.
    pub session_sweep_interval: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let parsed_u64 = |key: &str| var(key).and_then(|value| value.parse::<u64>().ok());

        Self {
            host: var("HOST")
                .and_then(|value| value.parse().ok())
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            port: var("PORT")
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            valid_username: var("VALID_USERNAME"),
            valid_password: var("VALID_PASSWORD"),
            realtime: RealtimeSettings {
                sessions_url: var("AZURE_OPENAI_SESSIONS_URL"),
                api_key: var("AZURE_OPENAI_API_KEY"),
                deployment: var("AZURE_OPENAI_DEPLOYMENT")
                    .unwrap_or_else(|| DEFAULT_DEPLOYMENT.to_string()),
                voice: var("AZURE_OPENAI_VOICE").unwrap_or_else(|| DEFAULT_VOICE.to_string()),
            },
            webrtc_url: var("AZURE_OPENAI_WEBRTC_URL"),
            session_ttl: parsed_u64("SESSION_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_millis(DEFAULT_SESSION_TTL_MS)),
            upstream_timeout: parsed_u64("UPSTREAM_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT),
            session_sweep_interval: parsed_u64("SESSION_SWEEP_INTERVAL_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }
}
