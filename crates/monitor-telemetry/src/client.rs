//! HTTPS client for the loopback live-client endpoint.
//!
//! The endpoint serves a self-signed certificate. Certificate verification is
//! disabled for this client only, and only when the configured host is a
//! loopback address; any other host keeps full verification.

use std::net::IpAddr;

use monitor_core::error::{MonitorError, Result};
use monitor_core::models::{ActivePlayer, GameEventLog, PlayerStats};
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::source::TelemetrySource;

// ── Resource paths ────────────────────────────────────────────────────────────

pub const ACTIVE_PLAYER_PATH: &str = "/liveclientdata/activeplayer";
pub const PLAYER_LIST_PATH: &str = "/liveclientdata/playerlist";
pub const EVENT_DATA_PATH: &str = "/liveclientdata/eventdata";

// ── TelemetryClient ───────────────────────────────────────────────────────────

/// Stateless client for the three live-client resources.
#[derive(Debug, Clone)]
pub struct TelemetryClient {
    http: reqwest::Client,
    base_url: String,
}

impl TelemetryClient {
    /// Build a client for `base_url` (e.g. `https://127.0.0.1:2999`).
    pub fn new(base_url: &str) -> Result<Self> {
        let url = Url::parse(base_url)
            .map_err(|e| MonitorError::Config(format!("invalid telemetry url {base_url:?}: {e}")))?;
        let trust_self_signed = is_loopback(&url);

        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(trust_self_signed)
            .build()
            .map_err(|e| MonitorError::Config(format!("failed to build telemetry client: {e}")))?;

        tracing::debug!(base_url, trust_self_signed, "telemetry client ready");

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` and decode the body as `T`.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| transport(path, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::Transport {
                path: path.to_string(),
                message: format!("status {status}"),
            });
        }

        let body = response.bytes().await.map_err(|e| transport(path, e))?;
        decode(path, &body)
    }
}

impl TelemetrySource for TelemetryClient {
    async fn fetch_active_player(&self) -> Result<ActivePlayer> {
        self.get(ACTIVE_PLAYER_PATH).await
    }

    async fn fetch_player_list(&self) -> Result<Vec<PlayerStats>> {
        self.get(PLAYER_LIST_PATH).await
    }

    async fn fetch_event_log(&self) -> Result<GameEventLog> {
        self.get(EVENT_DATA_PATH).await
    }
}

// ── Private helpers ───────────────────────────────────────────────────────────

/// Decode a payload, tagging failures with the resource path.
fn decode<T: DeserializeOwned>(path: &str, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|source| MonitorError::Decode {
        path: path.to_string(),
        source,
    })
}

fn transport(path: &str, err: reqwest::Error) -> MonitorError {
    MonitorError::Transport {
        path: path.to_string(),
        message: err.without_url().to_string(),
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host_str() {
        Some(host) if host.eq_ignore_ascii_case("localhost") => true,
        Some(host) => host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .map(|ip| ip.is_loopback())
            .unwrap_or(false),
        None => false,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
