use std::time::Duration;

use clap::Parser;

// ── Defaults ──────────────────────────────────────────────────────────────────

/// Loopback address of the live telemetry source.
pub const DEFAULT_TELEMETRY_URL: &str = "https://127.0.0.1:2999";

/// Identity poll cadence. The game is usually not running yet, so this loop
/// must not spin.
pub const DEFAULT_IDENTITY_POLL_MS: u64 = 1000;

/// Combat-status poll cadence; `0` polls back-to-back.
pub const DEFAULT_COMBAT_POLL_MS: u64 = 0;

/// Event-log poll cadence.
pub const DEFAULT_EVENT_POLL_MS: u64 = 250;

/// Minimum time each action step is held on the actuator.
pub const DEFAULT_STEP_DWELL_MS: u64 = 200;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Drive room lighting from live game telemetry
#[derive(Parser, Debug, Clone)]
#[command(
    name = "live-lights",
    about = "Drive room lighting from live game telemetry",
    version
)]
pub struct Settings {
    /// Base URL of the live telemetry source
    #[arg(long, env = "LIVE_TELEMETRY_URL", default_value = DEFAULT_TELEMETRY_URL)]
    pub telemetry_url: String,

    /// Identity poll interval in milliseconds
    #[arg(long, env = "LIVE_IDENTITY_POLL_MS", default_value_t = DEFAULT_IDENTITY_POLL_MS)]
    pub identity_poll_ms: u64,

    /// Combat-status poll interval in milliseconds (0 = back-to-back)
    #[arg(long, env = "LIVE_COMBAT_POLL_MS", default_value_t = DEFAULT_COMBAT_POLL_MS)]
    pub combat_poll_ms: u64,

    /// Event-log poll interval in milliseconds
    #[arg(long, env = "LIVE_EVENT_POLL_MS", default_value_t = DEFAULT_EVENT_POLL_MS)]
    pub event_poll_ms: u64,

    /// Minimum hold time of each light step in milliseconds
    #[arg(long, env = "LIVE_STEP_DWELL_MS", default_value_t = DEFAULT_STEP_DWELL_MS)]
    pub step_dwell_ms: u64,

    /// Lighting bridge host; lights are only logged when absent
    #[arg(long, env = "HUE_BRIDGE_HOST")]
    pub bridge_host: Option<String>,

    /// Pre-provisioned bridge username
    #[arg(long, env = "HUE_BRIDGE_USER")]
    pub bridge_user: Option<String>,

    /// Name of the light group to drive
    #[arg(long, env = "HUE_GROUP", default_value = "Stephen Room")]
    pub group: String,

    /// Play light sequences one at a time through a queue
    #[arg(long, env = "LIVE_SERIALIZE_ACTUATOR")]
    pub serialize_actuator: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and environment, applying `--debug`.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Poll cadences for the live-state monitor.
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            identity_poll_interval: Duration::from_millis(self.identity_poll_ms),
            combat_poll_interval: Duration::from_millis(self.combat_poll_ms),
            event_poll_interval: Duration::from_millis(self.event_poll_ms),
        }
    }

    /// Fixed per-step dwell for every action sequence.
    pub fn step_dwell(&self) -> Duration {
        Duration::from_millis(self.step_dwell_ms)
    }

    /// Bridge host and user, or `None` for a dry run.
    ///
    /// A host without a user is rejected rather than silently falling back.
    pub fn bridge(&self) -> crate::error::Result<Option<(&str, &str)>> {
        match (self.bridge_host.as_deref(), self.bridge_user.as_deref()) {
            (Some(host), Some(user)) => Ok(Some((host, user))),
            (None, _) => Ok(None),
            (Some(_), None) => Err(crate::error::MonitorError::Config(
                "--bridge-host requires --bridge-user".to_string(),
            )),
        }
    }
}

// ── MonitorConfig ─────────────────────────────────────────────────────────────

/// Per-fact poll cadences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Delay between identity fetches, also applied after a failed fetch.
    pub identity_poll_interval: Duration,
    /// Delay between combat-status fetches; zero polls back-to-back.
    pub combat_poll_interval: Duration,
    /// Delay between successful event-log fetches.
    pub event_poll_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            identity_poll_interval: Duration::from_millis(DEFAULT_IDENTITY_POLL_MS),
            combat_poll_interval: Duration::from_millis(DEFAULT_COMBAT_POLL_MS),
            event_poll_interval: Duration::from_millis(DEFAULT_EVENT_POLL_MS),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
