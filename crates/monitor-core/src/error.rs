use thiserror::Error;

/// All errors produced by the live-state monitor.
///
/// None of these are fatal to the process: the monitor treats an unreachable
/// telemetry source as the steady state between sessions.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// The telemetry source could not be reached, or answered with a
    /// non-success status. Expected while no session is running.
    #[error("Telemetry request to {path} failed: {message}")]
    Transport { path: String, message: String },

    /// A payload was received but did not decode into the expected shape.
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The tracked player is absent from the combat-status response.
    #[error("Player not found in player list: {0:?}")]
    PlayerNotFound(String),

    /// The actuator bridge rejected or failed a command.
    #[error("Actuator error: {0}")]
    Actuator(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MonitorError {
    /// `true` for the errors a poller skips over and retries.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            MonitorError::Transport { .. }
                | MonitorError::Decode { .. }
                | MonitorError::PlayerNotFound(_)
        )
    }
}

/// Convenience alias used throughout the monitor crates.
pub type Result<T> = std::result::Result<T, MonitorError>;
