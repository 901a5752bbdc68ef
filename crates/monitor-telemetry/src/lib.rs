//! Telemetry layer for the live-state monitor.
//!
//! Issues point-in-time queries against the loopback live-client endpoint and
//! decodes them into the typed snapshots defined in [`monitor_core::models`].

pub mod client;
pub mod source;

pub use client::TelemetryClient;
pub use monitor_core as core;
pub use source::{Snapshot, TelemetrySource};
