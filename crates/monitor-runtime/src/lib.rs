//! Runtime layer of the live-state monitor.
//!
//! Owns the three fact poll loops, their caches and cadences, and the
//! fire-and-forget dispatch of detected transitions to handlers.

pub mod handlers;
pub mod live_monitor;
pub mod pollers;
pub mod ticker;

#[cfg(test)]
pub(crate) mod fake;

pub use live_monitor::{LiveStateMonitor, MonitorHandle};
pub use monitor_core as core;
pub use monitor_telemetry as telemetry;
