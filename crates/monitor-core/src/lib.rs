//! Shared types for the live-state monitor: snapshot models, transition
//! detection, colors, errors and settings.

pub mod color;
pub mod detector;
pub mod error;
pub mod models;
pub mod settings;

pub use error::{MonitorError, Result};
