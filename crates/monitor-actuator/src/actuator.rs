use std::future::Future;

use monitor_core::color::Xy;
use monitor_core::error::Result;

/// A single addressable light target that accepts chromaticity commands.
pub trait Actuator: Send + Sync + 'static {
    /// Set every light of the target to `xy`.
    fn set_xy(&self, xy: Xy) -> impl Future<Output = Result<()>> + Send;
}

/// Dry-run actuator that only logs the commands it receives.
#[derive(Debug, Clone, Default)]
pub struct LogActuator {
    label: String,
}

impl LogActuator {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Actuator for LogActuator {
    async fn set_xy(&self, xy: Xy) -> Result<()> {
        tracing::info!(target_group = %self.label, x = xy.x, y = xy.y, "set color (dry run)");
        Ok(())
    }
}
