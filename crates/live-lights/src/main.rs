mod actions;
mod bootstrap;

use std::sync::Arc;

use anyhow::{Context, Result};
use monitor_actuator::{Actuator, HueGroup, LogActuator, SequencePlayer, Sequencer};
use monitor_core::settings::Settings;
use monitor_runtime::LiveStateMonitor;
use monitor_telemetry::TelemetryClient;

use crate::actions::ActionTable;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Live Lights v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Telemetry: {}, Group: {}, Serialized: {}",
        settings.telemetry_url,
        settings.group,
        settings.serialize_actuator
    );

    let client = Arc::new(TelemetryClient::new(&settings.telemetry_url)?);

    match settings.bridge()? {
        Some((host, user)) => {
            let group = HueGroup::connect(host, user, &settings.group)
                .await
                .with_context(|| format!("connecting to light group {:?}", settings.group))?;
            tracing::info!("Driving light group {} ({})", group.name(), group.id());
            run(client, Arc::new(group), &settings).await
        }
        None => {
            tracing::warn!("No bridge configured; light commands will only be logged");
            run(client, Arc::new(LogActuator::new(settings.group.clone())), &settings).await
        }
    }
}

async fn run<A: Actuator>(
    client: Arc<TelemetryClient>,
    actuator: Arc<A>,
    settings: &Settings,
) -> Result<()> {
    let sequencer = Sequencer::new(actuator);
    let (lights, worker) = if settings.serialize_actuator {
        let (player, worker) = SequencePlayer::queued(sequencer);
        (player, Some(worker))
    } else {
        (SequencePlayer::direct(sequencer), None)
    };

    let monitor = LiveStateMonitor::new(client, settings.monitor_config());
    let handle = actions::bind(monitor, lights, ActionTable::new(settings.step_dwell())).start();

    tracing::info!("Waiting for game telemetry...");

    let signal = tokio::signal::ctrl_c().await;
    tracing::info!("Ctrl+C received; shutting down monitoring tasks");
    handle.abort();
    if let Some(worker) = worker {
        worker.abort();
    }

    signal.context("listening for Ctrl+C")
}
