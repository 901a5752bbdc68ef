//! Which light sequence each game transition plays.

use std::time::Duration;

use monitor_actuator::{Actuator, SequencePlayer};
use monitor_core::color::ActionSequence;
use monitor_runtime::LiveStateMonitor;
use monitor_telemetry::TelemetrySource;

/// Red, green, blue, then a dim neutral to settle on.
const LEVEL_UP_COLORS: [[f64; 3]; 4] = [
    [255.0, 0.0, 0.0],
    [0.0, 255.0, 0.0],
    [0.0, 0.0, 255.0],
    [100.0, 100.0, 100.0],
];
const DEATH_COLORS: [[f64; 3]; 1] = [[255.0, 0.0, 0.0]];
const RESPAWN_COLORS: [[f64; 3]; 1] = [[50.0, 50.0, 50.0]];

// ── ActionTable ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ActionTable {
    pub level_up: ActionSequence,
    pub death: ActionSequence,
    pub respawn: ActionSequence,
}

impl ActionTable {
    pub fn new(dwell: Duration) -> Self {
        Self {
            level_up: ActionSequence::from_rgb(&LEVEL_UP_COLORS, dwell),
            death: ActionSequence::from_rgb(&DEATH_COLORS, dwell),
            respawn: ActionSequence::from_rgb(&RESPAWN_COLORS, dwell),
        }
    }
}

/// Register the light handlers on `monitor`.
///
/// Event-log growth keeps the monitor's default handler, which only logs.
pub fn bind<S, A>(
    monitor: LiveStateMonitor<S>,
    lights: SequencePlayer<A>,
    table: ActionTable,
) -> LiveStateMonitor<S>
where
    S: TelemetrySource,
    A: Actuator,
{
    let ActionTable {
        level_up,
        death,
        respawn,
    } = table;

    let on_level = lights.clone();
    let on_death = lights.clone();
    let on_respawn = lights;

    monitor
        .on_level_increased(move |up| {
            let lights = on_level.clone();
            let sequence = level_up.clone();
            async move {
                tracing::info!("Leveled up to {}", up.new);
                lights.play(sequence).await;
            }
        })
        .on_death(move |stats| {
            let lights = on_death.clone();
            let sequence = death.clone();
            async move {
                tracing::info!(player = %stats.summoner_name, "died");
                lights.play(sequence).await;
            }
        })
        .on_respawn(move |stats| {
            let lights = on_respawn.clone();
            let sequence = respawn.clone();
            async move {
                tracing::info!(player = %stats.summoner_name, "respawned");
                lights.play(sequence).await;
            }
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
