//! The live-state monitor.
//!
//! Runs one tokio task per fact. Each task ticks at its own cadence, runs its
//! [`FactPoller`], and on a transition hands the payload to the registered
//! handler in a detached task. Nothing the handlers do can stall or stop a
//! poll loop.

use std::future::Future;
use std::sync::Arc;

use monitor_core::error::MonitorError;
use monitor_core::models::{FactKind, GameEvent, PlayerStats, Transition};
use monitor_core::settings::MonitorConfig;
use monitor_telemetry::TelemetrySource;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::handlers::{Handlers, LevelUp};
use crate::pollers::{CombatPoller, EventPoller, FactPoller, IdentityPoller};
use crate::ticker::Ticker;

// ── RetryPolicy ───────────────────────────────────────────────────────────────

/// What a poll loop does after a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Retry on the next tick. Used by the identity loop, which mostly runs
    /// while no game is up and must not spin.
    Cadenced,
    /// Retry straight away. Used by loops that only matter mid-game.
    Immediate,
}

// ── LiveStateMonitor ──────────────────────────────────────────────────────────

/// Polls the telemetry source and dispatches transitions to handlers.
///
/// Handlers are bound with the `on_*` methods, then [`LiveStateMonitor::start`]
/// consumes the monitor, so the set of handlers is fixed for its lifetime.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use monitor_core::settings::MonitorConfig;
/// use monitor_runtime::live_monitor::LiveStateMonitor;
/// use monitor_telemetry::TelemetryClient;
///
/// # async fn run() -> monitor_core::Result<()> {
/// let client = Arc::new(TelemetryClient::new("https://127.0.0.1:2999")?);
/// let handle = LiveStateMonitor::new(client, MonitorConfig::default())
///     .on_level_increased(|up| async move { println!("Leveled up to {}", up.new) })
///     .start();
/// # handle.abort();
/// # Ok(())
/// # }
/// ```
pub struct LiveStateMonitor<S> {
    source: Arc<S>,
    config: MonitorConfig,
    handlers: Handlers,
}

impl<S: TelemetrySource> LiveStateMonitor<S> {
    pub fn new(source: Arc<S>, config: MonitorConfig) -> Self {
        Self {
            source,
            config,
            handlers: Handlers::new(),
        }
    }

    // ── Handler registration ──────────────────────────────────────────────

    /// Bind the level-up handler, replacing any earlier one.
    pub fn on_level_increased<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(LevelUp) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.handlers.set_level_increased(handler);
        self
    }

    /// Bind the handler for the tracked player dying.
    pub fn on_death<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(PlayerStats) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.handlers.set_death(handler);
        self
    }

    /// Bind the handler for the tracked player respawning.
    pub fn on_respawn<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(PlayerStats) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.handlers.set_respawn(handler);
        self
    }

    /// Bind the event-log handler. It receives the whole log on every growth,
    /// including entries it has already seen. Defaults to logging each entry.
    pub fn on_game_events<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Vec<GameEvent>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.handlers.set_game_events(handler);
        self
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Spawn the three poll loops. They run until aborted through the
    /// returned handle or until the runtime shuts down.
    pub fn start(self) -> MonitorHandle {
        let handlers = Arc::new(self.handlers);
        let (tracked_tx, tracked_rx) = watch::channel(String::new());

        tracing::info!(
            identity = ?self.config.identity_poll_interval,
            combat = ?self.config.combat_poll_interval,
            events = ?self.config.event_poll_interval,
            "starting live-state monitor"
        );

        let tasks = vec![
            tokio::spawn(run_poller(
                IdentityPoller::new(tracked_tx, Arc::clone(&handlers)),
                Arc::clone(&self.source),
                Ticker::new(self.config.identity_poll_interval),
                RetryPolicy::Cadenced,
            )),
            tokio::spawn(run_poller(
                CombatPoller::new(tracked_rx, Arc::clone(&handlers)),
                Arc::clone(&self.source),
                Ticker::new(self.config.combat_poll_interval),
                RetryPolicy::Immediate,
            )),
            tokio::spawn(run_poller(
                EventPoller::new(handlers),
                self.source,
                Ticker::new(self.config.event_poll_interval),
                RetryPolicy::Immediate,
            )),
        ];

        MonitorHandle { tasks }
    }
}

// ── MonitorHandle ─────────────────────────────────────────────────────────────

/// A handle to the running poll loops.
pub struct MonitorHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Stop every poll loop. Handlers already dispatched keep running.
    pub fn abort(&self) {
        for task in &self.tasks {
            task.abort();
        }
    }

    /// `true` once every poll loop has stopped.
    pub fn is_finished(&self) -> bool {
        self.tasks.iter().all(JoinHandle::is_finished)
    }
}

// ── Poll loop ─────────────────────────────────────────────────────────────────

async fn run_poller<P, S>(mut poller: P, source: Arc<S>, mut ticker: Ticker, retry: RetryPolicy)
where
    P: FactPoller,
    S: TelemetrySource,
{
    let fact = P::KIND;
    let mut wait = true;
    let mut unavailable = false;

    loop {
        if wait {
            ticker.tick().await;
        }

        match poller.cycle(source.as_ref()).await {
            Ok(transition) => {
                if unavailable {
                    tracing::info!(%fact, "telemetry available");
                    unavailable = false;
                }
                if let Some(transition) = transition {
                    tracing::debug!(%fact, kind = transition_name(&transition), "transition dispatched");
                    poller.dispatch(transition);
                }
                wait = true;
            }
            Err(e) => {
                log_fetch_error(fact, &e, unavailable);
                unavailable = true;
                wait = retry == RetryPolicy::Cadenced;
                if !wait {
                    tokio::task::yield_now().await;
                }
            }
        }
    }
}

fn log_fetch_error(fact: FactKind, err: &MonitorError, already_unavailable: bool) {
    match err {
        MonitorError::Decode { .. } => tracing::warn!(%fact, error = %err, "skipping malformed snapshot"),
        // Only the identity loop announces the wait; the others follow it.
        MonitorError::Transport { .. } if !already_unavailable && fact == FactKind::Identity => {
            tracing::info!(%fact, "waiting for game to start");
            tracing::debug!(%fact, error = %err, "telemetry unavailable");
        }
        _ if !err.is_transient() => tracing::warn!(%fact, error = %err, "fetch failed"),
        _ => tracing::debug!(%fact, error = %err, "fetch failed"),
    }
}

fn transition_name(transition: &Transition) -> &'static str {
    match transition {
        Transition::LevelIncreased { .. } => "level_increased",
        Transition::DeathStateChanged { to_dead: true } => "death",
        Transition::DeathStateChanged { to_dead: false } => "respawn",
        Transition::NewGameEvents { .. } => "new_game_events",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
