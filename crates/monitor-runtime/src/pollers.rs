//! One poller per fact.
//!
//! Each poller exclusively owns the cached snapshot of its fact. A cycle is
//! strictly fetch → detect → cache update, and the loop then hands any
//! transition back to [`FactPoller::dispatch`]. A failed fetch returns early
//! and leaves the cache untouched.

use std::future::Future;
use std::sync::Arc;

use monitor_core::detector::{detect_death_state, detect_level, detect_new_events};
use monitor_core::error::Result;
use monitor_core::models::{ActivePlayer, FactKind, GameEventLog, PlayerStats, Transition};
use monitor_telemetry::TelemetrySource;
use tokio::sync::watch;

use crate::handlers::{Handlers, LevelUp};

/// A single poll-loop body.
pub trait FactPoller: Send + 'static {
    const KIND: FactKind;

    /// Run one cycle against `source`, returning the transition it detected,
    /// if any. The cache already reflects the fresh snapshot on return.
    fn cycle<S: TelemetrySource>(
        &mut self,
        source: &S,
    ) -> impl Future<Output = Result<Option<Transition>>> + Send;

    /// Hand a transition returned by [`FactPoller::cycle`] to its handler.
    fn dispatch(&self, transition: Transition);
}

// ── IdentityPoller ────────────────────────────────────────────────────────────

/// Tracks the active player's level and publishes its summoner name so the
/// combat poller knows whom to look up.
pub struct IdentityPoller {
    cache: ActivePlayer,
    tracked: watch::Sender<String>,
    handlers: Arc<Handlers>,
}

impl IdentityPoller {
    pub fn new(tracked: watch::Sender<String>, handlers: Arc<Handlers>) -> Self {
        Self {
            cache: ActivePlayer::default(),
            tracked,
            handlers,
        }
    }

    pub fn cache(&self) -> &ActivePlayer {
        &self.cache
    }
}

impl FactPoller for IdentityPoller {
    const KIND: FactKind = FactKind::Identity;

    async fn cycle<S: TelemetrySource>(&mut self, source: &S) -> Result<Option<Transition>> {
        let fresh = source.fetch_active_player().await?;
        let transition = detect_level(&self.cache, &fresh);

        if fresh.summoner_name != self.cache.summoner_name {
            tracing::info!(summoner = %fresh.summoner_name, "tracking player");
            self.tracked.send_replace(fresh.summoner_name.clone());
        }
        self.cache = fresh;
        Ok(transition)
    }

    fn dispatch(&self, transition: Transition) {
        if let Transition::LevelIncreased { old, new } = transition {
            self.handlers.dispatch_level_increased(LevelUp {
                old,
                new,
                player: self.cache.clone(),
            });
        }
    }
}

// ── CombatPoller ──────────────────────────────────────────────────────────────

/// Tracks whether the player published by [`IdentityPoller`] is dead.
pub struct CombatPoller {
    cache: PlayerStats,
    tracked: watch::Receiver<String>,
    handlers: Arc<Handlers>,
}

impl CombatPoller {
    pub fn new(tracked: watch::Receiver<String>, handlers: Arc<Handlers>) -> Self {
        Self {
            cache: PlayerStats::default(),
            tracked,
            handlers,
        }
    }

    pub fn cache(&self) -> &PlayerStats {
        &self.cache
    }
}

impl FactPoller for CombatPoller {
    const KIND: FactKind = FactKind::CombatStatus;

    /// Parks until the identity loop has published a name; only then is the
    /// source queried.
    async fn cycle<S: TelemetrySource>(&mut self, source: &S) -> Result<Option<Transition>> {
        let named = self
            .tracked
            .wait_for(|name| !name.is_empty())
            .await
            .map(|name| name.clone());
        let Ok(summoner) = named else {
            // The identity loop is gone; no player will ever be named.
            return std::future::pending().await;
        };

        let fresh = source.fetch_player_stats(&summoner).await?;
        let transition = detect_death_state(&self.cache, &fresh);
        self.cache = fresh;
        Ok(transition)
    }

    fn dispatch(&self, transition: Transition) {
        if let Transition::DeathStateChanged { .. } = transition {
            self.handlers.dispatch_death_state(self.cache.clone());
        }
    }
}

// ── EventPoller ───────────────────────────────────────────────────────────────

/// Tracks growth of the event log.
///
/// The cache only ever holds the longest log seen; a shorter or equal log is
/// discarded without replacing it.
pub struct EventPoller {
    cache: GameEventLog,
    handlers: Arc<Handlers>,
}

impl EventPoller {
    pub fn new(handlers: Arc<Handlers>) -> Self {
        Self {
            cache: GameEventLog::default(),
            handlers,
        }
    }

    pub fn cache(&self) -> &GameEventLog {
        &self.cache
    }
}

impl FactPoller for EventPoller {
    const KIND: FactKind = FactKind::EventLog;

    async fn cycle<S: TelemetrySource>(&mut self, source: &S) -> Result<Option<Transition>> {
        let fresh = source.fetch_event_log().await?;
        let transition = detect_new_events(&self.cache, &fresh);

        if transition.is_some() {
            tracing::debug!(
                previous = self.cache.len(),
                current = fresh.len(),
                "event log grew"
            );
            self.cache = fresh;
        }
        Ok(transition)
    }

    fn dispatch(&self, transition: Transition) {
        if let Transition::NewGameEvents { entries } = transition {
            self.handlers.dispatch_game_events(entries);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
