//! Transition detection.
//!
//! Pure comparisons between the cached snapshot of a fact and a freshly
//! fetched one. Each rule yields at most one [`Transition`] per poll cycle.

use crate::models::{ActivePlayer, GameEventLog, PlayerStats, Transition};

/// Emits [`Transition::LevelIncreased`] when the level strictly increased.
///
/// Equal or lower levels (a new game, a cache reset) emit nothing.
pub fn detect_level(cached: &ActivePlayer, fresh: &ActivePlayer) -> Option<Transition> {
    (fresh.level > cached.level).then_some(Transition::LevelIncreased {
        old: cached.level,
        new: fresh.level,
    })
}

/// Emits [`Transition::DeathStateChanged`] on any edge of `isDead`.
pub fn detect_death_state(cached: &PlayerStats, fresh: &PlayerStats) -> Option<Transition> {
    (fresh.is_dead != cached.is_dead).then_some(Transition::DeathStateChanged {
        to_dead: fresh.is_dead,
    })
}

/// Emits [`Transition::NewGameEvents`] when the log grew.
///
/// The log is append-only at the source, so growth is detected by length
/// alone and the transition carries the whole fresh log.
pub fn detect_new_events(cached: &GameEventLog, fresh: &GameEventLog) -> Option<Transition> {
    (fresh.len() > cached.len()).then(|| Transition::NewGameEvents {
        entries: fresh.events.clone(),
    })
}
