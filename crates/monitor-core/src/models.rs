//! Typed snapshots of the three polled facts and the transitions detected
//! between them.
//!
//! Only the fields the monitor reasons about are modelled; everything else the
//! telemetry source sends is preserved untouched in an `extra` map.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── FactKind ──────────────────────────────────────────────────────────────────

/// One of the three independently polled telemetry categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactKind {
    /// Active-player identity and level.
    Identity,
    /// Per-player combat status (dead / alive).
    CombatStatus,
    /// The cumulative game-event log.
    EventLog,
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FactKind::Identity => "identity",
            FactKind::CombatStatus => "combat-status",
            FactKind::EventLog => "event-log",
        };
        f.write_str(name)
    }
}

// ── Snapshots ─────────────────────────────────────────────────────────────────

/// Identity snapshot for the locally controlled player.
///
/// Abilities, runes and champion stats are kept as opaque passthrough.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivePlayer {
    /// Champion level (starts at 1 once a game is running).
    pub level: u32,
    /// Display name; the identity key used to find this player elsewhere.
    #[serde(rename = "summonerName")]
    pub summoner_name: String,
    /// Every other field of the payload.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Combat status for one player in the current player list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    #[serde(rename = "summonerName")]
    pub summoner_name: String,
    #[serde(rename = "isDead")]
    pub is_dead: bool,
    /// Seconds until respawn; `0.0` while alive.
    #[serde(rename = "respawnTimer", default)]
    pub respawn_timer: f64,
    /// Kills / deaths / assists / creep score, opaque.
    #[serde(default)]
    pub scores: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single entry of the append-only game-event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Monotonically increasing id assigned by the source.
    #[serde(rename = "EventID")]
    pub event_id: u64,
    #[serde(rename = "EventName")]
    pub event_name: String,
    /// Seconds since the session started.
    #[serde(rename = "EventTime")]
    pub event_time: f64,
    #[serde(rename = "KillerName", default, skip_serializing_if = "Option::is_none")]
    pub killer_name: Option<String>,
    #[serde(rename = "VictimName", default, skip_serializing_if = "Option::is_none")]
    pub victim_name: Option<String>,
    #[serde(rename = "Assisters", default, skip_serializing_if = "Vec::is_empty")]
    pub assisters: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GameEvent {
    /// Every player named by this event (killer, victim and assisters).
    pub fn participants(&self) -> BTreeSet<&str> {
        self.killer_name
            .iter()
            .chain(self.victim_name.iter())
            .chain(self.assisters.iter())
            .map(String::as_str)
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// The full event log as returned by the source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameEventLog {
    #[serde(rename = "Events")]
    pub events: Vec<GameEvent>,
}

impl GameEventLog {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

// ── Transition ────────────────────────────────────────────────────────────────

/// A semantically meaningful change between two consecutive snapshots of the
/// same fact. Produced, dispatched and dropped; never stored.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// The active player's level went up.
    LevelIncreased { old: u32, new: u32 },
    /// The tracked player died (`to_dead == true`) or respawned.
    DeathStateChanged { to_dead: bool },
    /// The event log grew. Carries the entire current log, not only the
    /// newly appended suffix.
    NewGameEvents { entries: Vec<GameEvent> },
}

impl Transition {
    /// The fact this transition was detected on.
    pub fn fact(&self) -> FactKind {
        match self {
            Transition::LevelIncreased { .. } => FactKind::Identity,
            Transition::DeathStateChanged { .. } => FactKind::CombatStatus,
            Transition::NewGameEvents { .. } => FactKind::EventLog,
        }
    }
}
