//! The seam between the monitor and wherever snapshots come from.

use std::future::Future;

use monitor_core::error::{MonitorError, Result};
use monitor_core::models::{ActivePlayer, FactKind, GameEventLog, PlayerStats};

/// A decoded snapshot of any one fact, as returned by
/// [`TelemetrySource::fetch`].
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    Identity(ActivePlayer),
    CombatStatus(PlayerStats),
    EventLog(GameEventLog),
}

impl Snapshot {
    pub fn kind(&self) -> FactKind {
        match self {
            Snapshot::Identity(_) => FactKind::Identity,
            Snapshot::CombatStatus(_) => FactKind::CombatStatus,
            Snapshot::EventLog(_) => FactKind::EventLog,
        }
    }
}

/// A stateless source of point-in-time snapshots.
///
/// Every call either returns a fully decoded snapshot or an error; a partially
/// decoded snapshot is never observable.
pub trait TelemetrySource: Send + Sync + 'static {
    /// Identity and level of the locally controlled player.
    fn fetch_active_player(&self) -> impl Future<Output = Result<ActivePlayer>> + Send;

    /// Combat status of every player in the session.
    fn fetch_player_list(&self) -> impl Future<Output = Result<Vec<PlayerStats>>> + Send;

    /// The cumulative event log.
    fn fetch_event_log(&self) -> impl Future<Output = Result<GameEventLog>> + Send;

    /// Combat status of the player named `summoner_name`.
    ///
    /// Fails with [`MonitorError::PlayerNotFound`] while that player is not
    /// (yet) part of the session. An empty name (player not identified yet)
    /// fails without querying the source.
    fn fetch_player_stats(
        &self,
        summoner_name: &str,
    ) -> impl Future<Output = Result<PlayerStats>> + Send {
        async move {
            if summoner_name.is_empty() {
                return Err(MonitorError::PlayerNotFound(String::new()));
            }
            let players = self.fetch_player_list().await?;
            find_player(players, summoner_name)
        }
    }

    /// Fetch one fact by kind. `tracked_player` is only used for
    /// [`FactKind::CombatStatus`].
    ///
    /// Kind-addressed convenience for callers that pick the fact at runtime
    /// (diagnostics, one-off queries). The monitor's pollers
    /// each know their fact statically and call the typed methods above,
    /// which skips the [`Snapshot`] wrapping.
    fn fetch(
        &self,
        kind: FactKind,
        tracked_player: &str,
    ) -> impl Future<Output = Result<Snapshot>> + Send {
        async move {
            match kind {
                FactKind::Identity => self.fetch_active_player().await.map(Snapshot::Identity),
                FactKind::CombatStatus => self
                    .fetch_player_stats(tracked_player)
                    .await
                    .map(Snapshot::CombatStatus),
                FactKind::EventLog => self.fetch_event_log().await.map(Snapshot::EventLog),
            }
        }
    }
}

/// Pick the player whose summoner name matches exactly.
pub fn find_player(players: Vec<PlayerStats>, summoner_name: &str) -> Result<PlayerStats> {
    if summoner_name.is_empty() {
        return Err(MonitorError::PlayerNotFound(String::new()));
    }
    players
        .into_iter()
        .find(|p| p.summoner_name == summoner_name)
        .ok_or_else(|| MonitorError::PlayerNotFound(summoner_name.to_string()))
}
