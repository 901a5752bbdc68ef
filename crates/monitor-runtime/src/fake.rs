//! Scripted telemetry source for tests.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use monitor_core::error::{MonitorError, Result};
use monitor_core::models::{ActivePlayer, GameEventLog, PlayerStats};
use monitor_telemetry::source::find_player;
use monitor_telemetry::TelemetrySource;
use tracing::subscriber::DefaultGuard;

/// One scripted reply.
#[derive(Debug, Clone)]
pub(crate) enum Reply<T> {
    Ok(T),
    /// Connection refused.
    Refused,
    /// A payload that fails to decode.
    Malformed,
}

/// Replies are consumed in order; the last one repeats forever.
struct Script<T> {
    replies: VecDeque<Reply<T>>,
}

impl<T: Clone> Script<T> {
    fn new(replies: Vec<Reply<T>>) -> Self {
        Self {
            replies: replies.into(),
        }
    }

    fn next(&mut self, path: &str) -> Result<T> {
        let reply = if self.replies.len() > 1 {
            self.replies.pop_front()
        } else {
            self.replies.front().cloned()
        };
        match reply {
            Some(Reply::Ok(value)) => Ok(value),
            Some(Reply::Malformed) => Err(MonitorError::Decode {
                path: path.to_string(),
                source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
            }),
            Some(Reply::Refused) | None => Err(MonitorError::Transport {
                path: path.to_string(),
                message: "connection refused".to_string(),
            }),
        }
    }
}

pub(crate) struct ScriptedSource {
    identity: Mutex<Script<ActivePlayer>>,
    players: Mutex<Script<Vec<PlayerStats>>>,
    events: Mutex<Script<GameEventLog>>,
    pub(crate) player_list_calls: AtomicUsize,
    pub(crate) player_stats_calls: AtomicUsize,
}

impl ScriptedSource {
    /// Every resource refuses connections until scripted.
    pub(crate) fn new() -> Self {
        Self {
            identity: Mutex::new(Script::new(vec![Reply::Refused])),
            players: Mutex::new(Script::new(vec![Reply::Refused])),
            events: Mutex::new(Script::new(vec![Reply::Refused])),
            player_list_calls: AtomicUsize::new(0),
            player_stats_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn identity(self, replies: Vec<Reply<ActivePlayer>>) -> Self {
        *self.identity.lock().unwrap() = Script::new(replies);
        self
    }

    pub(crate) fn players(self, replies: Vec<Reply<Vec<PlayerStats>>>) -> Self {
        *self.players.lock().unwrap() = Script::new(replies);
        self
    }

    pub(crate) fn events(self, replies: Vec<Reply<GameEventLog>>) -> Self {
        *self.events.lock().unwrap() = Script::new(replies);
        self
    }
}

impl TelemetrySource for ScriptedSource {
    async fn fetch_active_player(&self) -> Result<ActivePlayer> {
        self.identity.lock().unwrap().next("/liveclientdata/activeplayer")
    }

    async fn fetch_player_list(&self) -> Result<Vec<PlayerStats>> {
        self.player_list_calls.fetch_add(1, Ordering::Relaxed);
        self.players.lock().unwrap().next("/liveclientdata/playerlist")
    }

    async fn fetch_event_log(&self) -> Result<GameEventLog> {
        self.events.lock().unwrap().next("/liveclientdata/eventdata")
    }

    async fn fetch_player_stats(&self, summoner_name: &str) -> Result<PlayerStats> {
        self.player_stats_calls.fetch_add(1, Ordering::Relaxed);
        let players = self.fetch_player_list().await?;
        find_player(players, summoner_name)
    }
}

// ── Log capture ───────────────────────────────────────────────────────────────

/// Everything written by the capturing subscriber.
#[derive(Clone, Default)]
pub(crate) struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub(crate) fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route `info`-and-above logs on this thread into a buffer until the guard
/// drops. Tasks spawned on a current-thread test runtime are covered too.
pub(crate) fn capture_logs() -> (DefaultGuard, LogBuffer) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    (tracing::subscriber::set_default(subscriber), buffer)
}

// ── Snapshot builders ─────────────────────────────────────────────────────────

pub(crate) fn player(name: &str, level: u32) -> ActivePlayer {
    ActivePlayer {
        level,
        summoner_name: name.to_string(),
        ..Default::default()
    }
}

pub(crate) fn stats(name: &str, is_dead: bool) -> PlayerStats {
    PlayerStats {
        summoner_name: name.to_string(),
        is_dead,
        respawn_timer: if is_dead { 12.0 } else { 0.0 },
        ..Default::default()
    }
}

pub(crate) fn event_log(len: u64) -> GameEventLog {
    let raw: Vec<serde_json::Value> = (0..len)
        .map(|id| {
            serde_json::json!({
                "EventID": id,
                "EventName": format!("Event{id}"),
                "EventTime": id as f64 * 30.0,
            })
        })
        .collect();
    serde_json::from_value(serde_json::json!({ "Events": raw })).unwrap()
}
