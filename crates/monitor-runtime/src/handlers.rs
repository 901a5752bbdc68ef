//! Transition handlers and fire-and-forget dispatch.
//!
//! At most one handler per transition kind. Every dispatch runs the handler in
//! its own tokio task; the poller never waits for it, and a handler that
//! panics only takes down its own task.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use monitor_core::models::{ActivePlayer, GameEvent, PlayerStats};

// ── Public types ──────────────────────────────────────────────────────────────

/// Payload delivered to the level-up handler.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelUp {
    pub old: u32,
    pub new: u32,
    /// The identity snapshot that carried the new level.
    pub player: ActivePlayer,
}

type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;
type Handler<T> = Arc<dyn Fn(T) -> BoxFuture + Send + Sync>;

fn boxed<T, F, Fut>(handler: F) -> Handler<T>
where
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |payload| Box::pin(handler(payload)) as BoxFuture)
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// Registry of the handlers bound before the monitor starts.
#[derive(Clone)]
pub struct Handlers {
    level_increased: Option<Handler<LevelUp>>,
    death: Option<Handler<PlayerStats>>,
    respawn: Option<Handler<PlayerStats>>,
    game_events: Handler<Vec<GameEvent>>,
}

impl Default for Handlers {
    fn default() -> Self {
        Self {
            level_increased: None,
            death: None,
            respawn: None,
            game_events: boxed(log_game_events),
        }
    }
}

/// Event-log handler used until one is bound: logs every entry name.
async fn log_game_events(entries: Vec<GameEvent>) {
    for event in &entries {
        tracing::info!(event_id = event.event_id, "{}", event.event_name);
    }
}

impl Handlers {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Registration ──────────────────────────────────────────────────────

    pub fn set_level_increased<F, Fut>(&mut self, handler: F)
    where
        F: Fn(LevelUp) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.level_increased = Some(boxed(handler));
    }

    pub fn set_death<F, Fut>(&mut self, handler: F)
    where
        F: Fn(PlayerStats) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.death = Some(boxed(handler));
    }

    pub fn set_respawn<F, Fut>(&mut self, handler: F)
    where
        F: Fn(PlayerStats) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.respawn = Some(boxed(handler));
    }

    pub fn set_game_events<F, Fut>(&mut self, handler: F)
    where
        F: Fn(Vec<GameEvent>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.game_events = boxed(handler);
    }

    // ── Dispatch ──────────────────────────────────────────────────────────

    pub(crate) fn dispatch_level_increased(&self, payload: LevelUp) {
        spawn_handler("level_increased", self.level_increased.as_ref(), payload);
    }

    /// Routes to the death or respawn handler depending on `stats.is_dead`.
    pub(crate) fn dispatch_death_state(&self, stats: PlayerStats) {
        if stats.is_dead {
            spawn_handler("death", self.death.as_ref(), stats);
        } else {
            spawn_handler("respawn", self.respawn.as_ref(), stats);
        }
    }

    /// Without a registered handler every entry name is logged.
    pub(crate) fn dispatch_game_events(&self, entries: Vec<GameEvent>) {
        spawn_handler("game_events", Some(&self.game_events), entries);
    }
}

fn spawn_handler<T: Send + 'static>(kind: &'static str, handler: Option<&Handler<T>>, payload: T) {
    let Some(handler) = handler else {
        tracing::debug!(kind, "no handler registered; transition dropped");
        return;
    };
    let handler = Arc::clone(handler);
    // The handler is invoked inside the task so a panic while building its
    // future is contained as well.
    tokio::spawn(async move { handler(payload).await });
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn stats(is_dead: bool) -> PlayerStats {
        PlayerStats {
            summoner_name: "Faker".to_string(),
            is_dead,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_level_handler_receives_payload() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut handlers = Handlers::new();
        handlers.set_level_increased(move |up: LevelUp| {
            let tx = tx.clone();
            async move {
                let _ = tx.send((up.old, up.new));
            }
        });

        handlers.dispatch_level_increased(LevelUp {
            old: 3,
            new: 4,
            player: ActivePlayer::default(),
        });

        let got = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
        assert_eq!(got, Some((3, 4)));
    }

    #[tokio::test]
    async fn test_death_state_routes_by_direction() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut handlers = Handlers::new();
        let death_tx = tx.clone();
        handlers.set_death(move |_| {
            let tx = death_tx.clone();
            async move {
                let _ = tx.send("death");
            }
        });
        handlers.set_respawn(move |_| {
            let tx = tx.clone();
            async move {
                let _ = tx.send("respawn");
            }
        });

        handlers.dispatch_death_state(stats(true));
        let first = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
        handlers.dispatch_death_state(stats(false));
        let second = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap();

        assert_eq!(first, Some("death"));
        assert_eq!(second, Some("respawn"));
    }

    #[tokio::test]
    async fn test_second_registration_replaces_first() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut handlers = Handlers::new();
        let first_tx = tx.clone();
        handlers.set_death(move |_| {
            let tx = first_tx.clone();
            async move {
                let _ = tx.send(1);
            }
        });
        handlers.set_death(move |_| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(2);
            }
        });

        handlers.dispatch_death_state(stats(true));
        let got = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
        assert_eq!(got, Some(2));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_dispatch_does_not_wait_for_handler() {
        let mut handlers = Handlers::new();
        handlers.set_death(|_| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
        });

        let started = std::time::Instant::now();
        handlers.dispatch_death_state(stats(true));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_panicking_handler_is_contained() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut handlers = Handlers::new();
        handlers.set_death(|_| async {
            panic!("handler blew up");
        });
        handlers.set_respawn(move |_| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(());
            }
        });

        handlers.dispatch_death_state(stats(true));
        handlers.dispatch_death_state(stats(false));

        let got = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
        assert_eq!(got, Some(()));
    }

    #[tokio::test]
    async fn test_bound_event_handler_replaces_default_logging() {
        let (_guard, logs) = crate::fake::capture_logs();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut handlers = Handlers::new();
        handlers.set_game_events(move |entries: Vec<GameEvent>| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(entries.len());
            }
        });

        handlers.dispatch_game_events(crate::fake::event_log(3).events);

        let got = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
        assert_eq!(got, Some(3));
        assert!(!logs.text().contains("Event0"));
    }

    #[tokio::test]
    async fn test_missing_handler_is_a_no_op() {
        let handlers = Handlers::new();
        handlers.dispatch_level_increased(LevelUp {
            old: 0,
            new: 1,
            player: ActivePlayer::default(),
        });
        handlers.dispatch_death_state(stats(true));
        handlers.dispatch_game_events(vec![]);
    }
}
