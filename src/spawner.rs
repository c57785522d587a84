//! Background spawn timers.
//!
//! Each timer runs on its own thread, sleeps a randomized interval and then
//! posts a `SpawnKind` request down a channel.  The frame loop owns the game
//! state; it drains the channel once per frame and applies the requests
//! itself, so no entity collection is ever touched off the frame thread.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::debug;
use rand::{thread_rng, Rng};

use crate::config::{
    ENEMY_SPAWN_JITTER_SECS, ENEMY_SPAWN_MIN_SECS, WALL_SPAWN_JITTER_SECS, WALL_SPAWN_MIN_SECS,
};
use crate::entities::SpawnKind;

#[derive(Clone, Debug, PartialEq)]
pub struct SpawnTimer {
    pub kind: SpawnKind,
    /// Shortest wait between two requests.
    pub min: Duration,
    /// Upper bound (exclusive) of the random extra wait added to `min`.
    pub jitter: Duration,
}

impl SpawnTimer {
    pub fn new(kind: SpawnKind, min: Duration, jitter: Duration) -> Self {
        SpawnTimer { kind, min, jitter }
    }

    pub fn enemy_tanks() -> Self {
        SpawnTimer::new(
            SpawnKind::EnemyTank,
            Duration::from_secs(ENEMY_SPAWN_MIN_SECS),
            Duration::from_secs(ENEMY_SPAWN_JITTER_SECS),
        )
    }

    pub fn walls() -> Self {
        SpawnTimer::new(
            SpawnKind::Wall,
            Duration::from_secs(WALL_SPAWN_MIN_SECS),
            Duration::from_secs(WALL_SPAWN_JITTER_SECS),
        )
    }

    /// A fresh wait in `min .. min + jitter`.
    pub fn next_delay(&self, rng: &mut impl Rng) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.min;
        }
        self.min + Duration::from_millis(rng.gen_range(0..jitter_ms))
    }

    /// Run the timer on a dedicated thread.  The thread ends once the
    /// receiving side of `tx` is dropped.
    pub fn spawn(self, tx: Sender<SpawnKind>) -> JoinHandle<()> {
        thread::spawn(move || {
            let mut rng = thread_rng();
            loop {
                thread::sleep(self.next_delay(&mut rng));
                if tx.send(self.kind).is_err() {
                    debug!("{:?} timer stopping: frame loop is gone", self.kind);
                    break;
                }
            }
        })
    }
}

/// Start the enemy-tank and wall timers for the lifetime of the session.
pub fn start_spawners() -> Receiver<SpawnKind> {
    let (tx, rx) = mpsc::channel();
    SpawnTimer::enemy_tanks().spawn(tx.clone());
    SpawnTimer::walls().spawn(tx);
    rx
}
