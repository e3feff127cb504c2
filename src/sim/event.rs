//! Gameplay events emitted by the simulation
//!
//! The sim never touches audio or the DOM; it records what happened and the
//! driver drains the list once per frame.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Small dot eaten
    DotEaten,
    /// Power pellet eaten, ghosts turn frightened
    PowerPelletEaten,
    /// Frightened ghost eaten (points for this link of the chain)
    GhostEaten { points: u64 },
    /// Player fired (one event per trigger pull, not per bullet)
    Shot,
    /// A shot or bullet connected but did not kill
    EnemyHit,
    /// Enemy destroyed, with the points it awarded
    EnemyDestroyed { points: u64 },
    /// Player took damage
    PlayerHit,
    /// Player lost a life
    LifeLost { remaining: u8 },
    /// Score threshold reached
    ExtraLife,
    /// Wave/level/round cleared; `level` is the new level
    WaveCleared { level: u32 },
    /// Run ended
    GameOver { score: u64 },
    /// The finished run beat the stored best; the driver persists it
    NewHighScore { score: u64 },
    Paused,
    Resumed,
}
