//! Galactica - formation shooter
//!
//! Waves come from a small blueprint table; clearing one advances the level
//! and spawns the next blueprint.

pub mod state;
pub mod tick;

pub use state::{Enemy, EnemyKind, EnemyState, GameState};
pub use tick::tick;
