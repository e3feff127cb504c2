//! Target range - duck-hunt style shooting gallery
//!
//! Rounds of ten targets, released in pairs. Falling short of the round's
//! hit quota ends the game.

pub mod state;
pub mod tick;

pub use state::{GameState, Target, TargetState};
pub use tick::tick;
