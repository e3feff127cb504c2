//! Robots - first-person shooting range
//!
//! Waves of capsule robots walk at the player; shots are hitscan rays from
//! the camera. Health drains while a robot is in reach.

pub mod state;
pub mod tick;

pub use state::{Camera, GameState, Robot, RobotState};
pub use tick::tick;
