//! Per-tick input record
//!
//! The browser driver maps keyboard and pointer events onto this struct. Held
//! keys stay set until released; one-shot fields are cleared by the
//! [`Runner`](super::Runner) after the first substep that sees them.

use glam::Vec2;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held direction keys
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Held fire (auto-repeat shooters)
    pub fire: bool,
    /// One-shot trigger pull (click/tap)
    pub trigger: bool,
    /// One-shot pointer position in game coordinates (target range aim)
    pub pointer: Option<Vec2>,
    /// Accumulated mouse movement since the last tick (first-person look)
    pub look: Vec2,
    /// Pause toggle
    pub pause: bool,
    /// Restart after game over
    pub restart: bool,
}

impl TickInput {
    /// Clear one-shot inputs after processing
    pub fn clear_one_shots(&mut self) {
        self.trigger = false;
        self.pointer = None;
        self.look = Vec2::ZERO;
        self.pause = false;
        self.restart = false;
    }

    /// Horizontal axis: -1 left, +1 right
    pub fn horizontal(&self) -> f32 {
        (self.right as i32 - self.left as i32) as f32
    }
}
