//! Arcade Cabinet - a handful of browser arcade games sharing one simulation core
//!
//! Core modules:
//! - `sim`: Shared simulation plumbing (session counters, collision, events, fixed-step runner)
//! - `pacman`: Maze game with the scatter/chase/frightened/dead ghost AI
//! - `galactica`: Formation shooter
//! - `robots`: First-person robot range
//! - `range`: Duck-hunt style target range
//! - `platform`: Browser/native platform abstraction (storage)
//! - `tuning`: Data-driven game balance

pub mod galactica;
pub mod highscores;
pub mod pacman;
pub mod platform;
pub mod range;
pub mod robots;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matches the browser frame rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta accepted by the runner (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Which cabinet game is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GameKind {
    Pacman,
    Galactica,
    Robots,
    Range,
}

impl GameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Pacman => "pacman",
            GameKind::Galactica => "galactica",
            GameKind::Robots => "robots",
            GameKind::Range => "range",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pacman" | "pac-man" => Some(GameKind::Pacman),
            "galactica" | "galaga" => Some(GameKind::Galactica),
            "robots" | "fps" => Some(GameKind::Robots),
            "range" | "duck-hunt" | "duckhunt" => Some(GameKind::Range),
            _ => None,
        }
    }
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Unit vector for an angle (radians)
#[inline]
pub fn from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
