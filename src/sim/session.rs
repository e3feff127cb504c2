//! Session counters shared by every game
//!
//! Score, lives and level live for one run and are reset on restart.

use serde::{Deserialize, Serialize};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first input (attract screen)
    Ready,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended
    GameOver,
}

/// Score/lives/level for a single run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub score: u64,
    pub lives: u8,
    /// 1-based level (wave, round)
    pub level: u32,
    pub phase: GamePhase,
    starting_lives: u8,
}

impl Session {
    pub fn new(starting_lives: u8) -> Self {
        Self {
            score: 0,
            lives: starting_lives,
            level: 1,
            phase: GamePhase::Ready,
            starting_lives,
        }
    }

    /// Reset counters for a new run and start playing
    pub fn restart(&mut self) {
        self.score = 0;
        self.lives = self.starting_lives;
        self.level = 1;
        self.phase = GamePhase::Playing;
    }

    /// Add points, returning the new score
    pub fn add_score(&mut self, points: u64) -> u64 {
        self.score = self.score.saturating_add(points);
        self.score
    }

    /// Remove one life. Returns true when that was the last one (phase becomes GameOver).
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            true
        } else {
            false
        }
    }

    /// End the run regardless of remaining lives (health-based games)
    pub fn end(&mut self) {
        self.phase = GamePhase::GameOver;
    }

    /// Bump the level counter, returning the new level
    pub fn advance_level(&mut self) -> u32 {
        self.level += 1;
        self.level
    }

    /// Toggle pause. Returns the new phase. Ready/GameOver are unaffected.
    pub fn toggle_pause(&mut self) -> GamePhase {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
        self.phase
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
