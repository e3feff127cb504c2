//! High score persistence
//!
//! One scalar per game, persisted to LocalStorage as a plain integer string
//! (e.g. `pacman-highscore` → `"12340"`).

use serde::{Deserialize, Serialize};

use crate::GameKind;
use crate::platform::Storage;

/// Best score for one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    key: String,
    pub best: u64,
}

impl HighScore {
    /// Storage key for a game's high score
    pub fn key_for(kind: GameKind) -> String {
        format!("{}-highscore", kind.as_str())
    }

    /// Fresh (zero) high score for a game
    pub fn new(kind: GameKind) -> Self {
        Self {
            key: Self::key_for(kind),
            best: 0,
        }
    }

    /// Check if a score beats the stored best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a finished run's score. Returns true on a new best.
    pub fn submit(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        log::info!("New high score for {}: {} (was {})", self.key, score, self.best);
        self.best = score;
        true
    }

    /// Parse a stored value; surrounding whitespace is tolerated
    pub fn parse(raw: &str) -> Option<u64> {
        raw.trim().parse().ok()
    }

    /// Load a game's high score, falling back to 0 when missing or unreadable
    pub fn load(kind: GameKind, storage: &dyn Storage) -> Self {
        let mut score = Self::new(kind);
        match storage.get(&score.key) {
            Some(raw) => match Self::parse(&raw) {
                Some(best) => {
                    log::info!("Loaded {} = {}", score.key, best);
                    score.best = best;
                }
                None => log::warn!("Ignoring unreadable {} value {:?}", score.key, raw),
            },
            None => log::info!("No {} found, starting fresh", score.key),
        }
        score
    }

    /// Save as a plain integer string
    pub fn save(&self, storage: &mut dyn Storage) {
        storage.set(&self.key, &self.best.to_string());
    }
}
