//! Target range state
//!
//! Screen-space pixels, y down. Each round launches its targets a flight at
//! a time; every flight gets a fresh handful of shots.

use std::f32::consts::PI;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{GameKind, from_angle};
use crate::highscores::HighScore;
use crate::sim::{GameEvent, Session};
use crate::tuning::RangeTuning;

/// Escaping targets climb this much faster than they fly
pub const ESCAPE_SPEED_FACTOR: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetState {
    Flying,
    /// Shot, dropping to the ground
    Falling,
    /// Flew off the top unshot
    Escaped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub pos: Vec2,
    pub vel: Vec2,
    pub state: TargetState,
    /// Seconds since launch
    pub age: f32,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: RangeTuning,
    pub session: Session,
    pub seed: u64,
    pub(super) rng: Pcg32,
    /// Targets of the current flight still on screen
    pub targets: Vec<Target>,
    /// Targets launched so far this round
    pub launched: u32,
    /// Targets hit this round
    pub hits: u32,
    pub shots_left: u32,
    pub high_score: HighScore,
    pub(super) events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(tuning: RangeTuning, seed: u64) -> Self {
        Self {
            session: Session::new(1),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            targets: Vec::new(),
            launched: 0,
            hits: 0,
            shots_left: tuning.shots_per_flight,
            high_score: HighScore::new(GameKind::Range),
            events: Vec::new(),
            tuning,
        }
    }

    pub fn restart(&mut self) {
        self.session.restart();
        self.start_round();
        log::info!("New target range game (seed {})", self.seed);
    }

    /// Reset the per-round counters and launch the first flight
    pub fn start_round(&mut self) {
        self.launched = 0;
        self.hits = 0;
        self.targets.clear();
        self.launch_flight();
    }

    /// Target speed for the current round
    pub fn target_speed(&self) -> f32 {
        self.tuning.base_speed + self.tuning.speed_per_round * self.session.level.saturating_sub(1) as f32
    }

    /// Points for one hit this round
    pub fn hit_points(&self) -> u64 {
        let round = self.session.level.saturating_sub(1) as u64;
        (self.tuning.base_points + self.tuning.points_per_round * round).min(self.tuning.max_points)
    }

    pub fn required_hits(&self) -> u32 {
        self.tuning.required_hits(self.session.level)
    }

    /// Launch the next flight from the ground with a fresh set of shots
    pub fn launch_flight(&mut self) {
        let remaining = self.tuning.targets_per_round.saturating_sub(self.launched);
        let count = self.tuning.targets_per_flight.min(remaining);
        let speed = self.target_speed();
        let (w, ground) = (self.tuning.width, self.tuning.ground_y);
        for _ in 0..count {
            // Upward (y down), between 30 and 150 degrees
            let angle = self.rng.random_range(PI / 6.0..PI * 5.0 / 6.0);
            self.targets.push(Target {
                pos: Vec2::new(self.rng.random_range(w * 0.2..w * 0.8), ground),
                vel: from_angle(-angle) * speed,
                state: TargetState::Flying,
                age: 0.0,
            });
        }
        self.launched += count;
        self.shots_left = self.tuning.shots_per_flight;
        log::debug!("Flight of {} ({}/{})", count, self.launched, self.tuning.targets_per_round);
    }

    pub(super) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
