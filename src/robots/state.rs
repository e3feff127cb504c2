//! Robot range state
//!
//! World units, y up. The player stands at the origin and looks down -Z;
//! robots spawn in a band in front and walk in.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::GameKind;
use crate::highscores::HighScore;
use crate::sim::{GameEvent, Session};
use crate::tuning::RobotTuning;

/// Capsule centre height above the floor
pub const ROBOT_CENTRE_Y: f32 = 1.0;

/// Robots stop closing in once this near (horizontal distance)
pub const CROWD_DISTANCE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RobotState {
    /// Walking toward the player
    Advance,
    /// Knocked back after a hit
    Retreat { timer: f32 },
    /// Side-stepping; `side` is -1 or +1
    Dodge { timer: f32, side: f32 },
    /// Destroyed, removed when the timer runs out
    Dying { timer: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Robot {
    pub id: u32,
    /// Capsule centre
    pub pos: Vec3,
    pub hp: i32,
    pub state: RobotState,
    /// Hit flash time left
    pub flash: f32,
}

impl Robot {
    #[inline]
    pub fn is_dying(&self) -> bool {
        matches!(self.state, RobotState::Dying { .. })
    }
}

/// First-person camera
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Camera {
    /// Apply a mouse delta (pixels)
    pub fn look(&mut self, delta: Vec2, sensitivity: f32, pitch_limit: f32) {
        self.yaw -= delta.x * sensitivity;
        self.pitch = (self.pitch - delta.y * sensitivity).clamp(-pitch_limit, pitch_limit);
    }

    /// Unit view direction; yaw 0, pitch 0 looks down -Z
    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(-sy * cp, sp, -cy * cp)
    }
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: RobotTuning,
    pub session: Session,
    pub seed: u64,
    pub(super) rng: Pcg32,
    pub health: f32,
    pub camera: Camera,
    pub robots: Vec<Robot>,
    /// A robot was touching the player last tick
    pub in_contact: bool,
    pub high_score: HighScore,
    pub(super) events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    pub fn new(tuning: RobotTuning, seed: u64) -> Self {
        let mut state = Self {
            session: Session::new(1),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            health: tuning.starting_health,
            camera: Camera {
                pos: Vec3::new(0.0, tuning.eye_height, 0.0),
                yaw: 0.0,
                pitch: 0.0,
            },
            robots: Vec::new(),
            in_contact: false,
            high_score: HighScore::new(GameKind::Robots),
            events: Vec::new(),
            next_id: 1,
            tuning,
        };
        state.spawn_wave();
        state
    }

    pub fn restart(&mut self) {
        self.session.restart();
        self.health = self.tuning.starting_health;
        self.camera = Camera {
            pos: Vec3::new(0.0, self.tuning.eye_height, 0.0),
            yaw: 0.0,
            pitch: 0.0,
        };
        self.in_contact = false;
        self.spawn_wave();
        log::info!("New robot range game (seed {})", self.seed);
    }

    /// Robots in the wave for `level`
    pub fn wave_size(&self, level: u32) -> u32 {
        self.tuning.base_count + self.tuning.count_per_level * level
    }

    pub fn robot_hp(&self, level: u32) -> i32 {
        self.tuning.base_hp + self.tuning.hp_per_level * level as i32
    }

    /// Walking speed (units/s) at the current level
    pub fn robot_speed(&self) -> f32 {
        self.tuning.base_speed + self.tuning.speed_per_level * self.session.level as f32
    }

    /// Replace the robots with a fresh wave for the current level
    pub fn spawn_wave(&mut self) {
        let level = self.session.level;
        let hp = self.robot_hp(level);
        let count = self.wave_size(level);
        self.robots.clear();
        for _ in 0..count {
            let pos = Vec3::new(
                self.rng.random_range(-10.0..10.0),
                ROBOT_CENTRE_Y,
                self.rng.random_range(-30.0..-10.0),
            );
            let id = self.next_id;
            self.next_id += 1;
            self.robots.push(Robot {
                id,
                pos,
                hp,
                state: RobotState::Advance,
                flash: 0.0,
            });
        }
        log::debug!("Level {}: {} robots with {} hp", level, count, hp);
    }

    /// "LEVEL 3", or "LEVEL BOSS" on the boss level
    pub fn level_label(&self) -> String {
        if self.session.level == self.tuning.boss_level {
            "LEVEL BOSS".to_string()
        } else {
            format!("LEVEL {}", self.session.level)
        }
    }

    pub(super) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wave_scales_with_level() {
        let state = GameState::new(RobotTuning::default(), 5);
        assert_eq!(state.robots.len(), 7);
        assert!(state.robots.iter().all(|r| r.hp == 40));
        assert_eq!(state.wave_size(3), 11);
        assert_eq!(state.robot_hp(3), 60);
        assert!((state.robot_speed() - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_spawn_band() {
        let state = GameState::new(RobotTuning::default(), 99);
        for robot in &state.robots {
            assert!((-10.0..10.0).contains(&robot.pos.x));
            assert!((-30.0..-10.0).contains(&robot.pos.z));
        }
    }

    #[test]
    fn test_look_clamps_pitch() {
        let mut camera = Camera {
            pos: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
        };
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-6);
        camera.look(Vec2::new(0.0, -10_000.0), 0.002, 1.5);
        assert_eq!(camera.pitch, 1.5);
        camera.look(Vec2::new(100.0, 0.0), 0.002, 1.5);
        assert!((camera.yaw + 0.2).abs() < 1e-6);
        assert!((camera.forward().length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_boss_label() {
        let mut state = GameState::new(RobotTuning::default(), 1);
        assert_eq!(state.level_label(), "LEVEL 1");
        state.session.level = 4;
        assert_eq!(state.level_label(), "LEVEL BOSS");
    }
}
