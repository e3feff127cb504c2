//! Galactica game state
//!
//! Screen-space pixels, y down. Enemies fly in from above, settle into a
//! formation orbit and peel off into dives.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::GameKind;
use crate::highscores::HighScore;
use crate::settings::Settings;
use crate::sim::{GameEvent, Session};
use crate::tuning::GalacticaTuning;

/// Enemy classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Scout,
    Bomber,
    Ace,
}

impl EnemyKind {
    pub fn hp(&self) -> i32 {
        match self {
            EnemyKind::Scout => 1,
            EnemyKind::Bomber => 2,
            EnemyKind::Ace => 3,
        }
    }

    /// Points per hit
    pub fn points(&self) -> u64 {
        match self {
            EnemyKind::Scout => 50,
            EnemyKind::Bomber => 120,
            EnemyKind::Ace => 200,
        }
    }
}

/// One wave's composition
#[derive(Debug, Clone, Copy)]
pub struct Blueprint {
    pub kind: EnemyKind,
    pub count: usize,
    /// Dive and bullet speed multiplier
    pub speed: f32,
}

pub const BLUEPRINTS: [Blueprint; 5] = [
    Blueprint { kind: EnemyKind::Scout, count: 18, speed: 0.8 },
    Blueprint { kind: EnemyKind::Bomber, count: 12, speed: 0.9 },
    Blueprint { kind: EnemyKind::Ace, count: 8, speed: 1.0 },
    Blueprint { kind: EnemyKind::Scout, count: 22, speed: 1.05 },
    Blueprint { kind: EnemyKind::Bomber, count: 16, speed: 1.1 },
];

/// Formation slots relative to the screen centre; also caps the wave size
pub const FORMATION: [Vec2; 23] = [
    Vec2::new(-220.0, -140.0),
    Vec2::new(-160.0, -140.0),
    Vec2::new(-100.0, -140.0),
    Vec2::new(-40.0, -140.0),
    Vec2::new(40.0, -140.0),
    Vec2::new(100.0, -140.0),
    Vec2::new(160.0, -140.0),
    Vec2::new(220.0, -140.0),
    Vec2::new(-200.0, -80.0),
    Vec2::new(-140.0, -80.0),
    Vec2::new(-80.0, -80.0),
    Vec2::new(-20.0, -80.0),
    Vec2::new(20.0, -80.0),
    Vec2::new(80.0, -80.0),
    Vec2::new(140.0, -80.0),
    Vec2::new(200.0, -80.0),
    Vec2::new(-180.0, -20.0),
    Vec2::new(-120.0, -20.0),
    Vec2::new(-60.0, -20.0),
    Vec2::new(0.0, -20.0),
    Vec2::new(60.0, -20.0),
    Vec2::new(120.0, -20.0),
    Vec2::new(180.0, -20.0),
];

/// Formation origins sit this far above their slot so waves enter from off-screen
pub const ENTRY_LIFT: f32 = 260.0;

/// Seconds a "Wave n" banner stays up
pub const MESSAGE_SECS: f32 = 2.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    /// Sliding down into the formation
    Entry,
    /// Circling the formation origin
    Orbit,
    /// Swooping at the player
    Dive,
    /// Flying back to the formation after leaving the bottom
    Return,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub hp: i32,
    pub pos: Vec2,
    pub origin: Vec2,
    /// Orbit phase offset (radians)
    pub phase: f32,
    pub orbit_radius: f32,
    pub speed: f32,
    pub state: EnemyState,
    pub fire_cooldown: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// A particle for visual effects
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left
    pub life: f32,
    pub size: f32,
}

/// The player's fighter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub cooldown: f32,
    pub alive: bool,
    pub respawn_timer: f32,
}

/// Complete Galactica state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: GalacticaTuning,
    pub session: Session,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(super) rng: Pcg32,
    pub ship: Ship,
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Seconds since the wave spawned; drives orbits
    pub wave_timer: f32,
    pub wave_index: usize,
    pub message: Option<String>,
    pub message_timer: f32,
    /// Screen shake amplitude in pixels
    pub shake: f32,
    pub particles_enabled: bool,
    pub shake_enabled: bool,
    pub high_score: HighScore,
    pub(super) events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(tuning: GalacticaTuning, seed: u64) -> Self {
        let session = Session::new(tuning.starting_lives);
        let mut state = Self {
            ship: Ship {
                pos: Vec2::ZERO,
                cooldown: 0.0,
                alive: true,
                respawn_timer: 0.0,
            },
            session,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies: Vec::new(),
            particles: Vec::new(),
            wave_timer: 0.0,
            wave_index: 0,
            message: None,
            message_timer: 0.0,
            shake: 0.0,
            particles_enabled: true,
            shake_enabled: true,
            high_score: HighScore::new(GameKind::Galactica),
            events: Vec::new(),
            tuning,
        };
        state.reset_ship();
        state.spawn_wave(0);
        state
    }

    /// Pick up the visual toggles from user settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.particles_enabled = settings.particles;
        self.shake_enabled = settings.effective_screen_shake();
    }

    pub fn restart(&mut self) {
        self.session.restart();
        self.reset_ship();
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.particles.clear();
        self.shake = 0.0;
        self.spawn_wave(0);
        log::info!("New Galactica game (seed {})", self.seed);
    }

    fn reset_ship(&mut self) {
        self.ship = Ship {
            pos: Vec2::new(self.tuning.width / 2.0, self.tuning.height - 80.0),
            cooldown: 0.0,
            alive: true,
            respawn_timer: 0.0,
        };
    }

    /// Replace the enemy list with blueprint `index` (cycled)
    pub fn spawn_wave(&mut self, index: usize) {
        let blueprint = BLUEPRINTS[index % BLUEPRINTS.len()];
        let centre = Vec2::new(self.tuning.width / 2.0, self.tuning.height / 2.0 - ENTRY_LIFT);
        self.enemies = FORMATION
            .iter()
            .take(blueprint.count)
            .enumerate()
            .map(|(i, offset)| {
                let origin = centre + *offset;
                Enemy {
                    id: i as u32,
                    kind: blueprint.kind,
                    hp: blueprint.kind.hp(),
                    pos: origin,
                    origin,
                    phase: self.rng.random_range(0.0..TAU),
                    orbit_radius: self.rng.random_range(80.0..180.0),
                    speed: blueprint.speed,
                    state: EnemyState::Entry,
                    fire_cooldown: self.rng.random_range(1.5..3.5),
                }
            })
            .collect();
        self.wave_timer = 0.0;
        self.wave_index = index;
        self.show_message(format!("Wave {}", index + 1));
        log::debug!("Spawned wave {} ({} x {:?})", index + 1, self.enemies.len(), blueprint.kind);
    }

    pub fn show_message(&mut self, text: String) {
        self.message = Some(text);
        self.message_timer = MESSAGE_SECS;
    }

    /// Burst of particles, if enabled
    pub fn explode(&mut self, at: Vec2, count: usize) {
        if !self.particles_enabled {
            return;
        }
        let room = self.tuning.max_particles.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let vel = Vec2::new(
                self.rng.random_range(-120.0..120.0),
                self.rng.random_range(-120.0..120.0),
            );
            self.particles.push(Particle {
                pos: at,
                vel,
                life: self.rng.random_range(0.6..1.2),
                size: self.rng.random_range(1.5..3.5),
            });
        }
    }

    pub fn add_shake(&mut self, amount: f32) {
        if self.shake_enabled {
            self.shake = self.shake.max(amount);
        }
    }

    /// Per-tick dive probability at the current level (60 Hz basis)
    pub fn dive_chance(&self) -> f32 {
        self.tuning.dive_chance + self.session.level as f32 * self.tuning.dive_chance_per_level
    }

    pub(super) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waves_follow_blueprints() {
        let mut state = GameState::new(GalacticaTuning::default(), 7);
        assert_eq!(state.enemies.len(), 18);
        assert!(state.enemies.iter().all(|e| e.kind == EnemyKind::Scout && e.hp == 1));
        state.spawn_wave(2);
        assert_eq!(state.enemies.len(), 8);
        assert!(state.enemies.iter().all(|e| e.hp == 3));
        state.spawn_wave(6);
        assert_eq!(state.enemies.len(), 12);
        assert_eq!(state.message.as_deref(), Some("Wave 7"));
    }

    #[test]
    fn test_formation_caps_wave_size() {
        assert!(BLUEPRINTS.iter().all(|b| b.count <= FORMATION.len()));
    }

    #[test]
    fn test_same_seed_same_wave() {
        let a = GameState::new(GalacticaTuning::default(), 42);
        let b = GameState::new(GalacticaTuning::default(), 42);
        for (x, y) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(x.phase, y.phase);
            assert_eq!(x.orbit_radius, y.orbit_radius);
        }
    }

    #[test]
    fn test_particles_respect_settings_and_cap() {
        let mut state = GameState::new(GalacticaTuning::default(), 1);
        state.apply_settings(&Settings {
            particles: false,
            ..Default::default()
        });
        state.explode(Vec2::ZERO, 18);
        assert!(state.particles.is_empty());

        state.particles_enabled = true;
        for _ in 0..100 {
            state.explode(Vec2::ZERO, 18);
        }
        assert_eq!(state.particles.len(), state.tuning.max_particles);
    }
}
