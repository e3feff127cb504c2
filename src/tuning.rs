//! Data-driven game balance
//!
//! Every number a designer might want to tweak lives here. Defaults reproduce
//! the stock cabinet; a JSON override only needs the fields it changes.

use serde::{Deserialize, Serialize};

/// Pac-Man balance (distances in tiles, speeds in tiles/second)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacmanTuning {
    pub starting_lives: u8,
    pub player_speed: f32,
    pub ghost_speed: f32,
    /// Multiplier on ghost speed while frightened
    pub frightened_speed_factor: f32,
    /// Multiplier on ghost speed inside the side tunnels
    pub tunnel_speed_factor: f32,
    /// Dead ghosts (eyes) race home at this speed
    pub dead_speed: f32,
    /// Per-level speed increase (fraction), capped by `max_speed_scale`
    pub speed_per_level: f32,
    pub max_speed_scale: f32,
    pub frightened_secs: f32,
    pub dot_points: u64,
    pub power_pellet_points: u64,
    /// First ghost of a pellet chain; doubles each subsequent ghost
    pub ghost_points: u64,
    pub extra_life_score: u64,
    pub collision_radius: f32,
    pub pinky_release_dots: u32,
    pub inky_release_dots: u32,
    pub clyde_release_dots: u32,
    /// Clyde chases only while farther than this
    pub clyde_shy_distance: f32,
    /// Delay before play resumes after a life is lost or a level starts
    pub ready_secs: f32,
}

impl Default for PacmanTuning {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            player_speed: 7.5,
            ghost_speed: 7.0,
            frightened_speed_factor: 0.6,
            tunnel_speed_factor: 0.5,
            dead_speed: 14.0,
            speed_per_level: 0.05,
            max_speed_scale: 1.25,
            frightened_secs: 7.0,
            dot_points: 10,
            power_pellet_points: 50,
            ghost_points: 200,
            extra_life_score: 10_000,
            collision_radius: 0.5,
            pinky_release_dots: 0,
            inky_release_dots: 30,
            clyde_release_dots: 60,
            clyde_shy_distance: 8.0,
            ready_secs: 2.0,
        }
    }
}

/// Galactica balance (pixels, pixels/second)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalacticaTuning {
    pub width: f32,
    pub height: f32,
    pub starting_lives: u8,
    pub player_speed: f32,
    /// Distance kept from the side edges
    pub player_margin: f32,
    pub fire_cooldown: f32,
    pub bullet_speed: f32,
    pub enemy_bullet_base_speed: f32,
    pub enemy_bullet_speed_per_speed: f32,
    pub enemy_bullet_radius: f32,
    pub player_hit_radius: f32,
    pub ram_radius: f32,
    pub bullet_hit_radius: f32,
    pub kill_bonus: u64,
    pub respawn_secs: f32,
    /// Dive probability per 60 Hz tick at level 0, plus per-level increase
    pub dive_chance: f32,
    pub dive_chance_per_level: f32,
    pub max_particles: usize,
}

impl Default for GalacticaTuning {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 720.0,
            starting_lives: 3,
            player_speed: 320.0,
            player_margin: 60.0,
            fire_cooldown: 0.2,
            bullet_speed: 620.0,
            enemy_bullet_base_speed: 180.0,
            enemy_bullet_speed_per_speed: 40.0,
            enemy_bullet_radius: 5.0,
            player_hit_radius: 22.0,
            ram_radius: 30.0,
            bullet_hit_radius: 26.0,
            kill_bonus: 200,
            respawn_secs: 1.6,
            dive_chance: 0.002,
            dive_chance_per_level: 0.0003,
            max_particles: 400,
        }
    }
}

/// First-person robot range balance (world units)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotTuning {
    pub starting_health: f32,
    pub eye_height: f32,
    pub look_sensitivity: f32,
    pub pitch_limit: f32,
    pub base_count: u32,
    pub count_per_level: u32,
    pub base_hp: i32,
    pub hp_per_level: i32,
    pub shot_damage: i32,
    pub robot_radius: f32,
    /// Half length of the capsule's inner segment
    pub robot_half_height: f32,
    pub base_speed: f32,
    pub speed_per_level: f32,
    pub contact_radius: f32,
    /// Health drained per second while a robot is in contact
    pub contact_dps: f32,
    pub boss_level: u32,
    pub retreat_secs: f32,
    pub retreat_speed: f32,
    /// Chance per second that an advancing robot starts a sidestep
    pub dodge_chance: f32,
    pub dodge_secs: f32,
    pub dodge_speed: f32,
    pub dying_secs: f32,
    pub flash_secs: f32,
    pub points_per_kill: u64,
}

impl Default for RobotTuning {
    fn default() -> Self {
        Self {
            starting_health: 100.0,
            eye_height: 1.6,
            look_sensitivity: 0.002,
            pitch_limit: 1.5,
            base_count: 5,
            count_per_level: 2,
            base_hp: 30,
            hp_per_level: 10,
            shot_damage: 20,
            robot_radius: 0.4,
            robot_half_height: 0.6,
            base_speed: 1.2,
            speed_per_level: 0.3,
            contact_radius: 1.5,
            contact_dps: 12.0,
            boss_level: 4,
            retreat_secs: 0.4,
            retreat_speed: 2.0,
            dodge_chance: 0.25,
            dodge_secs: 0.6,
            dodge_speed: 2.5,
            dying_secs: 0.5,
            flash_secs: 0.1,
            points_per_kill: 100,
        }
    }
}

/// Target range balance (pixels, pixels/second)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeTuning {
    pub width: f32,
    pub height: f32,
    /// Horizon line; targets launch from here and escape above the top
    pub ground_y: f32,
    pub targets_per_round: u32,
    pub targets_per_flight: u32,
    pub shots_per_flight: u32,
    pub target_radius: f32,
    pub base_speed: f32,
    pub speed_per_round: f32,
    pub escape_secs: f32,
    pub fall_speed: f32,
    pub base_points: u64,
    pub points_per_round: u64,
    pub max_points: u64,
    pub perfect_bonus: u64,
}

impl Default for RangeTuning {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            ground_y: 450.0,
            targets_per_round: 10,
            targets_per_flight: 2,
            shots_per_flight: 3,
            target_radius: 24.0,
            base_speed: 180.0,
            speed_per_round: 15.0,
            escape_secs: 5.0,
            fall_speed: 300.0,
            base_points: 500,
            points_per_round: 100,
            max_points: 1000,
            perfect_bonus: 10_000,
        }
    }
}

impl RangeTuning {
    /// Hits needed to survive a round
    pub fn required_hits(&self, round: u32) -> u32 {
        let needed = match round {
            0..=10 => 6,
            11 => 7,
            12 => 8,
            _ => 9,
        };
        needed.min(self.targets_per_round)
    }
}

/// All cabinet tuning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub pacman: PacmanTuning,
    pub galactica: GalacticaTuning,
    pub robots: RobotTuning,
    pub range: RangeTuning,
}

impl Tuning {
    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
