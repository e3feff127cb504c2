//! Pac-Man game state
//!
//! Everything the tick needs lives here: the maze, the player, the four
//! ghosts, the scatter/chase cycle and the session counters.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::ghost::{Ghost, GhostName, HouseState};
use super::maze::{Direction, Layout, Maze, MazeError};
use super::mode::{GhostMode, ModeCycle};
use crate::GameKind;
use crate::highscores::HighScore;
use crate::sim::{GameEvent, Session};
use crate::tuning::PacmanTuning;

/// Seconds without a dot eaten before the next waiting ghost is let out anyway
pub const IDLE_RELEASE_SECS: f32 = 4.0;

/// Ghost chain multiplier stops doubling after this many ghosts (200 → 1600)
pub const MAX_CHAIN: u32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub actor: Actor,
    /// Buffered turn, taken at the next tile centre where it is open
    pub desired: Option<Direction>,
}

impl Player {
    pub fn new(tile: IVec2) -> Self {
        Self {
            actor: Actor::new(tile, Direction::Left),
            desired: None,
        }
    }
}

/// Complete Pac-Man game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub layout: Layout,
    pub maze: Maze,
    pub tuning: PacmanTuning,
    pub session: Session,
    pub player: Player,
    /// Blinky, Pinky, Inky, Clyde
    pub ghosts: Vec<Ghost>,
    pub cycle: ModeCycle,
    /// Seconds of frightened time left (0 when the cycle is running)
    pub frightened_timer: f32,
    /// Ghosts eaten on the current power pellet
    pub ghost_chain: u32,
    /// Dots eaten this level, drives house releases
    pub dots_eaten: u32,
    /// Seconds since the last dot
    pub idle_timer: f32,
    /// Freeze before play (re)starts
    pub ready_timer: f32,
    pub extra_life_awarded: bool,
    pub high_score: HighScore,
    pub(super) events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(layout: Layout, tuning: PacmanTuning) -> Result<Self, MazeError> {
        let maze = layout.build()?;
        let session = Session::new(tuning.starting_lives);
        let mut state = Self {
            player: Player::new(layout.player_start),
            ghosts: Vec::with_capacity(4),
            cycle: ModeCycle::new(1),
            frightened_timer: 0.0,
            ghost_chain: 0,
            dots_eaten: 0,
            idle_timer: 0.0,
            ready_timer: 0.0,
            extra_life_awarded: false,
            high_score: HighScore::new(GameKind::Pacman),
            events: Vec::new(),
            layout,
            maze,
            tuning,
            session,
        };
        state.reset_actors();
        log::info!(
            "Pac-Man ready on {} maze ({} dots)",
            layout.name,
            state.maze.dots_remaining()
        );
        Ok(state)
    }

    /// Start a fresh run
    pub fn restart(&mut self) {
        self.session.restart();
        self.maze.reset();
        self.cycle = ModeCycle::new(1);
        self.dots_eaten = 0;
        self.extra_life_awarded = false;
        self.reset_actors();
        self.ready_timer = self.tuning.ready_secs;
        log::info!("New Pac-Man game");
    }

    /// Put the player and ghosts back on their spawn tiles
    pub fn reset_actors(&mut self) {
        self.player = Player::new(self.layout.player_start);
        let ambient = self.cycle.current();
        self.ghosts = GhostName::ALL
            .iter()
            .zip(self.layout.ghost_starts)
            .map(|(&name, tile)| {
                let house = if name == GhostName::Blinky {
                    HouseState::Outside
                } else {
                    HouseState::Waiting
                };
                Ghost::new(name, tile, house, ambient)
            })
            .collect();
        self.frightened_timer = 0.0;
        self.ghost_chain = 0;
        self.idle_timer = 0.0;
    }

    /// Speed multiplier for the current level
    pub fn speed_scale(&self) -> f32 {
        let level = self.session.level.saturating_sub(1) as f32;
        (1.0 + self.tuning.speed_per_level * level).min(self.tuning.max_speed_scale)
    }

    pub fn player_speed(&self) -> f32 {
        self.tuning.player_speed * self.speed_scale()
    }

    /// Tiles per second for ghost `index`
    pub fn ghost_speed(&self, index: usize) -> f32 {
        let t = &self.tuning;
        let Some(ghost) = self.ghosts.get(index) else {
            return 0.0;
        };
        if ghost.mode == GhostMode::Dead {
            return t.dead_speed;
        }
        let base = t.ghost_speed * self.speed_scale();
        if ghost.mode == GhostMode::Frightened {
            base * t.frightened_speed_factor
        } else if ghost.house == HouseState::Leaving || self.layout.is_tunnel(&self.maze, ghost.actor.tile) {
            base * t.tunnel_speed_factor
        } else {
            base
        }
    }

    /// Dot count a waiting ghost needs before it may leave
    pub fn release_threshold(&self, name: GhostName) -> u32 {
        match name {
            GhostName::Blinky => 0,
            GhostName::Pinky => self.tuning.pinky_release_dots,
            GhostName::Inky => self.tuning.inky_release_dots,
            GhostName::Clyde => self.tuning.clyde_release_dots,
        }
    }

    pub fn ghost(&self, name: GhostName) -> Option<&Ghost> {
        self.ghosts.iter().find(|g| g.name == name)
    }

    pub fn is_frightened(&self) -> bool {
        self.frightened_timer > 0.0
    }

    pub(super) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Add points, granting the one-off extra life when the threshold is crossed
    pub(super) fn score(&mut self, points: u64) {
        let total = self.session.add_score(points);
        if !self.extra_life_awarded && total >= self.tuning.extra_life_score {
            self.extra_life_awarded = true;
            self.session.lives = self.session.lives.saturating_add(1);
            log::info!("Extra life at {} points", total);
            self.emit(GameEvent::ExtraLife);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    #[test]
    fn test_new_state_layout() {
        let state = GameState::new(Layout::CLASSIC, PacmanTuning::default()).unwrap();
        assert_eq!(state.session.phase, GamePhase::Ready);
        assert_eq!(state.ghosts.len(), 4);
        assert_eq!(state.ghost(GhostName::Blinky).unwrap().house, HouseState::Outside);
        for name in [GhostName::Pinky, GhostName::Inky, GhostName::Clyde] {
            assert_eq!(state.ghost(name).unwrap().house, HouseState::Waiting);
        }
        assert_eq!(state.player.actor.tile, Layout::CLASSIC.player_start);
        assert_eq!(state.high_score, HighScore::new(GameKind::Pacman));
    }

    #[test]
    fn test_speed_scale_is_capped() {
        let mut state = GameState::new(Layout::MINI, PacmanTuning::default()).unwrap();
        assert_eq!(state.speed_scale(), 1.0);
        state.session.level = 3;
        assert!((state.speed_scale() - 1.1).abs() < 1e-5);
        state.session.level = 40;
        assert_eq!(state.speed_scale(), 1.25);
    }

    #[test]
    fn test_ghost_speed_by_state() {
        let mut state = GameState::new(Layout::CLASSIC, PacmanTuning::default()).unwrap();
        let t = PacmanTuning::default();
        assert_eq!(state.ghost_speed(0), t.ghost_speed);
        state.ghosts[0].mode = GhostMode::Frightened;
        assert_eq!(state.ghost_speed(0), t.ghost_speed * t.frightened_speed_factor);
        state.ghosts[0].mode = GhostMode::Dead;
        assert_eq!(state.ghost_speed(0), t.dead_speed);
        state.ghosts[0].mode = GhostMode::Chase;
        state.ghosts[0].actor.tile = IVec2::new(2, 14);
        assert_eq!(state.ghost_speed(0), t.ghost_speed * t.tunnel_speed_factor);
        assert_eq!(state.ghost_speed(9), 0.0);
    }

    #[test]
    fn test_extra_life_awarded_once() {
        let mut state = GameState::new(Layout::CLASSIC, PacmanTuning::default()).unwrap();
        state.restart();
        state.score(9_990);
        assert_eq!(state.session.lives, 3);
        state.score(10);
        assert_eq!(state.session.lives, 4);
        state.score(20_000);
        assert_eq!(state.session.lives, 4);
        assert_eq!(state.events.iter().filter(|e| **e == GameEvent::ExtraLife).count(), 1);
    }
}
