//! Fixed timestep Pac-Man tick
//!
//! Order per tick: input, mode timers, house releases, player movement and
//! eating, ghost movement, then player/ghost collisions.

use glam::Vec2;

use super::ghost::{GhostName, HouseState, TargetContext};
use super::maze::{Direction, Tile};
use super::mode::{GhostMode, ModeCycle};
use super::state::{GameState, IDLE_RELEASE_SECS, MAX_CHAIN};
use crate::sim::{Cabinet, GameEvent, GamePhase, Hud, TickInput, within};

/// Steps per tick are bounded; an actor never covers more than a tile per tick
const MAX_HOPS: usize = 4;

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.restart && matches!(state.session.phase, GamePhase::Ready | GamePhase::GameOver) {
        state.restart();
        return;
    }

    if input.pause {
        let before = state.session.phase;
        match state.session.toggle_pause() {
            GamePhase::Paused if before != GamePhase::Paused => state.emit(GameEvent::Paused),
            GamePhase::Playing if before == GamePhase::Paused => state.emit(GameEvent::Resumed),
            _ => {}
        }
    }

    if !state.session.is_playing() {
        return;
    }

    if let Some(dir) = desired_direction(input) {
        state.player.desired = Some(dir);
    }

    if state.ready_timer > 0.0 {
        state.ready_timer = (state.ready_timer - dt).max(0.0);
        return;
    }

    update_modes(state, dt);
    release_ghosts(state, dt);

    move_player(state, dt);
    if state.maze.dots_remaining() == 0 {
        next_level(state);
        return;
    }

    // Collisions before and after ghost movement so a head-on pass can't tunnel through
    if resolve_collisions(state) {
        return;
    }
    move_ghosts(state, dt);
    resolve_collisions(state);
}

/// Latest direction key held; vertical wins ties like the arcade stick
fn desired_direction(input: &TickInput) -> Option<Direction> {
    if input.up {
        Some(Direction::Up)
    } else if input.down {
        Some(Direction::Down)
    } else if input.left {
        Some(Direction::Left)
    } else if input.right {
        Some(Direction::Right)
    } else {
        None
    }
}

/// Frightened countdown, or the scatter/chase cycle when nothing is frightened
pub(super) fn update_modes(state: &mut GameState, dt: f32) {
    if state.frightened_timer > 0.0 {
        state.frightened_timer -= dt;
        if state.frightened_timer <= 0.0 {
            state.frightened_timer = 0.0;
            let ambient = state.cycle.current();
            for ghost in state.ghosts.iter_mut().filter(|g| g.mode == GhostMode::Frightened) {
                ghost.mode = ambient;
            }
            log::debug!("Frightened over, ghosts back to {:?}", ambient);
        }
        return;
    }

    if state.cycle.advance(dt) {
        let ambient = state.cycle.current();
        for ghost in &mut state.ghosts {
            if matches!(ghost.mode, GhostMode::Scatter | GhostMode::Chase) {
                ghost.mode = ambient;
                if ghost.house == HouseState::Outside {
                    ghost.reverse_pending = true;
                }
            }
        }
        log::debug!("Mode switch to {:?} (window {})", ambient, state.cycle.window_index());
    }
}

/// Let waiting ghosts out by dot count, or one at a time when the player stalls
fn release_ghosts(state: &mut GameState, dt: f32) {
    state.idle_timer += dt;
    let force_one = state.idle_timer >= IDLE_RELEASE_SECS;
    let mut forced = false;

    for i in 0..state.ghosts.len() {
        if state.ghosts[i].house != HouseState::Waiting {
            continue;
        }
        let threshold = state.release_threshold(state.ghosts[i].name);
        let release = state.dots_eaten >= threshold || (force_one && !forced);
        if release {
            forced |= state.dots_eaten < threshold;
            let ghost = &mut state.ghosts[i];
            ghost.house = HouseState::Leaving;
            ghost.actor.dir = Direction::Up;
            ghost.replan();
            log::debug!("{:?} released after {} dots", ghost.name, state.dots_eaten);
        }
    }

    if force_one {
        state.idle_timer = 0.0;
    }
}

fn move_player(state: &mut GameState, dt: f32) {
    let mut budget = state.player_speed() * dt;

    // Reversing is allowed mid-hop
    if let Some(want) = state.player.desired {
        if !state.player.actor.at_center() && want == state.player.actor.dir.opposite() {
            state.player.actor.reverse(&state.maze);
        }
    }

    for _ in 0..MAX_HOPS {
        if budget <= 1e-6 {
            break;
        }
        if state.player.actor.at_center() {
            let here = state.player.actor.tile;
            if let Some(want) = state.player.desired {
                if state.maze.player_can_enter(here + want.delta()) {
                    state.player.actor.dir = want;
                }
            }
            if !state.maze.player_can_enter(here + state.player.actor.dir.delta()) {
                break;
            }
        }
        let mut arrived = false;
        budget = state.player.actor.travel(&state.maze, budget, &mut arrived);
        if arrived {
            consume_tile(state);
        }
    }
}

/// Eat whatever is under the player
fn consume_tile(state: &mut GameState) {
    let tile = state.player.actor.tile;
    match state.maze.eat(tile) {
        Tile::Dot => {
            state.dots_eaten += 1;
            state.idle_timer = 0.0;
            state.score(state.tuning.dot_points);
            state.emit(GameEvent::DotEaten);
        }
        Tile::PowerPellet => {
            state.dots_eaten += 1;
            state.idle_timer = 0.0;
            state.score(state.tuning.power_pellet_points);
            frighten(state);
            state.emit(GameEvent::PowerPelletEaten);
        }
        _ => {}
    }
}

/// Turn every live ghost blue and restart the frightened timer
pub(super) fn frighten(state: &mut GameState) {
    state.frightened_timer = state.tuning.frightened_secs;
    state.ghost_chain = 0;
    for ghost in &mut state.ghosts {
        match ghost.mode {
            GhostMode::Dead => {}
            GhostMode::Frightened => {}
            GhostMode::Scatter | GhostMode::Chase => {
                ghost.mode = GhostMode::Frightened;
                if ghost.house == HouseState::Outside {
                    ghost.reverse_pending = true;
                }
            }
        }
    }
    log::debug!("Power pellet: frightened for {}s", state.tuning.frightened_secs);
}

fn move_ghosts(state: &mut GameState, dt: f32) {
    let player_tile = state.player.actor.nearest_tile(&state.maze);
    let ctx = TargetContext {
        player_tile,
        player_dir: state.player.actor.dir,
        blinky_tile: state
            .ghost(GhostName::Blinky)
            .map(|g| g.actor.tile)
            .unwrap_or(player_tile),
        shy_distance: state.tuning.clyde_shy_distance,
    };
    let ambient = state.cycle.current();

    for i in 0..state.ghosts.len() {
        let distance = state.ghost_speed(i) * dt;
        state.ghosts[i].step(&state.maze, &state.layout, &ctx, ambient, distance);
    }
}

/// Player vs ghost. Returns true if the player died this tick.
pub(super) fn resolve_collisions(state: &mut GameState) -> bool {
    let player = state.player.actor.position();
    let radius = state.tuning.collision_radius;

    for i in 0..state.ghosts.len() {
        let gap = state.maze.separation(player, state.ghosts[i].actor.position());
        if !within(Vec2::ZERO, gap, radius) {
            continue;
        }
        if state.ghosts[i].is_dangerous() {
            lose_life(state);
            return true;
        }
        if state.ghosts[i].mode == GhostMode::Frightened {
            let points = state.tuning.ghost_points << state.ghost_chain.min(MAX_CHAIN);
            state.ghost_chain += 1;
            let ghost = &mut state.ghosts[i];
            ghost.mode = GhostMode::Dead;
            ghost.reverse_pending = false;
            if ghost.house == HouseState::Leaving {
                ghost.house = HouseState::Entering;
            }
            log::debug!("{:?} eaten for {}", ghost.name, points);
            state.score(points);
            state.emit(GameEvent::GhostEaten { points });
        }
    }
    false
}

fn lose_life(state: &mut GameState) {
    state.emit(GameEvent::PlayerHit);
    let over = state.session.lose_life();
    state.emit(GameEvent::LifeLost {
        remaining: state.session.lives,
    });
    if over {
        game_over(state);
    } else {
        state.reset_actors();
        state.ready_timer = state.tuning.ready_secs;
    }
}

fn game_over(state: &mut GameState) {
    let score = state.session.score;
    log::info!("Game over at level {} with {} points", state.session.level, score);
    state.emit(GameEvent::GameOver { score });
    if state.high_score.submit(score) {
        state.emit(GameEvent::NewHighScore { score });
    }
}

fn next_level(state: &mut GameState) {
    let level = state.session.advance_level();
    state.maze.reset();
    state.cycle = ModeCycle::new(level);
    state.dots_eaten = 0;
    state.reset_actors();
    state.ready_timer = state.tuning.ready_secs;
    log::info!("Maze cleared, starting level {}", level);
    state.emit(GameEvent::WaveCleared { level });
}

impl Cabinet for GameState {
    fn tick(&mut self, input: &TickInput, dt: f32) {
        tick(self, input, dt);
    }

    fn hud(&self) -> Hud {
        let status = match self.session.phase {
            GamePhase::Ready => Some("Press Enter".to_string()),
            GamePhase::Paused => Some("Paused".to_string()),
            GamePhase::GameOver => Some("Game Over - Press Enter".to_string()),
            GamePhase::Playing if self.ready_timer > 0.0 => Some("Ready!".to_string()),
            GamePhase::Playing => None,
        };
        Hud {
            score: self.session.score,
            lives: Some(self.session.lives),
            level_label: format!("LEVEL {}", self.session.level),
            health: None,
            ammo: None,
            status,
            phase: self.session.phase,
        }
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use glam::IVec2;

    use super::*;
    use crate::pacman::actor::Actor;
    use crate::pacman::maze::Layout;
    use crate::sim::Runner;
    use crate::tuning::PacmanTuning;

    const DT: f32 = 1.0 / 60.0;

    fn playing(layout: Layout) -> GameState {
        let mut state = GameState::new(layout, PacmanTuning::default()).unwrap();
        state.restart();
        state.ready_timer = 0.0;
        state
    }

    /// Park ghosts far from the player's corner so they can't interfere
    fn park_ghosts(state: &mut GameState) {
        for ghost in &mut state.ghosts {
            ghost.house = HouseState::Waiting;
        }
        state.dots_eaten = 0;
        state.tuning.pinky_release_dots = 1000;
        state.tuning.inky_release_dots = 1000;
        state.tuning.clyde_release_dots = 1000;
    }

    #[test]
    fn test_ready_phase_waits_for_restart() {
        let mut state = GameState::new(Layout::CLASSIC, PacmanTuning::default()).unwrap();
        let start = state.ghosts[0].actor.clone();
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.session.phase, GamePhase::Ready);
        assert_eq!(state.ghosts[0].actor.progress, start.progress);

        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.session.phase, GamePhase::Playing);
        assert_eq!(state.hud().status.as_deref(), Some("Ready!"));
    }

    #[test]
    fn test_dot_scores_ten() {
        let mut state = playing(Layout::CLASSIC);
        park_ghosts(&mut state);
        state.player.actor.tile = IVec2::new(1, 1);
        state.player.actor.dir = Direction::Right;
        state.player.actor.progress = 0.95;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.player.actor.tile, IVec2::new(2, 1));
        assert_eq!(state.session.score, 10);
        assert_eq!(state.dots_eaten, 1);
        assert!(state.drain_events().contains(&GameEvent::DotEaten));
    }

    #[test]
    fn test_power_pellet_frightens_for_seven_seconds() {
        let mut state = playing(Layout::CLASSIC);
        state.ghosts[3].mode = GhostMode::Dead;
        state.player.actor.tile = IVec2::new(1, 4);
        state.player.actor.dir = Direction::Up;
        state.player.actor.progress = 0.95;
        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.session.score, 50);
        assert!(state.drain_events().contains(&GameEvent::PowerPelletEaten));
        assert_eq!(state.frightened_timer, 7.0);
        for ghost in &state.ghosts[..3] {
            assert_eq!(ghost.mode, GhostMode::Frightened);
        }
        assert_eq!(state.ghosts[3].mode, GhostMode::Dead);

        // Cycle is paused while frightened
        let window = state.cycle.window_index();
        update_modes(&mut state, 6.9);
        assert_eq!(state.ghosts[0].mode, GhostMode::Frightened);
        assert_eq!(state.cycle.window_index(), window);
        update_modes(&mut state, 0.2);
        assert!(!state.is_frightened());
        for ghost in &state.ghosts[..3] {
            assert_eq!(ghost.mode, state.cycle.current());
        }
        assert_eq!(state.ghosts[3].mode, GhostMode::Dead);
    }

    #[test]
    fn test_second_pellet_restarts_timer() {
        let mut state = playing(Layout::CLASSIC);
        frighten(&mut state);
        update_modes(&mut state, 5.0);
        frighten(&mut state);
        assert_eq!(state.frightened_timer, 7.0);
        update_modes(&mut state, 5.0);
        assert!(state.is_frightened());
    }

    #[test]
    fn test_ghost_chain_doubles() {
        let mut state = playing(Layout::CLASSIC);
        frighten(&mut state);
        for ghost in &mut state.ghosts {
            ghost.house = HouseState::Outside;
            ghost.actor = state.player.actor.clone();
        }
        assert!(!resolve_collisions(&mut state));
        assert_eq!(state.session.score, 200 + 400 + 800 + 1600);
        assert!(state.ghosts.iter().all(|g| g.mode == GhostMode::Dead));
        let points: Vec<u64> = state
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::GhostEaten { points } => Some(points),
                _ => None,
            })
            .collect();
        assert_eq!(points, vec![200, 400, 800, 1600]);
    }

    #[test]
    fn test_dangerous_ghost_costs_a_life() {
        let mut state = playing(Layout::CLASSIC);
        state.ghosts[0].actor = state.player.actor.clone();
        state.ghosts[0].mode = GhostMode::Chase;
        assert!(resolve_collisions(&mut state));
        assert_eq!(state.session.lives, 2);
        assert!(state.ready_timer > 0.0);
        assert_eq!(state.player.actor.tile, Layout::CLASSIC.player_start);
        assert_eq!(state.ghosts[0].actor.tile, Layout::CLASSIC.ghost_starts[0]);
        assert!(state.drain_events().contains(&GameEvent::LifeLost { remaining: 2 }));
    }

    #[test]
    fn test_collision_across_tunnel_seam() {
        let mut state = playing(Layout::CLASSIC);
        state.player.actor = Actor {
            tile: IVec2::new(0, 14),
            dir: Direction::Left,
            progress: 0.6,
        };
        let ghost = &mut state.ghosts[0];
        ghost.house = HouseState::Outside;
        ghost.mode = GhostMode::Chase;
        ghost.actor = Actor {
            tile: IVec2::new(27, 14),
            dir: Direction::Right,
            progress: 0.6,
        };
        assert!(resolve_collisions(&mut state));
        assert_eq!(state.session.lives, 2);
        assert!(state.drain_events().contains(&GameEvent::PlayerHit));
    }

    #[test]
    fn test_frightened_ghost_eaten_across_tunnel_seam() {
        let mut state = playing(Layout::CLASSIC);
        state.player.actor = Actor {
            tile: IVec2::new(27, 14),
            dir: Direction::Right,
            progress: 0.7,
        };
        frighten(&mut state);
        let ghost = &mut state.ghosts[0];
        ghost.actor = Actor {
            tile: IVec2::new(0, 14),
            dir: Direction::Right,
            progress: 0.0,
        };
        assert!(!resolve_collisions(&mut state));
        assert_eq!(state.ghosts[0].mode, GhostMode::Dead);
        assert_eq!(state.session.score, 200);
    }

    #[test]
    fn test_last_life_ends_game_and_records_high_score() {
        let mut state = playing(Layout::CLASSIC);
        state.session.lives = 1;
        state.session.score = 1234;
        state.ghosts[1].house = HouseState::Outside;
        state.ghosts[1].actor = state.player.actor.clone();
        assert!(resolve_collisions(&mut state));
        assert!(state.session.is_over());
        assert_eq!(state.high_score.best, 1234);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::GameOver { score: 1234 }));
        assert!(events.contains(&GameEvent::NewHighScore { score: 1234 }));
        assert_eq!(state.hud().status.as_deref(), Some("Game Over - Press Enter"));

        // Frozen until restarted
        let score = state.session.score;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.session.score, score);
        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.session.score, 0);
        assert_eq!(state.session.lives, 3);
        assert_eq!(state.high_score.best, 1234);
    }

    #[test]
    fn test_clearing_maze_advances_level() {
        let mut state = playing(Layout::MINI);
        park_ghosts(&mut state);
        for y in 0..state.maze.height() {
            for x in 0..state.maze.width() {
                if (x, y) != (2, 1) {
                    state.maze.eat(IVec2::new(x, y));
                }
            }
        }
        assert_eq!(state.maze.dots_remaining(), 1);
        state.player.actor.tile = IVec2::new(1, 1);
        state.player.actor.dir = Direction::Right;
        state.player.actor.progress = 0.95;
        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.session.level, 2);
        assert_eq!(state.maze.dots_remaining(), Layout::MINI.build().unwrap().dots_remaining());
        assert_eq!(state.player.actor.tile, Layout::MINI.player_start);
        assert!(state.drain_events().contains(&GameEvent::WaveCleared { level: 2 }));
        assert_eq!(state.hud().level_label, "LEVEL 2");
    }

    #[test]
    fn test_release_by_dot_count() {
        let mut state = playing(Layout::CLASSIC);
        release_ghosts(&mut state, DT);
        assert_eq!(state.ghost(GhostName::Pinky).unwrap().house, HouseState::Leaving);
        assert_eq!(state.ghost(GhostName::Inky).unwrap().house, HouseState::Waiting);
        state.dots_eaten = 30;
        release_ghosts(&mut state, DT);
        assert_eq!(state.ghost(GhostName::Inky).unwrap().house, HouseState::Leaving);
        assert_eq!(state.ghost(GhostName::Clyde).unwrap().house, HouseState::Waiting);
    }

    #[test]
    fn test_idle_player_releases_one_ghost() {
        let mut state = playing(Layout::CLASSIC);
        release_ghosts(&mut state, DT);
        release_ghosts(&mut state, IDLE_RELEASE_SECS);
        assert_eq!(state.ghost(GhostName::Inky).unwrap().house, HouseState::Leaving);
        assert_eq!(state.ghost(GhostName::Clyde).unwrap().house, HouseState::Waiting);
    }

    #[test]
    fn test_mode_switch_reverses_outside_ghosts() {
        let mut state = playing(Layout::CLASSIC);
        update_modes(&mut state, 7.0);
        assert_eq!(state.cycle.current(), GhostMode::Chase);
        assert_eq!(state.ghosts[0].mode, GhostMode::Chase);
        assert!(state.ghosts[0].reverse_pending);
        assert!(!state.ghosts[2].reverse_pending);
    }

    #[test]
    fn test_pause_freezes_and_emits() {
        let mut state = playing(Layout::CLASSIC);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, DT);
        assert_eq!(state.session.phase, GamePhase::Paused);
        let before = state.ghosts[0].actor.clone();
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.ghosts[0].actor.progress, before.progress);
        tick(&mut state, &pause, DT);
        assert_eq!(state.session.phase, GamePhase::Playing);
        assert_eq!(state.drain_events(), vec![GameEvent::Paused, GameEvent::Resumed]);
    }

    #[test]
    fn test_player_stops_at_walls_and_buffers_turns() {
        let mut state = playing(Layout::CLASSIC);
        park_ghosts(&mut state);
        state.player.actor.tile = IVec2::new(1, 1);
        state.player.actor.dir = Direction::Up;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.player.actor.tile, IVec2::new(1, 1));
        assert!(state.player.actor.at_center());

        let input = TickInput {
            down: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.player.actor.dir, Direction::Down);
        assert!(!state.player.actor.at_center());
    }

    #[test]
    fn test_headless_run_keeps_everyone_on_the_board() {
        let mut runner = Runner::new(playing(Layout::CLASSIC));
        let keys = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];
        let mut best = 0;
        for frame in 0..3600 {
            let dir = keys[(frame / 45) % keys.len()];
            runner.input.up = dir == Direction::Up;
            runner.input.down = dir == Direction::Down;
            runner.input.left = dir == Direction::Left;
            runner.input.right = dir == Direction::Right;
            runner.input.restart = runner.game.session.is_over();
            runner.frame(DT);

            let state = &runner.game;
            assert!(state.maze.player_can_enter(state.player.actor.tile));
            for ghost in &state.ghosts {
                assert_ne!(state.maze.tile(ghost.actor.tile), Tile::Wall);
            }
            best = best.max(state.session.score);
        }
        assert!(best > 0);
    }
}
