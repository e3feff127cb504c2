//! Ghost AI
//!
//! Each ghost resolves a target tile from its mode and personality, then at
//! every tile centre greedily takes the open neighbour closest (Euclidean) to
//! that target. Reversing is off the table unless frightened; ties go
//! Up, Left, Down, Right.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::maze::{Direction, Layout, Maze};
use super::mode::GhostMode;

/// Ghost personalities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GhostName {
    /// Red: targets the player's tile
    Blinky,
    /// Pink: targets four tiles ahead of the player
    Pinky,
    /// Cyan: doubles the Blinky→(two ahead of player) vector
    Inky,
    /// Orange: chases from afar, retreats to his corner up close
    Clyde,
}

impl GhostName {
    pub const ALL: [GhostName; 4] = [GhostName::Blinky, GhostName::Pinky, GhostName::Inky, GhostName::Clyde];

    /// Scatter corner, just outside the maze
    pub fn scatter_corner(&self, maze: &Maze) -> IVec2 {
        let (w, h) = (maze.width(), maze.height());
        match self {
            GhostName::Blinky => IVec2::new(w - 3, -4),
            GhostName::Pinky => IVec2::new(2, -4),
            GhostName::Inky => IVec2::new(w - 1, h),
            GhostName::Clyde => IVec2::new(0, h),
        }
    }
}

/// Where a ghost is relative to the ghost house
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HouseState {
    /// In the maze proper
    Outside,
    /// Parked inside until released
    Waiting,
    /// Heading for the exit tile through the door
    Leaving,
    /// Dead, descending through the door to the home tile
    Entering,
}

/// Everything a ghost needs to know about the rest of the board
#[derive(Debug, Clone, Copy)]
pub struct TargetContext {
    pub player_tile: IVec2,
    pub player_dir: Direction,
    pub blinky_tile: IVec2,
    /// Clyde chases only while farther than this (tiles)
    pub shy_distance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ghost {
    pub name: GhostName,
    pub actor: Actor,
    pub mode: GhostMode,
    pub house: HouseState,
    /// Forced turnaround at the next opportunity (mode switch)
    pub reverse_pending: bool,
    /// A fresh decision is due at the current tile centre
    needs_turn: bool,
}

impl Ghost {
    pub fn new(name: GhostName, tile: IVec2, house: HouseState, mode: GhostMode) -> Self {
        let dir = match house {
            HouseState::Outside => Direction::Left,
            _ => Direction::Up,
        };
        Self {
            name,
            actor: Actor::new(tile, dir),
            mode,
            house,
            reverse_pending: false,
            needs_turn: true,
        }
    }

    /// Only scatter and chase ghosts hurt the player
    #[inline]
    pub fn is_dangerous(&self) -> bool {
        matches!(self.mode, GhostMode::Scatter | GhostMode::Chase)
    }

    #[inline]
    pub fn through_doors(&self) -> bool {
        matches!(self.house, HouseState::Leaving | HouseState::Entering)
    }

    /// Target tile for the current mode
    pub fn target(&self, maze: &Maze, layout: &Layout, ctx: &TargetContext) -> IVec2 {
        match self.house {
            HouseState::Leaving => return layout.ghost_exit,
            HouseState::Entering => return layout.ghost_home,
            HouseState::Waiting | HouseState::Outside => {}
        }
        let tile = self.actor.tile;
        match self.mode {
            GhostMode::Dead => layout.ghost_exit,
            GhostMode::Scatter => self.name.scatter_corner(maze),
            GhostMode::Frightened => tile + (tile - ctx.player_tile),
            GhostMode::Chase => chase_target(self.name, tile, maze, ctx),
        }
    }

    /// House transitions that happen on reaching a tile centre
    pub fn update_house(&mut self, layout: &Layout, ambient: GhostMode) {
        let tile = self.actor.tile;
        match self.house {
            HouseState::Outside if self.mode == GhostMode::Dead && tile == layout.ghost_exit => {
                self.house = HouseState::Entering;
            }
            HouseState::Entering if tile == layout.ghost_home => {
                self.mode = ambient;
                self.house = HouseState::Leaving;
                log::debug!("{:?} revived", self.name);
            }
            HouseState::Leaving if tile == layout.ghost_exit => {
                self.house = HouseState::Outside;
                self.actor.dir = Direction::Left;
            }
            _ => {}
        }
    }

    /// Pick the direction to leave the current tile centre in, or None if boxed in
    fn decide(&mut self, maze: &Maze, layout: &Layout, ctx: &TargetContext) -> Option<Direction> {
        let doors = self.through_doors();
        let here = self.actor.tile;

        if std::mem::take(&mut self.reverse_pending) {
            let back = self.actor.dir.opposite();
            if maze.ghost_can_enter(here + back.delta(), doors) {
                return Some(back);
            }
        }

        let target = self.target(maze, layout, ctx);
        let allow_reverse = self.mode == GhostMode::Frightened || self.house != HouseState::Outside;
        let dir = choose_direction(maze, here, self.actor.dir, target, allow_reverse, doors);
        maze.ghost_can_enter(here + dir.delta(), doors).then_some(dir)
    }

    /// Advance by `distance` tiles, turning at tile centres
    pub fn step(&mut self, maze: &Maze, layout: &Layout, ctx: &TargetContext, ambient: GhostMode, distance: f32) {
        if self.house == HouseState::Waiting {
            return;
        }
        if self.reverse_pending && !self.actor.at_center() {
            self.reverse_pending = false;
            self.actor.reverse(maze);
        }

        let mut budget = distance;
        // A hop is at least a few ticks long; the bound only guards against zero-length steps
        for _ in 0..4 {
            if budget <= 1e-6 {
                break;
            }
            if self.actor.at_center() && self.needs_turn {
                self.update_house(layout, ambient);
                match self.decide(maze, layout, ctx) {
                    Some(dir) => self.actor.dir = dir,
                    None => break,
                }
                self.needs_turn = false;
            }
            let mut arrived = false;
            budget = self.actor.travel(maze, budget, &mut arrived);
            if arrived {
                self.needs_turn = true;
            }
        }
    }

    /// Force a decision at the current tile (after a teleport/reset)
    pub fn replan(&mut self) {
        self.needs_turn = true;
    }
}

/// Chase-mode target for a personality
pub fn chase_target(name: GhostName, ghost_tile: IVec2, maze: &Maze, ctx: &TargetContext) -> IVec2 {
    let ahead = |n: i32| ctx.player_tile + ctx.player_dir.delta() * n;
    match name {
        GhostName::Blinky => ctx.player_tile,
        GhostName::Pinky => ahead(4),
        GhostName::Inky => {
            let pivot = ahead(2);
            pivot + (pivot - ctx.blinky_tile)
        }
        GhostName::Clyde => {
            let dist = (ghost_tile - ctx.player_tile).as_vec2().length();
            if dist > ctx.shy_distance {
                ctx.player_tile
            } else {
                name.scatter_corner(maze)
            }
        }
    }
}

/// Greedy choice of the neighbour nearest `target`
///
/// Reversal is skipped unless `allow_reverse`; if nothing else is open the
/// ghost reverses.
pub fn choose_direction(
    maze: &Maze,
    tile: IVec2,
    current: Direction,
    target: IVec2,
    allow_reverse: bool,
    through_doors: bool,
) -> Direction {
    let reverse = current.opposite();
    let mut best: Option<(Direction, i32)> = None;
    for dir in Direction::ALL {
        if dir == reverse && !allow_reverse {
            continue;
        }
        let next = tile + dir.delta();
        if !maze.ghost_can_enter(next, through_doors) {
            continue;
        }
        let dist = (maze.wrap(next) - target).length_squared();
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((dir, dist));
        }
    }
    best.map(|(dir, _)| dir).unwrap_or(reverse)
}
