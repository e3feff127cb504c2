//! Tile-based movement shared by the player and the ghosts
//!
//! An actor sits on a tile and travels toward the neighbour in `dir`;
//! `progress` is the fraction of that hop completed. Decisions are only made
//! at tile centres (`progress == 0`).

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::maze::{Direction, Maze};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub tile: IVec2,
    pub dir: Direction,
    /// 0..1 along the hop from `tile` toward `tile + dir`
    pub progress: f32,
}

impl Actor {
    pub fn new(tile: IVec2, dir: Direction) -> Self {
        Self {
            tile,
            dir,
            progress: 0.0,
        }
    }

    #[inline]
    pub fn at_center(&self) -> bool {
        self.progress <= 0.0
    }

    /// Continuous position in tile units (tile centres at +0.5)
    pub fn position(&self) -> Vec2 {
        self.tile.as_vec2() + Vec2::splat(0.5) + self.dir.delta().as_vec2() * self.progress
    }

    /// Tile the actor is mostly over
    pub fn nearest_tile(&self, maze: &Maze) -> IVec2 {
        if self.progress >= 0.5 {
            maze.wrap(self.tile + self.dir.delta())
        } else {
            self.tile
        }
    }

    /// Turn around on the spot, mid-hop or at a centre
    pub fn reverse(&mut self, maze: &Maze) {
        if self.progress > 0.0 {
            self.tile = maze.wrap(self.tile + self.dir.delta());
            self.progress = 1.0 - self.progress;
        }
        self.dir = self.dir.opposite();
    }

    /// Move along `dir` by at most `budget` tiles, stopping at the next centre.
    /// Returns the unused budget; `arrived` is set when a new tile was reached.
    pub fn travel(&mut self, maze: &Maze, budget: f32, arrived: &mut bool) -> f32 {
        let step = (1.0 - self.progress).min(budget);
        self.progress += step;
        if self.progress >= 1.0 - 1e-4 {
            self.tile = maze.wrap(self.tile + self.dir.delta());
            self.progress = 0.0;
            *arrived = true;
        }
        budget - step
    }
}
