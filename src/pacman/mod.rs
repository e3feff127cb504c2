//! Pac-Man
//!
//! One engine for both maze clones: pick a [`Layout`] and build a
//! [`GameState`]. The ghost AI (four modes, per-ghost targeting, greedy
//! direction choice) is in [`ghost`] and [`mode`].

pub mod actor;
pub mod ghost;
pub mod maze;
pub mod mode;
pub mod state;
pub mod tick;

pub use ghost::{Ghost, GhostName, HouseState};
pub use maze::{Direction, Layout, Maze, MazeError, Tile};
pub use mode::{GhostMode, ModeCycle};
pub use state::GameState;
pub use tick::tick;
