//! Shared simulation plumbing
//!
//! Every game in the cabinet is a self-contained loop built from these pieces:
//! - Fixed timestep only (see [`Runner`])
//! - Seeded RNG only
//! - Brute-force distance checks for collisions
//! - No rendering or platform dependencies

pub mod collision;
pub mod event;
pub mod input;
pub mod runner;
pub mod session;

pub use collision::{ray_capsule, within, within3};
pub use event::GameEvent;
pub use input::TickInput;
pub use runner::{Cabinet, Hud, Runner};
pub use session::{GamePhase, Session};
