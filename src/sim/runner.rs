//! Fixed timestep runner
//!
//! The browser calls [`Runner::frame`] from `requestAnimationFrame` with the
//! wall-clock delta; the runner slices it into `SIM_DT` ticks.

use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use super::input::TickInput;
use super::session::GamePhase;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Values the driver copies into the DOM each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub lives: Option<u8>,
    pub level_label: String,
    pub health: Option<u32>,
    pub ammo: Option<u32>,
    /// Overlay/status line ("Wave 2", "Game Over - Press Enter")
    pub status: Option<String>,
    pub phase: GamePhase,
}

/// A game that can be driven by the [`Runner`]
pub trait Cabinet {
    /// Advance the game state by one fixed timestep
    fn tick(&mut self, input: &TickInput, dt: f32);

    /// Snapshot of HUD values
    fn hud(&self) -> Hud;

    /// Take all events emitted since the last call
    fn drain_events(&mut self) -> Vec<GameEvent>;
}

impl<C: Cabinet + ?Sized> Cabinet for Box<C> {
    fn tick(&mut self, input: &TickInput, dt: f32) {
        (**self).tick(input, dt);
    }

    fn hud(&self) -> Hud {
        (**self).hud()
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        (**self).drain_events()
    }
}

/// Drives a [`Cabinet`] at a fixed timestep
pub struct Runner<C: Cabinet> {
    pub game: C,
    pub input: TickInput,
    accumulator: f32,
}

impl<C: Cabinet> Runner<C> {
    pub fn new(game: C) -> Self {
        Self {
            game,
            input: TickInput::default(),
            accumulator: 0.0,
        }
    }

    /// Run simulation ticks for one rendered frame. Returns the number of substeps taken.
    pub fn frame(&mut self, dt: f32) -> u32 {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.game.tick(&self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.clear_one_shots();
        }
        substeps
    }

    /// Time carried over to the next frame (seconds)
    pub fn remainder(&self) -> f32 {
        self.accumulator
    }
}
