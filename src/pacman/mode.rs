//! Ghost behaviour modes and the scatter/chase cycle
//!
//! The cycle alternates scatter and chase windows whose lengths depend on the
//! level; after the last window ghosts chase forever. Frightened time is
//! tracked by the game state and pauses the cycle while it runs.

use serde::{Deserialize, Serialize};

/// The four ghost behaviour modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GhostMode {
    /// Head for a fixed home corner
    Scatter,
    /// Hunt the player with the ghost's own targeting rule
    Chase,
    /// Blue, edible, fleeing
    Frightened,
    /// Eaten; eyes race back to the ghost house
    Dead,
}

/// Number of timed windows before the final, unbounded chase
pub const CYCLE_WINDOWS: usize = 7;

/// Scatter/chase window lengths (seconds) for a level, starting with scatter
pub fn cycle_windows(level: u32) -> [f32; CYCLE_WINDOWS] {
    match level {
        0 | 1 => [7.0, 20.0, 7.0, 20.0, 5.0, 20.0, 5.0],
        2..=4 => [7.0, 20.0, 7.0, 20.0, 5.0, 1033.0, 1.0 / 60.0],
        _ => [5.0, 20.0, 5.0, 20.0, 5.0, 1037.0, 1.0 / 60.0],
    }
}

/// Scatter/chase timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeCycle {
    windows: [f32; CYCLE_WINDOWS],
    index: usize,
    elapsed: f32,
}

impl ModeCycle {
    pub fn new(level: u32) -> Self {
        Self {
            windows: cycle_windows(level),
            index: 0,
            elapsed: 0.0,
        }
    }

    /// Mode ghosts should be in when not frightened or dead
    pub fn current(&self) -> GhostMode {
        if self.index >= CYCLE_WINDOWS || self.index % 2 == 1 {
            GhostMode::Chase
        } else {
            GhostMode::Scatter
        }
    }

    /// Index of the running window (`CYCLE_WINDOWS` once in the final chase)
    pub fn window_index(&self) -> usize {
        self.index
    }

    /// Advance the timer. Returns true if the mode switched at least once.
    ///
    /// A step that skips over a whole window (the 1-frame scatter at higher
    /// levels) still reports a switch even if it lands back in chase.
    pub fn advance(&mut self, dt: f32) -> bool {
        let start = self.index;
        self.elapsed += dt;
        while self.index < CYCLE_WINDOWS && self.elapsed >= self.windows[self.index] {
            self.elapsed -= self.windows[self.index];
            self.index += 1;
        }
        if self.index >= CYCLE_WINDOWS {
            self.elapsed = 0.0;
        }
        self.index != start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(cycle: &mut ModeCycle, secs: f32) -> u32 {
        let dt = 1.0 / 60.0;
        let mut switches = 0;
        let steps = (secs / dt).round() as u32;
        for _ in 0..steps {
            if cycle.advance(dt) {
                switches += 1;
            }
        }
        switches
    }

    #[test]
    fn test_level_one_cycle() {
        let mut cycle = ModeCycle::new(1);
        assert_eq!(cycle.current(), GhostMode::Scatter);
        run(&mut cycle, 6.9);
        assert_eq!(cycle.current(), GhostMode::Scatter);
        run(&mut cycle, 0.2);
        assert_eq!(cycle.current(), GhostMode::Chase);
        run(&mut cycle, 20.0);
        assert_eq!(cycle.current(), GhostMode::Scatter);
    }

    #[test]
    fn test_final_chase_is_permanent() {
        let mut cycle = ModeCycle::new(1);
        let switches = run(&mut cycle, 84.5);
        assert_eq!(switches, 7);
        assert_eq!(cycle.window_index(), CYCLE_WINDOWS);
        assert_eq!(cycle.current(), GhostMode::Chase);
        assert_eq!(run(&mut cycle, 600.0), 0);
        assert_eq!(cycle.current(), GhostMode::Chase);
    }

    #[test]
    fn test_windows_shrink_with_level() {
        let one = cycle_windows(1);
        let five = cycle_windows(5);
        let scatter_one: f32 = one.iter().step_by(2).sum();
        let scatter_five: f32 = five.iter().step_by(2).sum();
        assert!(scatter_five < scatter_one);
        assert_eq!(cycle_windows(3), cycle_windows(2));
    }

    #[test]
    fn test_window_table() {
        assert_eq!(cycle_windows(1), [7.0, 20.0, 7.0, 20.0, 5.0, 20.0, 5.0]);
        for level in 2..=4 {
            assert_eq!(cycle_windows(level), [7.0, 20.0, 7.0, 20.0, 5.0, 1033.0, 1.0 / 60.0]);
        }
        for level in [5, 6, 21] {
            assert_eq!(cycle_windows(level), [5.0, 20.0, 5.0, 20.0, 5.0, 1037.0, 1.0 / 60.0]);
        }
    }

    #[test]
    fn test_one_frame_scatter_at_level_five() {
        let mut cycle = ModeCycle::new(5);
        assert!(cycle.advance(5.0 + 20.0 + 5.0 + 20.0 + 5.0 + 1037.0));
        assert_eq!(cycle.window_index(), CYCLE_WINDOWS - 1);
        assert_eq!(cycle.current(), GhostMode::Scatter);

        assert!(cycle.advance(1.0 / 60.0));
        assert_eq!(cycle.window_index(), CYCLE_WINDOWS);
        assert_eq!(cycle.current(), GhostMode::Chase);
        assert!(!cycle.advance(600.0));
    }

    #[test]
    fn test_large_step_crosses_several_windows() {
        let mut cycle = ModeCycle::new(1);
        assert!(cycle.advance(28.0));
        assert_eq!(cycle.window_index(), 2);
        assert_eq!(cycle.current(), GhostMode::Scatter);
    }
}
