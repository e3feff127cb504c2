//! Fixed timestep target range tick

use glam::Vec2;

use super::state::{ESCAPE_SPEED_FACTOR, GameState, TargetState};
use crate::sim::{Cabinet, GameEvent, GamePhase, Hud, TickInput, within};

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.restart && matches!(state.session.phase, GamePhase::Ready | GamePhase::GameOver) {
        state.restart();
        return;
    }

    if input.pause {
        match state.session.toggle_pause() {
            GamePhase::Paused => state.emit(GameEvent::Paused),
            GamePhase::Playing => state.emit(GameEvent::Resumed),
            _ => {}
        }
    }

    if !state.session.is_playing() {
        return;
    }

    if input.trigger {
        if let Some(aim) = input.pointer {
            shoot(state, aim);
        }
    }

    update_targets(state, dt);

    if state.targets.is_empty() {
        if state.launched < state.tuning.targets_per_round {
            state.launch_flight();
        } else {
            end_round(state);
        }
    }
}

/// One shot at `aim`; a flying target under the cursor drops
pub(super) fn shoot(state: &mut GameState, aim: Vec2) {
    if state.shots_left == 0 {
        return;
    }
    state.shots_left -= 1;
    state.emit(GameEvent::Shot);

    let radius = state.tuning.target_radius;
    let target = state
        .targets
        .iter_mut()
        .find(|t| t.state == TargetState::Flying && within(t.pos, aim, radius));
    if let Some(target) = target {
        target.state = TargetState::Falling;
        target.vel = Vec2::new(0.0, state.tuning.fall_speed);
        state.hits += 1;
        let points = state.hit_points();
        state.session.add_score(points);
        state.emit(GameEvent::EnemyDestroyed { points });
    }
}

fn update_targets(state: &mut GameState, dt: f32) {
    let t = &state.tuning;
    let out_of_shots = state.shots_left == 0;
    let escape = Vec2::new(0.0, -state.target_speed() * ESCAPE_SPEED_FACTOR);

    for target in &mut state.targets {
        target.age += dt;
        if target.state == TargetState::Flying && (target.age >= t.escape_secs || out_of_shots) {
            target.state = TargetState::Escaped;
            target.vel = escape;
        }

        target.pos += target.vel * dt;

        if target.state == TargetState::Flying {
            // Bounce inside the sky box
            let r = t.target_radius;
            if target.pos.x < r || target.pos.x > t.width - r {
                target.vel.x = -target.vel.x;
                target.pos.x = target.pos.x.clamp(r, t.width - r);
            }
            if target.pos.y < r || target.pos.y > t.ground_y {
                target.vel.y = -target.vel.y;
                target.pos.y = target.pos.y.clamp(r, t.ground_y);
            }
        }
    }

    let (ground, r) = (t.ground_y, t.target_radius);
    state.targets.retain(|target| match target.state {
        TargetState::Flying => true,
        TargetState::Falling => target.pos.y < ground,
        TargetState::Escaped => target.pos.y > -r,
    });
}

/// Score the round: enough hits moves on, too few ends the game
fn end_round(state: &mut GameState) {
    let round = state.session.level;
    let needed = state.required_hits();
    log::info!("Round {} over: {}/{} hits (needed {})", round, state.hits, state.tuning.targets_per_round, needed);

    if state.hits < needed {
        state.session.end();
        let score = state.session.score;
        state.emit(GameEvent::GameOver { score });
        if state.high_score.submit(score) {
            state.emit(GameEvent::NewHighScore { score });
        }
        return;
    }

    if state.hits == state.tuning.targets_per_round {
        state.session.add_score(state.tuning.perfect_bonus);
        log::info!("Perfect round, +{}", state.tuning.perfect_bonus);
    }
    let level = state.session.advance_level();
    state.emit(GameEvent::WaveCleared { level });
    state.start_round();
}

impl Cabinet for GameState {
    fn tick(&mut self, input: &TickInput, dt: f32) {
        tick(self, input, dt);
    }

    fn hud(&self) -> Hud {
        let status = match self.session.phase {
            GamePhase::Ready => Some("Click to Play".to_string()),
            GamePhase::Paused => Some("Paused".to_string()),
            GamePhase::GameOver => Some("Game Over - Press Enter".to_string()),
            GamePhase::Playing => Some(format!("HITS {}/{}", self.hits, self.required_hits())),
        };
        Hud {
            score: self.session.score,
            lives: None,
            level_label: format!("ROUND {}", self.session.level),
            health: None,
            ammo: Some(self.shots_left),
            status,
            phase: self.session.phase,
        }
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
