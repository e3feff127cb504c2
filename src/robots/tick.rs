//! Fixed timestep robot range tick

use glam::{Vec2, Vec3};
use rand::Rng;

use super::state::{CROWD_DISTANCE, GameState, RobotState};
use crate::sim::{Cabinet, GameEvent, GamePhase, Hud, TickInput, ray_capsule, within3};

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

    let t = &state.tuning;
    state.camera.look(input.look, t.look_sensitivity, t.pitch_limit);

    if input.trigger {
        shoot(state);
    }

    update_robots(state, dt);
    apply_contact_damage(state, dt);
    if state.session.is_over() {
        return;
    }

    state.robots.retain(|r| !matches!(r.state, RobotState::Dying { timer } if timer <= 0.0));
    if state.robots.is_empty() {
        let level = state.session.advance_level();
        state.spawn_wave();
        log::info!("Robots cleared, {}", state.level_label());
        state.emit(GameEvent::WaveCleared { level });
    }
}

/// Hitscan along the view ray; the nearest robot hit takes the damage
pub(super) fn shoot(state: &mut GameState) {
    state.emit(GameEvent::Shot);
    let origin = state.camera.pos;
    let dir = state.camera.forward();
    let t = &state.tuning;
    let half = Vec3::new(0.0, t.robot_half_height, 0.0);

    let nearest = state
        .robots
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.is_dying())
        .filter_map(|(i, r)| ray_capsule(origin, dir, r.pos - half, r.pos + half, t.robot_radius).map(|d| (i, d)))
        .min_by(|a, b| a.1.total_cmp(&b.1));
    let Some((index, _)) = nearest else {
        return;
    };

    let damage = t.shot_damage;
    let flash = t.flash_secs;
    let dying_secs = t.dying_secs;
    let retreat_secs = t.retreat_secs;
    let points = t.points_per_kill;

    let robot = &mut state.robots[index];
    robot.hp -= damage;
    robot.flash = flash;
    if robot.hp <= 0 {
        robot.state = RobotState::Dying { timer: dying_secs };
        log::debug!("Robot {} destroyed", robot.id);
        state.session.add_score(points);
        state.emit(GameEvent::EnemyDestroyed { points });
    } else {
        robot.state = RobotState::Retreat { timer: retreat_secs };
        state.emit(GameEvent::EnemyHit);
    }
}

fn update_robots(state: &mut GameState, dt: f32) {
    let speed = state.robot_speed();
    let t = &state.tuning;
    let player = Vec2::new(state.camera.pos.x, state.camera.pos.z);

    for robot in &mut state.robots {
        robot.flash = (robot.flash - dt).max(0.0);
        let here = Vec2::new(robot.pos.x, robot.pos.z);
        let to_player = player - here;
        let toward = to_player.normalize_or_zero();

        let step = match robot.state {
            RobotState::Advance => {
                if state.rng.random_bool((t.dodge_chance * dt).clamp(0.0, 1.0) as f64) {
                    let side = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
                    robot.state = RobotState::Dodge {
                        timer: t.dodge_secs,
                        side,
                    };
                }
                if to_player.length() > CROWD_DISTANCE {
                    toward * speed * dt
                } else {
                    Vec2::ZERO
                }
            }
            RobotState::Retreat { timer } => {
                let timer = timer - dt;
                robot.state = if timer <= 0.0 {
                    RobotState::Advance
                } else {
                    RobotState::Retreat { timer }
                };
                -toward * t.retreat_speed * dt
            }
            RobotState::Dodge { timer, side } => {
                let timer = timer - dt;
                robot.state = if timer <= 0.0 {
                    RobotState::Advance
                } else {
                    RobotState::Dodge { timer, side }
                };
                toward.perp() * side * t.dodge_speed * dt
            }
            RobotState::Dying { timer } => {
                robot.state = RobotState::Dying { timer: timer - dt };
                Vec2::ZERO
            }
        };
        robot.pos.x += step.x;
        robot.pos.z += step.y;
    }
}

/// Any live robot within reach drains health
fn apply_contact_damage(state: &mut GameState, dt: f32) {
    let t = &state.tuning;
    let touching = state
        .robots
        .iter()
        .filter(|r| !r.is_dying() && within3(r.pos, state.camera.pos, t.contact_radius))
        .count();

    if touching == 0 {
        state.in_contact = false;
        return;
    }
    if !state.in_contact {
        state.in_contact = true;
        state.emit(GameEvent::PlayerHit);
    }

    state.health = (state.health - state.tuning.contact_dps * touching as f32 * dt).max(0.0);
    if state.health <= 0.0 {
        state.session.end();
        let score = state.session.score;
        log::info!("Overrun on {} with {} points", state.level_label(), score);
        state.emit(GameEvent::GameOver { score });
        if state.high_score.submit(score) {
            state.emit(GameEvent::NewHighScore { score });
        }
    }
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
            GamePhase::Playing => None,
        };
        Hud {
            score: self.session.score,
            lives: None,
            level_label: self.level_label(),
            health: Some(self.health.floor() as u32),
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
    use super::*;
    use crate::robots::state::{ROBOT_CENTRE_Y, Robot};
    use crate::tuning::RobotTuning;

    const DT: f32 = 1.0 / 60.0;

    fn robot_at(id: u32, x: f32, z: f32, hp: i32) -> Robot {
        Robot {
            id,
            pos: Vec3::new(x, ROBOT_CENTRE_Y, z),
            hp,
            state: RobotState::Advance,
            flash: 0.0,
        }
    }

    fn horizontal(state: &GameState) -> f32 {
        Vec2::new(state.robots[0].pos.x, state.robots[0].pos.z).length()
    }

    fn playing() -> GameState {
        let mut state = GameState::new(RobotTuning::default(), 11);
        state.restart();
        state.tuning.dodge_chance = 0.0;
        state
    }

    #[test]
    fn test_shot_hits_nearest_robot_in_line() {
        let mut state = playing();
        state.robots = vec![robot_at(1, 0.0, -12.0, 40), robot_at(2, 0.0, -6.0, 40), robot_at(3, 3.0, -4.0, 40)];
        shoot(&mut state);
        assert_eq!(state.robots[0].hp, 40);
        assert_eq!(state.robots[1].hp, 20);
        assert_eq!(state.robots[2].hp, 40);
        assert!(matches!(state.robots[1].state, RobotState::Retreat { .. }));
        assert!(state.robots[1].flash > 0.0);
        let events = state.drain_events();
        assert_eq!(events, vec![GameEvent::Shot, GameEvent::EnemyHit]);
    }

    #[test]
    fn test_shot_misses_when_looking_away() {
        let mut state = playing();
        state.robots = vec![robot_at(1, 0.0, -6.0, 40)];
        state.camera.look(Vec2::new(800.0, 0.0), 0.002, 1.5);
        shoot(&mut state);
        assert_eq!(state.robots[0].hp, 40);
    }

    #[test]
    fn test_kill_then_wave_advances() {
        let mut state = playing();
        state.robots = vec![robot_at(1, 0.0, -6.0, 20)];
        let fire = TickInput {
            trigger: true,
            ..Default::default()
        };
        tick(&mut state, &fire, DT);
        assert!(state.robots[0].is_dying());
        assert_eq!(state.session.score, 100);

        for _ in 0..40 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.session.level, 2);
        assert_eq!(state.robots.len(), 9);
        assert!(state.robots.iter().all(|r| r.hp == 50));
        assert!(state.drain_events().contains(&GameEvent::WaveCleared { level: 2 }));
    }

    #[test]
    fn test_robots_walk_toward_player() {
        let mut state = playing();
        state.robots = vec![robot_at(1, 4.0, -20.0, 40)];
        let before = horizontal(&state);
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), DT);
        }
        let after = horizontal(&state);
        assert!((before - after - state.robot_speed()).abs() < 0.05);
    }

    #[test]
    fn test_contact_drains_health_until_game_over() {
        let mut state = playing();
        state.robots = vec![robot_at(1, 0.0, -0.8, 40)];
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.health < 100.0);
        assert!(state.drain_events().contains(&GameEvent::PlayerHit));

        for _ in 0..(9.0 / DT) as usize {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(state.session.is_over());
        assert_eq!(state.health, 0.0);
        assert_eq!(state.hud().health, Some(0));
        assert!(state.drain_events().iter().any(|e| matches!(e, GameEvent::GameOver { .. })));
    }

    #[test]
    fn test_retreat_backs_off_then_resumes() {
        let mut state = playing();
        state.robots = vec![robot_at(1, 0.0, -6.0, 40)];
        shoot(&mut state);
        let z = state.robots[0].pos.z;
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.robots[0].pos.z < z);
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.robots[0].state, RobotState::Advance);
    }
}
