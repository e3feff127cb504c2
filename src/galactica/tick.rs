//! Fixed timestep Galactica tick

use glam::Vec2;
use rand::Rng;

use super::state::{Bullet, EnemyState, GameState};
use crate::lerp;
use crate::sim::{Cabinet, GameEvent, GamePhase, Hud, TickInput, within};

/// Explosion sizes
const HIT_PARTICLES: usize = 18;
const KILL_PARTICLES: usize = 18;

/// Shake amplitudes (pixels) and decay per second
const KILL_SHAKE: f32 = 12.0;
const HIT_SHAKE: f32 = 18.0;
const SHAKE_DECAY: f32 = 36.0;

/// Bullets are culled this far outside the screen
const CULL_MARGIN: f32 = 60.0;

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

    if state.message_timer > 0.0 {
        state.message_timer -= dt;
        if state.message_timer <= 0.0 {
            state.message = None;
        }
    }

    if !state.session.is_playing() {
        return;
    }

    state.shake = (state.shake - SHAKE_DECAY * dt).max(0.0);

    update_ship(state, input, dt);
    update_bullets(state, dt);
    update_enemies(state, dt);
    update_particles(state, dt);
    check_collisions(state);
    cleanup_enemies(state);
}

fn update_ship(state: &mut GameState, input: &TickInput, dt: f32) {
    let t = &state.tuning;
    let ship = &mut state.ship;
    if !ship.alive {
        ship.respawn_timer -= dt;
        if ship.respawn_timer <= 0.0 && state.session.lives > 0 {
            ship.alive = true;
        }
        return;
    }

    ship.pos.x += input.horizontal() * t.player_speed * dt;
    ship.pos.x = ship.pos.x.clamp(t.player_margin, t.width - t.player_margin);

    ship.cooldown -= dt;
    if input.fire && ship.cooldown <= 0.0 {
        let vel = Vec2::new(0.0, -t.bullet_speed);
        for offset in [Vec2::new(0.0, -24.0), Vec2::new(-12.0, -18.0), Vec2::new(12.0, -18.0)] {
            state.bullets.push(Bullet {
                pos: ship.pos + offset,
                vel,
            });
        }
        ship.cooldown = t.fire_cooldown;
        state.events.push(GameEvent::Shot);
    }
}

fn update_bullets(state: &mut GameState, dt: f32) {
    let (w, h) = (state.tuning.width, state.tuning.height);
    for bullet in state.bullets.iter_mut().chain(state.enemy_bullets.iter_mut()) {
        bullet.pos += bullet.vel * dt;
    }
    state.bullets.retain(|b| b.pos.y > -40.0);
    state.enemy_bullets.retain(|b| {
        b.pos.y < h + CULL_MARGIN && b.pos.x > -CULL_MARGIN && b.pos.x < w + CULL_MARGIN
    });
}

fn update_enemies(state: &mut GameState, dt: f32) {
    state.wave_timer += dt;
    let timer = state.wave_timer;
    let sway = (timer * 0.8).sin() * 30.0;
    // Per-frame nudges are tuned for 60 Hz
    let frames = dt * 60.0;
    let dive_chance = (state.dive_chance() * frames) as f64;
    let height = state.tuning.height;
    let ship = state.ship.clone();
    let t = &state.tuning;

    for (index, enemy) in state.enemies.iter_mut().enumerate() {
        match enemy.state {
            EnemyState::Entry => {
                let goal = enemy.origin.y + 200.0;
                enemy.pos.y = lerp(enemy.pos.y, goal, dt * 0.8);
                if enemy.pos.y > enemy.origin.y + 180.0 {
                    enemy.state = EnemyState::Orbit;
                }
            }
            EnemyState::Orbit => {
                let a = timer * 0.6 + enemy.phase;
                enemy.pos.x = enemy.origin.x + a.cos() * enemy.orbit_radius;
                enemy.pos.y = enemy.origin.y + (a * 0.6).sin() * enemy.orbit_radius * 0.4 + 80.0;
            }
            EnemyState::Dive => {
                enemy.pos.y += (120.0 + enemy.speed * 120.0) * dt;
                enemy.pos.x += (timer * 2.0 + enemy.phase).sin() * 120.0 * dt;
                if enemy.pos.y > height + 80.0 {
                    enemy.state = EnemyState::Return;
                }
            }
            EnemyState::Return => {
                let home = enemy.origin + Vec2::new(0.0, 80.0);
                enemy.pos = enemy.pos.lerp(home, (dt * 1.2).min(1.0));
                if (enemy.pos.y - home.y).abs() < 4.0 {
                    enemy.state = EnemyState::Orbit;
                }
            }
        }

        enemy.fire_cooldown -= dt;
        if enemy.fire_cooldown <= 0.0 && ship.alive {
            let speed = t.enemy_bullet_base_speed + enemy.speed * t.enemy_bullet_speed_per_speed;
            let aim = (ship.pos - enemy.pos).normalize_or_zero();
            state.enemy_bullets.push(Bullet {
                pos: enemy.pos,
                vel: aim * speed,
            });
            enemy.fire_cooldown = state.rng.random_range(1.2..2.6);
        }

        if enemy.state == EnemyState::Orbit && state.rng.random_bool(dive_chance.clamp(0.0, 1.0)) {
            enemy.state = EnemyState::Dive;
        }

        enemy.pos.x += sway * 0.02 * frames;
        enemy.pos.y += (timer + index as f32).sin() * 0.08 * frames;
    }
}

fn update_particles(state: &mut GameState, dt: f32) {
    let drag = 0.98_f32.powf(dt * 60.0);
    for p in &mut state.particles {
        p.life -= dt;
        p.pos += p.vel * dt;
        p.vel *= drag;
    }
    state.particles.retain(|p| p.life > 0.0);
}

fn check_collisions(state: &mut GameState) {
    let t = &state.tuning;

    if state.ship.alive {
        let ship = state.ship.pos;
        let mut hit = false;
        state.enemy_bullets.retain(|b| {
            let touching = within(b.pos, ship, t.player_hit_radius);
            hit |= touching;
            !touching
        });
        for enemy in &mut state.enemies {
            if within(enemy.pos, ship, t.ram_radius) {
                enemy.hp = 0;
                hit = true;
            }
        }
        if hit {
            damage_ship(state);
        }
    }

    // Each bullet is spent on the first live enemy it touches
    let t = &state.tuning;
    let mut impacts = Vec::new();
    let enemies = &mut state.enemies;
    state.bullets.retain(|bullet| {
        let target = enemies
            .iter_mut()
            .find(|e| e.hp > 0 && within(bullet.pos, e.pos, t.bullet_hit_radius));
        match target {
            Some(enemy) => {
                enemy.hp -= 1;
                impacts.push((enemy.pos, enemy.kind.points(), enemy.hp <= 0));
                false
            }
            None => true,
        }
    });

    for (pos, points, killed) in impacts {
        if killed {
            let points = points + state.tuning.kill_bonus;
            state.session.add_score(points);
            state.emit(GameEvent::EnemyDestroyed { points });
            state.explode(pos, HIT_PARTICLES + KILL_PARTICLES);
            state.add_shake(KILL_SHAKE);
        } else {
            state.session.add_score(points);
            state.emit(GameEvent::EnemyHit);
            state.explode(pos, HIT_PARTICLES);
        }
    }
}

fn damage_ship(state: &mut GameState) {
    if !state.ship.alive {
        return;
    }
    state.ship.alive = false;
    state.ship.respawn_timer = state.tuning.respawn_secs;
    state.add_shake(HIT_SHAKE);
    state.explode(state.ship.pos, KILL_PARTICLES);
    state.emit(GameEvent::PlayerHit);

    let over = state.session.lose_life();
    state.emit(GameEvent::LifeLost {
        remaining: state.session.lives,
    });
    if over {
        let score = state.session.score;
        log::info!("Galactica over on wave {} with {} points", state.wave_index + 1, score);
        state.emit(GameEvent::GameOver { score });
        if state.high_score.submit(score) {
            state.emit(GameEvent::NewHighScore { score });
        }
    }
}

/// Drop destroyed enemies; an empty sky brings the next wave
fn cleanup_enemies(state: &mut GameState) {
    state.enemies.retain(|e| e.hp > 0);
    if state.enemies.is_empty() && state.session.is_playing() {
        let level = state.session.advance_level();
        state.spawn_wave(level as usize - 1);
        log::info!("Wave cleared, now level {}", level);
        state.emit(GameEvent::WaveCleared { level });
    }
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
            GamePhase::Playing => self.message.clone(),
        };
        Hud {
            score: self.session.score,
            lives: Some(self.session.lives),
            level_label: format!("WAVE {}", self.session.level),
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
    use super::*;
    use crate::galactica::state::{EnemyKind, FORMATION};
    use crate::tuning::GalacticaTuning;

    const DT: f32 = 1.0 / 60.0;

    fn playing() -> GameState {
        let mut state = GameState::new(GalacticaTuning::default(), 3);
        state.restart();
        state
    }

    /// Park every enemy high in orbit and stop them firing
    fn quiet(state: &mut GameState) {
        for enemy in &mut state.enemies {
            enemy.fire_cooldown = f32::MAX;
            enemy.pos = Vec2::new(enemy.origin.x, -500.0);
        }
        state.tuning.dive_chance = 0.0;
        state.tuning.dive_chance_per_level = 0.0;
    }

    #[test]
    fn test_fire_spawns_three_bullets_with_cooldown() {
        let mut state = playing();
        quiet(&mut state);
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.bullets.len(), 3);
        tick(&mut state, &input, DT);
        assert_eq!(state.bullets.len(), 3);
        for _ in 0..12 {
            tick(&mut state, &input, DT);
        }
        assert_eq!(state.bullets.len(), 6);
        assert!(state.drain_events().contains(&GameEvent::Shot));
    }

    #[test]
    fn test_ship_clamped_to_margins() {
        let mut state = playing();
        quiet(&mut state);
        let input = TickInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..300 {
            tick(&mut state, &input, DT);
        }
        assert_eq!(state.ship.pos.x, state.tuning.player_margin);
    }

    #[test]
    fn test_bullet_hit_scores_type_points_and_kill_bonus() {
        let mut state = playing();
        quiet(&mut state);
        state.spawn_wave(1);
        quiet(&mut state);
        let target = state.enemies[0].pos;
        state.bullets.push(Bullet {
            pos: target,
            vel: Vec2::ZERO,
        });
        check_collisions(&mut state);
        assert_eq!(state.enemies[0].hp, 1);
        assert_eq!(state.session.score, EnemyKind::Bomber.points());
        assert!(state.bullets.is_empty());

        state.bullets.push(Bullet {
            pos: target,
            vel: Vec2::ZERO,
        });
        check_collisions(&mut state);
        assert_eq!(state.enemies[0].hp, 0);
        assert_eq!(state.session.score, 2 * EnemyKind::Bomber.points() + 200);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::EnemyHit));
        assert!(events.contains(&GameEvent::EnemyDestroyed { points: 320 }));
    }

    #[test]
    fn test_enemy_bullet_costs_life_and_respawns() {
        let mut state = playing();
        quiet(&mut state);
        state.enemy_bullets.push(Bullet {
            pos: state.ship.pos,
            vel: Vec2::ZERO,
        });
        check_collisions(&mut state);
        assert!(!state.ship.alive);
        assert_eq!(state.session.lives, 2);
        assert!(state.enemy_bullets.is_empty());

        for _ in 0..(1.7 / DT) as usize {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(state.ship.alive);
    }

    #[test]
    fn test_ramming_enemy_is_destroyed() {
        let mut state = playing();
        quiet(&mut state);
        state.enemies[0].pos = state.ship.pos + Vec2::new(10.0, 0.0);
        let before = state.enemies.len();
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.enemies.len(), before - 1);
        assert_eq!(state.session.lives, 2);
        assert_eq!(state.session.score, 0);
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut state = playing();
        quiet(&mut state);
        state.session.lives = 1;
        state.session.score = 900;
        state.enemy_bullets.push(Bullet {
            pos: state.ship.pos,
            vel: Vec2::ZERO,
        });
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.session.is_over());
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::GameOver { score: 900 }));
        assert!(events.contains(&GameEvent::NewHighScore { score: 900 }));
        assert_eq!(state.hud().status.as_deref(), Some("Game Over - Press Enter"));
    }

    #[test]
    fn test_clearing_wave_spawns_next_blueprint() {
        let mut state = playing();
        quiet(&mut state);
        for enemy in &mut state.enemies {
            enemy.hp = 0;
        }
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.session.level, 2);
        assert_eq!(state.wave_index, 1);
        assert_eq!(state.enemies.len(), 12);
        assert!(state.enemies.iter().all(|e| e.kind == EnemyKind::Bomber));
        assert!(state.drain_events().contains(&GameEvent::WaveCleared { level: 2 }));
        assert_eq!(state.hud().status.as_deref(), Some("Wave 2"));
    }

    #[test]
    fn test_entry_settles_into_orbit() {
        let mut state = playing();
        state.tuning.dive_chance = 0.0;
        state.tuning.dive_chance_per_level = 0.0;
        for _ in 0..(8.0 / DT) as usize {
            update_enemies(&mut state, DT);
        }
        assert!(state.enemies.iter().all(|e| e.state == EnemyState::Orbit));
        assert!(state.enemies.len() <= FORMATION.len());
    }

    #[test]
    fn test_dives_return_to_formation() {
        let mut state = playing();
        let enemy = &mut state.enemies[0];
        enemy.state = EnemyState::Dive;
        enemy.pos.y = state.tuning.height + 79.0;
        state.tuning.dive_chance = 0.0;
        state.tuning.dive_chance_per_level = 0.0;
        update_enemies(&mut state, DT);
        assert_eq!(state.enemies[0].state, EnemyState::Return);
        for _ in 0..(10.0 / DT) as usize {
            update_enemies(&mut state, DT);
        }
        assert_eq!(state.enemies[0].state, EnemyState::Orbit);
    }

    #[test]
    fn test_pause_stops_simulation() {
        let mut state = playing();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, DT);
        let timer = state.wave_timer;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.wave_timer, timer);
        assert_eq!(state.hud().status.as_deref(), Some("Paused"));
    }
}
