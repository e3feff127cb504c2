//! Arcade Cabinet entry point
//!
//! Handles platform-specific initialization and runs the game loop.

use arcade_cabinet::pacman::{Layout, MazeError};
use arcade_cabinet::sim::Cabinet;
use arcade_cabinet::{GameKind, HighScore, Settings, Tuning, galactica, pacman, range, robots};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Build the requested game with the stored best score and the user's settings
fn build_cabinet(
    kind: GameKind,
    layout: Layout,
    tuning: &Tuning,
    seed: u64,
    best: &HighScore,
    settings: &Settings,
) -> Result<Box<dyn Cabinet>, MazeError> {
    let cabinet: Box<dyn Cabinet> = match kind {
        GameKind::Pacman => {
            let mut state = pacman::GameState::new(layout, tuning.pacman.clone())?;
            state.high_score = best.clone();
            Box::new(state)
        }
        GameKind::Galactica => {
            let mut state = galactica::GameState::new(tuning.galactica.clone(), seed);
            state.apply_settings(settings);
            state.high_score = best.clone();
            Box::new(state)
        }
        GameKind::Robots => {
            let mut state = robots::GameState::new(tuning.robots.clone(), seed);
            state.high_score = best.clone();
            Box::new(state)
        }
        GameKind::Range => {
            let mut state = range::GameState::new(tuning.range.clone(), seed);
            state.high_score = best.clone();
            Box::new(state)
        }
    };
    Ok(cabinet)
}

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, KeyboardEvent, MouseEvent};

    use arcade_cabinet::consts::SIM_DT;
    use arcade_cabinet::pacman::Layout;
    use arcade_cabinet::platform::{LocalStorage, Storage};
    use arcade_cabinet::sim::{Cabinet, GameEvent, GamePhase, Runner};
    use arcade_cabinet::{GameKind, HighScore, Settings, Tuning};

    /// Optional balance override (JSON, partial is fine)
    const TUNING_KEY: &str = "arcade_tuning";

    /// Game instance holding all state
    struct Game {
        kind: GameKind,
        runner: Runner<Box<dyn Cabinet>>,
        storage: LocalStorage,
        high_score: HighScore,
        /// Logical play-field size for pointer mapping
        field: Vec2,
        last_time: f64,
        last_phase: GamePhase,
    }

    impl Game {
        /// Run simulation ticks and react to what happened
        fn update(&mut self, dt: f32) {
            self.runner.frame(dt);

            for event in self.runner.game.drain_events() {
                match event {
                    GameEvent::NewHighScore { score } => {
                        self.high_score.submit(score);
                        self.high_score.save(&mut self.storage);
                    }
                    GameEvent::WaveCleared { level } => log::info!("{} level {}", self.kind.as_str(), level),
                    _ => {}
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, document: &Document) {
            let hud = self.runner.game.hud();
            set_text(document, "score", &hud.score.to_string());
            set_text(document, "level", &hud.level_label);
            set_text(document, "highscore", &self.high_score.best.max(hud.score).to_string());
            if let Some(lives) = hud.lives {
                set_text(document, "lives", &lives.to_string());
            }
            if let Some(health) = hud.health {
                set_text(document, "health", &format!("HP: {}", health));
            }
            if let Some(ammo) = hud.ammo {
                set_text(document, "ammo", &ammo.to_string());
            }
            set_text(document, "status", hud.status.as_deref().unwrap_or(""));

            if let Some(overlay) = document.get_element_by_id("overlay") {
                let hidden = hud.phase == GamePhase::Playing;
                let _ = overlay.set_attribute("class", if hidden { "hidden" } else { "" });
            }
            self.last_phase = hud.phase;
        }

        /// Map a click on the play-field element to game coordinates
        fn to_field(&self, target: Option<Element>, x: i32, y: i32) -> Vec2 {
            let Some(el) = target else {
                return Vec2::new(x as f32, y as f32);
            };
            let (w, h) = (el.client_width().max(1) as f32, el.client_height().max(1) as f32);
            Vec2::new(x as f32 * self.field.x / w, y as f32 * self.field.y / h)
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Page-selected game (`<body data-game="galactica">`) or the settings default
    fn pick_game(document: &Document, settings: &Settings) -> (GameKind, Layout) {
        let dataset = document.body().map(|b| b.dataset());
        let kind = dataset
            .as_ref()
            .and_then(|d| d.get("game"))
            .and_then(|name| GameKind::from_str(&name))
            .unwrap_or(settings.default_game);
        let layout = dataset
            .as_ref()
            .and_then(|d| d.get("maze"))
            .and_then(|name| Layout::by_name(&name))
            .unwrap_or(Layout::CLASSIC);
        (kind, layout)
    }

    fn load_tuning(storage: &LocalStorage) -> Tuning {
        match storage.get(TUNING_KEY) {
            Some(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring bad {}: {}", TUNING_KEY, e);
                Tuning::default()
            }),
            None => Tuning::default(),
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Arcade Cabinet starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        let storage = LocalStorage::new();
        let settings = Settings::load(&storage);
        let tuning = load_tuning(&storage);
        let (kind, layout) = pick_game(&document, &settings);
        let high_score = HighScore::load(kind, &storage);
        let seed = js_sys::Date::now() as u64;

        let cabinet = match super::build_cabinet(kind, layout, &tuning, seed, &high_score, &settings) {
            Ok(cabinet) => cabinet,
            Err(e) => {
                log::error!("Cannot start {}: {}", kind.as_str(), e);
                set_text(&document, "status", &format!("Error: {}", e));
                return;
            }
        };

        let field = match kind {
            GameKind::Galactica => Vec2::new(tuning.galactica.width, tuning.galactica.height),
            GameKind::Range => Vec2::new(tuning.range.width, tuning.range.height),
            GameKind::Pacman | GameKind::Robots => Vec2::ONE,
        };

        let game = Rc::new(RefCell::new(Game {
            kind,
            runner: Runner::new(cabinet),
            storage,
            high_score,
            field,
            last_time: 0.0,
            last_phase: GamePhase::Ready,
        }));

        log::info!("{} initialized with seed: {}", kind.as_str(), seed);

        setup_input_handlers(&document, game.clone());
        setup_auto_pause(&document, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Arcade Cabinet running!");
    }

    /// Apply a key to the input record; returns true if the key was ours
    fn apply_key(g: &mut Game, code: &str, down: bool, repeat: bool) -> bool {
        let input = &mut g.runner.input;
        match code {
            "ArrowUp" | "KeyW" => input.up = down,
            "ArrowDown" | "KeyS" => input.down = down,
            "ArrowLeft" | "KeyA" => input.left = down,
            "ArrowRight" | "KeyD" => input.right = down,
            "Space" => {
                input.fire = down;
                if down && !repeat {
                    input.trigger = true;
                }
            }
            "Enter" => {
                if down {
                    input.restart = true;
                }
            }
            "Escape" | "KeyP" => {
                if down && !repeat {
                    input.pause = true;
                }
            }
            _ => return false,
        }
        true
    }

    fn setup_input_handlers(document: &Document, game: Rc<RefCell<Game>>) {
        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if apply_key(&mut g, &event.code(), true, event.repeat()) {
                    event.prevent_default();
                }
            });
            let _ = document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                apply_key(&mut game.borrow_mut(), &event.code(), false, false);
            });
            let _ = document.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move - relative movement drives first-person look
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.runner.input.look += Vec2::new(event.movement_x() as f32, event.movement_y() as f32);
            });
            let _ = document.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click - shoot at the pointer, or start from the title screen
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let target = web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.get_element_by_id("game"));
                let mut g = game.borrow_mut();
                let pointer = g.to_field(target, event.offset_x(), event.offset_y());
                let starting = matches!(g.last_phase, GamePhase::Ready | GamePhase::GameOver);
                let input = &mut g.runner.input;
                input.trigger = true;
                input.pointer = Some(pointer);
                if starting {
                    input.restart = true;
                }
            });
            let _ = document.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.last_phase == GamePhase::Playing {
                        g.runner.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.last_phase == GamePhase::Playing {
                    g.runner.input.pause = true;
                    // Held keys never see their keyup once focus is gone
                    g.runner.input.up = false;
                    g.runner.input.down = false;
                    g.runner.input.left = false;
                    g.runner.input.right = false;
                    g.runner.input.fire = false;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

/// Headless attract-mode run of every cabinet
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use arcade_cabinet::platform::MemoryStorage;
    use arcade_cabinet::sim::{GameEvent, Runner};
    use glam::Vec2;

    env_logger::init();
    log::info!("Arcade Cabinet (native) starting...");
    log::info!("Native mode runs a scripted demo - serve the wasm build for the playable version");

    let tuning = Tuning::default();
    let settings = Settings::default();
    let mut storage = MemoryStorage::new();
    let frames = 60 * 60;

    for kind in [GameKind::Pacman, GameKind::Galactica, GameKind::Robots, GameKind::Range] {
        let mut best = HighScore::load(kind, &storage);
        let cabinet = match build_cabinet(kind, Layout::CLASSIC, &tuning, 7, &best, &settings) {
            Ok(cabinet) => cabinet,
            Err(e) => {
                log::error!("Cannot build {}: {}", kind.as_str(), e);
                continue;
            }
        };
        let mut runner = Runner::new(cabinet);
        runner.input.restart = true;

        for frame in 0..frames {
            // Scripted stick: sweep through the directions, fire constantly
            let phase = (frame / 40) % 4;
            runner.input.up = phase == 0;
            runner.input.left = phase == 1;
            runner.input.down = phase == 2;
            runner.input.right = phase == 3;
            runner.input.fire = true;
            if frame % 20 == 0 {
                runner.input.trigger = true;
                runner.input.pointer = Some(Vec2::new(400.0, 200.0));
                runner.input.look = Vec2::new(if phase < 2 { 15.0 } else { -15.0 }, 0.0);
            }
            runner.frame(arcade_cabinet::consts::SIM_DT);

            for event in runner.game.drain_events() {
                if let GameEvent::NewHighScore { score } = event {
                    best.submit(score);
                    best.save(&mut storage);
                }
            }
        }

        let hud = runner.game.hud();
        match serde_json::to_string(&hud) {
            Ok(json) => println!("{}: {}", kind.as_str(), json),
            Err(e) => log::warn!("Failed to serialize HUD: {}", e),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
