//! Nova Strike entry point
//!
//! Handles platform-specific initialization and runs the game loop. The wasm
//! build wires keyboard input and mirrors sim entities onto DOM nodes; the
//! native build drives a scripted headless demo for development.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement, KeyboardEvent};

    use nova_strike::consts::*;
    use nova_strike::sim::{GamePhase, GameState, TickInput, tick};
    use nova_strike::{HighScores, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        highscores: HighScores,
        input: TickInput,
        accumulator: f32,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // One submission per run
        score_submitted: bool,
        // DOM nodes mirroring sim entities
        player_node: Option<HtmlElement>,
        missile_nodes: HashMap<u32, HtmlElement>,
        enemy_nodes: HashMap<u32, HtmlElement>,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            Self {
                state: GameState::new(seed, settings.difficulty),
                settings,
                highscores: HighScores::load(),
                input: TickInput::default(),
                accumulator: 0.0,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                score_submitted: false,
                player_node: None,
                missile_nodes: HashMap::new(),
                enemy_nodes: HashMap::new(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input;
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.pause = false;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Mirror sim entities onto DOM nodes inside the arena
        fn render(&mut self, document: &Document) {
            let Some(arena) = document.get_element_by_id("game-area") else {
                return;
            };

            // Player
            if self.player_node.is_none() {
                if let Some(node) = create_node(document, "player") {
                    let _ = arena.append_child(&node);
                    self.player_node = Some(node);
                }
            }
            if let Some(node) = &self.player_node {
                let b = &self.state.player.bounds;
                set_bounds(node, b.x, b.y, b.width, b.height);
                // Blink through the post-hit grace period
                let opacity = if self.state.player.invuln_ticks > 0
                    && self.state.player.invuln_ticks % 20 < 10
                {
                    "0.4"
                } else {
                    "1"
                };
                let _ = node.style().set_property("opacity", opacity);
            }

            // Missiles
            for missile in &self.state.missiles {
                let node = self.missile_nodes.entry(missile.id).or_insert_with(|| {
                    let node = create_node(document, "missile").expect("missile node");
                    let _ = arena.append_child(&node);
                    node
                });
                let b = &missile.bounds;
                set_bounds(node, b.x, b.y, b.width, b.height);
            }
            let live: Vec<u32> = self.state.missiles.iter().map(|m| m.id).collect();
            self.missile_nodes.retain(|id, node| {
                let keep = live.contains(id);
                if !keep {
                    node.remove();
                }
                keep
            });

            // Enemies
            for enemy in &self.state.enemies {
                let node = self.enemy_nodes.entry(enemy.id).or_insert_with(|| {
                    let node = create_node(document, "enemy").expect("enemy node");
                    let _ = arena.append_child(&node);
                    node
                });
                let b = &enemy.bounds;
                set_bounds(node, b.x, b.y, b.width, b.height);
            }
            let live: Vec<u32> = self.state.enemies.iter().map(|e| e.id).collect();
            self.enemy_nodes.retain(|id, node| {
                let keep = live.contains(id);
                if !keep {
                    node.remove();
                }
                keep
            });
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self, document: &Document) {
            if let Some(el) = document
                .query_selector("#hud-score .hud-value")
                .ok()
                .flatten()
            {
                el.set_text_content(Some(&self.state.score.to_string()));
            }

            if let Some(el) = document
                .query_selector("#hud-lives .hud-value")
                .ok()
                .flatten()
            {
                el.set_text_content(Some(&self.state.lives.to_string()));
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Some(val) = document.query_selector("#hud-fps .hud-value").ok().flatten()
                    {
                        val.set_text_content(Some(&self.fps.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            // Pause hint
            if let Some(el) = document.get_element_by_id("pause-overlay") {
                let class = if self.state.phase == GamePhase::Paused {
                    ""
                } else {
                    "hidden"
                };
                let _ = el.set_attribute("class", class);
            }

            // Game over overlay
            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.phase == GamePhase::GameOver {
                    let class = if self.settings.effective_overlay_animation() {
                        "pulse"
                    } else {
                        ""
                    };
                    let _ = el.set_attribute("class", class);
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&self.state.score.to_string()));
                    }
                    if let Some(kills_el) = document.get_element_by_id("final-kills") {
                        kills_el
                            .set_text_content(Some(&self.state.enemies_destroyed.to_string()));
                    }
                    self.submit_score(document);
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        /// Push the finished run onto the leaderboard (once)
        fn submit_score(&mut self, document: &Document) {
            if self.score_submitted {
                return;
            }
            self.score_submitted = true;

            let timestamp = js_sys::Date::now();
            if let Some(rank) =
                self.highscores
                    .add_score(self.state.score, self.state.enemies_destroyed, timestamp)
            {
                self.highscores.save();
                log::info!("New high score rank {}: {}", rank, self.state.score);
                if let Some(el) = document.get_element_by_id("final-rank") {
                    el.set_text_content(Some(&format!("High score! Rank #{}", rank)));
                }
            }
        }

        /// Reset for a fresh run
        fn restart(&mut self, seed: u64) {
            self.state = GameState::new(seed, self.settings.difficulty);
            self.input = TickInput::default();
            self.accumulator = 0.0;
            self.score_submitted = false;
        }
    }

    fn create_node(document: &Document, class: &str) -> Option<HtmlElement> {
        let node: HtmlElement = document.create_element("div").ok()?.dyn_into().ok()?;
        node.set_class_name(class);
        let _ = node.style().set_property("position", "absolute");
        Some(node)
    }

    fn set_bounds(node: &HtmlElement, x: f32, y: f32, w: f32, h: f32) {
        let style = node.style();
        let _ = style.set_property("left", &format!("{x:.1}px"));
        let _ = style.set_property("top", &format!("{y:.1}px"));
        let _ = style.set_property("width", &format!("{w:.1}px"));
        let _ = style.set_property("height", &format!("{h:.1}px"));
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Nova Strike starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        setup_restart_button(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Nova Strike running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Key down: held movement/fire flags plus one-shot pause
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let mut handled = true;
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.left = true,
                    "ArrowRight" | "d" | "D" => g.input.right = true,
                    "ArrowUp" | "w" | "W" => g.input.up = true,
                    "ArrowDown" | "s" | "S" => g.input.down = true,
                    " " => g.input.fire = true,
                    "Escape" | "p" | "P" => {
                        if !event.repeat() {
                            g.input.pause = true;
                        }
                    }
                    _ => handled = false,
                }
                if handled {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up: release held flags
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.left = false,
                    "ArrowRight" | "d" | "D" => g.input.right = false,
                    "ArrowUp" | "w" | "W" => g.input.up = false,
                    "ArrowDown" | "s" | "S" => g.input.down = false,
                    " " => g.input.fire = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().restart(seed);
                log::info!("Game restarted with seed: {}", seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Playing {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Playing {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            let document = web_sys::window().unwrap().document().unwrap();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render(&document);
            g.update_hud(&document);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use nova_strike::consts::*;
    use nova_strike::settings::DifficultyPreset;
    use nova_strike::sim::{GamePhase, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Nova Strike (native) starting...");
    log::info!("Headless demo run - build with trunk for the browser version");

    let seed = 42;
    let mut state = GameState::new(seed, DifficultyPreset::Normal);

    // Scripted pilot: hold fire, strafe side to side
    let mut input = TickInput {
        fire: true,
        ..Default::default()
    };

    let max_ticks = 2 * 60 * 60; // two minutes of sim time
    for step in 0..max_ticks {
        let strafe_right = (step / 120) % 2 == 0;
        input.right = strafe_right;
        input.left = !strafe_right;

        tick(&mut state, &input, SIM_DT);

        if step % 600 == 0 {
            log::info!(
                "tick {:>5}: score {:>5}, lives {}, enemies {:>2}, missiles {:>2}",
                state.time_ticks,
                state.score,
                state.lives,
                state.enemies.len(),
                state.missiles.len()
            );
        }

        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    println!(
        "Demo finished: score {} ({} enemies destroyed) in {} ticks, {}",
        state.score,
        state.enemies_destroyed,
        state.time_ticks,
        match state.phase {
            GamePhase::GameOver => "shot down",
            _ => "survived",
        }
    );
}
