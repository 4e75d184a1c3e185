//! Rift Duo entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use rift_duo::consts::*;
    use rift_duo::sim::{GamePhase, InputState, Key, PlayerId, Snapshot};
    use rift_duo::{PurchaseError, Session, ShopItem, Tuning};

    /// Game instance holding all state
    struct Game {
        session: Session,
        /// Held keys, written by key handlers and read once per frame
        input: InputState,
        snapshot: Option<Snapshot>,
        ctx: Option<CanvasRenderingContext2d>,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                session: Session::new(Tuning::default(), seed),
                input: InputState::new(),
                snapshot: None,
                ctx: None,
            }
        }

        /// Keys that drive menus rather than avatars
        fn handle_menu_key(&mut self, code: &str) {
            match (self.session.phase(), code) {
                (GamePhase::Menu | GamePhase::GameOver | GamePhase::Victory, "Enter") => {
                    self.session.start_game();
                }
                (GamePhase::Shop, "KeyN") => self.session.next_level(),
                (GamePhase::Shop, _) => {
                    if let Some((id, item)) = shop_hotkey(code) {
                        // Refusals are logged by the session
                        let _ = self.session.buy(id, item);
                    }
                }
                _ => {}
            }
        }

        fn update(&mut self) {
            self.snapshot = Some(self.session.frame(&self.input));
        }

        fn render(&self) {
            let Some(ctx) = &self.ctx else {
                return;
            };
            ctx.set_fill_style_str("#111827");
            ctx.fill_rect(0.0, 0.0, ARENA_WIDTH as f64, ARENA_HEIGHT as f64);

            if let Some(snapshot) = &self.snapshot {
                draw_snapshot(ctx, snapshot);
            }

            ctx.set_fill_style_str("#ffffff");
            ctx.set_font("16px monospace");
            let banner = match self.session.phase() {
                GamePhase::Menu => "PRESS ENTER TO START".to_string(),
                GamePhase::Shop => format!("MERCHANT - LEVEL {} CLEARED - [N] NEXT BATTLE", self.session.level),
                GamePhase::GameOver | GamePhase::Victory => {
                    self.session.end_message.clone().unwrap_or_default()
                }
                GamePhase::Playing => {
                    format!("LEVEL {}  {:.0}s", self.session.level, self.session.fight_seconds())
                }
            };
            let _ = ctx.fill_text(&banner, 20.0, 24.0);

            if self.session.phase() == GamePhase::Shop {
                self.render_shop(ctx);
            }
        }

        /// Price list with each player's gold and what they can still buy
        fn render_shop(&self, ctx: &CanvasRenderingContext2d) {
            let session = &self.session;
            ctx.set_font("14px monospace");
            for (column, id) in PlayerId::ALL.into_iter().enumerate() {
                let x = 20.0 + column as f64 * (ARENA_WIDTH as f64 / 2.0);
                let gold = session.world.player(id).map_or(0, |p| p.stats.gold);
                let keys = if id == PlayerId::One { "1-6" } else { "NUM 1-6" };
                ctx.set_fill_style_str(&css_color(id.color()));
                let _ = ctx.fill_text(&format!("PLAYER {} [{}]  GOLD {}", id.number(), keys, gold), x, 70.0);

                for (row, item) in ShopItem::ALL.into_iter().enumerate() {
                    let Some(offer) = session.tuning.offer(item) else {
                        continue;
                    };
                    let status = match session.can_buy(id, item) {
                        Ok(()) => "",
                        Err(PurchaseError::ReviveUnavailable) => "  SOLD OUT",
                        Err(_) => "  -",
                    };
                    let line = format!(
                        "{}. {} ({}) {}g{}",
                        row + 1,
                        item.name(),
                        offer.description(),
                        offer.cost,
                        status
                    );
                    ctx.set_fill_style_str(if status.is_empty() { "#ffffff" } else { "#6b7280" });
                    let _ = ctx.fill_text(&line, x, 100.0 + row as f64 * 22.0);
                }
            }
        }
    }

    /// Player 1 buys with digits 1-6, player 2 with numpad 1-6
    fn shop_hotkey(code: &str) -> Option<(PlayerId, ShopItem)> {
        let (id, digit) = if let Some(d) = code.strip_prefix("Digit") {
            (PlayerId::One, d)
        } else if let Some(d) = code.strip_prefix("Numpad") {
            (PlayerId::Two, d)
        } else {
            return None;
        };
        let index = digit.parse::<usize>().ok()?.checked_sub(1)?;
        ShopItem::ALL.get(index).map(|item| (id, *item))
    }

    fn css_color(color: u32) -> String {
        format!("#{:06x}", color)
    }

    /// Plain-rectangle presentation (no sprites)
    fn draw_snapshot(ctx: &CanvasRenderingContext2d, snapshot: &Snapshot) {
        if let Some(boss) = snapshot.boss.as_ref().filter(|b| !b.is_defeated()) {
            ctx.set_fill_style_str(&css_color(boss.color));
            ctx.fill_rect(boss.pos.x as f64, boss.pos.y as f64, boss.width as f64, boss.height as f64);
            ctx.set_fill_style_str("#374151");
            ctx.fill_rect(boss.pos.x as f64, boss.pos.y as f64 - 15.0, boss.width as f64, 10.0);
            ctx.set_fill_style_str("#dc2626");
            let pct = (boss.hp / boss.max_hp).max(0.0) as f64;
            ctx.fill_rect(boss.pos.x as f64, boss.pos.y as f64 - 15.0, boss.width as f64 * pct, 10.0);
        }

        for p in &snapshot.players {
            let color = if p.is_dead { 0x4b5563 } else { p.color };
            ctx.set_global_alpha(if p.is_dead || p.invincibility % 8 >= 4 { 0.5 } else { 1.0 });
            ctx.set_fill_style_str(&css_color(color));
            ctx.fill_rect(p.pos.x as f64, p.pos.y as f64, p.width as f64, p.height as f64);
            ctx.set_global_alpha(1.0);

            ctx.set_fill_style_str("#374151");
            ctx.fill_rect(p.pos.x as f64, p.pos.y as f64 - 10.0, p.width as f64, 5.0);
            ctx.set_fill_style_str("#22c55e");
            let pct = (p.stats.hp / p.stats.max_hp).max(0.0) as f64;
            ctx.fill_rect(p.pos.x as f64, p.pos.y as f64 - 10.0, p.width as f64 * pct, 5.0);
        }

        for shot in &snapshot.projectiles {
            ctx.set_fill_style_str(&css_color(shot.color));
            ctx.begin_path();
            let _ = ctx.arc(shot.pos.x as f64, shot.pos.y as f64, shot.radius as f64, 0.0, std::f64::consts::TAU);
            ctx.fill();
        }

        ctx.set_font("16px monospace");
        for text in &snapshot.texts {
            ctx.set_fill_style_str(&css_color(text.color));
            let _ = ctx.fill_text(&text.text, text.pos.x as f64, text.pos.y as f64);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Rift Duo starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document available");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        let canvas = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
        match canvas {
            Some(canvas) => {
                canvas.set_width(ARENA_WIDTH as u32);
                canvas.set_height(ARENA_HEIGHT as u32);
                let ctx = canvas
                    .get_context("2d")
                    .ok()
                    .flatten()
                    .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok());
                if ctx.is_none() {
                    log::warn!("2D context unavailable, running without presentation");
                }
                game.borrow_mut().ctx = ctx;
            }
            None => log::warn!("No #canvas element, running without presentation"),
        }

        setup_input_handlers(game.clone());
        request_animation_frame(game);

        log::info!("Rift Duo running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down: avatar keys go into the held set, the rest drive menus
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let code = event.code();
                if let Some(key) = Key::from_code(&code) {
                    event.prevent_default();
                    g.input.press(key);
                }
                if !event.repeat() {
                    g.handle_menu_key(&code);
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_code(&event.code()) {
                    game.borrow_mut().input.release(key);
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Losing focus swallows key-up events; drop everything held
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().input.clear();
                log::info!("Window blurred, input released");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// One tick per presented frame; no wall-clock correction
    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.update();
            g.render();
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
    // Entry point is wasm_main
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Rift Duo (native) starting...");
    log::info!("Native mode runs a headless autopilot - build for wasm32 to play");

    let tuning = match std::env::args().nth(1).as_deref() {
        Some("--dump-tuning") => {
            // Starting point for a custom balance file
            match rift_duo::Tuning::default().to_json() {
                Ok(json) => println!("{}", json),
                Err(err) => log::error!("Could not serialize tuning: {}", err),
            }
            return;
        }
        Some(path) => match load_tuning(path) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("Could not load tuning from {}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => rift_duo::Tuning::default(),
    };

    autopilot::run(tuning, 0x5eed);
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> Result<rift_duo::Tuning, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(rift_duo::Tuning::from_json(&json)?)
}

/// Headless demo: both players kite the boss and shoot until the run ends
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use rift_duo::consts::*;
    use rift_duo::sim::{GamePhase, InputState, KeyBindings, PlayerId};
    use rift_duo::{Session, ShopItem, Tuning};

    /// Hard stop so a stalemate cannot spin forever (10 minutes of play)
    const MAX_FRAMES: u64 = 10 * 60 * TICKS_PER_SECOND as u64;

    /// Hold fire, line up with the boss's row, then turn to face it
    fn steer(session: &Session, input: &mut InputState) {
        input.clear();
        let Some(boss) = session.world.boss.as_ref() else {
            return;
        };
        let boss_center = boss.center();

        for player in session.world.players.iter().filter(|p| p.is_alive()) {
            let keys = KeyBindings::for_player(player.id);
            input.press(keys.attack);

            let center = player.center();
            if (center.y - boss_center.y).abs() > 10.0 {
                input.press(if center.y < boss_center.y { keys.down } else { keys.up });
            } else if player.last_move_dir.x < 0.9 || center.x < boss_center.x - 300.0 {
                input.press(keys.right);
            }
            if player.dash_cooldown == 0 && player.stats.hp < player.stats.max_hp * 0.3 {
                input.press(keys.dash);
            }
        }
    }

    fn shop(session: &mut Session) {
        for id in PlayerId::ALL {
            for item in [ShopItem::PhoenixChip, ShopItem::PlasmaBlade, ShopItem::Accelerator, ShopItem::EnergyShield] {
                while session.can_buy(id, item).is_ok() {
                    if session.buy(id, item).is_err() {
                        break;
                    }
                }
            }
        }
        session.next_level();
    }

    pub fn run(tuning: Tuning, seed: u64) {
        let mut session = Session::new(tuning, seed);
        let mut input = InputState::new();
        session.start_game();

        let mut frames = 0;
        while frames < MAX_FRAMES {
            match session.phase() {
                GamePhase::Playing => {
                    steer(&session, &mut input);
                    session.frame(&input);
                    frames += 1;
                }
                GamePhase::Shop => shop(&mut session),
                GamePhase::Menu | GamePhase::GameOver | GamePhase::Victory => break,
            }
        }

        let message = session.end_message.clone().unwrap_or_else(|| "Out of time".to_string());
        log::info!(
            "Run finished after {} frames at level {} ({:.1}s into the fight): {}",
            frames,
            session.level,
            session.fight_seconds(),
            message
        );
        for player in &session.world.players {
            log::info!(
                "Player {}: hp {:.0}/{:.0}, gold {}, damage {}, armor {}",
                player.id.number(),
                player.stats.hp,
                player.stats.max_hp,
                player.stats.gold,
                player.stats.damage,
                player.stats.armor
            );
        }
    }
}
