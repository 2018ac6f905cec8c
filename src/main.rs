//! Nebula Nomad entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, HtmlCanvasElement, HtmlImageElement, HtmlInputElement, KeyboardEvent,
        MouseEvent,
    };

    use nebula_nomad::assets::{AssetId, AssetRegistry, AssetStatus};
    use nebula_nomad::audio::AudioManager;
    use nebula_nomad::consts::{DEFAULT_FIELD_HEIGHT, DEFAULT_FIELD_WIDTH, DEFAULT_SHIP_SPEED};
    use nebula_nomad::hud::Hud;
    use nebula_nomad::renderer::{RenderState, build_scene, fallback_scene};
    use nebula_nomad::sim::{Field, GamePhase};
    use nebula_nomad::summary::{self, ScoreCard};
    use nebula_nomad::{Cue, GameError, Result, Session, Settings, ShipChoice};

    const CANVAS_ID: &str = "gameCanvas";

    /// Game instance holding all state
    struct Game {
        session: Session,
        assets: AssetRegistry,
        render_state: Option<RenderState>,
        audio: AudioManager,
        settings: Settings,
        canvas: HtmlCanvasElement,
    }

    /// Canvas size that fills the window
    fn window_size(window: &web_sys::Window) -> (u32, u32) {
        let width = window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(DEFAULT_FIELD_WIDTH as f64);
        let height = window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(DEFAULT_FIELD_HEIGHT as f64);
        (width as u32, height as u32)
    }

    fn now_ms() -> f64 {
        js_sys::Date::now()
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// Optional HUD line: shown with its text, or hidden
    fn set_optional(document: &Document, id: &str, text: Option<&str>) {
        set_visible(document, id, text.is_some());
        if let Some(text) = text {
            set_text(document, id, text);
        }
    }

    impl Game {
        fn field(&self) -> Field {
            self.session.state().field
        }

        /// Loading -> Menu once every image settled or the preload timed out
        fn check_preload(&mut self, now: f64) {
            if self.session.phase() != GamePhase::Loading || !self.assets.preload_complete(now) {
                return;
            }
            if !self.assets.preload_settled() {
                log::warn!("Image loading timeout reached; proceeding with available images");
            }
            match self.session.enter_menu(now) {
                Ok(()) => {
                    if let Some(document) = document() {
                        set_visible(&document, "loading", false);
                        set_visible(&document, "menu", true);
                    }
                }
                Err(e) => log::warn!("{e}"),
            }
        }

        /// Run one display frame
        fn frame(&mut self) {
            let now = now_ms();
            self.check_preload(now);

            let scene = match self.session.advance(now) {
                Ok(_) => build_scene(
                    self.session.state(),
                    &self.assets,
                    self.settings.pulses_enabled(),
                ),
                Err(e) => {
                    log::error!("{e}");
                    fallback_scene(self.field())
                }
            };
            self.assets.report_fallbacks(&scene.fallbacks);

            if let Some(render_state) = self.render_state.as_mut() {
                match render_state.render(&scene) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(e) => log::error!("Render error: {:?}", e),
                }
            }

            for cue in self.session.drain_cues() {
                self.handle_cue(cue);
            }
            self.update_hud();
        }

        fn handle_cue(&mut self, cue: Cue) {
            self.audio.apply(cue);
            let Some(document) = document() else { return };
            match cue {
                Cue::GameOver => {
                    show_score_card(&document, &self.session.score_card());
                    set_visible(&document, "gameOver", true);
                }
                Cue::PauseMusic => {
                    set_visible(&document, "pauseScreen", self.session.phase() == GamePhase::Paused);
                }
                Cue::ResumeMusic => set_visible(&document, "pauseScreen", false),
                Cue::StartMusic => {
                    set_visible(&document, "menu", false);
                    set_visible(&document, "gameOver", false);
                    set_visible(&document, "hud", true);
                    set_text(&document, "export-status", "");
                }
                Cue::Explosion => {}
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = document() else { return };
            if !matches!(
                self.session.phase(),
                GamePhase::Playing | GamePhase::Paused | GamePhase::GameOver
            ) {
                return;
            }

            let hud = Hud::from_state(self.session.state(), self.settings.pulses_enabled());
            set_text(&document, "hud-player", &hud.player);
            set_text(&document, "hud-rank", &hud.rank);
            set_text(&document, "hud-dodged", &hud.dodged);
            set_text(&document, "hud-destroyed", &hud.destroyed);
            set_text(&document, "hud-total", &hud.total);
            set_optional(&document, "hud-double", hud.double_score.as_deref());
            set_optional(&document, "hud-cooldown", hud.cooldown.as_deref());
            set_text(&document, "hud-time", &hud.time);

            if let Some(el) = document.get_element_by_id("life-notice") {
                match &hud.banner {
                    Some(banner) => {
                        el.set_text_content(Some(&banner.text));
                        let _ = el.set_attribute("style", &format!("opacity: {:.2}", banner.alpha));
                        let _ = el.set_attribute("class", "");
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }
        }

        /// Match the canvas to the window and rescale the field
        fn fit_canvas(&mut self) {
            let Some(window) = web_sys::window() else { return };
            let (width, height) = window_size(&window);
            if width == 0 || height == 0 {
                return;
            }
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            self.session.resize(width as f32, height as f32);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height);
            }
        }
    }

    fn show_score_card(document: &Document, card: &ScoreCard) {
        set_text(document, "score-player", &format!("Player: {}", card.player_name));
        set_text(document, "score-rank", &format!("Rank: {}", card.rank));
        set_text(document, "score-dodged", &format!("Dodged: {}", card.dodged));
        set_text(document, "score-destroyed", &format!("Destroyed: {}", card.destroyed));
        set_text(document, "score-total", &format!("Total Score: {}", card.total));
        set_text(document, "score-level", &format!("Level: {}", card.level));
        set_text(document, "score-time", &format!("Time: {}", card.time()));
    }

    /// Start loading an image; the registry and GPU are updated when it settles
    fn load_image(game: &Rc<RefCell<Game>>, id: AssetId, src: &str) -> Result<()> {
        let img = HtmlImageElement::new()
            .map_err(|e| GameError::SurfaceInit(format!("cannot create image: {e:?}")))?;

        {
            let game = game.clone();
            let image = img.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if g.assets.mark_loaded(id, image.natural_width()) == AssetStatus::Loaded {
                    if let Some(render_state) = g.render_state.as_mut() {
                        render_state.upload_image(id, &image);
                    }
                    log::info!("Image loaded: {}", id.name());
                }
            });
            let _ = img.add_event_listener_with_callback("load", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().assets.mark_failed(id);
            });
            let _ = img.add_event_listener_with_callback("error", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        img.set_src(src);
        Ok(())
    }

    pub async fn run() -> Result<()> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Nebula Nomad starting...");

        let settings = Settings::load();

        let window =
            web_sys::window().ok_or_else(|| GameError::SurfaceInit("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| GameError::SurfaceInit("no document".into()))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| GameError::SurfaceInit(format!("no #{CANVAS_ID} element")))?
            .dyn_into()
            .map_err(|_| GameError::SurfaceInit(format!("#{CANVAS_ID} is not a canvas")))?;

        let (width, height) = window_size(&window);
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let field = Field {
            width: width.max(1) as f32,
            height: height.max(1) as f32,
        };
        let session = Session::new(seed, field, &settings);
        log::info!("Session created with seed: {}", seed);

        // Initialize WebGPU (WebGL2 when WebGPU is missing)
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| GameError::SurfaceInit(format!("failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| GameError::SurfaceInit(format!("failed to get adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await?;

        let game = Rc::new(RefCell::new(Game {
            session,
            assets: AssetRegistry::new(),
            render_state: Some(render_state),
            audio: AudioManager::new(&settings),
            settings,
            canvas: canvas.clone(),
        }));

        // Preload images
        game.borrow_mut().assets.begin_preload(now_ms());
        for id in AssetId::PRELOAD {
            if let Some(src) = id.path() {
                load_image(&game, id, src)?;
            }
        }

        setup_input_handlers(&canvas, game.clone());
        setup_ship_buttons(&document, game.clone());
        setup_game_over_buttons(&document, game.clone());
        setup_auto_pause(game.clone());
        setup_resize(game.clone());

        request_animation_frame(game);

        log::info!("Nebula Nomad running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Keyboard down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let phase = g.session.phase();
                match event.key().as_str() {
                    "ArrowLeft" => g.session.set_left(true),
                    "ArrowRight" => g.session.set_right(true),
                    "ArrowUp" | " " if phase == GamePhase::Playing => {
                        event.prevent_default();
                        if let Err(e) = g.session.fire(now_ms()) {
                            log::debug!("{e}");
                        }
                    }
                    "p" | "P" if matches!(phase, GamePhase::Playing | GamePhase::Paused) => {
                        if let Err(e) = g.session.toggle_pause() {
                            log::debug!("{e}");
                        }
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.session.set_left(false),
                    "ArrowRight" => g.session.set_right(false),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Canvas click toggles pause during a run
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                if matches!(g.session.phase(), GamePhase::Playing | GamePhase::Paused) {
                    if let Err(e) = g.session.toggle_pause() {
                        log::debug!("{e}");
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Read a `.ship-option` button's sprite and speed
    fn ship_choice(el: &Element) -> Option<ShipChoice> {
        let sprite = el.get_attribute("data-sprite")?;
        let speed = el
            .get_attribute("data-speed")
            .and_then(|s| s.parse::<f32>().ok())
            .filter(|s| *s > 0.0)
            .unwrap_or(DEFAULT_SHIP_SPEED);
        Some(ShipChoice { sprite, speed })
    }

    fn setup_ship_buttons(doc: &Document, game: Rc<RefCell<Game>>) {
        let Ok(buttons) = doc.query_selector_all(".ship-option") else {
            return;
        };

        for i in 0..buttons.length() {
            let Some(el) = buttons.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let Some(choice) = ship_choice(&el) else {
                log::warn!("Ship button {i} has no data-sprite");
                continue;
            };

            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let entered = document()
                    .and_then(|d| d.get_element_by_id("playerName"))
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                    .map(|input| input.value())
                    .unwrap_or_default();

                let selected = {
                    let mut g = game.borrow_mut();
                    let name = g.settings.player_name(&entered);
                    match g.session.select_ship(&choice, &name, now_ms()) {
                        Ok(()) => {
                            g.assets.set_ship(&choice.sprite);
                            true
                        }
                        Err(e) => {
                            log::warn!("{e}");
                            false
                        }
                    }
                };

                if selected {
                    if let Err(e) = load_image(&game, AssetId::PlayerShip, &choice.sprite) {
                        log::warn!("{e}");
                        game.borrow_mut().assets.mark_failed(AssetId::PlayerShip);
                    }
                }
            });
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_game_over_buttons(doc: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = doc.get_element_by_id("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if let Err(e) = game.borrow_mut().session.restart(now_ms()) {
                    log::warn!("{e}");
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = doc.get_element_by_id("download-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let card = game.borrow().session.score_card();
                if let Err(e) = summary::download(&card) {
                    log::error!("{e}");
                    if let Some(document) = document() {
                        set_text(&document, "export-status", "Download failed. Please try again.");
                    }
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = doc.get_element_by_id("share-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let card = game.borrow().session.score_card();
                wasm_bindgen_futures::spawn_local(async move {
                    let status = match summary::copy_share_text(&card).await {
                        Ok(()) => "Score copied to clipboard!",
                        Err(e) => {
                            log::error!("{e}");
                            "Failed to copy score. Please try again."
                        }
                    };
                    if let Some(document) = document() {
                        set_text(&document, "export-status", status);
                    }
                });
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Window blur (click outside, tab switch)
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut g = game.borrow_mut();
            if g.settings.pause_on_blur && g.session.phase() == GamePhase::Playing {
                if g.session.toggle_pause().is_ok() {
                    log::info!("Auto-paused (window blur)");
                }
            }
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().fit_canvas();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        game.borrow_mut().frame();
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("{e}");
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("loading"))
        {
            el.set_text_content(Some(&format!("Unable to start: {e}")));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Nebula Nomad (native) starting headless attract run...");

    let card = headless::run(nebula_nomad::Settings::load())?;
    println!("{}", card.to_text());
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Autopilot run used to smoke-test the simulation without a browser
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use nebula_nomad::consts::*;
    use nebula_nomad::sim::{Field, GamePhase, GameState};
    use nebula_nomad::summary::ScoreCard;
    use nebula_nomad::{Result, Session, Settings, ShipChoice};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after ten minutes of wall time
    const MAX_FRAMES: u32 = 60 * 60 * 10;
    const MENU_FRAMES: u32 = 120;

    /// Dodge whatever is falling towards the ship, steering towards open space
    fn steer(state: &GameState) -> (bool, bool) {
        let player = state.player.bounds();
        let lane_min = player.min().x - 20.0;
        let lane_max = player.max().x + 20.0;
        let centre = player.pos.x + player.size.x / 2.0;

        let threat = state
            .obstacles
            .iter()
            .filter(|o| o.pos.y < player.pos.y && o.pos.x < lane_max && o.pos.x + o.size.x > lane_min)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        match threat {
            Some(o) => {
                let threat_centre = o.pos.x + o.size.x / 2.0;
                let go_left = threat_centre >= centre && player.pos.x > o.size.x;
                let go_left = go_left || player.max().x + o.size.x >= state.field.width;
                (go_left, !go_left)
            }
            None => (false, false),
        }
    }

    pub fn run(settings: Settings) -> Result<ScoreCard> {
        let seed = settings.seed.unwrap_or(0x5eed);
        let mut session = Session::new(seed, Field::default(), &settings);
        let mut now = 0.0;

        session.enter_menu(now)?;
        for _ in 0..MENU_FRAMES {
            now += FRAME_MS;
            session.advance(now)?;
        }

        let ship = ShipChoice {
            sprite: "assets/ship1.png".to_string(),
            speed: DEFAULT_SHIP_SPEED,
        };
        let name = settings.player_name("Autopilot");
        session.select_ship(&ship, &name, now)?;

        for _ in 0..MAX_FRAMES {
            now += FRAME_MS;
            let (left, right) = steer(session.state());
            session.set_left(left);
            session.set_right(right);
            if session.phase() == GamePhase::Playing {
                session.fire(now)?;
            }
            session.advance(now)?;
            if session.phase() == GamePhase::GameOver {
                break;
            }
        }

        let card = session.score_card();
        log::info!(
            "Autopilot finished: {} points, level {}, {:?}",
            card.total,
            card.level,
            session.phase()
        );
        Ok(card)
    }
}
