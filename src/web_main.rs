use crate::renderer::{Input, Renderer};
use crate::session::{Screen, Session, TickOutcome, TimerAction};
use crate::settings::Settings;
use crate::{log, Game, WebRenderer};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

const CANVAS_ID: &str = "game-canvas";

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

struct GameLoop {
    session: Session,
    renderer: WebRenderer,
    // Tick source: period in ms while a round is running
    tick_period: Option<f64>,
    last_tick: f64,
    dirty: bool,
}

impl GameLoop {
    fn new() -> Result<Self, JsValue> {
        let mut renderer = WebRenderer::new(CANVAS_ID)?;
        renderer.init().map_err(|e| JsValue::from_str(&e.to_string()))?;

        let settings = Settings {
            theme: renderer.page_theme(),
            ..Settings::default()
        };
        let session = Session::new(Game::new(), settings);

        Ok(Self {
            session,
            renderer,
            tick_period: None,
            last_tick: 0.0,
            dirty: true,
        })
    }

    fn apply(&mut self, action: TimerAction, now: f64) {
        match action {
            TimerAction::Start(period) => {
                self.tick_period = Some(period.as_secs_f64() * 1000.0);
                self.last_tick = now;
            }
            TimerAction::Stop => self.tick_period = None,
            TimerAction::Keep => {}
        }
    }

    fn handle_input(&mut self, input: Input, now: f64) {
        // The start screen's radio buttons are read when a round begins
        if input == Input::Start
            && matches!(self.session.screen(), Screen::Menu | Screen::GameOver)
        {
            let (speed, food) = self.renderer.selected_options();
            self.session.set_speed(speed);
            self.session.set_food(food);
        }

        let action = self.session.handle_input(input);
        self.apply(action, now);
        self.dirty = true;
    }

    fn update_frame(&mut self, now: f64) -> Result<(), JsValue> {
        while let Some(input) = self
            .renderer
            .poll_input()
            .map_err(|e| JsValue::from_str(&e.to_string()))?
        {
            self.handle_input(input, now);
        }

        if let Some(period) = self.tick_period {
            if now - self.last_tick >= period {
                self.last_tick = now;
                if let TickOutcome::GameOver { .. } = self.session.tick() {
                    self.tick_period = None;
                }
                self.dirty = true;
            }
        }

        if self.dirty {
            self.dirty = false;
            self.renderer
                .render(&self.session)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
        }

        Ok(())
    }

    /// Detaches input so nothing queues up once frames stop.
    fn stop(&mut self) {
        self.tick_period = None;
        if let Err(e) = self.renderer.cleanup() {
            log!("cleanup failed: {}", e);
        }
        log!("game loop stopped");
    }
}

fn request_frame(callback: &FrameCallback) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let callback = callback.borrow();
    let closure = callback.as_ref().ok_or("frame callback missing")?;
    window.request_animation_frame(closure.as_ref().unchecked_ref())?;
    Ok(())
}

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let game_loop = match GameLoop::new() {
        Ok(gl) => Rc::new(RefCell::new(gl)),
        Err(e) => {
            web_sys::console::error_1(&format!("failed to create game loop: {:?}", e).into());
            return Err(e);
        }
    };

    let window = web_sys::window().ok_or("no window")?;
    let performance = window.performance().ok_or("no performance")?;

    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let now = performance.now();

        {
            let mut state = game_loop.borrow_mut();
            if let Err(e) = state.update_frame(now) {
                web_sys::console::error_1(&e);
                state.stop();
                return; // Stop loop on error
            }
        }

        if let Err(e) = request_frame(&f) {
            web_sys::console::error_1(&e);
        }
    }) as Box<dyn FnMut()>));

    request_frame(&g)?;

    log!("game loop started");
    Ok(())
}
