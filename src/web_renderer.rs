use crate::entity::Position;
use crate::input::Controls;
use crate::palette::{hex, Palette};
use crate::renderer::{screen_shortcut, Input, Renderer};
use crate::session::{Screen, Session};
use crate::settings::{FoodSkin, Speed, Theme};
use crate::log;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, Event, HtmlCanvasElement, HtmlImageElement,
    HtmlInputElement, KeyboardEvent, TouchEvent,
};

const HEAD_SPRITE: &str = "assets/snake-head.png";
const CELL_INSET: f64 = 1.0;

/// Buttons wired to session inputs, by element id. Missing ones are skipped.
const BUTTONS: [(&str, Input); 8] = [
    ("start-btn", Input::Start),
    ("restart-btn", Input::Start),
    ("pause-btn", Input::Pause),
    ("resume-btn", Input::Resume),
    ("menu-btn", Input::Menu),
    ("pause-menu-btn", Input::Menu),
    ("gameover-menu-btn", Input::Menu),
    ("theme-toggle", Input::ToggleTheme),
];

fn js_err(e: JsValue) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{:?}", e))
}

fn load_image(src: &str) -> Result<HtmlImageElement, JsValue> {
    let image = HtmlImageElement::new()?;
    image.set_src(src);
    Ok(image)
}

fn image_ready(image: &HtmlImageElement) -> bool {
    image.complete() && image.natural_width() > 0
}

pub struct WebRenderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    document: Document,

    head_image: Option<HtmlImageElement>,
    food_images: Vec<(FoodSkin, HtmlImageElement)>,

    // Input state
    controls: Rc<RefCell<Controls>>,
    pending_input: Rc<RefCell<VecDeque<Input>>>,
    screen: Rc<Cell<Screen>>,

    // Last values pushed into the DOM, to avoid rewriting it every frame
    last_screen: Option<Screen>,
    last_theme: Option<Theme>,
    last_score: Option<u32>,
}

impl WebRenderer {
    pub fn new(canvas_id: &str) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let pending_input = Rc::new(RefCell::new(VecDeque::new()));
        let controls = Rc::new(RefCell::new(Controls::new()));
        {
            let pending_input = pending_input.clone();
            controls.borrow_mut().on_direction(move |direction| {
                pending_input.borrow_mut().push_back(Input::Direction(direction));
            });
        }

        let head_image = load_image(HEAD_SPRITE).ok();
        let food_images = [FoodSkin::Angela, FoodSkin::Tangyuan]
            .into_iter()
            .filter_map(|skin| load_image(skin.asset_path()).ok().map(|img| (skin, img)))
            .collect();

        Ok(Self {
            canvas,
            context,
            document,
            head_image,
            food_images,
            controls,
            pending_input,
            screen: Rc::new(Cell::new(Screen::Menu)),
            last_screen: None,
            last_theme: None,
            last_score: None,
        })
    }

    /// Theme the page was served with (`<html data-theme="dark">`).
    pub fn page_theme(&self) -> Theme {
        self.document
            .document_element()
            .and_then(|root| root.get_attribute("data-theme"))
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    fn checked_value(&self, group: &str) -> Option<String> {
        let selector = format!("input[name=\"{}\"]:checked", group);
        let element = self.document.query_selector(&selector).ok()??;
        let input = element.dyn_into::<HtmlInputElement>().ok()?;
        Some(input.value())
    }

    /// Speed and food picked on the start screen, falling back to defaults.
    pub fn selected_options(&self) -> (Speed, FoodSkin) {
        let speed = match self.checked_value("speed").map(|v| v.parse::<Speed>()) {
            Some(Ok(speed)) => speed,
            Some(Err(e)) => {
                log!("{}", e);
                Speed::default()
            }
            None => Speed::default(),
        };
        let food = match self.checked_value("food").map(|v| v.parse::<FoodSkin>()) {
            Some(Ok(food)) => food,
            Some(Err(e)) => {
                log!("{}", e);
                FoodSkin::default()
            }
            None => FoodSkin::default(),
        };
        (speed, food)
    }

    /// Stops direction input from reaching the session.
    pub fn detach_controls(&self) {
        self.controls.borrow_mut().detach();
    }

    fn setup_keyboard_listener(&self) -> Result<(), JsValue> {
        let controls = self.controls.clone();
        let pending_input = self.pending_input.clone();
        let screen = self.screen.clone();

        let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            let key = event.key();
            if controls.borrow_mut().handle_key(&key) {
                event.prevent_default();
                return;
            }

            if let Some(input) = screen_shortcut(&key, screen.get()) {
                event.prevent_default();
                pending_input.borrow_mut().push_back(input);
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);

        self.document
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;

        closure.forget(); // Keep listener alive
        Ok(())
    }

    fn setup_touch_listeners(&self) -> Result<(), JsValue> {
        // TouchStart: Record initial position
        let controls = self.controls.clone();
        let touchstart_closure = Closure::wrap(Box::new(move |event: TouchEvent| {
            event.prevent_default(); // Prevent zooming, scrolling, etc.

            if let Some(touch) = event.touches().item(0) {
                controls
                    .borrow_mut()
                    .touch_start(touch.client_x() as f64, touch.client_y() as f64);
            }
        }) as Box<dyn FnMut(TouchEvent)>);

        self.canvas.add_event_listener_with_callback(
            "touchstart",
            touchstart_closure.as_ref().unchecked_ref(),
        )?;
        touchstart_closure.forget();

        // TouchMove: Prevent default to avoid scrolling
        let touchmove_closure = Closure::wrap(Box::new(move |event: TouchEvent| {
            event.prevent_default();
        }) as Box<dyn FnMut(TouchEvent)>);

        self.canvas.add_event_listener_with_callback(
            "touchmove",
            touchmove_closure.as_ref().unchecked_ref(),
        )?;
        touchmove_closure.forget();

        // TouchEnd: Detect swipe direction
        let controls = self.controls.clone();
        let touchend_closure = Closure::wrap(Box::new(move |event: TouchEvent| {
            if let Some(touch) = event.changed_touches().item(0) {
                let swiped = controls
                    .borrow_mut()
                    .touch_end(touch.client_x() as f64, touch.client_y() as f64);
                if swiped.is_some() {
                    event.prevent_default();
                }
            }
        }) as Box<dyn FnMut(TouchEvent)>);

        self.canvas.add_event_listener_with_callback(
            "touchend",
            touchend_closure.as_ref().unchecked_ref(),
        )?;
        touchend_closure.forget();

        // TouchCancel: Clear state if touch is cancelled
        let controls = self.controls.clone();
        let touchcancel_closure = Closure::wrap(Box::new(move |_event: TouchEvent| {
            controls.borrow_mut().touch_cancel();
        }) as Box<dyn FnMut(TouchEvent)>);

        self.canvas.add_event_listener_with_callback(
            "touchcancel",
            touchcancel_closure.as_ref().unchecked_ref(),
        )?;
        touchcancel_closure.forget();

        Ok(())
    }

    /// On-screen d-pad: any element carrying `data-dir="up|down|left|right"`.
    fn setup_direction_buttons(&self) -> Result<(), JsValue> {
        let buttons = self.document.query_selector_all("[data-dir]")?;

        for i in 0..buttons.length() {
            let Some(element) = buttons.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let Some(id) = element.get_attribute("data-dir") else {
                continue;
            };

            for event_name in ["touchstart", "mousedown"] {
                let controls = self.controls.clone();
                let id = id.clone();
                let closure = Closure::wrap(Box::new(move |event: Event| {
                    event.prevent_default();
                    controls.borrow_mut().press_button(&id);
                }) as Box<dyn FnMut(Event)>);

                element.add_event_listener_with_callback(
                    event_name,
                    closure.as_ref().unchecked_ref(),
                )?;
                closure.forget();
            }
        }

        Ok(())
    }

    fn setup_session_buttons(&self) -> Result<(), JsValue> {
        for (id, input) in BUTTONS {
            let Some(element) = self.document.get_element_by_id(id) else {
                continue;
            };

            let pending_input = self.pending_input.clone();
            let closure = Closure::wrap(Box::new(move |_event: Event| {
                pending_input.borrow_mut().push_back(input);
            }) as Box<dyn FnMut(Event)>);

            element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn set_hidden(&self, id: &str, hidden: bool) -> Result<(), JsValue> {
        if let Some(element) = self.document.get_element_by_id(id) {
            if hidden {
                element.class_list().add_1("hidden")?;
            } else {
                element.class_list().remove_1("hidden")?;
            }
        }
        Ok(())
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(element) = self.document.get_element_by_id(id) {
            element.set_text_content(Some(text));
        }
    }

    fn sync_screen(&mut self, session: &Session) -> Result<(), JsValue> {
        let screen = session.screen();
        self.screen.set(screen);
        if self.last_screen == Some(screen) {
            return Ok(());
        }
        self.last_screen = Some(screen);

        self.set_hidden("start-screen", screen != Screen::Menu)?;
        self.set_hidden("pause-screen", screen != Screen::Paused)?;
        self.set_hidden("game-over-screen", screen != Screen::GameOver)?;

        if let Some(hud) = self.document.get_element_by_id("score-display") {
            if matches!(screen, Screen::Playing | Screen::Paused) {
                hud.class_list().add_1("visible")?;
            } else {
                hud.class_list().remove_1("visible")?;
            }
        }

        if let Some(score) = session.final_score() {
            self.set_text("final-score", &score.to_string());
        }

        let title = session.title();
        self.set_heading(&title)?;
        self.document.set_title(&title);
        Ok(())
    }

    fn set_heading(&self, title: &str) -> Result<(), JsValue> {
        if let Some(heading) = self.document.query_selector("header h1")? {
            heading.set_text_content(Some(title));
        }
        Ok(())
    }

    fn sync_theme(&mut self, theme: Theme) -> Result<(), JsValue> {
        if self.last_theme == Some(theme) {
            return Ok(());
        }
        self.last_theme = Some(theme);
        if let Some(root) = self.document.document_element() {
            root.set_attribute("data-theme", &theme.to_string())?;
        }
        Ok(())
    }

    fn sync_score(&mut self, score: u32) {
        if self.last_score == Some(score) {
            return;
        }
        self.last_score = Some(score);
        self.set_text("score", &score.to_string());
    }

    fn draw_grid(&self, size: f64, cell: f64, cells: i32, palette: &Palette) {
        self.context.set_fill_style_str(&hex(palette.background));
        self.context.fill_rect(0.0, 0.0, size, size);

        self.context.set_stroke_style_str(&hex(palette.grid));
        self.context.set_line_width(1.0);
        for i in 0..=cells {
            let offset = i as f64 * cell;
            self.context.begin_path();
            self.context.move_to(offset, 0.0);
            self.context.line_to(offset, size);
            self.context.stroke();
            self.context.begin_path();
            self.context.move_to(0.0, offset);
            self.context.line_to(size, offset);
            self.context.stroke();
        }
    }

    fn draw_food(
        &self,
        food: Position,
        cell: f64,
        skin: FoodSkin,
        palette: &Palette,
    ) -> Result<(), JsValue> {
        let x = food.x as f64 * cell + CELL_INSET;
        let y = food.y as f64 * cell + CELL_INSET;
        let w = cell - CELL_INSET * 2.0;

        let sprite = self
            .food_images
            .iter()
            .find(|(s, img)| *s == skin && image_ready(img))
            .map(|(_, img)| img);

        match sprite {
            Some(image) => {
                self.context
                    .draw_image_with_html_image_element_and_dw_and_dh(image, x, y, w, w)?;
            }
            None => {
                self.context.set_fill_style_str(&hex(palette.food));
                self.context.fill_rect(x + 1.0, y + 1.0, w - 2.0, w - 2.0);
                self.context.set_fill_style_str(&hex(palette.food_inner));
                self.context.fill_rect(x + 4.0, y + 4.0, w - 8.0, w - 8.0);
            }
        }
        Ok(())
    }

    fn draw_body(&self, segment: Position, cell: f64, palette: &Palette) {
        let x = segment.x as f64 * cell + CELL_INSET;
        let y = segment.y as f64 * cell + CELL_INSET;
        let w = cell - CELL_INSET * 2.0;

        self.context.set_fill_style_str(&hex(palette.body));
        self.context.fill_rect(x, y, w, w);
        self.context.set_fill_style_str(&hex(palette.body_inner));
        self.context.fill_rect(x + 2.0, y + 2.0, w - 4.0, w - 4.0);
    }

    /// Head sprite faces right; it is rotated to the travel direction.
    fn draw_head(&self, session: &Session, cell: f64, palette: &Palette) -> Result<(), JsValue> {
        let game = session.game();
        let head = game.head();
        let half = cell / 2.0;

        self.context.save();
        self.context
            .translate(head.x as f64 * cell + half, head.y as f64 * cell + half)?;
        self.context.rotate(game.direction().rotation())?;

        match self.head_image.as_ref().filter(|img| image_ready(img)) {
            Some(image) => {
                self.context.draw_image_with_html_image_element_and_dw_and_dh(
                    image, -half, -half, cell, cell,
                )?;
            }
            None => {
                self.context.set_fill_style_str(&hex(palette.head));
                self.context
                    .fill_rect(-half + 1.0, -half + 1.0, cell - 2.0, cell - 2.0);
                self.context.set_fill_style_str(&hex(palette.head_inner));
                self.context
                    .fill_rect(-half + 3.0, -half + 3.0, cell - 6.0, cell - 6.0);

                // Pixel eyes
                let eye = (cell / 6.0).floor().max(2.0);
                let pupil = (eye / 2.0).ceil();
                self.context.set_fill_style_str(&hex(palette.eye));
                self.context.fill_rect(cell * 0.1, -cell * 0.3, eye, eye);
                self.context.fill_rect(cell * 0.1, cell * 0.1, eye, eye);
                self.context.set_fill_style_str(&hex(palette.pupil));
                self.context.fill_rect(cell * 0.2, -cell * 0.28, pupil, pupil);
                self.context.fill_rect(cell * 0.2, cell * 0.12, pupil, pupil);
            }
        }

        self.context.restore();
        Ok(())
    }

    fn draw(&mut self, session: &Session) -> Result<(), JsValue> {
        self.sync_theme(session.theme())?;
        self.sync_screen(session)?;
        self.sync_score(session.game().score());

        let game = session.game();
        let palette = Palette::for_theme(session.theme());
        let size = self.canvas.width().min(self.canvas.height()) as f64;
        let cell = size / game.grid_size() as f64;

        self.draw_grid(size, cell, game.grid_size(), palette);

        if let Some(food) = game.food() {
            self.draw_food(food, cell, session.settings().food, palette)?;
        }

        // Tail first so the head ends up on top
        let body: Vec<Position> = game.snake().skip(1).collect();
        for segment in body.iter().rev() {
            self.draw_body(*segment, cell, palette);
        }
        self.draw_head(session, cell, palette)
    }
}

impl Renderer for WebRenderer {
    fn init(&mut self) -> io::Result<()> {
        self.setup_keyboard_listener().map_err(js_err)?;
        self.setup_touch_listeners().map_err(js_err)?;
        self.setup_direction_buttons().map_err(js_err)?;
        self.setup_session_buttons().map_err(js_err)?;
        self.context.set_image_smoothing_enabled(true);
        log!("input listeners attached");
        Ok(())
    }

    fn render(&mut self, session: &Session) -> io::Result<()> {
        self.draw(session).map_err(js_err)
    }

    fn cleanup(&mut self) -> io::Result<()> {
        self.detach_controls();
        self.pending_input.borrow_mut().clear();
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<Input>> {
        Ok(self.pending_input.borrow_mut().pop_front())
    }
}
