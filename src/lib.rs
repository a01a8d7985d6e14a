pub mod logger;

pub mod entity;
pub mod game;
pub mod input;
pub mod palette;
pub mod renderer;
pub mod rng;
pub mod session;
pub mod settings;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli_renderer;

#[cfg(target_arch = "wasm32")]
pub mod web_main;
#[cfg(target_arch = "wasm32")]
pub mod web_renderer;

pub use entity::{Direction, Position};
pub use game::{Collision, Game, GameState, StepEvent};
pub use input::{Controls, MIN_SWIPE_THRESHOLD};
pub use renderer::{Input, Renderer};
pub use rng::{RandomSource, SessionRng};
pub use session::{Screen, Session, TickOutcome, TimerAction};
pub use settings::{FoodSkin, Settings, Speed, Theme, GRID_SIZE};

#[cfg(not(target_arch = "wasm32"))]
pub use cli_renderer::CliRenderer;
#[cfg(target_arch = "wasm32")]
pub use web_renderer::WebRenderer;
