use crate::entity::Direction;
use crate::session::{Screen, Session};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Direction(Direction),
    /// Start a round from the menu or the game-over screen.
    Start,
    Pause,
    Resume,
    TogglePause,
    Menu,
    ToggleTheme,
    Quit,
}

/// Trait that abstracts rendering implementation.
/// This allows for different rendering backends (CLI, Web, etc.)
pub trait Renderer {
    /// Initialize the renderer
    fn init(&mut self) -> io::Result<()>;

    /// Draw the board, HUD and whichever screen the session is on
    fn render(&mut self, session: &Session) -> io::Result<()>;

    /// Clean up and restore terminal/display state
    fn cleanup(&mut self) -> io::Result<()>;

    /// Poll for input from the user
    fn poll_input(&mut self) -> io::Result<Option<Input>>;
}

/// Page-level keys that are not directions. Space only starts a round from
/// the menu or game-over screen, so it keeps activating focused buttons
/// during play.
pub fn screen_shortcut(key: &str, screen: Screen) -> Option<Input> {
    match (key, screen) {
        (" ", Screen::Menu | Screen::GameOver) => Some(Input::Start),
        ("Escape", Screen::Playing | Screen::Paused) => Some(Input::TogglePause),
        _ => None,
    }
}
