use crate::entity::{Direction, Position};
use crate::input::key_direction;
use crate::palette::{Palette, Rgb};
use crate::renderer::{Input, Renderer};
use crate::session::{Screen, Session};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, Write};
use std::time::{Duration, Instant};

fn color((r, g, b): Rgb) -> Color {
    Color::Rgb { r, g, b }
}

fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "^^",
        Direction::Down => "vv",
        Direction::Left => "<<",
        Direction::Right => ">>",
    }
}

/// Key name in the same vocabulary as `KeyboardEvent.key`, so the terminal
/// shares the browser's key table.
fn key_name(code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Up => Some("ArrowUp".to_string()),
        KeyCode::Down => Some("ArrowDown".to_string()),
        KeyCode::Left => Some("ArrowLeft".to_string()),
        KeyCode::Right => Some("ArrowRight".to_string()),
        KeyCode::Char(c) => Some(c.to_string()),
        _ => None,
    }
}

fn key_input(key: KeyEvent) -> Option<Input> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Input::Quit);
    }
    if let Some(direction) = key_name(key.code).as_deref().and_then(key_direction) {
        return Some(Input::Direction(direction));
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Input::Quit),
        KeyCode::Char(' ') => Some(Input::Start),
        KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('P') => Some(Input::TogglePause),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(Input::Menu),
        KeyCode::Char('t') | KeyCode::Char('T') => Some(Input::ToggleTheme),
        _ => None,
    }
}

pub struct CliRenderer {
    last_render: Instant,
    target_frame_time: Duration,
}

impl CliRenderer {
    pub fn new() -> Self {
        Self {
            last_render: Instant::now(),
            // Target 30 FPS for smooth rendering
            target_frame_time: Duration::from_millis(33),
        }
    }

    fn draw_board(&self, session: &Session, stdout: &mut io::Stdout) -> io::Result<()> {
        let game = session.game();
        let palette = Palette::for_theme(session.theme());
        let head = game.head();

        for y in 0..game.grid_size() {
            for x in 0..game.grid_size() {
                let pos = Position::new(x, y);
                if pos == head {
                    queue!(
                        stdout,
                        SetBackgroundColor(color(palette.head)),
                        SetForegroundColor(color(palette.eye)),
                        Print(head_glyph(game.direction()))
                    )?;
                } else if game.occupies(pos) {
                    queue!(
                        stdout,
                        SetBackgroundColor(color(palette.body)),
                        Print("  ")
                    )?;
                } else if game.food() == Some(pos) {
                    queue!(
                        stdout,
                        SetBackgroundColor(color(palette.food)),
                        SetForegroundColor(color(palette.food_inner)),
                        Print("()")
                    )?;
                } else {
                    queue!(
                        stdout,
                        SetBackgroundColor(color(palette.background)),
                        Print("  ")
                    )?;
                }
            }
            queue!(stdout, ResetColor, Print("\r\n"))?;
        }
        Ok(())
    }

    fn draw_info(&self, session: &Session, stdout: &mut io::Stdout) -> io::Result<()> {
        let row = session.game().grid_size() as u16;

        queue!(
            stdout,
            cursor::MoveTo(0, row + 1),
            terminal::Clear(ClearType::CurrentLine),
            ResetColor,
            Print(format!(
                "{}  Score: {}  Speed: {}",
                session.title(),
                session.game().score(),
                session.settings().speed
            ))
        )?;

        queue!(
            stdout,
            cursor::MoveTo(0, row + 2),
            terminal::Clear(ClearType::CurrentLine),
            Print("Arrows/WASD: move | Space: start | Esc: pause | M: menu | T: theme | Q: quit")
        )?;

        queue!(stdout, cursor::MoveTo(0, row + 3), terminal::Clear(ClearType::CurrentLine))?;
        match session.screen() {
            Screen::Menu => {
                queue!(
                    stdout,
                    SetForegroundColor(Color::Green),
                    Print("Press SPACE to start"),
                    ResetColor
                )?;
            }
            Screen::Paused => {
                queue!(
                    stdout,
                    SetForegroundColor(Color::Yellow),
                    Print("PAUSED - press Esc to resume"),
                    ResetColor
                )?;
            }
            Screen::GameOver => {
                queue!(
                    stdout,
                    SetForegroundColor(Color::Red),
                    Print(format!(
                        "GAME OVER! Final score: {} - press SPACE to play again",
                        session.game().score()
                    )),
                    ResetColor
                )?;
            }
            Screen::Playing => {}
        }

        Ok(())
    }
}

impl Default for CliRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for CliRenderer {
    fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide
        )?;
        Ok(())
    }

    fn render(&mut self, session: &Session) -> io::Result<()> {
        // Frame rate limiting: skip rendering if not enough time has passed
        if self.last_render.elapsed() < self.target_frame_time {
            return Ok(());
        }

        self.last_render = Instant::now();

        let mut stdout = io::stdout();

        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.draw_board(session, &mut stdout)?;
        self.draw_info(session, &mut stdout)?;

        stdout.flush()?;
        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            cursor::Show,
            terminal::LeaveAlternateScreen,
            ResetColor
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<Input>> {
        if event::poll(Duration::from_millis(10))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Release {
                    return Ok(None);
                }
                return Ok(key_input(key));
            }
        }
        Ok(None)
    }
}

impl Drop for CliRenderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_keys_share_browser_table() {
        assert_eq!(
            key_input(KeyEvent::from(KeyCode::Up)),
            Some(Input::Direction(Direction::Up))
        );
        assert_eq!(
            key_input(KeyEvent::from(KeyCode::Char('A'))),
            Some(Input::Direction(Direction::Left))
        );
        assert_eq!(
            key_input(KeyEvent::from(KeyCode::Char('s'))),
            Some(Input::Direction(Direction::Down))
        );
    }

    #[test]
    fn test_session_keys() {
        assert_eq!(key_input(KeyEvent::from(KeyCode::Char(' '))), Some(Input::Start));
        assert_eq!(key_input(KeyEvent::from(KeyCode::Esc)), Some(Input::TogglePause));
        assert_eq!(key_input(KeyEvent::from(KeyCode::Char('m'))), Some(Input::Menu));
        assert_eq!(key_input(KeyEvent::from(KeyCode::Char('t'))), Some(Input::ToggleTheme));
        assert_eq!(key_input(KeyEvent::from(KeyCode::Char('q'))), Some(Input::Quit));
        assert_eq!(
            key_input(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Input::Quit)
        );
        assert_eq!(key_input(KeyEvent::from(KeyCode::Char('x'))), None);
        assert_eq!(key_input(KeyEvent::from(KeyCode::Tab)), None);
    }
}
