//! Screen flow around a [`Game`]: menu, playing, paused, game over.
//!
//! The session never owns a timer. It tells the front end what to do with
//! its tick source through [`TimerAction`], and the front end calls
//! [`Session::tick`] at the period it was given.

use crate::entity::Direction;
use crate::game::{Game, GameState, StepEvent};
use crate::log;
use crate::renderer::Input;
use crate::settings::{FoodSkin, Settings, Speed, Theme};
use std::time::Duration;

pub const DEFAULT_TITLE: &str = "Xixi Snake";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    Paused,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// (Re)install the tick source at this period.
    Start(Duration),
    Stop,
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; the tick source should not be running.
    Idle,
    Advanced(StepEvent),
    GameOver { score: u32 },
}

pub struct Session {
    game: Game,
    screen: Screen,
    settings: Settings,
    // Period chosen when the round started, reused on resume
    interval: Option<Duration>,
}

impl Session {
    pub fn new(game: Game, settings: Settings) -> Self {
        Self {
            game,
            screen: Screen::Menu,
            settings,
            interval: None,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn theme(&self) -> Theme {
        self.settings.theme
    }

    pub fn is_running(&self) -> bool {
        self.screen == Screen::Playing
    }

    pub fn tick_interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Takes effect at the next [`Session::start`]; a running round keeps its period.
    pub fn set_speed(&mut self, speed: Speed) {
        self.settings.speed = speed;
    }

    pub fn set_food(&mut self, food: FoodSkin) {
        self.settings.food = food;
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.settings.theme = theme;
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.settings.theme = self.settings.theme.toggled();
        self.settings.theme
    }

    pub fn title(&self) -> String {
        match self.screen {
            Screen::Menu => DEFAULT_TITLE.to_string(),
            _ => format!("Xixi Eats {}", self.settings.food.display_name()),
        }
    }

    pub fn final_score(&self) -> Option<u32> {
        match self.screen {
            Screen::GameOver => Some(self.game.score()),
            _ => None,
        }
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.game.set_direction(direction);
    }

    pub fn start(&mut self) -> Duration {
        let interval = self.settings.speed.tick_interval();
        self.interval = Some(interval);
        self.game.reset();
        self.screen = Screen::Playing;
        log!(
            "round started: speed={} food={} tick={}ms",
            self.settings.speed,
            self.settings.food,
            interval.as_millis()
        );
        interval
    }

    pub fn pause(&mut self) -> bool {
        if self.screen != Screen::Playing {
            return false;
        }
        self.screen = Screen::Paused;
        log!("paused at score {}", self.game.score());
        true
    }

    pub fn resume(&mut self) -> Option<Duration> {
        if self.screen != Screen::Paused {
            return None;
        }
        let fallback = self.settings.speed.tick_interval();
        let interval = *self.interval.get_or_insert(fallback);
        self.screen = Screen::Playing;
        log!("resumed");
        Some(interval)
    }

    /// Back to the start screen with a clean board.
    pub fn show_menu(&mut self) {
        self.screen = Screen::Menu;
        self.interval = None;
        self.game.reset();
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.screen != Screen::Playing {
            return TickOutcome::Idle;
        }

        let event = self.game.step();
        if !self.game.is_game_over() {
            return TickOutcome::Advanced(event);
        }

        self.screen = Screen::GameOver;
        let score = self.game.score();
        match self.game.state() {
            GameState::Won => log!("board filled, final score {}", score),
            GameState::Lost(collision) => log!("game over ({:?}), final score {}", collision, score),
            GameState::Playing => {}
        }
        TickOutcome::GameOver { score }
    }

    pub fn handle_input(&mut self, input: Input) -> TimerAction {
        match input {
            Input::Direction(direction) => {
                self.set_direction(direction);
                TimerAction::Keep
            }
            Input::Start => match self.screen {
                Screen::Menu | Screen::GameOver => TimerAction::Start(self.start()),
                _ => TimerAction::Keep,
            },
            Input::Pause => {
                if self.pause() {
                    TimerAction::Stop
                } else {
                    TimerAction::Keep
                }
            }
            Input::Resume => match self.resume() {
                Some(interval) => TimerAction::Start(interval),
                None => TimerAction::Keep,
            },
            Input::TogglePause => match self.screen {
                Screen::Playing => self.handle_input(Input::Pause),
                Screen::Paused => self.handle_input(Input::Resume),
                _ => TimerAction::Keep,
            },
            Input::Menu => {
                self.show_menu();
                TimerAction::Stop
            }
            Input::ToggleTheme => {
                let theme = self.toggle_theme();
                log!("theme set to {}", theme);
                TimerAction::Keep
            }
            Input::Quit => TimerAction::Stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Collision;

    fn session_with(speed: Speed) -> Session {
        let settings = Settings {
            speed,
            ..Settings::default()
        };
        Session::new(Game::with_seed(3), settings)
    }

    fn play_until_over(session: &mut Session) -> u32 {
        // Heading right from the centre reaches the wall well within 400 ticks
        for _ in 0..400 {
            if let TickOutcome::GameOver { score } = session.tick() {
                return score;
            }
        }
        panic!("round never ended");
    }

    #[test]
    fn test_starts_on_menu_and_idles() {
        let mut session = session_with(Speed::Normal);
        assert_eq!(session.screen(), Screen::Menu);
        assert!(!session.is_running());
        assert_eq!(session.title(), DEFAULT_TITLE);

        let head = session.game().head();
        assert_eq!(session.tick(), TickOutcome::Idle);
        assert_eq!(session.game().head(), head);
    }

    #[test]
    fn test_start_uses_selected_speed() {
        let mut session = session_with(Speed::Fast);
        assert_eq!(
            session.handle_input(Input::Start),
            TimerAction::Start(Duration::from_millis(100))
        );
        assert_eq!(session.screen(), Screen::Playing);
        assert_eq!(session.title(), "Xixi Eats Angela");
    }

    #[test]
    fn test_speed_change_waits_for_next_round() {
        let mut session = session_with(Speed::Slow);
        session.start();
        session.set_speed(Speed::Fast);
        session.pause();
        assert_eq!(session.resume(), Some(Duration::from_millis(200)));

        session.show_menu();
        assert_eq!(session.start(), Duration::from_millis(100));
    }

    #[test]
    fn test_pause_preserves_board() {
        let mut session = session_with(Speed::Normal);
        session.start();
        session.tick();
        let head = session.game().head();

        assert_eq!(session.handle_input(Input::TogglePause), TimerAction::Stop);
        assert_eq!(session.screen(), Screen::Paused);
        assert_eq!(session.tick(), TickOutcome::Idle);
        assert_eq!(session.game().head(), head);

        assert_eq!(
            session.handle_input(Input::TogglePause),
            TimerAction::Start(Duration::from_millis(150))
        );
        assert_eq!(session.screen(), Screen::Playing);
        assert!(matches!(session.tick(), TickOutcome::Advanced(_)));
    }

    #[test]
    fn test_pause_and_resume_are_idempotent() {
        let mut session = session_with(Speed::Normal);
        assert_eq!(session.handle_input(Input::Pause), TimerAction::Keep);
        assert_eq!(session.handle_input(Input::Resume), TimerAction::Keep);

        session.start();
        assert_eq!(session.handle_input(Input::Resume), TimerAction::Keep);
        assert_eq!(session.handle_input(Input::Pause), TimerAction::Stop);
        assert_eq!(session.handle_input(Input::Pause), TimerAction::Keep);
    }

    #[test]
    fn test_start_is_ignored_mid_round() {
        let mut session = session_with(Speed::Normal);
        session.start();
        session.tick();
        let head = session.game().head();
        assert_eq!(session.handle_input(Input::Start), TimerAction::Keep);
        assert_eq!(session.game().head(), head);
    }

    #[test]
    fn test_game_over_then_restart() {
        let mut session = session_with(Speed::Normal);
        session.start();
        let score = play_until_over(&mut session);

        assert_eq!(session.screen(), Screen::GameOver);
        assert_eq!(session.final_score(), Some(score));
        assert_eq!(session.game().state(), GameState::Lost(Collision::Wall));
        assert_eq!(session.tick(), TickOutcome::Idle);

        assert!(matches!(session.handle_input(Input::Start), TimerAction::Start(_)));
        assert_eq!(session.screen(), Screen::Playing);
        assert_eq!(session.game().score(), 0);
        assert_eq!(session.game().len(), 3);
    }

    #[test]
    fn test_menu_resets_board() {
        let mut session = session_with(Speed::Normal);
        session.start();
        session.set_direction(Direction::Down);
        session.tick();
        session.tick();

        assert_eq!(session.handle_input(Input::Menu), TimerAction::Stop);
        assert_eq!(session.screen(), Screen::Menu);
        assert_eq!(session.tick_interval(), None);
        assert_eq!(session.game().head().x, 10);
        assert_eq!(session.game().head().y, 10);
        assert_eq!(session.title(), DEFAULT_TITLE);
    }

    #[test]
    fn test_directions_reach_the_game() {
        let mut session = session_with(Speed::Normal);
        session.start();
        session.handle_input(Input::Direction(Direction::Up));
        assert_eq!(session.game().pending_direction(), Direction::Up);
        session.handle_input(Input::Direction(Direction::Down));
        assert_eq!(session.game().pending_direction(), Direction::Down);
        // Still heading right, so left is a reversal
        session.handle_input(Input::Direction(Direction::Left));
        assert_eq!(session.game().pending_direction(), Direction::Down);
    }

    #[test]
    fn test_theme_and_food_are_cosmetic() {
        let mut session = session_with(Speed::Normal);
        session.set_food(FoodSkin::Tangyuan);
        assert_eq!(session.handle_input(Input::ToggleTheme), TimerAction::Keep);
        assert_eq!(session.theme(), Theme::Dark);
        session.set_theme(Theme::Light);
        assert_eq!(session.theme(), Theme::Light);

        session.start();
        assert_eq!(session.title(), "Xixi Eats Tangyuan");
        assert_eq!(session.game().len(), 3);
    }

    #[test]
    fn test_quit_stops_timer() {
        let mut session = session_with(Speed::Normal);
        session.start();
        assert_eq!(session.handle_input(Input::Quit), TimerAction::Stop);
    }
}
