//! Turns raw key presses, swipes and on-screen direction buttons into
//! [`Direction`]s.
//!
//! The DOM listeners live in the web renderer; this module holds the mapping
//! so the same rules are shared by every front end and can be tested without
//! a browser.

use crate::entity::Direction;

/// Shorter gestures are treated as taps or jitter.
pub const MIN_SWIPE_THRESHOLD: f64 = 20.0;

/// Maps a DOM `KeyboardEvent.key` value to a direction.
pub fn key_direction(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" | "w" | "W" => Some(Direction::Up),
        "ArrowDown" | "s" | "S" => Some(Direction::Down),
        "ArrowLeft" | "a" | "A" => Some(Direction::Left),
        "ArrowRight" | "d" | "D" => Some(Direction::Right),
        _ => None,
    }
}

/// Classifies a gesture displacement. The larger axis wins; ties go vertical.
pub fn swipe_direction(dx: f64, dy: f64) -> Option<Direction> {
    let abs_dx = dx.abs();
    let abs_dy = dy.abs();

    if abs_dx < MIN_SWIPE_THRESHOLD && abs_dy < MIN_SWIPE_THRESHOLD {
        return None;
    }

    if abs_dx > abs_dy {
        if dx > 0.0 {
            Some(Direction::Right)
        } else {
            Some(Direction::Left)
        }
    } else if dy > 0.0 {
        Some(Direction::Down)
    } else {
        Some(Direction::Up)
    }
}

type DirectionCallback = Box<dyn FnMut(Direction)>;

/// Single funnel for every input modality.
#[derive(Default)]
pub struct Controls {
    callback: Option<DirectionCallback>,
    touch_start: Option<(f64, f64)>,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_direction<F>(&mut self, callback: F)
    where
        F: FnMut(Direction) + 'static,
    {
        self.callback = Some(Box::new(callback));
    }

    /// Drops the callback. Listeners may keep calling in; nothing reaches the game.
    pub fn detach(&mut self) {
        self.callback = None;
    }

    pub fn is_attached(&self) -> bool {
        self.callback.is_some()
    }

    /// Returns true when the key was recognised, so the caller can suppress
    /// the browser's default action.
    pub fn handle_key(&mut self, key: &str) -> bool {
        match key_direction(key) {
            Some(direction) => {
                self.emit(direction);
                true
            }
            None => false,
        }
    }

    pub fn touch_start(&mut self, x: f64, y: f64) {
        self.touch_start = Some((x, y));
    }

    pub fn touch_end(&mut self, x: f64, y: f64) -> Option<Direction> {
        let (start_x, start_y) = self.touch_start.take()?;
        let direction = swipe_direction(x - start_x, y - start_y)?;
        self.emit(direction);
        Some(direction)
    }

    pub fn touch_cancel(&mut self) {
        self.touch_start = None;
    }

    /// Handles a d-pad button identified by its `data-dir` value.
    pub fn press_button(&mut self, id: &str) -> Option<Direction> {
        let direction = id.parse::<Direction>().ok()?;
        self.emit(direction);
        Some(direction)
    }

    pub fn emit(&mut self, direction: Direction) {
        if let Some(callback) = self.callback.as_mut() {
            callback(direction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_controls() -> (Controls, Rc<RefCell<Vec<Direction>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut controls = Controls::new();
        controls.on_direction(move |d| sink.borrow_mut().push(d));
        (controls, seen)
    }

    #[test]
    fn test_arrow_and_wasd_keys() {
        let cases = [
            ("ArrowUp", Direction::Up),
            ("ArrowDown", Direction::Down),
            ("ArrowLeft", Direction::Left),
            ("ArrowRight", Direction::Right),
            ("w", Direction::Up),
            ("W", Direction::Up),
            ("a", Direction::Left),
            ("A", Direction::Left),
            ("s", Direction::Down),
            ("S", Direction::Down),
            ("d", Direction::Right),
            ("D", Direction::Right),
        ];
        for (key, expected) in cases {
            assert_eq!(key_direction(key), Some(expected), "key {}", key);
        }
    }

    #[test]
    fn test_unmapped_keys_are_not_consumed() {
        let (mut controls, seen) = recording_controls();
        assert!(!controls.handle_key("q"));
        assert!(!controls.handle_key(" "));
        assert!(!controls.handle_key("Escape"));
        assert!(seen.borrow().is_empty());

        assert!(controls.handle_key("ArrowLeft"));
        assert_eq!(*seen.borrow(), vec![Direction::Left]);
    }

    #[test]
    fn test_swipe_up() {
        let (mut controls, seen) = recording_controls();
        controls.touch_start(100.0, 100.0);
        assert_eq!(controls.touch_end(100.0, 50.0), Some(Direction::Up));
        assert_eq!(*seen.borrow(), vec![Direction::Up]);
    }

    #[test]
    fn test_short_swipe_is_discarded() {
        let (mut controls, seen) = recording_controls();
        controls.touch_start(100.0, 100.0);
        assert_eq!(controls.touch_end(105.0, 103.0), None);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_swipe_axes() {
        assert_eq!(swipe_direction(40.0, 10.0), Some(Direction::Right));
        assert_eq!(swipe_direction(-40.0, 10.0), Some(Direction::Left));
        assert_eq!(swipe_direction(5.0, 30.0), Some(Direction::Down));
        assert_eq!(swipe_direction(5.0, -30.0), Some(Direction::Up));
        // Exactly at the threshold counts
        assert_eq!(swipe_direction(20.0, 0.0), Some(Direction::Right));
        assert_eq!(swipe_direction(19.9, -19.9), None);
    }

    #[test]
    fn test_diagonal_tie_goes_vertical() {
        assert_eq!(swipe_direction(30.0, 30.0), Some(Direction::Down));
        assert_eq!(swipe_direction(-30.0, -30.0), Some(Direction::Up));
    }

    #[test]
    fn test_touch_end_without_start_is_ignored() {
        let (mut controls, seen) = recording_controls();
        assert_eq!(controls.touch_end(300.0, 0.0), None);

        controls.touch_start(0.0, 0.0);
        controls.touch_cancel();
        assert_eq!(controls.touch_end(300.0, 0.0), None);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_touch_start_is_consumed_once() {
        let (mut controls, seen) = recording_controls();
        controls.touch_start(0.0, 0.0);
        controls.touch_end(50.0, 0.0);
        assert_eq!(controls.touch_end(100.0, 0.0), None);
        assert_eq!(*seen.borrow(), vec![Direction::Right]);
    }

    #[test]
    fn test_buttons() {
        let (mut controls, seen) = recording_controls();
        assert_eq!(controls.press_button("down"), Some(Direction::Down));
        assert_eq!(controls.press_button("left"), Some(Direction::Left));
        assert_eq!(controls.press_button("sideways"), None);
        assert_eq!(*seen.borrow(), vec![Direction::Down, Direction::Left]);
    }

    #[test]
    fn test_detach_silences_every_path() {
        let (mut controls, seen) = recording_controls();
        controls.detach();
        assert!(!controls.is_attached());

        // Still recognised, so the browser default is still suppressed
        assert!(controls.handle_key("ArrowUp"));
        controls.touch_start(0.0, 0.0);
        controls.touch_end(0.0, 100.0);
        controls.press_button("left");
        controls.emit(Direction::Right);

        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_new_callback_replaces_old() {
        let (mut controls, first) = recording_controls();
        let second = Rc::new(RefCell::new(Vec::new()));
        let sink = second.clone();
        controls.on_direction(move |d| sink.borrow_mut().push(d));

        controls.emit(Direction::Up);

        assert!(first.borrow().is_empty());
        assert_eq!(*second.borrow(), vec![Direction::Up]);
    }

    proptest! {
        #[test]
        fn prop_swipe_follows_dominant_axis(
            dx in -500.0f64..500.0,
            dy in -500.0f64..500.0,
        ) {
            match swipe_direction(dx, dy) {
                None => {
                    prop_assert!(dx.abs() < MIN_SWIPE_THRESHOLD);
                    prop_assert!(dy.abs() < MIN_SWIPE_THRESHOLD);
                }
                Some(Direction::Left) | Some(Direction::Right) => {
                    prop_assert!(dx.abs() > dy.abs());
                }
                Some(Direction::Up) | Some(Direction::Down) => {
                    prop_assert!(dy.abs() >= dx.abs());
                }
            }
        }
    }
}
