use crate::entity::{Direction, Position};
use crate::rng::{RandomSource, SessionRng};
use crate::settings::GRID_SIZE;
use std::collections::VecDeque;

/// Smallest grid that still fits the starting snake.
const MIN_GRID_SIZE: i32 = 4;
const INITIAL_LENGTH: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfHit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    /// Every cell is snake; nowhere left to put food.
    Won,
    Lost(Collision),
}

/// What a single call to [`Game::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    /// The game was already over; nothing changed.
    Idle,
    Moved,
    Ate,
    BoardFilled,
    Collided(Collision),
}

pub struct Game {
    grid_size: i32,
    pub(crate) snake: VecDeque<Position>,
    pub(crate) direction: Direction,
    pub(crate) next_direction: Direction,
    pub(crate) food: Option<Position>,
    pub(crate) score: u32,
    pub(crate) state: GameState,
    rng: Box<dyn RandomSource>,
}

impl Game {
    pub fn new() -> Self {
        Self::with_rng(Box::new(SessionRng::from_entropy()))
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(Box::new(SessionRng::new(seed)))
    }

    pub fn with_rng(rng: Box<dyn RandomSource>) -> Self {
        Self::with_grid_size(GRID_SIZE, rng)
    }

    pub fn with_grid_size(grid_size: i32, rng: Box<dyn RandomSource>) -> Self {
        let mut game = Self {
            grid_size: grid_size.max(MIN_GRID_SIZE),
            snake: VecDeque::new(),
            direction: Direction::Right,
            next_direction: Direction::Right,
            food: None,
            score: 0,
            state: GameState::Playing,
            rng,
        };
        game.reset();
        game
    }

    /// Puts a fresh three-cell snake in the middle of the board heading right.
    pub fn reset(&mut self) {
        let center = self.grid_size / 2;
        self.snake = (0..INITIAL_LENGTH)
            .map(|i| Position::new(center - i, center))
            .collect();
        self.direction = Direction::Right;
        self.next_direction = Direction::Right;
        self.food = None;
        self.score = 0;
        self.state = GameState::Playing;
        self.spawn_food();
    }

    /// Latches `direction` for the next step unless it would reverse the
    /// snake onto itself.
    pub fn set_direction(&mut self, direction: Direction) {
        if direction == self.direction.opposite() {
            return;
        }
        self.next_direction = direction;
    }

    pub fn step(&mut self) -> StepEvent {
        if self.state != GameState::Playing {
            return StepEvent::Idle;
        }

        self.direction = self.next_direction;
        let new_head = self.head().moved(self.direction);

        if !self.in_bounds(new_head) {
            self.state = GameState::Lost(Collision::Wall);
            return StepEvent::Collided(Collision::Wall);
        }

        // Checked against the whole body, tail included, even though the
        // tail would move away this tick.
        if self.occupies(new_head) {
            self.state = GameState::Lost(Collision::SelfHit);
            return StepEvent::Collided(Collision::SelfHit);
        }

        self.snake.push_front(new_head);

        if self.food == Some(new_head) {
            self.score += 1;
            self.spawn_food();
            if self.state == GameState::Won {
                StepEvent::BoardFilled
            } else {
                StepEvent::Ate
            }
        } else {
            self.snake.pop_back();
            StepEvent::Moved
        }
    }

    /// Places food on a uniformly chosen free cell. A full board ends the
    /// game as won and leaves no food.
    pub fn spawn_food(&mut self) {
        let mut free = Vec::with_capacity((self.grid_size * self.grid_size) as usize);
        for x in 0..self.grid_size {
            for y in 0..self.grid_size {
                let pos = Position::new(x, y);
                if !self.occupies(pos) {
                    free.push(pos);
                }
            }
        }

        if free.is_empty() {
            self.food = None;
            self.state = GameState::Won;
            return;
        }

        let index = self.rng.pick_index(free.len());
        self.food = Some(free[index]);
    }

    pub fn grid_size(&self) -> i32 {
        self.grid_size
    }

    /// Snake cells, head first.
    pub fn snake(&self) -> impl Iterator<Item = Position> + '_ {
        self.snake.iter().copied()
    }

    pub fn head(&self) -> Position {
        self.snake[0]
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.next_direction
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state != GameState::Playing
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.snake.iter().any(|&cell| cell == pos)
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.grid_size && pos.y < self.grid_size
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
