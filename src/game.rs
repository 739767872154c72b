use crate::color::FoodHue;
use crate::config::{Config, FoodAnimation};
use crate::grid::{Bounds, Cell, distance, random_free_cell};
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Movement for one tick on a grid of step `step`.
    pub fn vector(self, step: i32) -> (i32, i32) {
        match self {
            Direction::Up => (0, step),
            Direction::Down => (0, -step),
            Direction::Left => (-step, 0),
            Direction::Right => (step, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedTier {
    Slow,
    Normal,
    Fast,
    Ultra,
}

impl fmt::Display for SpeedTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpeedTier::Slow => "Slow",
            SpeedTier::Normal => "Normal",
            SpeedTier::Fast => "Fast",
            SpeedTier::Ultra => "Ultra",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathReason {
    SelfCollision,
    WallCollision,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Not running; nothing changed.
    Idle,
    Moved,
    /// Food that was sitting at `at` got eaten.
    Ate { at: Cell },
    Died(DeathReason),
}

pub struct GameState {
    pub bounds: Bounds,
    pub step: i32,
    /// Tail at the front, head at the back.
    pub snake: VecDeque<Cell>,
    pub direction: Direction,
    pub food: Cell,
    pub score: u32,
    pub high_score: u32,
    pub speed: SpeedTier,
    pub phase: Phase,
    pub food_hue: FoodHue,
    reward: u32,
    animate_food: bool,
}

fn initial_snake(step: i32) -> VecDeque<Cell> {
    (0..3).map(|i| Cell::new(0, i * step)).collect()
}

impl GameState {
    pub fn new<R: Rng>(config: &Config, rng: &mut R) -> Self {
        let bounds = Bounds::new(config.width, config.height);
        let step = config.segment_size;
        let snake = initial_snake(step);
        let food = random_free_cell(&bounds, step, &snake, rng);

        Self {
            bounds,
            step,
            snake,
            direction: Direction::Up,
            food,
            score: 0,
            high_score: 0,
            speed: config.initial_speed,
            phase: Phase::NotStarted,
            food_hue: FoodHue::default(),
            reward: config.food_reward,
            animate_food: config.food_animation == FoodAnimation::HueCycle,
        }
    }

    pub fn head(&self) -> Cell {
        *self.snake.back().expect("snake is never empty")
    }

    /// Soft reset after a game over. High score and speed survive.
    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        self.snake = initial_snake(self.step);
        self.direction = Direction::Up;
        self.score = 0;
        self.food = random_free_cell(&self.bounds, self.step, &self.snake, rng);
        self.phase = Phase::NotStarted;
        info!("game reset, high score {}", self.high_score);
    }

    /// Returns true when the game actually started.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::NotStarted {
            return false;
        }
        self.phase = Phase::Running;
        info!("game started at {} speed", self.speed);
        true
    }

    /// Returns true when the pause state flipped.
    pub fn toggle_pause(&mut self) -> bool {
        self.phase = match self.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            Phase::NotStarted | Phase::GameOver => return false,
        };
        info!("pause toggled, now {:?}", self.phase);
        true
    }

    /// Returns true when the direction changed.
    pub fn change_dir(&mut self, new_dir: Direction) -> bool {
        if self.phase != Phase::Running || new_dir == self.direction.opposite() {
            return false;
        }
        let changed = new_dir != self.direction;
        self.direction = new_dir;
        changed
    }

    pub fn set_speed(&mut self, speed: SpeedTier) {
        if speed != self.speed {
            info!("speed {} -> {}", self.speed, speed);
        }
        self.speed = speed;
    }

    /// Advances the simulation by one tick.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> StepOutcome {
        if self.phase != Phase::Running {
            return StepOutcome::Idle;
        }
        if self.animate_food {
            self.food_hue.advance();
        }

        let new_head = self.head().offset(self.direction.vector(self.step));

        // The tail still counts here even though it is about to move away.
        let death = if self.snake.contains(&new_head) {
            Some(DeathReason::SelfCollision)
        } else if !self.bounds.contains(new_head) {
            Some(DeathReason::WallCollision)
        } else {
            None
        };
        if let Some(reason) = death {
            self.game_over(reason);
            return StepOutcome::Died(reason);
        }

        self.snake.push_back(new_head);

        if distance(new_head, self.food) < self.step as f64 {
            let eaten = self.food;
            self.score += self.reward;
            self.food = random_free_cell(&self.bounds, self.step, &self.snake, rng);
            debug!(
                "ate food at ({}, {}), score {}, next food at ({}, {})",
                eaten.x, eaten.y, self.score, self.food.x, self.food.y
            );
            StepOutcome::Ate { at: eaten }
        } else {
            self.snake.pop_front();
            StepOutcome::Moved
        }
    }

    fn game_over(&mut self, reason: DeathReason) {
        if self.score > self.high_score {
            self.high_score = self.score;
        }
        self.phase = Phase::GameOver;
        info!(
            "game over ({:?}), score {}, high score {}",
            reason, self.score, self.high_score
        );
    }
}
