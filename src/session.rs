//! One player's game: the board, the score and the tick-driven state machine.
//!
//! ```text
//!  Idle ──start──> Running <──resume/start── Paused
//!   ^                │  └──────pause/start──────^
//!   │                └──tick, terminal──> GameOver ──start──> Running
//!   └──────────────────reset (from any state)
//! ```

use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, error, info, trace};
use rand::rngs::ThreadRng;
use rand::Rng;

use crate::collision;
use crate::difficulty::Difficulty;
use crate::error::Result;
use crate::food::place_food;
use crate::geometry::Geometry;
use crate::snake::{Direction, Snake};
use crate::store::ScoreStore;
use crate::ticker::{TickHandle, Ticker};
use crate::Coords;

pub const INITIAL_SNAKE_LENGTH: usize = 3;
pub const FOOD_REWARD: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Paused,
    GameOver,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Idle => "ready",
            SessionState::Running => "running",
            SessionState::Paused => "paused",
            SessionState::GameOver => "game over",
        };
        f.write_str(s)
    }
}

/// Everything a renderer needs to redraw the board from scratch.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub geometry: &'a Geometry,
    pub snake: &'a Snake,
    pub direction: Direction,
    pub food: Option<Coords>,
    pub score: u32,
    pub high_score: u32,
    pub state: SessionState,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverSummary {
    pub score: u32,
    /// The snake filled the whole board.
    pub won: bool,
}

/// Receives the session's output.
pub trait GameSink {
    /// Called after every committed move.
    fn render(&mut self, frame: &Frame<'_>) -> Result<()>;
    /// Called once when the session enters `GameOver`.
    fn game_over(&mut self, summary: &GameOverSummary) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, or the tick came from a cancelled schedule.
    Skipped,
    Moved,
    Fed,
    GameOver(GameOverSummary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyChange {
    pub interval: Duration,
    /// The running tick schedule was replaced with one at the new interval.
    pub rearmed: bool,
}

pub struct Session<S, R = ThreadRng> {
    geometry: Geometry,
    difficulty: Difficulty,
    state: SessionState,
    snake: Snake,
    /// Direction of the last committed move.
    direction: Direction,
    /// Direction the next tick will use.
    pending: Direction,
    food: Option<Coords>,
    score: u32,
    high_score: u32,
    ticker: Ticker,
    store: S,
    rng: R,
}

impl<S: ScoreStore> Session<S, ThreadRng> {
    pub fn new(geometry: Geometry, difficulty: Difficulty, store: S) -> Self {
        Session::with_rng(geometry, difficulty, store, rand::thread_rng())
    }
}

impl<S: ScoreStore, R: Rng> Session<S, R> {
    /// Loads the high score once and lays out a fresh board in `Idle`.
    pub fn with_rng(geometry: Geometry, difficulty: Difficulty, mut store: S, rng: R) -> Self {
        let high_score = match store.load() {
            Ok(score) => score,
            Err(e) => {
                error!("Error loading high score: {}", e);
                0
            }
        };
        info!("high score loaded: {}", high_score);

        let mut session = Session {
            geometry,
            difficulty,
            state: SessionState::Idle,
            snake: Snake::new(geometry.spawn_head(), INITIAL_SNAKE_LENGTH, Direction::Right, geometry.cell_size()),
            direction: Direction::Right,
            pending: Direction::Right,
            food: None,
            score: 0,
            high_score,
            ticker: Ticker::new(),
            store,
            rng,
        };
        session.init_board();
        session
    }

    /// Start button: begins a new game from `Idle` or `GameOver`, otherwise
    /// toggles between running and paused.
    pub fn start(&mut self) -> SessionState {
        match self.state {
            SessionState::Idle | SessionState::GameOver => {
                self.init_board();
                self.state = SessionState::Running;
                self.ticker.arm(self.difficulty.interval());
                info!("game started on {} ({:?} per tick)", self.difficulty, self.difficulty.interval());
            }
            SessionState::Running => self.pause(),
            SessionState::Paused => self.resume(),
        }
        self.state
    }

    pub fn pause(&mut self) {
        if self.state != SessionState::Running {
            return;
        }
        self.ticker.cancel();
        self.state = SessionState::Paused;
        debug!("paused at score {}", self.score);
    }

    pub fn resume(&mut self) {
        if self.state != SessionState::Paused {
            return;
        }
        self.ticker.arm(self.difficulty.interval());
        self.state = SessionState::Running;
        debug!("resumed");
    }

    /// Stops any game in progress and lays out a fresh board without
    /// starting it.
    pub fn reset(&mut self) {
        self.ticker.cancel();
        self.init_board();
        self.state = SessionState::Idle;
        debug!("reset");
    }

    /// Queues a turn for the next tick. Reversals and requests outside a
    /// running game are ignored.
    pub fn set_direction(&mut self, requested: Direction) -> Direction {
        if self.state != SessionState::Running {
            return self.pending;
        }

        let next = self.direction.steer(requested);
        if next != requested {
            debug!("ignoring {:?} while moving {:?}", requested, self.direction);
        } else {
            self.pending = next;
        }
        self.pending
    }

    /// Switches speed. A running game is re-armed at the new interval right
    /// away; otherwise the interval applies the next time play starts.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> DifficultyChange {
        self.difficulty = difficulty;
        let interval = difficulty.interval();

        let rearmed = self.state == SessionState::Running;
        if rearmed {
            self.ticker.arm(interval);
        }
        debug!("difficulty set to {}", difficulty);

        DifficultyChange { interval, rearmed }
    }

    /// Runs the tick for `handle` if it belongs to the live schedule.
    pub fn fire<K: GameSink + ?Sized>(&mut self, handle: TickHandle, sink: &mut K) -> Result<TickOutcome> {
        if !self.ticker.is_current(handle) {
            trace!("dropping stale tick {:?}", handle);
            return Ok(TickOutcome::Skipped);
        }
        self.tick(sink)
    }

    /// Runs a tick if the schedule is due at `now`.
    pub fn poll_tick<K: GameSink + ?Sized>(&mut self, now: Instant, sink: &mut K) -> Result<Option<TickOutcome>> {
        match self.ticker.poll(now) {
            Some(handle) => self.fire(handle, sink).map(Some),
            None => Ok(None),
        }
    }

    /// One simulation step. Collisions are checked on the candidate move
    /// before anything is committed or drawn.
    pub fn tick<K: GameSink + ?Sized>(&mut self, sink: &mut K) -> Result<TickOutcome> {
        if self.state != SessionState::Running {
            return Ok(TickOutcome::Skipped);
        }

        let direction = self.pending;
        let candidate = self.snake.advance(direction, self.geometry.cell_size(), self.food);

        if collision::is_terminal(&candidate.snake, &self.geometry) {
            return self.finish(false, sink);
        }

        self.snake = candidate.snake;
        self.direction = direction;
        trace!("head at {:?}", self.snake.head());

        if candidate.fed {
            self.score += FOOD_REWARD;
            self.record_high_score();

            let occupied: HashSet<Coords> = self.snake.body().iter().copied().collect();
            self.food = place_food(&mut self.rng, &self.geometry, &occupied);

            if self.food.is_none() {
                // Nowhere left to put food: the board is full
                sink.render(&self.frame())?;
                return self.finish(true, sink);
            }
        }

        sink.render(&self.frame())?;

        Ok(if candidate.fed { TickOutcome::Fed } else { TickOutcome::Moved })
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            geometry: &self.geometry,
            snake: &self.snake,
            direction: self.direction,
            food: self.food,
            score: self.score,
            high_score: self.high_score,
            state: self.state,
            difficulty: self.difficulty,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Coords> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Direction the next tick will move in.
    pub fn direction(&self) -> Direction {
        self.pending
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Time until the next tick is due, `None` when nothing is scheduled.
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.ticker.time_until_due(now)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    ///////////////////////////////////////////////////////////////////////////

    fn init_board(&mut self) {
        let step = self.geometry.cell_size();
        self.snake = Snake::new(self.geometry.spawn_head(), INITIAL_SNAKE_LENGTH, Direction::Right, step);
        self.direction = Direction::Right;
        self.pending = Direction::Right;
        self.score = 0;

        let occupied: HashSet<Coords> = self.snake.body().iter().copied().collect();
        self.food = place_food(&mut self.rng, &self.geometry, &occupied);
    }

    fn record_high_score(&mut self) {
        if self.score <= self.high_score {
            return;
        }

        self.high_score = self.score;
        info!("new high score: {}", self.high_score);
        if let Err(e) = self.store.save(self.high_score) {
            error!("Error saving high score: {}", e);
        }
    }

    fn finish<K: GameSink + ?Sized>(&mut self, won: bool, sink: &mut K) -> Result<TickOutcome> {
        self.ticker.cancel();
        self.state = SessionState::GameOver;

        let summary = GameOverSummary { score: self.score, won };
        info!("game over (won: {}), score {}", won, self.score);
        sink.game_over(&summary)?;

        Ok(TickOutcome::GameOver(summary))
    }
}
