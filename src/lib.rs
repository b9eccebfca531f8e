//! gridsnake — grid snake engine, independent of any renderer.
//!
//! A [`Session`] owns one game: it advances the snake on each tick, checks
//! walls and self-bites before committing a move, places food, and keeps the
//! score and the persisted high score. Output goes to a [`GameSink`]; the
//! high score lives in a [`ScoreStore`].
//!
//! ```
//! use gridsnake::{Difficulty, Geometry, MemoryStore, Session, SessionState};
//!
//! let geometry = Geometry::new(400, 20).unwrap();
//! let mut session = Session::new(geometry, Difficulty::Easy, MemoryStore::new());
//! assert_eq!(session.start(), SessionState::Running);
//! ```

pub mod collision;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod food;
pub mod geometry;
pub mod session;
pub mod snake;
pub mod store;
pub mod ticker;

pub type GridInt = i32;
pub type Coords = (GridInt, GridInt);

pub use config::{Args, Config};
pub use difficulty::Difficulty;
pub use error::{Error, Result};
pub use geometry::Geometry;
pub use session::{DifficultyChange, Frame, GameOverSummary, GameSink, Session, SessionState, TickOutcome};
pub use snake::{Direction, Snake};
pub use store::{FileStore, MemoryStore, ScoreStore};
pub use ticker::{TickHandle, Ticker};
