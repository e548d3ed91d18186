//! A small Sokoban engine: an XSB level reader, a move engine with undo,
//! solution playback and a store that keeps the best solution per layout.

mod export;
mod field;
mod game;
mod hash;
mod levels;
mod session;
mod solution;
mod store;

pub use export::LevelText;
pub use field::{Cell, FIELD_SIZE, Field, MAX_DIMENSION, Position};
pub use game::{ALL_DIRECTIONS, Direction, Game, HISTORY_CAPACITY, MoveError, MoveFlags, Puzzle};
pub use hash::Fingerprint;
pub use levels::{LevelError, Levels, ParseOptions};
pub use session::{Session, UNSOLVED_AHEAD};
pub use solution::{Playback, Replay, Score, Solution, SolutionError, is_legal_solution, replay};
pub use store::{FsStore, MemoryStore, SolutionStore, StoreError};
