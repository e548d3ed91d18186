use crate::game::{Direction, Game, MoveError, MoveFlags};
use std::fmt;
use std::str::FromStr;

/// Error returned when a string is not a valid move sequence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolutionError {
    #[error("solution is empty")]
    Empty,
    #[error("invalid move '{ch}' at position {index}")]
    InvalidMove { ch: char, index: usize },
}

/// Returns true if `s` is a non-empty string of move letters (`udlr`, any case).
pub fn is_legal_solution(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| Direction::from_letter(c).is_some())
}

/// Moves and pushes of a move sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score {
    pub moves: usize,
    pub pushes: usize,
}

impl Score {
    pub fn of(history: &str) -> Self {
        Score {
            moves: history.len(),
            pushes: history.chars().filter(char::is_ascii_uppercase).count(),
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.moves, self.pushes)
    }
}

/// A validated move sequence. Lowercase letters are steps, uppercase are pushes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Solution(String);

impl Solution {
    pub fn parse(s: &str) -> Result<Self, SolutionError> {
        if s.is_empty() {
            return Err(SolutionError::Empty);
        }
        if let Some((index, ch)) = s
            .chars()
            .enumerate()
            .find(|(_, c)| Direction::from_letter(*c).is_none())
        {
            return Err(SolutionError::InvalidMove { ch, index });
        }
        Ok(Solution(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn moves(&self) -> usize {
        self.0.len()
    }

    pub fn pushes(&self) -> usize {
        self.score().pushes
    }

    pub fn score(&self) -> Score {
        Score::of(&self.0)
    }

    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.0.chars().filter_map(Direction::from_letter)
    }
}

impl FromStr for Solution {
    type Err = SolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Solution::parse(s)
    }
}

impl AsRef<str> for Solution {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Step-by-step playback of a solution, one move per tick.
///
/// The letter case in the source is ignored: the engine decides whether a
/// move is a push. Rejected moves are reported and playback carries on with
/// the next letter. Playback finishes at the end of the source or as soon as
/// a move solves the puzzle.
#[derive(Debug, Clone)]
pub struct Playback {
    source: Solution,
    cursor: usize,
    finished: bool,
}

impl Playback {
    pub fn new(source: Solution) -> Self {
        Playback {
            source,
            cursor: 0,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of letters consumed so far.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn source(&self) -> &Solution {
        &self.source
    }

    /// Feed the next letter to `game`. Returns `None` once playback is over.
    pub fn tick(&mut self, game: &mut Game) -> Option<Result<MoveFlags, MoveError>> {
        self.tick_with(|dir| game.move_player(dir, false))
    }

    /// Like [`Playback::tick`], but hands the direction to `apply`, so a
    /// driver can route the move through its own bookkeeping.
    pub fn tick_with<F>(&mut self, apply: F) -> Option<Result<MoveFlags, MoveError>>
    where
        F: FnOnce(Direction) -> Result<MoveFlags, MoveError>,
    {
        if self.finished {
            return None;
        }
        let letter = self.source.as_str().as_bytes().get(self.cursor).copied();
        let Some(dir) = letter.and_then(|b| Direction::from_letter(b as char)) else {
            self.finished = true;
            return None;
        };
        self.cursor += 1;

        let result = apply(dir);
        let solved = matches!(result, Ok(flags) if flags.contains(MoveFlags::SOLVED));
        if solved || self.cursor >= self.source.moves() {
            self.finished = true;
        }
        Some(result)
    }
}

/// Summary of an instant replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replay {
    pub applied: usize,
    pub rejected: usize,
    pub solved: bool,
}

/// Play back all of `solution` on `game` at once.
pub fn replay(game: &mut Game, solution: &Solution) -> Replay {
    let mut playback = Playback::new(solution.clone());
    let mut summary = Replay {
        applied: 0,
        rejected: 0,
        solved: false,
    };
    while let Some(result) = playback.tick(game) {
        match result {
            Ok(flags) => {
                summary.applied += 1;
                summary.solved |= flags.contains(MoveFlags::SOLVED);
            }
            Err(_) => summary.rejected += 1,
        }
    }
    summary
}
