use crate::game::{Direction, Game, MoveError, MoveFlags, Puzzle};
use crate::hash::Fingerprint;
use crate::levels::Levels;
use crate::solution::{Replay, replay};
use crate::store::{SolutionStore, StoreError};
use log::warn;

/// How many unsolved levels a player may browse past the solved ones.
pub const UNSOLVED_AHEAD: usize = 3;

/// A loaded level collection tied to a solution store and a quick-save store.
pub struct Session<S: SolutionStore> {
    levels: Levels,
    store: S,
    slots: S,
}

impl<S: SolutionStore> Session<S> {
    /// Wrap `levels` and look up every level's best solution in `store`.
    pub fn new(levels: Levels, store: S, slots: S) -> Result<Self, StoreError> {
        let mut session = Session {
            levels,
            store,
            slots,
        };
        session.reload_solutions()?;
        Ok(session)
    }

    /// Re-read the best solution of every level from the store.
    pub fn reload_solutions(&mut self) -> Result<(), StoreError> {
        for puzzle in self.levels.iter_mut() {
            let best = self.store.load(puzzle.fingerprint())?;
            puzzle.set_best_solution(best);
        }
        Ok(())
    }

    pub fn levels(&self) -> &Levels {
        &self.levels
    }

    pub fn get(&self, index: usize) -> Option<&Puzzle> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn comment(&self) -> Option<&str> {
        self.levels.comment()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Index of the first level without a solution, or 0 if all are solved.
    pub fn first_unsolved(&self) -> usize {
        self.levels
            .iter()
            .position(|puzzle| !puzzle.has_solution())
            .unwrap_or(0)
    }

    /// Exclusive upper bound of the levels a player may pick: everything up
    /// to the point where more than [`UNSOLVED_AHEAD`] unsolved levels have
    /// been passed.
    pub fn max_allowed(&self) -> usize {
        let mut unsolved = 0;
        for (index, puzzle) in self.levels.iter().enumerate() {
            if !puzzle.has_solution() {
                unsolved += 1;
                if unsolved > UNSOLVED_AHEAD {
                    return index;
                }
            }
        }
        self.levels.len()
    }

    /// True if level `index` is the only unsolved one.
    pub fn is_last_unsolved(&self, index: usize) -> bool {
        match self.levels.get(index) {
            Some(puzzle) if !puzzle.has_solution() => self
                .levels
                .iter()
                .enumerate()
                .all(|(i, other)| i == index || other.has_solution()),
            _ => false,
        }
    }

    /// A fresh game of level `index`.
    pub fn new_game(&self, index: usize) -> Option<Game> {
        self.levels.get(index).map(Game::new)
    }

    /// Make a move in `game`. When it solves the puzzle the history is
    /// offered to the store, and every level sharing the layout picks up
    /// the new best solution.
    pub fn apply_move(&mut self, game: &mut Game, dir: Direction) -> Result<MoveFlags, MoveError> {
        let flags = game.move_and_record(dir, &mut self.store)?;
        if flags.contains(MoveFlags::SOLVED) {
            self.refresh(game.fingerprint());
        }
        Ok(flags)
    }

    fn refresh(&mut self, fingerprint: Fingerprint) {
        let best = match self.store.load(fingerprint) {
            Ok(best) => best,
            Err(err) => {
                warn!("failed to reload solution for {}: {}", fingerprint, err);
                return;
            }
        };
        for puzzle in self
            .levels
            .iter_mut()
            .filter(|puzzle| puzzle.fingerprint() == fingerprint)
        {
            puzzle.set_best_solution(best.clone());
        }
    }

    /// Keep the moves of `game` in its quick-save slot, replacing whatever
    /// was there. A game with no moves is not saved.
    pub fn quicksave(&mut self, game: &Game) -> Result<bool, StoreError> {
        let Some(solution) = game.solution() else {
            return Ok(false);
        };
        self.slots.write(game.fingerprint(), &solution)?;
        Ok(true)
    }

    /// A game of level `index` with its quick-saved moves played back, or
    /// `None` if the level has no slot.
    pub fn quickload(&self, index: usize) -> Result<Option<(Game, Replay)>, StoreError> {
        let Some(puzzle) = self.levels.get(index) else {
            return Ok(None);
        };
        let Some(saved) = self.slots.load(puzzle.fingerprint())? else {
            return Ok(None);
        };
        let mut game = Game::new(puzzle);
        let summary = replay(&mut game, &saved);
        Ok(Some((game, summary)))
    }
}
