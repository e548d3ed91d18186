use crate::export;
use crate::field::{Cell, Field, MAX_DIMENSION, Position};
use crate::hash::Fingerprint;
use crate::levels::{LevelError, Levels};
use crate::solution::{Score, Solution};
use crate::store::SolutionStore;
use arrayvec::ArrayString;
use log::{info, warn};
use std::fmt;

/// Maximum number of moves a game records.
pub const HISTORY_CAPACITY: usize = 4095;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Right,
    Direction::Down,
    Direction::Left,
];

impl Direction {
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// Facing angle in degrees, clockwise from up.
    pub fn angle(self) -> u16 {
        match self {
            Direction::Up => 0,
            Direction::Right => 90,
            Direction::Down => 180,
            Direction::Left => 270,
        }
    }

    /// History letter for a plain step.
    pub fn letter(self) -> char {
        match self {
            Direction::Up => 'u',
            Direction::Right => 'r',
            Direction::Down => 'd',
            Direction::Left => 'l',
        }
    }

    /// History letter for a push.
    pub fn push_letter(self) -> char {
        self.letter().to_ascii_uppercase()
    }

    /// Parse a move letter of either case.
    pub fn from_letter(letter: char) -> Option<Direction> {
        match letter {
            'u' | 'U' => Some(Direction::Up),
            'r' | 'R' => Some(Direction::Right),
            'd' | 'D' => Some(Direction::Down),
            'l' | 'L' => Some(Direction::Left),
            _ => None,
        }
    }

    /// The opposite direction, used to step back on undo.
    pub fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "Up"),
            Direction::Right => write!(f, "Right"),
            Direction::Down => write!(f, "Down"),
            Direction::Left => write!(f, "Left"),
        }
    }
}

/// Bitfield describing what a successful move did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MoveFlags(u8);

impl MoveFlags {
    /// The move pushed an atom.
    pub const PUSHED: MoveFlags = MoveFlags(1);
    /// The pushed atom landed on a goal.
    pub const ON_GOAL: MoveFlags = MoveFlags(2);
    /// The move solved the puzzle.
    pub const SOLVED: MoveFlags = MoveFlags(4);

    pub const fn empty() -> Self {
        MoveFlags(0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: MoveFlags) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn insert(&mut self, other: MoveFlags) {
        self.0 |= other.0;
    }
}

impl std::ops::BitOr for MoveFlags {
    type Output = MoveFlags;

    fn bitor(self, rhs: MoveFlags) -> MoveFlags {
        MoveFlags(self.0 | rhs.0)
    }
}

/// Why a move was refused. A refused move never changes the game, apart
/// from the facing angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("move would leave the field")]
    OutOfBounds,
    #[error("a wall is in the way")]
    Wall,
    #[error("the atom is blocked")]
    Blocked,
    #[error("the puzzle is already solved")]
    AlreadySolved,
    #[error("the move history is full")]
    HistoryFull,
}

/// An immutable parsed puzzle, used as the template for new games.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    field: Field,
    width: u8,
    height: u8,
    player: Position,
    level: usize,
    fingerprint: Fingerprint,
    best_solution: Option<Solution>,
}

impl Puzzle {
    pub(crate) fn new(field: Field, width: u8, height: u8, player: Position) -> Self {
        let fingerprint = Fingerprint::of_field(&field, width as usize, height as usize);
        Puzzle {
            field,
            width,
            height,
            player,
            level: 1,
            fingerprint,
            best_solution: None,
        }
    }

    /// Parse the first level of an XSB text.
    pub fn from_text(text: &str) -> Result<Self, LevelError> {
        Levels::from_text(text)?
            .into_iter()
            .next()
            .ok_or(LevelError::Empty)
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn height(&self) -> usize {
        self.height as usize
    }

    pub fn player(&self) -> Position {
        self.player
    }

    /// 1-based ordinal of the level in its file.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    pub fn best_solution(&self) -> Option<&Solution> {
        self.best_solution.as_ref()
    }

    pub fn best_score(&self) -> Option<Score> {
        self.best_solution.as_ref().map(Solution::score)
    }

    /// True if a best solution is known for this layout.
    pub fn has_solution(&self) -> bool {
        self.best_solution.is_some()
    }

    pub(crate) fn set_level(&mut self, level: usize) {
        self.level = level;
    }

    pub(crate) fn set_best_solution(&mut self, solution: Option<Solution>) {
        self.best_solution = solution;
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        export::write_board(f, &self.field, self.width(), self.height(), self.player)
    }
}

/// The position `steps` cells away from `pos` in `dir`, or `None` when it
/// falls outside the playable part of the canvas.
fn offset(pos: Position, dir: Direction, steps: i16) -> Option<Position> {
    let (dx, dy) = dir.delta();
    let x = pos.0 as i16 + dx as i16 * steps;
    let y = pos.1 as i16 + dy as i16 * steps;
    let bounds = 0..=MAX_DIMENSION as i16;
    (bounds.contains(&x) && bounds.contains(&y)).then(|| (x as u8, y as u8))
}

/// A game in progress: a mutable copy of a puzzle plus its move history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    field: Field,
    player: Position,
    width: u8,
    height: u8,
    fingerprint: Fingerprint,
    angle: u16,
    history: ArrayString<HISTORY_CAPACITY>,
}

impl Game {
    pub fn new(puzzle: &Puzzle) -> Self {
        Game {
            field: puzzle.field.clone(),
            player: puzzle.player,
            width: puzzle.width,
            height: puzzle.height,
            fingerprint: puzzle.fingerprint,
            angle: 0,
            history: ArrayString::new(),
        }
    }

    /// Start over from `puzzle` with an empty history.
    pub fn reset(&mut self, puzzle: &Puzzle) {
        *self = Game::new(puzzle);
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn height(&self) -> usize {
        self.height as usize
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Facing angle of the player, for rendering.
    pub fn angle(&self) -> u16 {
        self.angle
    }

    /// Moves made since the last reset, one letter per move.
    pub fn history(&self) -> &str {
        self.history.as_str()
    }

    pub fn score(&self) -> Score {
        Score::of(self.history())
    }

    /// The history as a solution, if any move has been made.
    pub fn solution(&self) -> Option<Solution> {
        Solution::parse(self.history()).ok()
    }

    /// True if every goal carries an atom.
    pub fn is_solved(&self) -> bool {
        self.field
            .rows(self.width(), self.height())
            .flatten()
            .all(|cell| !cell.is_goal() || cell.has_atom())
    }

    /// Try to move the player one cell in `dir`.
    ///
    /// The facing angle follows `dir` even when the move is refused. With
    /// `dry_run` set the move is only evaluated: the returned flags are the
    /// ones a real move would produce, but the game is left untouched.
    pub fn move_player(&mut self, dir: Direction, dry_run: bool) -> Result<MoveFlags, MoveError> {
        self.angle = dir.angle();

        if self.is_solved() {
            return Err(MoveError::AlreadySolved);
        }

        let target = offset(self.player, dir, 1).ok_or(MoveError::OutOfBounds)?;
        let target_cell = self.field.at(target);
        if target_cell.is_wall() {
            return Err(MoveError::Wall);
        }

        let mut flags = MoveFlags::empty();
        let mut push_to = None;
        if target_cell.has_atom() {
            let beyond = offset(self.player, dir, 2).ok_or(MoveError::OutOfBounds)?;
            let beyond_cell = self.field.at(beyond);
            if beyond_cell.intersects(Cell::WALL | Cell::ATOM) {
                return Err(MoveError::Blocked);
            }
            flags.insert(MoveFlags::PUSHED);
            if beyond_cell.is_goal() {
                flags.insert(MoveFlags::ON_GOAL);
            }
            push_to = Some(beyond);
        }

        if !dry_run && self.history.len() >= HISTORY_CAPACITY {
            return Err(MoveError::HistoryFull);
        }

        if let Some(beyond) = push_to {
            self.field.cell_mut(target).remove(Cell::ATOM);
            self.field.cell_mut(beyond).insert(Cell::ATOM);
        }
        if self.is_solved() {
            flags.insert(MoveFlags::SOLVED);
        }

        if dry_run {
            if let Some(beyond) = push_to {
                self.field.cell_mut(beyond).remove(Cell::ATOM);
                self.field.cell_mut(target).insert(Cell::ATOM);
            }
        } else {
            let letter = if push_to.is_some() {
                dir.push_letter()
            } else {
                dir.letter()
            };
            self.history.push(letter);
            self.player = target;
        }

        Ok(flags)
    }

    /// Make a move and, when it solves the puzzle, offer the history to
    /// `store` under this game's fingerprint. Store failures are logged and
    /// do not undo the move.
    pub fn move_and_record(
        &mut self,
        dir: Direction,
        store: &mut impl SolutionStore,
    ) -> Result<MoveFlags, MoveError> {
        let flags = self.move_player(dir, false)?;
        if flags.contains(MoveFlags::SOLVED) {
            info!("solved {} ({} moves/pushes)", self.fingerprint, self.score());
            if let Err(err) = store.save(self.fingerprint, self.history()) {
                warn!("failed to save solution for {}: {}", self.fingerprint, err);
            }
        }
        Ok(flags)
    }

    /// Take back the last recorded move. Returns false if there was none.
    pub fn undo(&mut self) -> bool {
        let Some(letter) = self.history.pop() else {
            return false;
        };
        let dir = match Direction::from_letter(letter) {
            Some(dir) => dir,
            None => unreachable!("history holds only move letters"),
        };
        self.angle = dir.angle();

        let (dx, dy) = dir.delta();
        let (x, y) = self.player;
        if letter.is_ascii_uppercase() {
            let atom = ((x as i8 + dx) as u8, (y as i8 + dy) as u8);
            self.field.cell_mut(atom).remove(Cell::ATOM);
            self.field.cell_mut(self.player).insert(Cell::ATOM);
        }
        let (bx, by) = dir.reverse().delta();
        self.player = ((x as i8 + bx) as u8, (y as i8 + by) as u8);
        true
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        export::write_board(f, &self.field, self.width(), self.height(), self.player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    const SAMPLE: &str = "####\n\
                          # .#\n\
                          #  ###\n\
                          #*@  #\n\
                          #  $ #\n\
                          #  ###\n\
                          ####";

    fn atoms(field: &Field) -> usize {
        field
            .rows(MAX_DIMENSION, MAX_DIMENSION)
            .flatten()
            .filter(|cell| cell.has_atom())
            .count()
    }

    fn cells_with(field: &Field, bit: Cell) -> Vec<(usize, usize)> {
        let mut found = Vec::new();
        for (y, row) in field.rows(MAX_DIMENSION, MAX_DIMENSION).enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if cell.contains(bit) {
                    found.push((x, y));
                }
            }
        }
        found
    }

    #[test]
    fn test_direction_letters() {
        for dir in ALL_DIRECTIONS {
            assert_eq!(Direction::from_letter(dir.letter()), Some(dir));
            assert_eq!(Direction::from_letter(dir.push_letter()), Some(dir));
            assert_eq!(dir.reverse().reverse(), dir);
        }
        assert_eq!(Direction::from_letter('x'), None);
        assert_eq!(Direction::Left.angle(), 270);
        assert_eq!(Direction::Down.push_letter(), 'D');
    }

    #[test]
    fn test_step() {
        let puzzle = Puzzle::from_text(SAMPLE).unwrap();
        let mut game = Game::new(&puzzle);

        let flags = game.move_player(Direction::Right, false).unwrap();

        assert!(flags.is_empty());
        assert_eq!(game.player(), (3, 3));
        assert_eq!(game.history(), "r");
        assert_eq!(game.angle(), 90);
        assert_eq!(game.field(), puzzle.field());
    }

    #[rstest]
    #[case(Direction::Right, "####\n#@$ #\n# . #\n####", (2, 1), (3, 1))]
    #[case(Direction::Down, "#####\n# @ #\n# $ #\n# . #\n#####", (2, 2), (2, 3))]
    #[case(Direction::Left, "####\n# $@#\n# . #\n####", (2, 1), (1, 1))]
    #[case(Direction::Up, "#####\n# . #\n# $ #\n# @ #\n#####", (2, 2), (2, 1))]
    fn test_push_all_directions(
        #[case] dir: Direction,
        #[case] input: &str,
        #[case] player: Position,
        #[case] atom: Position,
    ) {
        let puzzle = Puzzle::from_text(input).unwrap();
        let mut game = Game::new(&puzzle);

        let flags = game.move_player(dir, false).unwrap();

        assert!(flags.contains(MoveFlags::PUSHED));
        assert_eq!(game.player(), player);
        assert!(game.field().at(atom).has_atom());
        assert!(!game.field().at(player).has_atom());
        assert_eq!(game.history(), dir.push_letter().to_string());

        assert!(game.undo());
        assert_eq!(game.field(), puzzle.field(), "Failed for {:?}", dir);
        assert_eq!(game.player(), puzzle.player(), "Failed for {:?}", dir);
        assert_eq!(game.history(), "");
    }

    #[test]
    fn test_push_floor_to_goal() {
        let puzzle = Puzzle::from_text("#####\n#@$.#\n#####").unwrap();
        let mut game = Game::new(&puzzle);

        let flags = game.move_player(Direction::Right, false).unwrap();

        assert_eq!(
            flags,
            MoveFlags::PUSHED | MoveFlags::ON_GOAL | MoveFlags::SOLVED
        );
        assert_eq!(game.field().get(3, 1), Cell::FLOOR | Cell::ATOM | Cell::GOAL);
        assert_eq!(game.field().get(2, 1), Cell::FLOOR);
        assert!(game.is_solved());
    }

    #[test]
    fn test_push_goal_to_goal() {
        let puzzle = Puzzle::from_text("######\n#@*. #\n######").unwrap();
        let mut game = Game::new(&puzzle);
        assert!(!game.is_solved());

        let flags = game.move_player(Direction::Right, false).unwrap();
        assert_eq!(flags, MoveFlags::PUSHED | MoveFlags::ON_GOAL);
        assert!(!game.is_solved());

        // Undo moves the atom back onto the first goal
        assert!(game.undo());
        assert_eq!(game.field().get(2, 1), Cell::FLOOR | Cell::ATOM | Cell::GOAL);
        assert_eq!(game.field().get(3, 1), Cell::FLOOR | Cell::GOAL);
    }

    #[test]
    fn test_push_blocked() {
        let puzzle = Puzzle::from_text("#####\n#@$##\n# . #\n#####").unwrap();
        let mut game = Game::new(&puzzle);

        assert_eq!(
            game.move_player(Direction::Right, false),
            Err(MoveError::Blocked)
        );
        assert_eq!(game.field(), puzzle.field());
        assert_eq!(game.player(), puzzle.player());
        assert_eq!(game.history(), "");
    }

    #[test]
    fn test_push_into_another_atom() {
        let puzzle = Puzzle::from_text("#######\n#@$$  #\n# ..  #\n#######").unwrap();
        let mut game = Game::new(&puzzle);

        assert_eq!(
            game.move_player(Direction::Right, false),
            Err(MoveError::Blocked)
        );
        assert_eq!(game.field(), puzzle.field());
    }

    #[test]
    fn test_wall_rejected_but_facing_changes() {
        let puzzle = Puzzle::from_text("#####\n#@$.#\n#####").unwrap();
        let mut game = Game::new(&puzzle);

        assert_eq!(game.move_player(Direction::Up, false), Err(MoveError::Wall));
        assert_eq!(game.angle(), 0);
        assert_eq!(game.move_player(Direction::Left, false), Err(MoveError::Wall));
        assert_eq!(game.angle(), 270);
        assert_eq!(game.player(), (1, 1));
        assert_eq!(game.history(), "");
    }

    #[test]
    fn test_out_of_bounds() {
        let puzzle = Puzzle::from_text("@.").unwrap();
        let mut game = Game::new(&puzzle);

        assert_eq!(
            game.move_player(Direction::Up, false),
            Err(MoveError::OutOfBounds)
        );
        assert_eq!(
            game.move_player(Direction::Left, false),
            Err(MoveError::OutOfBounds)
        );
        assert_eq!(game.angle(), 270);
        assert_eq!(game.player(), (0, 0));
    }

    #[test]
    fn test_dry_run_leaves_game_untouched() {
        let puzzle = Puzzle::from_text("#####\n#@$.#\n#####").unwrap();
        let mut game = Game::new(&puzzle);

        let flags = game.move_player(Direction::Right, true).unwrap();

        assert_eq!(
            flags,
            MoveFlags::PUSHED | MoveFlags::ON_GOAL | MoveFlags::SOLVED
        );
        assert_eq!(game.field(), puzzle.field());
        assert_eq!(game.player(), puzzle.player());
        assert_eq!(game.history(), "");
        assert!(!game.is_solved());
    }

    #[test]
    fn test_no_moves_after_solved() {
        let puzzle = Puzzle::from_text("######\n#@$. #\n######").unwrap();
        let mut game = Game::new(&puzzle);
        game.move_player(Direction::Right, false).unwrap();
        assert!(game.is_solved());

        assert_eq!(
            game.move_player(Direction::Left, false),
            Err(MoveError::AlreadySolved)
        );
        assert_eq!(
            game.move_player(Direction::Right, false),
            Err(MoveError::AlreadySolved)
        );
        assert_eq!(game.history(), "R");

        assert!(game.undo());
        assert!(!game.is_solved());
        assert!(game.move_player(Direction::Left, true).is_err());
        assert!(game.move_player(Direction::Right, true).is_ok());
    }

    #[test]
    fn test_on_goal_without_solving() {
        let puzzle = Puzzle::from_text("#######\n#@$ ..#\n#  $  #\n#######").unwrap();
        let mut game = Game::new(&puzzle);

        let flags = game.move_player(Direction::Right, false).unwrap();
        assert_eq!(flags, MoveFlags::PUSHED);
        let flags = game.move_player(Direction::Right, false).unwrap();
        assert_eq!(flags, MoveFlags::PUSHED | MoveFlags::ON_GOAL);
        assert!(!game.is_solved());
    }

    #[test]
    fn test_undo_on_empty_history() {
        let puzzle = Puzzle::from_text(SAMPLE).unwrap();
        let mut game = Game::new(&puzzle);
        assert!(!game.undo());
        assert_eq!(game, Game::new(&puzzle));
    }

    #[test]
    fn test_undo_sets_facing() {
        let puzzle = Puzzle::from_text(SAMPLE).unwrap();
        let mut game = Game::new(&puzzle);
        game.move_player(Direction::Down, false).unwrap();
        game.move_player(Direction::Right, false).unwrap();
        assert!(game.undo());
        assert_eq!(game.angle(), 90);
        assert_eq!(game.history(), "d");
    }

    #[test]
    fn test_history_capacity() {
        let puzzle = Puzzle::from_text("######\n#@ $.#\n######").unwrap();
        let mut game = Game::new(&puzzle);

        for i in 0..HISTORY_CAPACITY {
            let dir = if i % 2 == 0 {
                Direction::Right
            } else {
                Direction::Left
            };
            assert!(game.move_player(dir, false).is_ok(), "move {} failed", i + 1);
        }
        assert_eq!(game.history().len(), HISTORY_CAPACITY);
        assert_eq!(game.player(), (2, 1));

        let before = game.clone();
        assert_eq!(
            game.move_player(Direction::Left, false),
            Err(MoveError::HistoryFull)
        );
        assert_eq!(game.player(), before.player());
        assert_eq!(game.history(), before.history());
        // Evaluating a move is still possible
        assert!(game.move_player(Direction::Left, true).is_ok());

        assert!(game.undo());
        assert!(game.move_player(Direction::Right, false).is_ok());
    }

    #[test]
    fn test_move_and_record() {
        let puzzle = Puzzle::from_text("#######\n#@ $ .#\n#######").unwrap();
        let mut store = MemoryStore::new();
        let mut game = Game::new(&puzzle);

        game.move_and_record(Direction::Right, &mut store).unwrap();
        game.move_and_record(Direction::Right, &mut store).unwrap();
        assert!(store.is_empty());
        assert_eq!(
            game.move_and_record(Direction::Up, &mut store),
            Err(MoveError::Wall)
        );

        let flags = game.move_and_record(Direction::Right, &mut store).unwrap();
        assert!(flags.contains(MoveFlags::SOLVED));
        let saved = store.load(puzzle.fingerprint()).unwrap().unwrap();
        assert_eq!(saved.as_str(), "rRR");

        // A longer solve leaves the stored one alone
        let mut game = Game::new(&puzzle);
        for dir in [Direction::Right, Direction::Left, Direction::Right] {
            game.move_and_record(dir, &mut store).unwrap();
        }
        game.move_and_record(Direction::Right, &mut store).unwrap();
        game.move_and_record(Direction::Right, &mut store).unwrap();
        assert!(game.is_solved());
        let saved = store.load(puzzle.fingerprint()).unwrap().unwrap();
        assert_eq!(saved.as_str(), "rRR");
    }

    #[test]
    fn test_reset() {
        let puzzle = Puzzle::from_text(SAMPLE).unwrap();
        let mut game = Game::new(&puzzle);
        game.move_player(Direction::Down, false).unwrap();
        game.move_player(Direction::Right, false).unwrap();

        game.reset(&puzzle);

        assert_eq!(game, Game::new(&puzzle));
        assert_eq!(game.angle(), 0);
    }

    #[test]
    fn test_random_walk_invariants_and_undo() {
        let puzzle = Puzzle::from_text(SAMPLE).unwrap();
        let walls = cells_with(puzzle.field(), Cell::WALL);
        let goals = cells_with(puzzle.field(), Cell::GOAL);
        let atom_count = atoms(puzzle.field());

        for seed in 0..8 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut game = Game::new(&puzzle);
            let mut committed = 0;
            let mut pushes = 0;

            for _ in 0..400 {
                let dir = ALL_DIRECTIONS[rng.gen_range(0..4)];
                if let Ok(flags) = game.move_player(dir, false) {
                    committed += 1;
                    if flags.contains(MoveFlags::PUSHED) {
                        pushes += 1;
                    }
                }
                assert_eq!(atoms(game.field()), atom_count);
                assert_eq!(cells_with(game.field(), Cell::WALL), walls);
                assert_eq!(cells_with(game.field(), Cell::GOAL), goals);
            }

            assert_eq!(game.history().len(), committed);
            assert_eq!(game.score().pushes, pushes);

            for _ in 0..committed {
                assert!(game.undo());
            }
            assert!(!game.undo());
            assert_eq!(game.field(), puzzle.field(), "seed {}", seed);
            assert_eq!(game.player(), puzzle.player(), "seed {}", seed);
            assert_eq!(game.history(), "");
        }
    }
}
