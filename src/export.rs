use crate::field::{Cell, Field, Position};
use crate::game::{Game, Puzzle};
use crate::hash::Fingerprint;
use std::fmt;

/// The canonical XSB glyph for one cell.
fn glyph(cell: Cell, is_player: bool) -> char {
    if cell.is_wall() {
        '#'
    } else if cell.contains(Cell::ATOM | Cell::GOAL) {
        '*'
    } else if cell.has_atom() {
        '$'
    } else if cell.is_goal() {
        if is_player { '+' } else { '.' }
    } else if is_player {
        '@'
    } else {
        ' '
    }
}

fn board_lines<'a>(
    field: &'a Field,
    width: usize,
    height: usize,
    player: Position,
) -> impl Iterator<Item = String> + 'a {
    let player = (player.0 as usize, player.1 as usize);
    field.rows(width, height).enumerate().map(move |(y, row)| {
        row.iter()
            .enumerate()
            .map(|(x, &cell)| glyph(cell, (x, y) == player))
            .collect()
    })
}

/// Write the board one line per row, with trailing spaces trimmed.
pub(crate) fn write_board(
    f: &mut fmt::Formatter<'_>,
    field: &Field,
    width: usize,
    height: usize,
    player: Position,
) -> fmt::Result {
    for line in board_lines(field, width, height, player) {
        writeln!(f, "{}", line.trim_end())?;
    }
    Ok(())
}

/// Text dump of a level: its id, the board, and a solution when there is one.
///
/// ```text
/// ; Level id: 3F041997
///
/// #@$.#
///
/// ; Solution
/// ; R
/// ```
pub struct LevelText<'a> {
    fingerprint: Fingerprint,
    field: &'a Field,
    width: usize,
    height: usize,
    player: Position,
    moves: Option<&'a str>,
}

impl<'a> LevelText<'a> {
    /// A puzzle in its starting position, with its best known solution.
    pub fn puzzle(puzzle: &'a Puzzle) -> Self {
        LevelText {
            fingerprint: puzzle.fingerprint(),
            field: puzzle.field(),
            width: puzzle.width(),
            height: puzzle.height(),
            player: puzzle.player(),
            moves: puzzle.best_solution().map(|s| s.as_str()),
        }
    }

    /// A game as it stands, with the moves made so far.
    pub fn snapshot(game: &'a Game) -> Self {
        LevelText {
            fingerprint: game.fingerprint(),
            field: game.field(),
            width: game.width(),
            height: game.height(),
            player: game.player(),
            moves: Some(game.history()),
        }
    }
}

impl fmt::Display for LevelText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; Level id: {}", self.fingerprint)?;
        writeln!(f)?;
        for line in board_lines(self.field, self.width, self.height, self.player) {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)?;
        match self.moves.filter(|moves| !moves.is_empty()) {
            Some(moves) => {
                writeln!(f, "; Solution")?;
                writeln!(f, "; {}", moves)
            }
            None => writeln!(f, "; No solution available"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Direction;
    use crate::solution::Solution;

    #[test]
    fn test_puzzle_without_solution() {
        let puzzle = Puzzle::from_text("#####\n#@$.#\n#####").unwrap();
        let text = LevelText::puzzle(&puzzle).to_string();

        let expected = format!(
            "; Level id: {}\n\n#####\n#@$.#\n#####\n\n; No solution available\n",
            puzzle.fingerprint()
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_puzzle_with_solution() {
        let mut puzzle = Puzzle::from_text("#####\n#@$.#\n#####").unwrap();
        puzzle.set_best_solution(Some(Solution::parse("R").unwrap()));
        let text = LevelText::puzzle(&puzzle).to_string();

        assert!(text.ends_with("\n\n; Solution\n; R\n"));
    }

    #[test]
    fn test_rows_keep_full_width() {
        let puzzle = Puzzle::from_text("  ####\n###  ####\n#  @ $.#\n#########").unwrap();
        let text = LevelText::puzzle(&puzzle).to_string();
        let board: Vec<&str> = text.lines().skip(2).take(puzzle.height()).collect();

        assert_eq!(board, vec!["  ####   ", "###  ####", "#  @ $.# ", "#########"]);
    }

    #[test]
    fn test_snapshot_glyphs() {
        let puzzle = Puzzle::from_text("#######\n#@$.* #\n#.    #\n#######").unwrap();
        let mut game = Game::new(&puzzle);
        game.move_player(Direction::Down, false).unwrap();

        let text = LevelText::snapshot(&game).to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[2], "#######");
        assert_eq!(lines[3], "# $.* #");
        assert_eq!(lines[4], "#+    #");
        assert_eq!(lines[7], "; Solution");
        assert_eq!(lines[8], "; d");
    }

    #[test]
    fn test_snapshot_without_moves() {
        let puzzle = Puzzle::from_text("#####\n#@$.#\n#####").unwrap();
        let game = Game::new(&puzzle);
        let text = LevelText::snapshot(&game).to_string();
        assert!(text.ends_with("; No solution available\n"));
    }
}
