use std::fmt;
use std::ops::BitOr;

/// Side length of the square canvas every field is stored on.
pub const FIELD_SIZE: usize = 64;

/// Largest width or height a level may have. The two spare rows and
/// columns keep neighbour lookups at the interior edge inside the canvas.
pub const MAX_DIMENSION: usize = FIELD_SIZE - 2;

/// A position on the field as `(x, y)`, `(0, 0)` being the top-left cell.
pub type Position = (u8, u8);

/// A small bitset describing the contents of one field cell.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell(u8);

impl Cell {
    pub const EMPTY: Cell = Cell(0);
    pub const FLOOR: Cell = Cell(1);
    pub const ATOM: Cell = Cell(2);
    pub const GOAL: Cell = Cell(4);
    pub const WALL: Cell = Cell(8);

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True if every bit of `other` is set in this cell.
    pub fn contains(self, other: Cell) -> bool {
        (self.0 & other.0) == other.0
    }

    /// True if any bit of `other` is set in this cell.
    pub fn intersects(self, other: Cell) -> bool {
        (self.0 & other.0) != 0
    }

    pub fn insert(&mut self, other: Cell) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Cell) {
        self.0 &= !other.0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_wall(self) -> bool {
        self.contains(Cell::WALL)
    }

    pub fn is_floor(self) -> bool {
        self.contains(Cell::FLOOR)
    }

    pub fn has_atom(self) -> bool {
        self.contains(Cell::ATOM)
    }

    pub fn is_goal(self) -> bool {
        self.contains(Cell::GOAL)
    }
}

impl BitOr for Cell {
    type Output = Cell;

    fn bitor(self, rhs: Cell) -> Cell {
        Cell(self.0 | rhs.0)
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Cell(EMPTY)");
        }
        let names = [
            (Cell::FLOOR, "FLOOR"),
            (Cell::ATOM, "ATOM"),
            (Cell::GOAL, "GOAL"),
            (Cell::WALL, "WALL"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter(|(bit, _)| self.contains(*bit))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "Cell({})", set.join("|"))
    }
}

/// A fixed 64x64 grid of cells, indexed by `(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    cells: [[Cell; FIELD_SIZE]; FIELD_SIZE],
}

impl Field {
    /// A field with every cell set to `cell`.
    pub fn filled(cell: Cell) -> Self {
        Field {
            cells: [[cell; FIELD_SIZE]; FIELD_SIZE],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Cell {
        self.cells[y][x]
    }

    pub fn at(&self, pos: Position) -> Cell {
        self.get(pos.0 as usize, pos.1 as usize)
    }

    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        self.cells[y][x] = cell;
    }

    pub fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        &mut self.cells[pos.1 as usize][pos.0 as usize]
    }

    /// The first `width` cells of each of the first `height` rows.
    pub fn rows(&self, width: usize, height: usize) -> impl Iterator<Item = &[Cell]> {
        self.cells[..height].iter().map(move |row| &row[..width])
    }

    /// Clear every plain floor cell that can be reached from the bottom-right
    /// corner without crossing anything other than plain floor. The cell at
    /// `keep` is treated as a barrier and is never cleared.
    pub(crate) fn clear_exterior(&mut self, keep: (usize, usize)) {
        let start = (FIELD_SIZE - 1, FIELD_SIZE - 1);
        let mut stack: Vec<(usize, usize)> = vec![start];

        while let Some((x, y)) = stack.pop() {
            if (x, y) == keep || self.cells[y][x] != Cell::FLOOR {
                continue;
            }
            self.cells[y][x] = Cell::EMPTY;

            if x + 1 < FIELD_SIZE {
                stack.push((x + 1, y));
            }
            if x > 0 {
                stack.push((x - 1, y));
            }
            if y + 1 < FIELD_SIZE {
                stack.push((x, y + 1));
            }
            if y > 0 {
                stack.push((x, y - 1));
            }
        }
    }

    /// Smallest box holding every non-empty cell, as inclusive
    /// `(left, top, right, bottom)` corners.
    pub(crate) fn occupied_bounds(&self) -> Option<(usize, usize, usize, usize)> {
        let mut bounds: Option<(usize, usize, usize, usize)> = None;
        for (y, row) in self.cells.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if cell.is_empty() {
                    continue;
                }
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((l, t, r, b)) => (l.min(x), t.min(y), r.max(x), b.max(y)),
                });
            }
        }
        bounds
    }

    /// Move the cell at `(left, top)` to the origin, dragging the rest of the
    /// field along. Cells shifted in from past the far edges are empty.
    pub(crate) fn shift_to_origin(&mut self, left: usize, top: usize) {
        for y in 0..FIELD_SIZE {
            for x in 0..FIELD_SIZE {
                let (sx, sy) = (x + left, y + top);
                self.cells[y][x] = if sx < FIELD_SIZE && sy < FIELD_SIZE {
                    self.cells[sy][sx]
                } else {
                    Cell::EMPTY
                };
            }
        }
    }
}
