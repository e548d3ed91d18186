use crate::field::{Cell, Field, MAX_DIMENSION};
use crate::game::Puzzle;
use log::{debug, warn};
use std::fs;
use std::io;
use std::path::Path;

/// Error type for level parsing operations.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    /// IO error when reading from file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// The input holds no level at all
    #[error("no level found")]
    Empty,
    /// Invalid level content
    #[error("invalid level {level}: {reason}")]
    InvalidLevel { level: usize, reason: String },
    /// The input holds more levels than the caller allows
    #[error("more than {max} levels")]
    TooManyLevels { max: usize },
}

/// Limits applied while parsing a level collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub max_levels: usize,
    /// Longest collection comment kept, in bytes.
    pub max_comment_len: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_levels: 4096,
            max_comment_len: 31,
        }
    }
}

/// Byte cursor over XSB input. Carriage returns are skipped so CRLF files
/// read the same as LF files.
struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(input: &'a [u8]) -> Self {
        Reader { input, pos: 0 }
    }

    fn next_byte(&mut self) -> Option<u8> {
        loop {
            let byte = *self.input.get(self.pos)?;
            self.pos += 1;
            if byte != b'\r' {
                return Some(byte);
            }
        }
    }

    /// Read one run-length chunk: a byte and how many times it repeats.
    /// Without a digit prefix the count is 1.
    fn next_chunk(&mut self) -> Option<(u8, usize)> {
        let mut count: Option<usize> = None;
        loop {
            let byte = self.next_byte()?;
            if byte.is_ascii_digit() {
                let digit = (byte - b'0') as usize;
                count = Some(count.unwrap_or(0).saturating_mul(10).saturating_add(digit));
            } else {
                return Some((byte, count.unwrap_or(1)));
            }
        }
    }

    /// Skip to the end of the current line, handing its bytes to `capture`.
    fn read_comment_line(&mut self, mut capture: Option<&mut CommentBuffer>) {
        while let Some(byte) = self.next_byte() {
            if byte == b'\n' {
                break;
            }
            if let Some(buffer) = capture.as_deref_mut() {
                buffer.push(byte);
            }
        }
    }
}

/// Collects the collection comment found while reading the first level.
struct CommentBuffer {
    bytes: Vec<u8>,
    limit: usize,
    captured: bool,
}

impl CommentBuffer {
    fn new(limit: usize) -> Self {
        CommentBuffer {
            bytes: Vec::new(),
            limit,
            captured: false,
        }
    }

    fn push(&mut self, byte: u8) {
        if self.bytes.len() < self.limit {
            self.bytes.push(byte);
        }
    }

    fn into_comment(self) -> Option<String> {
        let text = String::from_utf8_lossy(&self.bytes);
        let text = text.trim_matches(' ');
        (!text.is_empty()).then(|| text.to_string())
    }
}

fn is_cell_glyph(byte: u8) -> bool {
    matches!(
        byte,
        b' ' | b'-' | b'_' | b'#' | b'@' | b'+' | b'$' | b'*' | b'.'
    )
}

/// Plots the glyphs of one level onto a canvas, one cell in from the
/// top-left corner so the exterior fill can get around the level.
struct LevelBuilder {
    canvas: Field,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    player: Option<(usize, usize)>,
    started: bool,
}

impl LevelBuilder {
    fn new() -> Self {
        LevelBuilder {
            canvas: Field::filled(Cell::FLOOR),
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            player: None,
            started: false,
        }
    }

    fn end_row(&mut self) {
        if self.started {
            self.y += 1;
        }
        self.x = 0;
    }

    fn plot(&mut self, glyph: u8) -> Result<(), String> {
        if self.x >= MAX_DIMENSION {
            return Err(format!(
                "row {} is wider than {} cells",
                self.y + 1,
                MAX_DIMENSION
            ));
        }
        if self.y >= MAX_DIMENSION {
            return Err(format!("level is taller than {} rows", MAX_DIMENSION));
        }

        let (cx, cy) = (self.x + 1, self.y + 1);
        let bits = match glyph {
            b'#' => Cell::WALL,
            b'$' => Cell::FLOOR | Cell::ATOM,
            b'*' => Cell::FLOOR | Cell::ATOM | Cell::GOAL,
            b'.' | b'+' => Cell::FLOOR | Cell::GOAL,
            _ => Cell::FLOOR,
        };
        if bits.is_wall() {
            self.canvas.set(cx, cy, Cell::WALL);
        } else {
            let cell = self.canvas.get(cx, cy) | bits;
            self.canvas.set(cx, cy, cell);
        }

        if glyph == b'@' || glyph == b'+' {
            if self.player.is_some() {
                return Err("multiple players found".to_string());
            }
            self.player = Some((self.x, self.y));
        }

        self.x += 1;
        self.started = true;
        self.width = self.width.max(self.x);
        self.height = self.height.max(self.y + 1);
        Ok(())
    }

    /// Remove the floor outside the walls, then crop the level to the cells
    /// that are left and move it to the origin. Padding around the rows does
    /// not change the result.
    fn finish(self) -> Result<Puzzle, String> {
        let (px, py) = self.player.ok_or("no player found")?;
        if self.width == 0 || self.height == 0 {
            return Err("level has no cells".to_string());
        }

        let mut field = self.canvas;
        let keep = (px + 1, py + 1);
        field.clear_exterior(keep);
        let (left, top, right, bottom) = field
            .occupied_bounds()
            .unwrap_or((keep.0, keep.1, keep.0, keep.1));
        field.shift_to_origin(left, top);

        Ok(Puzzle::new(
            field,
            (right - left + 1) as u8,
            (bottom - top + 1) as u8,
            ((keep.0 - left) as u8, (keep.1 - top) as u8),
        ))
    }
}

/// Parse the next level. Returns `Ok(None)` when the input ends before any
/// level content.
fn parse_level(
    reader: &mut Reader<'_>,
    mut comment: Option<&mut CommentBuffer>,
) -> Result<Option<Puzzle>, String> {
    let mut builder = LevelBuilder::new();

    while let Some((glyph, count)) = reader.next_chunk() {
        match glyph {
            b'\n' | b'|' => builder.end_row(),
            glyph if is_cell_glyph(glyph) => {
                for _ in 0..count {
                    builder.plot(glyph)?;
                }
            }
            _ => {
                let capture = match comment.as_deref_mut() {
                    Some(buffer) if !buffer.captured => {
                        buffer.captured = true;
                        Some(buffer)
                    }
                    _ => None,
                };
                reader.read_comment_line(capture);
                // A comment after level content closes the level
                if builder.started {
                    break;
                }
            }
        }
    }

    if !builder.started {
        return Ok(None);
    }
    builder.finish().map(Some)
}

/// A collection of Sokoban levels in XSB format.
#[derive(Debug, Clone)]
pub struct Levels {
    levels: Vec<Puzzle>,
    comment: Option<String>,
}

impl Levels {
    /// Parse XSB-formatted Sokoban levels.
    ///
    /// Besides the standard characters (`#`, `@`, `+`, `$`, `*`, `.`, space)
    /// this accepts `-` and `_` as floor, `|` as a row separator, and digit
    /// prefixes as run lengths (`3#` is `###`). Any other character starts a
    /// comment running to the end of the line; a comment after level content
    /// ends that level. The first comment line read before the first level
    /// is finished becomes the collection comment.
    ///
    /// An invalid first level is an error. An invalid later level stops
    /// parsing, and the levels read so far are returned.
    pub fn from_bytes(input: &[u8], options: &ParseOptions) -> Result<Self, LevelError> {
        let mut reader = Reader::new(input);
        let mut comment = CommentBuffer::new(options.max_comment_len);
        let mut levels: Vec<Puzzle> = Vec::new();

        loop {
            let capture = if levels.is_empty() {
                Some(&mut comment)
            } else {
                None
            };
            match parse_level(&mut reader, capture) {
                Ok(Some(mut puzzle)) => {
                    if levels.len() >= options.max_levels {
                        return Err(LevelError::TooManyLevels {
                            max: options.max_levels,
                        });
                    }
                    puzzle.set_level(levels.len() + 1);
                    debug!(
                        "level {}: {}x{}, id {}",
                        puzzle.level(),
                        puzzle.width(),
                        puzzle.height(),
                        puzzle.fingerprint()
                    );
                    levels.push(puzzle);
                }
                Ok(None) => break,
                Err(reason) if levels.is_empty() => {
                    return Err(LevelError::InvalidLevel { level: 1, reason });
                }
                Err(reason) => {
                    warn!(
                        "level {} is invalid ({}), keeping the {} levels before it",
                        levels.len() + 1,
                        reason,
                        levels.len()
                    );
                    break;
                }
            }
        }

        if levels.is_empty() {
            return Err(LevelError::Empty);
        }
        Ok(Levels {
            levels,
            comment: comment.into_comment(),
        })
    }

    /// Parse XSB-formatted Sokoban levels from a string with default limits.
    pub fn from_text(contents: &str) -> Result<Self, LevelError> {
        Self::from_bytes(contents.as_bytes(), &ParseOptions::default())
    }

    /// Parse XSB-formatted Sokoban levels from a text file.
    pub fn from_file<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Self, LevelError> {
        let contents = fs::read(path)?;
        Self::from_bytes(&contents, options)
    }

    /// Get the nth level (0-indexed).
    pub fn get(&self, index: usize) -> Option<&Puzzle> {
        self.levels.get(index)
    }

    /// Get the number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// The collection comment, taken from the first level's comment lines.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Puzzle> {
        self.levels.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Puzzle> {
        self.levels.iter_mut()
    }
}

impl IntoIterator for Levels {
    type Item = Puzzle;
    type IntoIter = std::vec::IntoIter<Puzzle>;

    fn into_iter(self) -> Self::IntoIter {
        self.levels.into_iter()
    }
}

impl<'a> IntoIterator for &'a Levels {
    type Item = &'a Puzzle;
    type IntoIter = std::slice::Iter<'a, Puzzle>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
