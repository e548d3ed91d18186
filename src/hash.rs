use crate::field::Field;
use std::fmt;

/// CRC-32 fingerprint of a puzzle's static layout.
///
/// Two levels with the same walls, goals, starting atoms and floor area
/// share a fingerprint no matter how their source text was written, which
/// lets saved solutions follow a layout from one level file to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(u32);

impl Fingerprint {
    pub const fn new(value: u32) -> Self {
        Fingerprint(value)
    }

    /// Hash the cells of `field` row by row over `width` x `height` cells.
    pub fn of_field(field: &Field, width: usize, height: usize) -> Self {
        let mut hasher = crc32fast::Hasher::new();
        let mut row_bytes = Vec::with_capacity(width);
        for row in field.rows(width, height) {
            row_bytes.clear();
            row_bytes.extend(row.iter().map(|cell| cell.bits()));
            hasher.update(&row_bytes);
        }
        Fingerprint(hasher.finalize())
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    /// The key used to name store entries: lowercase hex, no padding.
    pub fn key(self) -> String {
        format!("{:x}", self)
    }
}

/// Uppercase hex without leading zeros, as shown to players.
impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

impl fmt::LowerHex for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}
