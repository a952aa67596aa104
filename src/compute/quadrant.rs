//! The four 8x8 quadrants of the matrix, one per EEPROM.

use std::fmt;

use crate::schema::BLOCK_SIZE;

/// One of the four fixed 8x8 sub-regions of the 16x16 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    /// Export order: TL, TR, BL, BR.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// `(row, col)` of the top-left pixel.
    pub fn origin(self) -> (usize, usize) {
        match self {
            Quadrant::TopLeft => (0, 0),
            Quadrant::TopRight => (0, BLOCK_SIZE),
            Quadrant::BottomLeft => (BLOCK_SIZE, 0),
            Quadrant::BottomRight => (BLOCK_SIZE, BLOCK_SIZE),
        }
    }

    /// File name suffix.
    pub fn suffix(self) -> &'static str {
        match self {
            Quadrant::TopLeft => "TL",
            Quadrant::TopRight => "TR",
            Quadrant::BottomLeft => "BL",
            Quadrant::BottomRight => "BR",
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}
