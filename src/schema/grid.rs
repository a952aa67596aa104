//! Binary pixel grid for the 16x16 LED matrix.

use std::fmt;

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Width and height of the full matrix in pixels.
pub const GRID_SIZE: usize = 16;

/// Width and height of one quadrant (one EEPROM image) in pixels.
pub const BLOCK_SIZE: usize = 8;

/// State of a single LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Pixel {
    #[default]
    Off = 0,
    On = 1,
}

impl Pixel {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Pixel::Off),
            1 => Some(Pixel::On),
            _ => None,
        }
    }

    #[inline]
    pub fn is_on(self) -> bool {
        self == Pixel::On
    }

    /// Logical NOT (`1 - p`).
    #[inline]
    pub fn inverted(self) -> Self {
        match self {
            Pixel::Off => Pixel::On,
            Pixel::On => Pixel::Off,
        }
    }
}

impl From<bool> for Pixel {
    fn from(on: bool) -> Self {
        if on { Pixel::On } else { Pixel::Off }
    }
}

impl Serialize for Pixel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for Pixel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = u8::deserialize(deserializer)?;
        Pixel::from_u8(v)
            .ok_or_else(|| de::Error::invalid_value(Unexpected::Unsigned(v as u64), &"0 or 1"))
    }
}

/// Full 16x16 matrix, row-major.
///
/// The fixed-size array guarantees every grid is fully populated. Grids are
/// `Copy` values: editing produces a new grid and never touches one held
/// elsewhere (history snapshots, an in-flight export).
///
/// JSON form is an array of 16 rows of 16 pixels (`0`/`1`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    cells: [[Pixel; GRID_SIZE]; GRID_SIZE],
}

impl Grid {
    /// All pixels off.
    pub fn empty() -> Self {
        Self::default()
    }

    /// All pixels on.
    pub fn filled() -> Self {
        Self {
            cells: [[Pixel::On; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Build a grid by evaluating `f(row, col)` for every cell.
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Pixel,
    {
        Self {
            cells: std::array::from_fn(|r| std::array::from_fn(|c| f(r, c))),
        }
    }

    pub fn from_rows(cells: [[Pixel; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self { cells }
    }

    /// Pixel at `(row, col)`. Panics if either index is `>= GRID_SIZE`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Pixel {
        self.cells[row][col]
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[Pixel; GRID_SIZE] {
        &self.cells[row]
    }

    pub fn rows(&self) -> &[[Pixel; GRID_SIZE]; GRID_SIZE] {
        &self.cells
    }

    /// Copy of this grid with one pixel replaced.
    #[must_use]
    pub fn with_pixel(mut self, row: usize, col: usize, pixel: Pixel) -> Self {
        self.cells[row][col] = pixel;
        self
    }

    /// Number of lit pixels.
    pub fn count_on(&self) -> usize {
        self.cells.iter().flatten().filter(|p| p.is_on()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count_on() == 0
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid [")?;
        for row in &self.cells {
            let line: String = row
                .iter()
                .map(|p| if p.is_on() { '#' } else { '.' })
                .collect();
            writeln!(f, "  {line}")?;
        }
        write!(f, "]")
    }
}
