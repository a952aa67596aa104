//! Preset shapes for filling a frame.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{GRID_SIZE, Grid, Pixel};

/// Predefined patterns for a full 16x16 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Ring of radius 5..=7 around the matrix center.
    Circle,
    /// Square outline inset by two pixels.
    Square,
    /// Diamond touching the middle of every edge.
    Diamond,
    /// Two-pixel-wide plus sign.
    Cross,
    Heart,
    ArrowUp,
    ArrowDown,
    /// Alternating pixels, lit where `row + col` is even.
    Checker,
}

const HEART: [&str; 12] = [
    "  ****  ****  ",
    " ****** ****** ",
    "***************",
    "***************",
    "***************",
    " ************* ",
    "  ***********  ",
    "   *********   ",
    "    *******    ",
    "     *****     ",
    "      ***      ",
    "       *       ",
];

impl Shape {
    pub const ALL: [Shape; 8] = [
        Shape::Circle,
        Shape::Square,
        Shape::Diamond,
        Shape::Cross,
        Shape::Heart,
        Shape::ArrowUp,
        Shape::ArrowDown,
        Shape::Checker,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Square => "square",
            Shape::Diamond => "diamond",
            Shape::Cross => "cross",
            Shape::Heart => "heart",
            Shape::ArrowUp => "arrow_up",
            Shape::ArrowDown => "arrow_down",
            Shape::Checker => "checker",
        }
    }

    /// Render the shape into a new grid.
    pub fn generate(self) -> Grid {
        let mut cells = [[Pixel::Off; GRID_SIZE]; GRID_SIZE];
        let mut set = |r: usize, c: usize| cells[r][c] = Pixel::On;

        match self {
            Shape::Circle => {
                let (cx, cy) = (7.5f32, 7.5f32);
                for r in 0..GRID_SIZE {
                    for c in 0..GRID_SIZE {
                        let dist = ((r as f32 - cy).powi(2) + (c as f32 - cx).powi(2)).sqrt();
                        if (5.0..=7.0).contains(&dist) {
                            set(r, c);
                        }
                    }
                }
            }
            Shape::Square => {
                for i in 2..14 {
                    set(2, i);
                    set(13, i);
                    set(i, 2);
                    set(i, 13);
                }
            }
            Shape::Diamond => {
                for i in 0..8 {
                    set(i, 7 - i);
                    set(i, 8 + i);
                    set(15 - i, 7 - i);
                    set(15 - i, 8 + i);
                }
            }
            Shape::Cross => {
                for i in 0..GRID_SIZE {
                    set(7, i);
                    set(8, i);
                    set(i, 7);
                    set(i, 8);
                }
            }
            Shape::Heart => {
                for (r, line) in HEART.iter().enumerate() {
                    for (c, ch) in line.chars().enumerate().take(GRID_SIZE - 1) {
                        if ch == '*' {
                            set(r + 2, c + 1);
                        }
                    }
                }
            }
            Shape::ArrowUp => {
                for i in 0..8 {
                    set(i, 7);
                    set(i, 8);
                    set(7 - i, 7 - i);
                    set(7 - i, 8 + i);
                }
                for i in 8..GRID_SIZE {
                    set(i, 7);
                    set(i, 8);
                }
            }
            Shape::ArrowDown => {
                for i in 0..8 {
                    set(15 - i, 7);
                    set(15 - i, 8);
                    set(8 + i, 7 - i);
                    set(8 + i, 8 + i);
                }
                for i in 0..8 {
                    set(i, 7);
                    set(i, 8);
                }
            }
            Shape::Checker => {
                for r in 0..GRID_SIZE {
                    for c in 0..GRID_SIZE {
                        if (r + c) % 2 == 0 {
                            set(r, c);
                        }
                    }
                }
            }
        }

        Grid::from_rows(cells)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown shape name.
#[derive(Debug, thiserror::Error)]
#[error("Unknown shape '{0}'")]
pub struct ShapeParseError(pub String);

impl FromStr for Shape {
    type Err = ShapeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shape::ALL
            .into_iter()
            .find(|shape| shape.name() == s)
            .ok_or_else(|| ShapeParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_shape_draws_something() {
        for shape in Shape::ALL {
            let grid = shape.generate();
            assert!(!grid.is_empty(), "{shape} is empty");
        }
    }

    #[test]
    fn test_checker_is_half_lit() {
        let grid = Shape::Checker.generate();
        assert_eq!(grid.count_on(), GRID_SIZE * GRID_SIZE / 2);
        assert_eq!(grid.get(0, 0), Pixel::On);
        assert_eq!(grid.get(0, 1), Pixel::Off);
    }

    #[test]
    fn test_cross_arms() {
        let grid = Shape::Cross.generate();
        // Two full rows plus two full columns, minus the 4 shared center pixels.
        assert_eq!(grid.count_on(), 4 * GRID_SIZE - 4);
        assert_eq!(grid.get(0, 7), Pixel::On);
        assert_eq!(grid.get(15, 8), Pixel::On);
        assert_eq!(grid.get(0, 0), Pixel::Off);
    }

    #[test]
    fn test_square_outline() {
        let grid = Shape::Square.generate();
        assert_eq!(grid.get(2, 2), Pixel::On);
        assert_eq!(grid.get(13, 13), Pixel::On);
        assert_eq!(grid.get(7, 7), Pixel::Off);
        assert_eq!(grid.get(1, 1), Pixel::Off);
    }

    #[test]
    fn test_heart_tip() {
        let grid = Shape::Heart.generate();
        // The single '*' of the last pattern line lands at row 13, col 8.
        assert_eq!(grid.get(13, 8), Pixel::On);
        assert_eq!(grid.get(13, 7), Pixel::Off);
        assert_eq!(grid.get(14, 8), Pixel::Off);
    }

    #[test]
    fn test_parse_names() {
        for shape in Shape::ALL {
            assert_eq!(shape.name().parse::<Shape>().unwrap(), shape);
        }
        assert!("triangle".parse::<Shape>().is_err());
    }

    #[test]
    fn test_serde_names_match() {
        for shape in Shape::ALL {
            let json = serde_json::to_string(&shape).unwrap();
            assert_eq!(json, format!("\"{}\"", shape.name()));
        }
    }
}
