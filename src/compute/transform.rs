//! Whole-grid transforms used by the editor.
//!
//! Every function derives a new grid and leaves its input untouched.
//! [`shift`] moves pixels in two dimensions and is unrelated to the encoder's
//! row offset, which rotates whole rows inside one 8-row block.

use serde::{Deserialize, Serialize};

use crate::schema::{GRID_SIZE, Grid, Pixel};

const LAST: usize = GRID_SIZE - 1;

/// One-cell nudge direction for [`shift_direction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// `(dx, dy)` offset of this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Translate content by `(dx, dy)` pixels.
///
/// Output `(r, c)` takes input `(r - dy, c - dx)`. Cells whose source falls
/// outside the grid become off, unless `wrap` is set, in which case the source
/// wraps around modulo the grid size.
pub fn shift(grid: &Grid, dx: i32, dy: i32, wrap: bool) -> Grid {
    let n = GRID_SIZE as i32;
    Grid::from_fn(|r, c| {
        let src_r = r as i32 - dy;
        let src_c = c as i32 - dx;
        if wrap {
            grid.get(src_r.rem_euclid(n) as usize, src_c.rem_euclid(n) as usize)
        } else if (0..n).contains(&src_r) && (0..n).contains(&src_c) {
            grid.get(src_r as usize, src_c as usize)
        } else {
            Pixel::Off
        }
    })
}

/// Non-wrapping one-cell shift.
pub fn shift_direction(grid: &Grid, direction: Direction) -> Grid {
    let (dx, dy) = direction.delta();
    shift(grid, dx, dy, false)
}

/// Rotate by 90 degrees.
///
/// Clockwise moves `(r, c)` to `(c, 15 - r)`; counter-clockwise moves it to
/// `(15 - c, r)`.
pub fn rotate90(grid: &Grid, clockwise: bool) -> Grid {
    if clockwise {
        Grid::from_fn(|r, c| grid.get(LAST - c, r))
    } else {
        Grid::from_fn(|r, c| grid.get(c, LAST - r))
    }
}

/// Mirror left-right.
pub fn flip_horizontal(grid: &Grid) -> Grid {
    Grid::from_fn(|r, c| grid.get(r, LAST - c))
}

/// Mirror top-bottom.
pub fn flip_vertical(grid: &Grid) -> Grid {
    Grid::from_fn(|r, c| grid.get(LAST - r, c))
}

pub fn invert(grid: &Grid) -> Grid {
    Grid::from_fn(|r, c| grid.get(r, c).inverted())
}

pub fn fill() -> Grid {
    Grid::filled()
}

pub fn clear() -> Grid {
    Grid::empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn single(row: usize, col: usize) -> Grid {
        Grid::empty().with_pixel(row, col, Pixel::On)
    }

    fn arb_grid() -> impl Strategy<Value = Grid> {
        proptest::collection::vec(any::<bool>(), GRID_SIZE * GRID_SIZE)
            .prop_map(|bits| Grid::from_fn(|r, c| Pixel::from(bits[r * GRID_SIZE + c])))
    }

    #[test]
    fn test_shift_clips() {
        let grid = single(0, 15);
        let shifted = shift(&grid, 1, 0, false);
        assert!(shifted.is_empty());
    }

    #[test]
    fn test_shift_wraps() {
        let grid = single(0, 15);
        let shifted = shift(&grid, 1, 0, true);
        assert_eq!(shifted, single(0, 0));

        let shifted = shift(&grid, 0, -1, true);
        assert_eq!(shifted, single(15, 15));
    }

    #[test]
    fn test_shift_direction() {
        let grid = single(5, 5);
        assert_eq!(shift_direction(&grid, Direction::Up), single(4, 5));
        assert_eq!(shift_direction(&grid, Direction::Down), single(6, 5));
        assert_eq!(shift_direction(&grid, Direction::Left), single(5, 4));
        assert_eq!(shift_direction(&grid, Direction::Right), single(5, 6));
    }

    #[test]
    fn test_rotate_mapping() {
        let grid = single(0, 3);
        // Clockwise: (r, c) -> (c, 15 - r)
        assert_eq!(rotate90(&grid, true), single(3, 15));
        // Counter-clockwise: (r, c) -> (15 - c, r)
        assert_eq!(rotate90(&grid, false), single(12, 0));
    }

    #[test]
    fn test_flips() {
        let grid = single(2, 3);
        assert_eq!(flip_horizontal(&grid), single(2, 12));
        assert_eq!(flip_vertical(&grid), single(13, 3));
    }

    #[test]
    fn test_fill_clear_invert() {
        assert_eq!(invert(&clear()), fill());
        assert_eq!(invert(&fill()), clear());
    }

    proptest! {
        #[test]
        fn prop_rotate_four_times_is_identity(grid in arb_grid()) {
            let mut g = grid;
            for _ in 0..4 {
                g = rotate90(&g, true);
            }
            prop_assert_eq!(g, grid);
        }

        #[test]
        fn prop_rotate_cw_then_ccw(grid in arb_grid()) {
            prop_assert_eq!(rotate90(&rotate90(&grid, true), false), grid);
        }

        #[test]
        fn prop_double_flip_and_invert(grid in arb_grid()) {
            prop_assert_eq!(flip_horizontal(&flip_horizontal(&grid)), grid);
            prop_assert_eq!(flip_vertical(&flip_vertical(&grid)), grid);
            prop_assert_eq!(invert(&invert(&grid)), grid);
        }

        #[test]
        fn prop_wrapping_shift_reverses(grid in arb_grid(), dx in -20i32..20, dy in -20i32..20) {
            let there = shift(&grid, dx, dy, true);
            prop_assert_eq!(shift(&there, -dx, -dy, true), grid);
            prop_assert_eq!(there.count_on(), grid.count_on());
        }
    }
}
