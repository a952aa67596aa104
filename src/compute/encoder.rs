//! Quadrant encoder: one 8x8 block of a grid to 8 EEPROM bytes.
//!
//! The pipeline for a block is:
//!
//! 1. read the 8 rows top-down, or bottom-up when `flip_y` is set
//! 2. take 8 columns per row, reversed when `flip_x` is set
//! 3. rotate the row sequence circularly by `offset_y`
//! 4. invert every pixel when `invert_output` is set
//! 5. pack each row into a byte, column `i` in bit `i` (or `7 - i` with
//!    `bit_reversal`)
//!
//! The byte layout is consumed directly by the matrix hardware and must stay
//! bit-exact.

use crate::schema::{BLOCK_SIZE, ExportConfig, GRID_SIZE, Grid, Pixel};

use super::Quadrant;

/// Encoded bytes of one quadrant of one frame.
pub type Block = [u8; BLOCK_SIZE];

/// One 8-pixel row of a block.
pub type BlockRow = [Pixel; BLOCK_SIZE];

/// Rotate a row sequence circularly.
///
/// The offset is normalized into `[0, 8)`; the last `n` elements then move to
/// the front in order, so rotating `[r0, r1, .., r7]` by 1 gives
/// `[r7, r0, .., r6]` and by -1 gives `[r1, .., r7, r0]`.
pub fn rotate_rows<T: Copy>(rows: &[T; BLOCK_SIZE], offset: i32) -> [T; BLOCK_SIZE] {
    let n = offset.rem_euclid(BLOCK_SIZE as i32) as usize;
    let mut rotated = *rows;
    rotated.rotate_right(n);
    rotated
}

/// Read the 8 rows of a block in visitation order, applying `flip_x`/`flip_y`.
pub fn read_rows(
    grid: &Grid,
    origin_row: usize,
    origin_col: usize,
    flip_x: bool,
    flip_y: bool,
) -> [BlockRow; BLOCK_SIZE] {
    debug_assert!(origin_row + BLOCK_SIZE <= GRID_SIZE && origin_col + BLOCK_SIZE <= GRID_SIZE);

    std::array::from_fn(|k| {
        let r = if flip_y {
            origin_row + BLOCK_SIZE - 1 - k
        } else {
            origin_row + k
        };
        let mut row: BlockRow = std::array::from_fn(|i| grid.get(r, origin_col + i));
        if flip_x {
            row.reverse();
        }
        row
    })
}

/// Pack one row into a byte.
#[inline]
pub fn pack_row(row: &BlockRow, bit_reversal: bool, invert: bool) -> u8 {
    row.iter().enumerate().fold(0u8, |byte, (i, &pixel)| {
        if pixel.is_on() != invert {
            let shift = if bit_reversal { BLOCK_SIZE - 1 - i } else { i };
            byte | (1 << shift)
        } else {
            byte
        }
    })
}

/// Encode the 8x8 block whose top-left pixel is `(origin_row, origin_col)`.
///
/// Byte order is the row order after flip and rotation.
pub fn encode_block(
    grid: &Grid,
    origin_row: usize,
    origin_col: usize,
    config: &ExportConfig,
) -> Block {
    let rows = read_rows(grid, origin_row, origin_col, config.flip_x, config.flip_y);
    let rows = rotate_rows(&rows, config.offset_y);
    rows.map(|row| pack_row(&row, config.bit_reversal, config.invert_output))
}

/// Encode one quadrant of a grid.
pub fn encode_quadrant(grid: &Grid, quadrant: Quadrant, config: &ExportConfig) -> Block {
    let (row, col) = quadrant.origin();
    encode_block(grid, row, col, config)
}

/// Encode all four quadrants of a grid, in [`Quadrant::ALL`] order.
pub fn encode_frame(grid: &Grid, config: &ExportConfig) -> [Block; 4] {
    Quadrant::ALL.map(|q| encode_quadrant(grid, q, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::transform;
    use proptest::prelude::*;

    fn arb_grid() -> impl Strategy<Value = Grid> {
        proptest::collection::vec(any::<bool>(), GRID_SIZE * GRID_SIZE)
            .prop_map(|bits| Grid::from_fn(|r, c| Pixel::from(bits[r * GRID_SIZE + c])))
    }

    fn arb_config() -> impl Strategy<Value = ExportConfig> {
        (
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
            -20i32..20,
        )
            .prop_map(
                |(bit_reversal, flip_x, flip_y, invert_output, offset_y)| ExportConfig {
                    bit_reversal,
                    flip_x,
                    flip_y,
                    invert_output,
                    offset_y,
                    loop_size: 1,
                },
            )
    }

    fn single(row: usize, col: usize) -> Grid {
        Grid::empty().with_pixel(row, col, Pixel::On)
    }

    #[test]
    fn test_rotate_rows_direction() {
        let rows = [0u8, 1, 2, 3, 4, 5, 6, 7];
        assert_eq!(rotate_rows(&rows, 1), [7, 0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(rotate_rows(&rows, -1), [1, 2, 3, 4, 5, 6, 7, 0]);
        assert_eq!(rotate_rows(&rows, 8), rows);
        assert_eq!(rotate_rows(&rows, -9), rotate_rows(&rows, 7));
    }

    #[test]
    fn test_single_pixel_bit_reversed() {
        let config = ExportConfig {
            bit_reversal: true,
            ..ExportConfig::passthrough()
        };
        let block = encode_block(&single(0, 0), 0, 0, &config);
        assert_eq!(block, [0x80, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_single_pixel_inverted() {
        let config = ExportConfig {
            bit_reversal: true,
            invert_output: true,
            ..ExportConfig::passthrough()
        };
        let block = encode_block(&single(0, 0), 0, 0, &config);
        assert_eq!(block, [0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_passthrough_bit_order() {
        let grid = single(2, 3).with_pixel(5, 0, Pixel::On).with_pixel(5, 7, Pixel::On);
        let block = encode_block(&grid, 0, 0, &ExportConfig::passthrough());
        assert_eq!(block, [0, 0, 0b0000_1000, 0, 0, 0b1000_0001, 0, 0]);
    }

    #[test]
    fn test_flip_x_mirrors_columns() {
        let config = ExportConfig {
            flip_x: true,
            ..ExportConfig::passthrough()
        };
        let block = encode_block(&single(0, 8), 0, 8, &config);
        assert_eq!(block[0], 0x80);
    }

    #[test]
    fn test_flip_y_reads_bottom_up() {
        let config = ExportConfig {
            flip_y: true,
            ..ExportConfig::passthrough()
        };
        let block = encode_block(&single(8, 8), 8, 8, &config);
        assert_eq!(block, [0, 0, 0, 0, 0, 0, 0, 0x01]);
    }

    #[test]
    fn test_offset_applies_after_flip_y() {
        // Row 0 is read last under flip_y; rotating by 1 brings it to the front.
        let config = ExportConfig {
            flip_y: true,
            offset_y: 1,
            ..ExportConfig::passthrough()
        };
        let block = encode_block(&single(0, 0), 0, 0, &config);
        assert_eq!(block[0], 0x01);
        assert_eq!(block.iter().filter(|&&b| b != 0).count(), 1);
    }

    #[test]
    fn test_negative_offset() {
        let config = ExportConfig {
            offset_y: -1,
            ..ExportConfig::passthrough()
        };
        let block = encode_block(&single(1, 0), 0, 0, &config);
        assert_eq!(block[0], 0x01);
    }

    #[test]
    fn test_default_project_config() {
        // bit_reversal + active-low + offset -1
        let block = encode_block(&single(1, 0), 0, 0, &ExportConfig::default());
        assert_eq!(block, [0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_encode_frame_quadrants() {
        let grid = single(0, 0)
            .with_pixel(0, 8, Pixel::On)
            .with_pixel(9, 1, Pixel::On)
            .with_pixel(15, 15, Pixel::On);
        let blocks = encode_frame(&grid, &ExportConfig::passthrough());

        assert_eq!(blocks[0], [0x01, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(blocks[1], [0x01, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(blocks[2], [0, 0x02, 0, 0, 0, 0, 0, 0]);
        assert_eq!(blocks[3], [0, 0, 0, 0, 0, 0, 0, 0x80]);
    }

    proptest! {
        #[test]
        fn prop_passthrough_is_raw_rows(grid in arb_grid(), q in 0usize..4) {
            let quadrant = Quadrant::ALL[q];
            let (origin_row, origin_col) = quadrant.origin();
            let block = encode_quadrant(&grid, quadrant, &ExportConfig::passthrough());

            for (i, &byte) in block.iter().enumerate() {
                let expected = (0..BLOCK_SIZE).fold(0u8, |acc, bit| {
                    if grid.get(origin_row + i, origin_col + bit).is_on() {
                        acc | (1 << bit)
                    } else {
                        acc
                    }
                });
                prop_assert_eq!(byte, expected);
            }
        }

        #[test]
        fn prop_rotation_inverse(n in 0i32..8, rows in any::<[u8; 8]>()) {
            let back = rotate_rows(&rotate_rows(&rows, n), (BLOCK_SIZE as i32 - n) % 8);
            prop_assert_eq!(back, rows);
            prop_assert_eq!(rotate_rows(&rotate_rows(&rows, n), -n), rows);
        }

        #[test]
        fn prop_double_toggle_restores(grid in arb_grid(), config in arb_config()) {
            let base = encode_block(&grid, 0, 8, &config);

            let mut toggled = config;
            toggled.flip_x = !toggled.flip_x;
            toggled.flip_x = !toggled.flip_x;
            toggled.flip_y = !toggled.flip_y;
            toggled.flip_y = !toggled.flip_y;
            prop_assert_eq!(encode_block(&grid, 0, 8, &toggled), base);
        }

        #[test]
        fn prop_invert_is_complement(grid in arb_grid(), config in arb_config()) {
            let plain = ExportConfig { invert_output: false, ..config };
            let inverted = ExportConfig { invert_output: true, ..config };
            let a = encode_block(&grid, 8, 0, &plain);
            let b = encode_block(&grid, 8, 0, &inverted);
            prop_assert_eq!(a.map(|x| !x), b);
            // Inverting the output of an inverted grid restores the plain bytes.
            prop_assert_eq!(encode_block(&transform::invert(&grid), 8, 0, &inverted), a);
        }

        #[test]
        fn prop_flip_x_matches_grid_mirror(grid in arb_grid()) {
            // Mirroring the grid moves TL content into TR with columns reversed.
            let config = ExportConfig { flip_x: true, ..ExportConfig::passthrough() };
            let mirrored = transform::flip_horizontal(&grid);
            prop_assert_eq!(
                encode_quadrant(&grid, Quadrant::TopLeft, &config),
                encode_quadrant(&mirrored, Quadrant::TopRight, &ExportConfig::passthrough())
            );
        }

        #[test]
        fn prop_bit_reversal_reverses_bits(grid in arb_grid(), config in arb_config()) {
            let lsb = ExportConfig { bit_reversal: false, ..config };
            let msb = ExportConfig { bit_reversal: true, ..config };
            let a = encode_block(&grid, 8, 8, &lsb);
            let b = encode_block(&grid, 8, 8, &msb);
            prop_assert_eq!(a.map(u8::reverse_bits), b);
        }
    }
}
