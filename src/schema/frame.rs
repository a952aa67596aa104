//! Animation frames.

use serde::{Deserialize, Serialize};

use super::Grid;

/// Default display duration of a frame in milliseconds.
pub const DEFAULT_FRAME_DURATION: u32 = 200;

/// One animation frame: an identifier, a grid snapshot and a display time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub id: String,
    pub grid: Grid,
    /// Display duration in milliseconds.
    pub duration: u32,
}

impl Frame {
    /// Create a frame with a freshly generated id.
    pub fn new(grid: Grid, duration: u32) -> Self {
        Self {
            id: new_id(),
            grid,
            duration,
        }
    }

    /// Frame with every pixel off.
    pub fn empty(duration: u32) -> Self {
        Self::new(Grid::empty(), duration)
    }

    /// Copy of this frame under a new id.
    pub fn duplicate(&self) -> Self {
        Self::new(self.grid, self.duration)
    }
}

/// Random 128-bit identifier rendered as 32 lowercase hex digits.
pub fn new_id() -> String {
    format!("{:032x}", rand::random::<u128>())
}
