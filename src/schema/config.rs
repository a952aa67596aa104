//! Export configuration for quadrant EEPROM images.

use serde::{Deserialize, Serialize};

/// Loop length used when `loop_size` is zero or negative.
pub const DEFAULT_LOOP_SIZE: usize = 64;

/// Largest loop length the export front ends accept (4096 frames = 32 KiB
/// per quadrant image). Stored projects may hold larger values.
pub const MAX_LOOP_SIZE: usize = 4096;

/// Electrical and geometric settings applied when encoding frames.
///
/// Missing JSON fields fall back to the project defaults, so partial
/// documents from older projects still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportConfig {
    /// Pack the first pixel of a row into bit 7 instead of bit 0 (D0 <-> D7).
    pub bit_reversal: bool,
    /// Mirror the 8 columns of each row before packing.
    pub flip_x: bool,
    /// Read the 8 rows of a block bottom-up.
    pub flip_y: bool,
    /// Active-low output: lit pixels encode as `0` bits.
    pub invert_output: bool,
    /// Circular row rotation inside each 8-row block (may be negative).
    pub offset_y: i32,
    /// Number of frames in the exported loop. `<= 0` selects [`DEFAULT_LOOP_SIZE`].
    pub loop_size: i32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            bit_reversal: true,
            flip_x: false,
            flip_y: false,
            invert_output: true,
            offset_y: -1,
            loop_size: DEFAULT_LOOP_SIZE as i32,
        }
    }
}

impl ExportConfig {
    /// Configuration with every transform disabled and a single-frame loop.
    ///
    /// Byte `i` of a block is then row `i` of the quadrant with column 0 in bit 0.
    pub fn passthrough() -> Self {
        Self {
            bit_reversal: false,
            flip_x: false,
            flip_y: false,
            invert_output: false,
            offset_y: 0,
            loop_size: 1,
        }
    }

    /// Number of frames an export will contain.
    #[inline]
    pub fn target_len(&self) -> usize {
        if self.loop_size > 0 {
            self.loop_size as usize
        } else {
            DEFAULT_LOOP_SIZE
        }
    }

    /// Bytes per quadrant image.
    pub fn image_len(&self) -> usize {
        self.target_len() * super::BLOCK_SIZE
    }

    /// Check that an export with these settings fits the target EEPROM.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_len() > MAX_LOOP_SIZE {
            return Err(ConfigError::LoopSizeTooLarge {
                requested: self.loop_size,
                max: MAX_LOOP_SIZE,
            });
        }
        Ok(())
    }
}

/// Partial update of an [`ExportConfig`]; `None` fields are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportConfigPatch {
    pub bit_reversal: Option<bool>,
    pub flip_x: Option<bool>,
    pub flip_y: Option<bool>,
    pub invert_output: Option<bool>,
    pub offset_y: Option<i32>,
    pub loop_size: Option<i32>,
}

impl ExportConfigPatch {
    pub fn apply(&self, config: &ExportConfig) -> ExportConfig {
        ExportConfig {
            bit_reversal: self.bit_reversal.unwrap_or(config.bit_reversal),
            flip_x: self.flip_x.unwrap_or(config.flip_x),
            flip_y: self.flip_y.unwrap_or(config.flip_y),
            invert_output: self.invert_output.unwrap_or(config.invert_output),
            offset_y: self.offset_y.unwrap_or(config.offset_y),
            loop_size: self.loop_size.unwrap_or(config.loop_size),
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Loop size {requested} exceeds the maximum of {max} frames")]
    LoopSizeTooLarge { requested: i32, max: usize },
}
