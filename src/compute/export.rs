//! Loop export: a frame sequence to four quadrant EEPROM images.

use log::debug;

use crate::schema::{BLOCK_SIZE, ExportConfig, Frame};

use super::{Quadrant, encode_frame};

/// File stem used when a project name sanitizes to nothing.
pub const DEFAULT_FILE_STEM: &str = "matrix_project";

/// A byte buffer with the file name it should be persisted under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedBuffer {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// The four EEPROM images produced by one export, each `target_len * 8` bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuadrantImages {
    images: [Vec<u8>; 4],
}

impl QuadrantImages {
    fn with_capacity(bytes: usize) -> Self {
        Self {
            images: std::array::from_fn(|_| Vec::with_capacity(bytes)),
        }
    }

    /// Image for one quadrant.
    pub fn get(&self, quadrant: Quadrant) -> &[u8] {
        &self.images[quadrant.index()]
    }

    /// Number of frames in each image.
    pub fn frame_count(&self) -> usize {
        self.images[0].len() / BLOCK_SIZE
    }

    /// The 8 bytes of `frame` within one quadrant image.
    pub fn frame_bytes(&self, quadrant: Quadrant, frame: usize) -> Option<&[u8]> {
        let start = frame * BLOCK_SIZE;
        self.get(quadrant).get(start..start + BLOCK_SIZE)
    }

    /// Pair each image with its file name, `<stem>_<TL|TR|BL|BR>.bin`.
    pub fn into_named_buffers(self, stem: &str) -> Vec<NamedBuffer> {
        Quadrant::ALL
            .into_iter()
            .zip(self.images)
            .map(|(quadrant, data)| NamedBuffer {
                file_name: quadrant_file_name(stem, quadrant),
                data,
            })
            .collect()
    }
}

/// Export errors.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Cannot export an empty frame sequence")]
    EmptySequence,
}

/// Indices of the frames that make up an exported loop.
///
/// The sequence is cycled until `loop_size` frames are produced.
pub fn loop_schedule(frame_count: usize, loop_size: usize) -> impl Iterator<Item = usize> {
    (0..loop_size).map(move |i| i % frame_count.max(1))
}

/// Encode a frame sequence into four quadrant images.
///
/// The sequence is repeated (or cut) to `config.target_len()` frames and every
/// frame is encoded for TL, TR, BL and BR with the same configuration. Fails
/// without producing anything when `frames` is empty.
pub fn export_loop(frames: &[Frame], config: &ExportConfig) -> Result<QuadrantImages, ExportError> {
    if frames.is_empty() {
        return Err(ExportError::EmptySequence);
    }

    let target_len = config.target_len();
    let mut images = QuadrantImages::with_capacity(target_len * BLOCK_SIZE);

    for index in loop_schedule(frames.len(), target_len) {
        let blocks = encode_frame(&frames[index].grid, config);
        for (image, block) in images.images.iter_mut().zip(blocks.iter()) {
            image.extend_from_slice(block);
        }
    }

    debug!(
        "Exported {} frames into {} loop frames ({:?})",
        frames.len(),
        target_len,
        config
    );
    debug!("TL first bytes: {}", hex_preview(images.get(Quadrant::TopLeft), BLOCK_SIZE));
    debug!("TR first bytes: {}", hex_preview(images.get(Quadrant::TopRight), BLOCK_SIZE));

    Ok(images)
}

/// Sanitize a project name into a file stem.
///
/// Every character outside `[A-Za-z0-9_-]` becomes `_`.
pub fn file_stem(project_name: &str) -> String {
    if project_name.is_empty() {
        return DEFAULT_FILE_STEM.to_string();
    }
    project_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `<stem>_<suffix>.bin`
pub fn quadrant_file_name(stem: &str, quadrant: Quadrant) -> String {
    format!("{}_{}.bin", stem, quadrant.suffix())
}

/// First `limit` bytes as `0x..` separated by spaces.
pub fn hex_preview(bytes: &[u8], limit: usize) -> String {
    bytes
        .iter()
        .take(limit)
        .map(|b| format!("0x{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
