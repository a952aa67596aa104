//! The sink interface shared by every persistence backend.

use std::collections::HashSet;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::compute::NamedBuffer;

/// Destination for the named buffers of one export.
///
/// Implementations either persist every buffer or leave previously written
/// files as they were; a failed write never leaves a half-written file under
/// a final name.
pub trait BinarySink {
    fn write(&mut self, buffers: &[NamedBuffer]) -> Result<SinkReport, SinkError>;
}

/// Summary of a completed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkReport {
    /// Files created or replaced.
    pub files: Vec<PathBuf>,
    /// Payload bytes handed to the sink.
    pub payload_bytes: u64,
    /// Bytes written to disk, including any container overhead.
    pub written_bytes: u64,
}

impl fmt::Display for SinkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file(s), {} payload bytes, {} bytes written",
            self.files.len(),
            self.payload_bytes,
            self.written_bytes
        )
    }
}

/// Sink errors.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Invalid output file name: {0:?}")]
    InvalidName(String),
    #[error("Duplicate output file name: {0}")]
    DuplicateName(String),
    #[error("Sink I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Reject names that are empty, contain path separators or repeat.
pub fn validate_names(buffers: &[NamedBuffer]) -> Result<(), SinkError> {
    let mut seen = HashSet::new();
    for buffer in buffers {
        let name = buffer.file_name.as_str();
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\'])
            || name.contains('\0')
        {
            return Err(SinkError::InvalidName(name.to_string()));
        }
        if !seen.insert(name) {
            return Err(SinkError::DuplicateName(name.to_string()));
        }
    }
    Ok(())
}

/// Hidden sibling path used while `path` is being written.
pub(crate) fn staging_path(path: &Path) -> PathBuf {
    hidden_sibling(path, "partial")
}

/// Hidden sibling path holding the previous contents of `path` during a
/// replace.
pub(crate) fn backup_path(path: &Path) -> PathBuf {
    hidden_sibling(path, "backup")
}

fn hidden_sibling(path: &Path, suffix: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{suffix}"))
}

/// Write `data` to `path` and flush it to disk.
pub(crate) fn write_file(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(data)?;
    writer.flush()?;
    writer.get_ref().sync_all()
}

/// Best-effort removal of staging files after a failure.
pub(crate) fn discard(paths: impl IntoIterator<Item = PathBuf>) {
    for path in paths {
        if let Err(e) = fs::remove_file(&path) {
            if e.kind() != io::ErrorKind::NotFound {
                log::warn!("Could not remove staging file {}: {}", path.display(), e);
            }
        }
    }
}
