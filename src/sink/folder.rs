//! Folder sink: one binary file per buffer.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::writer::{
    BinarySink, SinkError, SinkReport, backup_path, discard, staging_path, validate_names,
    write_file,
};
use crate::compute::NamedBuffer;

/// Writes every buffer as `<dir>/<file_name>`.
///
/// All buffers are staged next to their destination first and only renamed
/// into place once every one of them has been written. Replaced files are
/// kept as backups until the last rename succeeds and are restored if any
/// rename fails, so a failed export leaves earlier files untouched.
#[derive(Debug, Clone)]
pub struct FolderSink {
    dir: PathBuf,
}

impl FolderSink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl BinarySink for FolderSink {
    fn write(&mut self, buffers: &[NamedBuffer]) -> Result<SinkReport, SinkError> {
        validate_names(buffers)?;
        fs::create_dir_all(&self.dir)?;

        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(buffers.len());
        for buffer in buffers {
            let target = self.dir.join(&buffer.file_name);
            let staging = staging_path(&target);
            if let Err(e) = write_file(&staging, &buffer.data) {
                discard(staged.into_iter().map(|(s, _)| s).chain([staging]));
                return Err(e.into());
            }
            debug!("Staged {} ({} bytes)", staging.display(), buffer.data.len());
            staged.push((staging, target));
        }

        if let Err(e) = staged.iter().try_for_each(|(_, target)| check_replaceable(target)) {
            discard(staged.into_iter().map(|(s, _)| s));
            return Err(e.into());
        }

        let mut committed: Vec<(PathBuf, Option<PathBuf>)> = Vec::with_capacity(staged.len());
        for (i, (staging, target)) in staged.iter().enumerate() {
            match replace(staging, target) {
                Ok(backup) => committed.push((target.clone(), backup)),
                Err(e) => {
                    rollback(committed);
                    discard(staged[i..].iter().map(|(s, _)| s.clone()));
                    return Err(e.into());
                }
            }
        }

        let files: Vec<PathBuf> = committed.iter().map(|(t, _)| t.clone()).collect();
        discard(committed.into_iter().filter_map(|(_, backup)| backup));

        let bytes: u64 = buffers.iter().map(|b| b.data.len() as u64).sum();
        info!("Wrote {} files to {}", files.len(), self.dir.display());

        Ok(SinkReport {
            files,
            payload_bytes: bytes,
            written_bytes: bytes,
        })
    }
}

/// Fail unless `target` is absent or a plain file.
fn check_replaceable(target: &Path) -> io::Result<()> {
    match fs::symlink_metadata(target) {
        Ok(meta) if !meta.is_file() => Err(io::Error::other(format!(
            "{} exists and is not a regular file",
            target.display()
        ))),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Move `staging` onto `target`, returning where the old `target` went.
fn replace(staging: &Path, target: &Path) -> io::Result<Option<PathBuf>> {
    let backup = if fs::symlink_metadata(target).is_ok() {
        let backup = backup_path(target);
        fs::rename(target, &backup)?;
        Some(backup)
    } else {
        None
    };

    if let Err(e) = fs::rename(staging, target) {
        if let Some(backup) = &backup {
            restore(backup, target);
        }
        return Err(e);
    }
    Ok(backup)
}

/// Undo completed replacements, newest first.
fn rollback(committed: Vec<(PathBuf, Option<PathBuf>)>) {
    for (target, backup) in committed.into_iter().rev() {
        match backup {
            Some(backup) => restore(&backup, &target),
            None => discard([target]),
        }
    }
}

fn restore(backup: &Path, target: &Path) {
    if let Err(e) = fs::rename(backup, target) {
        warn!(
            "Could not restore {} from {}: {}",
            target.display(),
            backup.display(),
            e
        );
    }
}
