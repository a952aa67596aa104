//! Bundle sink: every buffer packed into a single `.lmsb` file.

use std::fs::{self, File};
use std::io::{self, BufWriter, Cursor, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::format::{BundleEntry, BundleHeader, CompressionType, compress_lz4};
use super::writer::{BinarySink, SinkError, SinkReport, discard, staging_path, validate_names};
use crate::compute::NamedBuffer;

/// Writes all buffers into one bundle file.
///
/// Usage:
/// ```ignore
/// let images = export_loop(&project.frames, &project.export_config)?;
/// let mut sink = BundleSink::new("blink.lmsb");
/// sink.write(&images.into_named_buffers("blink"))?;
/// ```
#[derive(Debug, Clone)]
pub struct BundleSink {
    path: PathBuf,
    compression: CompressionType,
}

impl BundleSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            compression: CompressionType::None,
        }
    }

    /// Request a compression type.
    ///
    /// Types this build cannot produce fall back to [`CompressionType::None`].
    pub fn with_compression(mut self, compression: CompressionType) -> Self {
        self.compression = if compression.is_supported() {
            compression
        } else {
            warn!("{:?} compression unavailable, storing bundle uncompressed", compression);
            CompressionType::None
        };
        self
    }

    pub fn compression(&self) -> CompressionType {
        self.compression
    }
}

impl BinarySink for BundleSink {
    fn write(&mut self, buffers: &[NamedBuffer]) -> Result<SinkReport, SinkError> {
        validate_names(buffers)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let staging = staging_path(&self.path);
        let written = match write_bundle_file(&staging, buffers, self.compression) {
            Ok(written) => written,
            Err(e) => {
                discard([staging]);
                return Err(e.into());
            }
        };
        if let Err(e) = fs::rename(&staging, &self.path) {
            discard([staging]);
            return Err(e.into());
        }

        info!(
            "Wrote bundle {} ({} entries, {} bytes)",
            self.path.display(),
            buffers.len(),
            written
        );

        Ok(SinkReport {
            files: vec![self.path.clone()],
            payload_bytes: buffers.iter().map(|b| b.data.len() as u64).sum(),
            written_bytes: written,
        })
    }
}

fn write_bundle_file(
    path: &Path,
    buffers: &[NamedBuffer],
    compression: CompressionType,
) -> io::Result<u64> {
    let mut writer = BufWriter::new(File::create(path)?);
    let written = write_bundle(&mut writer, buffers, compression)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(written)
}

/// Write a complete bundle to `w`, returning its size in bytes.
///
/// Layout: header, entry data, index table. The header is written first as a
/// placeholder and rewritten once the index offset is known.
pub fn write_bundle<W: Write + Seek>(
    w: &mut W,
    buffers: &[NamedBuffer],
    compression: CompressionType,
) -> io::Result<u64> {
    let start = w.stream_position()?;
    let entry_count = u32::try_from(buffers.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "Too many bundle entries"))?;

    let mut header = BundleHeader {
        compression,
        entry_count,
        index_offset: 0,
    };

    // Write placeholder header
    header.write_to(w)?;

    let mut entries = Vec::with_capacity(buffers.len());
    for buffer in buffers {
        let offset = w.stream_position()? - start;
        let size = match compression {
            CompressionType::None => {
                w.write_all(&buffer.data)?;
                buffer.data.len()
            }
            CompressionType::Lz4 => {
                let compressed = compress_lz4(&buffer.data)?;
                w.write_all(&compressed)?;
                compressed.len()
            }
        };
        entries.push(BundleEntry {
            name: buffer.file_name.clone(),
            offset,
            size: size as u64,
            raw_size: buffer.data.len() as u64,
        });
    }

    // Index table follows the entry data
    header.index_offset = w.stream_position()? - start;
    for entry in &entries {
        entry.write_to(w)?;
    }
    let end = w.stream_position()?;

    // Seek back and rewrite header
    w.seek(SeekFrom::Start(start))?;
    header.write_to(w)?;
    w.seek(SeekFrom::Start(end))?;

    Ok(end - start)
}

/// Encode a bundle in memory.
pub fn bundle_bytes(buffers: &[NamedBuffer], compression: CompressionType) -> Result<Vec<u8>, SinkError> {
    validate_names(buffers)?;
    let mut cursor = Cursor::new(Vec::new());
    write_bundle(&mut cursor, buffers, compression)?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::BundleReader;
    use tempfile::tempdir;

    fn buffers() -> Vec<NamedBuffer> {
        vec![
            NamedBuffer {
                file_name: "x_TL.bin".to_string(),
                data: vec![0x80; 24],
            },
            NamedBuffer {
                file_name: "x_TR.bin".to_string(),
                data: vec![0x00, 0x01, 0x02],
            },
        ]
    }

    #[test]
    fn test_bundle_layout() {
        let bytes = bundle_bytes(&buffers(), CompressionType::None).unwrap();
        let header = BundleHeader::read_from(&mut Cursor::new(&bytes)).unwrap();

        assert_eq!(header.entry_count, 2);
        assert_eq!(header.index_offset as usize, BundleHeader::SIZE + 24 + 3);
        assert_eq!(&bytes[BundleHeader::SIZE..BundleHeader::SIZE + 3], &[0x80, 0x80, 0x80]);
    }

    #[test]
    fn test_sink_writes_readable_bundle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("x.lmsb");

        let mut sink = BundleSink::new(&path);
        let report = sink.write(&buffers()).unwrap();
        assert_eq!(report.files, vec![path.clone()]);
        assert_eq!(report.payload_bytes, 27);
        assert_eq!(report.written_bytes, fs::metadata(&path).unwrap().len());

        let mut reader = BundleReader::open(&path).unwrap();
        assert_eq!(reader.read("x_TR.bin").unwrap(), vec![0x00, 0x01, 0x02]);
        assert!(!staging_path(&path).exists());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut dup = buffers();
        dup[1].file_name = dup[0].file_name.clone();
        assert!(matches!(
            bundle_bytes(&dup, CompressionType::None),
            Err(SinkError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_unsupported_compression_falls_back() {
        let sink = BundleSink::new("unused.lmsb").with_compression(CompressionType::Lz4);
        if cfg!(feature = "lz4") {
            assert_eq!(sink.compression(), CompressionType::Lz4);
        } else {
            assert_eq!(sink.compression(), CompressionType::None);
        }
    }

    #[cfg(feature = "lz4")]
    #[test]
    fn test_lz4_bundle_roundtrip() {
        let data = vec![0xFFu8; 4096];
        let buffers = vec![NamedBuffer {
            file_name: "big_TL.bin".to_string(),
            data: data.clone(),
        }];
        let bytes = bundle_bytes(&buffers, CompressionType::Lz4).unwrap();
        assert!(bytes.len() < data.len());

        let mut reader = BundleReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.read("big_TL.bin").unwrap(), data);
    }
}
