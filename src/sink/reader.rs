//! Bundle reader for unpacking `.lmsb` files.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use super::format::{BundleEntry, BundleHeader, CompressionType, decompress_lz4};
use crate::compute::NamedBuffer;

/// Reader for bundle files.
///
/// Usage:
/// ```ignore
/// let mut reader = BundleReader::open("blink.lmsb")?;
/// for entry in reader.entries() {
///     println!("{} ({} bytes)", entry.name, entry.raw_size);
/// }
/// let top_left = reader.read("blink_TL.bin")?;
/// ```
pub struct BundleReader<R> {
    reader: R,
    header: BundleHeader,
    entries: Vec<BundleEntry>,
}

impl BundleReader<BufReader<File>> {
    /// Open a bundle file.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Self::new(BufReader::new(File::open(path)?))
    }
}

impl<R: Read + Seek> BundleReader<R> {
    /// Read the header and index table from `reader`.
    pub fn new(mut reader: R) -> io::Result<Self> {
        let header = BundleHeader::read_from(&mut reader)?;

        let len = reader.seek(SeekFrom::End(0))?;
        if header.index_offset < BundleHeader::SIZE as u64 || header.index_offset > len {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Bundle index offset {} out of range", header.index_offset),
            ));
        }

        reader.seek(SeekFrom::Start(header.index_offset))?;
        let mut entries = Vec::with_capacity(header.entry_count.min(1024) as usize);
        for _ in 0..header.entry_count {
            let entry = BundleEntry::read_from(&mut reader)?;
            if entry.offset.saturating_add(entry.size) > header.index_offset {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Bundle entry '{}' overlaps the index table", entry.name),
                ));
            }
            entries.push(entry);
        }

        Ok(Self {
            reader,
            header,
            entries,
        })
    }

    pub fn header(&self) -> &BundleHeader {
        &self.header
    }

    pub fn entries(&self) -> &[BundleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read an entry by position in the index table.
    pub fn read_index(&mut self, index: usize) -> io::Result<Vec<u8>> {
        let entry = self.entries.get(index).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "Entry index {} out of range ({} entries)",
                    index,
                    self.entries.len()
                ),
            )
        })?;
        self.read_entry(&entry)
    }

    /// Read an entry by file name.
    pub fn read(&mut self, name: &str) -> io::Result<Vec<u8>> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.name == name)
            .cloned()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("No entry named '{}' in bundle", name),
                )
            })?;
        self.read_entry(&entry)
    }

    /// Read every entry, in index order.
    pub fn read_all(&mut self) -> io::Result<Vec<NamedBuffer>> {
        let entries = self.entries.clone();
        entries
            .iter()
            .map(|entry| {
                Ok(NamedBuffer {
                    file_name: entry.name.clone(),
                    data: self.read_entry(entry)?,
                })
            })
            .collect()
    }

    fn read_entry(&mut self, entry: &BundleEntry) -> io::Result<Vec<u8>> {
        self.reader.seek(SeekFrom::Start(entry.offset))?;

        // Read compressed/raw data
        let mut data = vec![0u8; entry.size as usize];
        self.reader.read_exact(&mut data)?;

        // Decompress if needed
        let raw = match self.header.compression {
            CompressionType::None => data,
            CompressionType::Lz4 => decompress_lz4(&data)?,
        };

        if raw.len() as u64 != entry.raw_size {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Entry '{}' size mismatch: {} bytes vs {} expected",
                    entry.name,
                    raw.len(),
                    entry.raw_size
                ),
            ));
        }
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::export_loop;
    use crate::schema::{ExportConfig, Frame, Shape};
    use crate::sink::{BinarySink, BundleSink, bundle_bytes};
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn test_export_bundle_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("heart.lmsb");

        let frames = vec![
            Frame::new(Shape::Heart.generate(), 100),
            Frame::new(Shape::Circle.generate(), 100),
        ];
        let config = ExportConfig {
            loop_size: 5,
            ..ExportConfig::default()
        };
        let buffers = export_loop(&frames, &config)
            .unwrap()
            .into_named_buffers("heart");

        BundleSink::new(&path).write(&buffers).unwrap();

        let mut reader = BundleReader::open(&path).unwrap();
        assert_eq!(reader.len(), 4);
        assert_eq!(reader.entries()[2].name, "heart_BL.bin");
        assert_eq!(reader.read_all().unwrap(), buffers);
        assert_eq!(reader.read_index(3).unwrap(), buffers[3].data);
    }

    #[test]
    fn test_missing_entry() {
        let bytes = bundle_bytes(&[], CompressionType::None).unwrap();
        let mut reader = BundleReader::new(Cursor::new(bytes)).unwrap();
        assert!(reader.is_empty());
        assert_eq!(reader.read("nope.bin").unwrap_err().kind(), io::ErrorKind::NotFound);
        assert!(reader.read_index(0).is_err());
    }

    #[test]
    fn test_truncated_bundle_rejected() {
        let buffers = vec![NamedBuffer {
            file_name: "a.bin".to_string(),
            data: vec![7; 32],
        }];
        let mut bytes = bundle_bytes(&buffers, CompressionType::None).unwrap();
        bytes.truncate(BundleHeader::SIZE + 10);
        assert!(BundleReader::new(Cursor::new(bytes)).is_err());
    }
}
