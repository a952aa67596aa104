//! Binary format definitions for LED Matrix Studio bundles.

use std::io::{self, Read, Write};

/// Magic bytes identifying a bundle file.
pub const BUNDLE_MAGIC: &[u8; 4] = b"LMSB";

/// Current format version.
pub const BUNDLE_VERSION: u16 = 1;

/// Compression type for entry data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum CompressionType {
    /// Entries stored as-is.
    #[default]
    None = 0,
    /// LZ4 block compression with prepended size.
    Lz4 = 1,
}

impl CompressionType {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(CompressionType::None),
            1 => Some(CompressionType::Lz4),
            _ => None,
        }
    }

    /// Whether this build can read and write the compression type.
    pub fn is_supported(self) -> bool {
        match self {
            CompressionType::None => true,
            CompressionType::Lz4 => cfg!(feature = "lz4"),
        }
    }
}

/// File header for the bundle format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleHeader {
    pub compression: CompressionType,
    /// Number of entries in the index table.
    pub entry_count: u32,
    /// Byte offset of the index table from the start of the file.
    pub index_offset: u64,
}

impl BundleHeader {
    /// Size of header in bytes.
    /// Magic(4) + Version(2) + Flags(2) + EntryCount(4) + IndexOffset(8) + Reserved(8) = 28
    pub const SIZE: usize = 28;

    /// Write header to output.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(BUNDLE_MAGIC)?;
        w.write_all(&BUNDLE_VERSION.to_le_bytes())?;
        w.write_all(&(self.compression as u16).to_le_bytes())?;
        w.write_all(&self.entry_count.to_le_bytes())?;
        w.write_all(&self.index_offset.to_le_bytes())?;
        // Reserved bytes
        w.write_all(&[0u8; 8])?;
        Ok(())
    }

    /// Read header from input.
    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if &magic != BUNDLE_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Invalid LMSB magic bytes",
            ));
        }

        let mut buf2 = [0u8; 2];
        let mut buf4 = [0u8; 4];
        let mut buf8 = [0u8; 8];

        r.read_exact(&mut buf2)?;
        let version = u16::from_le_bytes(buf2);
        if version != BUNDLE_VERSION {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unsupported LMSB version: {}", version),
            ));
        }

        r.read_exact(&mut buf2)?;
        let flags = u16::from_le_bytes(buf2);
        let compression = CompressionType::from_u8((flags & 0x0F) as u8).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unknown LMSB compression flags: {:#06x}", flags),
            )
        })?;

        r.read_exact(&mut buf4)?;
        let entry_count = u32::from_le_bytes(buf4);

        r.read_exact(&mut buf8)?;
        let index_offset = u64::from_le_bytes(buf8);

        // Skip reserved bytes
        r.read_exact(&mut buf8)?;

        Ok(Self {
            compression,
            entry_count,
            index_offset,
        })
    }
}

/// Index entry for a single stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
    pub name: String,
    /// Byte offset from start of file.
    pub offset: u64,
    /// Stored (possibly compressed) size in bytes.
    pub size: u64,
    /// Size after decompression.
    pub raw_size: u64,
}

impl BundleEntry {
    /// Encoded size of this entry in the index table.
    pub fn encoded_len(&self) -> usize {
        2 + self.name.len() + 24
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let name_len = u16::try_from(self.name.len()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Entry name too long: {} bytes", self.name.len()),
            )
        })?;
        w.write_all(&name_len.to_le_bytes())?;
        w.write_all(self.name.as_bytes())?;
        w.write_all(&self.offset.to_le_bytes())?;
        w.write_all(&self.size.to_le_bytes())?;
        w.write_all(&self.raw_size.to_le_bytes())?;
        Ok(())
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut buf2 = [0u8; 2];
        let mut buf8 = [0u8; 8];

        r.read_exact(&mut buf2)?;
        let mut name = vec![0u8; u16::from_le_bytes(buf2) as usize];
        r.read_exact(&mut name)?;
        let name = String::from_utf8(name)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        r.read_exact(&mut buf8)?;
        let offset = u64::from_le_bytes(buf8);

        r.read_exact(&mut buf8)?;
        let size = u64::from_le_bytes(buf8);

        r.read_exact(&mut buf8)?;
        let raw_size = u64::from_le_bytes(buf8);

        Ok(Self {
            name,
            offset,
            size,
            raw_size,
        })
    }
}

/// Compress data using LZ4.
#[cfg(feature = "lz4")]
pub fn compress_lz4(data: &[u8]) -> io::Result<Vec<u8>> {
    Ok(lz4_flex::compress_prepend_size(data))
}

/// Decompress LZ4 data.
#[cfg(feature = "lz4")]
pub fn decompress_lz4(data: &[u8]) -> io::Result<Vec<u8>> {
    lz4_flex::decompress_size_prepended(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(not(feature = "lz4"))]
pub fn compress_lz4(_data: &[u8]) -> io::Result<Vec<u8>> {
    Err(lz4_unsupported())
}

#[cfg(not(feature = "lz4"))]
pub fn decompress_lz4(_data: &[u8]) -> io::Result<Vec<u8>> {
    Err(lz4_unsupported())
}

#[cfg(not(feature = "lz4"))]
fn lz4_unsupported() -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        "LZ4 bundle support is not compiled in (enable the `lz4` feature)",
    )
}
