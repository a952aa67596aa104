//! Persistence of exported EEPROM images.
//!
//! Every backend implements [`BinarySink`]: a set of named byte buffers is
//! either written completely or not at all.
//!
//! - [`FolderSink`] writes one `.bin` file per quadrant into a directory.
//! - [`BundleSink`] packs all buffers into a single `.lmsb` file that
//!   [`BundleReader`] can unpack again.
//!
//! # Bundle Format
//!
//! ```text
//! Header (28 bytes):
//!   Magic: "LMSB" (4 bytes)
//!   Version: u16
//!   Flags: u16 (compression)
//!   Entry count: u32
//!   Index offset: u64
//!   Reserved: 8 bytes
//!
//! Entry data (variable):
//!   Each entry's bytes, optionally LZ4 compressed
//!
//! Index table (entry_count entries):
//!   Name length: u16
//!   Name: UTF-8 bytes
//!   Offset: u64
//!   Stored size: u64
//!   Raw size: u64
//! ```
//!
//! All integers are little-endian.

mod bundle;
mod folder;
mod format;
mod reader;
mod writer;

pub use bundle::{BundleSink, bundle_bytes, write_bundle};
pub use folder::FolderSink;
pub use format::{BUNDLE_MAGIC, BUNDLE_VERSION, BundleEntry, BundleHeader, CompressionType};
pub use reader::BundleReader;
pub use writer::{BinarySink, SinkError, SinkReport, validate_names};
