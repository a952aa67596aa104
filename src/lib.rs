//! LED Matrix Studio - 16x16 LED matrix animations for EEPROM-driven displays.
//!
//! A 16x16 panel is driven by four 8x8 LED matrices, each fed by its own
//! EEPROM. This crate models an animation as a sequence of binary frames and
//! encodes it into the four per-quadrant EEPROM images that hardware reads.
//!
//! # Architecture
//!
//! - `schema`: Grid, frame, export configuration and project documents
//! - `compute`: Grid transforms, the bit-level encoder and loop export
//! - `editor`: Reducer-style editor state and playback timing
//! - `sink`: Persisting exported images to folders or `.lmsb` bundles
//!
//! # Example
//!
//! ```rust,no_run
//! use led_matrix_studio::{
//!     compute::{export_loop, file_stem},
//!     schema::{Frame, Project, Shape},
//!     sink::{BinarySink, FolderSink},
//! };
//!
//! let mut project = Project::new("Heart Beat");
//! project.frames = vec![
//!     Frame::new(Shape::Heart.generate(), 200),
//!     Frame::new(Shape::Circle.generate(), 200),
//! ];
//!
//! let images = export_loop(&project.frames, &project.export_config).unwrap();
//! let stem = file_stem(&project.name);
//!
//! let mut sink = FolderSink::new(format!("{stem}_binaries"));
//! let report = sink.write(&images.into_named_buffers(&stem)).unwrap();
//! println!("{report}");
//! ```

pub mod compute;
pub mod editor;
pub mod schema;
pub mod sink;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use compute::{NamedBuffer, QuadrantImages, encode_frame, export_loop};
pub use editor::{EditAction, EditorState};
pub use schema::{ExportConfig, Frame, Grid, Pixel, Project};
