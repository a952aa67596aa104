//! Schema module - Data model for LED matrix animation projects.

mod config;
mod frame;
mod grid;
mod project;
mod shape;

pub use config::*;
pub use frame::*;
pub use grid::*;
pub use project::*;
pub use shape::*;
