//! Compute module - Grid transforms and the EEPROM encoding pipeline.

mod encoder;
mod export;
mod quadrant;
pub mod transform;

pub use encoder::*;
pub use export::*;
pub use quadrant::*;
pub use transform::Direction;
