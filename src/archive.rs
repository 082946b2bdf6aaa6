//! Byte-precise primitives for the archive that hosts raw records.
//!
//! Only the slice of the property archive grammar that raw records are built
//! from lives here: little endian scalars, length prefixed strings, 128-bit
//! identifiers, fixed length byte lists and counted arrays. Readers are
//! always bound to a borrowed slice, so a nested decode can never observe
//! bytes outside of the blob it was handed.

mod errors;
mod guid;
mod reader;
mod writer;

pub use errors::*;
pub use guid::*;
pub use reader::*;
pub use writer::*;

/// A three component vector as stored by the engine (64-bit floats)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}
