//! The two interchangeable payload codecs, selected by [`FormatTag`].
//!
//! - [`ZlibBackend`]: zlib applied twice, for `PlZ` saves
//! - [`OodleBackend`]: a native codec reached through an [`OodleLibrary`],
//!   for `PlM` saves
//!
//! Neither backend falls back to the other. Asking a backend to compress a
//! format it does not own is reported as
//! [`EnvelopeErrorKind::UnsupportedTypeForBackend`](crate::envelope::EnvelopeErrorKind::UnsupportedTypeForBackend).
//!
//! [`FormatTag`]: crate::envelope::FormatTag

mod oodle;
#[cfg(feature = "ooz")]
mod ooz;
mod zlib;

pub use oodle::*;
#[cfg(feature = "ooz")]
pub use ooz::*;
pub use zlib::*;

/// Oodle compressor identifiers understood by the native library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OodleCompressor {
    Kraken,
    #[default]
    Mermaid,
    Selkie,
    /// Not implemented by the open source decoder
    Hydra,
    Leviathan,
}

impl OodleCompressor {
    pub const fn value(&self) -> i32 {
        match self {
            OodleCompressor::Kraken => 8,
            OodleCompressor::Mermaid => 9,
            OodleCompressor::Selkie => 11,
            OodleCompressor::Hydra => 12,
            OodleCompressor::Leviathan => 13,
        }
    }
}

/// Oodle compression levels, from fastest to smallest output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OodleLevel {
    HyperFast4,
    HyperFast3,
    HyperFast2,
    HyperFast1,
    SuperFast,
    VeryFast,
    Fast,
    #[default]
    Normal,
    Optimal1,
    Optimal2,
    Optimal3,
    Optimal4,
    Optimal5,
}

impl OodleLevel {
    pub const fn value(&self) -> i32 {
        match self {
            OodleLevel::HyperFast4 => -4,
            OodleLevel::HyperFast3 => -3,
            OodleLevel::HyperFast2 => -2,
            OodleLevel::HyperFast1 => -1,
            OodleLevel::SuperFast => 1,
            OodleLevel::VeryFast => 2,
            OodleLevel::Fast => 3,
            OodleLevel::Normal => 4,
            OodleLevel::Optimal1 => 5,
            OodleLevel::Optimal2 => 6,
            OodleLevel::Optimal3 => 7,
            OodleLevel::Optimal4 => 8,
            OodleLevel::Optimal5 => 9,
        }
    }
}
