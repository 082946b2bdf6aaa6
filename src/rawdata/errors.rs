use super::RawDataKind;
use std::fmt;

/// An integrity fault raised while converting raw records.
///
/// Ordinary decode failures never surface here: they degrade to
/// [`Decoded::Fallback`](super::Decoded::Fallback). Only record kinds that
/// treat leftover bytes as a contradiction, and property trees missing the
/// tag a rule depends on, are reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDataError {
    kind: RawDataErrorKind,
}

impl RawDataError {
    /// Return the specific type of error
    pub fn kind(&self) -> &RawDataErrorKind {
        &self.kind
    }
}

impl From<RawDataErrorKind> for RawDataError {
    fn from(kind: RawDataErrorKind) -> Self {
        RawDataError { kind }
    }
}

/// Specific kind of raw data error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDataErrorKind {
    /// A structured decode succeeded but left bytes behind
    TrailingData {
        kind: RawDataKind,
        tag: String,
        remaining: usize,
    },

    /// A rule's type tag could not be found next to the blob
    MissingTag { kind: RawDataKind, path: String },
}

impl std::error::Error for RawDataError {}

impl fmt::Display for RawDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RawDataErrorKind::TrailingData {
                kind,
                tag,
                remaining,
            } => write!(
                f,
                "EOF not reached for {} {}: {} bytes remain",
                kind, tag, remaining
            ),
            RawDataErrorKind::MissingTag { kind, path } => {
                write!(f, "no type tag for {} at {}", kind, path)
            }
        }
    }
}
