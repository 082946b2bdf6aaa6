use std::fmt;

/// The kind of failure encountered while reading archive primitives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveErrorKind {
    /// Not enough data to read the requested primitive
    Eof,

    /// A string whose bytes could not be decoded in its declared encoding
    InvalidString,

    /// A string that decodes but would not be written back the same way
    /// (missing terminator, ascii stored as utf-16, etc)
    NonCanonicalString,

    /// A 32-bit boolean that was neither 0 nor 1
    InvalidBool(u32),

    /// An enumerated byte outside of its known range
    UnknownEnum { name: &'static str, value: u8 },
}

impl ArchiveErrorKind {
    #[inline]
    pub(crate) fn at(self, position: usize) -> ArchiveError {
        ArchiveError {
            position,
            kind: self,
        }
    }
}

/// An archive error with the byte offset it occurred at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveError {
    position: usize,
    kind: ArchiveErrorKind,
}

impl ArchiveError {
    /// Byte offset, relative to the start of the reader's slice
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn kind(&self) -> &ArchiveErrorKind {
        &self.kind
    }

    pub fn into_kind(self) -> ArchiveErrorKind {
        self.kind
    }
}

impl std::error::Error for ArchiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ArchiveErrorKind::Eof => write!(f, "not enough data to read at {}", self.position),
            ArchiveErrorKind::InvalidString => {
                write!(f, "undecodable string encountered at {}", self.position)
            }
            ArchiveErrorKind::NonCanonicalString => write!(
                f,
                "string at {} is not in its canonical encoding",
                self.position
            ),
            ArchiveErrorKind::InvalidBool(x) => {
                write!(f, "invalid boolean value {} at {}", x, self.position)
            }
            ArchiveErrorKind::UnknownEnum { name, value } => write!(
                f,
                "unknown {} value {} at {}",
                name, value, self.position
            ),
        }
    }
}
