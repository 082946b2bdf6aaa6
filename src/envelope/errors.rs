use super::FormatTag;
use crate::util::hex_prefix;

/// Error type for envelope and compression operations
#[derive(Debug)]
pub struct EnvelopeError {
    kind: EnvelopeErrorKind,
}

impl EnvelopeError {
    /// Return the specific type of error
    pub fn kind(&self) -> &EnvelopeErrorKind {
        &self.kind
    }

    /// Status code reported by the native codec, if the failure came from it
    pub fn native_status(&self) -> Option<i64> {
        match self.kind {
            EnvelopeErrorKind::DecodeFailed { status, .. } => Some(status),
            EnvelopeErrorKind::EncodeFailed { status } => Some(status),
            _ => None,
        }
    }
}

impl From<EnvelopeErrorKind> for EnvelopeError {
    fn from(kind: EnvelopeErrorKind) -> Self {
        EnvelopeError { kind }
    }
}

impl From<std::io::Error> for EnvelopeError {
    fn from(error: std::io::Error) -> Self {
        EnvelopeError {
            kind: EnvelopeErrorKind::Io(error),
        }
    }
}

/// Which of the two header lengths disagreed with the data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthField {
    Compressed,
    Uncompressed,
}

/// Specific kind of envelope error
#[derive(Debug)]
pub enum EnvelopeErrorKind {
    /// Fewer bytes than the largest possible header
    HeaderTooShort { len: usize },

    /// The magic is not one of the known values for its position
    UnknownMagic([u8; 3]),

    /// The format byte does not map onto a known format
    UnknownFormat(u8),

    /// The format byte does not belong to the magic it is paired with
    MagicMismatch { magic: [u8; 3], format: u8 },

    /// The file ends before the payload the header describes
    Truncated { expected: usize, actual: usize },

    /// A decompressed length disagrees with the header
    LengthMismatch {
        field: LengthField,
        expected: usize,
        actual: usize,
    },

    /// Inflate or deflate stream failure
    Io(std::io::Error),

    /// The native codec returned an error status or too little data
    DecodeFailed { status: i64, expected: usize },

    /// The header asks for an output buffer that cannot be backed by the
    /// compressed data or by memory
    OutputTooLarge { expected: usize, compressed: usize },

    /// The native codec produced no data
    EncodeFailed { status: i64 },

    /// Nothing to compress
    EmptyInput,

    /// A backend was asked to handle a format it does not own
    UnsupportedTypeForBackend {
        backend: &'static str,
        format: FormatTag,
    },

    /// The payload does not fit in a 32-bit header length
    PayloadTooLarge(usize),

    /// An oodle save was encountered but no native library was configured
    OodleUnavailable,

    /// The native library could not be resolved or loaded
    LibraryUnavailable(String),
}

impl std::error::Error for EnvelopeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            EnvelopeErrorKind::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            EnvelopeErrorKind::HeaderTooShort { len } => {
                write!(f, "file too small to parse header: {} bytes", len)
            }
            EnvelopeErrorKind::UnknownMagic(magic) => {
                write!(f, "unknown magic bytes: 0x{}", hex_prefix(magic, 3))
            }
            EnvelopeErrorKind::UnknownFormat(x) => write!(f, "unknown save format: 0x{:02x}", x),
            EnvelopeErrorKind::MagicMismatch { magic, format } => write!(
                f,
                "format 0x{:02x} does not match magic 0x{}",
                format,
                hex_prefix(magic, 3)
            ),
            EnvelopeErrorKind::Truncated { expected, actual } => write!(
                f,
                "file data is incomplete, expected {} bytes, found {}",
                expected, actual
            ),
            EnvelopeErrorKind::LengthMismatch {
                field,
                expected,
                actual,
            } => {
                let field = match field {
                    LengthField::Compressed => "compressed",
                    LengthField::Uncompressed => "uncompressed",
                };
                write!(
                    f,
                    "incorrect {} length: header says {}, found {}",
                    field, expected, actual
                )
            }
            EnvelopeErrorKind::Io(err) => write!(f, "zlib error: {}", err),
            EnvelopeErrorKind::DecodeFailed { status, expected } => write!(
                f,
                "oodle decompression failed with status {} (expected {} bytes)",
                status, expected
            ),
            EnvelopeErrorKind::OutputTooLarge {
                expected,
                compressed,
            } => write!(
                f,
                "refusing a {} byte output buffer for {} compressed bytes",
                expected, compressed
            ),
            EnvelopeErrorKind::EncodeFailed { status } => {
                write!(f, "oodle compression produced no data (status {})", status)
            }
            EnvelopeErrorKind::EmptyInput => write!(f, "input data for compression is empty"),
            EnvelopeErrorKind::UnsupportedTypeForBackend { backend, format } => write!(
                f,
                "{} backend does not handle format 0x{:02x}",
                backend,
                format.value()
            ),
            EnvelopeErrorKind::PayloadTooLarge(len) => {
                write!(f, "payload of {} bytes exceeds header capacity", len)
            }
            EnvelopeErrorKind::OodleUnavailable => {
                write!(f, "oodle save encountered without a native library")
            }
            EnvelopeErrorKind::LibraryUnavailable(msg) => {
                write!(f, "native library unavailable: {}", msg)
            }
        }
    }
}
