use crate::envelope::{EnvelopeError, EnvelopeErrorKind, FormatTag, LengthField, SaveHeader};
use crate::util::hex_prefix;
use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};
use std::io::{Read, Write};

/// Upper bound on buffer preallocation driven by untrusted header lengths
const MAX_PREALLOCATION: usize = 64 * 1024 * 1024;

fn deflate(data: &[u8], level: Compression) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), level);
    encoder.write_all(data)?;
    encoder.finish()
}

fn inflate(data: &[u8], size_hint: usize) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(size_hint.min(MAX_PREALLOCATION));
    ZlibDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}

fn check_len(field: LengthField, expected: u32, actual: usize) -> Result<(), EnvelopeError> {
    if expected as usize != actual {
        return Err(EnvelopeErrorKind::LengthMismatch {
            field,
            expected: expected as usize,
            actual,
        }
        .into());
    }
    Ok(())
}

/// Zlib backend for `PlZ` saves.
///
/// The payload is deflated once, and that output is deflated again before it
/// is stored. The header's compressed length describes the first pass.
///
/// ```
/// use palsav::compression::ZlibBackend;
/// use palsav::envelope::FormatTag;
///
/// let backend = ZlibBackend::new();
/// let (header, stored) = backend.compress(b"GVAS payload", FormatTag::Zlib)?;
/// assert_eq!(header.uncompressed_len(), 12);
///
/// let payload = backend.inflate_payload(&stored, &header)?;
/// assert_eq!(payload, b"GVAS payload");
/// # Ok::<(), palsav::envelope::EnvelopeError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ZlibBackend {
    level: Compression,
}

impl Default for ZlibBackend {
    fn default() -> Self {
        ZlibBackend::new()
    }
}

impl ZlibBackend {
    /// Creates a backend at the zlib default level
    pub fn new() -> Self {
        ZlibBackend::with_level(6)
    }

    /// Creates a backend at the given level (0-9)
    pub fn with_level(level: u32) -> Self {
        ZlibBackend {
            level: Compression::new(level.min(9)),
        }
    }

    pub fn level(&self) -> u32 {
        self.level.level()
    }

    /// Compresses a payload, returning the header that describes it and the
    /// bytes to store after the header
    pub fn compress(
        &self,
        payload: &[u8],
        format: FormatTag,
    ) -> Result<(SaveHeader, Vec<u8>), EnvelopeError> {
        if format != FormatTag::Zlib {
            return Err(EnvelopeErrorKind::UnsupportedTypeForBackend {
                backend: "zlib",
                format,
            }
            .into());
        }

        let uncompressed_len = u32::try_from(payload.len())
            .map_err(|_| EnvelopeErrorKind::PayloadTooLarge(payload.len()))?;

        let first = deflate(payload, self.level)?;
        let compressed_len = u32::try_from(first.len())
            .map_err(|_| EnvelopeErrorKind::PayloadTooLarge(first.len()))?;
        let stored = deflate(&first, self.level)?;

        log::debug!(
            "zlib compressed {} bytes to {} (stored {}): {}",
            uncompressed_len,
            compressed_len,
            stored.len(),
            hex_prefix(&stored, 32)
        );

        let header = SaveHeader::new(uncompressed_len, compressed_len, format);
        Ok((header, stored))
    }

    /// Decompresses a whole save file whose header has already been parsed
    pub fn decompress(&self, data: &[u8], header: &SaveHeader) -> Result<Vec<u8>, EnvelopeError> {
        let stored = data
            .get(header.data_offset()..)
            .ok_or(EnvelopeErrorKind::Truncated {
                expected: header.data_offset(),
                actual: data.len(),
            })?;
        self.inflate_payload(stored, header)
    }

    /// Decompresses the bytes stored after a header.
    ///
    /// `PlZ` payloads are inflated twice. A payload tagged as chunked is
    /// inflated a single time.
    pub fn inflate_payload(
        &self,
        stored: &[u8],
        header: &SaveHeader,
    ) -> Result<Vec<u8>, EnvelopeError> {
        let uncompressed_len = header.uncompressed_len();
        let payload = match header.format() {
            FormatTag::Zlib => {
                let first = inflate(stored, header.compressed_len() as usize)?;
                check_len(LengthField::Compressed, header.compressed_len(), first.len())?;
                inflate(&first, uncompressed_len as usize)?
            }
            FormatTag::Chunked => inflate(stored, uncompressed_len as usize)?,
            format => {
                return Err(EnvelopeErrorKind::UnsupportedTypeForBackend {
                    backend: "zlib",
                    format,
                }
                .into())
            }
        };

        check_len(LengthField::Uncompressed, uncompressed_len, payload.len())?;
        log::debug!(
            "zlib decompressed {} stored bytes to {}",
            stored.len(),
            payload.len()
        );
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn double_deflate_roundtrip(data: Vec<u8>) -> bool {
        let backend = ZlibBackend::new();
        let (header, stored) = backend.compress(&data, FormatTag::Zlib).unwrap();
        let first = deflate(&data, Compression::new(6)).unwrap();
        header.compressed_len() as usize == first.len()
            && backend.inflate_payload(&stored, &header).unwrap() == data
    }

    #[test]
    fn test_compressed_len_is_first_pass() {
        let data = vec![b'a'; 4096];
        let (header, stored) = ZlibBackend::new().compress(&data, FormatTag::Zlib).unwrap();
        let first = inflate(&stored, 0).unwrap();
        assert_eq!(header.compressed_len() as usize, first.len());
        assert_eq!(inflate(&first, 0).unwrap(), data);
    }

    #[test]
    fn test_compressed_len_mismatch() {
        let backend = ZlibBackend::new();
        let (header, stored) = backend.compress(b"hello world", FormatTag::Zlib).unwrap();
        let bad = SaveHeader::new(
            header.uncompressed_len(),
            header.compressed_len() + 1,
            FormatTag::Zlib,
        );
        let err = backend.inflate_payload(&stored, &bad).unwrap_err();
        assert!(matches!(
            err.kind(),
            EnvelopeErrorKind::LengthMismatch {
                field: LengthField::Compressed,
                ..
            }
        ));
    }

    #[test]
    fn test_uncompressed_len_mismatch() {
        let backend = ZlibBackend::new();
        let (header, stored) = backend.compress(b"hello world", FormatTag::Zlib).unwrap();
        let bad = SaveHeader::new(100, header.compressed_len(), FormatTag::Zlib);
        let err = backend.inflate_payload(&stored, &bad).unwrap_err();
        assert!(matches!(
            err.kind(),
            EnvelopeErrorKind::LengthMismatch {
                field: LengthField::Uncompressed,
                expected: 100,
                actual: 11,
            }
        ));
    }

    #[test]
    fn test_chunked_single_inflate() {
        let data = b"single pass payload";
        let stored = deflate(data, Compression::default()).unwrap();
        let header = SaveHeader::new(data.len() as u32, stored.len() as u32, FormatTag::Chunked);
        let actual = ZlibBackend::new().inflate_payload(&stored, &header).unwrap();
        assert_eq!(actual, data);
    }

    #[test]
    fn test_rejects_oodle() {
        let err = ZlibBackend::new()
            .compress(b"data", FormatTag::Oodle)
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            EnvelopeErrorKind::UnsupportedTypeForBackend {
                backend: "zlib",
                format: FormatTag::Oodle
            }
        ));
    }

    #[test]
    fn test_corrupt_stream() {
        let header = SaveHeader::new(10, 10, FormatTag::Zlib);
        let err = ZlibBackend::new()
            .inflate_payload(&[0xde, 0xad, 0xbe, 0xef], &header)
            .unwrap_err();
        assert!(matches!(err.kind(), EnvelopeErrorKind::Io(_)));
    }
}
