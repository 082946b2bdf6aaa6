use super::{OodleCompressor, OodleLevel};
use crate::envelope::{EnvelopeError, EnvelopeErrorKind, FormatTag, SaveHeader};

/// Extra bytes the native decoder may scribble past the logical output end
pub const SAFE_PADDING: usize = 128;

/// Headroom given to the native encoder beyond the input length
const COMPRESS_HEADROOM: usize = 64 * 1024;

/// Largest uncompressed to compressed ratio accepted from a header
const MAX_EXPANSION: usize = 1024;

/// The raw surface of a native oodle implementation.
///
/// Both methods mirror the C calling convention: a non-negative return is
/// the number of bytes written into `dst`, anything else is a failure
/// status. Implementations must not write beyond `dst`.
pub trait OodleLibrary: Send + Sync {
    /// Compresses `src` into `dst`
    fn compress(
        &self,
        compressor: OodleCompressor,
        src: &[u8],
        dst: &mut [u8],
        level: OodleLevel,
    ) -> i64;

    /// Decompresses `src` into `dst`, which is at least `expected_len` plus
    /// [`SAFE_PADDING`] bytes long
    fn decompress(&self, src: &[u8], dst: &mut [u8], expected_len: usize) -> i64;
}

impl<T: OodleLibrary + ?Sized> OodleLibrary for Box<T> {
    fn compress(
        &self,
        compressor: OodleCompressor,
        src: &[u8],
        dst: &mut [u8],
        level: OodleLevel,
    ) -> i64 {
        (**self).compress(compressor, src, dst, level)
    }

    fn decompress(&self, src: &[u8], dst: &mut [u8], expected_len: usize) -> i64 {
        (**self).decompress(src, dst, expected_len)
    }
}

/// Oodle backend for `PlM` saves
#[derive(Clone, Copy)]
pub struct OodleBackend<'a> {
    lib: &'a dyn OodleLibrary,
    compressor: OodleCompressor,
    level: OodleLevel,
}

impl std::fmt::Debug for OodleBackend<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OodleBackend")
            .field("compressor", &self.compressor)
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

impl<'a> OodleBackend<'a> {
    /// Creates a backend that uses Mermaid at the normal level
    pub fn new(lib: &'a dyn OodleLibrary) -> Self {
        OodleBackend {
            lib,
            compressor: OodleCompressor::default(),
            level: OodleLevel::default(),
        }
    }

    pub fn with_compressor(mut self, compressor: OodleCompressor) -> Self {
        self.compressor = compressor;
        self
    }

    pub fn with_level(mut self, level: OodleLevel) -> Self {
        self.level = level;
        self
    }

    pub fn compressor(&self) -> OodleCompressor {
        self.compressor
    }

    pub fn level(&self) -> OodleLevel {
        self.level
    }

    /// Compresses a payload, returning the header that describes it and the
    /// bytes to store after the header
    pub fn compress(
        &self,
        payload: &[u8],
        format: FormatTag,
    ) -> Result<(SaveHeader, Vec<u8>), EnvelopeError> {
        if format != FormatTag::Oodle {
            return Err(EnvelopeErrorKind::UnsupportedTypeForBackend {
                backend: "oodle",
                format,
            }
            .into());
        }

        if payload.is_empty() {
            return Err(EnvelopeErrorKind::EmptyInput.into());
        }

        let uncompressed_len = u32::try_from(payload.len())
            .map_err(|_| EnvelopeErrorKind::PayloadTooLarge(payload.len()))?;

        let mut dst = vec![0u8; payload.len() + COMPRESS_HEADROOM];
        let status = self
            .lib
            .compress(self.compressor, payload, &mut dst, self.level);
        if status <= 0 {
            return Err(EnvelopeErrorKind::EncodeFailed { status }.into());
        }

        let written = (status as usize).min(dst.len());
        dst.truncate(written);
        let compressed_len =
            u32::try_from(written).map_err(|_| EnvelopeErrorKind::PayloadTooLarge(written))?;

        log::debug!(
            "oodle {:?}/{:?} compressed {} bytes to {}",
            self.compressor,
            self.level,
            uncompressed_len,
            compressed_len
        );

        let header = SaveHeader::new(uncompressed_len, compressed_len, format);
        Ok((header, dst))
    }

    /// Decompresses a whole save file whose header has already been parsed
    pub fn decompress(&self, data: &[u8], header: &SaveHeader) -> Result<Vec<u8>, EnvelopeError> {
        let offset = header.data_offset();
        let compressed_len = header.compressed_len() as usize;
        let end = offset.saturating_add(compressed_len);
        let stored = data.get(offset..end).ok_or(EnvelopeErrorKind::Truncated {
            expected: end,
            actual: data.len(),
        })?;
        self.inflate_payload(stored, header)
    }

    /// Decompresses exactly the compressed bytes a header describes
    pub fn inflate_payload(
        &self,
        stored: &[u8],
        header: &SaveHeader,
    ) -> Result<Vec<u8>, EnvelopeError> {
        if header.format() != FormatTag::Oodle {
            return Err(EnvelopeErrorKind::UnsupportedTypeForBackend {
                backend: "oodle",
                format: header.format(),
            }
            .into());
        }

        let compressed_len = header.compressed_len() as usize;
        let src = stored
            .get(..compressed_len)
            .ok_or(EnvelopeErrorKind::Truncated {
                expected: compressed_len,
                actual: stored.len(),
            })?;

        let expected = header.uncompressed_len() as usize;
        let too_large = || EnvelopeErrorKind::OutputTooLarge {
            expected,
            compressed: compressed_len,
        };
        if expected > compressed_len.saturating_mul(MAX_EXPANSION) {
            return Err(too_large().into());
        }

        let mut dst = Vec::new();
        dst.try_reserve_exact(expected + SAFE_PADDING)
            .map_err(|_| too_large())?;
        dst.resize(expected + SAFE_PADDING, 0);
        let status = self.lib.decompress(src, &mut dst, expected);
        if status < 0 || (status as usize) < expected {
            return Err(EnvelopeErrorKind::DecodeFailed { status, expected }.into());
        }

        if status as usize > expected {
            log::warn!(
                "oodle reported {} bytes for a {} byte payload, truncating",
                status,
                expected
            );
        }

        dst.truncate(expected);
        log::debug!("oodle decompressed {} bytes to {}", src.len(), expected);
        Ok(dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::testing::IdentityLibrary;
    use rstest::*;
    use std::sync::atomic::Ordering;

    struct FailingLibrary(i64);

    impl OodleLibrary for FailingLibrary {
        fn compress(&self, _: OodleCompressor, _: &[u8], _: &mut [u8], _: OodleLevel) -> i64 {
            self.0
        }

        fn decompress(&self, _: &[u8], _: &mut [u8], _: usize) -> i64 {
            self.0
        }
    }

    #[test]
    fn test_roundtrip_through_library() {
        let lib = IdentityLibrary::default();
        let backend = OodleBackend::new(&lib);
        let (header, stored) = backend.compress(b"GVAS", FormatTag::Oodle).unwrap();
        assert_eq!(header.uncompressed_len(), 4);
        assert_eq!(header.compressed_len(), 5);
        assert_eq!(stored, b"\x09GVAS");

        let payload = backend.inflate_payload(&stored, &header).unwrap();
        assert_eq!(payload, b"GVAS");
        assert_eq!(lib.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_compressor_is_forwarded() {
        let lib = IdentityLibrary::default();
        let backend = OodleBackend::new(&lib).with_compressor(OodleCompressor::Kraken);
        let (_, stored) = backend.compress(b"x", FormatTag::Oodle).unwrap();
        assert_eq!(stored[0], 8);
    }

    #[test]
    fn test_empty_input() {
        let lib = IdentityLibrary::default();
        let err = OodleBackend::new(&lib)
            .compress(b"", FormatTag::Oodle)
            .unwrap_err();
        assert!(matches!(err.kind(), EnvelopeErrorKind::EmptyInput));
        assert_eq!(lib.calls.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    #[case(0)]
    #[case(-1)]
    fn test_encode_failure(#[case] status: i64) {
        let lib = FailingLibrary(status);
        let err = OodleBackend::new(&lib)
            .compress(b"data", FormatTag::Oodle)
            .unwrap_err();
        assert_eq!(err.native_status(), Some(status));
    }

    #[rstest]
    #[case(-1)]
    #[case(3)]
    fn test_decode_failure(#[case] status: i64) {
        let lib = FailingLibrary(status);
        let header = SaveHeader::new(10, 4, FormatTag::Oodle);
        let err = OodleBackend::new(&lib)
            .inflate_payload(b"abcd", &header)
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            EnvelopeErrorKind::DecodeFailed { expected: 10, .. }
        ));
        assert_eq!(err.native_status(), Some(status));
    }

    #[test]
    fn test_truncated_before_backend() {
        let lib = IdentityLibrary::default();
        let header = SaveHeader::new(10, 50, FormatTag::Oodle);
        let err = OodleBackend::new(&lib)
            .inflate_payload(&[0u8; 20], &header)
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            EnvelopeErrorKind::Truncated {
                expected: 50,
                actual: 20
            }
        ));
        assert_eq!(lib.calls.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    #[case(u32::MAX, 4)]
    #[case(4097, 4)]
    #[case(1, 0)]
    fn test_oversized_output_skips_native_call(#[case] uncompressed: u32, #[case] compressed: u32) {
        let lib = IdentityLibrary::default();
        let header = SaveHeader::new(uncompressed, compressed, FormatTag::Oodle);
        let err = OodleBackend::new(&lib)
            .inflate_payload(&[0u8; 4], &header)
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            EnvelopeErrorKind::OutputTooLarge { .. }
        ));
        assert_eq!(lib.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_rejects_zlib() {
        let lib = IdentityLibrary::default();
        let err = OodleBackend::new(&lib)
            .compress(b"data", FormatTag::Zlib)
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            EnvelopeErrorKind::UnsupportedTypeForBackend {
                backend: "oodle",
                ..
            }
        ));
    }
}
