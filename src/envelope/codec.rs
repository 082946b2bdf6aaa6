use super::{check_sav_format, EnvelopeError, EnvelopeErrorKind, FormatTag, SaveHeader};
use crate::compression::{OodleBackend, OodleCompressor, OodleLevel, OodleLibrary, ZlibBackend};

/// Configures and builds a [`SaveCodec`]
#[derive(Default)]
pub struct SaveCodecBuilder {
    oodle: Option<Box<dyn OodleLibrary>>,
    compressor: OodleCompressor,
    level: OodleLevel,
    zlib_level: Option<u32>,
}

impl SaveCodecBuilder {
    /// Native library used for `PlM` saves. Without one, oodle saves are
    /// rejected with [`EnvelopeErrorKind::OodleUnavailable`].
    pub fn oodle<L>(mut self, lib: L) -> Self
    where
        L: OodleLibrary + 'static,
    {
        self.oodle = Some(Box::new(lib));
        self
    }

    pub fn oodle_compressor(mut self, compressor: OodleCompressor) -> Self {
        self.compressor = compressor;
        self
    }

    pub fn oodle_level(mut self, level: OodleLevel) -> Self {
        self.level = level;
        self
    }

    /// Deflate level, 0 through 9. Defaults to 6.
    pub fn zlib_level(mut self, level: u32) -> Self {
        self.zlib_level = Some(level);
        self
    }

    pub fn build(self) -> SaveCodec {
        let zlib = self
            .zlib_level
            .map(ZlibBackend::with_level)
            .unwrap_or_default();
        SaveCodec {
            oodle: self.oodle,
            compressor: self.compressor,
            level: self.level,
            zlib,
        }
    }
}

/// Converts between save files and the payloads they carry.
///
/// The backend is chosen purely by format tag. A codec is built once and
/// can be shared across threads.
///
/// ```
/// use palsav::{FormatTag, SaveCodec};
///
/// let codec = SaveCodec::new();
/// let file = codec.compress(b"GVAS payload", FormatTag::Zlib)?;
/// assert_eq!(&file[8..12], b"PlZ2");
///
/// let (payload, format) = codec.decompress(&file)?;
/// assert_eq!(payload, b"GVAS payload");
/// assert_eq!(format, FormatTag::Zlib);
/// # Ok::<(), palsav::envelope::EnvelopeError>(())
/// ```
pub struct SaveCodec {
    oodle: Option<Box<dyn OodleLibrary>>,
    compressor: OodleCompressor,
    level: OodleLevel,
    zlib: ZlibBackend,
}

impl Default for SaveCodec {
    fn default() -> Self {
        SaveCodec::new()
    }
}

impl std::fmt::Debug for SaveCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveCodec")
            .field("oodle", &self.oodle.is_some())
            .field("compressor", &self.compressor)
            .field("level", &self.level)
            .field("zlib", &self.zlib)
            .finish()
    }
}

impl SaveCodec {
    /// A codec that only understands zlib saves
    pub fn new() -> Self {
        SaveCodec::builder().build()
    }

    pub fn builder() -> SaveCodecBuilder {
        SaveCodecBuilder::default()
    }

    pub fn zlib(&self) -> &ZlibBackend {
        &self.zlib
    }

    /// The oodle backend, if a native library was configured
    pub fn oodle(&self) -> Option<OodleBackend<'_>> {
        let lib = self.oodle.as_deref()?;
        Some(
            OodleBackend::new(lib)
                .with_compressor(self.compressor)
                .with_level(self.level),
        )
    }

    fn require_oodle(&self) -> Result<OodleBackend<'_>, EnvelopeError> {
        self.oodle()
            .ok_or_else(|| EnvelopeErrorKind::OodleUnavailable.into())
    }

    /// Decompresses a save file, returning the payload and the format it was
    /// stored in (the inner format for chunk wrapped files)
    pub fn decompress(&self, data: &[u8]) -> Result<(Vec<u8>, FormatTag), EnvelopeError> {
        let (payload, header) = self.decompress_with_header(data)?;
        Ok((payload, header.format()))
    }

    /// Decompresses a save file, also returning the parsed header
    pub fn decompress_with_header(
        &self,
        data: &[u8],
    ) -> Result<(Vec<u8>, SaveHeader), EnvelopeError> {
        if check_sav_format(data)? == FormatTag::Oodle {
            self.require_oodle()?;
        }

        let header = SaveHeader::from_slice(data)?;
        log::debug!(
            "decompressing {:?} save: uncompressed {} compressed {} offset {}",
            header.format(),
            header.uncompressed_len(),
            header.compressed_len(),
            header.data_offset()
        );

        let payload = match header.format() {
            FormatTag::Oodle => self.require_oodle()?.decompress(data, &header)?,
            FormatTag::Zlib | FormatTag::Chunked => self.zlib.decompress(data, &header)?,
        };
        Ok((payload, header))
    }

    /// Compresses a payload into a complete save file
    pub fn compress(&self, payload: &[u8], format: FormatTag) -> Result<Vec<u8>, EnvelopeError> {
        let (header, stored) = match format {
            FormatTag::Zlib => self.zlib.compress(payload, format)?,
            FormatTag::Oodle => self.require_oodle()?.compress(payload, format)?,
            FormatTag::Chunked => {
                return Err(EnvelopeErrorKind::UnsupportedTypeForBackend {
                    backend: "save codec",
                    format,
                }
                .into())
            }
        };

        let mut out = Vec::with_capacity(header.data_offset() + stored.len());
        header.write(&mut out)?;
        out.extend_from_slice(&stored);
        log::debug!(
            "compressed {} byte payload into {} byte {:?} save",
            payload.len(),
            out.len(),
            format
        );
        Ok(out)
    }
}

/// Decompresses a zlib save file with a default [`SaveCodec`]
pub fn decompress_to_payload(data: &[u8]) -> Result<(Vec<u8>, FormatTag), EnvelopeError> {
    SaveCodec::new().decompress(data)
}

/// Compresses a payload with a default [`SaveCodec`]
pub fn compress_from_payload(payload: &[u8], format: FormatTag) -> Result<Vec<u8>, EnvelopeError> {
    SaveCodec::new().compress(payload, format)
}
