use crate::envelope::errors::{EnvelopeError, EnvelopeErrorKind};
use crate::util::get_split;
use std::io::Write;

/// The compression family of a save, paired one-to-one with a magic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormatTag {
    /// Wrapper around one of the other two formats (`CNK`)
    Chunked,

    /// Native oodle codec (`PlM`)
    Oodle,

    /// Zlib applied twice (`PlZ`)
    Zlib,
}

impl FormatTag {
    /// Creates a format tag from the header's format byte
    pub fn from_byte(value: u8) -> Option<FormatTag> {
        match value {
            0x30 => Some(FormatTag::Chunked),
            0x31 => Some(FormatTag::Oodle),
            0x32 => Some(FormatTag::Zlib),
            _ => None,
        }
    }

    /// Creates a format tag from the header's magic
    pub fn from_magic(magic: &[u8; 3]) -> Option<FormatTag> {
        match magic {
            b"CNK" => Some(FormatTag::Chunked),
            b"PlM" => Some(FormatTag::Oodle),
            b"PlZ" => Some(FormatTag::Zlib),
            _ => None,
        }
    }

    /// Returns the format byte written to the header
    pub const fn value(&self) -> u8 {
        match self {
            FormatTag::Chunked => 0x30,
            FormatTag::Oodle => 0x31,
            FormatTag::Zlib => 0x32,
        }
    }

    /// Returns the magic written to the header
    pub const fn magic(&self) -> &'static [u8; 3] {
        match self {
            FormatTag::Chunked => b"CNK",
            FormatTag::Oodle => b"PlM",
            FormatTag::Zlib => b"PlZ",
        }
    }

    pub fn is_chunked(&self) -> bool {
        matches!(self, FormatTag::Chunked)
    }
}

/// Lengths carried by the outer copy of a chunk wrapped header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub uncompressed_len: u32,
    pub compressed_len: u32,
}

/// The fixed layout prefix of a save file.
///
/// ```text
/// offset 0:  u32 LE  uncompressed length
/// offset 4:  u32 LE  compressed length
/// offset 8:  [u8; 3] magic
/// offset 11: u8      format
/// ```
///
/// When the magic is `CNK` the same four fields repeat at offset 12 and
/// describe the real payload, which then starts at offset 24.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveHeader {
    uncompressed_len: u32,
    compressed_len: u32,
    format: FormatTag,
    chunk: Option<ChunkHeader>,
}

type HeaderFields = (u32, u32, [u8; 3], u8);

fn read_fields(data: [u8; SaveHeader::SIZE]) -> HeaderFields {
    let [u0, u1, u2, u3, c0, c1, c2, c3, m0, m1, m2, format] = data;
    (
        u32::from_le_bytes([u0, u1, u2, u3]),
        u32::from_le_bytes([c0, c1, c2, c3]),
        [m0, m1, m2],
        format,
    )
}

fn validate_pair(magic: [u8; 3], format: u8) -> Result<FormatTag, EnvelopeError> {
    let from_magic =
        FormatTag::from_magic(&magic).ok_or(EnvelopeErrorKind::UnknownMagic(magic))?;
    let from_byte =
        FormatTag::from_byte(format).ok_or(EnvelopeErrorKind::UnknownFormat(format))?;
    if from_magic != from_byte {
        return Err(EnvelopeErrorKind::MagicMismatch { magic, format }.into());
    }
    Ok(from_magic)
}

impl SaveHeader {
    /// Size of a single copy of the header fields
    pub const SIZE: usize = 12;

    /// Size of a chunk wrapped header, the most any header can occupy
    pub const MAX_SIZE: usize = 2 * Self::SIZE;

    /// Creates an unwrapped header
    pub fn new(uncompressed_len: u32, compressed_len: u32, format: FormatTag) -> Self {
        SaveHeader {
            uncompressed_len,
            compressed_len,
            format,
            chunk: None,
        }
    }

    /// Wraps this header in a `CNK` header whose outer copy repeats the lengths
    pub fn chunked(self) -> Self {
        let chunk = ChunkHeader {
            uncompressed_len: self.uncompressed_len,
            compressed_len: self.compressed_len,
        };
        self.with_chunk(chunk)
    }

    /// Wraps this header in a `CNK` header with explicit outer lengths
    pub fn with_chunk(mut self, chunk: ChunkHeader) -> Self {
        self.chunk = Some(chunk);
        self
    }

    /// Parses and validates a header from the start of a save file.
    ///
    /// At least [`SaveHeader::MAX_SIZE`] bytes are required even when the
    /// file turns out to be unwrapped.
    pub fn from_slice(data: &[u8]) -> Result<Self, EnvelopeError> {
        let too_short = || EnvelopeErrorKind::HeaderTooShort { len: data.len() };
        if data.len() < Self::MAX_SIZE {
            return Err(too_short().into());
        }

        let (outer, rest) = get_split::<{ Self::SIZE }>(data).ok_or_else(too_short)?;
        let (inner, _) = get_split::<{ Self::SIZE }>(rest).ok_or_else(too_short)?;

        let (uncompressed_len, compressed_len, magic, format) = read_fields(outer);
        if &magic != FormatTag::Chunked.magic() {
            let format = validate_pair(magic, format)?;
            return Ok(SaveHeader::new(uncompressed_len, compressed_len, format));
        }

        validate_pair(magic, format)?;
        let chunk = ChunkHeader {
            uncompressed_len,
            compressed_len,
        };

        let (uncompressed_len, compressed_len, magic, format) = read_fields(inner);
        if &magic == FormatTag::Chunked.magic() {
            return Err(EnvelopeErrorKind::UnknownMagic(magic).into());
        }

        // a zlib payload may carry the chunk tag, which marks a single deflate
        let format = match (&magic, FormatTag::from_byte(format)) {
            (b"PlZ", Some(FormatTag::Chunked)) => FormatTag::Chunked,
            _ => validate_pair(magic, format)?,
        };
        Ok(SaveHeader::new(uncompressed_len, compressed_len, format).with_chunk(chunk))
    }

    /// Length of the payload once fully decompressed
    pub fn uncompressed_len(&self) -> u32 {
        self.uncompressed_len
    }

    /// Compressed length as recorded by the header.
    ///
    /// For zlib saves this is the length after the first deflate pass, not
    /// the number of bytes stored in the file.
    pub fn compressed_len(&self) -> u32 {
        self.compressed_len
    }

    /// The format of the payload (the inner format for chunk wrapped files)
    pub fn format(&self) -> FormatTag {
        self.format
    }

    /// The magic of the payload (the inner magic for chunk wrapped files).
    ///
    /// A chunk tagged payload is zlib data, so its magic is `PlZ`.
    pub fn magic(&self) -> &'static [u8; 3] {
        match self.format {
            FormatTag::Chunked => FormatTag::Zlib.magic(),
            format => format.magic(),
        }
    }

    pub fn is_chunked(&self) -> bool {
        self.chunk.is_some()
    }

    /// Outer lengths when chunk wrapped
    pub fn chunk(&self) -> Option<&ChunkHeader> {
        self.chunk.as_ref()
    }

    /// Offset at which the payload starts
    pub fn data_offset(&self) -> usize {
        if self.is_chunked() {
            Self::MAX_SIZE
        } else {
            Self::SIZE
        }
    }

    /// Writes the header in the save file format
    pub fn write<W>(&self, mut writer: W) -> std::io::Result<()>
    where
        W: Write,
    {
        writer.write_all(&self.to_bytes())
    }

    /// Returns the header bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data_offset());
        if let Some(chunk) = &self.chunk {
            out.extend_from_slice(&chunk.uncompressed_len.to_le_bytes());
            out.extend_from_slice(&chunk.compressed_len.to_le_bytes());
            out.extend_from_slice(FormatTag::Chunked.magic());
            out.push(FormatTag::Chunked.value());
        }

        out.extend_from_slice(&self.uncompressed_len.to_le_bytes());
        out.extend_from_slice(&self.compressed_len.to_le_bytes());
        out.extend_from_slice(self.magic());
        out.push(self.format.value());
        out
    }
}

/// Probes the format of a save file from its magic alone.
///
/// Lengths and the format byte are not validated, only the magic field, with
/// a `CNK` magic redirecting the probe to the inner header.
pub fn check_sav_format(data: &[u8]) -> Result<FormatTag, EnvelopeError> {
    let mut offset = 0;
    loop {
        let header = data
            .get(offset..offset + SaveHeader::SIZE)
            .ok_or(EnvelopeErrorKind::HeaderTooShort { len: data.len() })?;
        let (_, rest) = header.split_at(8);
        let (magic, rest) = get_split::<3>(rest)
            .ok_or(EnvelopeErrorKind::HeaderTooShort { len: data.len() })?;
        let format_byte = rest.first().copied().unwrap_or(0);

        match FormatTag::from_magic(&magic) {
            Some(FormatTag::Chunked) if offset == 0 => offset = SaveHeader::SIZE,
            Some(FormatTag::Chunked) | None => {
                return Err(EnvelopeErrorKind::UnknownFormat(format_byte).into())
            }
            Some(format) => return Ok(format),
        }
    }
}

/// Writes a single unwrapped header followed by the payload.
///
/// No validation is performed: the caller supplies every field.
pub fn build_envelope(
    payload: &[u8],
    uncompressed_len: u32,
    compressed_len: u32,
    magic: &[u8; 3],
    format: u8,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(SaveHeader::SIZE + payload.len());
    out.extend_from_slice(&uncompressed_len.to_le_bytes());
    out.extend_from_slice(&compressed_len.to_le_bytes());
    out.extend_from_slice(magic);
    out.push(format);
    out.extend_from_slice(payload);
    out
}
