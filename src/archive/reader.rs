use super::{ArchiveError, ArchiveErrorKind, Guid, Vector};
use crate::util::get_split;

#[inline]
fn read_u8(data: &[u8]) -> Result<(u8, &[u8]), ArchiveErrorKind> {
    let (&first, rest) = data.split_first().ok_or(ArchiveErrorKind::Eof)?;
    Ok((first, rest))
}

#[inline]
fn read_u32(data: &[u8]) -> Result<(u32, &[u8]), ArchiveErrorKind> {
    let (head, rest) = get_split::<4>(data).ok_or(ArchiveErrorKind::Eof)?;
    Ok((u32::from_le_bytes(head), rest))
}

#[inline]
fn read_i32(data: &[u8]) -> Result<(i32, &[u8]), ArchiveErrorKind> {
    let (head, rest) = get_split::<4>(data).ok_or(ArchiveErrorKind::Eof)?;
    Ok((i32::from_le_bytes(head), rest))
}

#[inline]
fn read_i64(data: &[u8]) -> Result<(i64, &[u8]), ArchiveErrorKind> {
    let (head, rest) = get_split::<8>(data).ok_or(ArchiveErrorKind::Eof)?;
    Ok((i64::from_le_bytes(head), rest))
}

#[inline]
fn read_f32(data: &[u8]) -> Result<(f32, &[u8]), ArchiveErrorKind> {
    let (head, rest) = get_split::<4>(data).ok_or(ArchiveErrorKind::Eof)?;
    Ok((f32::from_le_bytes(head), rest))
}

#[inline]
fn read_f64(data: &[u8]) -> Result<(f64, &[u8]), ArchiveErrorKind> {
    let (head, rest) = get_split::<8>(data).ok_or(ArchiveErrorKind::Eof)?;
    Ok((f64::from_le_bytes(head), rest))
}

#[inline]
fn read_bytes(data: &[u8], len: usize) -> Result<(&[u8], &[u8]), ArchiveErrorKind> {
    if len <= data.len() {
        Ok(data.split_at(len))
    } else {
        Err(ArchiveErrorKind::Eof)
    }
}

/// Strings are prefixed with a signed length that counts the terminator. A
/// positive length is a run of ascii bytes, a negative length is a run of
/// utf-16 code units.
fn read_fstring(data: &[u8]) -> Result<(String, &[u8]), ArchiveErrorKind> {
    let (size, data) = read_i32(data)?;
    match size {
        0 => Ok((String::new(), data)),
        1.. => {
            let (text, rest) = read_bytes(data, size as usize)?;
            let (&nul, text) = text.split_last().ok_or(ArchiveErrorKind::Eof)?;
            if nul != 0 || text.is_empty() {
                return Err(ArchiveErrorKind::NonCanonicalString);
            }

            if !text.is_ascii() || text.contains(&0) {
                return Err(ArchiveErrorKind::InvalidString);
            }

            // ascii is a subset of utf-8
            let text = String::from_utf8(text.to_vec())
                .map_err(|_| ArchiveErrorKind::InvalidString)?;
            Ok((text, rest))
        }
        _ => {
            let units = size.unsigned_abs() as usize;
            let byte_len = units.checked_mul(2).ok_or(ArchiveErrorKind::Eof)?;
            let (raw, rest) = read_bytes(data, byte_len)?;
            let (text, nul) = raw.split_at(byte_len - 2);
            if nul != [0, 0] || text.is_empty() {
                return Err(ArchiveErrorKind::NonCanonicalString);
            }

            let code_units = text
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
            let text: String = char::decode_utf16(code_units)
                .collect::<Result<_, _>>()
                .map_err(|_| ArchiveErrorKind::InvalidString)?;

            if text.is_ascii() {
                return Err(ArchiveErrorKind::NonCanonicalString);
            }

            Ok((text, rest))
        }
    }
}

/// Cursor over a borrowed slice of archive data
///
/// ```
/// use palsav::archive::ArchiveReader;
/// let data = [0x02, 0x00, 0x00, 0x00, 0x0a, 0x00, 0x00, 0x00, 0x0b, 0x00, 0x00, 0x00];
/// let mut reader = ArchiveReader::new(&data);
/// let values = reader.tarray(|r| r.i32())?;
/// assert_eq!(values, vec![10, 11]);
/// assert!(reader.eof());
/// # Ok::<(), palsav::archive::ArchiveError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveReader<'a> {
    data: &'a [u8],
    original_length: usize,
}

impl<'a> ArchiveReader<'a> {
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        ArchiveReader {
            data,
            original_length: data.len(),
        }
    }

    /// Creates an independent reader scoped to the given bytes.
    ///
    /// The new reader shares no position with this one.
    #[inline]
    pub fn internal_copy<'b>(&self, data: &'b [u8]) -> ArchiveReader<'b> {
        ArchiveReader::new(data)
    }

    /// Bytes not yet consumed
    #[inline]
    pub fn remainder(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.original_length - self.data.len()
    }

    #[inline]
    pub fn eof(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn err_position(&self, err: ArchiveErrorKind) -> ArchiveError {
        err.at(self.position())
    }

    #[inline]
    pub fn byte(&mut self) -> Result<u8, ArchiveError> {
        let (result, rest) = read_u8(self.data).map_err(|e| self.err_position(e))?;
        self.data = rest;
        Ok(result)
    }

    #[inline]
    pub fn u32(&mut self) -> Result<u32, ArchiveError> {
        let (result, rest) = read_u32(self.data).map_err(|e| self.err_position(e))?;
        self.data = rest;
        Ok(result)
    }

    #[inline]
    pub fn i32(&mut self) -> Result<i32, ArchiveError> {
        let (result, rest) = read_i32(self.data).map_err(|e| self.err_position(e))?;
        self.data = rest;
        Ok(result)
    }

    #[inline]
    pub fn i64(&mut self) -> Result<i64, ArchiveError> {
        let (result, rest) = read_i64(self.data).map_err(|e| self.err_position(e))?;
        self.data = rest;
        Ok(result)
    }

    #[inline]
    pub fn float(&mut self) -> Result<f32, ArchiveError> {
        let (result, rest) = read_f32(self.data).map_err(|e| self.err_position(e))?;
        self.data = rest;
        Ok(result)
    }

    #[inline]
    pub fn double(&mut self) -> Result<f64, ArchiveError> {
        let (result, rest) = read_f64(self.data).map_err(|e| self.err_position(e))?;
        self.data = rest;
        Ok(result)
    }

    /// A 32-bit integer that must be exactly 0 or 1
    pub fn bool32(&mut self) -> Result<bool, ArchiveError> {
        let position = self.position();
        match self.u32()? {
            0 => Ok(false),
            1 => Ok(true),
            x => Err(ArchiveErrorKind::InvalidBool(x).at(position)),
        }
    }

    pub fn fstring(&mut self) -> Result<String, ArchiveError> {
        let (result, rest) = read_fstring(self.data).map_err(|e| self.err_position(e))?;
        self.data = rest;
        Ok(result)
    }

    pub fn guid(&mut self) -> Result<Guid, ArchiveError> {
        let (head, rest) = get_split::<{ Guid::SIZE }>(self.data)
            .ok_or_else(|| self.err_position(ArchiveErrorKind::Eof))?;
        self.data = rest;
        Ok(Guid::from_bytes(head))
    }

    pub fn vector(&mut self) -> Result<Vector, ArchiveError> {
        Ok(Vector {
            x: self.double()?,
            y: self.double()?,
            z: self.double()?,
        })
    }

    pub fn byte_list(&mut self, len: usize) -> Result<Vec<u8>, ArchiveError> {
        let (result, rest) = read_bytes(self.data, len).map_err(|e| self.err_position(e))?;
        self.data = rest;
        Ok(result.to_vec())
    }

    /// Fixed size byte array
    pub fn byte_array<const N: usize>(&mut self) -> Result<[u8; N], ArchiveError> {
        let (head, rest) =
            get_split::<N>(self.data).ok_or_else(|| self.err_position(ArchiveErrorKind::Eof))?;
        self.data = rest;
        Ok(head)
    }

    pub fn read_to_end(&mut self) -> Vec<u8> {
        let result = self.data.to_vec();
        self.data = &self.data[self.data.len()..];
        result
    }

    /// A u32 count followed by that many elements
    pub fn tarray<T, F>(&mut self, mut elem: F) -> Result<Vec<T>, ArchiveError>
    where
        F: FnMut(&mut Self) -> Result<T, ArchiveError>,
    {
        let count = self.u32()? as usize;

        // every element occupies at least a byte, so a count larger than the
        // remaining data is already known to be truncated
        let mut result = Vec::with_capacity(count.min(self.data.len()));
        for _ in 0..count {
            result.push(elem(self)?);
        }
        Ok(result)
    }
}
