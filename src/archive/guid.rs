use std::fmt;
use std::str::FromStr;

/// A 128-bit identifier exactly as it is laid out in the archive.
///
/// The engine stores identifiers as four little endian 32-bit words, so the
/// textual form reverses the bytes of each word.
///
/// ```
/// use palsav::archive::Guid;
/// let guid = Guid::from_bytes([
///     0x04, 0x03, 0x02, 0x01, 0x08, 0x07, 0x06, 0x05,
///     0x0c, 0x0b, 0x0a, 0x09, 0x10, 0x0f, 0x0e, 0x0d,
/// ]);
/// assert_eq!(guid.to_string(), "01020304-0506-0708-090a-0b0c0d0e0f10");
/// assert_eq!(guid.to_string().parse::<Guid>().unwrap(), guid);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Guid([u8; 16]);

impl Guid {
    pub const SIZE: usize = 16;

    /// The all zero identifier
    pub const NIL: Guid = Guid([0; 16]);

    #[inline]
    pub const fn from_bytes(data: [u8; 16]) -> Self {
        Guid(data)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub fn is_nil(&self) -> bool {
        self.0 == [0; 16]
    }

    /// Byte order of the textual form
    const DISPLAY_ORDER: [usize; 16] = [3, 2, 1, 0, 7, 6, 5, 4, 11, 10, 9, 8, 15, 14, 13, 12];
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &idx) in Self::DISPLAY_ORDER.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{:02x}", self.0[idx])?;
        }
        Ok(())
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({})", self)
    }
}

/// The given text was not a hyphenated identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuidParseError(String);

impl fmt::Display for GuidParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid guid: {}", self.0)
    }
}

impl std::error::Error for GuidParseError {}

impl FromStr for Guid {
    type Err = GuidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || GuidParseError(s.to_string());
        let digits = s.as_bytes();
        if digits.len() != 36 {
            return Err(err());
        }

        let mut data = [0u8; 16];
        let mut nibbles = digits
            .iter()
            .enumerate()
            .filter(|(i, _)| !matches!(i, 8 | 13 | 18 | 23));

        for &idx in Self::DISPLAY_ORDER.iter() {
            let mut byte = 0u8;
            for _ in 0..2 {
                let (_, &c) = nibbles.next().ok_or_else(err)?;
                let nibble = (c as char).to_digit(16).ok_or_else(err)?;
                byte = (byte << 4) | nibble as u8;
            }
            data[idx] = byte;
        }

        if [8, 13, 18, 23].iter().any(|&i| digits[i] != b'-') {
            return Err(err());
        }

        Ok(Guid(data))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Guid {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Guid {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
