use super::{Guid, Vector};

/// Growable buffer that writes archive primitives
#[derive(Debug, Clone, Default)]
pub struct ArchiveWriter {
    data: Vec<u8>,
}

impl ArchiveWriter {
    pub fn new() -> Self {
        ArchiveWriter::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ArchiveWriter {
            data: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn byte(&mut self, x: u8) {
        self.data.push(x);
    }

    #[inline]
    pub fn u32(&mut self, x: u32) {
        self.data.extend_from_slice(&x.to_le_bytes());
    }

    #[inline]
    pub fn i32(&mut self, x: i32) {
        self.data.extend_from_slice(&x.to_le_bytes());
    }

    #[inline]
    pub fn i64(&mut self, x: i64) {
        self.data.extend_from_slice(&x.to_le_bytes());
    }

    #[inline]
    pub fn float(&mut self, x: f32) {
        self.data.extend_from_slice(&x.to_le_bytes());
    }

    #[inline]
    pub fn double(&mut self, x: f64) {
        self.data.extend_from_slice(&x.to_le_bytes());
    }

    pub fn bool32(&mut self, x: bool) {
        self.u32(u32::from(x));
    }

    /// Writes ascii text as a nul terminated byte run and everything else
    /// as nul terminated utf-16
    pub fn fstring(&mut self, x: &str) {
        if x.is_empty() {
            self.i32(0);
        } else if x.is_ascii() {
            self.i32(x.len() as i32 + 1);
            self.data.extend_from_slice(x.as_bytes());
            self.data.push(0);
        } else {
            let units: Vec<u16> = x.encode_utf16().collect();
            self.i32(-(units.len() as i32 + 1));
            for unit in units {
                self.data.extend_from_slice(&unit.to_le_bytes());
            }
            self.data.extend_from_slice(&[0, 0]);
        }
    }

    #[inline]
    pub fn guid(&mut self, x: &Guid) {
        self.data.extend_from_slice(x.as_bytes());
    }

    pub fn vector(&mut self, x: &Vector) {
        self.double(x.x);
        self.double(x.y);
        self.double(x.z);
    }

    /// Raw bytes with no length prefix
    #[inline]
    pub fn write(&mut self, x: &[u8]) {
        self.data.extend_from_slice(x);
    }

    /// A u32 count followed by each element
    pub fn tarray<T, F>(&mut self, items: &[T], mut elem: F)
    where
        F: FnMut(&mut Self, &T),
    {
        self.u32(items.len() as u32);
        for item in items {
            elem(self, item);
        }
    }
}
