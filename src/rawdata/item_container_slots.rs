use super::{EofPolicy, ItemId, RawDataKind, RawRecord};
use crate::archive::{ArchiveError, ArchiveReader, ArchiveWriter};

/// The bytes after an item slot's known fields.
///
/// They are zero padding in every save seen so far, so only the length is
/// kept in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SlotTrailer {
    Zeroed(usize),
    Bytes(Vec<u8>),
}

impl Default for SlotTrailer {
    fn default() -> Self {
        SlotTrailer::Zeroed(0)
    }
}

impl SlotTrailer {
    fn new(data: Vec<u8>) -> Self {
        if data.iter().all(|&x| x == 0) {
            SlotTrailer::Zeroed(data.len())
        } else {
            SlotTrailer::Bytes(data)
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SlotTrailer::Zeroed(len) => *len,
            SlotTrailer::Bytes(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single slot of an item container
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemContainerSlot {
    pub slot_index: i32,
    pub count: i32,
    pub item: ItemId,
    pub trailer: SlotTrailer,
}

impl RawRecord for ItemContainerSlot {
    const KIND: RawDataKind = RawDataKind::ItemContainerSlot;
    const EOF_POLICY: EofPolicy = EofPolicy::Capture;

    fn read(_tag: &str, reader: &mut ArchiveReader<'_>) -> Result<Option<Self>, ArchiveError> {
        Ok(Some(ItemContainerSlot {
            slot_index: reader.i32()?,
            count: reader.i32()?,
            item: ItemId::read(reader)?,
            trailer: SlotTrailer::new(reader.read_to_end()),
        }))
    }

    fn write(&self, writer: &mut ArchiveWriter) {
        writer.i32(self.slot_index);
        writer.i32(self.count);
        self.item.write(writer);
        match &self.trailer {
            SlotTrailer::Zeroed(len) => writer.write(&vec![0; *len]),
            SlotTrailer::Bytes(data) => writer.write(data),
        }
    }
}
