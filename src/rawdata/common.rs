use crate::archive::{ArchiveError, ArchiveReader, ArchiveWriter, Guid};

/// Identifies an item instance within the world that created it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DynamicItemId {
    pub created_world_id: Guid,
    pub local_id_in_created_world: Guid,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId {
    pub static_id: String,
    pub dynamic_id: DynamicItemId,
}

impl ItemId {
    pub(crate) fn read(reader: &mut ArchiveReader<'_>) -> Result<Self, ArchiveError> {
        Ok(ItemId {
            static_id: reader.fstring()?,
            dynamic_id: DynamicItemId {
                created_world_id: reader.guid()?,
                local_id_in_created_world: reader.guid()?,
            },
        })
    }

    pub(crate) fn write(&self, writer: &mut ArchiveWriter) {
        writer.fstring(&self.static_id);
        writer.guid(&self.dynamic_id.created_world_id);
        writer.guid(&self.dynamic_id.local_id_in_created_world);
    }
}

/// An item and how many of it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemAndNum {
    pub item_id: ItemId,
    pub num: u32,
}

impl ItemAndNum {
    pub(crate) fn read(reader: &mut ArchiveReader<'_>) -> Result<Self, ArchiveError> {
        Ok(ItemAndNum {
            item_id: ItemId::read(reader)?,
            num: reader.u32()?,
        })
    }

    pub(crate) fn write(&self, writer: &mut ArchiveWriter) {
        self.item_id.write(writer);
        writer.u32(self.num);
    }
}

/// Progress on a single research entry
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabResearchInfo {
    pub research_id: String,
    pub work_amount: f32,
}

impl LabResearchInfo {
    pub(crate) fn read(reader: &mut ArchiveReader<'_>) -> Result<Self, ArchiveError> {
        Ok(LabResearchInfo {
            research_id: reader.fstring()?,
            work_amount: reader.float()?,
        })
    }

    pub(crate) fn write(&self, writer: &mut ArchiveWriter) {
        writer.fstring(&self.research_id);
        writer.float(self.work_amount);
    }
}

/// Shorthand for writing a counted array of values with a `write` method
pub(crate) fn write_all<T>(
    writer: &mut ArchiveWriter,
    items: &[T],
    write: fn(&T, &mut ArchiveWriter),
) {
    writer.tarray(items, |w, x| write(x, w));
}
