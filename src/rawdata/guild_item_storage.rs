use super::{EofPolicy, RawDataKind, RawRecord};
use crate::archive::{ArchiveError, ArchiveReader, ArchiveWriter, Guid};

/// The item container backing a guild's shared storage
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GuildItemStorage {
    pub container_id: Guid,
    pub trailing_bytes: Vec<u8>,
}

impl RawRecord for GuildItemStorage {
    const KIND: RawDataKind = RawDataKind::GuildItemStorage;
    const EOF_POLICY: EofPolicy = EofPolicy::Capture;

    fn read(_tag: &str, reader: &mut ArchiveReader<'_>) -> Result<Option<Self>, ArchiveError> {
        Ok(Some(GuildItemStorage {
            container_id: reader.guid()?,
            trailing_bytes: reader.read_to_end(),
        }))
    }

    fn write(&self, writer: &mut ArchiveWriter) {
        writer.guid(&self.container_id);
        writer.write(&self.trailing_bytes);
    }
}
