use super::{EofPolicy, RawDataKind, RawRecord};
use crate::archive::{ArchiveError, ArchiveReader, ArchiveWriter, Guid};

/// Ownership of a character container slot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterContainer {
    pub player_uid: Guid,
    pub instance_id: Guid,
    pub permission_tribe_id: u8,

    /// Whatever follows the known fields, often empty
    pub unknown_data: Vec<u8>,
}

impl RawRecord for CharacterContainer {
    const KIND: RawDataKind = RawDataKind::CharacterContainer;
    const EOF_POLICY: EofPolicy = EofPolicy::Capture;

    fn read(_tag: &str, reader: &mut ArchiveReader<'_>) -> Result<Option<Self>, ArchiveError> {
        Ok(Some(CharacterContainer {
            player_uid: reader.guid()?,
            instance_id: reader.guid()?,
            permission_tribe_id: reader.byte()?,
            unknown_data: reader.read_to_end(),
        }))
    }

    fn write(&self, writer: &mut ArchiveWriter) {
        writer.guid(&self.player_uid);
        writer.guid(&self.instance_id);
        writer.byte(self.permission_tribe_id);
        writer.write(&self.unknown_data);
    }
}
