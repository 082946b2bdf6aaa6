use super::common::write_all;
use super::{EofPolicy, LabResearchInfo, RawDataKind, RawRecord};
use crate::archive::{ArchiveError, ArchiveReader, ArchiveWriter};

/// A guild's research progress
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GuildLab {
    pub research_info: Vec<LabResearchInfo>,
    pub current_research_id: String,
}

impl RawRecord for GuildLab {
    const KIND: RawDataKind = RawDataKind::GuildLab;

    // no trailer is known for this layout, so leftovers mean it changed
    const EOF_POLICY: EofPolicy = EofPolicy::Fallback;

    fn read(_tag: &str, reader: &mut ArchiveReader<'_>) -> Result<Option<Self>, ArchiveError> {
        Ok(Some(GuildLab {
            research_info: reader.tarray(LabResearchInfo::read)?,
            current_research_id: reader.fstring()?,
        }))
    }

    fn write(&self, writer: &mut ArchiveWriter) {
        write_all(writer, &self.research_info, LabResearchInfo::write);
        writer.fstring(&self.current_research_id);
    }
}
