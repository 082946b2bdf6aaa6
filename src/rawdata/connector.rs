use super::common::write_all;
use super::{Decoded, EofPolicy, RawDataKind, RawRecord};
use crate::archive::{ArchiveError, ArchiveReader, ArchiveWriter, Guid};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectInfoItem {
    pub connect_to_model_instance_id: Guid,
    pub index: u8,
}

impl ConnectInfoItem {
    fn read(reader: &mut ArchiveReader<'_>) -> Result<Self, ArchiveError> {
        Ok(ConnectInfoItem {
            connect_to_model_instance_id: reader.guid()?,
            index: reader.byte()?,
        })
    }

    fn write(&self, writer: &mut ArchiveWriter) {
        writer.guid(&self.connect_to_model_instance_id);
        writer.byte(self.index);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectInfo {
    pub index: u8,
    pub any_place: Vec<ConnectInfoItem>,
}

/// Links between a map object and the objects it snaps to.
///
/// How many link lists follow the first depends on the object (stairs have
/// two, roofs four) which the blob does not say, so everything after the
/// first list is kept as `unknown_data`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Connector {
    pub supported_level: i32,
    pub connect: ConnectInfo,
    pub unknown_data: Vec<u8>,
}

impl RawRecord for Connector {
    const KIND: RawDataKind = RawDataKind::Connector;
    const EOF_POLICY: EofPolicy = EofPolicy::Capture;

    fn empty() -> Option<Decoded<Self>> {
        Some(Decoded::Fallback(Vec::new()))
    }

    fn read(_tag: &str, reader: &mut ArchiveReader<'_>) -> Result<Option<Self>, ArchiveError> {
        Ok(Some(Connector {
            supported_level: reader.i32()?,
            connect: ConnectInfo {
                index: reader.byte()?,
                any_place: reader.tarray(ConnectInfoItem::read)?,
            },
            unknown_data: reader.read_to_end(),
        }))
    }

    fn write(&self, writer: &mut ArchiveWriter) {
        writer.i32(self.supported_level);
        writer.byte(self.connect.index);
        write_all(writer, &self.connect.any_place, ConnectInfoItem::write);
        writer.write(&self.unknown_data);
    }
}
