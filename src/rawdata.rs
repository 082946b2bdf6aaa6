//! Structured views of the opaque byte arrays embedded in a save's property
//! archive.
//!
//! Several properties store their contents as a `RawData` byte array whose
//! layout depends on a type tag found elsewhere in the tree (a sibling
//! field or the key of the enclosing map). Each record kind here pairs a
//! decoder with an encoder that writes the fields back in the order they
//! were consumed.
//!
//! Decoding never aborts on unfamiliar data. An unknown tag or a failed
//! parse keeps the blob verbatim as [`Decoded::Fallback`], which encodes
//! back to the exact same bytes:
//!
//! ```
//! use palsav::rawdata::{decode_record, BaseCampModule, Decoded};
//!
//! let data = [1, 2, 3];
//! let decoded = decode_record::<BaseCampModule>("EPalBaseCampModuleType::New", &data)?;
//! assert_eq!(decoded, Decoded::Fallback(vec![1, 2, 3]));
//! assert_eq!(decoded.encode(), data);
//! # Ok::<(), palsav::rawdata::RawDataError>(())
//! ```
//!
//! What happens to bytes left over after a successful decode is fixed per
//! kind by its [`EofPolicy`].

mod base_camp_module;
mod character_container;
mod common;
mod connector;
mod errors;
mod group;
mod guild_item_storage;
mod guild_lab;
mod item_container_slots;
mod map_concrete_model_module;
mod rules;

pub use base_camp_module::*;
pub use character_container::*;
pub use common::*;
pub use connector::*;
pub use errors::*;
pub use group::*;
pub use guild_item_storage::*;
pub use guild_lab::*;
pub use item_container_slots::*;
pub use map_concrete_model_module::*;
pub use rules::*;

use crate::archive::{ArchiveError, ArchiveReader, ArchiveWriter};
use crate::util::hex_prefix;
use std::fmt;

/// The families of raw records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RawDataKind {
    BaseCampModule,
    CharacterContainer,
    Connector,
    Group,
    GuildItemStorage,
    GuildLab,
    ItemContainerSlot,
    MapConcreteModelModule,
}

impl fmt::Display for RawDataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RawDataKind::BaseCampModule => "base camp module",
            RawDataKind::CharacterContainer => "character container",
            RawDataKind::Connector => "connector",
            RawDataKind::Group => "group",
            RawDataKind::GuildItemStorage => "guild item storage",
            RawDataKind::GuildLab => "guild lab",
            RawDataKind::ItemContainerSlot => "item container slot",
            RawDataKind::MapConcreteModelModule => "map concrete model module",
        };
        f.write_str(name)
    }
}

/// What to do with bytes left over after a structured decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EofPolicy {
    /// The record captures any remainder in one of its own fields
    Capture,

    /// Leftover bytes discard the structured record for a fallback
    Fallback,

    /// Leftover bytes are an integrity fault reported to the caller
    Strict,
}

/// The result of decoding one blob
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Decoded<T> {
    /// A zero length blob for kinds that define an empty record
    Empty,

    /// A structured record
    Record(T),

    /// The original bytes, kept when the blob was not understood
    Fallback(Vec<u8>),
}

impl<T> Decoded<T> {
    pub fn record(&self) -> Option<&T> {
        match self {
            Decoded::Record(x) => Some(x),
            _ => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Decoded::Fallback(_))
    }
}

impl<T: RawRecord> Decoded<T> {
    /// Writes the blob this value was decoded from
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Decoded::Empty => Vec::new(),
            Decoded::Fallback(data) => data.clone(),
            Decoded::Record(record) => {
                let mut writer = ArchiveWriter::new();
                record.write(&mut writer);
                writer.into_bytes()
            }
        }
    }
}

/// A record kind the registry knows how to decode and encode
pub trait RawRecord: Sized {
    const KIND: RawDataKind;
    const EOF_POLICY: EofPolicy;

    /// The representation of a zero length blob. `None` runs the normal
    /// decode on the empty input.
    fn empty() -> Option<Decoded<Self>> {
        Some(Decoded::Empty)
    }

    /// Reads a record for the given tag, or `None` if the tag is unknown
    fn read(tag: &str, reader: &mut ArchiveReader<'_>) -> Result<Option<Self>, ArchiveError>;

    /// Writes the fields in the order [`RawRecord::read`] consumes them
    fn write(&self, writer: &mut ArchiveWriter);
}

/// Decodes one blob through a reader scoped to exactly those bytes
pub fn decode_record<T: RawRecord>(tag: &str, data: &[u8]) -> Result<Decoded<T>, RawDataError> {
    if data.is_empty() {
        if let Some(empty) = T::empty() {
            return Ok(empty);
        }
    }

    let mut reader = ArchiveReader::new(data);
    let record = match T::read(tag, &mut reader) {
        Ok(Some(record)) => record,
        Ok(None) => {
            log::warn!(
                "unknown {} type {}, falling back to raw bytes",
                T::KIND,
                tag
            );
            return Ok(Decoded::Fallback(data.to_vec()));
        }
        Err(e) => {
            log::warn!(
                "failed to decode {} {}, falling back to raw bytes: {} ({})",
                T::KIND,
                tag,
                e,
                hex_prefix(data, 64)
            );
            return Ok(Decoded::Fallback(data.to_vec()));
        }
    };

    if reader.eof() {
        return Ok(Decoded::Record(record));
    }

    let remaining = reader.remainder().len();
    match T::EOF_POLICY {
        EofPolicy::Strict => Err(RawDataErrorKind::TrailingData {
            kind: T::KIND,
            tag: tag.to_owned(),
            remaining,
        }
        .into()),
        EofPolicy::Capture | EofPolicy::Fallback => {
            log::warn!(
                "EOF not reached for {} {} ({} bytes remain), falling back to raw bytes",
                T::KIND,
                tag,
                remaining
            );
            Ok(Decoded::Fallback(data.to_vec()))
        }
    }
}

/// A decoded blob of any kind
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RawData {
    BaseCampModule(Decoded<BaseCampModule>),
    CharacterContainer(Decoded<CharacterContainer>),
    Connector(Decoded<Connector>),
    Group(Decoded<Group>),
    GuildItemStorage(Decoded<GuildItemStorage>),
    GuildLab(Decoded<GuildLab>),
    ItemContainerSlot(Decoded<ItemContainerSlot>),
    MapConcreteModelModule(Decoded<MapConcreteModelModule>),
}

/// Coarse classification of a decode result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Empty,
    Record,
    Fallback,
}

macro_rules! dispatch {
    ($value:expr, $x:ident => $body:expr) => {
        match $value {
            RawData::BaseCampModule($x) => $body,
            RawData::CharacterContainer($x) => $body,
            RawData::Connector($x) => $body,
            RawData::Group($x) => $body,
            RawData::GuildItemStorage($x) => $body,
            RawData::GuildLab($x) => $body,
            RawData::ItemContainerSlot($x) => $body,
            RawData::MapConcreteModelModule($x) => $body,
        }
    };
}

fn outcome_of<T>(decoded: &Decoded<T>) -> Outcome {
    match decoded {
        Decoded::Empty => Outcome::Empty,
        Decoded::Record(_) => Outcome::Record,
        Decoded::Fallback(_) => Outcome::Fallback,
    }
}

impl RawData {
    /// Decodes a blob as the given kind. Kinds without a tag ignore `tag`.
    pub fn decode(kind: RawDataKind, tag: &str, data: &[u8]) -> Result<RawData, RawDataError> {
        let result = match kind {
            RawDataKind::BaseCampModule => RawData::BaseCampModule(decode_record(tag, data)?),
            RawDataKind::CharacterContainer => {
                RawData::CharacterContainer(decode_record(tag, data)?)
            }
            RawDataKind::Connector => RawData::Connector(decode_record(tag, data)?),
            RawDataKind::Group => RawData::Group(decode_record(tag, data)?),
            RawDataKind::GuildItemStorage => RawData::GuildItemStorage(decode_record(tag, data)?),
            RawDataKind::GuildLab => RawData::GuildLab(decode_record(tag, data)?),
            RawDataKind::ItemContainerSlot => {
                RawData::ItemContainerSlot(decode_record(tag, data)?)
            }
            RawDataKind::MapConcreteModelModule => {
                RawData::MapConcreteModelModule(decode_record(tag, data)?)
            }
        };
        Ok(result)
    }

    pub fn kind(&self) -> RawDataKind {
        match self {
            RawData::BaseCampModule(_) => RawDataKind::BaseCampModule,
            RawData::CharacterContainer(_) => RawDataKind::CharacterContainer,
            RawData::Connector(_) => RawDataKind::Connector,
            RawData::Group(_) => RawDataKind::Group,
            RawData::GuildItemStorage(_) => RawDataKind::GuildItemStorage,
            RawData::GuildLab(_) => RawDataKind::GuildLab,
            RawData::ItemContainerSlot(_) => RawDataKind::ItemContainerSlot,
            RawData::MapConcreteModelModule(_) => RawDataKind::MapConcreteModelModule,
        }
    }

    pub fn outcome(&self) -> Outcome {
        dispatch!(self, x => outcome_of(x))
    }

    /// Writes the blob this value was decoded from
    pub fn encode(&self) -> Vec<u8> {
        dispatch!(self, x => x.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use rstest::*;

    const KINDS: [RawDataKind; 8] = [
        RawDataKind::BaseCampModule,
        RawDataKind::CharacterContainer,
        RawDataKind::Connector,
        RawDataKind::Group,
        RawDataKind::GuildItemStorage,
        RawDataKind::GuildLab,
        RawDataKind::ItemContainerSlot,
        RawDataKind::MapConcreteModelModule,
    ];

    #[quickcheck]
    fn unknown_tag_fallback_idempotence(kind_index: usize, data: Vec<u8>) -> bool {
        let kind = KINDS[kind_index % KINDS.len()];
        let tag = "EPalSomethingNew::Unknown";
        match RawData::decode(kind, tag, &data) {
            Ok(decoded) => decoded.kind() == kind && decoded.encode() == data,
            Err(_) => false,
        }
    }

    #[quickcheck]
    fn any_bytes_reencode_or_report(kind_index: usize, data: Vec<u8>) -> bool {
        // kinds without a tag treat every blob as known
        let kind = KINDS[kind_index % KINDS.len()];
        match RawData::decode(kind, "", &data) {
            Ok(decoded) => decoded.encode() == data,
            Err(e) => matches!(e.kind(), RawDataErrorKind::TrailingData { .. }),
        }
    }

    #[rstest]
    #[case(RawDataKind::BaseCampModule, "EPalBaseCampModuleType::Energy", Outcome::Record)]
    #[case(RawDataKind::BaseCampModule, "EPalBaseCampModuleType::PassiveEffect", Outcome::Fallback)]
    #[case(RawDataKind::CharacterContainer, "", Outcome::Empty)]
    #[case(RawDataKind::Connector, "", Outcome::Fallback)]
    #[case(RawDataKind::Group, "EPalGroupType::Guild", Outcome::Fallback)]
    #[case(RawDataKind::GuildItemStorage, "", Outcome::Empty)]
    #[case(RawDataKind::GuildLab, "", Outcome::Empty)]
    #[case(RawDataKind::ItemContainerSlot, "", Outcome::Empty)]
    #[case(
        RawDataKind::MapConcreteModelModule,
        "EPalMapObjectConcreteModelModuleType::Energy",
        Outcome::Fallback
    )]
    fn test_empty_blob(#[case] kind: RawDataKind, #[case] tag: &str, #[case] expected: Outcome) {
        let decoded = RawData::decode(kind, tag, &[]).unwrap();
        assert_eq!(decoded.outcome(), expected);
        assert!(decoded.encode().is_empty());
    }
}
