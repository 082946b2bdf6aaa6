use super::common::write_all;
use super::{Decoded, EofPolicy, RawDataKind, RawRecord};
use crate::archive::{ArchiveError, ArchiveReader, ArchiveWriter, Guid};

/// Module types of a map object's concrete model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConcreteModelModuleType {
    ItemContainer,
    CharacterContainer,
    Workee,
    Energy,
    StatusObserver,
    ItemStack,
    Switch,
    PlayerRecord,
    BaseCampPassiveEffect,
    PasswordLock,
    RequireElementalAction,
}

impl ConcreteModelModuleType {
    const ALL: [ConcreteModelModuleType; 11] = [
        ConcreteModelModuleType::ItemContainer,
        ConcreteModelModuleType::CharacterContainer,
        ConcreteModelModuleType::Workee,
        ConcreteModelModuleType::Energy,
        ConcreteModelModuleType::StatusObserver,
        ConcreteModelModuleType::ItemStack,
        ConcreteModelModuleType::Switch,
        ConcreteModelModuleType::PlayerRecord,
        ConcreteModelModuleType::BaseCampPassiveEffect,
        ConcreteModelModuleType::PasswordLock,
        ConcreteModelModuleType::RequireElementalAction,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        let name = tag.strip_prefix("EPalMapObjectConcreteModelModuleType::")?;
        Self::ALL.into_iter().find(|x| x.name() == name)
    }

    fn name(&self) -> &'static str {
        match self {
            ConcreteModelModuleType::ItemContainer => "ItemContainer",
            ConcreteModelModuleType::CharacterContainer => "CharacterContainer",
            ConcreteModelModuleType::Workee => "Workee",
            ConcreteModelModuleType::Energy => "Energy",
            ConcreteModelModuleType::StatusObserver => "StatusObserver",
            ConcreteModelModuleType::ItemStack => "ItemStack",
            ConcreteModelModuleType::Switch => "Switch",
            ConcreteModelModuleType::PlayerRecord => "PlayerRecord",
            ConcreteModelModuleType::BaseCampPassiveEffect => "BaseCampPassiveEffect",
            ConcreteModelModuleType::PasswordLock => "PasswordLock",
            ConcreteModelModuleType::RequireElementalAction => "RequireElementalAction",
        }
    }

    pub fn tag(&self) -> String {
        format!("EPalMapObjectConcreteModelModuleType::{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotAttributeIndexes {
    pub attribute: u8,
    pub indexes: Vec<i32>,
}

impl SlotAttributeIndexes {
    fn read(reader: &mut ArchiveReader<'_>) -> Result<Self, ArchiveError> {
        Ok(SlotAttributeIndexes {
            attribute: reader.byte()?,
            indexes: reader.tarray(|r| r.i32())?,
        })
    }

    fn write(&self, writer: &mut ArchiveWriter) {
        writer.byte(self.attribute);
        writer.tarray(&self.indexes, |w, x| w.i32(*x));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerLockInfo {
    pub player_uid: Guid,
    pub try_failed_count: i32,
    pub try_success_cache: bool,
}

impl PlayerLockInfo {
    fn read(reader: &mut ArchiveReader<'_>) -> Result<Self, ArchiveError> {
        Ok(PlayerLockInfo {
            player_uid: reader.guid()?,
            try_failed_count: reader.i32()?,
            try_success_cache: reader.bool32()?,
        })
    }

    fn write(&self, writer: &mut ArchiveWriter) {
        writer.guid(&self.player_uid);
        writer.i32(self.try_failed_count);
        writer.bool32(self.try_success_cache);
    }
}

/// The payload of one entry in a concrete model's module map
///
/// `Energy`, `StatusObserver`, `ItemStack`, `PlayerRecord` and
/// `BaseCampPassiveEffect` carry no data and encode to an empty blob. An
/// empty blob decodes as `Decoded::Fallback(vec![])` whatever the tag, so
/// these variants are only produced by callers building a record by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MapConcreteModelModule {
    ItemContainer {
        target_container_id: Guid,
        slot_attribute_indexes: Vec<SlotAttributeIndexes>,
        all_slot_attribute: Vec<u8>,
        drop_item_at_disposed: bool,
        usage_type: u8,
        trailing_bytes: [u8; 4],
    },
    CharacterContainer {
        target_container_id: Guid,
        trailing_bytes: [u8; 4],
    },
    Workee {
        target_work_id: Guid,
        trailing_bytes: [u8; 4],
    },
    Energy,
    StatusObserver,
    ItemStack,
    Switch {
        switch_state: u8,
        trailing_bytes: [u8; 4],
    },
    PlayerRecord,
    BaseCampPassiveEffect,
    PasswordLock {
        lock_state: u8,
        password: String,
        player_infos: Vec<PlayerLockInfo>,
        trailing_bytes: [u8; 4],
    },
    RequireElementalAction {
        unlock_item: String,
        trailing_bytes: [u8; 12],
    },
}

impl MapConcreteModelModule {
    pub fn module_type(&self) -> ConcreteModelModuleType {
        match self {
            MapConcreteModelModule::ItemContainer { .. } => ConcreteModelModuleType::ItemContainer,
            MapConcreteModelModule::CharacterContainer { .. } => {
                ConcreteModelModuleType::CharacterContainer
            }
            MapConcreteModelModule::Workee { .. } => ConcreteModelModuleType::Workee,
            MapConcreteModelModule::Energy => ConcreteModelModuleType::Energy,
            MapConcreteModelModule::StatusObserver => ConcreteModelModuleType::StatusObserver,
            MapConcreteModelModule::ItemStack => ConcreteModelModuleType::ItemStack,
            MapConcreteModelModule::Switch { .. } => ConcreteModelModuleType::Switch,
            MapConcreteModelModule::PlayerRecord => ConcreteModelModuleType::PlayerRecord,
            MapConcreteModelModule::BaseCampPassiveEffect => {
                ConcreteModelModuleType::BaseCampPassiveEffect
            }
            MapConcreteModelModule::PasswordLock { .. } => ConcreteModelModuleType::PasswordLock,
            MapConcreteModelModule::RequireElementalAction { .. } => {
                ConcreteModelModuleType::RequireElementalAction
            }
        }
    }
}

impl RawRecord for MapConcreteModelModule {
    const KIND: RawDataKind = RawDataKind::MapConcreteModelModule;
    const EOF_POLICY: EofPolicy = EofPolicy::Strict;

    fn empty() -> Option<Decoded<Self>> {
        Some(Decoded::Fallback(Vec::new()))
    }

    fn read(tag: &str, reader: &mut ArchiveReader<'_>) -> Result<Option<Self>, ArchiveError> {
        let Some(module_type) = ConcreteModelModuleType::from_tag(tag) else {
            return Ok(None);
        };

        let module = match module_type {
            ConcreteModelModuleType::ItemContainer => MapConcreteModelModule::ItemContainer {
                target_container_id: reader.guid()?,
                slot_attribute_indexes: reader.tarray(SlotAttributeIndexes::read)?,
                all_slot_attribute: reader.tarray(|r| r.byte())?,
                drop_item_at_disposed: reader.bool32()?,
                usage_type: reader.byte()?,
                trailing_bytes: reader.byte_array()?,
            },
            ConcreteModelModuleType::CharacterContainer => {
                MapConcreteModelModule::CharacterContainer {
                    target_container_id: reader.guid()?,
                    trailing_bytes: reader.byte_array()?,
                }
            }
            ConcreteModelModuleType::Workee => MapConcreteModelModule::Workee {
                target_work_id: reader.guid()?,
                trailing_bytes: reader.byte_array()?,
            },
            ConcreteModelModuleType::Energy => MapConcreteModelModule::Energy,
            ConcreteModelModuleType::StatusObserver => MapConcreteModelModule::StatusObserver,
            ConcreteModelModuleType::ItemStack => MapConcreteModelModule::ItemStack,
            ConcreteModelModuleType::Switch => MapConcreteModelModule::Switch {
                switch_state: reader.byte()?,
                trailing_bytes: reader.byte_array()?,
            },
            ConcreteModelModuleType::PlayerRecord => MapConcreteModelModule::PlayerRecord,
            ConcreteModelModuleType::BaseCampPassiveEffect => {
                MapConcreteModelModule::BaseCampPassiveEffect
            }
            ConcreteModelModuleType::PasswordLock => MapConcreteModelModule::PasswordLock {
                lock_state: reader.byte()?,
                password: reader.fstring()?,
                player_infos: reader.tarray(PlayerLockInfo::read)?,
                trailing_bytes: reader.byte_array()?,
            },
            ConcreteModelModuleType::RequireElementalAction => {
                MapConcreteModelModule::RequireElementalAction {
                    unlock_item: reader.fstring()?,
                    trailing_bytes: reader.byte_array()?,
                }
            }
        };
        Ok(Some(module))
    }

    fn write(&self, writer: &mut ArchiveWriter) {
        match self {
            MapConcreteModelModule::ItemContainer {
                target_container_id,
                slot_attribute_indexes,
                all_slot_attribute,
                drop_item_at_disposed,
                usage_type,
                trailing_bytes,
            } => {
                writer.guid(target_container_id);
                write_all(writer, slot_attribute_indexes, SlotAttributeIndexes::write);
                writer.tarray(all_slot_attribute, |w, x| w.byte(*x));
                writer.bool32(*drop_item_at_disposed);
                writer.byte(*usage_type);
                writer.write(trailing_bytes);
            }
            MapConcreteModelModule::CharacterContainer {
                target_container_id,
                trailing_bytes,
            } => {
                writer.guid(target_container_id);
                writer.write(trailing_bytes);
            }
            MapConcreteModelModule::Workee {
                target_work_id,
                trailing_bytes,
            } => {
                writer.guid(target_work_id);
                writer.write(trailing_bytes);
            }
            MapConcreteModelModule::Switch {
                switch_state,
                trailing_bytes,
            } => {
                writer.byte(*switch_state);
                writer.write(trailing_bytes);
            }
            MapConcreteModelModule::PasswordLock {
                lock_state,
                password,
                player_infos,
                trailing_bytes,
            } => {
                writer.byte(*lock_state);
                writer.fstring(password);
                write_all(writer, player_infos, PlayerLockInfo::write);
                writer.write(trailing_bytes);
            }
            MapConcreteModelModule::RequireElementalAction {
                unlock_item,
                trailing_bytes,
            } => {
                writer.fstring(unlock_item);
                writer.write(trailing_bytes);
            }
            MapConcreteModelModule::Energy
            | MapConcreteModelModule::StatusObserver
            | MapConcreteModelModule::ItemStack
            | MapConcreteModelModule::PlayerRecord
            | MapConcreteModelModule::BaseCampPassiveEffect => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rawdata::{decode_record, RawDataErrorKind};
    use rstest::*;

    #[rstest]
    #[case(MapConcreteModelModule::ItemContainer {
        target_container_id: Guid::from_bytes([1; 16]),
        slot_attribute_indexes: vec![SlotAttributeIndexes { attribute: 2, indexes: vec![0, 1, 5] }],
        all_slot_attribute: vec![1, 1, 0],
        drop_item_at_disposed: true,
        usage_type: 3,
        trailing_bytes: [0; 4],
    })]
    #[case(MapConcreteModelModule::CharacterContainer {
        target_container_id: Guid::from_bytes([2; 16]),
        trailing_bytes: [1, 0, 0, 0],
    })]
    #[case(MapConcreteModelModule::Workee {
        target_work_id: Guid::from_bytes([3; 16]),
        trailing_bytes: [0; 4],
    })]
    #[case(MapConcreteModelModule::Switch { switch_state: 1, trailing_bytes: [0; 4] })]
    #[case(MapConcreteModelModule::PasswordLock {
        lock_state: 2,
        password: "1234".into(),
        player_infos: vec![PlayerLockInfo {
            player_uid: Guid::from_bytes([4; 16]),
            try_failed_count: 3,
            try_success_cache: false,
        }],
        trailing_bytes: [0; 4],
    })]
    #[case(MapConcreteModelModule::RequireElementalAction {
        unlock_item: "Key_Fire".into(),
        trailing_bytes: [5; 12],
    })]
    fn test_structural_roundtrip(#[case] module: MapConcreteModelModule) {
        let data = Decoded::Record(module.clone()).encode();
        let tag = module.module_type().tag();
        let decoded = decode_record::<MapConcreteModelModule>(&tag, &data).unwrap();
        assert_eq!(decoded, Decoded::Record(module));
        assert_eq!(decoded.encode(), data);
    }

    #[test]
    fn test_tags() {
        for module_type in ConcreteModelModuleType::ALL {
            assert_eq!(
                ConcreteModelModuleType::from_tag(&module_type.tag()),
                Some(module_type)
            );
        }
        assert_eq!(ConcreteModelModuleType::from_tag("ItemContainer"), None);
    }

    #[rstest]
    #[case(MapConcreteModelModule::Energy)]
    #[case(MapConcreteModelModule::StatusObserver)]
    #[case(MapConcreteModelModule::ItemStack)]
    #[case(MapConcreteModelModule::PlayerRecord)]
    #[case(MapConcreteModelModule::BaseCampPassiveEffect)]
    fn test_no_op_module_encodes_empty(#[case] module: MapConcreteModelModule) {
        let data = Decoded::Record(module.clone()).encode();
        assert!(data.is_empty());

        let tag = module.module_type().tag();
        let decoded = decode_record::<MapConcreteModelModule>(&tag, &data).unwrap();
        assert_eq!(decoded, Decoded::Fallback(Vec::new()));
        assert_eq!(decoded.encode(), data);
    }

    #[test]
    fn test_no_op_module_with_data_is_reported() {
        let tag = ConcreteModelModuleType::Energy.tag();
        let err = decode_record::<MapConcreteModelModule>(&tag, &[0; 4]).unwrap_err();
        assert!(matches!(
            err.kind(),
            RawDataErrorKind::TrailingData { remaining: 4, .. }
        ));
    }

    #[test]
    fn test_invalid_bool_falls_back() {
        let module = MapConcreteModelModule::PasswordLock {
            lock_state: 0,
            password: String::new(),
            player_infos: vec![PlayerLockInfo::default()],
            trailing_bytes: [0; 4],
        };
        let mut data = Decoded::Record(module).encode();

        // try_success_cache sits just before the trailer
        let at = data.len() - 8;
        data[at] = 2;

        let tag = ConcreteModelModuleType::PasswordLock.tag();
        let decoded = decode_record::<MapConcreteModelModule>(&tag, &data).unwrap();
        assert_eq!(decoded, Decoded::Fallback(data));
    }
}
