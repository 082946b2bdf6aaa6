use super::common::write_all;
use super::{Decoded, EofPolicy, ItemAndNum, RawDataKind, RawRecord};
use crate::archive::{ArchiveError, ArchiveErrorKind, ArchiveReader, ArchiveWriter, Vector};

/// The module types a base camp can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BaseCampModuleType {
    Energy,
    Medical,
    ResourceCollector,
    ItemStorages,
    FacilityReservation,
    ObjectMaintenance,
    ItemStackInfo,
    TransportItemDirector,
    PassiveEffect,
}

impl BaseCampModuleType {
    const ALL: [BaseCampModuleType; 9] = [
        BaseCampModuleType::Energy,
        BaseCampModuleType::Medical,
        BaseCampModuleType::ResourceCollector,
        BaseCampModuleType::ItemStorages,
        BaseCampModuleType::FacilityReservation,
        BaseCampModuleType::ObjectMaintenance,
        BaseCampModuleType::ItemStackInfo,
        BaseCampModuleType::TransportItemDirector,
        BaseCampModuleType::PassiveEffect,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|x| x.tag() == tag)
    }

    pub const fn tag(&self) -> &'static str {
        match self {
            BaseCampModuleType::Energy => "EPalBaseCampModuleType::Energy",
            BaseCampModuleType::Medical => "EPalBaseCampModuleType::Medical",
            BaseCampModuleType::ResourceCollector => "EPalBaseCampModuleType::ResourceCollector",
            BaseCampModuleType::ItemStorages => "EPalBaseCampModuleType::ItemStorages",
            BaseCampModuleType::FacilityReservation => {
                "EPalBaseCampModuleType::FacilityReservation"
            }
            BaseCampModuleType::ObjectMaintenance => "EPalBaseCampModuleType::ObjectMaintenance",
            BaseCampModuleType::ItemStackInfo => "EPalBaseCampModuleType::ItemStackInfo",
            BaseCampModuleType::TransportItemDirector => {
                "EPalBaseCampModuleType::TransportItemDirector"
            }
            BaseCampModuleType::PassiveEffect => "EPalBaseCampModuleType::PassiveEffect",
        }
    }

    /// Infrastructure modules whose blob carries nothing
    pub fn is_no_op(&self) -> bool {
        !matches!(
            self,
            BaseCampModuleType::TransportItemDirector | BaseCampModuleType::PassiveEffect
        )
    }
}

/// Items a worker is hauling and where they are
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransportItemCharacterInfo {
    pub item_infos: Vec<ItemAndNum>,
    pub character_location: Vector,
}

impl TransportItemCharacterInfo {
    fn read(reader: &mut ArchiveReader<'_>) -> Result<Self, ArchiveError> {
        Ok(TransportItemCharacterInfo {
            item_infos: reader.tarray(ItemAndNum::read)?,
            character_location: reader.vector()?,
        })
    }

    fn write(&self, writer: &mut ArchiveWriter) {
        write_all(writer, &self.item_infos, ItemAndNum::write);
        writer.vector(&self.character_location);
    }
}

/// A base camp wide passive effect
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PassiveEffect {
    None,
    WorkSuitability,
    WorkHard {
        work_hard_type: u8,
        unknown_trailer: [u8; 12],
    },
    AllWorkSpeed,
    SanityDecreaseSuppressor,
    Max,
}

impl PassiveEffect {
    pub fn value(&self) -> u8 {
        match self {
            PassiveEffect::None => 0,
            PassiveEffect::WorkSuitability => 1,
            PassiveEffect::WorkHard { .. } => 2,
            PassiveEffect::AllWorkSpeed => 3,
            PassiveEffect::SanityDecreaseSuppressor => 4,
            PassiveEffect::Max => 5,
        }
    }

    fn read(reader: &mut ArchiveReader<'_>) -> Result<Self, ArchiveError> {
        let position = reader.position();
        let effect = match reader.byte()? {
            0 => PassiveEffect::None,
            1 => PassiveEffect::WorkSuitability,
            2 => PassiveEffect::WorkHard {
                work_hard_type: reader.byte()?,
                unknown_trailer: reader.byte_array()?,
            },
            3 => PassiveEffect::AllWorkSpeed,
            4 => PassiveEffect::SanityDecreaseSuppressor,
            5 => PassiveEffect::Max,
            value => {
                let kind = ArchiveErrorKind::UnknownEnum {
                    name: "EPalBaseCampPassiveEffectType",
                    value,
                };
                return Err(kind.at(position));
            }
        };
        Ok(effect)
    }

    fn write(&self, writer: &mut ArchiveWriter) {
        writer.byte(self.value());
        if let PassiveEffect::WorkHard {
            work_hard_type,
            unknown_trailer,
        } = self
        {
            writer.byte(*work_hard_type);
            writer.write(unknown_trailer);
        }
    }
}

/// The payload of a base camp's module map entry
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BaseCampModule {
    /// An infrastructure module with no payload
    NoOp,

    TransportItemDirector {
        transport_item_character_infos: Vec<TransportItemCharacterInfo>,
        trailing_bytes: [u8; 4],
    },

    PassiveEffect {
        passive_effects: Vec<PassiveEffect>,
    },
}

impl RawRecord for BaseCampModule {
    const KIND: RawDataKind = RawDataKind::BaseCampModule;
    const EOF_POLICY: EofPolicy = EofPolicy::Fallback;

    fn empty() -> Option<Decoded<Self>> {
        None
    }

    fn read(tag: &str, reader: &mut ArchiveReader<'_>) -> Result<Option<Self>, ArchiveError> {
        let Some(module_type) = BaseCampModuleType::from_tag(tag) else {
            return Ok(None);
        };

        let module = match module_type {
            BaseCampModuleType::TransportItemDirector => BaseCampModule::TransportItemDirector {
                transport_item_character_infos: reader.tarray(TransportItemCharacterInfo::read)?,
                trailing_bytes: reader.byte_array()?,
            },
            BaseCampModuleType::PassiveEffect => BaseCampModule::PassiveEffect {
                passive_effects: reader.tarray(PassiveEffect::read)?,
            },
            _ => BaseCampModule::NoOp,
        };
        Ok(Some(module))
    }

    fn write(&self, writer: &mut ArchiveWriter) {
        match self {
            BaseCampModule::NoOp => {}
            BaseCampModule::TransportItemDirector {
                transport_item_character_infos,
                trailing_bytes,
            } => {
                write_all(
                    writer,
                    transport_item_character_infos,
                    TransportItemCharacterInfo::write,
                );
                writer.write(trailing_bytes);
            }
            BaseCampModule::PassiveEffect { passive_effects } => {
                write_all(writer, passive_effects, PassiveEffect::write);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::Guid;
    use crate::rawdata::{decode_record, DynamicItemId, ItemId};
    use rstest::*;

    fn transport_director() -> BaseCampModule {
        BaseCampModule::TransportItemDirector {
            transport_item_character_infos: vec![TransportItemCharacterInfo {
                item_infos: vec![ItemAndNum {
                    item_id: ItemId {
                        static_id: "Stone".into(),
                        dynamic_id: DynamicItemId {
                            created_world_id: Guid::NIL,
                            local_id_in_created_world: Guid::from_bytes([9; 16]),
                        },
                    },
                    num: 12,
                }],
                character_location: Vector {
                    x: 1.0,
                    y: -2.5,
                    z: 300.0,
                },
            }],
            trailing_bytes: [1, 2, 3, 4],
        }
    }

    #[rstest]
    #[case(BaseCampModuleType::TransportItemDirector, transport_director())]
    #[case(
        BaseCampModuleType::PassiveEffect,
        BaseCampModule::PassiveEffect {
            passive_effects: vec![
                PassiveEffect::WorkSuitability,
                PassiveEffect::WorkHard { work_hard_type: 3, unknown_trailer: [7; 12] },
                PassiveEffect::Max,
            ],
        }
    )]
    #[case(BaseCampModuleType::Medical, BaseCampModule::NoOp)]
    fn test_structural_roundtrip(
        #[case] module_type: BaseCampModuleType,
        #[case] module: BaseCampModule,
    ) {
        let data = Decoded::Record(module.clone()).encode();
        let decoded = decode_record::<BaseCampModule>(module_type.tag(), &data).unwrap();
        assert_eq!(decoded, Decoded::Record(module));
        assert_eq!(decoded.encode(), data);
    }

    #[test]
    fn test_no_op_types() {
        let no_ops: Vec<_> = BaseCampModuleType::ALL
            .into_iter()
            .filter(|x| x.is_no_op())
            .collect();
        assert_eq!(no_ops.len(), 7);

        for module_type in no_ops {
            let decoded = decode_record::<BaseCampModule>(module_type.tag(), &[]).unwrap();
            assert_eq!(decoded, Decoded::Record(BaseCampModule::NoOp));
        }
    }

    #[test]
    fn test_no_op_with_data_falls_back() {
        let tag = BaseCampModuleType::Energy.tag();
        let decoded = decode_record::<BaseCampModule>(tag, &[0, 1]).unwrap();
        assert_eq!(decoded, Decoded::Fallback(vec![0, 1]));
    }

    #[test]
    fn test_unknown_passive_effect_falls_back() {
        let data = [1, 0, 0, 0, 6];
        let tag = BaseCampModuleType::PassiveEffect.tag();
        let decoded = decode_record::<BaseCampModule>(tag, &data).unwrap();
        assert_eq!(decoded, Decoded::Fallback(data.to_vec()));
        assert_eq!(decoded.encode(), data);
    }

    #[test]
    fn test_transport_missing_trailer_falls_back() {
        let data = [0, 0, 0, 0, 1, 2];
        let tag = BaseCampModuleType::TransportItemDirector.tag();
        let decoded = decode_record::<BaseCampModule>(tag, &data).unwrap();
        assert!(decoded.is_fallback());
    }
}
