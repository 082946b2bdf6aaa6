#![no_main]
use libfuzzer_sys::fuzz_target;
use palsav::{RawData, RawDataKind};

const KINDS: [(RawDataKind, &[&str]); 8] = [
    (
        RawDataKind::BaseCampModule,
        &[
            "EPalBaseCampModuleType::Energy",
            "EPalBaseCampModuleType::TransportItemDirector",
            "EPalBaseCampModuleType::PassiveEffect",
        ],
    ),
    (RawDataKind::CharacterContainer, &[""]),
    (RawDataKind::Connector, &[""]),
    (
        RawDataKind::Group,
        &[
            "EPalGroupType::Neutral",
            "EPalGroupType::Guild",
            "EPalGroupType::IndependentGuild",
            "EPalGroupType::Organization",
        ],
    ),
    (RawDataKind::GuildItemStorage, &[""]),
    (RawDataKind::GuildLab, &[""]),
    (RawDataKind::ItemContainerSlot, &[""]),
    (
        RawDataKind::MapConcreteModelModule,
        &[
            "EPalMapObjectConcreteModelModuleType::ItemContainer",
            "EPalMapObjectConcreteModelModuleType::PasswordLock",
            "EPalMapObjectConcreteModelModuleType::RequireElementalAction",
            "EPalMapObjectConcreteModelModuleType::Switch",
        ],
    ),
];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, blob)) = data.split_first() else {
        return;
    };

    let (kind, tags) = KINDS[selector as usize % KINDS.len()];
    let tag = tags[(selector as usize / KINDS.len()) % tags.len()];

    // whatever the outcome, a decoded blob encodes back to its input
    if let Ok(decoded) = RawData::decode(kind, tag, blob) {
        assert_eq!(decoded.encode(), blob);
    }
});
