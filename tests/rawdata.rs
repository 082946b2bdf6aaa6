use palsav::archive::Guid;
use palsav::rawdata::{
    decode_record, Decoded, Group, GroupDetails, GroupType, Outcome, RawDataErrorKind,
    RawDataRules,
};
use palsav::{Property, RawData, RawDataKind};

fn ascii(data: &mut Vec<u8>, text: &str) {
    data.extend_from_slice(&(text.len() as i32 + 1).to_le_bytes());
    data.extend_from_slice(text.as_bytes());
    data.push(0);
}

fn utf16(data: &mut Vec<u8>, text: &str) {
    let units: Vec<u16> = text.encode_utf16().collect();
    data.extend_from_slice(&(-(units.len() as i32 + 1)).to_le_bytes());
    for unit in units {
        data.extend_from_slice(&unit.to_le_bytes());
    }
    data.extend_from_slice(&[0, 0]);
}

fn count(data: &mut Vec<u8>, n: u32) {
    data.extend_from_slice(&n.to_le_bytes());
}

/// A guild group laid out field by field
fn guild_sample() -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&[0x10; 16]);
    ascii(&mut data, "EPalGroupType::Guild");
    count(&mut data, 1);
    data.extend_from_slice(&[0x20; 16]);
    data.extend_from_slice(&[0x21; 16]);

    // org type and leading bytes
    data.push(0);
    data.extend_from_slice(&[1, 0, 0, 0]);

    count(&mut data, 2);
    data.extend_from_slice(&[0x30; 16]);
    data.extend_from_slice(&[0x31; 16]);
    data.extend_from_slice(&7i32.to_le_bytes());
    data.extend_from_slice(&12i32.to_le_bytes());
    count(&mut data, 1);
    data.extend_from_slice(&[0x40; 16]);
    utf16(&mut data, "パルの里");
    data.extend_from_slice(&[0x50; 16]);
    data.extend_from_slice(&[0xee; 20]);

    count(&mut data, 2);
    data.extend_from_slice(&[0x60; 16]);
    data.extend_from_slice(&638_400_000_000_000_000i64.to_le_bytes());
    ascii(&mut data, "Anubis");
    data.extend_from_slice(&[0x61; 16]);
    data.extend_from_slice(&0i64.to_le_bytes());
    utf16(&mut data, "ゼノ");

    data.extend_from_slice(&[0, 0, 0, 0]);
    data
}

#[test]
fn test_guild_group_sample() {
    let data = guild_sample();
    let decoded = decode_record::<Group>(&GroupType::Guild.tag(), &data).unwrap();
    let group = decoded.record().unwrap();

    assert_eq!(group.group_type(), GroupType::Guild);
    assert_eq!(group.group_name, "EPalGroupType::Guild");
    assert_eq!(group.individual_character_handle_ids.len(), 1);

    let GroupDetails::Guild(guild) = &group.details else {
        panic!("expected guild details");
    };
    assert_eq!(guild.leading_bytes, [1, 0, 0, 0]);
    assert_eq!(
        guild.base_ids,
        vec![Guid::from_bytes([0x30; 16]), Guid::from_bytes([0x31; 16])]
    );
    assert_eq!(guild.unknown_1, 7);
    assert_eq!(guild.base_camp_level, 12);
    assert_eq!(guild.guild_name, "パルの里");
    assert_eq!(guild.unknown_2, [0xee; 20]);
    assert_eq!(guild.players.len(), 2);
    assert_eq!(guild.players[0].player_info.player_name, "Anubis");
    assert_eq!(guild.players[1].player_info.player_name, "ゼノ");

    assert_eq!(decoded.encode(), data);
}

#[test]
fn test_guild_group_trailing_data() {
    let mut data = guild_sample();
    data.extend_from_slice(&[9, 9]);
    let err = decode_record::<Group>(&GroupType::Guild.tag(), &data).unwrap_err();
    assert_eq!(
        err.kind(),
        &RawDataErrorKind::TrailingData {
            kind: RawDataKind::Group,
            tag: "EPalGroupType::Guild".into(),
            remaining: 2,
        }
    );
}

#[test]
fn test_guild_group_cut_short_falls_back() {
    let data = guild_sample();
    let short = &data[..data.len() - 10];
    let decoded = RawData::decode(RawDataKind::Group, "EPalGroupType::Guild", short).unwrap();
    assert_eq!(decoded.outcome(), Outcome::Fallback);
    assert_eq!(decoded.encode(), short);
}

fn field(name: &str, value: Property) -> (String, Property) {
    (name.to_string(), value)
}

#[test]
fn test_world_tree_roundtrip() {
    let group = Property::Struct(vec![
        field("GroupType", Property::Enum("EPalGroupType::Guild".into())),
        field("RawData", Property::Bytes(guild_sample())),
    ]);
    let unknown_group = Property::Struct(vec![
        field("GroupType", Property::Enum("EPalGroupType::Alliance".into())),
        field("RawData", Property::Bytes(vec![1, 2, 3, 4])),
    ]);

    let lab = Property::Struct(vec![
        field("GuildItemStorage", Property::Struct(vec![field(
            "RawData",
            Property::Bytes([[0x70; 16], [0; 16]].concat()),
        )])),
        field("Lab", Property::Struct(vec![field("RawData", Property::Bytes(vec![]))])),
    ]);

    let mut tree = Property::Struct(vec![field(
        "worldSaveData",
        Property::Struct(vec![
            field(
                "GroupSaveDataMap",
                Property::Map(vec![
                    (Property::Guid(Guid::from_bytes([1; 16])), group),
                    (Property::Guid(Guid::from_bytes([2; 16])), unknown_group),
                ]),
            ),
            field(
                "GuildExtraSaveDataMap",
                Property::Map(vec![(Property::Guid(Guid::from_bytes([1; 16])), lab)]),
            ),
            field("Timestamp", Property::Int(1_700_000_000)),
        ]),
    )]);
    let original = tree.clone();

    let rules = RawDataRules::default();
    let summary = rules.decode_tree(&mut tree).unwrap();
    assert_eq!(summary.structured, 2);
    assert_eq!(summary.empty, 1);
    assert_eq!(summary.fallback, 1);

    let world = tree.get("worldSaveData").unwrap();
    let Some(Property::Map(groups)) = world.get("GroupSaveDataMap") else {
        panic!("expected group map");
    };
    let raw = groups[0].1.get("RawData").and_then(Property::as_raw_data);
    match raw {
        Some(RawData::Group(Decoded::Record(group))) => {
            assert_eq!(group.group_type(), GroupType::Guild)
        }
        x => panic!("unexpected group: {:?}", x),
    }

    rules.encode_tree(&mut tree);
    assert_eq!(tree, original);
}
