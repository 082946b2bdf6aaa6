use super::common::write_all;
use super::{Decoded, EofPolicy, RawDataKind, RawRecord};
use crate::archive::{ArchiveError, ArchiveReader, ArchiveWriter, Guid};

/// The group types with a known layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupType {
    Neutral,
    Guild,
    IndependentGuild,
    Organization,
}

impl GroupType {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "EPalGroupType::Neutral" => Some(GroupType::Neutral),
            "EPalGroupType::Guild" => Some(GroupType::Guild),
            "EPalGroupType::IndependentGuild" => Some(GroupType::IndependentGuild),
            "EPalGroupType::Organization" => Some(GroupType::Organization),
            _ => None,
        }
    }

    pub const fn tag(&self) -> &'static str {
        match self {
            GroupType::Neutral => "EPalGroupType::Neutral",
            GroupType::Guild => "EPalGroupType::Guild",
            GroupType::IndependentGuild => "EPalGroupType::IndependentGuild",
            GroupType::Organization => "EPalGroupType::Organization",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterHandleId {
    pub guid: Guid,
    pub instance_id: Guid,
}

impl CharacterHandleId {
    fn read(reader: &mut ArchiveReader<'_>) -> Result<Self, ArchiveError> {
        Ok(CharacterHandleId {
            guid: reader.guid()?,
            instance_id: reader.guid()?,
        })
    }

    fn write(&self, writer: &mut ArchiveWriter) {
        writer.guid(&self.guid);
        writer.guid(&self.instance_id);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerInfo {
    pub last_online_real_time: i64,
    pub player_name: String,
}

impl PlayerInfo {
    fn read(reader: &mut ArchiveReader<'_>) -> Result<Self, ArchiveError> {
        Ok(PlayerInfo {
            last_online_real_time: reader.i64()?,
            player_name: reader.fstring()?,
        })
    }

    fn write(&self, writer: &mut ArchiveWriter) {
        writer.i64(self.last_online_real_time);
        writer.fstring(&self.player_name);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GuildPlayer {
    pub player_uid: Guid,
    pub player_info: PlayerInfo,
}

impl GuildPlayer {
    fn read(reader: &mut ArchiveReader<'_>) -> Result<Self, ArchiveError> {
        Ok(GuildPlayer {
            player_uid: reader.guid()?,
            player_info: PlayerInfo::read(reader)?,
        })
    }

    fn write(&self, writer: &mut ArchiveWriter) {
        writer.guid(&self.player_uid);
        self.player_info.write(writer);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Guild {
    pub org_type: u8,
    pub leading_bytes: [u8; 4],
    pub base_ids: Vec<Guid>,
    pub unknown_1: i32,
    pub base_camp_level: i32,
    pub map_object_instance_ids_base_camp_points: Vec<Guid>,
    pub guild_name: String,
    pub last_guild_name_modifier_player_uid: Guid,
    pub unknown_2: [u8; 20],
    pub players: Vec<GuildPlayer>,
    pub trailing_bytes: [u8; 4],
}

impl Guild {
    fn read(org_type: u8, reader: &mut ArchiveReader<'_>) -> Result<Self, ArchiveError> {
        Ok(Guild {
            org_type,
            leading_bytes: reader.byte_array()?,
            base_ids: reader.tarray(|r| r.guid())?,
            unknown_1: reader.i32()?,
            base_camp_level: reader.i32()?,
            map_object_instance_ids_base_camp_points: reader.tarray(|r| r.guid())?,
            guild_name: reader.fstring()?,
            last_guild_name_modifier_player_uid: reader.guid()?,
            unknown_2: reader.byte_array()?,
            players: reader.tarray(GuildPlayer::read)?,
            trailing_bytes: reader.byte_array()?,
        })
    }

    fn write(&self, writer: &mut ArchiveWriter) {
        writer.write(&self.leading_bytes);
        writer.tarray(&self.base_ids, |w, x| w.guid(x));
        writer.i32(self.unknown_1);
        writer.i32(self.base_camp_level);
        writer.tarray(&self.map_object_instance_ids_base_camp_points, |w, x| {
            w.guid(x)
        });
        writer.fstring(&self.guild_name);
        writer.guid(&self.last_guild_name_modifier_player_uid);
        writer.write(&self.unknown_2);
        write_all(writer, &self.players, GuildPlayer::write);
        writer.write(&self.trailing_bytes);
    }
}

/// A single player's guild
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndependentGuild {
    pub org_type: u8,
    pub base_camp_level: i32,
    pub map_object_instance_ids_base_camp_points: Vec<Guid>,
    pub guild_name: String,
    pub player_uid: Guid,
    pub guild_name_2: String,
    pub player_info: PlayerInfo,
}

impl IndependentGuild {
    fn read(org_type: u8, reader: &mut ArchiveReader<'_>) -> Result<Self, ArchiveError> {
        Ok(IndependentGuild {
            org_type,
            base_camp_level: reader.i32()?,
            map_object_instance_ids_base_camp_points: reader.tarray(|r| r.guid())?,
            guild_name: reader.fstring()?,
            player_uid: reader.guid()?,
            guild_name_2: reader.fstring()?,
            player_info: PlayerInfo::read(reader)?,
        })
    }

    fn write(&self, writer: &mut ArchiveWriter) {
        writer.i32(self.base_camp_level);
        writer.tarray(&self.map_object_instance_ids_base_camp_points, |w, x| {
            w.guid(x)
        });
        writer.fstring(&self.guild_name);
        writer.guid(&self.player_uid);
        writer.fstring(&self.guild_name_2);
        self.player_info.write(writer);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Organization {
    pub org_type: u8,
    pub trailing_bytes: [u8; 12],
}

/// Fields that depend on the group type
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupDetails {
    Neutral,
    Guild(Box<Guild>),
    IndependentGuild(Box<IndependentGuild>),
    Organization(Organization),
}

impl GroupDetails {
    pub fn group_type(&self) -> GroupType {
        match self {
            GroupDetails::Neutral => GroupType::Neutral,
            GroupDetails::Guild(_) => GroupType::Guild,
            GroupDetails::IndependentGuild(_) => GroupType::IndependentGuild,
            GroupDetails::Organization(_) => GroupType::Organization,
        }
    }
}

/// An entry of the world's group map
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    pub group_id: Guid,
    pub group_name: String,
    pub individual_character_handle_ids: Vec<CharacterHandleId>,
    pub details: GroupDetails,
}

impl Group {
    pub fn group_type(&self) -> GroupType {
        self.details.group_type()
    }
}

impl RawRecord for Group {
    const KIND: RawDataKind = RawDataKind::Group;
    const EOF_POLICY: EofPolicy = EofPolicy::Strict;

    fn empty() -> Option<Decoded<Self>> {
        None
    }

    fn read(tag: &str, reader: &mut ArchiveReader<'_>) -> Result<Option<Self>, ArchiveError> {
        let Some(group_type) = GroupType::from_tag(tag) else {
            return Ok(None);
        };

        let group_id = reader.guid()?;
        let group_name = reader.fstring()?;
        let individual_character_handle_ids = reader.tarray(CharacterHandleId::read)?;

        let details = match group_type {
            GroupType::Neutral => GroupDetails::Neutral,
            GroupType::Guild => {
                let org_type = reader.byte()?;
                GroupDetails::Guild(Box::new(Guild::read(org_type, reader)?))
            }
            GroupType::IndependentGuild => {
                let org_type = reader.byte()?;
                let guild = IndependentGuild::read(org_type, reader)?;
                GroupDetails::IndependentGuild(Box::new(guild))
            }
            GroupType::Organization => GroupDetails::Organization(Organization {
                org_type: reader.byte()?,
                trailing_bytes: reader.byte_array()?,
            }),
        };

        Ok(Some(Group {
            group_id,
            group_name,
            individual_character_handle_ids,
            details,
        }))
    }

    fn write(&self, writer: &mut ArchiveWriter) {
        writer.guid(&self.group_id);
        writer.fstring(&self.group_name);
        write_all(
            writer,
            &self.individual_character_handle_ids,
            CharacterHandleId::write,
        );

        match &self.details {
            GroupDetails::Neutral => {}
            GroupDetails::Guild(guild) => {
                writer.byte(guild.org_type);
                guild.write(writer);
            }
            GroupDetails::IndependentGuild(guild) => {
                writer.byte(guild.org_type);
                guild.write(writer);
            }
            GroupDetails::Organization(org) => {
                writer.byte(org.org_type);
                writer.write(&org.trailing_bytes);
            }
        }
    }
}
