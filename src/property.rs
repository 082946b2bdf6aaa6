use crate::archive::Guid;
use crate::rawdata::RawData;

/// A node of the property tree exchanged with the archive layer.
///
/// Only the shapes the raw data pass needs to navigate are modeled. Struct
/// fields and map entries keep their archive order so that a tree encodes
/// back in the order it was read.
///
/// ```
/// use palsav::Property;
///
/// let group = Property::Struct(vec![
///     ("GroupType".into(), Property::Enum("EPalGroupType::Neutral".into())),
///     ("RawData".into(), Property::Bytes(vec![])),
/// ]);
/// assert_eq!(group.get("GroupType").and_then(Property::as_str), Some("EPalGroupType::Neutral"));
/// assert!(group.get("Missing").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Property {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Enum(String),
    Guid(Guid),
    Bytes(Vec<u8>),
    Array(Vec<Property>),
    Map(Vec<(Property, Property)>),
    Struct(Vec<(String, Property)>),
    RawData(RawData),
}

impl Property {
    /// Looks up a struct field by name
    pub fn get(&self, name: &str) -> Option<&Property> {
        match self {
            Property::Struct(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Property> {
        match self {
            Property::Struct(fields) => fields
                .iter_mut()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// The text of a string or enum value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Property::Str(x) | Property::Enum(x) => Some(x.as_str()),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Property::Bytes(x) => Some(x.as_slice()),
            _ => None,
        }
    }

    pub fn as_raw_data(&self) -> Option<&RawData> {
        match self {
            Property::RawData(x) => Some(x),
            _ => None,
        }
    }
}
