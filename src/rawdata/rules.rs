use super::{Outcome, RawData, RawDataErrorKind, RawDataKind};
use crate::property::Property;
use crate::rawdata::RawDataError;
use std::collections::HashMap;

/// Where a rule finds the type tag for its blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagSource {
    /// The kind has a single layout
    None,

    /// A sibling field of the struct holding the blob
    Field(String),

    /// The key of the nearest enclosing map entry
    MapKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDataRule {
    pub kind: RawDataKind,
    pub tag: TagSource,
}

/// Counts of blob outcomes from a tree decode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    pub structured: usize,
    pub empty: usize,
    pub fallback: usize,
}

impl DecodeSummary {
    pub fn total(&self) -> usize {
        self.structured + self.empty + self.fallback
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Record => self.structured += 1,
            Outcome::Empty => self.empty += 1,
            Outcome::Fallback => self.fallback += 1,
        }
    }
}

const GROUP: &str = ".worldSaveData.GroupSaveDataMap.Value.RawData";
const BASE_CAMP_MODULE: &str = ".worldSaveData.BaseCampSaveData.Value.ModuleMap.Value.RawData";
const CHARACTER_CONTAINER: &str = ".worldSaveData.CharacterContainerSaveData.Value.Slots.Slots.RawData";
const ITEM_CONTAINER_SLOT: &str = ".worldSaveData.ItemContainerSaveData.Value.Slots.Slots.RawData";
const CONNECTOR: &str = ".worldSaveData.MapObjectSaveData.MapObjectSaveData.Model.Connector.RawData";
const MAP_CONCRETE_MODEL_MODULE: &str =
    ".worldSaveData.MapObjectSaveData.MapObjectSaveData.ConcreteModel.ModuleMap.Value.RawData";
const GUILD_ITEM_STORAGE: &str = ".worldSaveData.GuildExtraSaveDataMap.Value.GuildItemStorage.RawData";
const GUILD_LAB: &str = ".worldSaveData.GuildExtraSaveDataMap.Value.Lab.RawData";

/// Maps property paths to the raw record kind stored there.
///
/// A path is built while walking the tree: a struct field appends
/// `.FieldName`, a map appends `.Key` or `.Value` and array elements share
/// the path of their array. Only struct fields holding bytes are matched.
///
/// ```
/// use palsav::rawdata::{RawDataRules, RawDataKind};
/// use palsav::Property;
///
/// let rules = RawDataRules::default();
/// let mut tree = Property::Struct(vec![(
///     "worldSaveData".into(),
///     Property::Struct(vec![(
///         "GuildExtraSaveDataMap".into(),
///         Property::Map(vec![(
///             Property::Guid(Default::default()),
///             Property::Struct(vec![(
///                 "Lab".into(),
///                 Property::Struct(vec![("RawData".into(), Property::Bytes(vec![]))]),
///             )]),
///         )]),
///     )]),
/// )]);
///
/// let summary = rules.decode_tree(&mut tree)?;
/// assert_eq!(summary.empty, 1);
///
/// rules.encode_tree(&mut tree);
/// # Ok::<(), palsav::rawdata::RawDataError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RawDataRules {
    rules: HashMap<String, RawDataRule>,
}

impl Default for RawDataRules {
    fn default() -> Self {
        RawDataRules::builder().build()
    }
}

impl RawDataRules {
    /// A builder seeded with the rules for every known save location
    pub fn builder() -> RawDataRulesBuilder {
        RawDataRulesBuilder::default()
    }

    pub fn get(&self, path: &str) -> Option<&RawDataRule> {
        self.rules.get(path)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Replaces every matching byte array with its decoded record.
    ///
    /// Blobs the registry does not understand become fallbacks and are
    /// counted as such. An error is only returned for an integrity fault
    /// or when a rule's tag cannot be found. On error `root` is left as it
    /// was before the call.
    pub fn decode_tree(&self, root: &mut Property) -> Result<DecodeSummary, RawDataError> {
        let mut summary = DecodeSummary::default();
        let mut path = String::new();
        let mut scratch = root.clone();
        self.decode_node(&mut scratch, &mut path, None, &mut summary)?;
        *root = scratch;
        log::debug!(
            "decoded {} raw blobs ({} structured, {} empty, {} fallback)",
            summary.total(),
            summary.structured,
            summary.empty,
            summary.fallback
        );
        Ok(summary)
    }

    fn decode_node(
        &self,
        node: &mut Property,
        path: &mut String,
        map_key: Option<&str>,
        summary: &mut DecodeSummary,
    ) -> Result<(), RawDataError> {
        match node {
            Property::Struct(fields) => {
                for i in 0..fields.len() {
                    let len = path.len();
                    path.push('.');
                    path.push_str(&fields[i].0);

                    let decoded = match (self.rules.get(path.as_str()), &fields[i].1) {
                        (Some(rule), Property::Bytes(data)) => {
                            let tag = match &rule.tag {
                                TagSource::None => Some(""),
                                TagSource::Field(name) => fields
                                    .iter()
                                    .find(|(n, _)| n == name)
                                    .and_then(|(_, v)| v.as_str()),
                                TagSource::MapKey => map_key,
                            };

                            let tag = tag.ok_or_else(|| RawDataErrorKind::MissingTag {
                                kind: rule.kind,
                                path: path.clone(),
                            })?;
                            Some(RawData::decode(rule.kind, tag, data)?)
                        }
                        _ => None,
                    };

                    match decoded {
                        Some(decoded) => {
                            summary.record(decoded.outcome());
                            fields[i].1 = Property::RawData(decoded);
                        }
                        None => self.decode_node(&mut fields[i].1, path, map_key, summary)?,
                    }
                    path.truncate(len);
                }
            }
            Property::Map(entries) => {
                for (key, value) in entries.iter_mut() {
                    let len = path.len();
                    path.push_str(".Key");
                    self.decode_node(key, path, map_key, summary)?;
                    path.truncate(len);

                    path.push_str(".Value");
                    self.decode_node(value, path, key.as_str(), summary)?;
                    path.truncate(len);
                }
            }
            Property::Array(items) => {
                for item in items.iter_mut() {
                    self.decode_node(item, path, map_key, summary)?;
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Converts every decoded record in the tree back into its bytes
    pub fn encode_tree(&self, root: &mut Property) {
        match root {
            Property::RawData(data) => {
                let bytes = data.encode();
                *root = Property::Bytes(bytes);
            }
            Property::Struct(fields) => {
                for (_, value) in fields.iter_mut() {
                    self.encode_tree(value);
                }
            }
            Property::Map(entries) => {
                for (key, value) in entries.iter_mut() {
                    self.encode_tree(key);
                    self.encode_tree(value);
                }
            }
            Property::Array(items) => {
                for item in items.iter_mut() {
                    self.encode_tree(item);
                }
            }
            _ => {}
        }
    }
}

/// Configures the paths a [`RawDataRules`] decodes
#[derive(Debug, Clone)]
pub struct RawDataRulesBuilder {
    rules: HashMap<String, RawDataRule>,
}

impl Default for RawDataRulesBuilder {
    fn default() -> Self {
        let field = |name: &str| TagSource::Field(name.to_string());
        RawDataRulesBuilder::empty()
            .rule(GROUP, RawDataKind::Group, field("GroupType"))
            .rule(BASE_CAMP_MODULE, RawDataKind::BaseCampModule, TagSource::MapKey)
            .rule(CHARACTER_CONTAINER, RawDataKind::CharacterContainer, TagSource::None)
            .rule(ITEM_CONTAINER_SLOT, RawDataKind::ItemContainerSlot, TagSource::None)
            .rule(CONNECTOR, RawDataKind::Connector, TagSource::None)
            .rule(
                MAP_CONCRETE_MODEL_MODULE,
                RawDataKind::MapConcreteModelModule,
                TagSource::MapKey,
            )
            .rule(GUILD_ITEM_STORAGE, RawDataKind::GuildItemStorage, TagSource::None)
            .rule(GUILD_LAB, RawDataKind::GuildLab, TagSource::None)
    }
}

impl RawDataRulesBuilder {
    /// A builder without any rules
    pub fn empty() -> Self {
        RawDataRulesBuilder {
            rules: HashMap::new(),
        }
    }

    /// Adds or replaces the rule for a path
    pub fn rule(mut self, path: &str, kind: RawDataKind, tag: TagSource) -> Self {
        self.rules.insert(path.to_string(), RawDataRule { kind, tag });
        self
    }

    pub fn remove(mut self, path: &str) -> Self {
        self.rules.remove(path);
        self
    }

    pub fn build(self) -> RawDataRules {
        RawDataRules { rules: self.rules }
    }
}
