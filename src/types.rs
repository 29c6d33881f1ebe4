use std::collections::BTreeMap;
use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::enum_display_fromstr;
use crate::error::FolioError;

/// Directory holding per-project folio state (config, fixtures).
pub const FOLIO_DIR: &str = ".folio";

/// Stable identifier of an item in a remote collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Identifier of a facet tag (a slug such as `wedding`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(String);

impl TagId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TagId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A label attached to items, used as a single-select filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacetTag {
    pub id: TagId,
    pub name: String,
}

impl FacetTag {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: TagId::new(id),
            name: name.into(),
        }
    }
}

/// Status facet shared by the collection kinds.
///
/// Posts are `published`/`draft`, templates are `free`/`paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[serde(alias = "PUBLISHED")]
    Published,
    #[serde(alias = "DRAFT")]
    Draft,
    Free,
    Paid,
}

enum_display_fromstr!(
    ItemStatus,
    FolioError::InvalidStatus,
    {
        Published => "published",
        Draft => "draft",
        Free => "free",
        Paid => "paid",
    }
);

impl ItemStatus {
    /// Wire form expected by sources (`PUBLISHED`, `DRAFT`, `free`, `paid`).
    pub fn as_param(self) -> &'static str {
        match self {
            ItemStatus::Published => "PUBLISHED",
            ItemStatus::Draft => "DRAFT",
            ItemStatus::Free => "free",
            ItemStatus::Paid => "paid",
        }
    }
}

/// A named field value an item carries for display, filtering and sorting.
///
/// Deserialization tries a number, then an RFC 3339 timestamp, then falls
/// back to text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Date(Timestamp),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) if n.fract() == 0.0 => write!(f, "{n:.0}"),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Date(ts) => write!(f, "{}", ts.strftime("%Y-%m-%d")),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<u64> for FieldValue {
    fn from(n: u64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<Timestamp> for FieldValue {
    fn from(ts: Timestamp) -> Self {
        FieldValue::Date(ts)
    }
}

/// A record of a remote collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<FacetTag>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl Item {
    pub fn new(id: u64) -> Self {
        Self {
            id: ItemId::new(id),
            status: None,
            tags: Vec::new(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_status(mut self, status: ItemStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_tag(mut self, tag: FacetTag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(FieldValue::as_text)
    }

    pub fn has_tag(&self, tag: &TagId) -> bool {
        self.tags.iter().any(|t| &t.id == tag)
    }

    /// Human label: the first of `title`, `name`, `user_name`, else the id.
    pub fn label(&self) -> String {
        ["title", "name", "user_name"]
            .iter()
            .find_map(|f| self.text(f))
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", self.id))
    }
}

/// Payload for create and update calls.
///
/// On update, only the parts that are set replace the stored item's values;
/// fields are merged key by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<FacetTag>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldValue>,
}

impl ItemDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: ItemStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn tags(mut self, tags: Vec<FacetTag>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.tags.is_none() && self.fields.is_empty()
    }

    /// Build a fresh item from this draft.
    pub fn into_item(self, id: ItemId) -> Item {
        Item {
            id,
            status: self.status,
            tags: self.tags.unwrap_or_default(),
            fields: self.fields,
        }
    }

    /// Merge this draft into an existing item.
    pub fn apply_to(self, item: &mut Item) {
        if let Some(status) = self.status {
            item.status = Some(status);
        }
        if let Some(tags) = self.tags {
            item.tags = tags;
        }
        item.fields.extend(self.fields);
    }
}
