//! Canonical component records and combination input shapes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Component category; a combo holds at most one record per category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Cpu,
    Gpu,
    Motherboard,
    Memory,
    PowerSupply,
    Case,
    Storage,
    Cooler,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Cpu,
        Category::Gpu,
        Category::Motherboard,
        Category::Memory,
        Category::PowerSupply,
        Category::Case,
        Category::Storage,
        Category::Cooler,
    ];

    /// Short display label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Cpu => "CPU",
            Category::Gpu => "GPU",
            Category::Motherboard => "Motherboard",
            Category::Memory => "RAM",
            Category::PowerSupply => "PSU",
            Category::Case => "Case",
            Category::Storage => "Storage",
            Category::Cooler => "Cooler",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One normalized component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub category: Category,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,
    /// Free-form detail keys; a missing key means "unknown", never zero
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl ComponentRecord {
    pub fn new(category: Category, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
            price: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_price(mut self, price: u64) -> Self {
        self.price = Some(price);
        self
    }

    /// First non-blank attribute among `keys`, compared case-insensitively
    pub fn attribute(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| {
            self.attributes
                .iter()
                .find(|(k, _)| k.trim().eq_ignore_ascii_case(key))
                .map(|(_, v)| v.trim())
                .filter(|v| !v.is_empty())
        })
    }
}

/// A candidate set of at most one component per category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Combo {
    parts: BTreeMap<Category, ComponentRecord>,
}

impl Combo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any earlier record of the same category
    pub fn insert(&mut self, record: ComponentRecord) -> Option<ComponentRecord> {
        self.parts.insert(record.category, record)
    }

    pub fn get(&self, category: Category) -> Option<&ComponentRecord> {
        self.parts.get(&category)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.parts.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentRecord> {
        self.parts.values()
    }

    /// One line per component, used in arbiter requests and CLI output
    pub fn describe(&self) -> String {
        self.parts
            .values()
            .map(|r| {
                let mut line = format!("- {}: {}", r.category.label(), r.name);
                if !r.attributes.is_empty() {
                    let details = r
                        .attributes
                        .iter()
                        .map(|(k, v)| format!("{}={}", k, v))
                        .collect::<Vec<_>>()
                        .join(", ");
                    line.push_str(&format!(" [{}]", details));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl FromIterator<ComponentRecord> for Combo {
    fn from_iter<I: IntoIterator<Item = ComponentRecord>>(iter: I) -> Self {
        let mut combo = Combo::new();
        for record in iter {
            combo.insert(record);
        }
        combo
    }
}

/// A record as supplied by an upstream candidate generator, before validation.
///
/// `attributes` may be an object or an encoded string; any other top-level
/// field (for example a recommended-supply note stored beside the name) is
/// folded into the attributes during normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default, alias = "제품명")]
    pub name: String,
    #[serde(default, alias = "가격", skip_serializing_if = "Option::is_none")]
    pub price: Option<serde_json::Value>,
    #[serde(default, alias = "상세정보", skip_serializing_if = "Option::is_none")]
    pub attributes: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RawRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Combination input: already structured, or free text to be scanned
#[derive(Debug, Clone)]
pub enum ComboInput {
    Structured(BTreeMap<String, RawRecord>),
    FreeText(String),
}

impl ComboInput {
    /// Parse a JSON object of category → record. Entries that are not
    /// record-shaped are dropped with a warning rather than failing the whole
    /// input.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut records = BTreeMap::new();
        for (key, value) in raw {
            match serde_json::from_value::<RawRecord>(value) {
                Ok(record) => {
                    records.insert(key, record);
                }
                Err(e) => {
                    tracing::warn!("Dropping malformed record for {:?}: {}", key, e);
                }
            }
        }
        Ok(ComboInput::Structured(records))
    }

    /// Treat `text` as JSON when it is a JSON object, otherwise as free text
    pub fn detect(text: &str) -> Self {
        if text.trim_start().starts_with('{') {
            if let Ok(input) = Self::from_json_str(text) {
                return input;
            }
        }
        ComboInput::FreeText(text.to_string())
    }
}

impl From<&str> for ComboInput {
    fn from(text: &str) -> Self {
        ComboInput::FreeText(text.to_string())
    }
}

impl From<String> for ComboInput {
    fn from(text: String) -> Self {
        ComboInput::FreeText(text)
    }
}
