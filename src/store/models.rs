use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// ISO-8601 UTC with a literal trailing `Z`, microsecond precision.
pub fn iso_utc(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn now_iso() -> String {
    iso_utc(Utc::now())
}

/// A glossary term in the current schema.
///
/// Timestamps are strings rather than `DateTime` so that values carried over
/// from legacy data survive byte-for-byte; new ones come from [`now_iso`].
/// Fields the schema doesn't model are preserved through the flattened map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub abbreviation: String,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Metadata for an uploaded image or PDF. The bytes live in the asset store
/// under `filename`, owned 1:1 by this record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub original: String,
    #[serde(default)]
    pub uploaded_at: String,
}

/// A math-equation snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// A raw term record as found on disk, classified once by field presence:
/// anything already carrying an `abbreviation` field, or lacking a legacy
/// `type` discriminator, is modern.
#[derive(Debug, Clone)]
pub enum RawTermRecord {
    Modern(ModernTermRecord),
    Legacy(LegacyTermRecord),
}

impl RawTermRecord {
    pub fn classify(value: &Value) -> Result<Self, serde_json::Error> {
        let modern = match value.as_object() {
            Some(obj) => obj.contains_key("abbreviation") || !obj.contains_key("type"),
            // Non-object entries fail the variant parse below, which the
            // caller treats as a corrupt collection.
            None => true,
        };
        if modern {
            Ok(RawTermRecord::Modern(serde_json::from_value(value.clone())?))
        } else {
            Ok(RawTermRecord::Legacy(serde_json::from_value(value.clone())?))
        }
    }
}

/// A current-schema record, with every field optional so migration can tell
/// a missing field from an empty one.
#[derive(Debug, Clone, Deserialize)]
pub struct ModernTermRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_tags")]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A pre-migration record carrying a `type` discriminator. When `type` is
/// "Abréviation", `term` holds the short form and `definition` the expanded
/// meaning. Timestamps are parsed out only so they don't linger in `extra`;
/// migration always reassigns them.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyTermRecord {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_tags")]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Tags as clients (and old data files) provide them: either a list or a
/// comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<Value>),
    Text(String),
    Other(Value),
}

impl TagsInput {
    /// Normalize to trimmed, non-empty entries. Non-string list items are
    /// dropped. Returns `None` for a shape that isn't a list or string,
    /// letting callers fall back to their own default.
    pub fn normalize(&self) -> Option<Vec<String>> {
        match self {
            TagsInput::Text(text) => Some(
                text.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect(),
            ),
            TagsInput::List(items) => Some(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect(),
            ),
            TagsInput::Other(_) => None,
        }
    }
}

fn lenient_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(TagsInput::deserialize(deserializer)?
        .normalize()
        .unwrap_or_default())
}

fn lenient_opt_tags<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    Ok(Some(
        TagsInput::deserialize(deserializer)?
            .normalize()
            .unwrap_or_default(),
    ))
}
