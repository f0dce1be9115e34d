//! JSON:API document model.
//!
//! Only the members the normalizer needs are modelled: primary `data`,
//! side-loaded `included` and `meta`. Relationship objects are kept as raw
//! [`Value`]s because their shape is interpreted leniently during resolution
//! (see [`crate::jsonapi::resolve`]).

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::{AdminError, Result};

/// `(id, type)` pair identifying a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    /// Resource id, unique within `type`
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Backend resource type
    pub r#type: String,
}

impl ResourceIdentifier {
    /// Create an identifier from any string-like id and type.
    pub fn new(id: impl Into<String>, r#type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            r#type: r#type.into(),
        }
    }

    /// Parse a resource identifier object, returning `None` for anything else.
    ///
    /// Numeric ids are accepted and converted to strings; many servers emit them.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let id = id_to_string(object.get("id")?)?;
        let r#type = object.get("type")?.as_str()?.to_string();
        Some(Self {
            id,
            r#type,
        })
    }
}

impl std::fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.r#type, self.id)
    }
}

/// A single JSON:API resource object as received from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    /// Resource id
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Backend resource type (not the collection name)
    pub r#type: String,
    /// Attribute name to value
    #[serde(default, deserialize_with = "lenient_attributes")]
    pub attributes: Map<String, Value>,
    /// Relationship name to the raw relationship object
    #[serde(default, deserialize_with = "lenient_relationships", skip_serializing_if = "Map::is_empty")]
    pub relationships: Map<String, Value>,
}

impl ResourceObject {
    /// The `(id, type)` identifier of this resource.
    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier::new(self.id.clone(), self.r#type.clone())
    }
}

/// Primary `data` of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryData {
    /// `data` is a single resource object (item fetch)
    Single(ResourceObject),
    /// `data` is an array of resource objects (list fetch)
    Many(Vec<ResourceObject>),
    /// `data` is `null`: an item fetch that found nothing
    Null,
}

impl PrimaryData {
    /// Primary resources in document order.
    pub fn resources(&self) -> &[ResourceObject] {
        match self {
            Self::Single(resource) => std::slice::from_ref(resource),
            Self::Many(resources) => resources,
            Self::Null => &[],
        }
    }
}

/// A parsed JSON:API top-level document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Primary data
    pub data: PrimaryData,
    /// Side-loaded resources, in document order
    pub included: Vec<ResourceObject>,
    /// Top-level `meta`, if present
    pub meta: Option<Map<String, Value>>,
}

impl Document {
    /// Parse a document from a JSON value.
    ///
    /// Fails with [`AdminError::MalformedDocument`] when the value is not an
    /// object, `data` is missing, or a primary resource lacks `id`/`type`.
    /// Malformed `included` entries are skipped: a missing side-loaded resource
    /// only degrades resolution.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| AdminError::malformed("document is not a JSON object"))?;

        let data = match object.get("data") {
            None => return Err(AdminError::malformed("document has no \"data\" member")),
            Some(Value::Null) => PrimaryData::Null,
            Some(Value::Array(items)) => PrimaryData::Many(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| parse_primary(item, Some(index)))
                    .collect::<Result<Vec<_>>>()?,
            ),
            Some(item @ Value::Object(_)) => PrimaryData::Single(parse_primary(item, None)?),
            Some(other) => {
                return Err(AdminError::malformed(format!(
                    "\"data\" must be an object, an array or null, found {}",
                    json_kind(other)
                )));
            }
        };

        let included = match object.get("included") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match ResourceObject::deserialize(item) {
                    Ok(resource) => Some(resource),
                    Err(e) => {
                        tracing::warn!("Skipping malformed included resource: {}", e);
                        None
                    }
                })
                .collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                tracing::warn!("Ignoring \"included\" of kind {}", json_kind(other));
                Vec::new()
            }
        };

        let meta = object.get("meta").and_then(Value::as_object).cloned();

        Ok(Self {
            data,
            included,
            meta,
        })
    }

    /// Parse a document from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// `meta.count` as reported by the server, if it is an integer.
    pub fn count(&self) -> Option<i64> {
        self.meta.as_ref()?.get("count")?.as_i64()
    }
}

fn parse_primary(item: &Value, index: Option<usize>) -> Result<ResourceObject> {
    ResourceObject::deserialize(item).map_err(|e| {
        let location = index.map_or_else(|| "\"data\"".to_string(), |i| format!("\"data\"[{i}]"));
        AdminError::malformed(format!("{location} is not a resource object: {e}"))
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_to_string(&value).ok_or_else(|| de::Error::custom("id must be a string or a number"))
}

fn lenient_attributes<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(object_or_empty(Value::deserialize(deserializer)?, "attributes"))
}

fn lenient_relationships<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(object_or_empty(Value::deserialize(deserializer)?, "relationships"))
}

/// `null` and non-object members read as empty; only the latter is logged.
fn object_or_empty(value: Value, member: &str) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            tracing::warn!("Ignoring \"{}\" member: expected an object, found {}", member, json_kind(&other));
            Map::new()
        }
    }
}
