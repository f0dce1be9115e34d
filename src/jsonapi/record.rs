//! Denormalized, UI-facing record shapes.
//!
//! A [`DenormalizedRecord`] keeps attributes and resolved relationships in
//! typed maps; [`DenormalizedRecord::to_value`] produces the flattened shape
//! table and form bindings consume:
//!
//! ```text
//! { id, type, route, ...attributes, ...relationshipName: resolved, relationships: {...} }
//! ```

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::document::ResourceIdentifier;

/// A relationship reference, with the target's attributes attached when the
/// target was side-loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedReference {
    /// Target id
    pub id: String,
    /// Target backend type
    pub r#type: String,
    /// Copy of the target's attributes, `None` when the target was not in `included`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
}

impl ResolvedReference {
    /// A reference without attributes.
    pub fn bare(identifier: ResourceIdentifier) -> Self {
        Self {
            id: identifier.id,
            r#type: identifier.r#type,
            attributes: None,
        }
    }

    /// Whether the target was found in `included`.
    pub const fn is_resolved(&self) -> bool {
        self.attributes.is_some()
    }

    /// One attribute of the target, if resolved and present.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.as_ref()?.get(name)
    }

    /// The `(id, type)` of the target.
    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier::new(self.id.clone(), self.r#type.clone())
    }
}

/// The resolved form of one relationship.
///
/// Serializes to exactly the JSON the view layer expects: a reference object,
/// an array of references, `null`, or the untouched relationship object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolvedRelationship {
    /// `data` was a resource identifier
    ToOne(ResolvedReference),
    /// `data` was an array of resource identifiers
    ToMany(Vec<ResolvedReference>),
    /// `data` was `null`: to-one relationship without a target
    Empty,
    /// No usable `data`; the relationship object is passed through unchanged
    PassThrough(Value),
}

impl ResolvedRelationship {
    /// All references held by this relationship, in order.
    pub fn references(&self) -> &[ResolvedReference] {
        match self {
            Self::ToOne(reference) => std::slice::from_ref(reference),
            Self::ToMany(references) => references,
            Self::Empty | Self::PassThrough(_) => &[],
        }
    }

    /// Whether any reference points at `id`.
    pub fn references_id(&self, id: &str) -> bool {
        self.references().iter().any(|r| r.id == id)
    }

    /// The single target of a to-one relationship.
    pub const fn as_to_one(&self) -> Option<&ResolvedReference> {
        match self {
            Self::ToOne(reference) => Some(reference),
            _ => None,
        }
    }
}

/// A primary resource flattened for display.
///
/// Serializes to the flattened shape produced by [`DenormalizedRecord::to_value`].
#[derive(Debug, Clone, PartialEq)]
pub struct DenormalizedRecord {
    /// Resource id
    pub id: String,
    /// Backend resource type
    pub r#type: String,
    /// Collection (route) the record was fetched through
    pub route: String,
    /// Attributes, hoisted to the top level when flattened
    pub attributes: Map<String, Value>,
    /// Resolved relationships by name
    pub relationships: BTreeMap<String, ResolvedRelationship>,
}

impl DenormalizedRecord {
    /// A record with no attributes and no relationships.
    pub fn new(id: impl Into<String>, r#type: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            r#type: r#type.into(),
            route: route.into(),
            attributes: Map::new(),
            relationships: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter, mostly useful in tests and fixtures.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder-style relationship setter.
    #[must_use]
    pub fn with_relationship(
        mut self,
        name: impl Into<String>,
        relationship: ResolvedRelationship,
    ) -> Self {
        self.relationships.insert(name.into(), relationship);
        self
    }

    /// Attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Resolved relationship by name.
    pub fn relationship(&self, name: &str) -> Option<&ResolvedRelationship> {
        self.relationships.get(name)
    }

    /// Flattened JSON form.
    ///
    /// Attributes and relationships are hoisted to the top level. When an
    /// attribute and a relationship share a name the attribute wins; `id`,
    /// `type` and `route` always win. The nested `relationships` member is only
    /// emitted when the record has relationships, and then it replaces an
    /// attribute named `relationships`. Read such an attribute through
    /// [`attribute`](Self::attribute) instead.
    pub fn to_value(&self) -> Value {
        let mut flat = Map::new();

        for (name, relationship) in &self.relationships {
            flat.insert(name.clone(), relationship_value(relationship));
        }
        for (name, value) in &self.attributes {
            flat.insert(name.clone(), value.clone());
        }
        if !self.relationships.is_empty() {
            let nested: Map<String, Value> = self
                .relationships
                .iter()
                .map(|(name, relationship)| (name.clone(), relationship_value(relationship)))
                .collect();
            flat.insert("relationships".to_string(), Value::Object(nested));
        }

        flat.insert("id".to_string(), Value::String(self.id.clone()));
        flat.insert("type".to_string(), Value::String(self.r#type.clone()));
        flat.insert("route".to_string(), Value::String(self.route.clone()));

        Value::Object(flat)
    }
}

impl Serialize for DenormalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

fn relationship_value(relationship: &ResolvedRelationship) -> Value {
    // Serializing plain maps and strings into a Value cannot fail
    serde_json::to_value(relationship).unwrap_or(Value::Null)
}
