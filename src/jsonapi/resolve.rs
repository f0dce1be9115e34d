//! Relationship resolution against the side-loaded `included` set.
//!
//! JSON:API relationships only carry `{id, type}` references; the attributes
//! of the targets travel separately in `included`:
//!
//! ```json
//! "relationships": { "author": { "data": { "id": "9", "type": "Person" } } },
//! "included": [ { "id": "9", "type": "Person", "attributes": { "name": "Ann" } } ]
//! ```
//!
//! [`IncludedIndex`] keys `included` by `(type, id)` once per document so each
//! reference is a hash lookup. Resolution never fails: unknown shapes are
//! passed through and unmatched references keep only `id`/`type`.

use serde_json::Value;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::document::{ResourceIdentifier, ResourceObject};
use super::record::{ResolvedReference, ResolvedRelationship};

/// Lookup table over a document's `included` array.
#[derive(Debug, Default)]
pub struct IncludedIndex<'a> {
    by_key: HashMap<(&'a str, &'a str), &'a ResourceObject>,
}

impl<'a> IncludedIndex<'a> {
    /// Index `included`; when a `(type, id)` pair repeats, the first occurrence wins.
    pub fn new(included: &'a [ResourceObject]) -> Self {
        let mut by_key = HashMap::with_capacity(included.len());
        for resource in included {
            match by_key.entry((resource.r#type.as_str(), resource.id.as_str())) {
                Entry::Vacant(slot) => {
                    slot.insert(resource);
                }
                Entry::Occupied(_) => {
                    tracing::debug!(
                        "Ignoring duplicate included resource {}:{}",
                        resource.r#type,
                        resource.id
                    );
                }
            }
        }
        Self {
            by_key,
        }
    }

    /// The included resource with this `id` and `type`.
    pub fn lookup(&self, id: &str, r#type: &str) -> Option<&'a ResourceObject> {
        self.by_key.get(&(r#type, id)).copied()
    }

    /// Number of distinct included resources.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Whether nothing was side-loaded.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// Outcome of resolving one relationship object.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The resolved relationship
    pub relationship: ResolvedRelationship,
    /// References whose target was not side-loaded
    pub unresolved: Vec<ResourceIdentifier>,
}

/// Resolve a single reference, attaching a copy of the target's attributes.
pub fn resolve_to_one(identifier: ResourceIdentifier, index: &IncludedIndex<'_>) -> ResolvedReference {
    let attributes = index
        .lookup(&identifier.id, &identifier.r#type)
        .map(|target| target.attributes.clone());
    ResolvedReference {
        id: identifier.id,
        r#type: identifier.r#type,
        attributes,
    }
}

/// Resolve a list of references, preserving order.
pub fn resolve_to_many(
    identifiers: Vec<ResourceIdentifier>,
    index: &IncludedIndex<'_>,
) -> Vec<ResolvedReference> {
    identifiers.into_iter().map(|identifier| resolve_to_one(identifier, index)).collect()
}

/// Resolve a raw relationship object.
///
/// | `data`                    | result                         |
/// |---------------------------|--------------------------------|
/// | absent / not an object    | [`ResolvedRelationship::PassThrough`] |
/// | `null`                    | [`ResolvedRelationship::Empty`]       |
/// | identifier object         | [`ResolvedRelationship::ToOne`]       |
/// | array of identifiers      | [`ResolvedRelationship::ToMany`]      |
///
/// A `data` member that is present but not made of identifiers (a string, an
/// array containing a non-identifier) is treated like an absent one.
pub fn resolve_relationship(raw: &Value, index: &IncludedIndex<'_>) -> Resolution {
    let pass_through = || Resolution {
        relationship: ResolvedRelationship::PassThrough(raw.clone()),
        unresolved: Vec::new(),
    };

    let Some(data) = raw.as_object().and_then(|object| object.get("data")) else {
        return pass_through();
    };

    match data {
        Value::Null => Resolution {
            relationship: ResolvedRelationship::Empty,
            unresolved: Vec::new(),
        },
        Value::Array(items) => {
            let Some(identifiers) =
                items.iter().map(ResourceIdentifier::from_value).collect::<Option<Vec<_>>>()
            else {
                return pass_through();
            };
            let references = resolve_to_many(identifiers, index);
            let unresolved = unresolved_of(&references);
            Resolution {
                relationship: ResolvedRelationship::ToMany(references),
                unresolved,
            }
        }
        other => match ResourceIdentifier::from_value(other) {
            Some(identifier) => {
                let reference = resolve_to_one(identifier, index);
                let unresolved = unresolved_of(std::slice::from_ref(&reference));
                Resolution {
                    relationship: ResolvedRelationship::ToOne(reference),
                    unresolved,
                }
            }
            None => pass_through(),
        },
    }
}

fn unresolved_of(references: &[ResolvedReference]) -> Vec<ResourceIdentifier> {
    references.iter().filter(|r| !r.is_resolved()).map(ResolvedReference::identifier).collect()
}
