//! JSON:API document → denormalized records.
//!
//! The normalizer is a pure function of its input: it reads the document,
//! never mutates it, and returns fresh records. Calling it twice on the same
//! document yields equal output.

use serde_json::Value;

use super::document::{Document, ResourceIdentifier, ResourceObject};
use super::record::DenormalizedRecord;
use super::resolve::{IncludedIndex, resolve_relationship};
use crate::core::Result;

/// A relationship reference whose target was not in `included`.
///
/// This is a warning, not an error: the record still carries the bare
/// `{id, type}` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    /// Id of the primary record holding the relationship
    pub record_id: String,
    /// Relationship name
    pub relationship: String,
    /// The reference that could not be resolved
    pub target: ResourceIdentifier,
}

/// Result of normalizing one document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Normalized {
    /// Records in document order
    pub records: Vec<DenormalizedRecord>,
    /// References left without attributes
    pub unresolved: Vec<UnresolvedReference>,
}

impl Normalized {
    /// Drop the unresolved report and keep the records.
    pub fn into_records(self) -> Vec<DenormalizedRecord> {
        self.records
    }
}

/// Normalize a parsed document for `collection`.
///
/// Each primary resource becomes a [`DenormalizedRecord`] with
/// `route = collection`, its attributes hoisted and every relationship
/// resolved against `included`.
pub fn normalize(document: &Document, collection: &str) -> Normalized {
    let index = IncludedIndex::new(&document.included);
    let mut normalized = Normalized::default();

    for resource in document.data.resources() {
        let record = normalize_resource(resource, collection, &index, &mut normalized.unresolved);
        normalized.records.push(record);
    }

    if !normalized.unresolved.is_empty() {
        tracing::warn!(
            "{} relationship reference(s) in '{}' not found in included",
            normalized.unresolved.len(),
            collection
        );
    }
    tracing::debug!(
        "Normalized {} record(s) for '{}' ({} included)",
        normalized.records.len(),
        collection,
        index.len()
    );

    normalized
}

/// Parse and normalize a raw JSON value.
///
/// Fails only when the value is not a usable JSON:API document.
pub fn normalize_value(value: &Value, collection: &str) -> Result<Normalized> {
    let document = Document::from_value(value)?;
    Ok(normalize(&document, collection))
}

/// Normalize the side-loaded resources of a document.
///
/// `collection_for` maps a resource type to the collection its records belong
/// to; resources of unmapped types are skipped. Relationships of side-loaded
/// resources resolve against the same `included` set.
pub fn normalize_included<'c, F>(document: &Document, collection_for: F) -> Vec<DenormalizedRecord>
where
    F: Fn(&str) -> Option<&'c str>,
{
    let index = IncludedIndex::new(&document.included);
    let mut unresolved = Vec::new();
    let mut records = Vec::with_capacity(document.included.len());

    for resource in &document.included {
        match collection_for(&resource.r#type) {
            Some(collection) => {
                records.push(normalize_resource(resource, collection, &index, &mut unresolved));
            }
            None => {
                tracing::warn!(
                    "Skipping included {}: no collection exposes type '{}'",
                    resource.identifier(),
                    resource.r#type
                );
            }
        }
    }

    records
}

fn normalize_resource(
    resource: &ResourceObject,
    collection: &str,
    index: &IncludedIndex<'_>,
    unresolved: &mut Vec<UnresolvedReference>,
) -> DenormalizedRecord {
    let mut record = DenormalizedRecord::new(resource.id.clone(), resource.r#type.clone(), collection);
    record.attributes = resource.attributes.clone();

    for (name, raw) in &resource.relationships {
        let resolution = resolve_relationship(raw, index);
        for target in resolution.unresolved {
            tracing::debug!("{}:{} -> {} ({}) is not side-loaded", resource.r#type, resource.id, target, name);
            unresolved.push(UnresolvedReference {
                record_id: resource.id.clone(),
                relationship: name.clone(),
                target,
            });
        }
        record.relationships.insert(name.clone(), resolution.relationship);
    }

    record
}
