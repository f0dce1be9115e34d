//! Per-collection cache entries.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::constants::UNKNOWN_COUNT;
use crate::jsonapi::{DenormalizedRecord, Document, normalize};

/// Cached state of one collection.
///
/// Handed out read-only by [`CollectionStore::get`](super::CollectionStore::get);
/// mutation goes through the store's documented operations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionState {
    /// Offset of the first record in `data`
    pub offset: usize,
    /// Page size, always greater than zero
    pub limit: usize,
    /// Records in server order, as given by the last page
    pub data: Vec<DenormalizedRecord>,
    /// Total number of records on the server, `-1` when unknown
    pub count: i64,
    /// Active search query, empty for none
    pub search: String,
    /// Active filter arguments
    pub filter: Map<String, Value>,
    /// Candidate records per relationship, for relationship pickers
    pub select_options: BTreeMap<String, Vec<DenormalizedRecord>>,
}

impl CollectionState {
    /// Empty first page of `limit` rows.
    pub fn new(limit: usize) -> Self {
        Self {
            offset: 0,
            limit,
            data: Vec::new(),
            count: 0,
            search: String::new(),
            filter: Map::new(),
            select_options: BTreeMap::new(),
        }
    }

    /// The record with `id`, if cached.
    pub fn get_item(&self, id: &str) -> Option<&DenormalizedRecord> {
        self.data.iter().find(|record| record.id == id)
    }

    /// Whether a record with `id` is cached.
    pub fn contains(&self, id: &str) -> bool {
        self.get_item(id).is_some()
    }

    /// Records whose `relationship` references `target_id`.
    pub fn find_related(&self, relationship: &str, target_id: &str) -> Vec<&DenormalizedRecord> {
        self.data
            .iter()
            .filter(|record| {
                record.relationship(relationship).is_some_and(|r| r.references_id(target_id))
            })
            .collect()
    }

    /// Candidate records stored for `relationship`.
    pub fn select_options(&self, relationship: &str) -> &[DenormalizedRecord] {
        self.select_options.get(relationship).map_or(&[], Vec::as_slice)
    }
}

/// One fetched page, ready to replace a collection's list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage {
    /// Offset the page was requested at
    pub offset: usize,
    /// Page size the page was requested with
    pub limit: usize,
    /// Records in server order
    pub records: Vec<DenormalizedRecord>,
    /// Total count reported by the server, `-1` when unknown
    pub count: i64,
}

impl ListPage {
    /// Page from already-normalized records.
    pub const fn new(offset: usize, limit: usize, records: Vec<DenormalizedRecord>, count: i64) -> Self {
        Self {
            offset,
            limit,
            records,
            count,
        }
    }

    /// Normalize a list document for `collection`; `count` comes from `meta.count`.
    pub fn from_document(offset: usize, limit: usize, document: &Document, collection: &str) -> Self {
        let normalized = normalize(document, collection);
        Self {
            offset,
            limit,
            records: normalized.records,
            count: document.count().unwrap_or(UNKNOWN_COUNT),
        }
    }
}
