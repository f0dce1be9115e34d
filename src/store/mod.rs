//! Client-side cache of collections
//!
//! The store keeps one [`CollectionState`] per configured collection: the
//! current page of denormalized records, its pagination, the active search and
//! filter, and candidate records for relationship pickers.
//!
//! # Lifecycle
//!
//! 1. [`CollectionStore::initialize`] (or [`CollectionStore::from_config`])
//!    creates an empty entry per collection
//! 2. List fetches replace `data`, `offset`, `limit` and `count` as a unit;
//!    `search`, `filter` and `select_options` survive
//! 3. Item fetches upsert single records; an id already cached is left alone
//!
//! # Concurrent fetches
//!
//! Fetches may complete out of order. Take a [`FetchTicket`] with
//! [`CollectionStore::begin_fetch`] when a list request is issued and apply
//! the response with [`CollectionStore::replace_list_sequenced`]: a response
//! older than the last applied one for the same collection is dropped and
//! reported as [`ApplyOutcome::Stale`].
//!
//! # Example
//!
//! ```rust
//! use jsonapi_admin::jsonapi::Document;
//! use jsonapi_admin::store::CollectionStore;
//! use serde_json::json;
//!
//! let mut store = CollectionStore::new();
//! store.initialize(["Books"], 25).unwrap();
//!
//! let ticket = store.begin_fetch("Books").unwrap();
//! let document = Document::from_value(&json!({
//!     "data": [{"id": "1", "type": "Book", "attributes": {"title": "T"}}],
//!     "meta": {"count": 1}
//! }))
//! .unwrap();
//! store.apply_list_document(&ticket, 0, 25, &document).unwrap();
//!
//! let books = store.get("Books").unwrap();
//! assert_eq!(books.count, 1);
//! assert_eq!(books.data[0].attribute("title"), Some(&json!("T")));
//! ```

mod sequence;
mod state;

pub use sequence::{ApplyOutcome, FetchTicket};
pub use state::{CollectionState, ListPage};

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::config::{ResolvedConfig, TypeIndex};
use crate::core::{AdminError, Result};
use crate::jsonapi::{DenormalizedRecord, Document, normalize, normalize_included};
use sequence::Sequencer;

#[derive(Debug, Clone)]
struct Entry {
    state: CollectionState,
    sequencer: Sequencer,
}

/// Mapping from collection name to its cached state.
#[derive(Debug, Clone, Default)]
pub struct CollectionStore {
    entries: BTreeMap<String, Entry>,
}

impl CollectionStore {
    /// Empty store with no collections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with one entry per configured collection, each using its own page size.
    pub fn from_config(config: &ResolvedConfig) -> Self {
        let mut store = Self::new();
        for settings in config.collections.values() {
            // Limits are validated non-zero when the configuration resolves
            store.insert_empty(&settings.name, settings.default_limit);
        }
        store
    }

    /// Create an empty entry for every name not present yet.
    ///
    /// Existing entries are left untouched, so calling this twice is harmless.
    pub fn initialize<I, S>(&mut self, names: I, default_limit: usize) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if default_limit == 0 {
            return Err(AdminError::InvalidPagination {
                collection: "*".to_string(),
                reason: "default limit must be greater than zero".to_string(),
            });
        }
        for name in names {
            self.insert_empty(name.as_ref(), default_limit);
        }
        Ok(())
    }

    fn insert_empty(&mut self, name: &str, limit: usize) {
        self.entries.entry(name.to_string()).or_insert_with(|| Entry {
            state: CollectionState::new(limit),
            sequencer: Sequencer::default(),
        });
    }

    /// Collection names in order.
    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Whether `name` is a known collection.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Read-only view of a collection.
    pub fn get(&self, name: &str) -> Result<&CollectionState> {
        self.entries.get(name).map(|entry| &entry.state).ok_or_else(|| AdminError::collection_not_found(name))
    }

    fn state_mut(&mut self, name: &str) -> Result<&mut CollectionState> {
        self.entries
            .get_mut(name)
            .map(|entry| &mut entry.state)
            .ok_or_else(|| AdminError::collection_not_found(name))
    }

    /// Replace a collection's page without the ordering guard.
    ///
    /// `data`, `offset`, `limit` and `count` change together; `search`,
    /// `filter` and `select_options` are preserved.
    pub fn replace_list(&mut self, name: &str, page: ListPage) -> Result<()> {
        validate_page(name, &page)?;
        let state = self.state_mut(name)?;
        write_page(state, page);
        tracing::debug!(
            "Replaced '{}' page: offset={} limit={} rows={} count={}",
            name,
            state.offset,
            state.limit,
            state.data.len(),
            state.count
        );
        Ok(())
    }

    /// Register an outgoing list fetch for `name`.
    pub fn begin_fetch(&mut self, name: &str) -> Result<FetchTicket> {
        let entry = self.entries.get_mut(name).ok_or_else(|| AdminError::collection_not_found(name))?;
        let sequence = entry.sequencer.issue();
        tracing::trace!("Issued fetch {}#{}", name, sequence);
        Ok(FetchTicket {
            collection: name.to_string(),
            sequence,
        })
    }

    /// Replace a collection's page unless a newer fetch was already applied.
    pub fn replace_list_sequenced(&mut self, ticket: &FetchTicket, page: ListPage) -> Result<ApplyOutcome> {
        let name = ticket.collection();
        validate_page(name, &page)?;
        let entry = self.entries.get_mut(name).ok_or_else(|| AdminError::collection_not_found(name))?;

        let outcome = entry.sequencer.try_apply(ticket.sequence());
        match outcome {
            ApplyOutcome::Applied => {
                write_page(&mut entry.state, page);
                tracing::debug!("Applied {} to '{}' ({} rows)", ticket, name, entry.state.data.len());
            }
            ApplyOutcome::Stale {
                applied,
                ..
            } => {
                tracing::warn!("Dropping stale response {}: #{} already applied", ticket, applied);
            }
        }
        Ok(outcome)
    }

    /// Normalize a list response and apply it under `ticket`.
    ///
    /// `count` is taken from `meta.count`, or `-1` when the server sent none.
    pub fn apply_list_document(
        &mut self,
        ticket: &FetchTicket,
        offset: usize,
        limit: usize,
        document: &Document,
    ) -> Result<ApplyOutcome> {
        let page = ListPage::from_document(offset, limit, document, ticket.collection());
        self.replace_list_sequenced(ticket, page)
    }

    /// Add `record` unless a record with the same id is cached.
    ///
    /// Returns whether the record was appended.
    pub fn upsert_item(&mut self, name: &str, record: DenormalizedRecord) -> Result<bool> {
        let state = self.state_mut(name)?;
        if state.contains(&record.id) {
            tracing::trace!("'{}' already caches {}; keeping it", name, record.id);
            return Ok(false);
        }
        state.data.push(record);
        Ok(true)
    }

    /// Normalize an item response and upsert every primary record.
    ///
    /// Returns how many records were appended.
    pub fn apply_item_document(&mut self, name: &str, document: &Document) -> Result<usize> {
        // Fail before normalizing when the collection is unknown
        self.get(name)?;
        let records = normalize(document, name).into_records();
        let mut appended = 0;
        for record in records {
            if self.upsert_item(name, record)? {
                appended += 1;
            }
        }
        Ok(appended)
    }

    /// Upsert side-loaded resources into the collections exposing their types.
    ///
    /// Resources whose type no collection exposes, or whose collection is not
    /// in the store, are skipped with a warning. Returns how many records
    /// were appended.
    pub fn absorb_included(&mut self, document: &Document, type_index: &TypeIndex) -> usize {
        let records = normalize_included(document, |api_type| type_index.collection_for_type(api_type));
        let mut appended = 0;
        for record in records {
            let route = record.route.clone();
            match self.upsert_item(&route, record) {
                Ok(true) => appended += 1,
                Ok(false) => {}
                Err(_) => tracing::warn!("Collection '{}' is not initialized; skipping included record", route),
            }
        }
        appended
    }

    /// Drop the records with the given ids, e.g. after a delete.
    ///
    /// `count` shrinks by the number removed when it is known. Returns that number.
    pub fn remove_items<S: AsRef<str>>(&mut self, name: &str, ids: &[S]) -> Result<usize> {
        let state = self.state_mut(name)?;
        let before = state.data.len();
        state.data.retain(|record| !ids.iter().any(|id| id.as_ref() == record.id));
        let removed = before - state.data.len();
        if state.count >= 0 {
            state.count = (state.count - removed as i64).max(0);
        }
        tracing::debug!("Removed {} record(s) from '{}'", removed, name);
        Ok(removed)
    }

    /// The cached record `id` of collection `name`.
    pub fn get_item(&self, name: &str, id: &str) -> Result<Option<&DenormalizedRecord>> {
        Ok(self.get(name)?.get_item(id))
    }

    /// Records of `name` whose `relationship` references `target_id`.
    pub fn find_related(&self, name: &str, relationship: &str, target_id: &str) -> Result<Vec<&DenormalizedRecord>> {
        Ok(self.get(name)?.find_related(relationship, target_id))
    }

    /// Set the active search query.
    pub fn set_search(&mut self, name: &str, search: impl Into<String>) -> Result<()> {
        self.state_mut(name)?.search = search.into();
        Ok(())
    }

    /// Set the active filter arguments.
    pub fn set_filter(&mut self, name: &str, filter: Map<String, Value>) -> Result<()> {
        self.state_mut(name)?.filter = filter;
        Ok(())
    }

    /// Store the candidate records offered for `relationship`.
    pub fn set_select_options(
        &mut self,
        name: &str,
        relationship: &str,
        candidates: Vec<DenormalizedRecord>,
    ) -> Result<()> {
        self.state_mut(name)?.select_options.insert(relationship.to_string(), candidates);
        Ok(())
    }
}

fn validate_page(name: &str, page: &ListPage) -> Result<()> {
    if page.limit == 0 {
        return Err(AdminError::InvalidPagination {
            collection: name.to_string(),
            reason: "limit must be greater than zero".to_string(),
        });
    }
    Ok(())
}

fn write_page(state: &mut CollectionState, page: ListPage) {
    state.offset = page.offset;
    state.limit = page.limit;
    state.count = page.count;
    state.data = page.records;
}
