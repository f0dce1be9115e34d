//! Precomputed `type → collection` and `route → collection` lookups.
//!
//! Built once when configuration loads so relationship handling never has to
//! scan every collection.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Reverse index from backend identifiers to collection names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeIndex {
    by_type: HashMap<String, String>,
    by_route: HashMap<String, String>,
}

impl TypeIndex {
    /// Build the index from `(collection, api_type, api_route)` triples.
    ///
    /// When two collections share an `api_type` or `api_route`, the first one
    /// supplied keeps the mapping and the conflict is logged.
    pub fn build<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    {
        let mut index = Self::default();
        for (collection, api_type, api_route) in entries {
            insert_first(&mut index.by_type, api_type, collection, "type");
            insert_first(&mut index.by_route, api_route, collection, "route");
        }
        index
    }

    /// Collection exposing the backend type `api_type`.
    pub fn collection_for_type(&self, api_type: &str) -> Option<&str> {
        self.by_type.get(api_type).map(String::as_str)
    }

    /// Collection served under the API route `api_route`.
    pub fn collection_for_route(&self, api_route: &str) -> Option<&str> {
        self.by_route.get(api_route).map(String::as_str)
    }

    /// Number of indexed types.
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    /// Whether no collection is indexed.
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    /// `(api_type, collection)` pairs sorted by type.
    pub fn types(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> =
            self.by_type.iter().map(|(t, c)| (t.as_str(), c.as_str())).collect();
        pairs.sort_unstable();
        pairs
    }
}

fn insert_first(map: &mut HashMap<String, String>, key: &str, collection: &str, what: &str) {
    match map.entry(key.to_string()) {
        Entry::Vacant(slot) => {
            slot.insert(collection.to_string());
        }
        Entry::Occupied(existing) => {
            tracing::warn!(
                "API {} '{}' is used by both '{}' and '{}'; keeping '{}'",
                what,
                key,
                existing.get(),
                collection,
                existing.get()
            );
        }
    }
}
