//! jsonapi-admin - JSON:API normalization and collection cache
//!
//! The data layer of a configuration-driven admin client for JSON:API
//! backends. Server responses are flattened into records a table can render
//! directly, and each collection's current page is cached alongside its
//! search, filter and pagination state.
//!
//! # Core Modules
//!
//! - [`jsonapi`] - Document model, relationship resolution and normalization
//! - [`store`] - Per-collection cache with out-of-order fetch protection
//! - [`config`] - Collection configuration, type index and column formatters
//! - [`request`] - Planning of list, item and search requests
//! - [`core`] - Error types and user-facing error rendering
//! - [`cli`] - The `jsonapi-admin` command-line tool
//!
//! # Data Flow
//!
//! ```text
//! configuration ──> ResolvedConfig ──> CollectionStore::from_config
//!                        │
//!                  RequestPlan::list ──> (HTTP) ──> Document
//!                                                      │
//!                                  normalize ──> DenormalizedRecord ──> store
//! ```
//!
//! # Example
//!
//! ```rust
//! use jsonapi_admin::config::AdminConfig;
//! use jsonapi_admin::jsonapi::Document;
//! use jsonapi_admin::store::CollectionStore;
//! use serde_json::json;
//!
//! let config = AdminConfig::from_toml_str(
//!     r#"
//!     [collections.Books]
//!     api_type = "Book"
//!
//!     [collections.People]
//!     api_type = "Person"
//!     "#,
//! )?
//! .resolve()?;
//!
//! let mut store = CollectionStore::from_config(&config);
//! let document = Document::from_value(&json!({
//!     "data": [{
//!         "id": "1", "type": "Book",
//!         "relationships": {"author": {"data": {"id": "9", "type": "Person"}}}
//!     }],
//!     "included": [{"id": "9", "type": "Person", "attributes": {"name": "Ann"}}],
//!     "meta": {"count": 1}
//! }))?;
//!
//! let ticket = store.begin_fetch("Books")?;
//! store.apply_list_document(&ticket, 0, 25, &document)?;
//! store.absorb_included(&document, &config.type_index);
//!
//! assert_eq!(store.get("Books")?.count, 1);
//! assert!(store.get_item("People", "9")?.is_some());
//! # Ok::<(), jsonapi_admin::core::AdminError>(())
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod jsonapi;
pub mod request;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
