//! JSON:API normalization.
//!
//! Turns a raw JSON:API document into UI-friendly records:
//!
//! - [`document`] - the input model (`data`, `included`, `meta`)
//! - [`resolve`] - relationship resolution against `included`
//! - [`record`] - the denormalized output shape
//! - [`normalize`](mod@normalize) - the transform tying them together
//!
//! # Example
//!
//! ```rust
//! use jsonapi_admin::jsonapi::normalize_value;
//! use serde_json::json;
//!
//! let doc = json!({
//!     "data": [{
//!         "id": "1", "type": "Book",
//!         "attributes": {"title": "T"},
//!         "relationships": {"author": {"data": {"id": "9", "type": "Person"}}}
//!     }],
//!     "included": [{"id": "9", "type": "Person", "attributes": {"name": "Ann"}}]
//! });
//!
//! let normalized = normalize_value(&doc, "Books").unwrap();
//! let flat = normalized.records[0].to_value();
//! assert_eq!(flat["title"], "T");
//! assert_eq!(flat["author"]["attributes"]["name"], "Ann");
//! ```

pub mod document;
pub mod normalize;
pub mod record;
pub mod resolve;

pub use document::{Document, PrimaryData, ResourceIdentifier, ResourceObject};
pub use normalize::{Normalized, UnresolvedReference, normalize, normalize_included, normalize_value};
pub use record::{DenormalizedRecord, ResolvedReference, ResolvedRelationship};
pub use resolve::IncludedIndex;
