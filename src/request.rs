//! Construction of the backend requests the admin client issues.
//!
//! Planning is pure: a [`RequestPlan`] names the method, path, query and body
//! of a request and leaves sending it to the caller's HTTP client.

use serde::Serialize;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::{CollectionSettings, ResolvedColumn};
use crate::config::formatter::display_text;
use crate::constants::{PAGE_LIMIT_PARAM, PAGE_OFFSET_PARAM};
use crate::jsonapi::ResourceIdentifier;

/// HTTP method of a planned request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Read a collection page or an item
    Get,
    /// Search, or create an item
    Post,
    /// Update an item or one of its relationships
    Patch,
    /// Remove an item
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        })
    }
}

/// New linkage for a relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipUpdate {
    /// Point a to-one relationship at a resource, or clear it with `None`
    One(Option<ResourceIdentifier>),
    /// Replace the members of a to-many relationship
    Many(Vec<ResourceIdentifier>),
}

impl RelationshipUpdate {
    fn to_data(&self) -> Value {
        match self {
            Self::One(target) => json!(target),
            Self::Many(targets) => json!(targets),
        }
    }
}

/// A request ready to hand to an HTTP client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestPlan {
    /// HTTP method
    pub method: HttpMethod,
    /// Path relative to the API base URL, starting with `/`
    pub path: String,
    /// Query arguments, sorted by key
    pub query: BTreeMap<String, String>,
    /// JSON body, `None` for bodiless requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl RequestPlan {
    /// One page of a collection.
    ///
    /// A non-empty `search` turns the request into a `POST` to the search
    /// endpoint carrying the query in `meta.args`.
    pub fn list(settings: &CollectionSettings, search: &str, offset: usize, limit: usize) -> Self {
        let mut plan = if search.is_empty() {
            Self::new(HttpMethod::Get, format!("/{}", settings.api_route))
        } else {
            Self::new(HttpMethod::Post, format!("/{}/search", settings.api_route))
                .with_body(json!({"meta": {"args": {"query": search}}}))
        };
        plan.set_page(offset, limit);
        plan.with_request_args(settings)
    }

    /// A single item by id.
    pub fn item(settings: &CollectionSettings, id: &str) -> Self {
        Self::new(HttpMethod::Get, format!("/{}/{}", settings.api_route, id)).with_request_args(settings)
    }

    /// Candidate records for a relationship picker, narrowed by `filter`.
    pub fn select_options(settings: &CollectionSettings, filter: &Value, offset: usize, limit: usize) -> Self {
        let mut plan = Self::new(HttpMethod::Post, format!("/{}/search", settings.api_route))
            .with_body(json!({"meta": {"method": "search", "args": filter}}));
        plan.set_page(offset, limit);
        plan.with_request_args(settings)
    }

    /// Create (`id` is `None`) or update an item from `values`.
    ///
    /// Only editable attribute columns are sent: readonly columns,
    /// relationship columns and the `id` column are left out, as are fields
    /// missing from `values`.
    pub fn save(settings: &CollectionSettings, id: Option<&str>, values: &Map<String, Value>) -> Self {
        let attributes: Map<String, Value> = settings
            .columns
            .iter()
            .filter(|column| is_saved_attribute(column))
            .filter_map(|column| {
                values
                    .get(&column.data_field)
                    .map(|value| (column.data_field.clone(), value.clone()))
            })
            .collect();

        match id {
            Some(id) => Self::new(HttpMethod::Patch, format!("/{}/{}", settings.api_route, id)).with_body(json!({
                "data": {"id": id, "type": settings.api_type, "attributes": attributes}
            })),
            None => Self::new(HttpMethod::Post, format!("/{}", settings.api_route)).with_body(json!({
                "data": {"type": settings.api_type, "attributes": attributes}
            })),
        }
    }

    /// Replace the linkage of the relationship edited through `column`.
    ///
    /// The path segment is the column's `relation_url`, falling back to the
    /// relationship name.
    pub fn update_relationship(
        settings: &CollectionSettings,
        column: &ResolvedColumn,
        id: &str,
        update: &RelationshipUpdate,
    ) -> Self {
        let relation = column.relation_url.as_deref().unwrap_or_else(|| column.relationship_name());
        Self::new(HttpMethod::Patch, format!("/{}/{}/{}", settings.api_route, id, relation))
            .with_body(json!({"data": update.to_data()}))
    }

    /// Remove an item.
    pub fn delete(settings: &CollectionSettings, id: &str) -> Self {
        Self::new(HttpMethod::Delete, format!("/{}/{}", settings.api_route, id))
    }

    fn new(method: HttpMethod, path: String) -> Self {
        Self {
            method,
            path,
            query: BTreeMap::new(),
            body: None,
        }
    }

    fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    fn set_page(&mut self, offset: usize, limit: usize) {
        self.query.insert(PAGE_OFFSET_PARAM.to_string(), offset.to_string());
        self.query.insert(PAGE_LIMIT_PARAM.to_string(), limit.to_string());
    }

    fn with_request_args(mut self, settings: &CollectionSettings) -> Self {
        for (key, value) in &settings.request_args {
            self.query.insert(key.clone(), display_text(value));
        }
        self
    }

    /// Add a caller query argument; it overrides paging and configured arguments.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }
}

fn is_saved_attribute(column: &ResolvedColumn) -> bool {
    !column.readonly && !column.is_relationship() && column.data_field != "id"
}

impl fmt::Display for RequestPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)?;
        for (i, (key, value)) in self.query.iter().enumerate() {
            write!(f, "{}{}={}", if i == 0 { '?' } else { '&' }, key, value)?;
        }
        Ok(())
    }
}
