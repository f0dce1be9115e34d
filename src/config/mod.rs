//! Configuration management for jsonapi-admin
//!
//! The admin client is driven by a declarative per-collection configuration:
//! which API route and backend type a collection maps to, how many rows a page
//! holds, which attribute names a related record, and how each column renders.
//!
//! # Modules
//!
//! - `parser` - Generic TOML/JSON parsing with file context
//! - `index` - Precomputed `type → collection` and `route → collection` maps
//! - `formatter` - Closed set of column formatters and their registry
//!
//! # File Format
//!
//! ```toml
//! [api]
//! base_url = "https://example.org/api"
//! limit = 25
//!
//! [collections.Books]
//! api_route = "Books"
//! api_type = "Book"
//! main_display_attribute = "title"
//! default_limit = 10
//! request_args = { include = "author" }
//!
//! [[collections.Books.columns]]
//! data_field = "author_id"
//! text = "Author"
//! formatter = "toOneFormatter"
//! relationship = "author"
//! ```
//!
//! The JSON layout of the original admin client is accepted too: `API`,
//! `API_TYPE`, `main_show`, `column`, `dataField` and `editorRenderer` are
//! aliases of the snake_case keys above.
//!
//! # Configuration Priority
//!
//! 1. An explicit path (`--config`)
//! 2. `JSONAPI_ADMIN_CONFIG` environment variable
//! 3. `jsonapi-admin.toml` in the working directory
//!
//! Loading validates everything up front: unknown formatter names, zero page
//! limits and unknown action names fail at startup.

pub mod formatter;
pub mod index;
pub mod parser;

pub use formatter::{CellContext, FormatFn, FormatterKind, FormatterRegistry, display_value};
pub use index::TypeIndex;
pub use parser::{ConfigFormat, parse_config, parse_str};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::constants::{CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE, DEFAULT_DISPLAY_ATTRIBUTE, DEFAULT_PAGE_LIMIT};
use crate::core::AdminError;

const fn default_limit() -> usize {
    DEFAULT_PAGE_LIMIT
}

/// Backend-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the JSON:API backend
    #[serde(default, alias = "baseUrl", alias = "URL", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Page size for collections that don't set `default_limit`
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Row-level actions offered for a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Create a new item
    #[serde(alias = "CreateAction")]
    Create,
    /// Edit an existing item
    #[serde(alias = "EditAction")]
    Edit,
    /// Delete selected items
    #[serde(alias = "DeleteAction")]
    Delete,
    /// Show item details
    #[serde(alias = "InfoAction")]
    Info,
    /// Application-defined action
    #[serde(alias = "CustomAction")]
    Custom,
}

impl ActionKind {
    /// Every action, the default when a collection lists none.
    pub const ALL: [Self; 5] = [Self::Create, Self::Edit, Self::Delete, Self::Info, Self::Custom];
}

/// One table column as written in the configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Attribute (or relationship key) shown in the column
    #[serde(alias = "dataField")]
    pub data_field: String,

    /// Column header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Formatter name, resolved to a [`FormatterKind`] at load time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,

    /// Editor name, resolved to a [`FormatterKind`] at load time
    #[serde(default, alias = "editorRenderer", skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,

    /// Relationship rendered by relationship formatters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,

    /// Relationship path used when saving; defaults to `relationship`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_url: Option<String>,

    /// Column is excluded from saves
    #[serde(default)]
    pub readonly: bool,
}

/// One collection as written in the configuration file.
///
/// Every field is optional; [`AdminConfig::resolve`] fills in defaults derived
/// from the collection name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// UI path; defaults to `/` + lowercase collection name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// API route segment; defaults to the collection name
    #[serde(default, alias = "API", skip_serializing_if = "Option::is_none")]
    pub api_route: Option<String>,

    /// Backend resource type; defaults to the collection name
    #[serde(default, alias = "API_TYPE", skip_serializing_if = "Option::is_none")]
    pub api_type: Option<String>,

    /// Attribute naming a record in relationship cells; defaults to `name`
    #[serde(default, alias = "main_show", skip_serializing_if = "Option::is_none")]
    pub main_display_attribute: Option<String>,

    /// Page size; defaults to `[api] limit`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_limit: Option<usize>,

    /// Page title; defaults to `<name> Page`
    #[serde(default, alias = "Title", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Menu label; defaults to the collection name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<String>,

    /// Allowed actions; defaults to all of them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<ActionKind>>,

    /// Extra query arguments sent with every request for this collection
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub request_args: BTreeMap<String, Value>,

    /// Table columns
    #[serde(default, alias = "column", skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnConfig>,
}

/// The configuration file as parsed, before defaults and validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Backend settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Collections by name
    #[serde(default)]
    pub collections: BTreeMap<String, CollectionConfig>,
}

impl AdminConfig {
    /// Load a configuration file (TOML, or JSON for `.json` paths).
    pub async fn load(path: &Path) -> Result<Self> {
        if !fs::try_exists(path).await.unwrap_or(false) {
            return Err(AdminError::ConfigNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(parse_str(&content, ConfigFormat::from_path(path), &path.display().to_string())?)
    }

    /// Parse TOML configuration text.
    pub fn from_toml_str(content: &str) -> Result<Self, AdminError> {
        parse_str(content, ConfigFormat::Toml, "<toml>")
    }

    /// Parse JSON configuration text.
    pub fn from_json_str(content: &str) -> Result<Self, AdminError> {
        parse_str(content, ConfigFormat::Json, "<json>")
    }

    /// The configuration path to use when none is given explicitly.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from)
    }

    /// Apply defaults, resolve formatter names and build the type index.
    pub fn resolve(&self) -> Result<ResolvedConfig, AdminError> {
        if self.api.limit == 0 {
            return Err(AdminError::ConfigValidationError {
                reason: "[api] limit must be greater than zero".to_string(),
            });
        }

        let mut collections = BTreeMap::new();
        for (name, raw) in &self.collections {
            let settings = CollectionSettings::resolve(name, raw, self.api.limit)?;
            collections.insert(name.clone(), settings);
        }

        let type_index = TypeIndex::build(
            collections.values().map(|c| (c.name.as_str(), c.api_type.as_str(), c.api_route.as_str())),
        );

        Ok(ResolvedConfig {
            api: self.api.clone(),
            collections,
            type_index,
        })
    }
}

/// A column with its formatter names resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumn {
    /// Attribute (or relationship key) shown in the column
    pub data_field: String,
    /// Column header, defaulting to `data_field`
    pub text: String,
    /// Display formatter
    pub formatter: Option<FormatterKind>,
    /// Editor
    pub editor: Option<FormatterKind>,
    /// Relationship rendered by relationship formatters
    pub relationship: Option<String>,
    /// Relationship path used when saving
    pub relation_url: Option<String>,
    /// Excluded from saves
    pub readonly: bool,
}

impl ResolvedColumn {
    /// The relationship a relationship formatter reads: `relationship`, else `data_field`.
    pub fn relationship_name(&self) -> &str {
        self.relationship.as_deref().unwrap_or(&self.data_field)
    }

    /// Whether the column edits a relationship: it names one, or its
    /// formatter or editor reads one.
    pub fn is_relationship(&self) -> bool {
        self.relationship.is_some()
            || self.formatter.is_some_and(FormatterKind::is_relationship)
            || self.editor.is_some_and(FormatterKind::is_relationship)
    }
}

/// A collection with every default applied.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSettings {
    /// Collection (route key) name
    pub name: String,
    /// UI path
    pub path: String,
    /// API route segment
    pub api_route: String,
    /// Backend resource type
    pub api_type: String,
    /// Attribute naming a record in relationship cells
    pub main_display_attribute: String,
    /// Page size
    pub default_limit: usize,
    /// Page title
    pub title: String,
    /// Menu label
    pub menu: String,
    /// Allowed actions
    pub actions: Vec<ActionKind>,
    /// Extra request query arguments
    pub request_args: BTreeMap<String, Value>,
    /// Columns in display order
    pub columns: Vec<ResolvedColumn>,
}

impl CollectionSettings {
    fn resolve(name: &str, raw: &CollectionConfig, api_limit: usize) -> Result<Self, AdminError> {
        let default_limit = raw.default_limit.unwrap_or(api_limit);
        if default_limit == 0 {
            return Err(AdminError::ConfigValidationError {
                reason: format!("collection '{name}': default_limit must be greater than zero"),
            });
        }

        let columns = raw
            .columns
            .iter()
            .map(|column| resolve_column(name, column))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.to_string(),
            path: raw.path.clone().unwrap_or_else(|| format!("/{}", name.to_lowercase())),
            api_route: raw.api_route.clone().unwrap_or_else(|| name.to_string()),
            api_type: raw.api_type.clone().unwrap_or_else(|| name.to_string()),
            main_display_attribute: raw
                .main_display_attribute
                .clone()
                .unwrap_or_else(|| DEFAULT_DISPLAY_ATTRIBUTE.to_string()),
            default_limit,
            title: raw.title.clone().unwrap_or_else(|| format!("{name} Page")),
            menu: raw.menu.clone().unwrap_or_else(|| name.to_string()),
            actions: raw.actions.clone().unwrap_or_else(|| ActionKind::ALL.to_vec()),
            request_args: raw.request_args.clone(),
            columns,
        })
    }
}

fn resolve_column(collection: &str, column: &ColumnConfig) -> Result<ResolvedColumn, AdminError> {
    let lookup = |name: &Option<String>| -> Result<Option<FormatterKind>, AdminError> {
        name.as_deref()
            .map(|n| {
                n.parse::<FormatterKind>().map_err(|_| AdminError::UnknownFormatter {
                    collection: collection.to_string(),
                    column: column.data_field.clone(),
                    name: n.to_string(),
                })
            })
            .transpose()
    };

    Ok(ResolvedColumn {
        data_field: column.data_field.clone(),
        text: column.text.clone().unwrap_or_else(|| column.data_field.clone()),
        formatter: lookup(&column.formatter)?,
        editor: lookup(&column.editor)?,
        relationship: column.relationship.clone(),
        relation_url: column.relation_url.clone().or_else(|| column.relationship.clone()),
        readonly: column.readonly,
    })
}

/// Validated configuration: defaults applied, formatters resolved, indexes built.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Backend settings
    pub api: ApiConfig,
    /// Collections by name
    pub collections: BTreeMap<String, CollectionSettings>,
    /// Reverse lookups from backend identifiers to collection names
    pub type_index: TypeIndex,
}

impl ResolvedConfig {
    /// Load, validate and index a configuration file.
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = AdminConfig::load(path).await?;
        Ok(raw.resolve()?)
    }

    /// Settings for a collection, failing fast on unknown names.
    pub fn collection(&self, name: &str) -> Result<&CollectionSettings, AdminError> {
        self.collections.get(name).ok_or_else(|| AdminError::collection_not_found(name))
    }

    /// Settings of the collection exposing backend type `api_type`.
    pub fn collection_for_type(&self, api_type: &str) -> Option<&CollectionSettings> {
        self.type_index.collection_for_type(api_type).and_then(|name| self.collections.get(name))
    }

    /// Collection names in order.
    pub fn collection_names(&self) -> Vec<String> {
        self.collections.keys().cloned().collect()
    }

    /// The display attribute for records of `api_type`, falling back to `name`.
    pub fn display_attribute_for_type(&self, api_type: &str) -> &str {
        self.collection_for_type(api_type)
            .map_or(DEFAULT_DISPLAY_ATTRIBUTE, |c| c.main_display_attribute.as_str())
    }
}
