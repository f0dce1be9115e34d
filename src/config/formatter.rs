//! Column formatters.
//!
//! Formatter names in the configuration resolve to a closed [`FormatterKind`]
//! when the configuration loads, so a typo fails at startup instead of
//! rendering a blank cell. [`FormatterRegistry`] maps each kind to the
//! function producing the cell's display text.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::{ResolvedColumn, ResolvedConfig};
use crate::jsonapi::{DenormalizedRecord, ResolvedReference};

/// The formatters and editors a column may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatterKind {
    /// Plain attribute value (`cellFormatter`)
    Cell,
    /// Display attribute of a to-one target (`toOneFormatter`)
    ToOne,
    /// Display attributes of to-many targets (`toManyFormatter`)
    ToMany,
    /// To-one relationship picker (`toOneEditor`)
    ToOneEditor,
    /// To-many relationship picker (`ToManyEditor`, `ToManyRelationshipEditor`)
    ToManyEditor,
}

impl FormatterKind {
    /// Every kind, in registry order.
    pub const ALL: [Self; 5] = [Self::Cell, Self::ToOne, Self::ToMany, Self::ToOneEditor, Self::ToManyEditor];

    /// Canonical configuration name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cell => "cellFormatter",
            Self::ToOne => "toOneFormatter",
            Self::ToMany => "toManyFormatter",
            Self::ToOneEditor => "toOneEditor",
            Self::ToManyEditor => "ToManyEditor",
        }
    }

    /// Whether the kind reads a relationship rather than an attribute.
    pub const fn is_relationship(self) -> bool {
        !matches!(self, Self::Cell)
    }
}

impl fmt::Display for FormatterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned for an unrecognised formatter name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFormatterName(pub String);

impl fmt::Display for UnknownFormatterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown formatter '{}'", self.0)
    }
}

impl std::error::Error for UnknownFormatterName {}

impl FromStr for FormatterKind {
    type Err = UnknownFormatterName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cellFormatter" | "cell" => Ok(Self::Cell),
            "toOneFormatter" | "to_one" => Ok(Self::ToOne),
            "toManyFormatter" | "to_many" => Ok(Self::ToMany),
            "toOneEditor" | "to_one_editor" => Ok(Self::ToOneEditor),
            "ToManyEditor" | "ToManyRelationshipEditor" | "to_many_editor" => Ok(Self::ToManyEditor),
            other => Err(UnknownFormatterName(other.to_string())),
        }
    }
}

/// Everything a formatter may read to render one cell.
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    /// Row being rendered
    pub record: &'a DenormalizedRecord,
    /// Column being rendered
    pub column: &'a ResolvedColumn,
    /// Configuration, for display attributes of related collections
    pub config: &'a ResolvedConfig,
}

/// A formatter implementation.
pub type FormatFn = fn(&CellContext<'_>) -> String;

/// Registry from [`FormatterKind`] to its implementation.
#[derive(Debug, Clone)]
pub struct FormatterRegistry {
    formatters: HashMap<FormatterKind, FormatFn>,
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl FormatterRegistry {
    /// Registry with the built-in implementation for every kind.
    pub fn standard() -> Self {
        let mut formatters: HashMap<FormatterKind, FormatFn> = HashMap::new();
        formatters.insert(FormatterKind::Cell, format_cell);
        formatters.insert(FormatterKind::ToOne, format_to_one);
        formatters.insert(FormatterKind::ToMany, format_to_many);
        formatters.insert(FormatterKind::ToOneEditor, format_to_one);
        formatters.insert(FormatterKind::ToManyEditor, format_to_many);
        Self {
            formatters,
        }
    }

    /// Replace the implementation of one kind.
    pub fn register(&mut self, kind: FormatterKind, format: FormatFn) {
        self.formatters.insert(kind, format);
    }

    /// Render a cell with an explicit kind.
    pub fn render(&self, kind: FormatterKind, ctx: &CellContext<'_>) -> String {
        // standard() covers every kind and register() only replaces
        self.formatters.get(&kind).map_or_else(|| format_cell(ctx), |format| format(ctx))
    }

    /// Render a cell with the column's own formatter, or as a plain cell.
    pub fn render_column(&self, ctx: &CellContext<'_>) -> String {
        self.render(ctx.column.formatter.unwrap_or(FormatterKind::Cell), ctx)
    }
}

/// Display text for a JSON value: strings unquoted, `null` empty.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn reference_text(reference: &ResolvedReference, config: &ResolvedConfig) -> String {
    let attribute = config.display_attribute_for_type(&reference.r#type);
    reference.attribute(attribute).map(display_text).unwrap_or_default()
}

/// Display text of the to-one `relationship` of `record`.
///
/// Reads the main display attribute of the target's collection. `None` when
/// the relationship is not a to-one or its target was not side-loaded.
pub fn display_value(record: &DenormalizedRecord, relationship: &str, config: &ResolvedConfig) -> Option<String> {
    let reference = record.relationship(relationship)?.as_to_one()?;
    let attribute = config.display_attribute_for_type(&reference.r#type);
    reference.attribute(attribute).map(display_text)
}

fn format_cell(ctx: &CellContext<'_>) -> String {
    ctx.record.attribute(&ctx.column.data_field).map(display_text).unwrap_or_default()
}

fn format_to_one(ctx: &CellContext<'_>) -> String {
    display_value(ctx.record, ctx.column.relationship_name(), ctx.config).unwrap_or_default()
}

fn format_to_many(ctx: &CellContext<'_>) -> String {
    let Some(relationship) = ctx.record.relationship(ctx.column.relationship_name()) else {
        return String::new();
    };
    relationship
        .references()
        .iter()
        .map(|reference| reference_text(reference, ctx.config))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdminConfig;
    use crate::jsonapi::normalize_value;
    use serde_json::json;

    fn config() -> ResolvedConfig {
        AdminConfig::from_toml_str(
            r#"
            [collections.Books]
            api_type = "Book"
            [[collections.Books.columns]]
            data_field = "title"
            [[collections.Books.columns]]
            data_field = "author"
            formatter = "toOneFormatter"
            [[collections.Books.columns]]
            data_field = "tags"
            formatter = "toManyFormatter"
            [[collections.Books.columns]]
            data_field = "pages"

            [collections.People]
            api_type = "Person"

            [collections.Tags]
            api_type = "Tag"
            main_display_attribute = "label"
            "#,
        )
        .unwrap()
        .resolve()
        .unwrap()
    }

    fn record() -> DenormalizedRecord {
        normalize_value(
            &json!({
                "data": [{
                    "id": "1", "type": "Book",
                    "attributes": {"title": "T", "pages": 320},
                    "relationships": {
                        "author": {"data": {"id": "9", "type": "Person"}},
                        "tags": {"data": [
                            {"id": "a", "type": "Tag"},
                            {"id": "b", "type": "Tag"},
                            {"id": "c", "type": "Tag"}
                        ]}
                    }
                }],
                "included": [
                    {"id": "9", "type": "Person", "attributes": {"name": "Ann"}},
                    {"id": "a", "type": "Tag", "attributes": {"label": "fiction"}},
                    {"id": "c", "type": "Tag", "attributes": {"label": "classic"}}
                ]
            }),
            "Books",
        )
        .unwrap()
        .records
        .remove(0)
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("cellFormatter".parse::<FormatterKind>(), Ok(FormatterKind::Cell));
        assert_eq!("ToManyRelationshipEditor".parse::<FormatterKind>(), Ok(FormatterKind::ToManyEditor));
        assert!("boldFormatter".parse::<FormatterKind>().is_err());
        for kind in FormatterKind::ALL {
            assert_eq!(kind.name().parse::<FormatterKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_render_columns() {
        let config = config();
        let record = record();
        let registry = FormatterRegistry::standard();
        let books = config.collection("Books").unwrap();

        let rendered: Vec<String> = books
            .columns
            .iter()
            .map(|column| {
                registry.render_column(&CellContext {
                    record: &record,
                    column,
                    config: &config,
                })
            })
            .collect();

        assert_eq!(rendered, vec!["T", "Ann", "fiction, classic", "320"]);
    }

    #[test]
    fn test_register_override() {
        fn shout(ctx: &CellContext<'_>) -> String {
            ctx.record.attribute(&ctx.column.data_field).map(display_text).unwrap_or_default().to_uppercase()
        }

        let config = config();
        let record = record();
        let mut registry = FormatterRegistry::standard();
        registry.register(FormatterKind::Cell, shout);

        let column = &config.collection("Books").unwrap().columns[0];
        let text = registry.render_column(&CellContext {
            record: &record,
            column,
            config: &config,
        });
        assert_eq!(text, "T".to_uppercase());
    }

    #[test]
    fn test_display_value() {
        let config = config();
        let record = record();
        assert_eq!(display_value(&record, "author", &config).as_deref(), Some("Ann"));
        assert_eq!(display_value(&record, "tags", &config), None);
        assert_eq!(display_value(&record, "missing", &config), None);
    }

    #[test]
    fn test_display_text() {
        assert_eq!(display_text(&Value::Null), "");
        assert_eq!(display_text(&json!("x")), "x");
        assert_eq!(display_text(&json!(true)), "true");
    }
}
