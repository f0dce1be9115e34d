//! Canned configurations and JSON:API documents.

use serde_json::{Value, json};
use std::path::{Path, PathBuf};

use crate::config::{AdminConfig, ResolvedConfig};
use crate::jsonapi::Document;

/// A library configuration with `Books`, `People` and `Tags`.
pub struct ConfigFixture;

impl ConfigFixture {
    /// TOML text of the fixture.
    pub const TOML: &'static str = r#"
[api]
base_url = "https://library.example/api"
limit = 25

[collections.Books]
api_route = "books"
api_type = "Book"
main_display_attribute = "title"
request_args = { include = "author,tags" }

[[collections.Books.columns]]
data_field = "title"
text = "Title"

[[collections.Books.columns]]
data_field = "author"
text = "Author"
formatter = "toOneFormatter"
editor = "toOneEditor"

[[collections.Books.columns]]
data_field = "tags"
text = "Tags"
formatter = "toManyFormatter"

[collections.People]
api_route = "people"
api_type = "Person"
default_limit = 10

[collections.Tags]
api_route = "tags"
api_type = "Tag"
main_display_attribute = "label"
"#;

    /// Resolved fixture configuration.
    pub fn resolved() -> ResolvedConfig {
        AdminConfig::from_toml_str(Self::TOML)
            .and_then(|config| config.resolve())
            .expect("fixture configuration is valid")
    }

    /// Write the fixture into `dir` and return the file path.
    pub fn write_to(dir: &Path) -> PathBuf {
        let path = dir.join("jsonapi-admin.toml");
        std::fs::write(&path, Self::TOML).expect("write fixture configuration");
        path
    }
}

/// JSON:API documents matching [`ConfigFixture`].
pub struct DocumentFixture;

impl DocumentFixture {
    /// Two books by the same author, with the author and one tag side-loaded.
    ///
    /// Book `2` references tag `t2`, which is not included.
    pub fn books_page() -> Value {
        json!({
            "data": [
                {
                    "id": "1",
                    "type": "Book",
                    "attributes": {"title": "Dune", "pages": 412},
                    "relationships": {
                        "author": {"data": {"id": "9", "type": "Person"}},
                        "tags": {"data": [{"id": "t1", "type": "Tag"}]}
                    }
                },
                {
                    "id": "2",
                    "type": "Book",
                    "attributes": {"title": "Children of Dune", "pages": 444},
                    "relationships": {
                        "author": {"data": {"id": "9", "type": "Person"}},
                        "tags": {"data": [{"id": "t1", "type": "Tag"}, {"id": "t2", "type": "Tag"}]}
                    }
                }
            ],
            "included": [
                {"id": "9", "type": "Person", "attributes": {"name": "Frank Herbert"}},
                {"id": "t1", "type": "Tag", "attributes": {"label": "sf"}}
            ],
            "meta": {"count": 42}
        })
    }

    /// A single book without side-loaded resources.
    pub fn single_book() -> Value {
        json!({
            "data": {
                "id": "3",
                "type": "Book",
                "attributes": {"title": "Dune Messiah"},
                "relationships": {"author": {"data": {"id": "9", "type": "Person"}}}
            }
        })
    }

    /// Parse a fixture value.
    pub fn parse(value: &Value) -> Document {
        Document::from_value(value).expect("fixture document is valid")
    }
}
