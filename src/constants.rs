//! Constants shared across jsonapi-admin.
//!
//! Page sizes, sentinel values and the JSON:API query parameter names the
//! request planner emits.

/// Page size used when neither the collection nor `[api]` configures one.
pub const DEFAULT_PAGE_LIMIT: usize = 25;

/// Count recorded when a list response carries no `meta.count`.
pub const UNKNOWN_COUNT: i64 = -1;

/// Display attribute used for relationship cells when a collection doesn't name one.
pub const DEFAULT_DISPLAY_ATTRIBUTE: &str = "name";

/// Query parameter carrying the page offset.
pub const PAGE_OFFSET_PARAM: &str = "page[offset]";

/// Query parameter carrying the page size.
pub const PAGE_LIMIT_PARAM: &str = "page[limit]";

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "JSONAPI_ADMIN_CONFIG";

/// Configuration file looked up in the working directory by default.
pub const DEFAULT_CONFIG_FILE: &str = "jsonapi-admin.toml";
