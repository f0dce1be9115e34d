//! Error handling for jsonapi-admin
//!
//! This module provides the error type shared by the normalizer, the collection
//! store and the configuration layer, plus user-facing error reporting for the
//! command-line tool. The error system follows two rules:
//! 1. **Strongly-typed errors** for library callers that need to branch on the failure
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`AdminError`] - Enumerated error types for every failure in the crate
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! # Error Categories
//!
//! - **Documents**: [`AdminError::MalformedDocument`] - the JSON:API payload itself is unusable
//! - **Configuration**: [`AdminError::CollectionNotFound`], [`AdminError::UnknownFormatter`],
//!   [`AdminError::ConfigParseError`], [`AdminError::ConfigValidationError`]
//! - **Store**: [`AdminError::InvalidPagination`]
//!
//! An unresolved relationship reference is not an error: the
//! normalizer reports it in its result and logs it, but never fails.
//!
//! # Examples
//!
//! ```rust,no_run
//! use jsonapi_admin::core::{AdminError, user_friendly_error};
//!
//! fn lookup() -> Result<(), AdminError> {
//!     Err(AdminError::CollectionNotFound {
//!         name: "NoSuchCollection".to_string(),
//!     })
//! }
//!
//! if let Err(e) = lookup() {
//!     let ctx = user_friendly_error(anyhow::Error::from(e));
//!     ctx.display();
//! }
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for jsonapi-admin operations
///
/// Each variant carries enough context (collection names, file paths, the
/// offending value) to produce an actionable message without a backtrace.
///
/// Store and normalizer errors propagate synchronously to the caller of the
/// violated operation. Nothing in this crate retries.
///
/// # Examples
///
/// ```rust,no_run
/// use jsonapi_admin::core::AdminError;
///
/// fn handle(error: &AdminError) {
///     match error {
///         AdminError::CollectionNotFound { name } => {
///             eprintln!("'{name}' is not configured");
///         }
///         AdminError::MalformedDocument { reason } => {
///             eprintln!("server returned an unusable document: {reason}");
///         }
///         other => eprintln!("{other}"),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum AdminError {
    /// The JSON:API document cannot be normalized
    ///
    /// Raised only for hard precondition violations: the document is not a JSON
    /// object, `data` is missing, or `data` is neither a resource object nor an
    /// array of resource objects. Relationship shapes never produce this error.
    #[error("Malformed JSON:API document: {reason}")]
    MalformedDocument {
        /// What was wrong with the document
        reason: String,
    },

    /// A collection name is not known to the store or configuration
    ///
    /// This indicates a caller or configuration bug (usually a misspelled route
    /// key) and is surfaced immediately instead of silently creating a new entry.
    #[error("Collection '{name}' is not configured")]
    CollectionNotFound {
        /// The collection name that was looked up
        name: String,
    },

    /// Pagination arguments violate `limit > 0`
    #[error("Invalid pagination for collection '{collection}': {reason}")]
    InvalidPagination {
        /// Collection the page was applied to
        collection: String,
        /// Why the page was rejected
        reason: String,
    },

    /// A column references a formatter or editor name that does not exist
    ///
    /// Formatter names are resolved once when configuration loads, so an
    /// unknown name fails at startup rather than rendering a blank cell.
    #[error("Unknown formatter '{name}' for column '{column}' in collection '{collection}'")]
    UnknownFormatter {
        /// Collection declaring the column
        collection: String,
        /// Column data field
        column: String,
        /// The unrecognised formatter name
        name: String,
    },

    /// Configuration file could not be parsed
    #[error("Invalid configuration syntax in {file}")]
    ConfigParseError {
        /// Path to the configuration file that failed to parse
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// Configuration parsed but its content is inconsistent
    #[error("Configuration validation failed: {reason}")]
    ConfigValidationError {
        /// Reason why validation failed
        reason: String,
    },

    /// Configuration file does not exist
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was searched
        path: String,
    },

    /// IO error from [`std::io::Error`]
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error from [`serde_json::Error`]
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML parsing error from [`toml::de::Error`]
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Generic error for cases not covered by specific variants
    #[error("{message}")]
    Other {
        /// The error message
        message: String,
    },
}

impl AdminError {
    /// Returns `true` for failures caused by configuration rather than data.
    ///
    /// These are caller bugs: they should be fixed in the configuration, not retried.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::CollectionNotFound { .. }
                | Self::UnknownFormatter { .. }
                | Self::ConfigParseError { .. }
                | Self::ConfigValidationError { .. }
                | Self::ConfigNotFound { .. }
        )
    }

    /// Shorthand for [`AdminError::CollectionNotFound`].
    pub fn collection_not_found(name: impl Into<String>) -> Self {
        Self::CollectionNotFound {
            name: name.into(),
        }
    }

    /// Shorthand for [`AdminError::MalformedDocument`].
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            reason: reason.into(),
        }
    }
}

impl Clone for AdminError {
    fn clone(&self) -> Self {
        match self {
            Self::MalformedDocument {
                reason,
            } => Self::MalformedDocument {
                reason: reason.clone(),
            },
            Self::CollectionNotFound {
                name,
            } => Self::CollectionNotFound {
                name: name.clone(),
            },
            Self::InvalidPagination {
                collection,
                reason,
            } => Self::InvalidPagination {
                collection: collection.clone(),
                reason: reason.clone(),
            },
            Self::UnknownFormatter {
                collection,
                column,
                name,
            } => Self::UnknownFormatter {
                collection: collection.clone(),
                column: column.clone(),
                name: name.clone(),
            },
            Self::ConfigParseError {
                file,
                reason,
            } => Self::ConfigParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::ConfigValidationError {
                reason,
            } => Self::ConfigValidationError {
                reason: reason.clone(),
            },
            Self::ConfigNotFound {
                path,
            } => Self::ConfigNotFound {
                path: path.clone(),
            },
            // Foreign errors are not Clone; keep the message
            Self::IoError(e) => Self::IoError(std::io::Error::new(e.kind(), e.to_string())),
            Self::JsonError(e) => Self::Other {
                message: format!("JSON error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// Wraps an [`AdminError`] with an optional suggestion and optional details.
/// The command-line tool renders it with colours via [`ErrorContext::display`].
///
/// # Examples
///
/// ```rust,no_run
/// use jsonapi_admin::core::{AdminError, ErrorContext};
///
/// let context = ErrorContext::new(AdminError::CollectionNotFound { name: "Boks".into() })
///     .with_suggestion("Check the collection name against [collections] in the config")
///     .with_details("Collection names are case-sensitive");
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: AdminError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context without suggestion or details.
    #[must_use]
    pub const fn new(error: AdminError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: red error, yellow details, green suggestion.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with a suggestion where one is known.
///
/// Known [`AdminError`] variants get tailored suggestions; IO and parse errors
/// are mapped onto the closest variant; anything else keeps its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(admin_error) = error.downcast_ref::<AdminError>() {
        return create_error_context(admin_error.clone());
    }

    if let Some(ctx) = error.downcast_ref::<ErrorContext>() {
        return ErrorContext {
            error: ctx.error.clone(),
            suggestion: ctx.suggestion.clone(),
            details: ctx.details.clone(),
        };
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::NotFound {
            return ErrorContext::new(AdminError::Other {
                message: chain_message(&error),
            })
            .with_suggestion("Check that the file exists and the path is correct");
        }
    }

    if let Some(json_error) = error.downcast_ref::<serde_json::Error>() {
        return ErrorContext::new(AdminError::MalformedDocument {
            reason: json_error.to_string(),
        })
        .with_suggestion("Make sure the input is valid JSON produced by a JSON:API server");
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(AdminError::ConfigParseError {
            file: "configuration".to_string(),
            reason: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax of the configuration file");
    }

    ErrorContext::new(AdminError::Other {
        message: chain_message(&error),
    })
}

/// Render an error with its cause chain appended.
fn chain_message(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    message
}

fn create_error_context(error: AdminError) -> ErrorContext {
    match &error {
        AdminError::CollectionNotFound {
            name,
        } => {
            let msg = format!("Add a [collections.{name}] table to the configuration or fix the name");
            ErrorContext::new(error)
                .with_suggestion(msg)
                .with_details("Collection names are case-sensitive and must match the configuration keys")
        }
        AdminError::MalformedDocument {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("The document must be a JSON object with a top-level \"data\" member")
            .with_details("\"data\" may be a single resource object or an array of resource objects"),
        AdminError::UnknownFormatter {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Use one of: cellFormatter, toOneFormatter, toManyFormatter, toOneEditor, ToManyEditor",
        ),
        AdminError::ConfigNotFound {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Pass --config <PATH> or set JSONAPI_ADMIN_CONFIG to the configuration file",
        ),
        AdminError::ConfigParseError {
            reason,
            ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Check the syntax of the configuration file")
                .with_details(details)
        }
        AdminError::InvalidPagination {
            ..
        } => ErrorContext::new(error).with_suggestion("Page limits must be greater than zero"),
        _ => ErrorContext::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = AdminError::CollectionNotFound {
            name: "NoSuchCollection".to_string(),
        };
        assert_eq!(error.to_string(), "Collection 'NoSuchCollection' is not configured");

        let error = AdminError::malformed("missing \"data\"");
        assert_eq!(error.to_string(), "Malformed JSON:API document: missing \"data\"");
    }

    #[test]
    fn test_configuration_classification() {
        assert!(AdminError::collection_not_found("x").is_configuration_error());
        assert!(
            AdminError::UnknownFormatter {
                collection: "Books".into(),
                column: "title".into(),
                name: "fancy".into(),
            }
            .is_configuration_error()
        );
        assert!(!AdminError::malformed("x").is_configuration_error());
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new(AdminError::collection_not_found("Boks"))
            .with_suggestion("fix it")
            .with_details("case matters");
        let rendered = ctx.to_string();
        assert!(rendered.contains("Collection 'Boks' is not configured"));
        assert!(rendered.contains("Details: case matters"));
        assert!(rendered.contains("Suggestion: fix it"));
    }

    #[test]
    fn test_user_friendly_error_for_admin_error() {
        let ctx = user_friendly_error(AdminError::collection_not_found("Boks").into());
        assert!(matches!(ctx.error, AdminError::CollectionNotFound { .. }));
        assert!(ctx.suggestion.unwrap().contains("[collections.Boks]"));
    }

    #[test]
    fn test_user_friendly_error_keeps_chain() {
        let error = anyhow::anyhow!("root cause").context("outer failure");
        let ctx = user_friendly_error(error);
        match ctx.error {
            AdminError::Other {
                message,
            } => {
                assert!(message.contains("outer failure"));
                assert!(message.contains("root cause"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_clone_preserves_variant() {
        let error = AdminError::InvalidPagination {
            collection: "Books".into(),
            reason: "limit must be greater than zero".into(),
        };
        let cloned = error.clone();
        assert_eq!(error.to_string(), cloned.to_string());
    }
}
