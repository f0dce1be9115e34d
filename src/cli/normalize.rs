//! Normalize a JSON:API document file.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::load_config;
use crate::config::AdminConfig;
use crate::jsonapi::{Document, normalize};

/// Read a JSON:API document and print its records in flattened form.
///
/// References missing from `included` are logged as warnings on stderr and
/// left as bare `{id, type}` objects in the output.
#[derive(Args, Debug)]
pub struct NormalizeCommand {
    /// Collection the records belong to (becomes each record's `route`)
    #[arg(long)]
    pub collection: String,

    /// JSON:API document to normalize
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

impl NormalizeCommand {
    /// Run the command.
    ///
    /// With an explicit configuration (or one found at the default location)
    /// the collection must be defined in it.
    pub async fn execute(self, config_path: Option<&Path>) -> Result<()> {
        let use_config = match config_path {
            Some(_) => true,
            None => fs::try_exists(AdminConfig::default_path()).await.unwrap_or(false),
        };
        if use_config {
            let config = load_config(config_path).await?;
            config.collection(&self.collection)?;
        }

        let content = fs::read_to_string(&self.file)
            .await
            .with_context(|| format!("Failed to read document: {}", self.file.display()))?;
        let document = Document::from_json_str(&content)
            .with_context(|| format!("Invalid JSON:API document: {}", self.file.display()))?;

        let normalized = normalize(&document, &self.collection);
        for missing in &normalized.unresolved {
            tracing::warn!(
                "Record {} relationship '{}' references {} which is not included",
                missing.record_id,
                missing.relationship,
                missing.target
            );
        }

        let flattened: Vec<_> = normalized.records.iter().map(|record| record.to_value()).collect();
        println!("{}", serde_json::to_string_pretty(&flattened)?);
        Ok(())
    }
}
