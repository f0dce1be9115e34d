//! Validate a configuration file.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use super::{OutputFormat, load_config};
use crate::config::ResolvedConfig;

/// Load a configuration, apply defaults and report what it defines.
///
/// Unknown formatter names, zero page limits and parse errors fail the
/// command with exit code 1.
#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct CollectionSummary<'a> {
    name: &'a str,
    api_route: &'a str,
    api_type: &'a str,
    main_display_attribute: &'a str,
    default_limit: usize,
    columns: usize,
}

#[derive(Serialize)]
struct ValidationReport<'a> {
    valid: bool,
    collections: Vec<CollectionSummary<'a>>,
    types: Vec<(&'a str, &'a str)>,
}

impl<'a> ValidationReport<'a> {
    fn new(config: &'a ResolvedConfig) -> Self {
        Self {
            valid: true,
            collections: config
                .collections
                .values()
                .map(|c| CollectionSummary {
                    name: &c.name,
                    api_route: &c.api_route,
                    api_type: &c.api_type,
                    main_display_attribute: &c.main_display_attribute,
                    default_limit: c.default_limit,
                    columns: c.columns.len(),
                })
                .collect(),
            types: config.type_index.types(),
        }
    }
}

impl ValidateCommand {
    /// Run against the configuration at `config_path` (or the default location).
    pub async fn execute(self, config_path: Option<&Path>) -> Result<()> {
        let config = load_config(config_path).await?;
        let report = ValidationReport::new(&config);

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Text => {
                println!("{} Configuration is valid", "✓".green());
                println!("\n{}", "Collections:".bold());
                for c in &report.collections {
                    println!(
                        "  {} -> /{} ({}), limit {}, {} column(s)",
                        c.name.cyan(),
                        c.api_route,
                        c.api_type,
                        c.default_limit,
                        c.columns
                    );
                }
                println!("\n{}", "Types:".bold());
                for (api_type, collection) in &report.types {
                    println!("  {api_type} -> {collection}");
                }
            }
        }
        Ok(())
    }
}
