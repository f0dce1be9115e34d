//! Show the request the client would issue.

use anyhow::Result;
use clap::Args;
use std::path::Path;

use super::{OutputFormat, load_config};
use crate::request::RequestPlan;

/// Print the backend request for a collection page, a search or a single item.
#[derive(Args, Debug)]
pub struct PlanCommand {
    /// Collection to plan the request for
    #[arg(long)]
    pub collection: String,

    /// Plan a single-item fetch instead of a page
    #[arg(long, conflicts_with = "search")]
    pub id: Option<String>,

    /// Search query; switches the page request to the search endpoint
    #[arg(long, default_value = "")]
    pub search: String,

    /// Page offset
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Page size; defaults to the collection's configured limit
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl PlanCommand {
    /// Run the command.
    pub async fn execute(self, config_path: Option<&Path>) -> Result<()> {
        let config = load_config(config_path).await?;
        let settings = config.collection(&self.collection)?;

        let plan = match &self.id {
            Some(id) => RequestPlan::item(settings, id),
            None => {
                let limit = self.limit.unwrap_or(settings.default_limit);
                RequestPlan::list(settings, &self.search, self.offset, limit)
            }
        };
        tracing::debug!("Planned {} for '{}'", plan, self.collection);

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
            OutputFormat::Text => {
                println!("{plan}");
                if let Some(body) = &plan.body {
                    println!("{}", serde_json::to_string_pretty(body)?);
                }
            }
        }
        Ok(())
    }
}
