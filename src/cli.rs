use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use reporting_console::backend::ReportingBackend;
use reporting_console::config::{BackendKind, Config};
use reporting_console::console::plain::render_plain;
use reporting_console::console::screens::{destinations, frameworks};
use reporting_console::console::table::TableConfig;
use reporting_console::models::{
    DatasetKind, RecordPayload, ReferenceRecord, ReportDestination, ReportingFramework,
};

#[derive(Parser)]
#[command(name = "reporting-console")]
#[command(about = "Terminal console for managing reporting frameworks and report destinations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend to use (mock, http)
    #[arg(long, global = true)]
    pub backend: Option<BackendKind>,

    /// Base URL of the reporting API
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Rows per table page (10, 25, 50, 100)
    #[arg(long, global = true)]
    pub page_size: Option<usize>,

    /// Comma-separated column keys to display, e.g. updatedOn,updatedBy
    #[arg(long, global = true, value_delimiter = ',')]
    pub columns: Option<Vec<String>>,

    /// Dialog to open on startup (frameworks, destinations)
    #[arg(long)]
    pub open: Option<DatasetKind>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a dataset as a table and exit
    List {
        /// Dataset to list (frameworks, destinations)
        dataset: DatasetKind,
    },
}

impl Cli {
    /// Command line flags take precedence over the environment
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(base_url) = &self.base_url {
            config.api_base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
    }
}

/// Fetch a dataset and print it to stdout
pub async fn run_list(
    backend: Arc<dyn ReportingBackend>,
    dataset: DatasetKind,
    display: Option<&[String]>,
) -> Result<()> {
    info!("Listing {}", dataset);
    let payloads = backend
        .list(dataset)
        .await
        .with_context(|| format!("Failed to fetch {}", dataset))?;

    let lines = match dataset {
        DatasetKind::Frameworks => {
            let config = frameworks::table_config()?;
            plain_lines::<ReportingFramework>(payloads, &config, display)
        }
        DatasetKind::Destinations => {
            let config = destinations::table_config()?;
            plain_lines::<ReportDestination>(payloads, &config, display)
        }
    };

    println!("{}", dataset.title());
    println!();
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

fn plain_lines<T: ReferenceRecord>(
    payloads: Vec<RecordPayload>,
    config: &TableConfig,
    display: Option<&[String]>,
) -> Vec<String> {
    let records: Vec<T> = payloads.into_iter().map(T::from).collect();
    let view: Vec<&T> = records.iter().collect();
    render_plain(&view, &config.resolve(display))
}
