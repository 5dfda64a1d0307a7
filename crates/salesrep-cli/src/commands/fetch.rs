//! Fetch command - download the report page and write the output set.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use salesrep_core::models::config::SourceConfig;
use salesrep_core::{Page, RecordBuilder};

use crate::output;

use super::load_config;

/// Arguments for the fetch command.
#[derive(Args)]
pub struct FetchArgs {
    /// Report page URL (overrides config)
    #[arg(long)]
    url: Option<String>,

    /// Output root directory (overrides config)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also keep the fetched page next to the outputs
    #[arg(long)]
    save_page: bool,
}

pub async fn run(args: FetchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = load_config(config_path)?;

    if let Some(url) = args.url {
        config.source.url = url;
    }
    if let Some(dir) = args.output_dir {
        config.output.output_dir = dir;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Fetching {}...", config.source.url));

    let markup = fetch_page(&config.source).await?;
    debug!("Fetched {} bytes", markup.len());

    pb.set_message("Extracting records...");
    let page = Page::from_markup(markup);
    let result = RecordBuilder::new(&config.extraction)?.extract(&page)?;

    pb.set_message("Writing outputs...");
    let mut paths = output::write_all(&result.records, &config.output)?;

    if args.save_page {
        let dir = output::partition_dir(&config.output.output_dir, result.report_date.date);
        let path = dir.join("page.html");
        fs::write(&path, &page.markup)?;
        paths.push(path);
    }

    pb.finish_and_clear();

    for path in &paths {
        println!("{} Wrote: {}", style("✓").green(), path.display());
    }
    for warning in &result.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }
    println!("Total rows: {}", result.records.len());

    info!("Fetch completed in {:?}", start.elapsed());
    Ok(())
}

/// Download the report page body.
async fn fetch_page(source: &SourceConfig) -> anyhow::Result<String> {
    let client = reqwest::Client::builder()
        .user_agent(&source.user_agent)
        .timeout(Duration::from_secs(source.timeout_secs))
        .build()?;

    let response = client.get(&source.url).send().await?;

    if !response.status().is_success() {
        anyhow::bail!("HTTP {}", response.status());
    }

    Ok(response.text().await?)
}
