//! Extract command - run the extraction on a saved page.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use tracing::{debug, info};

use salesrep_core::extract::ExtractionResult;
use salesrep_core::{Page, Record, RecordBuilder};

use crate::output::{self, Table};

use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Saved page (.html/.htm is rendered as markup, anything else is plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the full output set under this root directory instead
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Report date to use when the page carries no date label (YYYY-MM-DD)
    #[arg(long)]
    report_date: Option<NaiveDate>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output (long form)
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = load_config(config_path)?;

    if args.report_date.is_some() {
        config.extraction.report_date = args.report_date;
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Extracting from: {}", args.input.display());
    let page = load_page(&args.input)?;
    let result = RecordBuilder::new(&config.extraction)?.extract(&page)?;

    for warning in &result.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    if let Some(dir) = args.output_dir {
        config.output.output_dir = dir;
        for path in output::write_all(&result.records, &config.output)? {
            println!("{} Wrote: {}", style("✓").green(), path.display());
        }
        println!("Total rows: {}", result.records.len());
    } else {
        let rendered = format_records(&result, args.format)?;

        if let Some(output_path) = &args.output {
            fs::write(output_path, &rendered)?;
            println!(
                "{} Output written to {}",
                style("✓").green(),
                output_path.display()
            );
        } else {
            println!("{}", rendered);
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());
    Ok(())
}

fn load_page(path: &Path) -> anyhow::Result<Page> {
    let content = fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    Ok(match extension.as_str() {
        "html" | "htm" => Page::from_markup(content),
        _ => Page::from_text(content),
    })
}

fn format_records(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&result.records)?),
        OutputFormat::Csv => Table::Long.to_csv(&result.records),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Report date: {}\n", result.report_date.date));
    output.push_str(&format!(
        "Details from: {}\n",
        result.strategy.unwrap_or("-")
    ));

    let mut current = None;
    for record in &result.records {
        let key = (record.entity_type, record.period);
        if current != Some(key) {
            output.push_str(&format!("\n{} / {}:\n", record.entity_type, record.period));
            current = Some(key);
        }
        output.push_str(&format_line(record));
    }

    output
}

fn format_line(record: &Record) -> String {
    match &record.store_code {
        Some(code) => format!("  {} [{}]: {}\n", record.entity_name, code, record.sales_value),
        None => format!("  {}: {}\n", record.entity_name, record.sales_value),
    }
}
