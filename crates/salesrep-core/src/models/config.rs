//! Configuration structures for the extraction pipeline.

use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, SalesError};

/// Main configuration for the salesrep pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesConfig {
    /// Report page source.
    pub source: SourceConfig,

    /// Extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Where and how the report page is fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Report page URL.
    pub url: String,

    /// User-Agent header sent with the request.
    pub user_agent: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: "https://web.azpdl.cn/sale/info".to_string(),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                         AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/126.0.0.0 Safari/537.36"
                .to_string(),
            timeout_secs: 30,
        }
    }
}

/// Sales figure extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Report timezone offset from UTC in seconds. Defaults to Asia/Shanghai,
    /// which has no DST.
    pub utc_offset_secs: i32,

    /// Report date used when the page carries no date label.
    /// When unset, the date falls back to `fallback_lag_days` before today.
    pub report_date: Option<NaiveDate>,

    /// Days between publication and the reported day.
    pub fallback_lag_days: u32,

    /// Variable name the embedded data object is assigned to.
    pub inline_variable: String,

    /// Use the embedded data object when present.
    pub prefer_inline: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            utc_offset_secs: 8 * 3600,
            report_date: None,
            fallback_lag_days: 1,
            inline_variable: "data".to_string(),
            prefer_inline: true,
        }
    }
}

impl ExtractionConfig {
    /// The report timezone as a fixed offset.
    pub fn offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_secs).ok_or_else(|| {
            SalesError::Config(format!("invalid UTC offset: {}s", self.utc_offset_secs))
        })
    }
}

/// Output writer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory; files land under `YYYY/MM/DD` of the report date.
    pub output_dir: PathBuf,

    /// Number of entries in each ranking table and chart.
    pub top_n: usize,

    /// Render SVG bar charts next to the Markdown report.
    pub charts: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("data"),
            top_n: 10,
            charts: true,
        }
    }
}

impl SalesConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.extraction.offset()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
