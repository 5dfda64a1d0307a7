//! Record assembly from group totals and detail strategies.

use std::time::Instant;

use chrono::{DateTime, FixedOffset, Utc};
use tracing::{debug, info, warn};

use crate::error::SalesError;
use crate::models::config::ExtractionConfig;
use crate::models::record::{EntityType, Record, GROUP_ENTITY_NAME};
use crate::page::Page;

use super::inline::{InlineDataExtractor, InlineItem};
use super::rules::{parse_rows, slice_blocks, DateResolver, GroupTotals, ReportDate, SectionSpec};
use super::{DetailRow, DetailStrategy, Result};

/// Result of record extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Group records followed by detail records.
    pub records: Vec<Record>,
    /// Resolved report date.
    pub report_date: ReportDate,
    /// Strategy that produced the detail records, if any applied.
    pub strategy: Option<&'static str>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Reads details from the embedded data object.
#[derive(Debug, Clone, Default)]
pub struct InlineStrategy {
    extractor: InlineDataExtractor,
}

impl InlineStrategy {
    pub fn new(extractor: InlineDataExtractor) -> Self {
        Self { extractor }
    }
}

impl DetailStrategy for InlineStrategy {
    fn name(&self) -> &'static str {
        "inline"
    }

    fn extract(&self, page: &Page) -> Option<Vec<DetailRow>> {
        let snapshot = match self.extractor.extract(&page.markup) {
            Ok(Some(snapshot)) if !snapshot.is_empty() => snapshot,
            Ok(_) => return None,
            Err(e) => {
                warn!("Falling back from inline data: {}", e);
                return None;
            }
        };

        let business_types = snapshot
            .business_types
            .iter()
            .flat_map(|item| item_rows(item, EntityType::BusinessType));
        let stores = snapshot
            .stores
            .iter()
            .flat_map(|item| item_rows(item, EntityType::Store));

        Some(business_types.chain(stores).collect())
    }
}

fn item_rows(item: &InlineItem, entity_type: EntityType) -> impl Iterator<Item = DetailRow> + '_ {
    item.figures().map(move |(period, value)| DetailRow {
        store_code: item.store_code.clone(),
        record_id: item.record_id.clone(),
        occurred_at: item.occurred_at,
        ..DetailRow::new(entity_type, period, item.name.clone(), value)
    })
}

/// Reads details from the section blocks of the rendered text.
#[derive(Debug, Clone)]
pub struct TextBlockStrategy {
    specs: Vec<SectionSpec>,
}

impl TextBlockStrategy {
    pub fn new(specs: Vec<SectionSpec>) -> Self {
        Self { specs }
    }
}

impl Default for TextBlockStrategy {
    fn default() -> Self {
        Self::new(SectionSpec::defaults())
    }
}

impl DetailStrategy for TextBlockStrategy {
    fn name(&self) -> &'static str {
        "text"
    }

    fn extract(&self, page: &Page) -> Option<Vec<DetailRow>> {
        let lines = page.lines();
        let blocks = slice_blocks(&lines, &self.specs);
        if blocks.is_empty() {
            debug!("No section headers in {} lines", lines.len());
            return None;
        }

        let rows = blocks
            .iter()
            .flat_map(|block| {
                debug!("Section {}: {} lines", block.spec.key, block.lines.len());
                parse_rows(&block.lines)
                    .into_iter()
                    .map(|(name, value)| DetailRow::new(block.spec.entity_type, block.spec.period, name, value))
            })
            .collect();

        Some(rows)
    }
}

/// Builds canonical records from a report page.
///
/// The three group totals are always read from their labels. Business type and
/// store figures come from the first strategy that applies, in the order the
/// strategies were registered.
pub struct RecordBuilder {
    resolver: DateResolver,
    offset: FixedOffset,
    strategies: Vec<Box<dyn DetailStrategy>>,
    now: Option<DateTime<FixedOffset>>,
}

impl RecordBuilder {
    /// Create a builder with the inline and text strategies from `config`.
    pub fn new(config: &ExtractionConfig) -> std::result::Result<Self, SalesError> {
        let offset = config.offset()?;
        let resolver = DateResolver::new(offset)
            .with_lag_days(config.fallback_lag_days)
            .with_override(config.report_date);

        let mut builder = Self {
            resolver,
            offset,
            strategies: Vec::new(),
            now: None,
        };

        if config.prefer_inline {
            let extractor = InlineDataExtractor::new(&config.inline_variable)?;
            builder = builder.with_strategy(Box::new(InlineStrategy::new(extractor)));
        }

        Ok(builder.with_strategy(Box::new(TextBlockStrategy::default())))
    }

    /// Append a detail strategy after the registered ones.
    pub fn with_strategy(mut self, strategy: Box<dyn DetailStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Fix the extraction time instead of reading the system clock.
    pub fn with_now(mut self, now: DateTime<FixedOffset>) -> Self {
        self.now = Some(now);
        self
    }

    /// Extract the records of `page`.
    pub fn build(&self, page: &Page) -> Result<Vec<Record>> {
        self.extract(page).map(|result| result.records)
    }

    /// Extract the records of `page` with date and strategy details.
    pub fn extract(&self, page: &Page) -> Result<ExtractionResult> {
        let start = Instant::now();
        let now = self
            .now
            .unwrap_or_else(|| Utc::now().with_timezone(&self.offset));
        let mut warnings = Vec::new();

        let report_date = self.resolver.resolve(&page.text, now);
        let lines = page.lines();
        let totals = GroupTotals::extract(&lines)?;

        let record = |entity_type, period, name: String, value, occurred_at| Record {
            report_date: report_date.date,
            period,
            entity_type,
            entity_name: name,
            sales_value: value,
            occurred_at,
            store_code: None,
            record_id: None,
            fetched_at: now,
        };

        let mut records: Vec<Record> = totals
            .iter()
            .map(|(period, value)| {
                record(
                    EntityType::Group,
                    period,
                    GROUP_ENTITY_NAME.to_string(),
                    value,
                    report_date.midnight_ms,
                )
            })
            .collect();

        let mut strategy = None;
        for candidate in &self.strategies {
            if let Some(rows) = candidate.extract(page) {
                debug!("Strategy {} produced {} rows", candidate.name(), rows.len());
                strategy = Some(candidate.name());

                for row in rows {
                    if row.value < 0.0 {
                        let warning = format!(
                            "skipped negative {} {} figure for {}: {}",
                            row.period, row.entity_type, row.name, row.value
                        );
                        warn!("{}", warning);
                        warnings.push(warning);
                        continue;
                    }

                    records.push(Record {
                        store_code: row.store_code,
                        record_id: row.record_id,
                        ..record(
                            row.entity_type,
                            row.period,
                            row.name,
                            row.value,
                            row.occurred_at.unwrap_or(report_date.midnight_ms),
                        )
                    });
                }
                break;
            }
        }

        if strategy.is_none() {
            let warning = "no business type or store figures found".to_string();
            warn!("{}", warning);
            warnings.push(warning);
        }

        info!(
            "Extracted {} records for {} via {}",
            records.len(),
            report_date.date,
            strategy.unwrap_or("group labels only")
        );

        Ok(ExtractionResult {
            records,
            report_date,
            strategy,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}
