//! Sales figure extraction module.

mod builder;
pub mod inline;
pub mod rules;

pub use builder::{ExtractionResult, InlineStrategy, RecordBuilder, TextBlockStrategy};
pub use inline::{InlineDataExtractor, InlineItem, InlineSnapshot};

use crate::error::ExtractionError;
use crate::models::record::{EntityType, Period};
use crate::page::Page;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// A business type or store figure before it becomes a [`crate::Record`].
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    pub entity_type: EntityType,
    pub period: Period,
    pub name: String,
    pub value: f64,
    pub store_code: Option<String>,
    pub record_id: Option<String>,
    /// Explicit occurrence time; the report midnight is used when absent.
    pub occurred_at: Option<i64>,
}

impl DetailRow {
    pub fn new(entity_type: EntityType, period: Period, name: impl Into<String>, value: f64) -> Self {
        Self {
            entity_type,
            period,
            name: name.into(),
            value,
            store_code: None,
            record_id: None,
            occurred_at: None,
        }
    }
}

/// A way of reading business type and store figures from a page.
pub trait DetailStrategy {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Extract detail rows, or `None` when this strategy does not apply.
    fn extract(&self, page: &Page) -> Option<Vec<DetailRow>>;
}
