//! Canonical sales record model.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Aggregation window of a sales figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// A single day.
    Daily,
    /// Cumulative within the current month.
    Monthly,
    /// Cumulative within the current year.
    Yearly,
}

impl Period {
    /// All periods in report order.
    pub const ALL: [Period; 3] = [Period::Daily, Period::Monthly, Period::Yearly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of entity a sales figure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// Company-wide aggregate.
    Group,
    /// Retail channel category (业态).
    BusinessType,
    /// Single store (门店).
    Store,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Group => "group",
            EntityType::BusinessType => "business_type",
            EntityType::Store => "store",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display name used for the group aggregate records.
pub const GROUP_ENTITY_NAME: &str = "集团合计";

/// One extracted sales figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Calendar date the report covers.
    pub report_date: NaiveDate,

    /// Aggregation window.
    pub period: Period,

    /// Entity kind.
    pub entity_type: EntityType,

    /// Entity display name.
    pub entity_name: String,

    /// Sales in ten-thousand currency units (万元).
    pub sales_value: f64,

    /// Epoch milliseconds the figure is attributed to.
    pub occurred_at: i64,

    /// Store code (stores only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_code: Option<String>,

    /// Source record identifier (stores only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,

    /// When the page was extracted, in the report timezone.
    pub fetched_at: DateTime<FixedOffset>,
}

impl Record {
    /// Check whether this record belongs to the given table.
    pub fn is(&self, entity_type: EntityType, period: Period) -> bool {
        self.entity_type == entity_type && self.period == period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_serialization() {
        assert_eq!(
            serde_json::to_string(&EntityType::BusinessType).unwrap(),
            "\"business_type\""
        );
        assert_eq!(serde_json::to_string(&Period::Monthly).unwrap(), "\"monthly\"");
        assert_eq!(Period::Yearly.to_string(), "yearly");
        assert_eq!(EntityType::Store.to_string(), "store");
    }

    #[test]
    fn test_record_skips_empty_store_fields() {
        let fetched_at = DateTime::parse_from_rfc3339("2024-05-02T08:30:00+08:00").unwrap();
        let record = Record {
            report_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            period: Period::Daily,
            entity_type: EntityType::Group,
            entity_name: GROUP_ENTITY_NAME.to_string(),
            sales_value: 1234.5,
            occurred_at: 1_714_492_800_000,
            store_code: None,
            record_id: None,
            fetched_at,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("store_code").is_none());
        assert_eq!(json["report_date"], "2024-05-01");
        assert!(record.is(EntityType::Group, Period::Daily));
        assert!(!record.is(EntityType::Group, Period::Monthly));
    }
}
