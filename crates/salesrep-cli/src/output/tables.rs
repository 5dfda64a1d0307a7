//! CSV tables: the long-form record list and one table per entity type.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::SecondsFormat;
use salesrep_core::{EntityType, Record};

/// One CSV file of the output set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    /// Every record.
    Long,
    /// Group totals only.
    Group,
    /// Business type figures only.
    BusinessType,
    /// Store figures only.
    Store,
}

impl Table {
    pub const ALL: [Table; 4] = [Table::Long, Table::Group, Table::BusinessType, Table::Store];

    pub fn file_name(&self) -> &'static str {
        match self {
            Table::Long => "sales.csv",
            Table::Group => "sales_group.csv",
            Table::BusinessType => "sales_business_type.csv",
            Table::Store => "sales_store.csv",
        }
    }

    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            Table::Long => &[
                "report_date",
                "period",
                "entity_type",
                "entity_name",
                "sales_wan",
                "occurred_at_ms",
                "store_code",
                "record_id",
                "fetched_at",
            ],
            Table::Group => &["report_date", "period", "sales_wan", "occurred_at_ms", "fetched_at"],
            Table::BusinessType => &[
                "report_date",
                "period",
                "business_type",
                "sales_wan",
                "occurred_at_ms",
                "fetched_at",
            ],
            Table::Store => &[
                "report_date",
                "period",
                "store_name",
                "store_code",
                "record_id",
                "sales_wan",
                "occurred_at_ms",
                "fetched_at",
            ],
        }
    }

    /// The row for `record`, or `None` if it belongs to another table.
    fn row(&self, record: &Record) -> Option<Vec<String>> {
        let date = record.report_date.to_string();
        let period = record.period.to_string();
        let value = record.sales_value.to_string();
        let occurred_at = record.occurred_at.to_string();
        let fetched_at = record.fetched_at.to_rfc3339_opts(SecondsFormat::Secs, false);
        let store_code = record.store_code.clone().unwrap_or_default();
        let record_id = record.record_id.clone().unwrap_or_default();

        let row = match self {
            Table::Long => vec![
                date,
                period,
                record.entity_type.to_string(),
                record.entity_name.clone(),
                value,
                occurred_at,
                store_code,
                record_id,
                fetched_at,
            ],
            Table::Group if record.entity_type == EntityType::Group => {
                vec![date, period, value, occurred_at, fetched_at]
            }
            Table::BusinessType if record.entity_type == EntityType::BusinessType => vec![
                date,
                period,
                record.entity_name.clone(),
                value,
                occurred_at,
                fetched_at,
            ],
            Table::Store if record.entity_type == EntityType::Store => vec![
                date,
                period,
                record.entity_name.clone(),
                store_code,
                record_id,
                value,
                occurred_at,
                fetched_at,
            ],
            _ => return None,
        };

        Some(row)
    }

    /// Write the table as CSV to `writer`.
    pub fn write_to<W: Write>(&self, records: &[Record], writer: W) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(self.headers())?;

        for row in records.iter().filter_map(|r| self.row(r)) {
            wtr.write_record(&row)?;
        }

        wtr.flush()?;
        Ok(())
    }

    /// Write the table into `dir` under its file name.
    pub fn write_file(&self, records: &[Record], dir: &Path) -> anyhow::Result<PathBuf> {
        let path = dir.join(self.file_name());
        let file = std::fs::File::create(&path)?;
        self.write_to(records, file)?;
        Ok(path)
    }

    /// Render the table as a CSV string.
    pub fn to_csv(&self, records: &[Record]) -> anyhow::Result<String> {
        let mut buf = Vec::new();
        self.write_to(records, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}
