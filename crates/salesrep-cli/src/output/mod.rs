//! Output set writers: CSV tables, Markdown report and SVG charts.

pub mod chart;
pub mod report;
pub mod tables;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use tracing::info;

use salesrep_core::models::config::OutputConfig;
use salesrep_core::Record;

pub use report::Report;
pub use tables::Table;

/// Directory for a report date: `<root>/YYYY/MM/DD`.
pub fn partition_dir(root: &Path, date: NaiveDate) -> PathBuf {
    root.join(format!("{:04}", date.year()))
        .join(format!("{:02}", date.month()))
        .join(format!("{:02}", date.day()))
}

/// Write every table, the report and (optionally) the charts.
///
/// Files land in the partition directory of the first record's report date.
pub fn write_all(records: &[Record], config: &OutputConfig) -> anyhow::Result<Vec<PathBuf>> {
    let Some(first) = records.first() else {
        anyhow::bail!("No records to write");
    };

    let dir = partition_dir(&config.output_dir, first.report_date);
    fs::create_dir_all(&dir)?;

    let mut paths = Table::ALL
        .iter()
        .map(|table| table.write_file(records, &dir))
        .collect::<anyhow::Result<Vec<_>>>()?;

    paths.extend(
        Report::new(records)
            .with_top_n(config.top_n)
            .with_charts(config.charts)
            .write(&dir)?,
    );

    info!("Wrote {} files to {}", paths.len(), dir.display());
    Ok(paths)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::DateTime;
    use salesrep_core::models::record::GROUP_ENTITY_NAME;
    use salesrep_core::{EntityType, Period};

    pub(crate) fn sample_records() -> Vec<Record> {
        let fetched_at = DateTime::parse_from_rfc3339("2024-05-02T08:30:00+08:00").unwrap();
        let record = |entity_type, period, name: &str, value| Record {
            report_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            period,
            entity_type,
            entity_name: name.to_string(),
            sales_value: value,
            occurred_at: 1_714_492_800_000,
            store_code: None,
            record_id: None,
            fetched_at,
        };

        vec![
            record(EntityType::Group, Period::Daily, GROUP_ENTITY_NAME, 1234.5),
            record(EntityType::Group, Period::Monthly, GROUP_ENTITY_NAME, 23456.0),
            record(EntityType::Group, Period::Yearly, GROUP_ENTITY_NAME, 123456.7),
            record(EntityType::BusinessType, Period::Daily, "超市", 120.5),
            record(EntityType::BusinessType, Period::Daily, "百货", 80.0),
            record(EntityType::BusinessType, Period::Monthly, "超市", 3400.0),
            Record {
                store_code: Some("S001".to_string()),
                record_id: Some("r-1".to_string()),
                occurred_at: 1_714_500_000_000,
                ..record(EntityType::Store, Period::Daily, "华东旗舰店", 8901.0)
            },
            record(EntityType::Store, Period::Daily, "华南店", 12.5),
            record(EntityType::Store, Period::Yearly, "华东旗舰店", 98765.4),
        ]
    }

    #[test]
    fn test_partition_dir() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(
            partition_dir(Path::new("data"), date),
            PathBuf::from("data").join("2024").join("05").join("01")
        );
    }

    #[test]
    fn test_write_all() {
        let dir = tempfile::tempdir().unwrap();
        let config = OutputConfig {
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let paths = write_all(&sample_records(), &config).unwrap();
        let day = dir.path().join("2024/05/01");

        assert_eq!(paths.len(), 4 + 6 + 1);
        assert!(paths.iter().all(|p| p.starts_with(&day) && p.exists()));
        assert_eq!(paths[0], day.join("sales.csv"));
    }

    #[test]
    fn test_write_all_rejects_empty_records() {
        let dir = tempfile::tempdir().unwrap();
        let config = OutputConfig {
            output_dir: dir.path().to_path_buf(),
            charts: false,
            ..Default::default()
        };

        assert!(write_all(&[], &config).is_err());
        assert!(!dir.path().join("2024").exists());
    }
}
