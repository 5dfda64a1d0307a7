//! Markdown daily report with ranking tables and bar charts.

use std::fs;
use std::path::{Path, PathBuf};

use salesrep_core::{EntityType, Period, Record};

use super::chart::BarChart;

/// Highest `n` figures of one entity type and period, largest first.
pub fn top_n(records: &[Record], entity_type: EntityType, period: Period, n: usize) -> Vec<&Record> {
    let mut rows: Vec<&Record> = records.iter().filter(|r| r.is(entity_type, period)).collect();
    rows.sort_by(|a, b| b.sales_value.total_cmp(&a.sales_value));
    rows.truncate(n);
    rows
}

fn entity_label(entity_type: EntityType) -> &'static str {
    match entity_type {
        EntityType::Group => "集团",
        EntityType::BusinessType => "业态",
        EntityType::Store => "门店",
    }
}

fn period_label(period: Period) -> &'static str {
    match period {
        Period::Daily => "日销",
        Period::Monthly => "月度累计",
        Period::Yearly => "年度累计",
    }
}

fn chart_file_name(entity_type: EntityType, period: Period, n: usize) -> String {
    let prefix = match entity_type {
        EntityType::BusinessType => "bu",
        _ => entity_type.as_str(),
    };
    format!("{prefix}_{period}_top{n}.svg")
}

fn markdown_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut lines = vec![
        format!("| {} |", headers.join(" | ")),
        format!("| {} |", vec!["---"; headers.len()].join(" | ")),
    ];
    lines.extend(rows.iter().map(|r| format!("| {} |", r.join(" | "))));
    lines.join("\n")
}

fn extreme(records: &[Record], entity_type: EntityType, largest: bool) -> String {
    let daily = records.iter().filter(|r| r.is(entity_type, Period::Daily));
    let pick = if largest {
        daily.max_by(|a, b| a.sales_value.total_cmp(&b.sales_value))
    } else {
        daily.min_by(|a, b| a.sales_value.total_cmp(&b.sales_value))
    };
    pick.map(|r| format!("{} {:.0}", r.entity_name, r.sales_value))
        .unwrap_or_else(|| "-".to_string())
}

fn distinct_names(records: &[Record], entity_type: EntityType) -> usize {
    let mut names: Vec<&str> = records
        .iter()
        .filter(|r| r.entity_type == entity_type)
        .map(|r| r.entity_name.as_str())
        .collect();
    names.sort_unstable();
    names.dedup();
    names.len()
}

/// Markdown report generator.
#[derive(Debug, Clone)]
pub struct Report<'r> {
    records: &'r [Record],
    top_n: usize,
    charts: bool,
}

impl<'r> Report<'r> {
    pub fn new(records: &'r [Record]) -> Self {
        Self {
            records,
            top_n: 10,
            charts: true,
        }
    }

    /// Set the ranking length.
    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    /// Enable or disable chart links and files.
    pub fn with_charts(mut self, charts: bool) -> Self {
        self.charts = charts;
        self
    }

    fn report_date(&self) -> String {
        self.records
            .first()
            .map(|r| r.report_date.to_string())
            .unwrap_or_default()
    }

    fn summary(&self) -> Vec<String> {
        let records = self.records;
        vec![
            format!("- 业态数: {}", distinct_names(records, EntityType::BusinessType)),
            format!("- 门店数: {}", distinct_names(records, EntityType::Store)),
            format!("- 业态日销最大: {}", extreme(records, EntityType::BusinessType, true)),
            format!("- 业态日销最小: {}", extreme(records, EntityType::BusinessType, false)),
            format!("- 门店日销最大: {}", extreme(records, EntityType::Store, true)),
            format!("- 门店日销最小: {}", extreme(records, EntityType::Store, false)),
        ]
    }

    fn group_table(&self) -> String {
        let rows: Vec<Vec<String>> = Period::ALL
            .iter()
            .filter_map(|&period| {
                self.records
                    .iter()
                    .find(|r| r.is(EntityType::Group, period))
                    .map(|r| vec![period.to_string(), r.sales_value.to_string()])
            })
            .collect();
        markdown_table(&["period", "sales_wan"], &rows)
    }

    fn ranking_table(&self, entity_type: EntityType, period: Period) -> String {
        let name_header = match entity_type {
            EntityType::Store => "store_name",
            _ => "business_type",
        };
        let rows: Vec<Vec<String>> = top_n(self.records, entity_type, period, self.top_n)
            .iter()
            .enumerate()
            .map(|(i, r)| vec![(i + 1).to_string(), r.entity_name.clone(), r.sales_value.to_string()])
            .collect();
        markdown_table(&["rank", name_header, "sales_wan"], &rows)
    }

    fn chart(&self, entity_type: EntityType, period: Period) -> BarChart {
        let title = format!(
            "{}{}TOP{} {}",
            entity_label(entity_type),
            period_label(period),
            self.top_n,
            self.report_date()
        );
        let bars = top_n(self.records, entity_type, period, self.top_n)
            .into_iter()
            .map(|r| (r.entity_name.clone(), r.sales_value))
            .collect();
        BarChart::new(title, bars)
    }

    /// Render the Markdown document.
    pub fn render(&self) -> String {
        let mut content = vec![
            format!("# 销售日报 {}", self.report_date()),
            String::new(),
            "## 摘要".to_string(),
            String::new(),
        ];
        content.extend(self.summary());
        content.extend([
            String::new(),
            "## 集团合计".to_string(),
            String::new(),
            self.group_table(),
        ]);

        for entity_type in [EntityType::BusinessType, EntityType::Store] {
            content.push(String::new());
            content.push(format!("## {} TOP{}", entity_label(entity_type), self.top_n));

            for period in Period::ALL {
                content.push(String::new());
                content.push(format!("### {}", period_label(period)));
                content.push(String::new());
                content.push(self.ranking_table(entity_type, period));

                if self.charts {
                    content.push(String::new());
                    content.push(format!("![](./{})", chart_file_name(entity_type, period, self.top_n)));
                }
            }
        }

        content.push(String::new());
        content.join("\n")
    }

    /// Write the charts and `report.md` into `dir`.
    pub fn write(&self, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let mut paths = Vec::new();

        if self.charts {
            for entity_type in [EntityType::BusinessType, EntityType::Store] {
                for period in Period::ALL {
                    let path = dir.join(chart_file_name(entity_type, period, self.top_n));
                    self.chart(entity_type, period).write(&path)?;
                    paths.push(path);
                }
            }
        }

        let path = dir.join("report.md");
        fs::write(&path, self.render())?;
        paths.push(path);

        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::sample_records;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_top_n_orders_descending_and_truncates() {
        let records = sample_records();
        let names: Vec<&str> = top_n(&records, EntityType::BusinessType, Period::Daily, 1)
            .iter()
            .map(|r| r.entity_name.as_str())
            .collect();
        assert_eq!(names, vec!["超市"]);

        let values: Vec<f64> = top_n(&records, EntityType::Store, Period::Daily, 10)
            .iter()
            .map(|r| r.sales_value)
            .collect();
        assert_eq!(values, vec![8901.0, 12.5]);
    }

    #[test]
    fn test_markdown_table() {
        let table = markdown_table(&["a", "b"], &[vec!["1".to_string(), "x".to_string()]]);
        assert_eq!(table, "| a | b |\n| --- | --- |\n| 1 | x |");
    }

    #[test]
    fn test_render_report() {
        let records = sample_records();
        let report = Report::new(&records).render();

        assert!(report.starts_with("# 销售日报 2024-05-01\n"));
        assert!(report.contains("- 业态数: 2"));
        assert!(report.contains("- 门店数: 2"));
        assert!(report.contains("- 门店日销最大: 华东旗舰店 8901"));
        assert!(report.contains("- 业态日销最小: 百货 80"));
        assert!(report.contains("| daily | 1234.5 |"));
        assert!(report.contains("## 业态 TOP10"));
        assert!(report.contains("| 1 | 华东旗舰店 | 98765.4 |"));
        assert!(report.contains("![](./bu_monthly_top10.svg)"));
        assert!(report.contains("![](./store_yearly_top10.svg)"));
    }

    #[test]
    fn test_render_without_charts() {
        let records = sample_records();
        let report = Report::new(&records).with_charts(false).with_top_n(5).render();

        assert!(report.contains("## 门店 TOP5"));
        assert!(!report.contains(".svg"));
    }

    #[test]
    fn test_write_report_and_charts() {
        let dir = tempfile::tempdir().unwrap();
        let records = sample_records();
        let paths = Report::new(&records).write(dir.path()).unwrap();

        assert_eq!(paths.len(), 7);
        assert!(dir.path().join("bu_daily_top10.svg").exists());
        assert!(dir.path().join("store_monthly_top10.svg").exists());
        assert_eq!(paths.last().unwrap(), &dir.path().join("report.md"));
    }
}
