//! Embedded data object extraction.
//!
//! Some renderings of the report page carry the figures as a script literal
//! (`var data = {...};`). The payload is loosely typed and its keys vary
//! between page versions, so it is reconciled into [`InlineSnapshot`] here and
//! nothing outside this module sees the raw JSON.

use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{ExtractionError, SalesError};
use crate::models::record::Period;

use super::rules::normalize;
use super::rules::patterns::{INLINE_DATA_ASSIGNMENT, INLINE_DATA_DECLARATION, TRAILING_COMMA};

const BUSINESS_TYPE_LIST: &str = "buData";
const STORE_LIST: &str = "shopData";

const BUSINESS_TYPE_NAME_KEYS: &[&str] = &["业态", "name"];
const STORE_NAME_KEYS: &[&str] = &["门店名称", "门店", "name"];
const STORE_CODE_KEYS: &[&str] = &["门店"];
const RECORD_ID_KEYS: &[&str] = &["record_id"];
const OCCURRED_AT_KEYS: &[&str] = &["销售发生时间"];

const DAILY_KEYS: &[&str] = &["销售"];
const BUSINESS_TYPE_MONTHLY_KEYS: &[&str] = &["月度累计销售金额"];
const BUSINESS_TYPE_YEARLY_KEYS: &[&str] = &["年度累计销售金额"];
const STORE_MONTHLY_KEYS: &[&str] = &["月度累计销售金额", "月度累计销售"];
const STORE_YEARLY_KEYS: &[&str] = &["年度累计销售金额", "年度累计销售"];

/// One business type or store from the embedded object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineItem {
    /// Entity display name.
    pub name: String,
    /// Store code (stores only).
    pub store_code: Option<String>,
    /// Source record identifier (stores only).
    pub record_id: Option<String>,
    /// Daily figure.
    pub daily: Option<f64>,
    /// Month-to-date figure.
    pub monthly: Option<f64>,
    /// Year-to-date figure.
    pub yearly: Option<f64>,
    /// Explicit occurrence time in epoch milliseconds.
    pub occurred_at: Option<i64>,
}

impl InlineItem {
    /// Present figures with their periods, in report order.
    pub fn figures(&self) -> impl Iterator<Item = (Period, f64)> {
        [
            (Period::Daily, self.daily),
            (Period::Monthly, self.monthly),
            (Period::Yearly, self.yearly),
        ]
        .into_iter()
        .filter_map(|(period, value)| value.map(|v| (period, v)))
    }
}

/// Canonical view of the embedded data object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineSnapshot {
    pub business_types: Vec<InlineItem>,
    pub stores: Vec<InlineItem>,
}

impl InlineSnapshot {
    pub fn is_empty(&self) -> bool {
        self.business_types.is_empty() && self.stores.is_empty()
    }
}

/// Locates and parses the data object assigned to a script variable.
#[derive(Debug, Clone)]
pub struct InlineDataExtractor {
    declaration: Regex,
    assignment: Regex,
}

impl InlineDataExtractor {
    /// Create an extractor for objects assigned to `variable`.
    pub fn new(variable: &str) -> Result<Self, SalesError> {
        let name = regex::escape(variable);
        let build = |pattern: String| {
            Regex::new(&pattern).map_err(|e| SalesError::Config(format!("inline variable {variable:?}: {e}")))
        };

        Ok(Self {
            declaration: build(format!(r"(?:var|let|const)\s+{name}\s*=\s*(\{{[\s\S]*?\}});"))?,
            assignment: build(format!(r"\b{name}\s*=\s*(\{{[\s\S]*?\}});"))?,
        })
    }

    /// Find the object literal text, declaration form first.
    pub fn find_object<'m>(&self, markup: &'m str) -> Option<&'m str> {
        self.declaration
            .captures(markup)
            .or_else(|| self.assignment.captures(markup))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Extract the snapshot from `markup`.
    ///
    /// `Ok(None)` means the page carries no (non-empty) object, which is the
    /// normal case for text-only renderings.
    pub fn extract(&self, markup: &str) -> Result<Option<InlineSnapshot>, ExtractionError> {
        let Some(object) = self.find_object(markup) else {
            debug!("No inline data object in {} bytes of markup", markup.len());
            return Ok(None);
        };

        let value = parse_object(object)?;
        let Some(root) = value.as_object().filter(|m| !m.is_empty()) else {
            debug!("Inline data object is empty");
            return Ok(None);
        };

        let snapshot = InlineSnapshot {
            business_types: items(root, BUSINESS_TYPE_LIST)
                .filter_map(business_type_item)
                .collect(),
            stores: items(root, STORE_LIST).filter_map(store_item).collect(),
        };

        debug!(
            "Inline data: {} business types, {} stores",
            snapshot.business_types.len(),
            snapshot.stores.len()
        );

        Ok(Some(snapshot))
    }
}

impl Default for InlineDataExtractor {
    fn default() -> Self {
        Self {
            declaration: INLINE_DATA_DECLARATION.clone(),
            assignment: INLINE_DATA_ASSIGNMENT.clone(),
        }
    }
}

/// Parse the object, retrying once with trailing commas removed.
fn parse_object(object: &str) -> Result<Value, ExtractionError> {
    match serde_json::from_str(object) {
        Ok(value) => Ok(value),
        Err(strict) => {
            debug!("Strict inline parse failed ({}), repairing", strict);
            let repaired = TRAILING_COMMA.replace_all(object, "$1");
            serde_json::from_str(&repaired).map_err(|e| ExtractionError::InlineData(e.to_string()))
        }
    }
}

fn items<'v>(root: &'v Map<String, Value>, key: &str) -> impl Iterator<Item = &'v Map<String, Value>> {
    root.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn business_type_item(obj: &Map<String, Value>) -> Option<InlineItem> {
    let name = text_field(obj, BUSINESS_TYPE_NAME_KEYS)?;
    Some(InlineItem {
        daily: figure_field(obj, &name, DAILY_KEYS),
        monthly: figure_field(obj, &name, BUSINESS_TYPE_MONTHLY_KEYS),
        yearly: figure_field(obj, &name, BUSINESS_TYPE_YEARLY_KEYS),
        occurred_at: timestamp_field(obj, OCCURRED_AT_KEYS),
        store_code: None,
        record_id: None,
        name,
    })
}

fn store_item(obj: &Map<String, Value>) -> Option<InlineItem> {
    let name = text_field(obj, STORE_NAME_KEYS)?;
    Some(InlineItem {
        store_code: text_field(obj, STORE_CODE_KEYS),
        record_id: text_field(obj, RECORD_ID_KEYS),
        daily: figure_field(obj, &name, DAILY_KEYS),
        monthly: figure_field(obj, &name, STORE_MONTHLY_KEYS),
        yearly: figure_field(obj, &name, STORE_YEARLY_KEYS),
        occurred_at: timestamp_field(obj, OCCURRED_AT_KEYS),
        name,
    })
}

/// First non-empty string or number under any of `keys`.
fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First usable figure under any of `keys`.
fn figure_field(obj: &Map<String, Value>, name: &str, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| {
        let value = obj.get(*key)?;
        let figure = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => normalize(s).ok(),
            _ => None,
        };
        if figure.is_none() && !value.is_null() {
            warn!("Ignoring unusable {} for {}: {}", key, name, value);
        }
        figure
    })
}

/// Epoch milliseconds given as a number or digit string.
fn timestamp_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"
        <html><body><div id="app"></div>
        <script>
            var data = {
                "buData": [
                    {"业态": "超市", "销售": 120.5, "月度累计销售金额": "3,400", "年度累计销售金额": 40000},
                    {"name": "百货", "销售": "80", "销售发生时间": "1714521600000"},
                    {"销售": 1}
                ],
                "shopData": [
                    {"门店名称": "华东旗舰店", "门店": "S001", "record_id": 77, "销售": "8,901", "月度累计销售": 100},
                    {"门店": "S002", "销售": null, "年度累计销售金额": 5, "年度累计销售": 6},
                ],
            };
            render(data);
        </script></body></html>"#;

    #[test]
    fn test_find_object() {
        let extractor = InlineDataExtractor::default();
        let object = extractor.find_object(PAGE).unwrap();

        assert!(object.starts_with('{'));
        assert!(object.trim_end().ends_with('}'));
        assert!(object.contains("shopData"));
    }

    #[test]
    fn test_extract_with_trailing_commas() {
        let snapshot = InlineDataExtractor::default().extract(PAGE).unwrap().unwrap();

        assert_eq!(snapshot.business_types.len(), 2);
        assert_eq!(
            snapshot.business_types[0],
            InlineItem {
                name: "超市".to_string(),
                daily: Some(120.5),
                monthly: Some(3400.0),
                yearly: Some(40000.0),
                ..Default::default()
            }
        );
        assert_eq!(snapshot.business_types[1].name, "百货");
        assert_eq!(snapshot.business_types[1].daily, Some(80.0));
        assert_eq!(snapshot.business_types[1].occurred_at, Some(1_714_521_600_000));
    }

    #[test]
    fn test_store_aliases() {
        let snapshot = InlineDataExtractor::default().extract(PAGE).unwrap().unwrap();

        let flagship = &snapshot.stores[0];
        assert_eq!(flagship.name, "华东旗舰店");
        assert_eq!(flagship.store_code.as_deref(), Some("S001"));
        assert_eq!(flagship.record_id.as_deref(), Some("77"));
        assert_eq!(flagship.daily, Some(8901.0));
        assert_eq!(flagship.monthly, Some(100.0));
        assert_eq!(flagship.yearly, None);

        // Code doubles as the name; the amount key wins over the short alias
        let second = &snapshot.stores[1];
        assert_eq!(second.name, "S002");
        assert_eq!(second.store_code.as_deref(), Some("S002"));
        assert_eq!(second.daily, None);
        assert_eq!(second.yearly, Some(5.0));
        let periods: Vec<Period> = second.figures().map(|(p, _)| p).collect();
        assert_eq!(periods, vec![Period::Yearly]);
    }

    #[test]
    fn test_absent_object() {
        let extractor = InlineDataExtractor::default();
        assert_eq!(extractor.extract("<p>集团合计销售</p>").unwrap(), None);
        assert_eq!(extractor.extract("<script>var data = {};</script>").unwrap(), None);
    }

    #[test]
    fn test_unrepairable_object() {
        let err = InlineDataExtractor::default()
            .extract("<script>var data = {buData: []};</script>")
            .unwrap_err();
        assert!(matches!(err, ExtractionError::InlineData(_)));
    }

    #[test]
    fn test_custom_variable_and_bare_assignment() {
        let extractor = InlineDataExtractor::new("window.report").unwrap();
        let markup = r#"<script>window.report = {"buData": [{"业态": "便利店", "销售": 3}]};</script>"#;

        let snapshot = extractor.extract(markup).unwrap().unwrap();
        assert_eq!(snapshot.business_types[0].name, "便利店");
        assert!(snapshot.stores.is_empty());
    }
}
