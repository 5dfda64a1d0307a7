//! Strict label lookup for the mandatory group totals.

use regex::Regex;
use tracing::debug;

use crate::error::ExtractionError;
use crate::models::record::Period;

use super::numbers::{first_number, normalize};
use super::patterns::{DIGIT, GROUP_DAILY, GROUP_MONTHLY, GROUP_YEARLY};

/// How far past a label the lookup searches for its figure.
///
/// Lines `idx + 1 .. idx + LABEL_SCAN_WINDOW` are examined for a label at `idx`.
pub const LABEL_SCAN_WINDOW: usize = 15;

/// A figure found after a label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabeledValue {
    /// Parsed figure.
    pub value: f64,
    /// Index of the line the figure was read from.
    pub line: usize,
}

/// Find `pattern` and read the first number that follows it.
///
/// Every line matching the label is tried in order; the first whose window
/// holds a line with a digit wins. That line's first number must parse.
pub fn extract_with_label(lines: &[&str], pattern: &Regex) -> Result<LabeledValue, ExtractionError> {
    let mut label_seen = false;

    for (idx, line) in lines.iter().enumerate() {
        if !pattern.is_match(line) {
            continue;
        }
        label_seen = true;

        let end = (idx + LABEL_SCAN_WINDOW).min(lines.len());
        for (j, candidate) in lines.iter().enumerate().take(end).skip(idx + 1) {
            let candidate = candidate.trim();
            if !DIGIT.is_match(candidate) {
                continue;
            }
            if let Some(number) = first_number(candidate) {
                let value = normalize(number)?;
                debug!("Label {:?} -> {} (line {})", pattern.as_str(), value, j);
                return Ok(LabeledValue { value, line: j });
            }
        }
    }

    if label_seen {
        Err(ExtractionError::NumberNotFound {
            label: pattern.as_str().to_string(),
            window: LABEL_SCAN_WINDOW,
        })
    } else {
        Err(ExtractionError::MissingLabel {
            label: pattern.as_str().to_string(),
        })
    }
}

/// The three company-wide totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupTotals {
    pub daily: f64,
    pub monthly: f64,
    pub yearly: f64,
}

impl GroupTotals {
    /// Look up all three totals; any missing one is an error.
    pub fn extract(lines: &[&str]) -> Result<Self, ExtractionError> {
        let totals = Self {
            daily: group_total(lines, Period::Daily)?,
            monthly: group_total(lines, Period::Monthly)?,
            yearly: group_total(lines, Period::Yearly)?,
        };

        for (period, value) in totals.iter() {
            if value < 0.0 {
                return Err(ExtractionError::Validation {
                    field: format!("group total ({period})"),
                    reason: format!("negative sales figure {value}"),
                });
            }
        }

        Ok(totals)
    }

    /// Totals paired with their periods, in report order.
    pub fn iter(&self) -> impl Iterator<Item = (Period, f64)> {
        [
            (Period::Daily, self.daily),
            (Period::Monthly, self.monthly),
            (Period::Yearly, self.yearly),
        ]
        .into_iter()
    }
}

fn group_total(lines: &[&str], period: Period) -> Result<f64, ExtractionError> {
    let pattern: &Regex = match period {
        Period::Daily => &*GROUP_DAILY,
        Period::Monthly => &*GROUP_MONTHLY,
        Period::Yearly => &*GROUP_YEARLY,
    };
    extract_with_label(lines, pattern).map(|found| found.value)
}
