//! Number normalization for report figures.

use crate::error::ExtractionError;

use super::patterns::{FIRST_NUMBER, STRICT_NUMBER};

/// Parse a numeric token such as "1,234.5" into a float.
///
/// Surrounding whitespace and thousands separators are removed; what remains
/// must be a signed integer or decimal.
pub fn normalize(text: &str) -> Result<f64, ExtractionError> {
    let cleaned = text.trim().replace(',', "");

    if cleaned.is_empty() || !STRICT_NUMBER.is_match(&cleaned) {
        return Err(ExtractionError::parse("number", text));
    }

    cleaned
        .parse::<f64>()
        .map_err(|_| ExtractionError::parse("number", text))
}

/// Find the first numeric substring in `text`.
pub fn first_number(text: &str) -> Option<&str> {
    FIRST_NUMBER.find(text).map(|m| m.as_str())
}
