//! Row parsing for section blocks.
//!
//! The page renders a row either on one line (`华东店：8,901万元`) or as a
//! name line followed by a value line. Rows matching neither layout are
//! skipped.

use tracing::trace;

use super::numbers::{first_number, normalize};
use super::patterns::{DIGIT, INLINE_ROW};

/// Parse a section block into ordered (name, value) pairs.
pub fn parse_rows(block: &[&str]) -> Vec<(String, f64)> {
    let mut rows = Vec::new();
    let mut i = 0;

    while i < block.len() {
        let line = block[i].trim();

        if let Some(row) = parse_inline_row(line) {
            rows.push(row);
            i += 1;
            continue;
        }

        if let Some(next) = block.get(i + 1) {
            if !DIGIT.is_match(line) {
                if let Some(value) = first_number(next).and_then(|n| normalize(n).ok()) {
                    rows.push((line.to_string(), value));
                    i += 2;
                    continue;
                }
            }
        }

        trace!("Skipping unparsed row: {}", line);
        i += 1;
    }

    rows
}

/// Split a `<name><sep><number><unit>` line.
fn parse_inline_row(line: &str) -> Option<(String, f64)> {
    let caps = INLINE_ROW.captures(line)?;
    let name = caps["name"].trim();

    // A bare figure such as "1,234.5" is not a named row
    if name.chars().all(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-')) {
        return None;
    }

    let value = normalize(&caps["num"]).ok()?;
    Some((name.to_string(), value))
}
