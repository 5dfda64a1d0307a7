//! Common regex patterns for sales report extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Numbers
    pub static ref STRICT_NUMBER: Regex = Regex::new(
        r"^-?\d+(?:\.\d+)?$"
    ).unwrap();

    // Thousands-grouped form first so "8,901" is not cut at the comma
    pub static ref FIRST_NUMBER: Regex = Regex::new(
        r"-?\d{1,3}(?:,\d{3})+(?:\.\d+)?|-?\d+(?:\.\d+)?"
    ).unwrap();

    pub static ref DIGIT: Regex = Regex::new(r"\d").unwrap();

    // "<name><sep><number><unit>" on a single line
    pub static ref INLINE_ROW: Regex = Regex::new(
        r"^(?P<name>[^:：\-\s].*?)\s*(?:[:：\-]\s*)?(?P<num>-?\d{1,3}(?:,\d{3})*(?:\.\d+)?|-?\d+(?:\.\d+)?)\s*(?:万元)?$"
    ).unwrap();

    // Group totals
    pub static ref GROUP_DAILY: Regex = Regex::new(
        r"集团合计销售【\d{4}年\d{2}月\d{2}日】（?万元）?"
    ).unwrap();

    pub static ref GROUP_MONTHLY: Regex = Regex::new(
        r"本月集团合计销售（?万元）?"
    ).unwrap();

    pub static ref GROUP_YEARLY: Regex = Regex::new(
        r"本年集团合计销售（?万元）?"
    ).unwrap();

    // Report date carried by the daily group total label
    pub static ref REPORT_DATE: Regex = Regex::new(
        r"集团合计销售【(\d{4})年(\d{2})月(\d{2})日】"
    ).unwrap();

    // Embedded data object assigned to `data`
    pub static ref INLINE_DATA_DECLARATION: Regex = Regex::new(
        r"(?:var|let|const)\s+data\s*=\s*(\{[\s\S]*?\});"
    ).unwrap();

    pub static ref INLINE_DATA_ASSIGNMENT: Regex = Regex::new(
        r"\bdata\s*=\s*(\{[\s\S]*?\});"
    ).unwrap();

    // Trailing separators before a closing bracket
    pub static ref TRAILING_COMMA: Regex = Regex::new(
        r",\s*([}\]])"
    ).unwrap();
}
