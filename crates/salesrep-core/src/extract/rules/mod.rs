//! Rule-based extractors for the rendered report text.

pub mod numbers;
pub mod sections;
pub mod rows;
pub mod dates;
pub mod labels;
pub mod patterns;

pub use numbers::{first_number, normalize};
pub use sections::{locate_headers, slice_blocks, SectionBlock, SectionSpec};
pub use rows::parse_rows;
pub use dates::{DateResolver, DateSource, ReportDate};
pub use labels::{extract_with_label, GroupTotals, LabeledValue, LABEL_SCAN_WINDOW};
