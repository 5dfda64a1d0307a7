//! Core library for daily sales report extraction.
//!
//! This crate provides:
//! - Page rendering (markup to plain-text lines)
//! - Embedded data object extraction with alias reconciliation
//! - Text section slicing and row heuristics for the rendered page
//! - Mandatory group total lookup and report date resolution
//! - The canonical sales record model

pub mod error;
pub mod models;
pub mod page;
pub mod extract;

pub use error::{ExtractionError, Result, SalesError};
pub use models::config::SalesConfig;
pub use models::record::{EntityType, Period, Record};
pub use page::Page;
pub use extract::{DetailStrategy, RecordBuilder};
