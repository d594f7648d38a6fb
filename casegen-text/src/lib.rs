//! Casegen Text Processing
//!
//! This crate turns generated free-form text into structured test cases and
//! back. It includes:
//! - Parser cascade: markdown, strict template and paragraph strategies
//! - Fallback generator: deterministic offline test cases from a payload
//! - Formatter: text, markdown, html and jira-markup rendering
//! - Sanitizer: strips metadata lines from backend output
//!
//! Everything here is pure: no I/O, no clocks, no randomness.

pub mod fallback;
pub mod formatter;
pub mod keywords;
pub mod parser;
pub mod sanitize;

pub use fallback::generate_fallback;
pub use formatter::{escape_html, format, format_cases};
pub use keywords::extract_keywords;
pub use parser::parse;
pub use sanitize::sanitize;

pub use casegen_core::domain::test_case::TestCase;
pub use casegen_core::dto::export::{ExportFormat, ExportInput};
