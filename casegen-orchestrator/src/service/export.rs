//! Export Service
//!
//! Formatting of arbitrary test cases or raw generated text.

use casegen_core::dto::export::{ExportFormat, ExportInput};

/// Renders `input` in `format`
pub fn export_formatted(input: &ExportInput, format: ExportFormat) -> String {
    casegen_text::format(input, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use casegen_core::domain::test_case::TestCase;

    #[test]
    fn test_export_cases_and_raw() {
        let cases = ExportInput::Cases(vec![TestCase::new(
            "Login",
            vec!["Open".to_string()],
            vec!["Shown".to_string()],
        )]);
        let out = export_formatted(&cases, ExportFormat::JiraMarkup);
        assert!(out.starts_with("h3. Test Case 1: Login"));

        let raw = ExportInput::Raw("free text".to_string());
        assert_eq!(export_formatted(&raw, ExportFormat::Text), "free text");
    }
}
