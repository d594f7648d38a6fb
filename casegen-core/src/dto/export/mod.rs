//! Export DTOs

use serde::{Deserialize, Serialize};

use crate::domain::test_case::TestCase;

/// Output notation for rendered test cases
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    Text,
    #[default]
    Markdown,
    Html,
    #[serde(alias = "jira")]
    JiraMarkup,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Text,
        ExportFormat::Markdown,
        ExportFormat::Html,
        ExportFormat::JiraMarkup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Text => "text",
            ExportFormat::Markdown => "markdown",
            ExportFormat::Html => "html",
            ExportFormat::JiraMarkup => "jira-markup",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" | "plain" => Ok(ExportFormat::Text),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "html" => Ok(ExportFormat::Html),
            "jira-markup" | "jira" => Ok(ExportFormat::JiraMarkup),
            other => Err(format!(
                "Unknown export format '{}' (expected one of: text, markdown, html, jira-markup)",
                other
            )),
        }
    }
}

/// Content to export: structured test cases or already generated text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExportInput {
    Raw(String),
    Cases(Vec<TestCase>),
}

/// Request body for `POST /export`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRequest {
    #[serde(alias = "testCases")]
    pub test_cases: ExportInput,
    #[serde(default)]
    pub format: ExportFormat,
}

/// Query string for `GET /job/{id}/export`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("md".parse::<ExportFormat>(), Ok(ExportFormat::Markdown));
        assert_eq!("JIRA".parse::<ExportFormat>(), Ok(ExportFormat::JiraMarkup));
        assert!("pdf".parse::<ExportFormat>().is_err());

        for format in ExportFormat::ALL {
            assert_eq!(format.as_str().parse::<ExportFormat>(), Ok(format));
        }
    }

    #[test]
    fn test_export_request_accepts_string_or_list() {
        let raw: ExportRequest =
            serde_json::from_str(r#"{"test_cases":"already text","format":"html"}"#).unwrap();
        assert_eq!(raw.test_cases, ExportInput::Raw("already text".to_string()));
        assert_eq!(raw.format, ExportFormat::Html);

        let cases: ExportRequest = serde_json::from_str(
            r#"{"testCases":[{"title":"T","steps":["s"],"expected_result":"r"}],"format":"jira-markup"}"#,
        )
        .unwrap();
        match cases.test_cases {
            ExportInput::Cases(list) => assert_eq!(list[0].expected_results, vec!["r"]),
            other => panic!("unexpected input: {:?}", other),
        }
        assert_eq!(cases.format, ExportFormat::JiraMarkup);
    }
}
