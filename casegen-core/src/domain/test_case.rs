//! Test case domain types

use serde::{Deserialize, Serialize};

/// A structured test case
///
/// Backends and older clients send the expected outcome either as a list
/// (`expected_results`) or as a single string (`expected_result` /
/// `expected`). Both shapes deserialize into `expected_results`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TestCaseRecord")]
pub struct TestCase {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub steps: Vec<String>,
    pub expected_results: Vec<String>,
}

impl TestCase {
    pub fn new(
        title: impl Into<String>,
        steps: Vec<String>,
        expected_results: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            steps,
            expected_results,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Wire shape accepted for a test case
#[derive(Deserialize)]
struct TestCaseRecord {
    #[serde(default, alias = "name")]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    steps: OneOrMany,
    #[serde(default, alias = "expectedResults")]
    expected_results: Option<OneOrMany>,
    #[serde(default, alias = "expectedResult")]
    expected_result: Option<String>,
    #[serde(default)]
    expected: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<String>),
    One(String),
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        let items = match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        };
        items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    }
}

impl From<TestCaseRecord> for TestCase {
    fn from(record: TestCaseRecord) -> Self {
        let expected_results = match (record.expected_results, record.expected_result, record.expected) {
            (Some(many), _, _) => many.into_vec(),
            (None, Some(one), _) | (None, None, Some(one)) => OneOrMany::One(one).into_vec(),
            (None, None, None) => Vec::new(),
        };

        TestCase {
            title: record.title.trim().to_string(),
            description: record
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            steps: record.steps.into_vec(),
            expected_results,
        }
    }
}
