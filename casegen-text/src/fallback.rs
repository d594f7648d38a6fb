//! Offline fallback generator
//!
//! Produces a small, deterministic set of test cases from the job payload
//! alone. Used when the generation backend fails or runs out of time. The
//! output uses `**Test Case N:` markers so it goes through the markdown
//! parsing strategy like any backend answer.

use regex::Regex;
use std::sync::LazyLock;

use casegen_core::dto::job::CreateJob;

use crate::keywords::extract_keywords;

pub const DEFAULT_FEATURE: &str = "feature";
pub const DEFAULT_DETAIL: &str = "functionality";

/// Keywords used in a scenario title
const TITLE_KEYWORDS: usize = 3;

static CRITERIA_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*•+]+\s*|\d+[.)]\s*|\[[ xX]?\]\s*)+").expect("criteria marker regex")
});

/// Generates fallback test case text for a job payload
pub fn generate_fallback(payload: &CreateJob) -> String {
    generate_from(&payload.description, &payload.acceptance_criteria)
}

/// Generates fallback test case text from raw description and criteria
pub fn generate_from(description: &str, acceptance_criteria: &str) -> String {
    let keywords = extract_keywords(&format!("{} {}", description, acceptance_criteria));
    let feature = keywords.first().map(String::as_str).unwrap_or(DEFAULT_FEATURE);
    let detail = keywords.get(1).map(String::as_str).unwrap_or(DEFAULT_DETAIL);

    let mut blocks = vec![basic_case(feature, detail)];
    for (idx, line) in criteria_lines(acceptance_criteria).iter().enumerate() {
        blocks.push(scenario_case(blocks.len() + 1, idx + 1, line));
    }

    blocks.join("\n\n")
}

/// Acceptance criteria lines with list markers removed
///
/// Blank lines, separators and bullets without any text are dropped.
pub fn criteria_lines(acceptance_criteria: &str) -> Vec<String> {
    acceptance_criteria
        .lines()
        .map(|line| CRITERIA_MARKER.replace(line, "").trim().to_string())
        .filter(|line| line.chars().any(char::is_alphanumeric))
        .collect()
}

fn basic_case(feature: &str, detail: &str) -> String {
    format!(
        "**Test Case 1: Verify basic {feature} {detail}**\n\
         Description: Checks that the {feature} {detail} works under normal conditions\n\
         Steps:\n\
         1. Open the application\n\
         2. Navigate to the {feature} {detail} area\n\
         3. Perform the main {feature} action with valid data\n\
         Expected Result:\n\
         - The {feature} {detail} completes without errors\n\
         - The result of the action is visible to the user"
    )
}

fn scenario_case(number: usize, criterion: usize, line: &str) -> String {
    let keywords = extract_keywords(line);
    let title = if keywords.is_empty() {
        format!("Verify acceptance criterion {}", criterion)
    } else {
        let picked: Vec<&str> = keywords
            .iter()
            .take(TITLE_KEYWORDS)
            .map(String::as_str)
            .collect();
        format!("Verify {}", picked.join(" "))
    };
    let focus = keywords
        .first()
        .map(String::as_str)
        .unwrap_or(DEFAULT_FEATURE);

    format!(
        "**Test Case {number}: {title}**\n\
         Steps:\n\
         1. Prepare the preconditions for: {line}\n\
         2. Exercise the {focus} behaviour described by the criterion\n\
         3. Observe the system response\n\
         Expected Result:\n\
         - The system satisfies: {line}"
    )
}
