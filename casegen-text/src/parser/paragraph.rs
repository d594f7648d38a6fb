//! Paragraph strategy
//!
//! Last resort for output without any markers: every blank-line separated
//! paragraph with at least two lines is read as one test case. Steps and
//! expected results are located by keyword; missing sections are filled with
//! placeholder text.
//!
//! A one-line paragraph is never a candidate, even next to multi-line ones:
//! a lone line is indistinguishable from prose. The placeholder guarantee
//! applies to every paragraph that passes that filter.

use regex::Regex;
use std::sync::LazyLock;

use super::lines::{self, HeaderStyle};
use crate::TestCase;

pub const NO_STEPS: &str = "No specific steps provided";
pub const NO_EXPECTED: &str = "No specific expected result provided";

/// A candidate paragraph needs at least this many non-empty lines
const MIN_LINES: usize = 2;

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n").expect("paragraph break regex"));

static PREAMBLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:sure|here\s+are|here\s+is|certainly|below\s+are|of\s+course|absolutely)\b")
        .expect("preamble regex")
});

pub fn parse(text: &str) -> Vec<TestCase> {
    PARAGRAPH_BREAK
        .split(text)
        .filter_map(parse_paragraph)
        .collect()
}

fn parse_paragraph(paragraph: &str) -> Option<TestCase> {
    let body: Vec<&str> = paragraph
        .lines()
        .filter(|line| !lines::is_noise(line))
        .collect();

    if body.len() < MIN_LINES || PREAMBLE.is_match(body[0]) {
        return None;
    }

    // An explicit "Title:" line wins over the first line
    let (title, rest): (String, Vec<&str>) =
        match body.iter().position(|line| lines::title_label(line).is_some()) {
            Some(idx) => {
                let title = lines::title_label(body[idx]).unwrap_or_default();
                let rest = body
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != idx)
                    .map(|(_, line)| *line)
                    .collect();
                (title, rest)
            }
            None => (lines::clean_title(body[0]), body[1..].to_vec()),
        };

    if title.is_empty() {
        return None;
    }

    let sections = lines::scan_sections(rest, HeaderStyle::Loose);

    let steps = if sections.steps.is_empty() {
        vec![NO_STEPS.to_string()]
    } else {
        sections.steps
    };
    let expected_results = if sections.expected.is_empty() {
        vec![NO_EXPECTED.to_string()]
    } else {
        sections.expected
    };

    Some(TestCase {
        title,
        description: sections.description,
        steps,
        expected_results,
    })
}
