//! Markdown-style strategy
//!
//! Recognizes `**Test Case N:`, `## Test Case N:` and `N. Title:` markers,
//! drops any prose before the first marker and reads each block's title,
//! description, steps and expected results.

use regex::Regex;
use std::sync::LazyLock;

use super::lines::{self, HeaderStyle};
use crate::TestCase;

static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^[ \t]*(?:\*\*[ \t]*test[ \t]+case[ \t]+\d+[ \t]*(?:\*\*)?[ \t]*:|#{1,4}[ \t]*test[ \t]+case[ \t]+\d+[ \t]*:|\d+\.[ \t]*title[ \t]*:)",
    )
    .expect("test case marker regex")
});

/// Whether `line` opens a new test case block
pub(crate) fn is_marker(line: &str) -> bool {
    MARKER.is_match(line)
}

pub fn parse(text: &str) -> Vec<TestCase> {
    let markers: Vec<(usize, usize)> = MARKER
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();

    markers
        .iter()
        .enumerate()
        .filter_map(|(idx, &(_, marker_end))| {
            let block_end = markers
                .get(idx + 1)
                .map(|&(next_start, _)| next_start)
                .unwrap_or(text.len());
            parse_block(&text[marker_end..block_end])
        })
        .collect()
}

/// Parses the text following a marker up to the next marker
fn parse_block(block: &str) -> Option<TestCase> {
    let mut lines = block.lines();

    let mut title = lines::clean_title(lines.next().unwrap_or(""));
    if title.is_empty() {
        // Title on its own line, e.g. "**Test Case 1:**\nTitle: Login works"
        for line in lines.by_ref() {
            if lines::is_noise(line) {
                continue;
            }
            if lines::is_header(line, HeaderStyle::Strict) {
                return None;
            }
            title = lines::clean_title(line);
            break;
        }
    }
    if title.is_empty() {
        return None;
    }

    let sections = lines::scan_sections(lines, HeaderStyle::Strict);

    Some(TestCase {
        title,
        description: sections.description,
        steps: sections.steps,
        expected_results: sections.expected,
    })
}
