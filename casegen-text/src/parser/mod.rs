//! Cascade parser
//!
//! Generated text comes in many shapes. Strategies are tried in priority
//! order and the first one that finds at least one test case wins:
//!
//! 1. `markdown`: `**Test Case N:`, `## Test Case N:` or `N. Title:` markers
//! 2. `structured`: the exact `N. Title / - Steps / - Expected Result` template
//! 3. `paragraph`: blank-line separated paragraphs with keyword sections
//!
//! When every strategy comes up empty the result is an empty list.

mod lines;
pub mod markdown;
pub mod paragraph;
pub mod structured;

use tracing::debug;

use crate::TestCase;
use lines::HeaderStyle;

/// A parsing strategy: pure function from text to test cases
pub type Strategy = fn(&str) -> Vec<TestCase>;

/// Strategies in the order they are tried
pub const STRATEGIES: [(&str, Strategy); 3] = [
    ("markdown", markdown::parse),
    ("structured", structured::parse),
    ("paragraph", paragraph::parse),
];

/// Parses generated text into test cases
///
/// # Arguments
/// * `raw` - Free-form text returned by a generator or the fallback
///
/// # Returns
/// The cases found by the first strategy that finds any, or an empty list
///
/// # Example
/// ```
/// let text = "**Test Case 1: Login**\nSteps:\n1. Open app\nExpected Result:\n- Home shown";
/// let cases = casegen_text::parse(text);
/// assert_eq!(cases.len(), 1);
/// assert_eq!(cases[0].title, "Login");
/// ```
pub fn parse(raw: &str) -> Vec<TestCase> {
    parse_with_strategy(raw)
        .map(|(_, cases)| cases)
        .unwrap_or_default()
}

/// Like [`parse`], also returning the name of the strategy that matched
pub fn parse_with_strategy(raw: &str) -> Option<(&'static str, Vec<TestCase>)> {
    let text = raw.replace("\r\n", "\n");
    if text.trim().is_empty() {
        return None;
    }

    for (name, strategy) in STRATEGIES {
        let cases = strategy(&text);
        if !cases.is_empty() {
            debug!("Parsed {} test cases with '{}' strategy", cases.len(), name);
            return Some((name, cases));
        }
    }

    debug!("No parsing strategy matched {} chars of text", text.len());
    None
}

/// Whether the markdown strategy reads `line` back as a list item equal to
/// `item`, rather than as a marker, header, heading or noise
pub(crate) fn reads_back_as_item(line: &str, item: &str) -> bool {
    !markdown::is_marker(line)
        && !lines::is_header(line, HeaderStyle::Strict)
        && !lines::is_heading(line)
        && !lines::is_noise(line)
        && lines::clean_item(line) == item
}
