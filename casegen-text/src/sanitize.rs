//! Backend output sanitizer
//!
//! Generators like to add `Test Data:` and `Priority:` lines that have no
//! place in a test case record. They are removed before parsing, and runs of
//! blank lines are collapsed to one.

use regex::Regex;
use std::sync::LazyLock;

static META_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:[-*•]\s+)?\**\s*(?:test\s+data|priority)\s*\**\s*:").expect("meta line regex")
});

pub fn sanitize(raw: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut previous_blank = false;

    for line in raw.lines() {
        if META_LINE.is_match(line) {
            continue;
        }
        let blank = line.trim().is_empty();
        if blank && previous_blank {
            continue;
        }
        previous_blank = blank;
        out.push(line.trim_end());
    }

    out.join("\n").trim().to_string()
}
