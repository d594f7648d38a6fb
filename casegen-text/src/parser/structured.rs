//! Strict template strategy
//!
//! Matches the exact prompt template:
//!
//! ```text
//! 1. Title: <title>
//!  - Steps: <steps, separated by newlines or ';'>
//!  - Expected Result: <result>
//! ```
//!
//! The markdown strategy also recognizes `N. Title:` markers, so in the
//! cascade this one only wins when markdown finds no titled block.

use regex::Regex;
use std::sync::LazyLock;

use super::lines;
use crate::TestCase;

static TITLE_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*\d+\.[ \t]*title[ \t]*:").expect("title start regex")
});

static BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)^\s*\d+\.\s*title\s*:\s*([^\n]+)\n\s*-\s*steps\s*:\s*(.*?)\n\s*-\s*expected\s+results?\s*:\s*(.*)$",
    )
    .expect("structured block regex")
});

pub fn parse(text: &str) -> Vec<TestCase> {
    let starts: Vec<usize> = TITLE_START.find_iter(text).map(|m| m.start()).collect();

    starts
        .iter()
        .enumerate()
        .filter_map(|(idx, &start)| {
            let end = starts.get(idx + 1).copied().unwrap_or(text.len());
            parse_block(&text[start..end])
        })
        .collect()
}

fn parse_block(block: &str) -> Option<TestCase> {
    let caps = BLOCK.captures(block.trim_end())?;

    let title = lines::clean_title(&caps[1]);
    if title.is_empty() {
        return None;
    }

    let steps = split_items(&caps[2], &['\n', ';']);
    let expected_results = split_items(&caps[3], &['\n']);

    Some(TestCase::new(title, steps, expected_results))
}

fn split_items(text: &str, separators: &[char]) -> Vec<String> {
    text.split(separators)
        .filter(|line| !lines::is_noise(line))
        .map(lines::clean_item)
        .filter(|item| !item.is_empty())
        .collect()
}
