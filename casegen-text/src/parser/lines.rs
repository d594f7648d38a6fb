//! Line-level helpers shared by the parsing strategies

use regex::{Captures, Regex};
use std::sync::LazyLock;

static STEPS_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:[-*•]\s+)?(?:#+\s*)?\**\s*(?:test\s+)?steps\s*\**\s*:\s*\**\s*(.*)$")
        .expect("steps header regex")
});

static EXPECTED_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:[-*•]\s+)?(?:#+\s*)?\**\s*expected(?:\s+(?:results?|outcomes?|behaviou?r))?\s*\**\s*:\s*\**\s*(.*)$",
    )
    .expect("expected header regex")
});

static DESCRIPTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:[-*•]\s+)?\**\s*description\s*\**\s*:\s*\**\s*(.*)$")
        .expect("description header regex")
});

// Looser variants for the paragraph strategy: "Steps to reproduce:", "Result:", ...
static LOOSE_STEPS_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:[-*•]\s+)?(?:#+\s*)?\**\s*(?:test\s+)?(?:steps?|procedure|actions?)\b[^:]*:\s*\**\s*(.*)$",
    )
    .expect("loose steps header regex")
});

static LOOSE_EXPECTED_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:[-*•]\s+)?(?:#+\s*)?\**\s*(?:expected|results?|outcomes?)\b[^:]*:\s*\**\s*(.*)$",
    )
    .expect("loose expected header regex")
});

static TITLE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:[-*•]\s+)?\**\s*(?:test\s*case\s+)?title\s*\**\s*:\s*\**\s*(.*)$")
        .expect("title label regex")
});

static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*•+]\s+|\d+[.)](?:\s+|$)|\(\d+\)\s*)").expect("list marker regex")
});

static TITLE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:#+\s*)?\**\s*(?:\d+[.)]\s*)?(?:test\s*case(?:\s*\d+)?\s*\**\s*[:.\-]\s*)?(?:(?:test\s*case\s+)?title\s*:\s*)?",
    )
    .expect("title prefix regex")
});

/// Section a body line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Section {
    None,
    Steps,
    Expected,
}

/// Header matching mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeaderStyle {
    /// `Steps:` / `Test Steps:` / `Expected Result(s):`
    Strict,
    /// Any label starting with a steps-like or result-like keyword
    Loose,
}

/// Fields collected from the body of one test case
#[derive(Debug, Default)]
pub(crate) struct Sections {
    pub description: Option<String>,
    pub steps: Vec<String>,
    pub expected: Vec<String>,
}

fn rest(caps: &Captures<'_>) -> String {
    caps.get(1).map(|m| clean_item(m.as_str())).unwrap_or_default()
}

pub(crate) fn steps_header(line: &str, style: HeaderStyle) -> Option<String> {
    let re = match style {
        HeaderStyle::Strict => &*STEPS_HEADER,
        HeaderStyle::Loose => &*LOOSE_STEPS_HEADER,
    };
    re.captures(line).map(|caps| rest(&caps))
}

pub(crate) fn expected_header(line: &str, style: HeaderStyle) -> Option<String> {
    let re = match style {
        HeaderStyle::Strict => &*EXPECTED_HEADER,
        HeaderStyle::Loose => &*LOOSE_EXPECTED_HEADER,
    };
    re.captures(line).map(|caps| rest(&caps))
}

pub(crate) fn description_header(line: &str) -> Option<String> {
    DESCRIPTION_HEADER.captures(line).map(|caps| rest(&caps))
}

/// Value of a `Title:` / `Test case Title:` label line
pub(crate) fn title_label(line: &str) -> Option<String> {
    TITLE_LABEL.captures(line).map(|caps| clean_title(&rest(&caps)))
}

/// Whether `line` opens any section or is a label line
pub(crate) fn is_header(line: &str, style: HeaderStyle) -> bool {
    steps_header(line, style).is_some()
        || expected_header(line, style).is_some()
        || description_header(line).is_some()
}

/// Lines that carry no content: blank, rules, lone bullets
///
/// Backslash-escaped punctuation counts as content.
pub(crate) fn is_noise(line: &str) -> bool {
    let line = line.trim();
    !line.contains('\\')
        && line
            .chars()
            .all(|c| c.is_whitespace() || c.is_ascii_punctuation() || c == '•')
}

pub(crate) fn is_heading(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// Removes `**` that wraps the whole text or dangles at one end
fn strip_emphasis(text: &str) -> &str {
    let text = text.trim();
    match text.matches("**").count() {
        2 if text.len() >= 4 && text.starts_with("**") && text.ends_with("**") => {
            text[2..text.len() - 2].trim()
        }
        1 => text
            .strip_prefix("**")
            .or_else(|| text.strip_suffix("**"))
            .unwrap_or(text)
            .trim(),
        _ => text,
    }
}

/// Resolves markdown backslash escapes of ASCII punctuation
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.next_if(|next| c == '\\' && next.is_ascii_punctuation()) {
            Some(escaped) => out.push(escaped),
            None => out.push(c),
        }
    }
    out
}

/// Strips a leading bullet or number marker and surrounding emphasis, then
/// resolves backslash escapes
pub(crate) fn clean_item(line: &str) -> String {
    let stripped = LIST_MARKER.replace(line, "");
    unescape(strip_emphasis(&stripped))
}

/// Strips heading, emphasis, numbering, `Test Case N:` and `Title:` prefixes
pub(crate) fn clean_title(line: &str) -> String {
    let stripped = TITLE_PREFIX.replace(line.trim(), "");
    strip_emphasis(&stripped).to_string()
}

/// Walks body lines and sorts them into description, steps and expected
/// results. Inline text after a header counts as the first item.
pub(crate) fn scan_sections<'a, I>(lines: I, style: HeaderStyle) -> Sections
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sections = Sections::default();
    let mut current = Section::None;

    for line in lines {
        if let Some(inline) = steps_header(line, style) {
            current = Section::Steps;
            if !inline.is_empty() {
                sections.steps.push(inline);
            }
            continue;
        }
        if let Some(inline) = expected_header(line, style) {
            current = Section::Expected;
            if !inline.is_empty() {
                sections.expected.push(inline);
            }
            continue;
        }
        if let Some(description) = description_header(line) {
            if !description.is_empty() {
                sections.description = Some(description);
            }
            current = Section::None;
            continue;
        }
        if is_noise(line) || is_heading(line) {
            continue;
        }

        let item = clean_item(line);
        if item.is_empty() {
            continue;
        }
        match current {
            Section::Steps => sections.steps.push(item),
            Section::Expected => sections.expected.push(item),
            Section::None => {}
        }
    }

    sections
}
