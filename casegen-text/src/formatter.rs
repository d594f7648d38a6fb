//! Test case rendering
//!
//! Renders structured test cases (or already generated raw text) into one
//! of the supported export formats. Rendering never fails: empty input
//! produces a short notice instead of an empty document.

use std::fmt::Write;

use crate::parser::reads_back_as_item;
use crate::{ExportFormat, ExportInput, TestCase};

pub const EMPTY_NOTICE: &str = "No test cases found.";

const UNTITLED: &str = "Untitled test case";

/// Renders export input in the requested format
///
/// Raw text is passed through unchanged for text, markdown and jira-markup,
/// and wrapped in an escaped `<pre>` block for html.
pub fn format(input: &ExportInput, mode: ExportFormat) -> String {
    match input {
        ExportInput::Cases(cases) => format_cases(cases, mode),
        ExportInput::Raw(text) => match mode {
            ExportFormat::Html => format!("<pre class=\"test-cases\">{}</pre>", escape_html(text)),
            _ => text.clone(),
        },
    }
}

/// Renders structured test cases in the requested format
pub fn format_cases(cases: &[TestCase], mode: ExportFormat) -> String {
    if cases.is_empty() {
        return match mode {
            ExportFormat::Html => format!("<p>{}</p>", EMPTY_NOTICE),
            ExportFormat::Markdown => format!("_{}_", EMPTY_NOTICE),
            _ => EMPTY_NOTICE.to_string(),
        };
    }

    let render: fn(usize, &TestCase) -> String = match mode {
        ExportFormat::Text => text_case,
        ExportFormat::Markdown => markdown_case,
        ExportFormat::Html => html_case,
        ExportFormat::JiraMarkup => jira_case,
    };

    let blocks: Vec<String> = cases
        .iter()
        .enumerate()
        .map(|(idx, case)| render(idx + 1, case))
        .collect();

    let separator = match mode {
        ExportFormat::Html => "\n",
        _ => "\n\n",
    };
    blocks.join(separator)
}

/// Escapes `& < > " '` for html output
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Joins multi-line values into a single line
fn flatten(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Backslash-escapes every ASCII punctuation character
fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for c in text.chars() {
        if c.is_ascii_punctuation() {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// One markdown list line; items the parser would misread as a marker,
/// header or rule are escaped
fn markdown_item(marker: &str, text: &str) -> String {
    let item = flatten(text);
    let line = format!("{}{}", marker, item);
    if reads_back_as_item(&line, &item) {
        line
    } else {
        format!("{}{}", marker, escape_markdown(&item))
    }
}

fn title_of(case: &TestCase) -> String {
    let title = flatten(&case.title);
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title
    }
}

fn description_of(case: &TestCase) -> Option<String> {
    case.description
        .as_deref()
        .map(flatten)
        .filter(|d| !d.is_empty())
}

// `write!` into a String cannot fail, hence the ignored results below.

fn text_case(number: usize, case: &TestCase) -> String {
    let mut out = format!("Test Case {}: {}\n", number, title_of(case));
    if let Some(description) = description_of(case) {
        let _ = writeln!(out, "Description: {}", description);
    }
    out.push_str("Steps:\n");
    for (idx, step) in case.steps.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", idx + 1, flatten(step));
    }
    out.push_str("Expected Results:");
    for result in &case.expected_results {
        let _ = write!(out, "\n  - {}", flatten(result));
    }
    out
}

fn markdown_case(number: usize, case: &TestCase) -> String {
    let mut out = format!("## Test Case {}: {}\n", number, title_of(case));
    if let Some(description) = description_of(case) {
        let _ = writeln!(out, "\n**Description:** {}", description);
    }
    out.push_str("\n**Steps:**\n");
    for (idx, step) in case.steps.iter().enumerate() {
        let _ = writeln!(out, "{}", markdown_item(&format!("{}. ", idx + 1), step));
    }
    out.push_str("\n**Expected Results:**");
    for result in &case.expected_results {
        let _ = write!(out, "\n{}", markdown_item("- ", result));
    }
    out
}

fn html_case(number: usize, case: &TestCase) -> String {
    let mut out = String::from("<div class=\"test-case\">\n");
    let _ = writeln!(
        out,
        "  <h3>Test Case {}: {}</h3>",
        number,
        escape_html(&title_of(case))
    );
    if let Some(description) = description_of(case) {
        let _ = writeln!(out, "  <p class=\"description\">{}</p>", escape_html(&description));
    }
    out.push_str("  <h4>Steps</h4>\n  <ol>\n");
    for step in &case.steps {
        let _ = writeln!(out, "    <li>{}</li>", escape_html(&flatten(step)));
    }
    out.push_str("  </ol>\n  <h4>Expected Results</h4>\n  <ul>\n");
    for result in &case.expected_results {
        let _ = writeln!(out, "    <li>{}</li>", escape_html(&flatten(result)));
    }
    out.push_str("  </ul>\n</div>");
    out
}

fn jira_case(number: usize, case: &TestCase) -> String {
    let mut out = format!("h3. Test Case {}: {}\n", number, title_of(case));
    if let Some(description) = description_of(case) {
        let _ = writeln!(out, "{}", description);
    }
    out.push_str("*Steps:*\n");
    for step in &case.steps {
        let _ = writeln!(out, "# {}", flatten(step));
    }
    out.push_str("*Expected Results:*");
    for result in &case.expected_results {
        let _ = write!(out, "\n* {}", flatten(result));
    }
    out
}
