//! Format command
//!
//! Offline conversion of a text file of test cases into another notation.

use anyhow::{Context, Result};
use casegen_core::dto::export::{ExportFormat, ExportInput};
use clap::Args;
use colored::*;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::emit_output;

/// Arguments for `casegen format`
#[derive(Args)]
pub struct FormatArgs {
    /// Text file to read (`-` for stdin)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output format (text, markdown, html, jira-markup)
    #[arg(short, long, default_value = "markdown")]
    pub format: ExportFormat,

    /// Save to this file instead of printing
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,
}

/// Handle `casegen format`
pub fn handle_format_command(args: FormatArgs) -> Result<()> {
    let text = read_input(&args.input)?;
    let (input, count) = structure(&text);

    if count == 0 {
        eprintln!(
            "{}",
            "⚠ No test cases recognised, passing the text through".yellow()
        );
    } else {
        eprintln!("{}", format!("Parsed {} test case(s)", count).dimmed());
    }

    let body = casegen_text::format(&input, args.format);
    emit_output(&body, args.output_file.as_deref())
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }

    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))
}

/// Parsed cases, or the raw text when nothing parses
fn structure(text: &str) -> (ExportInput, usize) {
    let cases = casegen_text::parse(text);
    if cases.is_empty() {
        (ExportInput::Raw(text.to_string()), 0)
    } else {
        let count = cases.len();
        (ExportInput::Cases(cases), count)
    }
}
