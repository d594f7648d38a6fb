//! ID resolver module
//!
//! Job IDs look like `<millis>-<hex8>`. Users may pass the full ID, a prefix
//! of it, or a prefix of the hex suffix alone; this module resolves those to
//! the full ID by querying the job list.

use anyhow::{Context, Result, anyhow};
use casegen_client::OrchestratorClient;

const SUFFIX_LEN: usize = 8;

/// Returns true when `input` has the complete `<millis>-<hex8>` shape
pub fn is_full_job_id(input: &str) -> bool {
    match input.split_once('-') {
        Some((millis, suffix)) => {
            !millis.is_empty()
                && millis.chars().all(|c| c.is_ascii_digit())
                && suffix.len() == SUFFIX_LEN
                && suffix.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Resolve a job ID, ID prefix or suffix prefix to a full job ID
///
/// Full IDs are returned without contacting the orchestrator.
///
/// # Errors
/// Returns an error if:
/// - No job matches
/// - Multiple jobs match (ambiguous)
/// - API call fails
pub async fn resolve_job_id(client: &OrchestratorClient, input: &str) -> Result<String> {
    if is_full_job_id(input) {
        return Ok(input.to_string());
    }

    let jobs = client
        .list_jobs()
        .await
        .context("Failed to fetch jobs for ID resolution")?;

    match_job_id(jobs.iter().map(|j| j.job_id.as_str()), input)
}

/// Picks the single ID among `ids` that `input` identifies
fn match_job_id<'a>(ids: impl IntoIterator<Item = &'a str>, input: &str) -> Result<String> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return Err(anyhow!("Job ID must not be empty"));
    }

    let matches: Vec<&str> = ids
        .into_iter()
        .filter(|id| {
            let id = id.to_lowercase();
            let suffix = id.rsplit_once('-').map(|(_, s)| s).unwrap_or("");
            id.starts_with(&needle) || suffix.starts_with(&needle)
        })
        .collect();

    if let Some(exact) = matches.iter().find(|id| id.eq_ignore_ascii_case(&needle)) {
        return Ok(exact.to_string());
    }

    match matches.len() {
        0 => Err(anyhow!("No job found matching '{}'", input)),
        1 => Ok(matches[0].to_string()),
        _ => Err(anyhow!(
            "Ambiguous ID '{}' matches multiple jobs: {}",
            input,
            matches.join(", ")
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDS: [&str; 3] = [
        "1700000000000-a1b2c3d4",
        "1700000000500-a1ffffff",
        "1700000009999-0badc0de",
    ];

    #[test]
    fn test_full_id_shape() {
        assert!(is_full_job_id("1700000000000-a1b2c3d4"));
        assert!(!is_full_job_id("1700000000000-a1b2"));
        assert!(!is_full_job_id("abc-a1b2c3d4"));
        assert!(!is_full_job_id("a1b2c3d4"));
    }

    #[test]
    fn test_match_by_suffix_prefix() {
        assert_eq!(match_job_id(IDS, "0bad").unwrap(), IDS[2]);
        assert_eq!(match_job_id(IDS, "A1B2").unwrap(), IDS[0]);
    }

    #[test]
    fn test_match_by_id_prefix() {
        assert_eq!(match_job_id(IDS, "17000000005").unwrap(), IDS[1]);
    }

    #[test]
    fn test_ambiguous_and_missing() {
        let err = match_job_id(IDS, "a1").unwrap_err().to_string();
        assert!(err.contains("Ambiguous"));
        assert!(err.contains(IDS[0]) && err.contains(IDS[1]));

        let err = match_job_id(IDS, "ffff0000").unwrap_err().to_string();
        assert!(err.contains("No job found"));

        assert!(match_job_id(IDS, "  ").is_err());
    }
}
