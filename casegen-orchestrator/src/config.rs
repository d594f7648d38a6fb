//! Orchestrator configuration
//!
//! Bind address, store selection, generation backend connection and the
//! job timing budget.

use anyhow::Context;
use std::str::FromStr;
use std::time::Duration;

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP API listens on
    pub bind_addr: String,

    /// PostgreSQL connection string; jobs are kept in memory when unset
    pub database_url: Option<String>,

    /// Generation backend base URL (e.g., "http://localhost:5002")
    pub generation_url: String,

    /// Bearer token sent to the generation backend
    pub generation_api_key: Option<String>,

    /// Deadline for a job, measured from creation
    pub job_timeout: Duration,

    /// Budget for one generation call; must be shorter than `job_timeout`
    pub generation_timeout: Duration,

    /// Number of most recent jobs kept by retention cleanup
    pub retention_limit: usize,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(generation_url: String) -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            database_url: None,
            generation_url,
            generation_api_key: None,
            job_timeout: Duration::from_secs(60),
            generation_timeout: Duration::from_secs(45),
            retention_limit: 10,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - CASEGEN_BIND_ADDR (default: 0.0.0.0:8080)
    /// - DATABASE_URL (default: in-memory store)
    /// - CASEGEN_GENERATION_URL (default: http://localhost:5002)
    /// - CASEGEN_GENERATION_API_KEY
    /// - CASEGEN_JOB_TIMEOUT (seconds, default: 60)
    /// - CASEGEN_GENERATION_TIMEOUT (seconds, default: 45)
    /// - CASEGEN_RETENTION_LIMIT (default: 10)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let job_timeout = parse_var::<u64>(&var, "CASEGEN_JOB_TIMEOUT")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.job_timeout);

        let generation_timeout = parse_var::<u64>(&var, "CASEGEN_GENERATION_TIMEOUT")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.generation_timeout);

        let retention_limit =
            parse_var::<usize>(&var, "CASEGEN_RETENTION_LIMIT")?.unwrap_or(defaults.retention_limit);

        Ok(Self {
            bind_addr: var("CASEGEN_BIND_ADDR").unwrap_or(defaults.bind_addr),
            database_url: var("DATABASE_URL"),
            generation_url: var("CASEGEN_GENERATION_URL").unwrap_or(defaults.generation_url),
            generation_api_key: var("CASEGEN_GENERATION_API_KEY"),
            job_timeout,
            generation_timeout,
            retention_limit,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_addr.is_empty() {
            anyhow::bail!("bind_addr cannot be empty");
        }

        if !self.generation_url.starts_with("http://")
            && !self.generation_url.starts_with("https://")
        {
            anyhow::bail!("generation_url must start with http:// or https://");
        }

        if self.job_timeout.is_zero() {
            anyhow::bail!("job_timeout must be greater than 0");
        }

        if self.generation_timeout.is_zero() {
            anyhow::bail!("generation_timeout must be greater than 0");
        }

        if self.generation_timeout >= self.job_timeout {
            anyhow::bail!(
                "generation_timeout ({:?}) must be shorter than job_timeout ({:?})",
                self.generation_timeout,
                self.job_timeout
            );
        }

        if self.retention_limit == 0 {
            anyhow::bail!("retention_limit must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:5002".to_string())
    }
}

fn parse_var<T>(var: &impl Fn(&str) -> Option<String>, name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("Invalid value for {}: '{}'", name, raw))
        })
        .transpose()
}
