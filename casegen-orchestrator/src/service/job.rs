//! Job Service
//!
//! Business logic for the generation job lifecycle:
//!
//! - `create_job` stores a pending job and spawns generation in the background
//! - the background task claims the job, calls the generator under a timeout
//!   and completes the job with parsed output, or with fallback output when
//!   generation fails
//! - `get_status` completes overdue jobs with fallback output on read, so no
//!   timer task is needed
//!
//! Every terminal write goes through [`JobService::complete`], a
//! compare-and-swap loop that leaves terminal jobs untouched. A late fallback
//! can therefore never replace a real result, and vice versa.

use std::sync::Arc;
use std::time::Duration;

use casegen_core::domain::job::{GenerationResult, Job, JobStatus};
use casegen_core::dto::export::{ExportFormat, ExportInput};
use casegen_core::dto::generation::GeneratedContent;
use casegen_core::dto::job::{CreateJob, JobView};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::repository::job_repository;
use crate::service::export_service;
use crate::service::generation::GenerationService;
use crate::store::{KvStore, StoreError};

/// Attempts a terminal transition makes before giving up on write conflicts
pub const CAS_ATTEMPTS: usize = 5;

/// Service error type
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Job {0} not found")]
    NotFound(String),

    #[error("{0}")]
    InvalidState(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Timing and retention knobs of the job service
#[derive(Debug, Clone, Copy)]
pub struct JobSettings {
    pub job_timeout: Duration,
    pub generation_timeout: Duration,
    pub retention_limit: usize,
}

impl From<&Config> for JobSettings {
    fn from(config: &Config) -> Self {
        Self {
            job_timeout: config.job_timeout,
            generation_timeout: config.generation_timeout,
            retention_limit: config.retention_limit,
        }
    }
}

impl Default for JobSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// How a job should end
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Generation succeeded
    Generated(GenerationResult),
    /// Generation failed or ran out of time; use the offline generator
    Fallback,
    /// The job could not be processed
    Failed(String),
}

/// Job orchestrator
///
/// Cheap to clone; clones share the store and the generator.
#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn KvStore>,
    generator: Arc<dyn GenerationService>,
    settings: JobSettings,
}

impl JobService {
    pub fn new(
        store: Arc<dyn KvStore>,
        generator: Arc<dyn GenerationService>,
        settings: JobSettings,
    ) -> Self {
        Self {
            store,
            generator,
            settings,
        }
    }

    /// Checks the job store is reachable
    pub async fn check_store(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    /// Create a job and start generating in the background
    ///
    /// Returns once the pending job is stored; generation time never adds to
    /// the latency of this call.
    pub async fn create_job(&self, mut payload: CreateJob) -> Result<String, JobError> {
        validate_payload(&payload)?;

        let has_summary = payload
            .summary
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty());
        if !has_summary {
            payload.summary = Some(payload.summary_or_derived());
        }

        let now = Utc::now();
        let id = new_job_id(now);
        let job = Job::new(id.clone(), payload, now, budget(self.settings.job_timeout));

        job_repository::insert(self.store.as_ref(), &job).await?;
        info!("Job created: {} (deadline {})", id, job.timeout_at);

        let service = self.clone();
        let task_id = id.clone();
        tokio::spawn(async move { service.run_job(&task_id).await });

        Ok(id)
    }

    /// Get the current view of a job
    ///
    /// A job still running past its deadline is completed with fallback
    /// output before the view is returned.
    pub async fn get_status(&self, job_id: &str) -> Result<JobView, JobError> {
        let job = job_repository::find_by_id(self.store.as_ref(), job_id)
            .await?
            .ok_or_else(|| JobError::NotFound(job_id.to_string()))?;

        if job.is_overdue(Utc::now()) {
            info!(
                "Job {} passed its deadline while {}, completing with fallback",
                job_id, job.status
            );
            let job = self.complete(job_id, Outcome::Fallback).await?;
            return Ok(JobView::from(&job));
        }

        debug!("Job {} is {}", job_id, job.status);
        Ok(JobView::from(&job))
    }

    /// List all jobs, newest first
    pub async fn list_jobs(&self) -> Result<Vec<JobView>, JobError> {
        let jobs = job_repository::list_all(self.store.as_ref()).await?;
        Ok(jobs.iter().map(JobView::from).collect())
    }

    /// Render a finished job in `format`
    ///
    /// Completed jobs export their test cases, or the raw generated text when
    /// nothing could be parsed. Failed jobs export their error message as raw
    /// text, so html output escapes it like any other bare string.
    pub async fn export_job(&self, job_id: &str, format: ExportFormat) -> Result<String, JobError> {
        let view = self.get_status(job_id).await?;

        match view.status {
            JobStatus::Completed => {
                let input = match view.result {
                    Some(result) if !result.test_cases.is_empty() => {
                        ExportInput::Cases(result.test_cases)
                    }
                    Some(result) => ExportInput::Raw(result.raw_text),
                    None => ExportInput::Cases(Vec::new()),
                };
                Ok(export_service::export_formatted(&input, format))
            }
            JobStatus::Failed => {
                let message = view.error.unwrap_or_else(|| "Job failed".to_string());
                Ok(export_service::export_formatted(&ExportInput::Raw(message), format))
            }
            status => Err(JobError::InvalidState(format!(
                "Job {} is {}, nothing to export yet",
                job_id, status
            ))),
        }
    }

    /// Move a job to its terminal state
    ///
    /// No-op returning the stored job when it is already terminal. Otherwise
    /// writes the terminal record with compare-and-swap, re-reading and
    /// retrying on conflict up to [`CAS_ATTEMPTS`] times.
    pub async fn complete(&self, job_id: &str, outcome: Outcome) -> Result<Job, JobError> {
        let store = self.store.as_ref();

        for attempt in 1..=CAS_ATTEMPTS {
            let (current, version) = job_repository::find_versioned(store, job_id)
                .await?
                .ok_or_else(|| JobError::NotFound(job_id.to_string()))?;

            if current.status.is_terminal() {
                debug!("Job {} already {}, keeping stored result", job_id, current.status);
                return Ok(current);
            }

            let now = Utc::now();
            let next = match &outcome {
                Outcome::Generated(result) => current.completed(result.clone(), false, now),
                Outcome::Fallback => current.completed(fallback_result(&current.payload), true, now),
                Outcome::Failed(message) => current.failed(message.clone(), now),
            };

            if job_repository::replace(store, &version, &next).await? {
                if next.timed_out {
                    info!("Job {} completed with fallback output", job_id);
                } else {
                    info!("Job {} {}", job_id, next.status);
                }
                return Ok(next);
            }

            debug!(
                "Job {} changed during transition (attempt {}/{})",
                job_id, attempt, CAS_ATTEMPTS
            );
        }

        Err(JobError::Store(StoreError::Conflict(format!(
            "job {} kept changing after {} attempts",
            job_id, CAS_ATTEMPTS
        ))))
    }

    /// Delete terminal jobs beyond the newest `retention_limit`
    ///
    /// Pending and processing jobs are never deleted.
    pub async fn cleanup(&self) -> Result<usize, JobError> {
        let store = self.store.as_ref();
        let jobs = job_repository::list_all(store).await?;

        let mut removed = 0;
        for job in jobs
            .iter()
            .skip(self.settings.retention_limit)
            .filter(|job| job.status.is_terminal())
        {
            if job_repository::delete(store, &job.id).await? {
                removed += 1;
            }
        }

        if removed > 0 {
            info!("Retention cleanup removed {} jobs", removed);
        }
        Ok(removed)
    }

    // =============================================================================
    // Background generation
    // =============================================================================

    async fn run_job(&self, job_id: &str) {
        let job = match self.claim(job_id).await {
            Ok(Some(job)) => job,
            Ok(None) => {
                debug!("Job {} finished before generation started", job_id);
                return;
            }
            Err(e) => {
                error!("Failed to start job {}: {}", job_id, e);
                self.mark_failed(job_id, &e).await;
                return;
            }
        };

        let generation = self.generator.generate(&job.payload);
        let outcome = match tokio::time::timeout(self.settings.generation_timeout, generation).await {
            Ok(Ok(content)) => Outcome::Generated(result_from_content(content)),
            Ok(Err(e)) => {
                warn!("Generation failed for job {}, using fallback: {}", job_id, e);
                Outcome::Fallback
            }
            Err(_) => {
                warn!(
                    "Generation for job {} exceeded {:?}, using fallback",
                    job_id, self.settings.generation_timeout
                );
                Outcome::Fallback
            }
        };

        if let Err(e) = self.complete(job_id, outcome).await {
            error!("Failed to store result of job {}: {}", job_id, e);
            self.mark_failed(job_id, &e).await;
        }

        if let Err(e) = self.cleanup().await {
            warn!("Retention cleanup failed: {}", e);
        }
    }

    /// Move a pending job to processing
    ///
    /// Returns `None` when the job is no longer pending, e.g. because a poll
    /// already completed it past its deadline.
    async fn claim(&self, job_id: &str) -> Result<Option<Job>, JobError> {
        let store = self.store.as_ref();
        let (job, version) = job_repository::find_versioned(store, job_id)
            .await?
            .ok_or_else(|| JobError::NotFound(job_id.to_string()))?;

        if job.status != JobStatus::Pending {
            return Ok(None);
        }

        let processing = job.processing();
        if job_repository::replace(store, &version, &processing).await? {
            info!("Job {} processing", job_id);
            Ok(Some(processing))
        } else {
            Ok(None)
        }
    }

    async fn mark_failed(&self, job_id: &str, cause: &JobError) {
        if let Err(e) = self.complete(job_id, Outcome::Failed(cause.to_string())).await {
            error!("Could not mark job {} as failed: {}", job_id, e);
        }
    }
}

/// Builds the fallback result for a payload
///
/// Falls back once more to the canned degraded output if the offline
/// generator's text does not parse.
pub fn fallback_result(payload: &CreateJob) -> GenerationResult {
    let raw_text = casegen_text::generate_fallback(payload);
    let test_cases = casegen_text::parse(&raw_text);
    if !test_cases.is_empty() {
        return GenerationResult {
            test_cases,
            raw_text,
        };
    }

    let raw_text = casegen_client::generation::degraded_output(
        "the offline generator produced no test cases",
    );
    let test_cases = casegen_text::parse(&raw_text);
    GenerationResult {
        test_cases,
        raw_text,
    }
}

fn result_from_content(content: GeneratedContent) -> GenerationResult {
    match content {
        GeneratedContent::Text(text) => {
            let raw_text = casegen_text::sanitize(&text);
            let test_cases = casegen_text::parse(&raw_text);
            GenerationResult {
                test_cases,
                raw_text,
            }
        }
        GeneratedContent::Cases(test_cases) => {
            let raw_text = casegen_text::format_cases(&test_cases, ExportFormat::Markdown);
            GenerationResult {
                test_cases,
                raw_text,
            }
        }
    }
}

/// `<creation millis>-<8 hex chars>`
fn new_job_id(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", now.timestamp_millis(), &suffix[..8])
}

fn budget(timeout: Duration) -> chrono::Duration {
    chrono::Duration::from_std(timeout).unwrap_or(chrono::Duration::MAX)
}

// =============================================================================
// Validation
// =============================================================================

fn validate_payload(payload: &CreateJob) -> Result<(), JobError> {
    if payload.description.trim().is_empty() {
        return Err(JobError::Validation("description is required".to_string()));
    }

    if payload.acceptance_criteria.trim().is_empty() {
        return Err(JobError::Validation(
            "acceptance_criteria is required".to_string(),
        ));
    }

    if let Some(project) = &payload.options.project_name {
        let valid = !project.is_empty()
            && project
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(JobError::Validation(format!(
                "Invalid project name '{}': only letters, digits, '_' and '-' are allowed",
                project
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use casegen_client::GenerationError;
    use casegen_core::domain::test_case::TestCase;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // =========================================================================
    // Test doubles
    // =========================================================================

    enum Stub {
        Text(&'static str),
        Cases(Vec<TestCase>),
        Fail,
        Hang,
    }

    struct StubGenerator {
        mode: Stub,
    }

    #[async_trait]
    impl GenerationService for StubGenerator {
        async fn generate(&self, _payload: &CreateJob) -> Result<GeneratedContent, GenerationError> {
            match &self.mode {
                Stub::Text(text) => Ok(GeneratedContent::Text(text.to_string())),
                Stub::Cases(cases) => Ok(GeneratedContent::Cases(cases.clone())),
                Stub::Fail => Err(GenerationError::Upstream {
                    status: 503,
                    body: "model offline".to_string(),
                }),
                Stub::Hang => std::future::pending().await,
            }
        }
    }

    /// Memory store with injectable write, listing and delete failures
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        cas_errors: AtomicUsize,
        cas_conflicts: AtomicUsize,
        list_errors: AtomicUsize,
        delete_errors: AtomicUsize,
    }

    fn take(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    #[async_trait]
    impl KvStore for FlakyStore {
        async fn put(&self, key: &str, value: Value) -> Result<(), StoreError> {
            self.inner.put(key, value).await
        }

        async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
            self.inner.get(key).await
        }

        async fn delete(&self, key: &str) -> Result<bool, StoreError> {
            if take(&self.delete_errors) {
                return Err(StoreError::Unavailable("injected delete failure".to_string()));
            }
            self.inner.delete(key).await
        }

        async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<(String, Value)>, StoreError> {
            if take(&self.list_errors) {
                return Err(StoreError::Unavailable("injected list failure".to_string()));
            }
            self.inner.list_by_prefix(prefix).await
        }

        async fn compare_and_swap(
            &self,
            key: &str,
            expected: &Value,
            value: Value,
        ) -> Result<bool, StoreError> {
            if take(&self.cas_errors) {
                return Err(StoreError::Unavailable("injected write failure".to_string()));
            }
            if take(&self.cas_conflicts) {
                return Ok(false);
            }
            self.inner.compare_and_swap(key, expected, value).await
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn settings(job_ms: u64, generation_ms: u64) -> JobSettings {
        JobSettings {
            job_timeout: Duration::from_millis(job_ms),
            generation_timeout: Duration::from_millis(generation_ms),
            retention_limit: 10,
        }
    }

    fn service(store: Arc<dyn KvStore>, mode: Stub, settings: JobSettings) -> JobService {
        JobService::new(store, Arc::new(StubGenerator { mode }), settings)
    }

    fn memory_service(mode: Stub) -> JobService {
        service(Arc::new(MemoryStore::new()), mode, settings(60_000, 5_000))
    }

    fn login_payload() -> CreateJob {
        CreateJob::new(
            "User login with email and password",
            "- User can log in with valid credentials\n- Invalid password shows an error",
        )
    }

    async fn wait_terminal(service: &JobService, id: &str) -> JobView {
        for _ in 0..300 {
            let view = service.get_status(id).await.unwrap();
            if view.status.is_terminal() {
                return view;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("job {} never finished", id);
    }

    async fn insert_job(service: &JobService, id: &str, age_secs: i64) -> Job {
        let start = Utc::now() - chrono::Duration::seconds(age_secs);
        let job = Job::new(
            id.to_string(),
            login_payload(),
            start,
            chrono::Duration::seconds(600),
        );
        job_repository::insert(service.store.as_ref(), &job).await.unwrap();
        job
    }

    // =========================================================================
    // Creation
    // =========================================================================

    #[tokio::test]
    async fn test_create_returns_immediately_and_polls_pending() {
        let service = memory_service(Stub::Hang);

        let id = service.create_job(login_payload()).await.unwrap();
        let view = service.get_status(&id).await.unwrap();

        assert!(matches!(view.status, JobStatus::Pending | JobStatus::Processing));
        assert!(view.result.is_none());
        assert!(view.timed_out.is_none());
    }

    #[tokio::test]
    async fn test_job_id_format() {
        let service = memory_service(Stub::Hang);
        let id = service.create_job(login_payload()).await.unwrap();

        let (millis, suffix) = id.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_summary_derived_on_create() {
        let service = memory_service(Stub::Hang);
        let id = service.create_job(login_payload()).await.unwrap();

        let job = job_repository::find_by_id(service.store.as_ref(), &id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            job.payload.summary.as_deref(),
            Some("User login with email and password")
        );
    }

    #[tokio::test]
    async fn test_validation() {
        let service = memory_service(Stub::Hang);

        let err = service.create_job(CreateJob::new("  ", "- ok")).await.unwrap_err();
        assert!(matches!(err, JobError::Validation(_)));

        let err = service.create_job(CreateJob::new("Login", "")).await.unwrap_err();
        assert!(matches!(err, JobError::Validation(_)));

        let mut payload = login_payload();
        payload.options.project_name = Some("web app!".to_string());
        let err = service.create_job(payload).await.unwrap_err();
        assert!(err.to_string().contains("web app!"));

        let mut payload = login_payload();
        payload.options.project_name = Some("web_app-2".to_string());
        assert!(service.create_job(payload).await.is_ok());
    }

    // =========================================================================
    // Background generation
    // =========================================================================

    #[tokio::test]
    async fn test_generated_text_is_sanitized_and_parsed() {
        let service = memory_service(Stub::Text(
            "Sure! Here you go.\n\n**Test Case 1: Login**\nPriority: High\nSteps:\n1. Open\nExpected Result:\n- Done",
        ));

        let id = service.create_job(login_payload()).await.unwrap();
        let view = wait_terminal(&service, &id).await;

        assert_eq!(view.status, JobStatus::Completed);
        assert_eq!(view.timed_out, Some(false));
        assert!(view.completion_time.is_some());

        let result = view.result.unwrap();
        assert_eq!(result.test_cases.len(), 1);
        assert_eq!(result.test_cases[0].steps, vec!["Open"]);
        assert!(!result.raw_text.contains("Priority"));
    }

    #[tokio::test]
    async fn test_generated_cases_kept() {
        let cases = vec![TestCase::new(
            "Checkout",
            vec!["Pay".to_string()],
            vec!["Receipt".to_string()],
        )];
        let service = memory_service(Stub::Cases(cases.clone()));

        let id = service.create_job(login_payload()).await.unwrap();
        let result = wait_terminal(&service, &id).await.result.unwrap();

        assert_eq!(result.test_cases, cases);
        assert!(result.raw_text.starts_with("## Test Case 1: Checkout"));
    }

    #[tokio::test]
    async fn test_generation_error_uses_fallback() {
        let service = memory_service(Stub::Fail);

        let id = service.create_job(login_payload()).await.unwrap();
        let view = wait_terminal(&service, &id).await;

        assert_eq!(view.status, JobStatus::Completed);
        assert_eq!(view.timed_out, Some(true));
        assert_eq!(view.result.unwrap().test_cases.len(), 3);
    }

    #[tokio::test]
    async fn test_generation_timeout_uses_fallback() {
        let service = service(Arc::new(MemoryStore::new()), Stub::Hang, settings(60_000, 50));

        let id = service.create_job(login_payload()).await.unwrap();
        let view = wait_terminal(&service, &id).await;

        assert_eq!(view.status, JobStatus::Completed);
        assert_eq!(view.timed_out, Some(true));
    }

    #[tokio::test]
    async fn test_store_failure_marks_job_failed() {
        let store = Arc::new(FlakyStore::default());
        store.cas_errors.store(1, Ordering::SeqCst);
        let service = service(store, Stub::Fail, settings(60_000, 5_000));

        let id = service.create_job(login_payload()).await.unwrap();
        let view = wait_terminal(&service, &id).await;

        assert_eq!(view.status, JobStatus::Failed);
        assert!(view.error.unwrap().contains("injected write failure"));
        assert!(view.result.is_none());
    }

    async fn drained(counter: &AtomicUsize) {
        for _ in 0..300 {
            if counter.load(Ordering::SeqCst) == 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("injected failure never triggered");
    }

    #[tokio::test]
    async fn test_cleanup_listing_failure_does_not_affect_job() {
        let store = Arc::new(FlakyStore::default());
        store.list_errors.store(1, Ordering::SeqCst);
        let service = service(store.clone(), Stub::Fail, settings(60_000, 5_000));

        let id = service.create_job(login_payload()).await.unwrap();
        let view = wait_terminal(&service, &id).await;
        drained(&store.list_errors).await;

        assert_eq!(view.status, JobStatus::Completed);
        let view = service.get_status(&id).await.unwrap();
        assert_eq!(view.status, JobStatus::Completed);
        assert_eq!(view.timed_out, Some(true));
    }

    #[tokio::test]
    async fn test_cleanup_delete_failure_does_not_affect_job() {
        let store = Arc::new(FlakyStore::default());
        let mut tight = settings(60_000, 5_000);
        tight.retention_limit = 1;
        let service = service(store.clone(), Stub::Fail, tight);

        insert_job(&service, "old", 60).await;
        service.complete("old", Outcome::Fallback).await.unwrap();
        store.delete_errors.store(1, Ordering::SeqCst);

        let id = service.create_job(login_payload()).await.unwrap();
        wait_terminal(&service, &id).await;
        drained(&store.delete_errors).await;

        let view = service.get_status(&id).await.unwrap();
        assert_eq!(view.status, JobStatus::Completed);
        assert!(view.result.is_some());
        assert_eq!(service.get_status("old").await.unwrap().status, JobStatus::Completed);
    }

    // =========================================================================
    // Polling and transitions
    // =========================================================================

    #[tokio::test]
    async fn test_overdue_job_completed_on_poll() {
        let service = service(Arc::new(MemoryStore::new()), Stub::Hang, settings(50, 10_000));

        let id = service.create_job(login_payload()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;

        let view = service.get_status(&id).await.unwrap();
        assert_eq!(view.status, JobStatus::Completed);
        assert_eq!(view.timed_out, Some(true));
        assert!(!view.result.as_ref().unwrap().test_cases.is_empty());

        // Idempotent once terminal
        let again = service.get_status(&id).await.unwrap();
        assert_eq!(again, view);
    }

    #[tokio::test]
    async fn test_terminal_job_never_overwritten() {
        let service = memory_service(Stub::Hang);
        insert_job(&service, "job-1", 0).await;

        let real = GenerationResult {
            test_cases: vec![TestCase::new("Real", vec![], vec![])],
            raw_text: "real".to_string(),
        };
        let first = service
            .complete("job-1", Outcome::Generated(real.clone()))
            .await
            .unwrap();
        let second = service.complete("job-1", Outcome::Fallback).await.unwrap();

        assert_eq!(first, second);
        assert!(!second.timed_out);
        assert_eq!(second.result, Some(real));
    }

    #[tokio::test]
    async fn test_complete_retries_conflicts() {
        let store = Arc::new(FlakyStore::default());
        let service = service(store.clone(), Stub::Hang, settings(60_000, 5_000));
        insert_job(&service, "job-1", 0).await;

        store.cas_conflicts.store(2, Ordering::SeqCst);
        let job = service.complete("job-1", Outcome::Fallback).await.unwrap();
        assert!(job.timed_out);

        insert_job(&service, "job-2", 0).await;
        store.cas_conflicts.store(CAS_ATTEMPTS, Ordering::SeqCst);
        let err = service.complete("job-2", Outcome::Fallback).await.unwrap_err();
        assert!(matches!(err, JobError::Store(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let service = memory_service(Stub::Hang);
        let err = service.get_status("missing").await.unwrap_err();
        assert!(matches!(err, JobError::NotFound(ref id) if id == "missing"));
    }

    // =========================================================================
    // Listing, retention and export
    // =========================================================================

    #[tokio::test]
    async fn test_list_newest_first() {
        let service = memory_service(Stub::Hang);
        insert_job(&service, "old", 30).await;
        insert_job(&service, "new", 0).await;

        let ids: Vec<String> = service
            .list_jobs()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.job_id)
            .collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_cleanup_keeps_newest_and_in_flight() {
        let mut limited = settings(60_000, 5_000);
        limited.retention_limit = 2;
        let service = service(Arc::new(MemoryStore::new()), Stub::Hang, limited);

        for (id, age) in [("t1", 1), ("t2", 2), ("t3", 3), ("t4", 4)] {
            insert_job(&service, id, age).await;
            service.complete(id, Outcome::Fallback).await.unwrap();
        }
        insert_job(&service, "pending", 10).await;

        assert_eq!(service.cleanup().await.unwrap(), 2);

        let ids: Vec<String> = service
            .list_jobs()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.job_id)
            .collect();
        assert_eq!(ids, vec!["t1", "t2", "pending"]);
    }

    #[tokio::test]
    async fn test_export_job() {
        let service = memory_service(Stub::Hang);

        insert_job(&service, "pending", 0).await;
        let err = service
            .export_job("pending", ExportFormat::Markdown)
            .await
            .unwrap_err();
        assert!(matches!(err, JobError::InvalidState(_)));

        insert_job(&service, "done", 0).await;
        service.complete("done", Outcome::Fallback).await.unwrap();
        let out = service.export_job("done", ExportFormat::Markdown).await.unwrap();
        assert!(out.starts_with("## Test Case 1: Verify basic user login"));

        insert_job(&service, "unparsed", 0).await;
        let raw = GenerationResult {
            test_cases: vec![],
            raw_text: "just prose".to_string(),
        };
        service
            .complete("unparsed", Outcome::Generated(raw))
            .await
            .unwrap();
        let out = service.export_job("unparsed", ExportFormat::Text).await.unwrap();
        assert_eq!(out, "just prose");

        insert_job(&service, "broken", 0).await;
        service
            .complete("broken", Outcome::Failed("store down".to_string()))
            .await
            .unwrap();
        let out = service.export_job("broken", ExportFormat::Text).await.unwrap();
        assert_eq!(out, "store down");
        let out = service.export_job("broken", ExportFormat::Html).await.unwrap();
        assert_eq!(out, "<pre class=\"test-cases\">store down</pre>");
    }

    #[tokio::test]
    async fn test_failed_job_html_export_escapes_error() {
        let service = memory_service(Stub::Hang);

        insert_job(&service, "broken", 0).await;
        service
            .complete(
                "broken",
                Outcome::Failed("key <script>x</script> bad".to_string()),
            )
            .await
            .unwrap();

        let out = service.export_job("broken", ExportFormat::Html).await.unwrap();
        assert!(!out.contains("<script>"));
        assert!(out.contains("key &lt;script&gt;x&lt;/script&gt; bad"));

        let out = service.export_job("broken", ExportFormat::Markdown).await.unwrap();
        assert_eq!(out, "key <script>x</script> bad");
    }

    #[test]
    fn test_fallback_result_parses() {
        let result = fallback_result(&CreateJob::new("x", "y"));
        assert!(!result.test_cases.is_empty());
        assert!(result.test_cases.iter().all(|c| !c.title.is_empty()));
    }
}
