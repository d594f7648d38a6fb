//! Job Repository
//!
//! Maps job records onto the key-value store under `job:<id>` keys.

use casegen_core::domain::job::Job;
use serde_json::Value;

use crate::store::{KvStore, StoreError};

pub const KEY_PREFIX: &str = "job:";

pub fn job_key(id: &str) -> String {
    format!("{}{}", KEY_PREFIX, id)
}

/// Store a new job
pub async fn insert(store: &dyn KvStore, job: &Job) -> Result<(), StoreError> {
    store.put(&job_key(&job.id), serde_json::to_value(job)?).await
}

/// Find a job by ID
pub async fn find_by_id(store: &dyn KvStore, id: &str) -> Result<Option<Job>, StoreError> {
    Ok(find_versioned(store, id).await?.map(|(job, _)| job))
}

/// Find a job by ID together with the stored document
///
/// The document is the `expected` value for a later [`replace`].
pub async fn find_versioned(
    store: &dyn KvStore,
    id: &str,
) -> Result<Option<(Job, Value)>, StoreError> {
    match store.get(&job_key(id)).await? {
        Some(value) => {
            let job = serde_json::from_value(value.clone())?;
            Ok(Some((job, value)))
        }
        None => Ok(None),
    }
}

/// List all jobs, newest first
///
/// Records that no longer deserialize are skipped.
pub async fn list_all(store: &dyn KvStore) -> Result<Vec<Job>, StoreError> {
    let mut jobs: Vec<Job> = store
        .list_by_prefix(KEY_PREFIX)
        .await?
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value::<Job>(value) {
            Ok(job) => Some(job),
            Err(e) => {
                tracing::warn!("Skipping unreadable job record {}: {}", key, e);
                None
            }
        })
        .collect();

    jobs.sort_by(|a, b| b.start_time.cmp(&a.start_time).then_with(|| b.id.cmp(&a.id)));
    Ok(jobs)
}

/// Replace a job only if it still holds `expected`
pub async fn replace(
    store: &dyn KvStore,
    expected: &Value,
    next: &Job,
) -> Result<bool, StoreError> {
    store
        .compare_and_swap(&job_key(&next.id), expected, serde_json::to_value(next)?)
        .await
}

/// Delete a job by ID
pub async fn delete(store: &dyn KvStore, id: &str) -> Result<bool, StoreError> {
    store.delete(&job_key(id)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use casegen_core::dto::job::CreateJob;
    use chrono::{Duration, TimeZone, Utc};

    fn job(id: &str, secs: i64) -> Job {
        let start = Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap();
        Job::new(
            id.to_string(),
            CreateJob::new("desc", "- ac"),
            start,
            Duration::seconds(60),
        )
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryStore::new();
        insert(&store, &job("a", 0)).await.unwrap();

        let found = find_by_id(&store, "a").await.unwrap().unwrap();
        assert_eq!(found, job("a", 0));
        assert!(find_by_id(&store, "b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = MemoryStore::new();
        insert(&store, &job("old", 0)).await.unwrap();
        insert(&store, &job("new", 10)).await.unwrap();
        insert(&store, &job("mid", 5)).await.unwrap();
        store.put("job:broken", serde_json::json!({"id": 1})).await.unwrap();

        let ids: Vec<String> = list_all(&store).await.unwrap().into_iter().map(|j| j.id).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_replace_is_conditional() {
        let store = MemoryStore::new();
        insert(&store, &job("a", 0)).await.unwrap();

        let (current, version) = find_versioned(&store, "a").await.unwrap().unwrap();
        let processing = current.processing();
        assert!(replace(&store, &version, &processing).await.unwrap());

        // Stale version no longer matches
        let failed = current.failed("late", Utc::now());
        assert!(!replace(&store, &version, &failed).await.unwrap());

        let stored = find_by_id(&store, "a").await.unwrap().unwrap();
        assert_eq!(stored, processing);
    }
}
