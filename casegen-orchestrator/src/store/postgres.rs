//! PostgreSQL store
//!
//! Entries live in the `kv_store` table created by [`crate::db::run_migrations`].
//! JSONB equality is structural, so compare-and-swap does not depend on key
//! order inside the stored document.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use super::{KvStore, StoreError};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Connection-level failures become [`StoreError::Unavailable`]
fn db_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(err.to_string())
        }
        other => StoreError::Database(other),
    }
}

/// Escapes `LIKE` wildcards so `prefix` matches literally
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl KvStore for PgStore {
    async fn put(&self, key: &str, value: Value) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (key) DO UPDATE
            SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let row = sqlx::query_scalar::<_, Value>("SELECT value FROM kv_store WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(row)
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<(String, Value)>, StoreError> {
        let rows = sqlx::query_as::<_, (String, Value)>(
            r#"
            SELECT key, value
            FROM kv_store
            WHERE key LIKE $1 ESCAPE '\'
            ORDER BY key
            "#,
        )
        .bind(like_prefix(prefix))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows)
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: &Value,
        value: Value,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE kv_store
            SET value = $3, updated_at = NOW()
            WHERE key = $1 AND value = $2
            "#,
        )
        .bind(key)
        .bind(expected)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_prefix_escapes_wildcards() {
        assert_eq!(like_prefix("job:"), "job:%");
        assert_eq!(like_prefix("a_b%c"), "a\\_b\\%c%");
        assert_eq!(like_prefix("x\\y"), "x\\\\y%");
    }
}
