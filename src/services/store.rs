use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::warn;

use crate::database::{connection_repo, population_repo, profile_repo};
use crate::models::{CandidateSourceRow, Profile, ProfileRow};
use crate::services::error::{ServiceError, ServiceResult};

/// Boundary to the persistence collaborator. The core never sees query text
/// or transport details through this trait; tests run it against an
/// in-memory database.
#[async_trait]
pub trait ConnectionStore: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> ServiceResult<Option<Profile>>;

    /// Ids the user has connected with, insertion-ordered.
    async fn get_connections(&self, user_id: &str) -> ServiceResult<Vec<String>>;

    /// Idempotent set-union append. Never auto-retried; idempotency exists so
    /// a caller-initiated retry after a timeout is safe.
    async fn add_connection(&self, user_id: &str, candidate_id: &str) -> ServiceResult<()>;

    /// Batch profile lookup for rehydrating the matches view.
    async fn get_profiles_by_ids(&self, ids: &[String]) -> ServiceResult<Vec<CandidateSourceRow>>;
}

pub fn connection_id_set(ids: &[String]) -> HashSet<String> {
    ids.iter().cloned().collect()
}

const CALL_TIMEOUT: Duration = Duration::from_secs(2);
const READ_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(50);

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteStore { pool }
    }
}

#[async_trait]
impl ConnectionStore for SqliteStore {
    async fn get_profile(&self, user_id: &str) -> ServiceResult<Option<Profile>> {
        let row: Option<ProfileRow> =
            read_with_retry("get_profile", || profile_repo::load_profile(&self.pool, user_id))
                .await?;
        Ok(row.map(Profile::from_row))
    }

    async fn get_connections(&self, user_id: &str) -> ServiceResult<Vec<String>> {
        read_with_retry("get_connections", || {
            connection_repo::list_connections(&self.pool, user_id)
        })
        .await
    }

    async fn add_connection(&self, user_id: &str, candidate_id: &str) -> ServiceResult<()> {
        // Single attempt. A timeout surfaces as Transport and the client may
        // re-issue the swipe; INSERT OR IGNORE absorbs the duplicate.
        bounded(connection_repo::add_connection(&self.pool, user_id, candidate_id)).await
    }

    async fn get_profiles_by_ids(&self, ids: &[String]) -> ServiceResult<Vec<CandidateSourceRow>> {
        read_with_retry("get_profiles_by_ids", || {
            population_repo::load_profiles_by_ids(&self.pool, ids)
        })
        .await
    }
}

/// Wraps a store call in the per-call timeout; expiry is a transport failure.
async fn bounded<T, F>(fut: F) -> ServiceResult<T>
where
    F: std::future::Future<Output = sqlx::Result<T>>,
{
    match tokio::time::timeout(CALL_TIMEOUT, fut).await {
        Ok(result) => result.map_err(ServiceError::from),
        Err(_) => Err(ServiceError::Transport("store call timed out".into())),
    }
}

/// Bounded retry with backoff, for idempotent reads only. NotFound is a
/// definitive answer and is never retried.
async fn read_with_retry<T, F, Fut>(op: &str, mut call: F) -> ServiceResult<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = sqlx::Result<T>>,
{
    let mut last = ServiceError::Transport("no attempt made".into());
    for attempt in 0..READ_ATTEMPTS {
        if attempt > 0 {
            tokio::time::sleep(RETRY_BASE_DELAY * 2u32.pow(attempt - 1)).await;
        }
        match bounded(call()).await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transport() => {
                warn!("{} attempt {} failed: {}", op, attempt + 1, err);
                last = err;
            }
            Err(err) => return Err(err),
        }
    }
    Err(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    async fn closed_pool() -> SqlitePool {
        // connect_lazy: establishing a real connection races the paused
        // tokio clock (auto-advance fires the acquire timeout while the
        // background connect thread runs); a lazily-built pool closes just
        // the same.
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect_lazy("sqlite::memory:")
            .unwrap();
        pool.close().await;
        pool
    }

    #[tokio::test(start_paused = true)]
    async fn reads_retry_with_backoff_up_to_the_attempt_cap() {
        let calls = Cell::new(0u32);
        let started = tokio::time::Instant::now();

        let result: ServiceResult<i64> = read_with_retry("read", || {
            calls.set(calls.get() + 1);
            async { Err::<i64, _>(sqlx::Error::PoolClosed) }
        })
        .await;

        assert!(matches!(result, Err(ServiceError::Transport(_))));
        assert_eq!(calls.get(), READ_ATTEMPTS);
        // Two backoff sleeps ran between the three attempts: 50ms, then 100ms.
        assert!(started.elapsed() >= RETRY_BASE_DELAY * 3);
    }

    #[tokio::test]
    async fn not_found_is_definitive_and_never_retried() {
        let calls = Cell::new(0u32);

        let result: ServiceResult<i64> = read_with_retry("read", || {
            calls.set(calls.get() + 1);
            async { Err::<i64, _>(sqlx::Error::RowNotFound) }
        })
        .await;

        assert!(matches!(result, Err(ServiceError::NotFound)));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_stop_as_soon_as_a_read_succeeds() {
        let calls = Cell::new(0u32);

        let result: ServiceResult<i64> = read_with_retry("read", || {
            calls.set(calls.get() + 1);
            let attempt = calls.get();
            async move {
                if attempt < 2 {
                    Err(sqlx::Error::PoolClosed)
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_store_call_times_out_as_transport() {
        let result: ServiceResult<i64> =
            bounded(std::future::pending::<sqlx::Result<i64>>()).await;
        assert!(matches!(result, Err(ServiceError::Transport(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn add_connection_fails_fast_with_no_retry() {
        let store = SqliteStore::new(closed_pool().await);
        let started = tokio::time::Instant::now();

        let err = store.add_connection("me", "x").await.unwrap_err();
        assert!(err.is_transport());
        // A retrying call would have slept through at least one backoff and
        // advanced the paused clock.
        assert!(started.elapsed() < RETRY_BASE_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn reads_against_a_dead_store_exhaust_their_attempts() {
        let store = SqliteStore::new(closed_pool().await);
        let started = tokio::time::Instant::now();

        let err = store.get_connections("me").await.unwrap_err();
        assert!(err.is_transport());
        assert!(started.elapsed() >= RETRY_BASE_DELAY * 3);
    }
}
