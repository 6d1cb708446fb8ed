//! Retry policy for transient database failures.

use std::future::Future;
use std::time::Duration;

use crate::{TaskStoreError, TaskStoreResult};

/// Maximum number of attempts per database operation.
pub const MAX_ATTEMPTS: u32 = 3;

/// Delay consumed after the first failed attempt; doubles after every
/// subsequent failure (1s, 2s, 4s).
pub const BACKOFF_BASE: Duration = Duration::from_secs(1);

/// Returns true for connectivity-class failures that are worth retrying.
///
/// Logical failures (constraint violations, decode errors, missing rows)
/// must propagate immediately.
pub fn is_transient(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

/// Runs `op` up to [`MAX_ATTEMPTS`] times.
///
/// Every transient failure sleeps the current backoff and then invokes
/// `recover` (the caller's pool disposal/reconnect hook) before either
/// retrying or, when the budget is spent, surfacing
/// [`TaskStoreError::Unavailable`]. Non-transient failures propagate on the
/// spot without backoff or recovery.
pub(crate) async fn with_retry<T, Op, OpFut, Recover, RecoverFut>(
    operation: &'static str,
    mut op: Op,
    mut recover: Recover,
) -> TaskStoreResult<T>
where
    Op: FnMut() -> OpFut,
    OpFut: Future<Output = Result<T, sqlx::Error>>,
    Recover: FnMut() -> RecoverFut,
    RecoverFut: Future<Output = ()>,
{
    let mut delay = BACKOFF_BASE;
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if !is_transient(&err) => return Err(TaskStoreError::Database(err)),
            Err(err) => {
                tracing::warn!(
                    operation,
                    attempt,
                    delay_secs = delay.as_secs(),
                    error = %err,
                    "transient storage failure, backing off"
                );
                tokio::time::sleep(delay).await;
                recover().await;

                if attempt == MAX_ATTEMPTS {
                    tracing::error!(
                        operation,
                        attempts = MAX_ATTEMPTS,
                        error = %err,
                        "storage unavailable, retry budget exhausted"
                    );
                    return Err(TaskStoreError::Unavailable {
                        attempts: MAX_ATTEMPTS,
                        source: err,
                    });
                }
                attempt += 1;
                delay *= 2;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use tokio::time::Instant;

    use super::*;

    fn transient() -> sqlx::Error {
        sqlx::Error::PoolTimedOut
    }

    fn non_transient() -> sqlx::Error {
        sqlx::Error::RowNotFound
    }

    #[test]
    fn test_classifier() {
        assert!(is_transient(&sqlx::Error::PoolTimedOut));
        assert!(is_transient(&sqlx::Error::PoolClosed));
        assert!(is_transient(&sqlx::Error::WorkerCrashed));
        assert!(is_transient(&sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "reset",
        ))));
        assert!(!is_transient(&sqlx::Error::RowNotFound));
        assert!(!is_transient(&sqlx::Error::ColumnNotFound("id".into())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_transient_failures() {
        let attempts = AtomicU32::new(0);
        let recoveries = AtomicU32::new(0);
        let start = Instant::now();

        let value = with_retry(
            "test",
            || {
                let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n < 3 {
                        Err(transient())
                    } else {
                        Ok(n)
                    }
                }
            },
            || {
                recoveries.fetch_add(1, Ordering::SeqCst);
                async {}
            },
        )
        .await
        .unwrap();

        assert_eq!(value, 3);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert_eq!(recoveries.load(Ordering::SeqCst), 2);
        // Two failures consumed: 1s + 2s of backoff.
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_surfaces_unavailable() {
        let attempts = AtomicU32::new(0);
        let start = Instant::now();

        let result: TaskStoreResult<()> = with_retry(
            "test",
            || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(transient()) }
            },
            || async {},
        )
        .await;

        assert!(matches!(
            result,
            Err(TaskStoreError::Unavailable { attempts: 3, .. })
        ));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        // Full budget consumed: 1s + 2s + 4s of backoff.
        assert!(start.elapsed() >= Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_transient_fails_immediately() {
        let attempts = AtomicU32::new(0);
        let recoveries = AtomicU32::new(0);
        let start = Instant::now();

        let result: TaskStoreResult<()> = with_retry(
            "test",
            || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(non_transient()) }
            },
            || {
                recoveries.fetch_add(1, Ordering::SeqCst);
                async {}
            },
        )
        .await;

        assert!(matches!(result, Err(TaskStoreError::Database(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(recoveries.load(Ordering::SeqCst), 0);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_success_skips_backoff() {
        let start = Instant::now();

        let value = with_retry("test", || async { Ok(42) }, || async {})
            .await
            .unwrap();

        assert_eq!(value, 42);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
