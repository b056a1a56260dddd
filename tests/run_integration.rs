//! Public-API integration tests for the retry controller.
//!
//! These exercise the crate the way a caller would: a flaky service that
//! recovers, a permanent error promoted by the veto policy, and cancellation
//! arriving from a concurrently running task.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use mulligan::prelude::*;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq)]
enum FetchError {
    Timeout,
    Unauthorized,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Timeout => write!(f, "request timed out"),
            FetchError::Unauthorized => write!(f, "credentials rejected"),
        }
    }
}

impl std::error::Error for FetchError {}

#[tokio::test]
async fn flaky_service_recovers_within_the_budget() {
    let cancel = CancellationToken::new();
    let calls = Arc::new(AtomicU32::new(0));
    let started = Instant::now();

    let report = run(
        &cancel,
        {
            let calls = calls.clone();
            move || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(FetchError::Timeout)
                    } else {
                        Ok(())
                    }
                }
            }
        },
        &RetryPolicy::new()
            .with_max_retries(10)
            .with_delay_fn(|_| Duration::from_millis(10)),
    )
    .await
    .unwrap();

    assert_eq!(report.attempts, 3);
    assert_eq!(report.work_errors, vec![FetchError::Timeout, FetchError::Timeout]);
    assert!(started.elapsed() >= Duration::from_millis(15));
    assert!(report.elapsed() >= Duration::from_millis(15));
}

#[tokio::test]
async fn veto_policy_promotes_a_permanent_error() {
    let cancel = CancellationToken::new();
    let calls = Arc::new(AtomicU32::new(0));

    let failure = run(
        &cancel,
        {
            let calls = calls.clone();
            move || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(FetchError::Timeout)
                    } else {
                        Err(FetchError::Unauthorized)
                    }
                }
            }
        },
        &RetryPolicy::new().with_max_retries(10).with_stop_fn(|report| {
            report
                .last_error()
                .cloned()
                .filter(|e| *e == FetchError::Unauthorized)
        }),
    )
    .await
    .unwrap_err();

    assert_eq!(failure.cause, StopCause::Vetoed(FetchError::Unauthorized));
    assert_eq!(failure.report.attempts, 3);
    assert_eq!(
        failure.report.work_errors,
        vec![FetchError::Timeout, FetchError::Timeout, FetchError::Unauthorized]
    );

    let display = format!("{}", failure);
    assert!(display.contains("vetoed after 3 attempts"));
    assert!(display.contains("credentials rejected"));
}

#[tokio::test]
async fn concurrent_cancel_interrupts_a_long_delay() {
    let cancel = CancellationToken::new();
    let canceller = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel.cancel();
        })
    };

    let started = Instant::now();
    let failure = run(
        &cancel,
        || async { Err::<(), _>(FetchError::Timeout) },
        &RetryPolicy::new().with_delay_fn(|_| Duration::from_secs(60)),
    )
    .await
    .unwrap_err();
    canceller.await.unwrap();

    assert!(failure.is_cancelled());
    assert_eq!(failure.report.attempts, 1);
    assert_eq!(failure.report.last_error(), Some(&FetchError::Timeout));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn exhaustion_keeps_the_full_error_history() {
    let cancel = CancellationToken::new();

    let failure = run(
        &cancel,
        || async { Err::<(), _>(FetchError::Timeout) },
        &RetryPolicy::new().with_max_retries(4),
    )
    .await
    .unwrap_err();

    assert!(failure.is_exhausted());
    assert_eq!(failure.report.work_errors, vec![FetchError::Timeout; 4]);
    assert_eq!(format!("{}", failure), "reached maximum retries after 4 attempts");

    // The veto error is the only source; exhaustion has none.
    use std::error::Error as _;
    assert!(failure.source().is_none());
}
