//! The retry controller.
//!
//! One loop owns all of the sequencing: it executes the operation, keeps the
//! [`RunReport`] current, evaluates the stop conditions in a fixed priority
//! order, and turns the inter-attempt delay into a cancellable wait.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::error::{RunError, StopCause};
use crate::policy::RetryPolicy;
use crate::report::RunReport;

/// Invoke `work` repeatedly until it succeeds, the policy stops the run, or
/// `cancel` fires.
///
/// Attempts are strictly sequential: the operation is never invoked
/// concurrently with itself. After every failed attempt the stop conditions
/// are evaluated in a fixed order - retry limit first, then the veto
/// callback, then the delay callback - and cancellation is checked at the
/// top of every iteration, so a token cancelled between attempts is honored
/// before the next attempt starts. A token that is already cancelled when
/// the call begins stops the run with zero attempts, which is a valid
/// report.
///
/// Returns `Ok(report)` only on operation success. Every other exit returns
/// a [`RunError`] carrying the same fully populated report, so the caller
/// has the complete attempt history regardless of which terminal condition
/// fired. Work errors themselves never escape as the run's error; they are
/// accumulated in [`RunReport::work_errors`].
///
/// # Examples
///
/// Retry a flaky operation a bounded number of times:
///
/// ```rust
/// use mulligan::{run, RetryPolicy};
/// use tokio_util::sync::CancellationToken;
///
/// # tokio_test::block_on(async {
/// let cancel = CancellationToken::new();
/// let mut remaining_failures = 2u32;
///
/// let report = run(
///     &cancel,
///     || {
///         let failing = remaining_failures > 0;
///         remaining_failures = remaining_failures.saturating_sub(1);
///         async move {
///             if failing {
///                 Err("connection refused")
///             } else {
///                 Ok(())
///             }
///         }
///     },
///     &RetryPolicy::new().with_max_retries(5),
/// )
/// .await
/// .unwrap();
///
/// assert_eq!(report.attempts, 3);
/// assert_eq!(report.work_errors.len(), 2);
/// # });
/// ```
pub async fn run<E, F, Fut>(
    cancel: &CancellationToken,
    mut work: F,
    policy: &RetryPolicy<E>,
) -> Result<RunReport<E>, RunError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    let mut report = RunReport::new();

    let stopped = drive(cancel, &mut work, policy, &mut report).await;
    // Every exit from the loop flows through here, so the finish time is
    // stamped exactly once on success, exhaustion, veto, and cancellation
    // alike.
    report.finished_at = Some(Instant::now());

    match stopped {
        None => Ok(report),
        Some(cause) => Err(RunError { report, cause }),
    }
}

/// The control loop. Returns `None` on operation success, otherwise the
/// cause that stopped the run.
async fn drive<E, F, Fut>(
    cancel: &CancellationToken,
    work: &mut F,
    policy: &RetryPolicy<E>,
    report: &mut RunReport<E>,
) -> Option<StopCause<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    loop {
        if cancel.is_cancelled() {
            tracing::debug!(attempts = report.attempts, "run cancelled");
            return Some(StopCause::Cancelled);
        }

        report.attempts += 1;
        match work().await {
            Ok(()) => {
                tracing::trace!(attempts = report.attempts, "work succeeded");
                return None;
            }
            Err(err) => {
                report.work_errors.push(err);
                tracing::trace!(attempt = report.attempts, "work attempt failed");
            }
        }

        // Stop-condition order is part of the contract: limit, then veto,
        // then delay. The attempt that hits the limit never reaches the
        // veto callback.
        if policy.max_retries == Some(report.attempts) {
            tracing::debug!(attempts = report.attempts, "maximum retries reached");
            return Some(StopCause::Exhausted);
        }

        if let Some(stop) = policy.stop_fn.as_deref() {
            if let Some(err) = stop(report) {
                tracing::debug!(attempts = report.attempts, "retry vetoed");
                return Some(StopCause::Vetoed(err));
            }
        }

        if let Some(delay) = policy.delay_fn.as_deref() {
            let wait = delay(report);
            if !wait.is_zero() && sleep_unless_cancelled(cancel, wait).await.is_err() {
                tracing::debug!(attempts = report.attempts, "cancelled during delay");
                return Some(StopCause::Cancelled);
            }
        }
    }
}

/// Sleep for `duration` unless the token fires first; whichever resolves
/// first wins the race. Returns `Err(())` on cancellation. Both the timer
/// and the cancellation future are dropped on either path.
async fn sleep_unless_cancelled(
    cancel: &CancellationToken,
    duration: Duration,
) -> Result<(), ()> {
    tokio::select! {
        _ = tokio::time::sleep(duration) => Ok(()),
        _ = cancel.cancelled() => Err(()),
    }
}
