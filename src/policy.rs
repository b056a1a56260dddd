//! Retry policy configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::report::RunReport;

type StopFn<E> = Arc<dyn Fn(&RunReport<E>) -> Option<E> + Send + Sync>;
type DelayFn<E> = Arc<dyn Fn(&RunReport<E>) -> Duration + Send + Sync>;

/// Configuration for a [`run()`](crate::run()) call.
///
/// Every knob is optional and independently settable. The default policy -
/// [`RetryPolicy::new`] with nothing else - retries forever with no delay,
/// until the cancellation token fires. Bounding a run is always an explicit
/// decision: a retry cap, a veto callback, or caller-side cancellation.
///
/// The callbacks receive the live [`RunReport`] for the run, so a veto or
/// delay decision can depend on the attempt count or the error history.
///
/// # Examples
///
/// ```rust
/// use mulligan::RetryPolicy;
/// use std::time::Duration;
///
/// let policy: RetryPolicy<String> = RetryPolicy::new()
///     .with_max_retries(5)
///     .with_delay_fn(|_| Duration::from_millis(100));
///
/// assert_eq!(policy.max_retries(), Some(5));
/// ```
pub struct RetryPolicy<E> {
    pub(crate) max_retries: Option<u32>,
    pub(crate) stop_fn: Option<StopFn<E>>,
    pub(crate) delay_fn: Option<DelayFn<E>>,
}

impl<E> RetryPolicy<E> {
    /// Create the unbounded policy: retry forever, no delay, until cancelled.
    pub fn new() -> Self {
        Self {
            max_retries: None,
            stop_fn: None,
            delay_fn: None,
        }
    }

    /// Cap the total number of attempts.
    ///
    /// When a failed attempt brings the count to exactly `n`, the run stops
    /// with [`StopCause::Exhausted`](crate::StopCause::Exhausted). A cap of
    /// zero never matches an attempt count and so behaves like no cap.
    pub fn with_max_retries(mut self, n: u32) -> Self {
        self.max_retries = Some(n);
        self
    }

    /// Set the veto callback, invoked after each failed attempt.
    ///
    /// Returning `Some(err)` aborts the run with that error, passed through
    /// verbatim as [`StopCause::Vetoed`](crate::StopCause::Vetoed);
    /// returning `None` lets the loop continue.
    pub fn with_stop_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&RunReport<E>) -> Option<E> + Send + Sync + 'static,
    {
        self.stop_fn = Some(Arc::new(f));
        self
    }

    /// Set the delay callback, invoked after each failed attempt that the
    /// limit and veto checks let through.
    ///
    /// The returned duration is waited out before the next attempt, as a
    /// cancellable wait. A zero duration retries immediately.
    pub fn with_delay_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&RunReport<E>) -> Duration + Send + Sync + 'static,
    {
        self.delay_fn = Some(Arc::new(f));
        self
    }

    /// The configured attempt cap, if any.
    pub fn max_retries(&self) -> Option<u32> {
        self.max_retries
    }
}

impl<E> Default for RetryPolicy<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        Self {
            max_retries: self.max_retries,
            stop_fn: self.stop_fn.clone(),
            delay_fn: self.delay_fn.clone(),
        }
    }
}

impl<E> fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_retries", &self.max_retries)
            .field("stop_fn", &self.stop_fn.as_ref().map(|_| "<fn>"))
            .field("delay_fn", &self.delay_fn.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
