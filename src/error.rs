//! Terminal error types for retry executions.

use std::fmt;

use crate::report::RunReport;

/// Why a run stopped without the operation succeeding.
///
/// Work errors are not a stop cause by themselves - they are accumulated in
/// [`RunReport::work_errors`] and the loop keeps going. The variants here are
/// the three conditions that actually terminate a run.
///
/// # Examples
///
/// ```rust
/// use mulligan::StopCause;
///
/// let cause: StopCause<&str> = StopCause::Vetoed("credentials rejected");
/// assert!(cause.is_vetoed());
/// assert_eq!(cause.veto_error(), Some(&"credentials rejected"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopCause<E> {
    /// The attempt count reached the configured maximum.
    Exhausted,
    /// The stop callback aborted the run with this error. Passed through
    /// verbatim; the controller never inspects it.
    Vetoed(E),
    /// The cancellation token fired.
    Cancelled,
}

impl<E> StopCause<E> {
    /// Returns true if the retry limit was reached.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// Returns true if the stop callback aborted the run.
    pub fn is_vetoed(&self) -> bool {
        matches!(self, Self::Vetoed(_))
    }

    /// Returns true if the cancellation token fired.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The veto error, if that is what stopped the run.
    pub fn veto_error(&self) -> Option<&E> {
        match self {
            Self::Vetoed(e) => Some(e),
            _ => None,
        }
    }

    /// Extract the veto error, if that is what stopped the run.
    pub fn into_veto_error(self) -> Option<E> {
        match self {
            Self::Vetoed(e) => Some(e),
            _ => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for StopCause<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted => write!(f, "reached maximum retries"),
            Self::Vetoed(e) => write!(f, "{}", e),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for StopCause<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Vetoed(e) => Some(e),
            _ => None,
        }
    }
}

/// Error returned when a run stops without the operation succeeding.
///
/// Carries the full [`RunReport`] alongside the [`StopCause`], so the caller
/// has the complete attempt history regardless of which terminal condition
/// fired. Work errors never escape as the run's own error; inspect
/// [`RunReport::work_errors`] or [`RunReport::last_error`] to see them.
///
/// # Examples
///
/// ```rust
/// use mulligan::{run, RetryPolicy};
/// use tokio_util::sync::CancellationToken;
///
/// # tokio_test::block_on(async {
/// let cancel = CancellationToken::new();
///
/// let failure = run(
///     &cancel,
///     || async { Err::<(), _>("connection refused") },
///     &RetryPolicy::new().with_max_retries(2),
/// )
/// .await
/// .unwrap_err();
///
/// assert!(failure.is_exhausted());
/// assert_eq!(failure.report.attempts, 2);
/// assert_eq!(failure.report.last_error(), Some(&"connection refused"));
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct RunError<E> {
    /// Bookkeeping for the attempts made before the run stopped.
    pub report: RunReport<E>,
    /// Which terminal condition stopped the run.
    pub cause: StopCause<E>,
}

impl<E> RunError<E> {
    /// Returns true if the retry limit was reached.
    pub fn is_exhausted(&self) -> bool {
        self.cause.is_exhausted()
    }

    /// Returns true if the stop callback aborted the run.
    pub fn is_vetoed(&self) -> bool {
        self.cause.is_vetoed()
    }

    /// Returns true if the cancellation token fired.
    pub fn is_cancelled(&self) -> bool {
        self.cause.is_cancelled()
    }

    /// Extract the stop cause, discarding the report.
    pub fn into_cause(self) -> StopCause<E> {
        self.cause
    }
}

impl<E: fmt::Display> fmt::Display for RunError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            StopCause::Exhausted => write!(
                f,
                "reached maximum retries after {} attempts",
                self.report.attempts
            ),
            StopCause::Vetoed(e) => {
                write!(f, "retry vetoed after {} attempts: {}", self.report.attempts, e)
            }
            StopCause::Cancelled => {
                write!(f, "retry cancelled after {} attempts", self.report.attempts)
            }
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RunError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.cause {
            StopCause::Vetoed(e) => Some(e),
            _ => None,
        }
    }
}
