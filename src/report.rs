//! Bookkeeping for a single retry execution.

use std::time::{Duration, Instant};

/// A record of everything that happened during one [`run()`](crate::run()) call.
///
/// The report is created fresh when the run starts, mutated in place while
/// the loop is live, and handed to the caller when the loop exits - on the
/// success path directly, on every failure path inside
/// [`RunError`](crate::RunError). Policy callbacks observe the same record as
/// a shared reference, so they see live, not-yet-finalized state.
///
/// # Examples
///
/// ```rust
/// use mulligan::RunReport;
///
/// let mut report = RunReport::default();
/// assert!(report.last_error().is_none());
///
/// report.work_errors.push("connection refused");
/// report.work_errors.push("connection reset");
/// assert_eq!(report.last_error(), Some(&"connection reset"));
/// ```
#[derive(Debug, Clone)]
pub struct RunReport<E> {
    /// Number of times the operation was invoked. The initial attempt
    /// counts as 1.
    pub attempts: u32,
    /// Errors from failed attempts, in attempt order. Append-only; after a
    /// failed attempt `attempts == work_errors.len()`, and on success the
    /// final `attempts` exceeds it by exactly one.
    pub work_errors: Vec<E>,
    /// When the run started.
    pub started_at: Instant,
    /// When the run finished. `None` while the loop is still live, which is
    /// the state policy callbacks observe; set exactly once, on every exit
    /// path.
    pub finished_at: Option<Instant>,
}

impl<E> RunReport<E> {
    /// Create an empty report, stamping `started_at` with the current time.
    pub fn new() -> Self {
        Self {
            attempts: 0,
            work_errors: Vec::new(),
            started_at: Instant::now(),
            finished_at: None,
        }
    }

    /// The error from the most recent failed attempt, if any.
    pub fn last_error(&self) -> Option<&E> {
        self.work_errors.last()
    }

    /// Time spent in the run: from `started_at` to `finished_at`, or to now
    /// if the run is still live.
    pub fn elapsed(&self) -> Duration {
        match self.finished_at {
            Some(finished) => finished.duration_since(self.started_at),
            None => self.started_at.elapsed(),
        }
    }
}

impl<E> Default for RunReport<E> {
    fn default() -> Self {
        Self::new()
    }
}
