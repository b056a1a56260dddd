//! # Mulligan
//!
//! > *"Take the shot again."*
//!
//! A small library for masking transient failures behind a single call:
//! invoke a fallible async operation repeatedly until it succeeds, a retry
//! limit is reached, a caller-supplied policy vetoes further attempts, or a
//! cancellation token fires - and get back a structured record of what
//! happened either way.
//!
//! ## Philosophy
//!
//! The whole crate is one control loop plus bookkeeping. Three independent
//! stop conditions (success, limit, cancellation) interleave with two
//! optional extension points (a veto policy and a delay policy), and the
//! interesting work is keeping that interleaving exact: cancellation is
//! honored between attempts and mid-delay, the stop conditions are evaluated
//! in a fixed priority order, and every exit path hands back the same fully
//! populated [`RunReport`]. Backoff curves, error classification, and
//! concurrency fan-out are deliberately left to the caller - the delay and
//! veto callbacks are where those decisions plug in.
//!
//! ## Quick Example
//!
//! ```rust
//! use mulligan::{run, RetryPolicy};
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio_test::block_on(async {
//! let cancel = CancellationToken::new();
//! let mut remaining_failures = 2u32;
//!
//! let report = run(
//!     &cancel,
//!     || {
//!         let failing = remaining_failures > 0;
//!         remaining_failures = remaining_failures.saturating_sub(1);
//!         async move {
//!             if failing {
//!                 Err("connection refused")
//!             } else {
//!                 Ok(())
//!             }
//!         }
//!     },
//!     &RetryPolicy::new()
//!         .with_max_retries(5)
//!         .with_delay_fn(|_| Duration::from_millis(1)),
//! )
//! .await
//! .unwrap();
//!
//! assert_eq!(report.attempts, 3);
//! assert_eq!(report.last_error(), Some(&"connection refused"));
//! # });
//! ```
//!
//! ## Stop conditions
//!
//! A run ends in exactly one of four ways, and the error kinds are
//! distinguishable so callers can branch on them:
//!
//! - the operation succeeds: `Ok(report)`, the only success exit;
//! - the attempt count reaches the cap: [`StopCause::Exhausted`];
//! - the veto callback returns an error: [`StopCause::Vetoed`], passed
//!   through verbatim;
//! - the cancellation token fires: [`StopCause::Cancelled`], detected
//!   before the first attempt, between attempts, and during delays.
//!
//! Without a policy, a run retries forever with no delay until cancelled.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod error;
mod policy;
mod report;
mod run;

pub use error::{RunError, StopCause};
pub use policy::RetryPolicy;
pub use report::RunReport;
pub use run::run;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{RunError, StopCause};
    pub use crate::policy::RetryPolicy;
    pub use crate::report::RunReport;
    pub use crate::run::run;
}
