//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to node or API:
//!     → client-level timeout (every external call has a deadline)
//!     → On "not ready yet": backoff.rs (bounded attempts, exponential delay + jitter)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Waiting is bounded by attempts and by wall-clock deadline
//! - Non-idempotent calls (transaction submission, remote POSTs) are never retried

pub mod backoff;

pub use backoff::{calculate_backoff, RetryPolicy};
