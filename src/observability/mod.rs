//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (tx_hash, account, endpoint, ...)
//!     → logging.rs (EnvFilter + fmt layer on stderr)
//! ```
//!
//! # Design Decisions
//! - Secrets (account secret, API key, private key) are never recorded as fields
//! - One event per stage transition so a run can be followed from the log alone

pub mod logging;

pub use logging::init_logging;
