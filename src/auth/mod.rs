//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! FlowSettings + ChainGateway + AuthApi
//!     → flow.rs (unlock → challenge → submit → confirm → verify)
//!     → Result<AuthReport, AuthError>
//!     → report.rs (console / JSON output)
//! ```

pub mod error;
pub mod flow;
pub mod report;

pub use error::AuthError;
pub use flow::{AuthFlow, AuthReport, AuthStage, FlowSettings, UnlockCredential, AUTHENTICATE_METHOD};
pub use report::{write_outcome, write_outcome_json, FAILURE_MESSAGE, SUCCESS_MESSAGE};
