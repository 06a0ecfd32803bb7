//! Hydro Raindrop authentication client library.

pub mod api;
pub mod auth;
pub mod blockchain;
pub mod config;
pub mod observability;
pub mod resilience;

pub use auth::{AuthError, AuthFlow, AuthReport};
pub use config::RaindropConfig;
