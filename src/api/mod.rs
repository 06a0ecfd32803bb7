//! Hydro API subsystem.
//!
//! # Endpoints
//! ```text
//! POST /whitelist/<address>                  → hydro_address_id (one-time)
//! POST /challenge?hydro_address_id=<id>      → {amount, challenge, partner_id}
//! POST /authenticate?hydro_address_id=<id>   → "true" when authenticated
//! ```
//!
//! Every request carries the body `{"username": ..., "key": ...}`.

pub mod client;
pub mod types;

pub use client::{AuthApi, HydroApiClient};
pub use types::{
    ApiCredentials, ApiError, ApiResult, ChallengeResponse, HydroAddressId, VerificationResponse,
};
