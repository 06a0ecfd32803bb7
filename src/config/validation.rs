//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, URLs and value ranges
//! - Reject unfilled `{your ...}` placeholders
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RaindropConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::{RaindropConfig, SignerMode};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{0} still contains a placeholder")]
    Placeholder(&'static str),

    #[error("{field} is not a valid address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} is not a valid URL: {reason}")]
    InvalidUrl { field: &'static str, reason: String },

    #[error("{field} must be {constraint}")]
    OutOfRange {
        field: &'static str,
        constraint: &'static str,
    },
}

/// Validate a loaded configuration.
pub fn validate_config(config: &RaindropConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_text(&mut errors, "node.endpoint", &config.node.endpoint);
    if let Some((scheme, _)) = config.node.endpoint.split_once("://") {
        if !matches!(scheme, "http" | "https" | "ws" | "wss") {
            errors.push(ValidationError::InvalidUrl {
                field: "node.endpoint",
                reason: format!("unsupported scheme '{}'", scheme),
            });
        }
    }
    if config.node.rpc_timeout_secs == 0 {
        errors.push(ValidationError::OutOfRange {
            field: "node.rpc_timeout_secs",
            constraint: "greater than zero",
        });
    }

    if check_text(&mut errors, "contract.address", &config.contract.address) {
        check_address(&mut errors, "contract.address", &config.contract.address);
    }
    check_text(&mut errors, "contract.abi_path", &config.contract.abi_path);

    if let Some(id) = &config.account.id {
        if check_text(&mut errors, "account.id", id) {
            check_address(&mut errors, "account.id", id);
        }
    }
    if config.account.signer == SignerMode::Node {
        check_text(&mut errors, "account.secret", &config.account.secret);
    }

    if check_text(&mut errors, "api.base_url", &config.api.base_url) {
        match url::Url::parse(&config.api.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::InvalidUrl {
                field: "api.base_url",
                reason: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(e) => errors.push(ValidationError::InvalidUrl {
                field: "api.base_url",
                reason: e.to_string(),
            }),
        }
    }
    check_text(&mut errors, "api.username", &config.api.username);
    check_text(&mut errors, "api.key", &config.api.key);
    if let Some(id) = &config.api.hydro_address_id {
        check_text(&mut errors, "api.hydro_address_id", id);
    }
    if config.api.timeout_secs == 0 {
        errors.push(ValidationError::OutOfRange {
            field: "api.timeout_secs",
            constraint: "greater than zero",
        });
    }

    let confirmation = &config.confirmation;
    if confirmation.initial_interval_ms == 0 {
        errors.push(ValidationError::OutOfRange {
            field: "confirmation.initial_interval_ms",
            constraint: "greater than zero",
        });
    }
    if confirmation.max_interval_ms < confirmation.initial_interval_ms {
        errors.push(ValidationError::OutOfRange {
            field: "confirmation.max_interval_ms",
            constraint: "at least confirmation.initial_interval_ms",
        });
    }
    if confirmation.max_attempts == 0 {
        errors.push(ValidationError::OutOfRange {
            field: "confirmation.max_attempts",
            constraint: "at least 1",
        });
    }
    if confirmation.deadline_secs == 0 {
        errors.push(ValidationError::OutOfRange {
            field: "confirmation.deadline_secs",
            constraint: "greater than zero",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Returns true when the value is present and filled in.
fn check_text(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        errors.push(ValidationError::Missing(field));
        return false;
    }
    if value.contains("{your") || (value.starts_with('{') && value.ends_with('}')) {
        errors.push(ValidationError::Placeholder(field));
        return false;
    }
    true
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.trim().parse::<Address>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
