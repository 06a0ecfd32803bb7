//! Hydro API request and response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Body posted to every Hydro endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCredentials {
    pub username: String,
    pub key: String,
}

impl ApiCredentials {
    pub fn new(username: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            key: key.into(),
        }
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("username", &self.username)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Identifier the Hydro API assigns to a whitelisted address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HydroAddressId(pub String);

impl HydroAddressId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Accepts a bare number/string or an object carrying `hydro_address_id`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self(n.to_string())),
            Value::String(s) if !s.trim().is_empty() => Some(Self(s.trim().to_string())),
            Value::Object(map) => map
                .get("hydro_address_id")
                .and_then(|v| Self::from_json(v)),
            _ => None,
        }
    }
}

impl From<&str> for HydroAddressId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for HydroAddressId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Challenge values the contract's `authenticate` method expects.
///
/// Kept as raw JSON; the contract binding coerces them to the ABI types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeResponse {
    pub amount: Value,
    pub challenge: Value,
    pub partner_id: Value,
}

impl ChallengeResponse {
    /// Arguments for `authenticate`, in call order.
    pub fn contract_args(&self) -> Vec<Value> {
        vec![
            self.amount.clone(),
            self.challenge.clone(),
            self.partner_id.clone(),
        ]
    }
}

/// Raw answer of the authenticate-check endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResponse {
    pub status: u16,
    pub body: String,
}

impl VerificationResponse {
    /// Only the literal body `true` counts as authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.body == "true"
    }
}

/// Errors talking to the Hydro API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid API URL: {0}")]
    Url(String),

    #[error("Request to {endpoint} failed: {reason}")]
    Transport {
        endpoint: &'static str,
        reason: String,
    },

    #[error("Malformed response from {endpoint} (HTTP {status}): {reason}")]
    Malformed {
        endpoint: &'static str,
        status: u16,
        reason: String,
    },
}

pub type ApiResult<T> = Result<T, ApiError>;
