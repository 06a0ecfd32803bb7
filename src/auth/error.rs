//! Failure classes of the authentication flow.

use alloy::primitives::TxHash;
use thiserror::Error;

use crate::api::ApiError;
use crate::blockchain::BlockchainError;

/// Why an authentication attempt did not succeed.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to load contract interface: {0}")]
    ArtifactLoad(String),

    #[error("Node connectivity failure: {0}")]
    NodeConnectivity(String),

    #[error("Account unlock failed: {0}")]
    Unlock(String),

    #[error("Malformed response from {endpoint} (HTTP {status}): {reason}")]
    MalformedResponse {
        endpoint: String,
        status: u16,
        reason: String,
    },

    #[error("Verification returned {body:?} (HTTP {status})")]
    VerificationMismatch { status: u16, body: String },

    #[error("Transaction not mined after {0} receipt queries")]
    ConfirmationTimeout(u32),

    #[error("Transaction {0} reverted")]
    Reverted(TxHash),

    #[error("Contract error: {0}")]
    Contract(String),

    #[error("Hydro API request failed: {0}")]
    Api(String),

    #[error("Wallet error: {0}")]
    Wallet(String),
}

impl From<BlockchainError> for AuthError {
    fn from(err: BlockchainError) -> Self {
        match err {
            BlockchainError::Artifact { .. } => AuthError::ArtifactLoad(err.to_string()),
            BlockchainError::Unlock { .. } => AuthError::Unlock(err.to_string()),
            BlockchainError::Abi(reason) => AuthError::Contract(reason),
            BlockchainError::ConfirmationTimeout(attempts) => AuthError::ConfirmationTimeout(attempts),
            BlockchainError::Reverted(tx_hash) => AuthError::Reverted(tx_hash),
            BlockchainError::Wallet(reason) => AuthError::Wallet(reason),
            BlockchainError::Connect { .. }
            | BlockchainError::Rpc(_)
            | BlockchainError::Timeout(_)
            | BlockchainError::ChainMismatch { .. }
            | BlockchainError::NotAvailable(_) => AuthError::NodeConnectivity(err.to_string()),
        }
    }
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Malformed {
                endpoint,
                status,
                reason,
            } => AuthError::MalformedResponse {
                endpoint: endpoint.to_string(),
                status,
                reason,
            },
            ApiError::Url(_) | ApiError::Transport { .. } => AuthError::Api(err.to_string()),
        }
    }
}
