//! Chain-specific types and error definitions.

use alloy::primitives::TxHash;
use alloy::rpc::types::TransactionReceipt;
use serde::Serialize;
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// The node could not be reached.
    #[error("Connection to {endpoint} failed: {reason}")]
    Connect { endpoint: String, reason: String },

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The node refused to unlock the account.
    #[error("Unlock of {account} failed: {reason}")]
    Unlock { account: String, reason: String },

    /// ABI artifact could not be read or parsed.
    #[error("Failed to load ABI from {path}: {reason}")]
    Artifact { path: String, reason: String },

    /// Encoding arguments or decoding outputs failed.
    #[error("ABI error: {0}")]
    Abi(String),

    /// Transaction receipt did not appear within the poll budget.
    #[error("Transaction not mined after {0} receipt queries")]
    ConfirmationTimeout(u32),

    /// Transaction was reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(TxHash),

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// No account available to sign with.
    #[error("Blockchain not available: {0}")]
    NotAvailable(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// The parts of a transaction receipt the client reports on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptSummary {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub success: bool,
}

impl From<&TransactionReceipt> for ReceiptSummary {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            success: receipt.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(4u64);
        assert_eq!(chain_id.0, 4);
        assert_eq!(u64::from(chain_id), 4);
    }

    #[test]
    fn test_error_display() {
        let err = BlockchainError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");

        let err = BlockchainError::ConfirmationTimeout(30);
        assert_eq!(err.to_string(), "Transaction not mined after 30 receipt queries");

        let err = BlockchainError::Unlock {
            account: "0xabc".to_string(),
            reason: "could not decrypt key with given password".to_string(),
        };
        assert!(err.to_string().contains("could not decrypt"));
    }
}
