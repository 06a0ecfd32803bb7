//! Transaction confirmation monitoring.
//!
//! # Responsibilities
//! - Poll for the receipt of a submitted transaction
//! - Back off exponentially between empty answers
//! - Give up after a bounded number of attempts or a deadline

use alloy::primitives::TxHash;
use tokio::time::{sleep, timeout};

use crate::blockchain::gateway::ChainGateway;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ReceiptSummary};
use crate::resilience::RetryPolicy;

/// Wait until the node reports a receipt for `tx_hash`.
///
/// The first query is immediate. Transport errors count as an attempt and
/// are retried like an empty answer; a reverted receipt is an error.
pub async fn wait_for_receipt<G>(
    gateway: &G,
    tx_hash: TxHash,
    policy: &RetryPolicy,
) -> BlockchainResult<ReceiptSummary>
where
    G: ChainGateway + ?Sized,
{
    let mut attempts = 0u32;

    let result = timeout(policy.deadline, async {
        loop {
            attempts += 1;

            match gateway.transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => {
                    if !receipt.success {
                        return Err(BlockchainError::Reverted(tx_hash));
                    }
                    tracing::info!(
                        tx_hash = %tx_hash,
                        block_number = ?receipt.block_number,
                        gas_used = receipt.gas_used,
                        attempts,
                        "Transaction mined"
                    );
                    return Ok(receipt);
                }
                Ok(None) => {}
                Err(e @ (BlockchainError::Rpc(_) | BlockchainError::Timeout(_))) => {
                    if attempts >= policy.max_attempts {
                        return Err(e);
                    }
                    tracing::warn!(tx_hash = %tx_hash, error = %e, "Receipt query failed");
                }
                Err(e) => return Err(e),
            }

            if attempts >= policy.max_attempts {
                return Err(BlockchainError::ConfirmationTimeout(attempts));
            }

            let delay = policy.delay_after(attempts);
            tracing::info!(
                tx_hash = %tx_hash,
                attempt = attempts,
                delay_ms = delay.as_millis() as u64,
                "Waiting for transaction to be mined"
            );
            sleep(delay).await;
        }
    })
    .await;

    match result {
        Ok(outcome) => outcome,
        Err(_) => Err(BlockchainError::ConfirmationTimeout(attempts)),
    }
}
