//! Blockchain node client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the node over HTTP, WebSocket or IPC
//! - Unlock node-managed accounts
//! - Submit transactions and look up receipts
//! - Bound every RPC call with a timeout

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::transports::{RpcError, TransportErrorKind};
use std::borrow::Cow;
use std::fmt::Display;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};
use crate::blockchain::wallet::Wallet;
use crate::config::NodeConfig;

/// Node RPC client wrapper.
#[derive(Clone)]
pub struct NodeClient {
    provider: Arc<dyn Provider + Send + Sync>,
    endpoint: String,
    rpc_timeout_secs: u64,
}

impl NodeClient {
    /// Connect to the node named by `config.endpoint`.
    ///
    /// With a `wallet`, transactions are signed locally and sent raw;
    /// otherwise the node signs them for an unlocked account.
    pub async fn connect(config: &NodeConfig, wallet: Option<&Wallet>) -> BlockchainResult<Self> {
        let endpoint = config.endpoint.clone();
        let connect_error = |reason: String| BlockchainError::Connect {
            endpoint: endpoint.clone(),
            reason,
        };
        let deadline = Duration::from_secs(config.rpc_timeout_secs);

        let provider: Arc<dyn Provider + Send + Sync> = match wallet {
            Some(wallet) => {
                let fut = ProviderBuilder::new()
                    .wallet(wallet.to_network_wallet())
                    .connect(&endpoint);
                let provider = timeout(deadline, fut)
                    .await
                    .map_err(|_| connect_error("timed out".to_string()))?
                    .map_err(|e| connect_error(e.to_string()))?;
                Arc::new(provider) as Arc<dyn Provider + Send + Sync>
            }
            None => {
                let fut = ProviderBuilder::new().connect(&endpoint);
                let provider = timeout(deadline, fut)
                    .await
                    .map_err(|_| connect_error("timed out".to_string()))?
                    .map_err(|e| connect_error(e.to_string()))?;
                Arc::new(provider) as Arc<dyn Provider + Send + Sync>
            }
        };

        tracing::info!(
            endpoint = %endpoint,
            local_signer = wallet.is_some(),
            "Connected to blockchain node"
        );

        Ok(Self {
            provider,
            endpoint,
            rpc_timeout_secs: config.rpc_timeout_secs,
        })
    }

    async fn rpc<F, T, E>(&self, op: &'static str, fut: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: Display,
    {
        match timeout(Duration::from_secs(self.rpc_timeout_secs), fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(op, error = %e, "RPC error");
                Err(BlockchainError::Rpc(format!("{}: {}", op, e)))
            }
            Err(_) => {
                tracing::warn!(op, "RPC timeout");
                Err(BlockchainError::Timeout(self.rpc_timeout_secs))
            }
        }
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.rpc("eth_chainId", self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    /// Verify the connected chain ID matches `expected`.
    pub async fn verify_chain_id(&self, expected: u64) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != expected {
            return Err(BlockchainError::ChainMismatch {
                expected,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Accounts managed by the node.
    pub async fn accounts(&self) -> BlockchainResult<Vec<Address>> {
        self.rpc("eth_accounts", self.provider.get_accounts()).await
    }

    /// The node's first account, used when none is configured.
    pub async fn default_account(&self) -> BlockchainResult<Address> {
        self.accounts().await?.into_iter().next().ok_or_else(|| {
            BlockchainError::NotAvailable(format!("node at {} manages no accounts", self.endpoint))
        })
    }

    /// Unlock `account` for signing via `personal_unlockAccount`.
    pub async fn unlock_account(
        &self,
        account: Address,
        secret: &str,
        duration_secs: Option<u64>,
    ) -> BlockchainResult<()> {
        let unlock_error = |reason: String| BlockchainError::Unlock {
            account: account.to_string(),
            reason,
        };

        let params = serde_json::value::to_raw_value(&(account, secret, duration_secs))
            .map_err(|e| unlock_error(e.to_string()))?;
        let fut = self
            .provider
            .raw_request_dyn(Cow::Borrowed("personal_unlockAccount"), &params);

        let raw = match timeout(Duration::from_secs(self.rpc_timeout_secs), fut).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => return Err(classify_unlock_error(e, unlock_error)),
            Err(_) => return Err(BlockchainError::Timeout(self.rpc_timeout_secs)),
        };

        let unlocked: bool =
            serde_json::from_str(raw.get()).map_err(|e| unlock_error(e.to_string()))?;
        if !unlocked {
            return Err(unlock_error("node refused to unlock".to_string()));
        }

        tracing::info!(account = %account, "Account unlocked");
        Ok(())
    }

    /// Execute a read-only call.
    pub async fn call(&self, to: Address, data: Bytes) -> BlockchainResult<Bytes> {
        let tx = TransactionRequest::default().with_to(to).with_input(data);
        self.rpc("eth_call", self.provider.call(tx)).await
    }

    /// Submit a state-changing transaction and return its hash.
    pub async fn send_transaction(
        &self,
        from: Address,
        to: Address,
        data: Bytes,
    ) -> BlockchainResult<TxHash> {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_input(data);
        let pending = self
            .rpc("eth_sendTransaction", self.provider.send_transaction(tx))
            .await?;
        Ok(*pending.tx_hash())
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        self.rpc(
            "eth_getTransactionReceipt",
            self.provider.get_transaction_receipt(tx_hash),
        )
        .await
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Error responses from the node are unlock refusals; anything else is transport.
fn classify_unlock_error<F>(err: RpcError<TransportErrorKind>, unlock_error: F) -> BlockchainError
where
    F: Fn(String) -> BlockchainError,
{
    match err.as_error_resp() {
        Some(payload) => unlock_error(payload.message.to_string()),
        None => BlockchainError::Rpc(format!("personal_unlockAccount: {}", err)),
    }
}

impl std::fmt::Debug for NodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeClient")
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.rpc_timeout_secs)
            .finish()
    }
}
