//! The contract handle the authentication flow talks to.

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, TxHash};
use async_trait::async_trait;
use serde_json::Value;

use crate::blockchain::client::NodeClient;
use crate::blockchain::contract::ContractBinding;
use crate::blockchain::types::{BlockchainResult, ReceiptSummary};

/// Node operations needed to drive a contract, bound to one contract address.
#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Authorize the node to sign for `account`.
    async fn unlock_account(
        &self,
        account: Address,
        secret: &str,
        duration_secs: Option<u64>,
    ) -> BlockchainResult<()>;

    /// Value-returning call.
    async fn call(&self, method: &str, args: &[Value]) -> BlockchainResult<Vec<DynSolValue>>;

    /// State-changing submission from `from`.
    async fn transact(&self, from: Address, method: &str, args: &[Value])
        -> BlockchainResult<TxHash>;

    /// `None` while the transaction is still pending.
    async fn transaction_receipt(&self, tx_hash: TxHash)
        -> BlockchainResult<Option<ReceiptSummary>>;
}

/// A live contract handle: a node connection plus a bound interface.
#[derive(Debug, Clone)]
pub struct ContractHandle {
    client: NodeClient,
    binding: ContractBinding,
}

impl ContractHandle {
    pub fn new(client: NodeClient, binding: ContractBinding) -> Self {
        Self { client, binding }
    }

    pub fn client(&self) -> &NodeClient {
        &self.client
    }

    pub fn binding(&self) -> &ContractBinding {
        &self.binding
    }
}

#[async_trait]
impl ChainGateway for ContractHandle {
    async fn unlock_account(
        &self,
        account: Address,
        secret: &str,
        duration_secs: Option<u64>,
    ) -> BlockchainResult<()> {
        self.client.unlock_account(account, secret, duration_secs).await
    }

    async fn call(&self, method: &str, args: &[Value]) -> BlockchainResult<Vec<DynSolValue>> {
        let data = self.binding.encode_call(method, args)?;
        let output = self.client.call(self.binding.address(), data).await?;
        self.binding.decode_output(method, args.len(), &output)
    }

    async fn transact(
        &self,
        from: Address,
        method: &str,
        args: &[Value],
    ) -> BlockchainResult<TxHash> {
        let data = self.binding.encode_call(method, args)?;
        let tx_hash = self
            .client
            .send_transaction(from, self.binding.address(), data)
            .await?;

        tracing::info!(
            tx_hash = %tx_hash,
            method,
            contract = %self.binding.address(),
            "Transaction submitted"
        );
        Ok(tx_hash)
    }

    async fn transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<ReceiptSummary>> {
        let receipt = self.client.get_transaction_receipt(tx_hash).await?;
        Ok(receipt.as_ref().map(ReceiptSummary::from))
    }
}
