//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! abi.json
//!     → contract.rs (interface binding, calldata encoding)
//! node endpoint (+ HYDRO_PRIVATE_KEY for local signing)
//!     → wallet.rs (optional local signer)
//!     → client.rs (RPC connection with timeouts, account unlock)
//!     → gateway.rs (contract handle: call / transact / receipt)
//!     → confirmation.rs (bounded receipt polling)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys, account secrets or API keys
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod confirmation;
pub mod contract;
pub mod gateway;
pub mod types;
pub mod wallet;

pub use client::NodeClient;
pub use confirmation::wait_for_receipt;
pub use contract::ContractBinding;
pub use gateway::{ChainGateway, ContractHandle};
pub use types::{BlockchainError, BlockchainResult, ChainId, ReceiptSummary};
pub use wallet::Wallet;
