//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the raindrop client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RaindropConfig {
    /// Blockchain node connection settings.
    pub node: NodeConfig,

    /// Contract binding (address and ABI artifact).
    pub contract: ContractConfig,

    /// Account used to sign the authentication transaction.
    pub account: AccountConfig,

    /// Hydro API settings.
    pub api: ApiConfig,

    /// Receipt polling policy.
    pub confirmation: ConfirmationConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Blockchain node configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Node endpoint: `http(s)://`, `ws(s)://` or a path to a geth IPC socket.
    pub endpoint: String,

    /// Per-call RPC timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Expected chain ID. Checked at startup when set.
    pub chain_id: Option<u64>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8545".to_string(),
            rpc_timeout_secs: 10,
            chain_id: None,
        }
    }
}

/// Contract binding configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Address of the deployed Hydro contract.
    pub address: String,

    /// Path to the JSON ABI artifact.
    pub abi_path: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            abi_path: "abi.json".to_string(),
        }
    }
}

/// Where transactions get signed.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SignerMode {
    /// The node holds the key; the account is unlocked with `account.secret`.
    #[default]
    Node,
    /// Sign locally with the key from `HYDRO_PRIVATE_KEY`.
    Local,
}

/// Signing account configuration.
#[derive(Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AccountConfig {
    /// Account address. The node's first account is used when unset.
    pub id: Option<String>,

    /// Password used to unlock the account on the node.
    pub secret: String,

    /// Unlock window in seconds. The node default applies when unset.
    pub unlock_duration_secs: Option<u64>,

    /// Signing mode.
    pub signer: SignerMode,
}

impl std::fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountConfig")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .field("unlock_duration_secs", &self.unlock_duration_secs)
            .field("signer", &self.signer)
            .finish()
    }
}

/// Hydro API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the sandbox or production server.
    pub base_url: String,

    /// API username.
    pub username: String,

    /// API key.
    pub key: String,

    /// Hydro address id from whitelisting. Whitelisting runs first when unset.
    pub hydro_address_id: Option<String>,

    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            username: String::new(),
            key: String::new(),
            hydro_address_id: None,
            timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("key", &"<redacted>")
            .field("hydro_address_id", &self.hydro_address_id)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Receipt polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Delay after the first empty receipt, in milliseconds.
    pub initial_interval_ms: u64,

    /// Upper bound for the backed-off delay, in milliseconds.
    pub max_interval_ms: u64,

    /// Maximum number of receipt queries.
    pub max_attempts: u32,

    /// Overall deadline for the poll, in seconds.
    pub deadline_secs: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: 5_000,
            max_interval_ms: 60_000,
            max_attempts: 30,
            deadline_secs: 900,
        }
    }
}

impl ConfirmationConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "hydro_raindrop=info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}
