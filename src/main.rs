//! Hydro Raindrop authentication client.
//!
//! # Flow Overview
//!
//! ```text
//!   abi.json ──▶ ContractBinding ─┐
//!                                 ├─▶ ContractHandle ──▶ unlock ──▶ authenticate(tx) ──▶ receipt poll
//!   node endpoint ──▶ NodeClient ─┘                          ▲                                │
//!                                                            │                                ▼
//!   Hydro API ◀── whitelist (once) ◀── challenge ────────────┘                     authenticate check
//!                                                                                         │
//!                                                              "Authentication Successful" / "Failed"
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use alloy::primitives::Address;
use clap::{Parser, Subcommand};
use serde_json::Value;

use hydro_raindrop::api::{AuthApi, HydroAddressId, HydroApiClient};
use hydro_raindrop::auth::{
    write_outcome, write_outcome_json, AuthError, AuthFlow, AuthReport, FlowSettings,
    UnlockCredential,
};
use hydro_raindrop::blockchain::contract::format_value;
use hydro_raindrop::blockchain::{
    wait_for_receipt, ChainGateway, ContractBinding, ContractHandle, NodeClient, Wallet,
};
use hydro_raindrop::config::loader::{apply_env_overrides, read_config};
use hydro_raindrop::config::{validate_config, ConfigError, LoggingConfig, RaindropConfig, SignerMode};
use hydro_raindrop::observability::init_logging;
use hydro_raindrop::resilience::RetryPolicy;

/// Testnet faucet method on the Hydro contract.
const FAUCET_METHOD: &str = "getMoreTokens";

#[derive(Parser)]
#[command(name = "hydro-raindrop")]
#[command(about = "Authenticate an Ethereum account with the Hydro Raindrop API", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "raindrop.toml")]
    config: PathBuf,

    /// Override `node.endpoint`.
    #[arg(long)]
    node_endpoint: Option<String>,

    /// Override `contract.address`.
    #[arg(long)]
    contract_address: Option<String>,

    /// Override `account.id`.
    #[arg(long)]
    account_id: Option<String>,

    /// Override `api.hydro_address_id`.
    #[arg(long)]
    hydro_address_id: Option<String>,

    /// Override `api.base_url`.
    #[arg(long)]
    api_base_url: Option<String>,

    /// Print the authentication outcome as JSON.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Run the full Raindrop authentication (default)
    Authenticate,
    /// Whitelist the account address and print its hydro_address_id
    Whitelist,
    /// Call a read-only contract method and print its outputs
    Call {
        method: String,
        /// Arguments as JSON literals; anything else is passed as a string
        args: Vec<String>,
    },
    /// Request testnet tokens from the contract faucet
    Faucet,
}

impl Cli {
    fn apply_overrides(&self, config: &mut RaindropConfig) {
        if let Some(v) = &self.node_endpoint {
            config.node.endpoint = v.clone();
        }
        if let Some(v) = &self.contract_address {
            config.contract.address = v.clone();
        }
        if let Some(v) = &self.account_id {
            config.account.id = Some(v.clone());
        }
        if let Some(v) = &self.hydro_address_id {
            config.api.hydro_address_id = Some(v.clone());
        }
        if let Some(v) = &self.api_base_url {
            config.api.base_url = v.clone();
        }
    }
}

fn load(cli: &Cli) -> Result<RaindropConfig, ConfigError> {
    let mut config = read_config(&cli.config)?;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    cli.apply_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load(&cli) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&LoggingConfig::default());
            tracing::error!(path = %cli.config.display(), error = %e, "Invalid configuration");
            return ExitCode::from(2);
        }
    };
    init_logging(&config.logging);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        node = %config.node.endpoint,
        contract = %config.contract.address,
        api = %config.api.base_url,
        "hydro-raindrop starting"
    );

    let command = cli.command.clone().unwrap_or(Commands::Authenticate);
    tokio::select! {
        code = run(command, &config, cli.json) => code,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, abandoning the current step");
            ExitCode::from(130)
        }
    }
}

async fn run(command: Commands, config: &RaindropConfig, json: bool) -> ExitCode {
    let result = match command {
        Commands::Authenticate => return authenticate(config, json).await,
        Commands::Whitelist => whitelist(config).await,
        Commands::Call { method, args } => call(config, &method, &args).await,
        Commands::Faucet => faucet(config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// A bound contract handle plus the account that signs for it.
struct Session {
    handle: ContractHandle,
    account: Address,
}

async fn open_session(config: &RaindropConfig) -> Result<Session, AuthError> {
    let contract_address: Address = config
        .contract
        .address
        .trim()
        .parse::<Address>()
        .map_err(|e| AuthError::Contract(format!("contract.address: {}", e)))?;
    let binding = ContractBinding::from_artifact(Path::new(&config.contract.abi_path), contract_address)?;

    let wallet = match config.account.signer {
        SignerMode::Local => Some(Wallet::from_env()?),
        SignerMode::Node => None,
    };

    let client = NodeClient::connect(&config.node, wallet.as_ref()).await?;
    if let Some(chain_id) = config.node.chain_id {
        client.verify_chain_id(chain_id).await?;
    }

    let account = match (&wallet, &config.account.id) {
        (Some(wallet), configured) => {
            if let Some(id) = configured {
                if id.trim().parse::<Address>().ok() != Some(wallet.address()) {
                    tracing::warn!(
                        configured = %id,
                        signer = %wallet.address(),
                        "account.id does not match the local key, using the key's address"
                    );
                }
            }
            wallet.address()
        }
        (None, Some(id)) => id
            .trim()
            .parse::<Address>()
            .map_err(|e| AuthError::Wallet(format!("account.id: {}", e)))?,
        (None, None) => client.default_account().await?,
    };

    tracing::info!(account = %account, contract = %contract_address, "Session ready");
    Ok(Session {
        handle: ContractHandle::new(client, binding),
        account,
    })
}

fn unlock_credential(config: &RaindropConfig) -> Option<UnlockCredential> {
    match config.account.signer {
        SignerMode::Node => Some(UnlockCredential {
            secret: config.account.secret.clone(),
            duration_secs: config.account.unlock_duration_secs,
        }),
        SignerMode::Local => None,
    }
}

async fn run_flow(config: &RaindropConfig) -> Result<AuthReport, AuthError> {
    let session = open_session(config).await?;
    let api = HydroApiClient::new(&config.api)?;
    let settings = FlowSettings {
        account: session.account,
        unlock: unlock_credential(config),
        hydro_address_id: config.api.hydro_address_id.as_deref().map(HydroAddressId::from),
        poll: RetryPolicy::from(&config.confirmation),
    };
    AuthFlow::new(&session.handle, &api, settings).run().await
}

async fn authenticate(config: &RaindropConfig, json: bool) -> ExitCode {
    let result = run_flow(config).await;

    match &result {
        Ok(report) => tracing::info!(tx_hash = %report.tx_hash, "Authentication confirmed"),
        Err(e) => tracing::error!(error = %e, "Authentication did not succeed"),
    }

    let mut stdout = std::io::stdout();
    let written = if json {
        write_outcome_json(&mut stdout, &result)
    } else {
        write_outcome(&mut stdout, &result)
    };
    if let Err(e) = written {
        tracing::error!(error = %e, "Failed to write result");
    }

    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn whitelist(config: &RaindropConfig) -> Result<(), AuthError> {
    let session = open_session(config).await?;
    let api = HydroApiClient::new(&config.api)?;
    let id = api.whitelist(session.account).await?;
    println!("hydro_address_id: {}", id);
    Ok(())
}

async fn call(config: &RaindropConfig, method: &str, args: &[String]) -> Result<(), AuthError> {
    let session = open_session(config).await?;
    let args: Vec<Value> = args.iter().map(|a| parse_cli_arg(a)).collect();

    let outputs = session.handle.call(method, &args).await?;
    for value in &outputs {
        println!("{}", format_value(value));
    }
    Ok(())
}

async fn faucet(config: &RaindropConfig) -> Result<(), AuthError> {
    let session = open_session(config).await?;
    if let Some(unlock) = unlock_credential(config) {
        session
            .handle
            .unlock_account(session.account, &unlock.secret, unlock.duration_secs)
            .await?;
    }

    let tx_hash = session.handle.transact(session.account, FAUCET_METHOD, &[]).await?;
    println!("Transaction Hash: {}", tx_hash);

    let receipt = wait_for_receipt(&session.handle, tx_hash, &RetryPolicy::from(&config.confirmation)).await?;
    println!(
        "Transaction Mined! (block {})",
        receipt.block_number.map(|b| b.to_string()).unwrap_or_else(|| "pending".to_string())
    );
    Ok(())
}

/// JSON literals stay typed; bare words such as addresses become strings.
fn parse_cli_arg(arg: &str) -> Value {
    serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.to_string()))
}
