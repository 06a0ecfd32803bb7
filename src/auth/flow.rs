//! The Raindrop authentication flow.
//!
//! # Stages
//! ```text
//! Unauthenticated
//!     → unlock account (node signer only)
//!     → whitelist address (only when no hydro_address_id is known)
//! ChallengeRequested
//!     → submit authenticate(amount, challenge, partner_id)
//! TransactionSubmitted
//!     → poll for receipt (bounded, backed off)
//! TransactionMined
//!     → ask the API whether authentication succeeded
//! VerificationChecked
//! ```
//!
//! Each transition is a single forward step. Any failure stops the flow
//! before the next external call.

use alloy::primitives::{Address, TxHash};
use serde::Serialize;
use std::fmt;

use crate::api::{AuthApi, ChallengeResponse, HydroAddressId};
use crate::auth::error::AuthError;
use crate::blockchain::{wait_for_receipt, ChainGateway, ReceiptSummary};
use crate::resilience::RetryPolicy;

/// Contract method carrying the challenge on-chain.
pub const AUTHENTICATE_METHOD: &str = "authenticate";

/// Progress of one authentication attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuthStage {
    Unauthenticated,
    ChallengeRequested,
    TransactionSubmitted,
    TransactionMined,
    VerificationChecked,
}

impl fmt::Display for AuthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthStage::Unauthenticated => "unauthenticated",
            AuthStage::ChallengeRequested => "challenge-requested",
            AuthStage::TransactionSubmitted => "transaction-submitted",
            AuthStage::TransactionMined => "transaction-mined",
            AuthStage::VerificationChecked => "verification-checked",
        };
        f.write_str(name)
    }
}

/// Secret used to unlock a node-managed account.
#[derive(Clone)]
pub struct UnlockCredential {
    pub secret: String,
    pub duration_secs: Option<u64>,
}

impl fmt::Debug for UnlockCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnlockCredential")
            .field("secret", &"<redacted>")
            .field("duration_secs", &self.duration_secs)
            .finish()
    }
}

/// Inputs of one flow run.
#[derive(Debug, Clone)]
pub struct FlowSettings {
    /// Account that sends the authenticate transaction.
    pub account: Address,
    /// `None` when transactions are signed locally.
    pub unlock: Option<UnlockCredential>,
    /// Whitelisting runs first when unset.
    pub hydro_address_id: Option<HydroAddressId>,
    pub poll: RetryPolicy,
}

/// What a successful run established.
#[derive(Debug, Clone, Serialize)]
pub struct AuthReport {
    pub account: Address,
    pub hydro_address_id: HydroAddressId,
    pub challenge: ChallengeResponse,
    pub tx_hash: TxHash,
    pub receipt: ReceiptSummary,
    pub stage: AuthStage,
}

/// Drives a node and the Hydro API through one authentication attempt.
pub struct AuthFlow<'a, G: ?Sized, A: ?Sized> {
    gateway: &'a G,
    api: &'a A,
    settings: FlowSettings,
}

impl<'a, G, A> AuthFlow<'a, G, A>
where
    G: ChainGateway + ?Sized,
    A: AuthApi + ?Sized,
{
    pub fn new(gateway: &'a G, api: &'a A, settings: FlowSettings) -> Self {
        Self {
            gateway,
            api,
            settings,
        }
    }

    fn advance(&self, from: AuthStage, to: AuthStage) -> AuthStage {
        tracing::info!(from = %from, to = %to, account = %self.settings.account, "Stage transition");
        to
    }

    /// Resolve the Hydro address id, whitelisting the account if needed.
    pub async fn hydro_address_id(&self) -> Result<HydroAddressId, AuthError> {
        match &self.settings.hydro_address_id {
            Some(id) => Ok(id.clone()),
            None => {
                tracing::info!(account = %self.settings.account, "No hydro_address_id configured, whitelisting");
                Ok(self.api.whitelist(self.settings.account).await?)
            }
        }
    }

    /// Run the whole flow. A verification body other than `true` is
    /// reported as [`AuthError::VerificationMismatch`].
    pub async fn run(&self) -> Result<AuthReport, AuthError> {
        let account = self.settings.account;
        let mut stage = AuthStage::Unauthenticated;

        match &self.settings.unlock {
            Some(unlock) => {
                self.gateway
                    .unlock_account(account, &unlock.secret, unlock.duration_secs)
                    .await?;
            }
            None => tracing::debug!(account = %account, "Local signer, skipping unlock"),
        }

        let hydro_address_id = self.hydro_address_id().await?;
        let challenge = self.api.request_challenge(&hydro_address_id).await?;
        stage = self.advance(stage, AuthStage::ChallengeRequested);

        let tx_hash = self
            .gateway
            .transact(account, AUTHENTICATE_METHOD, &challenge.contract_args())
            .await?;
        stage = self.advance(stage, AuthStage::TransactionSubmitted);

        let receipt = wait_for_receipt(self.gateway, tx_hash, &self.settings.poll).await?;
        stage = self.advance(stage, AuthStage::TransactionMined);

        let verification = self.api.check_authenticated(&hydro_address_id).await?;
        stage = self.advance(stage, AuthStage::VerificationChecked);

        if !verification.is_authenticated() {
            return Err(AuthError::VerificationMismatch {
                status: verification.status,
                body: verification.body,
            });
        }

        Ok(AuthReport {
            account,
            hydro_address_id,
            challenge,
            tx_hash,
            receipt,
            stage,
        })
    }
}
