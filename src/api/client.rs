//! HTTP client for the Hydro API.

use alloy::primitives::Address;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::api::types::{
    ApiCredentials, ApiError, ApiResult, ChallengeResponse, HydroAddressId, VerificationResponse,
};
use crate::config::ApiConfig;

const CHALLENGE: &str = "challenge";
const AUTHENTICATE: &str = "authenticate";
const WHITELIST: &str = "whitelist";

/// The remote calls the authentication flow depends on.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// One-time registration of `address`; yields its Hydro address id.
    async fn whitelist(&self, address: Address) -> ApiResult<HydroAddressId>;

    /// Ask for the values to submit on-chain.
    async fn request_challenge(&self, id: &HydroAddressId) -> ApiResult<ChallengeResponse>;

    /// Ask whether the on-chain authentication was accepted.
    async fn check_authenticated(&self, id: &HydroAddressId) -> ApiResult<VerificationResponse>;
}

/// reqwest-backed Hydro API client.
#[derive(Debug, Clone)]
pub struct HydroApiClient {
    client: Client,
    base_url: String,
    credentials: ApiCredentials,
}

impl HydroApiClient {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| ApiError::Url(e.to_string()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Url(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            credentials: ApiCredentials::new(config.username.clone(), config.key.clone()),
        })
    }

    pub fn credentials(&self) -> &ApiCredentials {
        &self.credentials
    }

    /// POST the credential body and return status plus raw text.
    async fn post(
        &self,
        endpoint: &'static str,
        path: &str,
        id: Option<&HydroAddressId>,
    ) -> ApiResult<(StatusCode, String)> {
        let url = format!("{}/{}", self.base_url, path);
        let mut request = self.client.post(&url).json(&self.credentials);
        if let Some(id) = id {
            request = request.query(&[("hydro_address_id", id.as_str())]);
        }

        let transport = |e: reqwest::Error| ApiError::Transport {
            endpoint,
            reason: e.to_string(),
        };
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if status.is_success() {
            tracing::debug!(endpoint, status = status.as_u16(), "Hydro API responded");
        } else {
            tracing::warn!(endpoint, status = status.as_u16(), body = %body, "Hydro API returned non-success status");
        }
        Ok((status, body))
    }
}

#[async_trait]
impl AuthApi for HydroApiClient {
    async fn whitelist(&self, address: Address) -> ApiResult<HydroAddressId> {
        let (status, body) = self
            .post(WHITELIST, &format!("{}/{}", WHITELIST, address), None)
            .await?;
        let malformed = |reason: String| ApiError::Malformed {
            endpoint: WHITELIST,
            status: status.as_u16(),
            reason,
        };

        let value: Value = serde_json::from_str(&body).map_err(|e| malformed(e.to_string()))?;
        let id = HydroAddressId::from_json(&value)
            .ok_or_else(|| malformed(format!("no hydro_address_id in {}", body)))?;

        tracing::info!(address = %address, hydro_address_id = %id, "Address whitelisted");
        Ok(id)
    }

    async fn request_challenge(&self, id: &HydroAddressId) -> ApiResult<ChallengeResponse> {
        let (status, body) = self.post(CHALLENGE, CHALLENGE, Some(id)).await?;

        let challenge: ChallengeResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::Malformed {
                endpoint: CHALLENGE,
                status: status.as_u16(),
                reason: e.to_string(),
            })?;

        tracing::info!(
            hydro_address_id = %id,
            amount = %challenge.amount,
            challenge = %challenge.challenge,
            partner_id = %challenge.partner_id,
            "Challenge received"
        );
        Ok(challenge)
    }

    async fn check_authenticated(&self, id: &HydroAddressId) -> ApiResult<VerificationResponse> {
        let (status, body) = self.post(AUTHENTICATE, AUTHENTICATE, Some(id)).await?;
        Ok(VerificationResponse {
            status: status.as_u16(),
            body,
        })
    }
}
