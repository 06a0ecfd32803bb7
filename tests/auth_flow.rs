//! End-to-end authentication flow against scripted node and API fakes.

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, TxHash};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use hydro_raindrop::api::{
    ApiError, ApiResult, AuthApi, ChallengeResponse, HydroAddressId, HydroApiClient,
    VerificationResponse,
};
use hydro_raindrop::auth::{
    write_outcome, AuthError, AuthFlow, AuthStage, FlowSettings, UnlockCredential,
    AUTHENTICATE_METHOD,
};
use hydro_raindrop::blockchain::{BlockchainError, BlockchainResult, ChainGateway, ReceiptSummary};
use hydro_raindrop::config::ApiConfig;
use hydro_raindrop::resilience::RetryPolicy;

mod common;

const TX_HASH: TxHash = TxHash::new([0x5a; 32]);

fn account() -> Address {
    Address::repeat_byte(0x11)
}

/// Node fake: records every call and mines after `pending` empty receipt queries.
struct FakeNode {
    unlock_fails: bool,
    pending: u32,
    unlocks: Mutex<Vec<(Address, String)>>,
    transactions: Mutex<Vec<(Address, String, Vec<Value>)>>,
    receipt_queries: Mutex<Vec<Instant>>,
}

impl FakeNode {
    fn new(pending: u32) -> Self {
        Self {
            unlock_fails: false,
            pending,
            unlocks: Mutex::new(Vec::new()),
            transactions: Mutex::new(Vec::new()),
            receipt_queries: Mutex::new(Vec::new()),
        }
    }

    fn locked() -> Self {
        Self {
            unlock_fails: true,
            ..Self::new(0)
        }
    }

    fn unlock_count(&self) -> usize {
        self.unlocks.lock().unwrap().len()
    }

    fn transactions(&self) -> Vec<(Address, String, Vec<Value>)> {
        self.transactions.lock().unwrap().clone()
    }

    fn receipt_queries(&self) -> Vec<Instant> {
        self.receipt_queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainGateway for FakeNode {
    async fn unlock_account(
        &self,
        account: Address,
        secret: &str,
        _duration_secs: Option<u64>,
    ) -> BlockchainResult<()> {
        self.unlocks.lock().unwrap().push((account, secret.to_string()));
        if self.unlock_fails {
            return Err(BlockchainError::Unlock {
                account: account.to_string(),
                reason: "could not decrypt key with given password".to_string(),
            });
        }
        Ok(())
    }

    async fn call(&self, _method: &str, _args: &[Value]) -> BlockchainResult<Vec<DynSolValue>> {
        Ok(Vec::new())
    }

    async fn transact(
        &self,
        from: Address,
        method: &str,
        args: &[Value],
    ) -> BlockchainResult<TxHash> {
        self.transactions
            .lock()
            .unwrap()
            .push((from, method.to_string(), args.to_vec()));
        Ok(TX_HASH)
    }

    async fn transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<ReceiptSummary>> {
        let mut queries = self.receipt_queries.lock().unwrap();
        queries.push(Instant::now());
        if queries.len() as u32 <= self.pending {
            return Ok(None);
        }
        Ok(Some(ReceiptSummary {
            tx_hash,
            block_number: Some(1234),
            gas_used: 48_000,
            success: true,
        }))
    }
}

/// API fake with a fixed challenge and verification body.
struct FakeApi {
    challenge: Option<ChallengeResponse>,
    verification_body: String,
    whitelisted_id: &'static str,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    fn new(verification_body: &str) -> Self {
        Self {
            challenge: Some(ChallengeResponse {
                amount: json!(10),
                challenge: json!("abc"),
                partner_id: json!("p1"),
            }),
            verification_body: verification_body.to_string(),
            whitelisted_id: "77",
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthApi for FakeApi {
    async fn whitelist(&self, address: Address) -> ApiResult<HydroAddressId> {
        self.calls.lock().unwrap().push(format!("whitelist {}", address));
        Ok(HydroAddressId::from(self.whitelisted_id))
    }

    async fn request_challenge(&self, id: &HydroAddressId) -> ApiResult<ChallengeResponse> {
        self.calls.lock().unwrap().push(format!("challenge {}", id));
        self.challenge.clone().ok_or_else(|| ApiError::Malformed {
            endpoint: "challenge",
            status: 200,
            reason: "missing field `partner_id`".to_string(),
        })
    }

    async fn check_authenticated(&self, id: &HydroAddressId) -> ApiResult<VerificationResponse> {
        self.calls.lock().unwrap().push(format!("authenticate {}", id));
        Ok(VerificationResponse {
            status: 200,
            body: self.verification_body.clone(),
        })
    }
}

fn settings(unlock: bool, hydro_address_id: Option<&str>, max_attempts: u32) -> FlowSettings {
    FlowSettings {
        account: account(),
        unlock: unlock.then(|| UnlockCredential {
            secret: "hunter2".to_string(),
            duration_secs: None,
        }),
        hydro_address_id: hydro_address_id.map(HydroAddressId::from),
        poll: RetryPolicy {
            base: Duration::from_secs(5),
            max_delay: Duration::from_secs(60),
            max_attempts,
            deadline: Duration::from_secs(900),
        },
    }
}

fn rendered(result: &Result<hydro_raindrop::AuthReport, AuthError>) -> String {
    let mut out = Vec::new();
    write_outcome(&mut out, result).unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_successful_authentication() {
    let node = FakeNode::new(0);
    let api = FakeApi::new("true");

    let result = AuthFlow::new(&node, &api, settings(true, Some("3"), 10)).run().await;
    let report = result.as_ref().unwrap();

    assert_eq!(report.tx_hash, TX_HASH);
    assert_eq!(report.stage, AuthStage::VerificationChecked);
    assert_eq!(report.receipt.block_number, Some(1234));
    assert_eq!(node.unlock_count(), 1);
    assert_eq!(api.calls(), vec!["challenge 3", "authenticate 3"]);

    let output = rendered(&result);
    assert!(output.contains(&format!("Transaction Hash: {}", TX_HASH)));
    assert!(output.ends_with("Authentication Successful\n"));
}

#[tokio::test(start_paused = true)]
async fn test_challenge_values_become_transaction_args() {
    let node = FakeNode::new(0);
    let api = FakeApi::new("true");

    AuthFlow::new(&node, &api, settings(true, Some("3"), 10))
        .run()
        .await
        .unwrap();

    let transactions = node.transactions();
    assert_eq!(transactions.len(), 1);
    let (from, method, args) = &transactions[0];
    assert_eq!(*from, account());
    assert_eq!(method, AUTHENTICATE_METHOD);
    assert_eq!(args, &vec![json!(10), json!("abc"), json!("p1")]);
}

#[tokio::test(start_paused = true)]
async fn test_receipt_polled_with_backoff() {
    let node = FakeNode::new(3);
    let api = FakeApi::new("true");

    AuthFlow::new(&node, &api, settings(true, Some("3"), 10))
        .run()
        .await
        .unwrap();

    let queries = node.receipt_queries();
    assert_eq!(queries.len(), 4);
    for pair in queries.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_secs(5));
    }
}

#[tokio::test(start_paused = true)]
async fn test_anything_but_literal_true_fails() {
    for body in ["false", "", "{}", "true\n", "\"true\""] {
        let node = FakeNode::new(0);
        let api = FakeApi::new(body);

        let result = AuthFlow::new(&node, &api, settings(true, Some("3"), 10)).run().await;
        match &result {
            Err(AuthError::VerificationMismatch { body: got, .. }) => assert_eq!(got, body),
            other => panic!("expected mismatch for {:?}, got {:?}", body, other),
        }
        assert_eq!(rendered(&result), "Authentication Failed\n");
    }
}

#[tokio::test(start_paused = true)]
async fn test_unlock_failure_stops_before_challenge() {
    let node = FakeNode::locked();
    let api = FakeApi::new("true");

    let result = AuthFlow::new(&node, &api, settings(true, Some("3"), 10)).run().await;

    assert!(matches!(result, Err(AuthError::Unlock(_))));
    assert!(api.calls().is_empty());
    assert!(node.transactions().is_empty());
    assert!(rendered(&result).starts_with("Authentication Failed: Account unlock failed"));
}

#[tokio::test(start_paused = true)]
async fn test_missing_hydro_address_id_whitelists_first() {
    let node = FakeNode::new(0);
    let api = FakeApi::new("true");

    let report = AuthFlow::new(&node, &api, settings(true, None, 10))
        .run()
        .await
        .unwrap();

    assert_eq!(report.hydro_address_id, HydroAddressId::from("77"));
    assert_eq!(
        api.calls(),
        vec![
            format!("whitelist {}", account()),
            "challenge 77".to_string(),
            "authenticate 77".to_string(),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_local_signer_skips_unlock() {
    let node = FakeNode::new(0);
    let api = FakeApi::new("true");

    AuthFlow::new(&node, &api, settings(false, Some("3"), 10))
        .run()
        .await
        .unwrap();

    assert_eq!(node.unlock_count(), 0);
    assert_eq!(node.transactions().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_malformed_challenge_submits_nothing() {
    let node = FakeNode::new(0);
    let mut api = FakeApi::new("true");
    api.challenge = None;

    let result = AuthFlow::new(&node, &api, settings(true, Some("3"), 10)).run().await;

    assert!(matches!(
        result,
        Err(AuthError::MalformedResponse { ref endpoint, .. }) if endpoint == "challenge"
    ));
    assert!(node.transactions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_unmined_transaction_never_verifies() {
    let node = FakeNode::new(100);
    let api = FakeApi::new("true");

    let result = AuthFlow::new(&node, &api, settings(true, Some("3"), 5)).run().await;

    assert!(matches!(result, Err(AuthError::ConfirmationTimeout(5))));
    assert_eq!(node.receipt_queries().len(), 5);
    assert_eq!(api.calls(), vec!["challenge 3"]);
}

#[tokio::test]
async fn test_flow_against_http_api() {
    let (addr, log) = common::start_recording_backend(|request| {
        if request.path().ends_with("/challenge") {
            (
                200,
                r#"{"amount": 10, "challenge": "abc", "partner_id": "p1"}"#.to_string(),
            )
        } else {
            (200, "true".to_string())
        }
    })
    .await;

    let api = HydroApiClient::new(&ApiConfig {
        base_url: format!("http://{}", addr),
        username: "raindrop-user".to_string(),
        key: "raindrop-key".to_string(),
        hydro_address_id: None,
        timeout_secs: 5,
    })
    .unwrap();
    let node = FakeNode::new(0);

    let report = AuthFlow::new(&node, &api, settings(true, Some("3"), 10))
        .run()
        .await
        .unwrap();

    assert_eq!(report.challenge.partner_id, json!("p1"));
    let requests = log.lock().unwrap().clone();
    let paths: Vec<&str> = requests.iter().map(|r| r.path()).collect();
    assert_eq!(paths, vec!["/challenge", "/authenticate"]);
}
