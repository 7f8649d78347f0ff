//! In-memory fakes for the chain, API and console seams

use crate::api::{SwapApi, TrackEvent};
use crate::chain::{ChainClient, Connect, PendingTransaction, Session, TransactionResult, TxStatus};
use crate::console::Console;
use crate::swap::{BuildMessage, BuildResponse, BuildSender, QuoteResponse, SwapRequest};
use crate::{Error, Result};
use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::time::Instant;

pub const ONE_ETH: u128 = 1_000_000_000_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainCall {
    Balance,
    Nonce,
    Estimate,
    Simulate,
    Submit,
    Receipt,
}

pub struct FakeChain {
    pub balance: U256,
    pub balance_fails: bool,
    pub nonce_fails: bool,
    /// `None` makes estimation fail
    pub estimate: Option<u64>,
    pub simulate_error: Option<String>,
    pub gas_used: u64,
    pub receipts: Mutex<VecDeque<TxStatus>>,
    pub calls: Mutex<Vec<ChainCall>>,
    pub submitted: Mutex<Vec<(Instant, PendingTransaction)>>,
    pub nonce: AtomicU64,
}

impl Default for FakeChain {
    fn default() -> Self {
        Self {
            balance: U256::from(ONE_ETH),
            balance_fails: false,
            nonce_fails: false,
            estimate: Some(500_000),
            simulate_error: None,
            gas_used: 420_000,
            receipts: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
            nonce: AtomicU64::new(0),
        }
    }
}

impl FakeChain {
    /// Status of the next receipt; receipts succeed once the queue is empty
    pub fn queue_receipt(&self, status: TxStatus) {
        self.receipts.lock().unwrap().push_back(status);
    }

    pub fn calls(&self) -> Vec<ChainCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn submitted(&self) -> Vec<PendingTransaction> {
        self.submitted
            .lock()
            .unwrap()
            .iter()
            .map(|(_, tx)| tx.clone())
            .collect()
    }

    pub fn submit_times(&self) -> Vec<Instant> {
        self.submitted.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }

    fn log(&self, call: ChainCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChainClient for FakeChain {
    async fn balance(&self, _address: Address) -> Result<U256> {
        self.log(ChainCall::Balance);
        if self.balance_fails {
            return Err(Error::Rpc("balance unavailable".to_string()));
        }
        Ok(self.balance)
    }

    async fn pending_nonce(&self, _address: Address) -> Result<u64> {
        self.log(ChainCall::Nonce);
        if self.nonce_fails {
            return Err(Error::Rpc("nonce unavailable".to_string()));
        }
        Ok(self.nonce.load(Ordering::SeqCst))
    }

    async fn estimate_gas(&self, _tx: &PendingTransaction) -> Result<u64> {
        self.log(ChainCall::Estimate);
        self.estimate
            .ok_or_else(|| Error::Rpc("gas required exceeds allowance".to_string()))
    }

    async fn simulate(&self, _tx: &PendingTransaction) -> Result<()> {
        self.log(ChainCall::Simulate);
        match &self.simulate_error {
            Some(reason) => Err(Error::Simulation(reason.clone())),
            None => Ok(()),
        }
    }

    async fn submit(&self, tx: &PendingTransaction) -> Result<B256> {
        self.log(ChainCall::Submit);
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push((Instant::now(), tx.clone()));
        self.nonce.fetch_add(1, Ordering::SeqCst);
        Ok(B256::with_last_byte(submitted.len() as u8))
    }

    async fn wait_for_receipt(&self, hash: B256) -> Result<TransactionResult> {
        self.log(ChainCall::Receipt);
        let status = self
            .receipts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(TxStatus::Success);
        Ok(TransactionResult {
            hash,
            status,
            gas_used: self.gas_used,
        })
    }
}

/// Connector with no key configured; counts how often it was asked
#[derive(Default)]
pub struct MissingKey {
    attempts: AtomicUsize,
}

impl MissingKey {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Connect for MissingKey {
    type Chain = FakeChain;

    fn connect(&self) -> Result<Session<FakeChain>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(Error::Wallet(
            "Private key not found: set PRIVATE_KEY in .env".to_string(),
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Quote(SwapRequest),
    Build(SwapRequest),
    Track(TrackEvent),
}

pub struct FakeApi {
    /// `None` makes every quote fail
    pub quote: Option<QuoteResponse>,
    pub build: BuildResponse,
    pub track_fails: bool,
    calls: Mutex<Vec<ApiCall>>,
}

impl FakeApi {
    /// Quotes `amount_out` and builds call data sent from `sender`
    pub fn quoting(amount_out: &str, sender: Address) -> Self {
        let meta = serde_json::json!({ "swaps": { "path": [{ "amount_out": amount_out }] } });
        Self {
            quote: Some(QuoteResponse {
                meta: Some(meta.to_string()),
            }),
            build: BuildResponse {
                msgs: Some(vec![BuildMessage {
                    data: Some("0xdeadbeef".to_string()),
                }]),
                sender: Some(BuildSender {
                    address: Some(sender.to_checksum(None)),
                }),
            },
            track_fails: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn tracked(&self) -> Vec<TrackEvent> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ApiCall::Track(event) => Some(event),
                _ => None,
            })
            .collect()
    }

    pub fn builds(&self) -> Vec<SwapRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ApiCall::Build(request) => Some(request),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl SwapApi for FakeApi {
    async fn quote(&self, request: &SwapRequest) -> Result<QuoteResponse> {
        self.calls
            .lock()
            .unwrap()
            .push(ApiCall::Quote(request.clone()));
        self.quote
            .clone()
            .ok_or_else(|| Error::Api("503 Service Unavailable".to_string()))
    }

    async fn build(&self, request: &SwapRequest) -> Result<BuildResponse> {
        self.calls
            .lock()
            .unwrap()
            .push(ApiCall::Build(request.clone()));
        Ok(self.build.clone())
    }

    async fn track(&self, event: &TrackEvent) -> Result<()> {
        self.calls.lock().unwrap().push(ApiCall::Track(event.clone()));
        if self.track_fails {
            return Err(Error::Api("tracking rejected".to_string()));
        }
        Ok(())
    }
}

/// Console fed from a fixed list of answers
pub struct ScriptedConsole {
    answers: Mutex<VecDeque<String>>,
    output: Mutex<Vec<String>>,
    closed: AtomicBool,
}

impl ScriptedConsole {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            output: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    pub fn output(&self) -> Vec<String> {
        self.output.lock().unwrap().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    async fn say(&self, line: &str) -> Result<()> {
        self.output.lock().unwrap().push(line.to_string());
        Ok(())
    }

    async fn prompt(&self, question: &str) -> Result<String> {
        self.output.lock().unwrap().push(question.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .map(|a| a.trim().to_string())
            .ok_or_else(|| Error::Console("unexpected end of input".to_string()))
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
