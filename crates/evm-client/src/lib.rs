//! evm-client: Read-only EVM access for quoting
//!
//! This crate provides a JSON-RPC client limited to `eth_call`, and the
//! gas-limited multicall wrapper that batches quoter calls into chunks.

pub mod multicall;

use std::time::Duration;

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use reqwest::Client;
use router_core::RpcError;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub use multicall::{
    split_calls_into_chunks, GasCallRequest, GasCallResponse, GasMulticall, MAX_GAS_LIMIT,
    QUOTER_TRADE_GAS,
};

/// Default timeout for RPC calls (30 seconds).
const RPC_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Result type for RPC operations
pub type Result<T> = std::result::Result<T, RpcError>;

/// Executes a read-only contract call.
///
/// Implemented by [`RpcClient`]; tests substitute in-memory fakes.
#[async_trait]
pub trait StaticCaller: Send + Sync {
    /// `eth_call` to `to` with `data`, capped at `gas`
    async fn static_call(&self, to: Address, data: Bytes, gas: u64) -> Result<Bytes>;
}

/// RPC endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Endpoint URL (e.g., "http://127.0.0.1:8545")
    pub url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    RPC_REQUEST_TIMEOUT.as_secs()
}

impl RpcConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Bytes>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// JSON-RPC client for `eth_call`
#[derive(Clone)]
pub struct RpcClient {
    client: Client,
    config: RpcConfig,
}

impl RpcClient {
    pub fn new(config: RpcConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RpcError::Transport {
                url: config.url.clone(),
                message: e.to_string(),
            })?;

        tracing::info!(url = %config.url, timeout_secs = config.timeout_secs, "Initialized RPC client");

        Ok(Self { client, config })
    }

    /// Get the current RPC configuration
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    async fn eth_call(&self, to: Address, data: Bytes, gas: u64) -> Result<Bytes> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_call",
            "params": [
                {
                    "to": to,
                    "data": data,
                    "gas": format!("0x{:x}", gas),
                },
                "latest"
            ],
        });

        let response = self
            .client
            .post(&self.config.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RpcError::Transport {
                url: self.config.url.clone(),
                message: e.to_string(),
            })?;

        let parsed: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| RpcError::Parse(e.to_string()))?;

        if let Some(err) = parsed.error {
            return Err(RpcError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        parsed
            .result
            .ok_or_else(|| RpcError::Parse("response has neither result nor error".to_string()))
    }
}

#[async_trait]
impl StaticCaller for RpcClient {
    async fn static_call(&self, to: Address, data: Bytes, gas: u64) -> Result<Bytes> {
        timed_request(
            Duration::from_secs(self.config.timeout_secs),
            self.eth_call(to, data, gas),
        )
        .await
    }
}

/// Bound a request future by `timeout`.
async fn timed_request<T>(
    timeout: Duration,
    fut: impl std::future::Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| RpcError::Timeout {
            secs: timeout.as_secs(),
        })?
}
