//! Gas-limited multicall
//!
//! Batches static calls through a multicall contract that forwards a per-call
//! gas limit and reports per-call success, so one reverting quote does not
//! fail the batch.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};
use router_core::{ConfigError, Error, RpcError};

use crate::StaticCaller;

/// Gas ceiling for one aggregate call
pub const MAX_GAS_LIMIT: u64 = 250_000_000_000;

/// Gas budget declared for a single quoter call
pub const QUOTER_TRADE_GAS: u64 = 3_000_000;

sol! {
    struct Call {
        address target;
        uint256 gasLimit;
        bytes callData;
    }

    struct CallResult {
        bool success;
        uint256 gasUsed;
        bytes returnData;
    }

    function multicall(Call[] memory calls) external returns (uint256 blockNumber, CallResult[] memory returnData);
}

/// One call in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasCallRequest {
    pub target: Address,
    pub call_data: Bytes,
    pub gas_limit: u64,
}

/// Per-call outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasCallResponse {
    pub success: bool,
    pub return_data: Bytes,
    pub gas_used: U256,
}

/// Group calls so each chunk's declared gas stays under 90% of `max_gas_limit`.
///
/// A call whose own gas limit exceeds that budget is a configuration error.
pub fn split_calls_into_chunks(
    calls: &[GasCallRequest],
    max_gas_limit: u64,
) -> Result<Vec<Vec<GasCallRequest>>, ConfigError> {
    let chunk_limit = max_gas_limit / 10 * 9;
    let mut chunks: Vec<Vec<GasCallRequest>> = vec![Vec::new()];
    let mut gas_left = chunk_limit;

    for call in calls {
        if call.gas_limit > chunk_limit {
            return Err(ConfigError::CallExceedsGasLimit {
                gas_limit: chunk_limit,
                call_gas: call.gas_limit,
                target: call.target.to_string(),
            });
        }
        if call.gas_limit > gas_left {
            chunks.push(vec![call.clone()]);
            gas_left = chunk_limit - call.gas_limit;
            continue;
        }
        if let Some(current) = chunks.last_mut() {
            current.push(call.clone());
        }
        gas_left -= call.gas_limit;
    }

    chunks.retain(|chunk| !chunk.is_empty());
    Ok(chunks)
}

/// Multicall contract wrapper
#[derive(Clone)]
pub struct GasMulticall {
    caller: Arc<dyn StaticCaller>,
    address: Address,
    max_gas_limit: u64,
}

impl GasMulticall {
    pub fn new(caller: Arc<dyn StaticCaller>, address: Address) -> Self {
        Self {
            caller,
            address,
            max_gas_limit: MAX_GAS_LIMIT,
        }
    }

    pub fn with_max_gas_limit(mut self, max_gas_limit: u64) -> Self {
        self.max_gas_limit = max_gas_limit;
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Execute `calls`, returning one response per call in input order.
    ///
    /// Chunks are issued sequentially so each aggregate call respects the gas
    /// ceiling.
    pub async fn multicall(&self, calls: &[GasCallRequest]) -> router_core::Result<Vec<GasCallResponse>> {
        let chunks = split_calls_into_chunks(calls, self.max_gas_limit)?;
        let mut responses = Vec::with_capacity(calls.len());

        for (i, chunk) in chunks.iter().enumerate() {
            let data = multicallCall {
                calls: chunk
                    .iter()
                    .map(|c| Call {
                        target: c.target,
                        gasLimit: U256::from(c.gas_limit),
                        callData: c.call_data.clone(),
                    })
                    .collect(),
            }
            .abi_encode();

            let raw = self
                .caller
                .static_call(self.address, data.into(), self.max_gas_limit)
                .await
                .map_err(|e| {
                    tracing::error!(chunk = i, calls = chunk.len(), "multicall call error: {}", e);
                    Error::from(e)
                })?;

            let decoded = multicallCall::abi_decode_returns(&raw)
                .map_err(|e| RpcError::Parse(format!("multicall return data: {}", e)))?;

            if decoded.returnData.len() != chunk.len() {
                return Err(RpcError::Parse(format!(
                    "multicall returned {} results for {} calls",
                    decoded.returnData.len(),
                    chunk.len()
                ))
                .into());
            }

            responses.extend(decoded.returnData.into_iter().map(|r| GasCallResponse {
                success: r.success,
                return_data: r.returnData,
                gas_used: r.gasUsed,
            }));
        }

        tracing::debug!(calls = calls.len(), chunks = chunks.len(), "multicall complete");
        Ok(responses)
    }
}

/// Encode a response set the way the multicall contract would return it.
///
/// Used by in-memory callers that emulate the contract.
pub fn encode_multicall_returns(block_number: u64, responses: &[GasCallResponse]) -> Bytes {
    let ret = multicallReturn {
        blockNumber: U256::from(block_number),
        returnData: responses
            .iter()
            .map(|r| CallResult {
                success: r.success,
                gasUsed: r.gas_used,
                returnData: r.return_data.clone(),
            })
            .collect(),
    };
    multicallCall::abi_encode_returns(&ret).into()
}

/// Decode a multicall calldata payload into its calls.
pub fn decode_multicall_calls(data: &[u8]) -> Result<Vec<GasCallRequest>, RpcError> {
    let decoded = multicallCall::abi_decode(data)
        .map_err(|e| RpcError::Parse(format!("multicall calldata: {}", e)))?;
    Ok(decoded
        .calls
        .into_iter()
        .map(|c| GasCallRequest {
            target: c.target,
            call_data: c.callData,
            gas_limit: c.gasLimit.saturating_to::<u64>(),
        })
        .collect())
}
