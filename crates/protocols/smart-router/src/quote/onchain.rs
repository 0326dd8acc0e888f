//! On-chain quoting
//!
//! Encodes each route as a packed path, batches one quoter call per route
//! through the gas-limited multicall, and decodes the amounts and ticks
//! crossed. A call that reverts drops its route only.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use evm_client::{GasCallRequest, GasCallResponse, GasMulticall, StaticCaller, QUOTER_TRADE_GAS};
use router_core::{ChainConfig, CurrencyAmount, QuoteError, Result, TradeType};

use crate::gas_model::GasModel;
use crate::path::{encode_route_path, mixed_route_flags};
use crate::quote::{with_quote, QuoteProvider};
use crate::state::{RouteWithQuote, RouteWithoutQuote};

sol! {
    interface IQuoterV2 {
        function quoteExactInput(bytes memory path, uint256 amountIn)
            external
            returns (
                uint256 amountOut,
                uint160[] memory sqrtPriceX96AfterList,
                uint32[] memory initializedTicksCrossedList,
                uint256 gasEstimate
            );

        function quoteExactOutput(bytes memory path, uint256 amountOut)
            external
            returns (
                uint256 amountIn,
                uint160[] memory sqrtPriceX96AfterList,
                uint32[] memory initializedTicksCrossedList,
                uint256 gasEstimate
            );
    }

    interface IMixedRouteQuoterV1 {
        function quoteExactInput(bytes memory path, uint256[] memory flag, uint256 amountIn)
            external
            returns (
                uint256 amountOut,
                uint160[] memory v3SqrtPriceX96AfterList,
                uint32[] memory v3InitializedTicksCrossedList,
                uint256 v3SwapGasEstimate
            );
    }
}

/// Which quoter contract a provider talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoterKind {
    /// QuoterV2: pure V3 paths, both directions
    V3,
    /// MixedRouteQuoterV1: V2/V3 paths, exact-input only
    Mixed,
}

impl std::fmt::Display for QuoterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V3 => write!(f, "V3"),
            Self::Mixed => write!(f, "mixed"),
        }
    }
}

/// Raw quoter answer: amount and initialized ticks crossed per V3 hop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoterResult {
    pub amount: U256,
    pub initialized_ticks_crossed: Vec<u32>,
}

/// Quotes routes through a quoter contract
#[derive(Clone)]
pub struct OnChainQuoteProvider {
    multicall: GasMulticall,
    quoter: Address,
    kind: QuoterKind,
    call_gas: u64,
}

impl OnChainQuoteProvider {
    pub fn new(multicall: GasMulticall, quoter: Address, kind: QuoterKind) -> Self {
        Self {
            multicall,
            quoter,
            kind,
            call_gas: QUOTER_TRADE_GAS,
        }
    }

    /// QuoterV2 on `chain`
    pub fn v3(caller: Arc<dyn StaticCaller>, chain: &ChainConfig) -> Self {
        let multicall = GasMulticall::new(caller, chain.contracts.gas_multicall);
        Self::new(multicall, chain.contracts.quoter_v2, QuoterKind::V3)
    }

    /// MixedRouteQuoterV1 on `chain`
    pub fn mixed(caller: Arc<dyn StaticCaller>, chain: &ChainConfig) -> Self {
        let multicall = GasMulticall::new(caller, chain.contracts.gas_multicall);
        Self::new(multicall, chain.contracts.mixed_route_quoter_v1, QuoterKind::Mixed)
    }

    /// Gas declared for each quoter call in the batch
    pub fn with_call_gas(mut self, call_gas: u64) -> Self {
        self.call_gas = call_gas;
        self
    }

    pub fn kind(&self) -> QuoterKind {
        self.kind
    }

    fn encode_call(&self, route: &RouteWithoutQuote, trade_type: TradeType) -> std::result::Result<Bytes, QuoteError> {
        let amount = route.amount.raw;
        let data = match (self.kind, trade_type) {
            (QuoterKind::V3, TradeType::ExactInput) => IQuoterV2::quoteExactInputCall {
                path: encode_route_path(&route.route, false)?,
                amountIn: amount,
            }
            .abi_encode(),
            (QuoterKind::V3, TradeType::ExactOutput) => IQuoterV2::quoteExactOutputCall {
                path: encode_route_path(&route.route, true)?,
                amountOut: amount,
            }
            .abi_encode(),
            (QuoterKind::Mixed, TradeType::ExactInput) => IMixedRouteQuoterV1::quoteExactInputCall {
                path: encode_route_path(&route.route, false)?,
                flag: mixed_route_flags(&route.route),
                amountIn: amount,
            }
            .abi_encode(),
            (QuoterKind::Mixed, TradeType::ExactOutput) => {
                return Err(QuoteError::Unsupported {
                    message: format!("mixed route {} cannot be quoted for exact output", route.route),
                })
            }
        };
        Ok(data.into())
    }

    fn decode(&self, data: &[u8], trade_type: TradeType) -> std::result::Result<QuoterResult, QuoteError> {
        let decode_err = |e: alloy_sol_types::Error| QuoteError::Decode { message: e.to_string() };
        let result = match (self.kind, trade_type) {
            (QuoterKind::V3, TradeType::ExactInput) => {
                let ret = IQuoterV2::quoteExactInputCall::abi_decode_returns(data).map_err(decode_err)?;
                QuoterResult {
                    amount: ret.amountOut,
                    initialized_ticks_crossed: ret.initializedTicksCrossedList,
                }
            }
            (QuoterKind::V3, TradeType::ExactOutput) => {
                let ret = IQuoterV2::quoteExactOutputCall::abi_decode_returns(data).map_err(decode_err)?;
                QuoterResult {
                    amount: ret.amountIn,
                    initialized_ticks_crossed: ret.initializedTicksCrossedList,
                }
            }
            (QuoterKind::Mixed, TradeType::ExactInput) => {
                let ret = IMixedRouteQuoterV1::quoteExactInputCall::abi_decode_returns(data).map_err(decode_err)?;
                QuoterResult {
                    amount: ret.amountOut,
                    initialized_ticks_crossed: ret.v3InitializedTicksCrossedList,
                }
            }
            (QuoterKind::Mixed, TradeType::ExactOutput) => {
                return Err(QuoteError::Unsupported {
                    message: "mixed quoter has no exact output".to_string(),
                })
            }
        };
        Ok(result)
    }

    /// Decode one multicall result; a failed call is a per-route revert
    fn read_response(
        &self,
        route: &RouteWithoutQuote,
        response: &GasCallResponse,
        trade_type: TradeType,
    ) -> std::result::Result<QuoterResult, QuoteError> {
        if !response.success {
            return Err(QuoteError::Reverted {
                route: route.route.to_string(),
            });
        }
        self.decode(&response.return_data, trade_type)
    }

    async fn quote_all(
        &self,
        routes: &[RouteWithoutQuote],
        gas_model: &GasModel,
        trade_type: TradeType,
    ) -> Result<Vec<RouteWithQuote>> {
        if routes.is_empty() {
            return Ok(Vec::new());
        }
        if self.kind == QuoterKind::Mixed && trade_type == TradeType::ExactOutput {
            return Err(QuoteError::Unsupported {
                message: "mixed routes cannot be quoted for exact output".to_string(),
            }
            .into());
        }

        let mut encoded: Vec<(&RouteWithoutQuote, GasCallRequest)> = Vec::with_capacity(routes.len());
        for route in routes {
            match self.encode_call(route, trade_type) {
                Ok(call_data) => encoded.push((
                    route,
                    GasCallRequest {
                        target: self.quoter,
                        call_data,
                        gas_limit: self.call_gas,
                    },
                )),
                Err(e) => {
                    tracing::debug!(route = %route.route, "Skipping route, cannot encode: {}", e);
                }
            }
        }

        let calls: Vec<GasCallRequest> = encoded.iter().map(|(_, call)| call.clone()).collect();
        let responses = self.multicall.multicall(&calls).await?;

        let mut quoted = Vec::with_capacity(responses.len());
        let mut reverted = 0usize;
        for ((route, _), response) in encoded.iter().zip(responses) {
            let result = match self.read_response(route, &response, trade_type) {
                Ok(result) => result,
                Err(e) => {
                    if matches!(e, QuoteError::Reverted { .. }) {
                        reverted += 1;
                    }
                    tracing::debug!(route = %route.route, percent = route.percent, "Route dropped: {}", e);
                    continue;
                }
            };

            let quote = CurrencyAmount::new(route.quote_currency().clone(), result.amount);
            let gas = gas_model.estimate_gas_cost(&route.route.pools, &result.initialized_ticks_crossed);
            quoted.push(with_quote(route, quote, gas));
        }

        tracing::debug!(
            quoter = %self.kind,
            routes = routes.len(),
            quoted = quoted.len(),
            reverted,
            "On-chain quotes"
        );
        Ok(quoted)
    }
}

#[async_trait]
impl QuoteProvider for OnChainQuoteProvider {
    async fn quote_exact_in(&self, routes: &[RouteWithoutQuote], gas_model: &GasModel) -> Result<Vec<RouteWithQuote>> {
        self.quote_all(routes, gas_model, TradeType::ExactInput).await
    }

    async fn quote_exact_out(&self, routes: &[RouteWithoutQuote], gas_model: &GasModel) -> Result<Vec<RouteWithQuote>> {
        self.quote_all(routes, gas_model, TradeType::ExactOutput).await
    }
}
