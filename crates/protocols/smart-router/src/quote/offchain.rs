//! Off-chain V2 quoting
//!
//! Chains the constant-product formula hop by hop over pool reserves.

use alloy_primitives::U256;
use async_trait::async_trait;
use router_core::{CurrencyAmount, QuoteError, Result, TradeType};

use crate::calculator::{get_input_amount, get_output_amount};
use crate::gas_model::GasModel;
use crate::quote::{with_quote, QuoteProvider};
use crate::state::{BaseRoute, Pool, RouteWithQuote, RouteWithoutQuote, V2Pool};

/// Quotes pure-V2 routes from pool reserves
#[derive(Debug, Clone, Copy, Default)]
pub struct OffChainQuoteProvider;

impl OffChainQuoteProvider {
    pub fn new() -> Self {
        Self
    }

    fn quote_all(&self, routes: &[RouteWithoutQuote], gas_model: &GasModel, trade_type: TradeType) -> Vec<RouteWithQuote> {
        let mut quoted = Vec::with_capacity(routes.len());
        for route in routes {
            let result = match trade_type {
                TradeType::ExactInput => quote_exact_in(&route.route, route.amount.raw),
                TradeType::ExactOutput => quote_exact_out(&route.route, route.amount.raw),
            };
            match result {
                Ok(raw) => {
                    let quote = CurrencyAmount::new(route.quote_currency().clone(), raw);
                    let ticks = vec![0u32; route.route.pools.len()];
                    let gas = gas_model.estimate_gas_cost(&route.route.pools, &ticks);
                    quoted.push(with_quote(route, quote, gas));
                }
                Err(e) => {
                    tracing::debug!(route = %route.route, percent = route.percent, "V2 quote skipped: {}", e);
                }
            }
        }
        quoted
    }
}

fn v2_pools(route: &BaseRoute) -> std::result::Result<Vec<&V2Pool>, QuoteError> {
    route
        .pools
        .iter()
        .map(|pool| match pool {
            Pool::V2(p) => Ok(p),
            Pool::V3(p) => Err(QuoteError::Unsupported {
                message: format!("V3 pool {} in off-chain route", p.address),
            }),
        })
        .collect()
}

/// Output of pushing `amount_in` forward through every hop
pub fn quote_exact_in(route: &BaseRoute, amount_in: U256) -> std::result::Result<U256, QuoteError> {
    let pools = v2_pools(route)?;
    let mut token = route.input.wrapped();
    let mut amount = amount_in;
    for pool in pools {
        amount = get_output_amount(pool, token, amount)?;
        token = if pool.reserve0.token == *token {
            &pool.reserve1.token
        } else {
            &pool.reserve0.token
        };
    }
    Ok(amount)
}

/// Input needed to receive `amount_out`, walking hops from the output back
pub fn quote_exact_out(route: &BaseRoute, amount_out: U256) -> std::result::Result<U256, QuoteError> {
    let pools = v2_pools(route)?;
    let mut token = route.output.wrapped();
    let mut amount = amount_out;
    for pool in pools.into_iter().rev() {
        amount = get_input_amount(pool, token, amount)?;
        token = if pool.reserve0.token == *token {
            &pool.reserve1.token
        } else {
            &pool.reserve0.token
        };
    }
    Ok(amount)
}

#[async_trait]
impl QuoteProvider for OffChainQuoteProvider {
    async fn quote_exact_in(&self, routes: &[RouteWithoutQuote], gas_model: &GasModel) -> Result<Vec<RouteWithQuote>> {
        Ok(self.quote_all(routes, gas_model, TradeType::ExactInput))
    }

    async fn quote_exact_out(&self, routes: &[RouteWithoutQuote], gas_model: &GasModel) -> Result<Vec<RouteWithQuote>> {
        Ok(self.quote_all(routes, gas_model, TradeType::ExactOutput))
    }
}
