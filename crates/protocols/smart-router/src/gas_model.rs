//! Gas model
//!
//! Estimates the gas a route will burn and prices it in the quote currency
//! and in USD. Pricing is best effort: a missing or failed price lookup
//! makes the corresponding cost zero instead of failing the quote.

use alloy_primitives::U256;
use async_trait::async_trait;
use router_core::{ChainConfig, ChainId, Currency, CurrencyAmount, PoolType, Result, Token};

use crate::calculator::convert_amount;
use crate::constants::gas;
use crate::state::Pool;

/// Spot prices of the native coin, as decimal numbers
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpotPrices {
    /// Units of the quote token per native coin
    pub quote_per_native: Option<f64>,
    /// USD per native coin
    pub usd_per_native: Option<f64>,
}

/// External spot-price lookup used for gas accounting
#[async_trait]
pub trait PriceOracle: Send + Sync {
    async fn spot_prices(&self, quote: &Token, native: &Token) -> Result<SpotPrices>;
}

/// Oracle returning fixed prices
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPriceOracle {
    pub prices: SpotPrices,
}

#[async_trait]
impl PriceOracle for FixedPriceOracle {
    async fn spot_prices(&self, _quote: &Token, _native: &Token) -> Result<SpotPrices> {
        Ok(self.prices)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasCost {
    pub gas_estimate: U256,
    pub gas_cost_in_token: CurrencyAmount,
    pub gas_cost_in_usd: CurrencyAmount,
}

/// Gas units for swapping through `pools`.
///
/// Each contiguous run of same-protocol pools pays its protocol's base cost
/// once. Further V2 hops in a run add the extra-hop cost; every V3 pool adds
/// the per-hop cost. Routes with a V3 pool also pay per initialized tick
/// crossed, counting at least one.
pub fn estimate_gas_units(chain_id: ChainId, pools: &[Pool], initialized_ticks_crossed: &[u32]) -> u64 {
    let mut units: u64 = 0;
    let mut previous: Option<PoolType> = None;

    for pool in pools {
        let pool_type = pool.pool_type();
        let new_run = previous != Some(pool_type);
        match pool_type {
            PoolType::V2 => {
                units += if new_run {
                    gas::BASE_SWAP_COST_V2
                } else {
                    gas::COST_PER_EXTRA_HOP_V2
                };
            }
            PoolType::V3 => {
                if new_run {
                    units += gas::base_swap_cost_v3(chain_id);
                }
                units += gas::cost_per_hop_v3(chain_id);
            }
        }
        previous = Some(pool_type);
    }

    if pools.iter().any(|p| p.pool_type() == PoolType::V3) {
        let ticks: u64 = initialized_ticks_crossed.iter().map(|t| *t as u64).sum();
        units += gas::cost_per_init_tick(chain_id) * ticks.max(1);
    }
    units
}

/// Per-request gas pricing context
#[derive(Debug, Clone)]
pub struct GasModel {
    chain_id: ChainId,
    gas_price_wei: U256,
    quote_currency: Currency,
    native: Token,
    usd_token: Token,
    prices: SpotPrices,
}

impl GasModel {
    pub fn new(
        gas_price_wei: U256,
        quote_currency: Currency,
        chain: &ChainConfig,
        prices: SpotPrices,
    ) -> Self {
        Self {
            chain_id: chain.chain_id,
            gas_price_wei,
            quote_currency,
            native: chain.wrapped_native.clone(),
            usd_token: chain.usd_token.clone(),
            prices,
        }
    }

    /// Build a model for one request, fetching spot prices once.
    pub async fn create(
        gas_price_wei: U256,
        quote_currency: &Currency,
        chain: &ChainConfig,
        oracle: Option<&dyn PriceOracle>,
    ) -> Self {
        let prices = match oracle {
            Some(oracle) => match oracle.spot_prices(quote_currency.wrapped(), &chain.wrapped_native).await {
                Ok(prices) => prices,
                Err(e) => {
                    tracing::warn!(quote = %quote_currency, "Spot price lookup failed, gas cost set to zero: {}", e);
                    SpotPrices::default()
                }
            },
            None => {
                tracing::debug!("No price oracle configured, gas cost set to zero");
                SpotPrices::default()
            }
        };
        Self::new(gas_price_wei, quote_currency.clone(), chain, prices)
    }

    pub fn quote_currency(&self) -> &Currency {
        &self.quote_currency
    }

    pub fn estimate_gas_cost(&self, pools: &[Pool], initialized_ticks_crossed: &[u32]) -> GasCost {
        let units = estimate_gas_units(self.chain_id, pools, initialized_ticks_crossed);
        let cost_wei = self.gas_price_wei.saturating_mul(U256::from(units));

        let in_token = if self.quote_currency.wraps_to(&self.native) {
            cost_wei
        } else {
            self.prices
                .quote_per_native
                .map(|price| {
                    convert_amount(cost_wei, self.native.decimals, self.quote_currency.decimals(), price)
                })
                .unwrap_or(U256::ZERO)
        };

        let in_usd = self
            .prices
            .usd_per_native
            .map(|price| convert_amount(cost_wei, self.native.decimals, self.usd_token.decimals, price))
            .unwrap_or(U256::ZERO);

        GasCost {
            gas_estimate: U256::from(units),
            gas_cost_in_token: CurrencyAmount::new(self.quote_currency.clone(), in_token),
            gas_cost_in_usd: CurrencyAmount::new(self.usd_token.clone().into(), in_usd),
        }
    }
}
