//! Best-trade pipeline
//!
//! `get_best_trade` runs one routing request end to end: candidate pools,
//! route enumeration, amount distribution, quoting, and the split optimizer.

use std::sync::Arc;

use router_core::{
    ChainConfig, ConfigError, Currency, CurrencyAmount, Result, RouteError, RouterConfig, TradeType,
};

use crate::distribution::{build_routes_without_quote, get_amount_distribution};
use crate::gas_model::{GasModel, PriceOracle};
use crate::optimizer::get_best_route_combination;
use crate::provider::{GetPoolParams, PoolProvider};
use crate::quote::QuoteProvider;
use crate::routes::{compute_all_routes, filter_routes_for_trade_type};
use crate::state::{SmartRouterTrade, TradeRoute};

/// Everything a routing request needs besides the amount
#[derive(Clone)]
pub struct TradeConfig {
    pub router: RouterConfig,
    pub chain: Arc<ChainConfig>,
    pub pool_provider: Option<Arc<dyn PoolProvider>>,
    pub quote_provider: Option<Arc<dyn QuoteProvider>>,
    /// Without an oracle gas costs are zero
    pub price_oracle: Option<Arc<dyn PriceOracle>>,
}

impl TradeConfig {
    pub fn new(router: RouterConfig, chain: Arc<ChainConfig>) -> Self {
        Self {
            router,
            chain,
            pool_provider: None,
            quote_provider: None,
            price_oracle: None,
        }
    }

    pub fn with_pool_provider(mut self, provider: Arc<dyn PoolProvider>) -> Self {
        self.pool_provider = Some(provider);
        self
    }

    pub fn with_quote_provider(mut self, provider: Arc<dyn QuoteProvider>) -> Self {
        self.quote_provider = Some(provider);
        self
    }

    pub fn with_price_oracle(mut self, oracle: Arc<dyn PriceOracle>) -> Self {
        self.price_oracle = Some(oracle);
        self
    }
}

/// Find the best split trade.
///
/// For exact-input `amount` is what is sold and `currency` what is bought;
/// for exact-output `amount` is what is bought and `currency` what is sold.
pub async fn get_best_trade(
    amount: &CurrencyAmount,
    currency: &Currency,
    trade_type: TradeType,
    config: &TradeConfig,
) -> Result<SmartRouterTrade> {
    config.router.validate()?;
    let pool_provider = config
        .pool_provider
        .as_ref()
        .ok_or(ConfigError::MissingProvider { name: "poolProvider" })?;
    let quote_provider = config
        .quote_provider
        .as_ref()
        .ok_or(ConfigError::MissingProvider { name: "quoteProvider" })?;

    let (input, output) = match trade_type {
        TradeType::ExactInput => (amount.currency.clone(), currency.clone()),
        TradeType::ExactOutput => (currency.clone(), amount.currency.clone()),
    };

    let params = GetPoolParams {
        currency_a: amount.currency.clone(),
        currency_b: currency.clone(),
        protocols: config.router.allowed_pool_types.clone(),
    };
    let pools = pool_provider.get_candidate_pools(&params).await?;
    tracing::debug!(pools = pools.len(), "Candidate pools fetched");
    if pools.is_empty() {
        return Err(RouteError::NoCandidatePools.into());
    }

    let routes = compute_all_routes(&input, &output, &pools, config.router.max_hops);
    let routes = filter_routes_for_trade_type(routes, trade_type);
    tracing::debug!(routes = routes.len(), "Routes computed");
    if routes.is_empty() {
        return Err(RouteError::NoRouteFound.into());
    }
    let routes: Vec<_> = routes.into_iter().map(Arc::new).collect();

    let gas_model = GasModel::create(
        config.router.gas_price_wei,
        currency,
        &config.chain,
        config.price_oracle.as_deref(),
    )
    .await;

    let (percents, amounts) = get_amount_distribution(amount, config.router.distribution_percent)?;
    let slices = build_routes_without_quote(&routes, &percents, &amounts, trade_type);

    let quoted = match trade_type {
        TradeType::ExactInput => quote_provider.quote_exact_in(&slices, &gas_model).await?,
        TradeType::ExactOutput => quote_provider.quote_exact_out(&slices, &gas_model).await?,
    };
    tracing::debug!(slices = slices.len(), quoted = quoted.len(), "Route slices quoted");

    let best = get_best_route_combination(&quoted, trade_type, config.router.max_splits)
        .ok_or(RouteError::NoRouteFound)?;

    let (input_amount, output_amount) = match trade_type {
        TradeType::ExactInput => (amount.clone(), best.quote.clone()),
        TradeType::ExactOutput => (best.quote.clone(), amount.clone()),
    };
    if output_amount.is_zero() {
        return Err(RouteError::NoRouteFound.into());
    }

    let trade = SmartRouterTrade {
        trade_type,
        input_amount,
        output_amount,
        routes: best.routes.iter().map(TradeRoute::from).collect(),
        gas_estimate: best.gas_estimate,
        gas_estimate_in_usd: best.gas_cost_in_usd,
    };

    tracing::info!(
        trade_type = ?trade_type,
        routes = trade.routes.len(),
        gas = %trade.gas_estimate,
        "Best trade: {}",
        trade
    );
    Ok(trade)
}
