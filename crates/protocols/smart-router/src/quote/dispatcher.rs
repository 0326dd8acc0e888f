//! Quote dispatch
//!
//! Buckets route slices by protocol makeup and quotes all buckets
//! concurrently. A failing bucket only loses its own routes; the request
//! fails only when every bucket that had work failed.

use std::sync::Arc;

use async_trait::async_trait;
use evm_client::StaticCaller;
use router_core::{ChainConfig, QuoteError, Result, TradeType};

use crate::gas_model::GasModel;
use crate::quote::{OffChainQuoteProvider, OnChainQuoteProvider, QuoteProvider};
use crate::state::{RouteType, RouteWithQuote, RouteWithoutQuote};

#[derive(Debug, Default)]
struct Buckets {
    off_chain: Vec<RouteWithoutQuote>,
    v3_single_hop: Vec<RouteWithoutQuote>,
    v3_multi_hop: Vec<RouteWithoutQuote>,
    mixed: Vec<RouteWithoutQuote>,
}

fn partition(routes: &[RouteWithoutQuote]) -> Buckets {
    let mut buckets = Buckets::default();
    for route in routes {
        let base = &route.route;
        let bucket = match base.route_type {
            RouteType::V2 => &mut buckets.off_chain,
            RouteType::V3 if base.pools.len() == 1 => &mut buckets.v3_single_hop,
            RouteType::V3 => &mut buckets.v3_multi_hop,
            RouteType::Mixed if base.has_v3_pool() => &mut buckets.mixed,
            RouteType::Mixed => &mut buckets.off_chain,
        };
        bucket.push(route.clone());
    }
    buckets
}

async fn quote_bucket(
    provider: &dyn QuoteProvider,
    routes: &[RouteWithoutQuote],
    gas_model: &GasModel,
    trade_type: TradeType,
) -> Result<Vec<RouteWithQuote>> {
    if routes.is_empty() {
        return Ok(Vec::new());
    }
    match trade_type {
        TradeType::ExactInput => provider.quote_exact_in(routes, gas_model).await,
        TradeType::ExactOutput => provider.quote_exact_out(routes, gas_model).await,
    }
}

/// Routes each slice to the off-chain, on-chain V3, or mixed provider
#[derive(Clone)]
pub struct QuoteProviderDispatcher {
    off_chain: Arc<dyn QuoteProvider>,
    on_chain_v3: Arc<dyn QuoteProvider>,
    mixed: Arc<dyn QuoteProvider>,
}

impl QuoteProviderDispatcher {
    pub fn new(
        off_chain: Arc<dyn QuoteProvider>,
        on_chain_v3: Arc<dyn QuoteProvider>,
        mixed: Arc<dyn QuoteProvider>,
    ) -> Self {
        Self {
            off_chain,
            on_chain_v3,
            mixed,
        }
    }

    /// Stock providers for `chain`, quoting on-chain through `caller`
    pub fn for_chain(caller: Arc<dyn StaticCaller>, chain: &ChainConfig) -> Self {
        Self::new(
            Arc::new(OffChainQuoteProvider::new()),
            Arc::new(OnChainQuoteProvider::v3(caller.clone(), chain)),
            Arc::new(OnChainQuoteProvider::mixed(caller, chain)),
        )
    }

    async fn dispatch(
        &self,
        routes: &[RouteWithoutQuote],
        gas_model: &GasModel,
        trade_type: TradeType,
    ) -> Result<Vec<RouteWithQuote>> {
        if routes.is_empty() {
            return Ok(Vec::new());
        }
        let buckets = partition(routes);

        let (off_chain, v3_single, v3_multi, mixed) = tokio::join!(
            quote_bucket(self.off_chain.as_ref(), &buckets.off_chain, gas_model, trade_type),
            quote_bucket(self.on_chain_v3.as_ref(), &buckets.v3_single_hop, gas_model, trade_type),
            quote_bucket(self.on_chain_v3.as_ref(), &buckets.v3_multi_hop, gas_model, trade_type),
            quote_bucket(self.mixed.as_ref(), &buckets.mixed, gas_model, trade_type),
        );

        let outcomes = [
            ("off-chain", buckets.off_chain.len(), off_chain),
            ("v3 single-hop", buckets.v3_single_hop.len(), v3_single),
            ("v3 multi-hop", buckets.v3_multi_hop.len(), v3_multi),
            ("mixed", buckets.mixed.len(), mixed),
        ];

        let mut quoted = Vec::new();
        let mut reasons = Vec::new();
        let mut attempted = 0usize;
        for (bucket, count, outcome) in outcomes {
            if count == 0 {
                continue;
            }
            attempted += 1;
            match outcome {
                Ok(routes) => {
                    tracing::debug!(bucket, routes = count, quoted = routes.len(), "Quote bucket done");
                    quoted.extend(routes);
                }
                Err(e) => {
                    tracing::warn!(bucket, routes = count, "Quote bucket failed: {}", e);
                    reasons.push(e.to_string());
                }
            }
        }

        if attempted > 0 && reasons.len() == attempted {
            return Err(QuoteError::AggregateFailure { reasons }.into());
        }
        Ok(quoted)
    }
}

#[async_trait]
impl QuoteProvider for QuoteProviderDispatcher {
    async fn quote_exact_in(&self, routes: &[RouteWithoutQuote], gas_model: &GasModel) -> Result<Vec<RouteWithQuote>> {
        self.dispatch(routes, gas_model, TradeType::ExactInput).await
    }

    async fn quote_exact_out(&self, routes: &[RouteWithoutQuote], gas_model: &GasModel) -> Result<Vec<RouteWithQuote>> {
        self.dispatch(routes, gas_model, TradeType::ExactOutput).await
    }
}
