//! Smart Router
//!
//! Finds the best way to trade one currency for another across V2
//! (constant-product) and V3 (concentrated-liquidity) pools: candidate pool
//! selection, multi-hop route enumeration, percentage splits, off-chain and
//! on-chain quoting with gas accounting, and split optimization.

pub mod calculator;
pub mod constants;
pub mod distribution;
pub mod gas_model;
pub mod optimizer;
pub mod path;
pub mod pool_address;
pub mod provider;
pub mod quote;
pub mod routes;
pub mod selector;
pub mod state;
pub mod trade;

// Re-exports
pub use calculator::{calculate_input, calculate_output, get_input_amount, get_output_amount};
pub use constants::{fee_tiers, fees, gas};
pub use distribution::{build_routes_without_quote, get_amount_distribution};
pub use gas_model::{FixedPriceOracle, GasCost, GasModel, PriceOracle, SpotPrices};
pub use optimizer::{get_best_route_combination, BestRoutes};
pub use path::{encode_route_path, mixed_route_flags};
pub use pool_address::{compute_v2_pair_address, compute_v3_pool_address, PoolAddressCache};
pub use provider::{
    pair_combinations, GetPoolParams, InMemoryPoolSource, PoolMetadata, PoolProvider, PoolSource,
    SelectingPoolProvider, StaticPoolProvider,
};
pub use quote::{
    adjust_quote_for_gas, OffChainQuoteProvider, OnChainQuoteProvider, QuoteProvider,
    QuoteProviderDispatcher, QuoterKind,
};
pub use routes::{build_base_route, compute_all_routes, filter_routes_for_trade_type};
pub use selector::PoolSelector;
pub use state::{
    BaseRoute, Pool, PoolWithTvl, RouteType, RouteWithQuote, RouteWithoutQuote, SmartRouterTrade,
    TokenAmount, TradeRoute, V2Pool, V3Pool,
};
pub use trade::{get_best_trade, TradeConfig};
