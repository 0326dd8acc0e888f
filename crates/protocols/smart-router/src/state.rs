//! Router State Types
//!
//! Data structures for pools, routes, quotes, and trades.

use std::fmt;
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use router_core::{Currency, CurrencyAmount, PoolType, Token, TradeType};
use serde::{Deserialize, Serialize};

/// Token reserve held by a V2 pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAmount {
    pub token: Token,
    pub raw: U256,
}

impl TokenAmount {
    pub fn new(token: Token, raw: U256) -> Self {
        Self { token, raw }
    }
}

/// Constant-product pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct V2Pool {
    pub address: Address,
    pub reserve0: TokenAmount,
    pub reserve1: TokenAmount,
}

impl V2Pool {
    /// Reserves ordered as `(reserve_in, reserve_out)` for a swap from `token_in`.
    pub fn reserves_for(&self, token_in: &Token) -> Option<(&TokenAmount, &TokenAmount)> {
        if self.reserve0.token == *token_in {
            Some((&self.reserve0, &self.reserve1))
        } else if self.reserve1.token == *token_in {
            Some((&self.reserve1, &self.reserve0))
        } else {
            None
        }
    }
}

/// Concentrated-liquidity pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct V3Pool {
    pub address: Address,
    pub token0: Token,
    pub token1: Token,
    /// Fee tier in hundredths of a bip (e.g., 500)
    pub fee: u32,
    pub sqrt_price_x96: U256,
    pub liquidity: u128,
    pub tick: i32,
}

/// A liquidity pool of either protocol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pool {
    V2(V2Pool),
    V3(V3Pool),
}

impl Pool {
    pub fn pool_type(&self) -> PoolType {
        match self {
            Self::V2(_) => PoolType::V2,
            Self::V3(_) => PoolType::V3,
        }
    }

    pub fn address(&self) -> Address {
        match self {
            Self::V2(p) => p.address,
            Self::V3(p) => p.address,
        }
    }

    pub fn token0(&self) -> &Token {
        match self {
            Self::V2(p) => &p.reserve0.token,
            Self::V3(p) => &p.token0,
        }
    }

    pub fn token1(&self) -> &Token {
        match self {
            Self::V2(p) => &p.reserve1.token,
            Self::V3(p) => &p.token1,
        }
    }

    pub fn involves(&self, token: &Token) -> bool {
        self.token0() == token || self.token1() == token
    }

    /// The token received when swapping `token_in` through this pool
    pub fn output_token(&self, token_in: &Token) -> Option<&Token> {
        if self.token0() == token_in {
            Some(self.token1())
        } else if self.token1() == token_in {
            Some(self.token0())
        } else {
            None
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V2(p) => write!(f, "V2 {}/{}", p.reserve0.token, p.reserve1.token),
            Self::V3(p) => write!(f, "V3 {}/{} ({})", p.token0, p.token1, p.fee),
        }
    }
}

/// Pool annotated with its USD liquidity, as reported by a pool source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolWithTvl {
    pub pool: Pool,
    pub tvl_usd: f64,
}

/// Protocol makeup of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RouteType {
    V2,
    V3,
    Mixed,
}

impl RouteType {
    /// V2 when every pool is V2, V3 when every pool is V3, otherwise Mixed
    pub fn from_pools(pools: &[Pool]) -> Self {
        let has_v2 = pools.iter().any(|p| p.pool_type() == PoolType::V2);
        let has_v3 = pools.iter().any(|p| p.pool_type() == PoolType::V3);
        match (has_v2, has_v3) {
            (true, false) => Self::V2,
            (false, true) => Self::V3,
            _ => Self::Mixed,
        }
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V2 => write!(f, "V2"),
            Self::V3 => write!(f, "V3"),
            Self::Mixed => write!(f, "MIXED"),
        }
    }
}

/// A path of pools from the input currency to the output currency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseRoute {
    pub route_type: RouteType,
    pub input: Currency,
    pub output: Currency,
    pub pools: Vec<Pool>,
    /// `input`, each intermediate token, `output`
    pub path: Vec<Currency>,
}

impl BaseRoute {
    pub fn has_v3_pool(&self) -> bool {
        self.pools.iter().any(|p| p.pool_type() == PoolType::V3)
    }
}

impl fmt::Display for BaseRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols: Vec<&str> = self.path.iter().map(|c| c.symbol()).collect();
        write!(f, "[{}] {}", self.route_type, symbols.join(" -> "))
    }
}

/// One slice of the trade amount on one base route, not yet priced
#[derive(Debug, Clone)]
pub struct RouteWithoutQuote {
    pub route: Arc<BaseRoute>,
    /// Index of `route` among the enumerated base routes
    pub route_id: usize,
    pub percent: u32,
    pub amount: CurrencyAmount,
    pub trade_type: TradeType,
}

impl RouteWithoutQuote {
    /// Currency of the quote: route output for exact-in, route input for exact-out
    pub fn quote_currency(&self) -> &Currency {
        if self.amount.currency == self.route.input {
            &self.route.output
        } else {
            &self.route.input
        }
    }
}

/// A priced route slice
#[derive(Debug, Clone)]
pub struct RouteWithQuote {
    pub route: RouteWithoutQuote,
    pub quote: CurrencyAmount,
    pub quote_adjusted_for_gas: CurrencyAmount,
    pub gas_estimate: U256,
    pub gas_cost_in_token: CurrencyAmount,
    pub gas_cost_in_usd: CurrencyAmount,
}

impl RouteWithQuote {
    pub fn percent(&self) -> u32 {
        self.route.percent
    }

    pub fn route_id(&self) -> usize {
        self.route.route_id
    }
}

/// One route of a final trade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRoute {
    pub route_type: RouteType,
    pub pools: Vec<Pool>,
    pub path: Vec<Currency>,
    pub percent: u32,
    pub input_amount: CurrencyAmount,
    pub output_amount: CurrencyAmount,
    pub gas_estimate: U256,
}

impl From<&RouteWithQuote> for TradeRoute {
    fn from(quoted: &RouteWithQuote) -> Self {
        let base = &quoted.route.route;
        let (input_amount, output_amount) = match quoted.route.trade_type {
            TradeType::ExactInput => (quoted.route.amount.clone(), quoted.quote.clone()),
            TradeType::ExactOutput => (quoted.quote.clone(), quoted.route.amount.clone()),
        };
        Self {
            route_type: base.route_type,
            pools: base.pools.clone(),
            path: base.path.clone(),
            percent: quoted.route.percent,
            input_amount,
            output_amount,
            gas_estimate: quoted.gas_estimate,
        }
    }
}

/// Best split trade for a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartRouterTrade {
    pub trade_type: TradeType,
    pub input_amount: CurrencyAmount,
    pub output_amount: CurrencyAmount,
    pub routes: Vec<TradeRoute>,
    pub gas_estimate: U256,
    pub gas_estimate_in_usd: CurrencyAmount,
}

impl fmt::Display for SmartRouterTrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} via {} route(s)",
            self.input_amount,
            self.output_amount,
            self.routes.len()
        )
    }
}
