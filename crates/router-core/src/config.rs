//! Configuration types for the smart router

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::{ChainId, ConfigError, Currency, PoolType, Token};

/// Contract addresses needed for routing on one chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractAddresses {
    /// V2 pair factory (CREATE2 deployer for pairs)
    pub v2_factory: Address,
    pub v2_init_code_hash: B256,

    /// V3 pool deployer (CREATE2 deployer for pools)
    pub v3_pool_deployer: Address,
    pub v3_init_code_hash: B256,

    pub quoter_v2: Address,
    pub mixed_route_quoter_v1: Address,

    /// Multicall variant that forwards a per-call gas limit
    pub gas_multicall: Address,
}

/// Chain-level settings: tokens, contracts, and RPC endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_id: ChainId,

    /// JSON-RPC URL (e.g., "https://rpc.mantle.xyz")
    pub rpc_url: String,

    pub native_symbol: String,
    #[serde(default = "default_native_decimals")]
    pub native_decimals: u8,

    pub wrapped_native: Token,

    /// Stable token used to express gas cost in USD
    pub usd_token: Token,

    /// Majors/stables used as intermediate hops
    #[serde(default)]
    pub base_trade_tokens: Vec<Token>,

    pub contracts: ContractAddresses,
}

fn default_native_decimals() -> u8 {
    18
}

impl ChainConfig {
    /// Load from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Invalid {
            message: format!("chain config: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// The chain's native coin
    pub fn native_currency(&self) -> Currency {
        Currency::native(
            self.native_decimals,
            self.native_symbol.clone(),
            self.wrapped_native.clone(),
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let tokens = std::iter::once(&self.wrapped_native)
            .chain(std::iter::once(&self.usd_token))
            .chain(self.base_trade_tokens.iter());
        for token in tokens {
            if token.chain_id != self.chain_id {
                return Err(ConfigError::Invalid {
                    message: format!(
                        "token {} is on chain {}, expected {}",
                        token.symbol, token.chain_id, self.chain_id
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Per-request routing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Gas price used to price route gas usage
    #[serde(default)]
    pub gas_price_wei: U256,

    #[serde(default = "default_max_hops")]
    pub max_hops: usize,

    #[serde(default = "default_max_splits")]
    pub max_splits: usize,

    /// Slice granularity; must divide 100
    #[serde(default = "default_distribution_percent")]
    pub distribution_percent: u32,

    #[serde(default = "default_allowed_pool_types")]
    pub allowed_pool_types: Vec<PoolType>,
}

fn default_max_hops() -> usize {
    3
}

fn default_max_splits() -> usize {
    4
}

fn default_distribution_percent() -> u32 {
    50
}

fn default_allowed_pool_types() -> Vec<PoolType> {
    vec![PoolType::V2, PoolType::V3]
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            gas_price_wei: U256::ZERO,
            max_hops: default_max_hops(),
            max_splits: default_max_splits(),
            distribution_percent: default_distribution_percent(),
            allowed_pool_types: default_allowed_pool_types(),
        }
    }
}

impl RouterConfig {
    pub fn with_gas_price(mut self, gas_price_wei: U256) -> Self {
        self.gas_price_wei = gas_price_wei;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let pct = self.distribution_percent;
        if pct == 0 || pct > 100 || 100 % pct != 0 {
            return Err(ConfigError::InvalidDistributionPercent { value: pct });
        }
        if self.max_hops == 0 {
            return Err(ConfigError::Invalid {
                message: "maxHops must be at least 1".to_string(),
            });
        }
        if self.max_splits == 0 {
            return Err(ConfigError::Invalid {
                message: "maxSplits must be at least 1".to_string(),
            });
        }
        if self.allowed_pool_types.is_empty() {
            return Err(ConfigError::Invalid {
                message: "allowedPoolTypes must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Top-K limits for the TVL-based candidate pool selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSelectorConfig {
    /// Pools ranked purely by TVL
    pub top_n: usize,
    /// Pools directly between the two currencies
    pub top_n_direct_swaps: usize,
    /// Pools touching only currency A (or only currency B)
    pub top_n_token_in_out: usize,
    /// Expansion from tokens reached by the slices above
    pub top_n_second_hop: usize,
    /// Per base token, before the overall re-rank
    pub top_n_with_each_base_token: usize,
    /// Overall cut across all base tokens
    pub top_n_with_base_token: usize,
}

impl PoolSelectorConfig {
    /// V3 quotes go on-chain, so fewer candidates
    pub const V3: Self = Self {
        top_n: 2,
        top_n_direct_swaps: 2,
        top_n_token_in_out: 2,
        top_n_second_hop: 1,
        top_n_with_each_base_token: 3,
        top_n_with_base_token: 3,
    };

    /// V2 quotes are computed off-chain and are cheap
    pub const V2: Self = Self {
        top_n: 3,
        top_n_direct_swaps: 2,
        top_n_token_in_out: 2,
        top_n_second_hop: 1,
        top_n_with_each_base_token: 3,
        top_n_with_base_token: 3,
    };

    pub fn for_pool_type(pool_type: PoolType) -> Self {
        match pool_type {
            PoolType::V2 => Self::V2,
            PoolType::V3 => Self::V3,
        }
    }
}

impl Default for PoolSelectorConfig {
    fn default() -> Self {
        Self::V3
    }
}
