//! Candidate pool providers
//!
//! A [`PoolProvider`] answers "which pools may route A to B". The stock
//! implementation, [`SelectingPoolProvider`], derives every plausible pool
//! address for the pair and its base tokens, asks a [`PoolSource`] for
//! their live state and TVL, and narrows the result with [`PoolSelector`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use alloy_primitives::Address;
use async_trait::async_trait;
use futures::future::try_join_all;
use router_core::{ChainConfig, Currency, PoolSelectorConfig, PoolType, Result, Token};

use crate::constants::fee_tiers;
use crate::pool_address::PoolAddressCache;
use crate::selector::PoolSelector;
use crate::state::{Pool, PoolWithTvl};

/// Request for candidate pools
#[derive(Debug, Clone)]
pub struct GetPoolParams {
    pub currency_a: Currency,
    pub currency_b: Currency,
    pub protocols: Vec<PoolType>,
}

#[async_trait]
pub trait PoolProvider: Send + Sync {
    async fn get_candidate_pools(&self, params: &GetPoolParams) -> Result<Vec<Pool>>;
}

/// Address and tokens of a pool that may exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolMetadata {
    pub pool_type: PoolType,
    pub address: Address,
    pub token0: Token,
    pub token1: Token,
    /// V3 fee tier; `None` for V2
    pub fee: Option<u32>,
}

/// Supplies live pool state and USD liquidity (an indexer, a cache, a node).
#[async_trait]
pub trait PoolSource: Send + Sync {
    /// Pools from `candidates` that exist; unknown addresses are omitted.
    async fn fetch_pools(&self, pool_type: PoolType, candidates: &[PoolMetadata]) -> Result<Vec<PoolWithTvl>>;
}

/// Token pairs worth checking for pools: the direct pair, each currency
/// against every base token, and every base pair. Same-token pairs are
/// dropped and pairs are deduplicated regardless of order.
pub fn pair_combinations(a: &Token, b: &Token, bases: &[Token]) -> Vec<(Token, Token)> {
    let (first, second) = Token::sort_pair(a, b);

    let candidates = std::iter::once((first, second))
        .chain(bases.iter().map(|base| (first, base)))
        .chain(bases.iter().map(|base| (second, base)))
        .chain(bases.iter().flat_map(|base| bases.iter().map(move |other| (base, other))));

    let mut seen: HashSet<(Address, Address)> = HashSet::new();
    let mut pairs = Vec::new();
    for (x, y) in candidates {
        if x.address == y.address {
            continue;
        }
        let (t0, t1) = Token::sort_pair(x, y);
        if seen.insert((t0.address, t1.address)) {
            pairs.push((x.clone(), y.clone()));
        }
    }
    pairs
}

/// Pool provider that selects by TVL from a [`PoolSource`]
pub struct SelectingPoolProvider {
    source: Arc<dyn PoolSource>,
    chain: Arc<ChainConfig>,
    addresses: PoolAddressCache,
}

impl SelectingPoolProvider {
    pub fn new(source: Arc<dyn PoolSource>, chain: Arc<ChainConfig>) -> Self {
        let addresses = PoolAddressCache::new(chain.contracts.clone());
        Self {
            source,
            chain,
            addresses,
        }
    }

    pub fn address_cache(&self) -> &PoolAddressCache {
        &self.addresses
    }

    /// Every pool of `pool_type` that could exist for the pair combinations of `a` and `b`
    pub fn pool_metadata(&self, pool_type: PoolType, a: &Token, b: &Token) -> Vec<PoolMetadata> {
        pair_combinations(a, b, &self.chain.base_trade_tokens)
            .iter()
            .flat_map(|(x, y)| {
                let (token0, token1) = Token::sort_pair(x, y);
                match pool_type {
                    PoolType::V2 => vec![PoolMetadata {
                        pool_type,
                        address: self.addresses.v2_pair_address(token0, token1),
                        token0: token0.clone(),
                        token1: token1.clone(),
                        fee: None,
                    }],
                    PoolType::V3 => fee_tiers::ALL
                        .iter()
                        .map(|fee| PoolMetadata {
                            pool_type,
                            address: self.addresses.v3_pool_address(token0, token1, *fee),
                            token0: token0.clone(),
                            token1: token1.clone(),
                            fee: Some(*fee),
                        })
                        .collect(),
                }
            })
            .collect()
    }

    async fn candidates_for(&self, pool_type: PoolType, a: &Currency, b: &Currency) -> Result<Vec<Pool>> {
        let metadata = self.pool_metadata(pool_type, a.wrapped(), b.wrapped());
        let pools = self.source.fetch_pools(pool_type, &metadata).await?;

        let selector = PoolSelector::new(
            PoolSelectorConfig::for_pool_type(pool_type),
            &self.chain.base_trade_tokens,
            Some(&self.chain.wrapped_native),
        );
        let selected = selector.select(a, b, &pools);

        tracing::debug!(
            pool_type = %pool_type,
            checked = metadata.len(),
            found = pools.len(),
            selected = selected.len(),
            "Selected candidate pools"
        );
        Ok(selected)
    }
}

#[async_trait]
impl PoolProvider for SelectingPoolProvider {
    async fn get_candidate_pools(&self, params: &GetPoolParams) -> Result<Vec<Pool>> {
        let per_protocol = try_join_all(
            params
                .protocols
                .iter()
                .map(|pool_type| self.candidates_for(*pool_type, &params.currency_a, &params.currency_b)),
        )
        .await?;
        Ok(per_protocol.into_iter().flatten().collect())
    }
}

/// Pool source backed by a fixed snapshot, keyed by pool address
#[derive(Default)]
pub struct InMemoryPoolSource {
    pools: HashMap<Address, PoolWithTvl>,
}

impl InMemoryPoolSource {
    pub fn new(pools: impl IntoIterator<Item = PoolWithTvl>) -> Self {
        Self {
            pools: pools.into_iter().map(|p| (p.pool.address(), p)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

#[async_trait]
impl PoolSource for InMemoryPoolSource {
    async fn fetch_pools(&self, pool_type: PoolType, candidates: &[PoolMetadata]) -> Result<Vec<PoolWithTvl>> {
        Ok(candidates
            .iter()
            .filter_map(|meta| self.pools.get(&meta.address))
            .filter(|p| p.pool.pool_type() == pool_type)
            .cloned()
            .collect())
    }
}

/// Pool provider returning a fixed pool list regardless of the request
pub struct StaticPoolProvider {
    pools: Vec<Pool>,
}

impl StaticPoolProvider {
    pub fn new(pools: Vec<Pool>) -> Self {
        Self { pools }
    }
}

#[async_trait]
impl PoolProvider for StaticPoolProvider {
    async fn get_candidate_pools(&self, params: &GetPoolParams) -> Result<Vec<Pool>> {
        Ok(self
            .pools
            .iter()
            .filter(|p| params.protocols.contains(&p.pool_type()))
            .cloned()
            .collect())
    }
}
