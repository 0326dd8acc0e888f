//! TVL-based candidate pool selection
//!
//! Narrows the full pool list for a currency pair down to a handful of
//! high-liquidity pools, in fixed slices:
//!
//! 1. Base tokens paired with currency A, then with currency B
//! 2. Direct A/B pools
//! 3. Wrapped native paired with A, then with B (one each)
//! 4. Overall top pools by TVL
//! 5. Pools touching only A, then only B
//! 6. Second hops from tokens reached by the A-side slices, then the B side
//!
//! Each slice skips pools already picked by an earlier one.

use std::cmp::Ordering;
use std::collections::HashSet;

use alloy_primitives::Address;
use router_core::{Currency, PoolSelectorConfig, Token};

use crate::state::{Pool, PoolWithTvl};

/// Pools taken per currency in the wrapped-native slice
const TOP_N_WITH_NATIVE: usize = 1;

fn by_tvl_desc(a: &&PoolWithTvl, b: &&PoolWithTvl) -> Ordering {
    b.tvl_usd.partial_cmp(&a.tvl_usd).unwrap_or(Ordering::Equal)
}

fn is_pair(pool: &Pool, x: &Token, y: &Token) -> bool {
    (pool.token0() == x && pool.token1() == y) || (pool.token0() == y && pool.token1() == x)
}

pub struct PoolSelector<'a> {
    config: PoolSelectorConfig,
    base_tokens: &'a [Token],
    wrapped_native: Option<&'a Token>,
}

impl<'a> PoolSelector<'a> {
    pub fn new(config: PoolSelectorConfig, base_tokens: &'a [Token], wrapped_native: Option<&'a Token>) -> Self {
        Self {
            config,
            base_tokens,
            wrapped_native,
        }
    }

    /// Select candidate pools for routing between `currency_a` and `currency_b`.
    ///
    /// The output never contains the same pool address twice. Returns an
    /// empty list when `pools` is empty.
    pub fn select(&self, currency_a: &Currency, currency_b: &Currency, pools: &[PoolWithTvl]) -> Vec<Pool> {
        if pools.is_empty() {
            return Vec::new();
        }
        let cfg = &self.config;
        let token_a = currency_a.wrapped();
        let token_b = currency_b.wrapped();

        // Stable sort keeps input order for equal TVL
        let mut sorted: Vec<&PoolWithTvl> = pools.iter().collect();
        sorted.sort_by(by_tvl_desc);

        let mut seen: HashSet<Address> = HashSet::new();
        let mut selected: Vec<&PoolWithTvl> = Vec::new();

        let with_base_a = self.top_with_base(&sorted, token_a, &seen);
        add(&mut selected, &mut seen, &with_base_a);

        let with_base_b = self.top_with_base(&sorted, token_b, &seen);
        add(&mut selected, &mut seen, &with_base_b);

        let direct: Vec<&PoolWithTvl> = sorted
            .iter()
            .filter(|p| !seen.contains(&p.pool.address()) && is_pair(&p.pool, token_a, token_b))
            .take(cfg.top_n_direct_swaps)
            .copied()
            .collect();
        add(&mut selected, &mut seen, &direct);

        if let Some(native) = self.wrapped_native {
            for token in [token_a, token_b] {
                let with_native: Vec<&PoolWithTvl> = sorted
                    .iter()
                    .filter(|p| !seen.contains(&p.pool.address()) && is_pair(&p.pool, native, token))
                    .take(TOP_N_WITH_NATIVE)
                    .copied()
                    .collect();
                add(&mut selected, &mut seen, &with_native);
            }
        }

        let top_by_tvl: Vec<&PoolWithTvl> = sorted
            .iter()
            .take(cfg.top_n)
            .filter(|p| !seen.contains(&p.pool.address()))
            .copied()
            .collect();
        add(&mut selected, &mut seen, &top_by_tvl);

        let using_a = top_using_token(&sorted, token_a, &seen, cfg.top_n_token_in_out);
        add(&mut selected, &mut seen, &using_a);

        let using_b = top_using_token(&sorted, token_b, &seen, cfg.top_n_token_in_out);
        add(&mut selected, &mut seen, &using_b);

        let from_a: Vec<&PoolWithTvl> = using_a.iter().chain(with_base_a.iter()).copied().collect();
        let second_hop_a = self.top_second_hops(&sorted, &from_a, token_a, &seen);
        add(&mut selected, &mut seen, &second_hop_a);

        let from_b: Vec<&PoolWithTvl> = using_b.iter().chain(with_base_b.iter()).copied().collect();
        let second_hop_b = self.top_second_hops(&sorted, &from_b, token_b, &seen);
        add(&mut selected, &mut seen, &second_hop_b);

        selected.into_iter().map(|p| p.pool.clone()).collect()
    }

    /// Per base token take the top few base/`token` pools, then re-rank the union
    fn top_with_base<'p>(
        &self,
        sorted: &[&'p PoolWithTvl],
        token: &Token,
        seen: &HashSet<Address>,
    ) -> Vec<&'p PoolWithTvl> {
        let mut pools: Vec<&PoolWithTvl> = self
            .base_tokens
            .iter()
            .flat_map(|base| {
                sorted
                    .iter()
                    .filter(move |p| !seen.contains(&p.pool.address()) && is_pair(&p.pool, base, token))
                    .take(self.config.top_n_with_each_base_token)
                    .copied()
            })
            .collect();
        pools.sort_by(by_tvl_desc);
        pools.truncate(self.config.top_n_with_base_token);
        pools
    }

    /// Top pools touching any token one hop away from `token` via `from`
    fn top_second_hops<'p>(
        &self,
        sorted: &[&'p PoolWithTvl],
        from: &[&PoolWithTvl],
        token: &Token,
        seen: &HashSet<Address>,
    ) -> Vec<&'p PoolWithTvl> {
        let mut uniq: HashSet<Address> = HashSet::new();
        let mut pools: Vec<&PoolWithTvl> = Vec::new();

        for hop in from {
            let second = if hop.pool.token0() == token {
                hop.pool.token1()
            } else {
                hop.pool.token0()
            };
            for p in sorted {
                let address = p.pool.address();
                if !seen.contains(&address) && p.pool.involves(second) && uniq.insert(address) {
                    pools.push(*p);
                }
            }
        }

        pools.sort_by(by_tvl_desc);
        pools.truncate(self.config.top_n_second_hop);
        pools
    }
}

fn top_using_token<'p>(
    sorted: &[&'p PoolWithTvl],
    token: &Token,
    seen: &HashSet<Address>,
    limit: usize,
) -> Vec<&'p PoolWithTvl> {
    sorted
        .iter()
        .filter(|p| !seen.contains(&p.pool.address()) && p.pool.involves(token))
        .take(limit)
        .copied()
        .collect()
}

fn add<'p>(selected: &mut Vec<&'p PoolWithTvl>, seen: &mut HashSet<Address>, pools: &[&'p PoolWithTvl]) {
    for pool in pools {
        if seen.insert(pool.pool.address()) {
            selected.push(pool);
        }
    }
}
