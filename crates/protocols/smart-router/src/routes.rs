//! Route enumeration
//!
//! Finds every path of at most `max_hops` candidate pools from the input
//! currency to the output currency.

use router_core::{Currency, Token, TradeType};

use crate::state::{BaseRoute, Pool, RouteType};

struct RouteSearch<'a> {
    input: &'a Currency,
    output: &'a Currency,
    pools: &'a [Pool],
    max_hops: usize,
    used: Vec<bool>,
    current: Vec<usize>,
    routes: Vec<BaseRoute>,
}

impl<'a> RouteSearch<'a> {
    fn visit(&mut self, token: &'a Token) {
        let pools: &'a [Pool] = self.pools;
        let (input, output): (&'a Currency, &'a Currency) = (self.input, self.output);
        let token_in = input.wrapped();
        let token_out = output.wrapped();

        for (i, pool) in pools.iter().enumerate() {
            if self.used[i] {
                continue;
            }
            if self.current.iter().any(|&j| pools[j].address() == pool.address()) {
                continue;
            }
            let Some(next) = pool.output_token(token) else {
                continue;
            };
            if next == token_in {
                continue;
            }

            self.used[i] = true;
            self.current.push(i);
            if next == token_out {
                let route_pools: Vec<Pool> = self.current.iter().map(|&j| pools[j].clone()).collect();
                self.routes.push(build_base_route(input, output, route_pools));
            } else if self.current.len() < self.max_hops {
                self.visit(next);
            }
            self.current.pop();
            self.used[i] = false;
        }
    }
}

/// Find all routes from `input` to `output` through `pools`, up to `max_hops`.
///
/// Depth-first over pools in candidate order, so a route is emitted as soon
/// as its last pool reaches the output. A route never uses the same pool (or
/// pool address) twice and never passes back through the input token.
/// Currencies are compared in wrapped form.
pub fn compute_all_routes(input: &Currency, output: &Currency, pools: &[Pool], max_hops: usize) -> Vec<BaseRoute> {
    if max_hops == 0 || input.wrapped() == output.wrapped() {
        return Vec::new();
    }

    let mut search = RouteSearch {
        input,
        output,
        pools,
        max_hops,
        used: vec![false; pools.len()],
        current: Vec::with_capacity(max_hops),
        routes: Vec::new(),
    };
    search.visit(input.wrapped());
    let routes = search.routes;

    tracing::debug!(
        input = %input,
        output = %output,
        pools = pools.len(),
        max_hops,
        routes = routes.len(),
        "Computed routes"
    );
    routes
}

/// Assemble a route from an ordered, connected pool list
pub fn build_base_route(input: &Currency, output: &Currency, pools: Vec<Pool>) -> BaseRoute {
    let mut path = vec![input.clone()];
    let mut current = input.wrapped().clone();
    for pool in pools.iter().take(pools.len().saturating_sub(1)) {
        if let Some(next) = pool.output_token(&current) {
            current = next.clone();
            path.push(Currency::Token(current.clone()));
        }
    }
    path.push(output.clone());

    BaseRoute {
        route_type: RouteType::from_pools(&pools),
        input: input.clone(),
        output: output.clone(),
        pools,
        path,
    }
}

/// Drop routes the trade type cannot price: mixed routes are forward-only.
pub fn filter_routes_for_trade_type(routes: Vec<BaseRoute>, trade_type: TradeType) -> Vec<BaseRoute> {
    match trade_type {
        TradeType::ExactInput => routes,
        TradeType::ExactOutput => routes
            .into_iter()
            .filter(|r| r.route_type != RouteType::Mixed)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{TokenAmount, V2Pool, V3Pool};
    use alloy_primitives::{Address, U256};
    use router_core::ChainId;

    fn token(addr: u8, symbol: &str) -> Token {
        Token::new(ChainId::MANTLE, Address::repeat_byte(addr), 18, symbol)
    }

    fn v2(addr: u8, a: &Token, b: &Token) -> Pool {
        Pool::V2(V2Pool {
            address: Address::repeat_byte(addr),
            reserve0: TokenAmount::new(a.clone(), U256::from(1_000_000u64)),
            reserve1: TokenAmount::new(b.clone(), U256::from(1_000_000u64)),
        })
    }

    fn v3(addr: u8, a: &Token, b: &Token) -> Pool {
        Pool::V3(V3Pool {
            address: Address::repeat_byte(addr),
            token0: a.clone(),
            token1: b.clone(),
            fee: 500,
            sqrt_price_x96: U256::from(1u64) << 96,
            liquidity: 1_000_000,
            tick: 0,
        })
    }

    #[test]
    fn test_direct_and_two_hop_routes() {
        let a = token(1, "A");
        let b = token(2, "B");
        let c = token(3, "C");
        let pools = vec![v2(10, &a, &b), v3(11, &a, &c), v2(12, &c, &b)];

        let routes = compute_all_routes(&a.clone().into(), &b.clone().into(), &pools, 3);
        assert_eq!(routes.len(), 2);

        let direct = &routes[0];
        assert_eq!(direct.pools.len(), 1);
        assert_eq!(direct.route_type, RouteType::V2);

        let two_hop = &routes[1];
        assert_eq!(two_hop.pools.len(), 2);
        assert_eq!(two_hop.route_type, RouteType::Mixed);
        let symbols: Vec<&str> = two_hop.path.iter().map(|c| c.symbol()).collect();
        assert_eq!(symbols, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_routes_emitted_depth_first_in_pool_order() {
        let a = token(1, "A");
        let b = token(2, "B");
        let c = token(3, "C");
        let pools = vec![v2(10, &a, &c), v2(11, &a, &b), v2(12, &c, &b)];

        let routes = compute_all_routes(&a.into(), &b.into(), &pools, 3);
        let lengths: Vec<usize> = routes.iter().map(|r| r.pools.len()).collect();
        assert_eq!(lengths, vec![2, 1]);
        assert_eq!(routes[0].pools[0].address(), Address::repeat_byte(10));
        assert_eq!(routes[0].pools[1].address(), Address::repeat_byte(12));
        assert_eq!(routes[1].pools[0].address(), Address::repeat_byte(11));
    }

    #[test]
    fn test_max_hops_limits_length() {
        let a = token(1, "A");
        let b = token(2, "B");
        let c = token(3, "C");
        let d = token(4, "D");
        let pools = vec![v2(10, &a, &c), v2(11, &c, &d), v2(12, &d, &b)];

        assert!(compute_all_routes(&a.clone().into(), &b.clone().into(), &pools, 2).is_empty());
        let routes = compute_all_routes(&a.into(), &b.into(), &pools, 3);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].pools.len(), 3);
    }

    #[test]
    fn test_never_returns_through_input() {
        let a = token(1, "A");
        let b = token(2, "B");
        let c = token(3, "C");
        // A -> C -> A -> B would revisit the input
        let pools = vec![v2(10, &a, &c), v3(11, &c, &a), v2(12, &a, &b)];
        let routes = compute_all_routes(&a.into(), &b.into(), &pools, 3);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].pools.len(), 1);
    }

    #[test]
    fn test_duplicate_pool_address_used_once() {
        let a = token(1, "A");
        let b = token(2, "B");
        let c = token(3, "C");
        // Same pool listed twice: one route per listing, each using it once
        let pools = vec![v2(10, &a, &b), v2(20, &b, &c), v2(20, &b, &c)];
        let routes = compute_all_routes(&a.into(), &c.into(), &pools, 3);
        assert_eq!(routes.len(), 2);
        for route in &routes {
            let mut addresses: Vec<Address> = route.pools.iter().map(|p| p.address()).collect();
            addresses.dedup();
            assert_eq!(addresses.len(), route.pools.len());
        }
    }

    #[test]
    fn test_native_input_matches_wrapped_pools() {
        let wmnt = token(7, "WMNT");
        let mnt = Currency::native(18, "MNT", wmnt.clone());
        let usdt = token(2, "USDT");
        let pools = vec![v3(10, &wmnt, &usdt)];
        let routes = compute_all_routes(&mnt, &usdt.into(), &pools, 3);
        assert_eq!(routes.len(), 1);
        assert!(routes[0].input.is_native());
        assert_eq!(routes[0].path.len(), 2);
    }

    #[test]
    fn test_exact_output_drops_mixed() {
        let a = token(1, "A");
        let b = token(2, "B");
        let c = token(3, "C");
        let pools = vec![v3(10, &a, &b), v2(11, &a, &c), v3(12, &c, &b)];
        let routes = compute_all_routes(&a.into(), &b.into(), &pools, 3);
        assert_eq!(routes.len(), 2);

        let filtered = filter_routes_for_trade_type(routes.clone(), TradeType::ExactOutput);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].route_type, RouteType::V3);

        let kept = filter_routes_for_trade_type(routes, TradeType::ExactInput);
        assert_eq!(kept.len(), 2);
    }
}
