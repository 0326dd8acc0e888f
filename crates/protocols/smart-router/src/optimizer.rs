//! Route combination optimizer
//!
//! Picks the set of (route, percent) quotes whose percentages sum to exactly
//! 100 with the best total gas-adjusted quote: highest for exact-input,
//! lowest for exact-output. A base route appears at most once, at most
//! `max_splits` routes are used, and ties go to the combination with fewer
//! routes.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use alloy_primitives::U256;
use router_core::{CurrencyAmount, TradeType};

use crate::state::RouteWithQuote;

/// Best quotes kept per percent before searching combinations, raised to
/// `max_splits` when that is larger
const MAX_QUOTES_PER_PERCENT: usize = 8;

/// Chosen routes and their totals
#[derive(Debug, Clone)]
pub struct BestRoutes {
    pub routes: Vec<RouteWithQuote>,
    /// Sum of raw quotes
    pub quote: CurrencyAmount,
    pub quote_adjusted_for_gas: CurrencyAmount,
    pub gas_estimate: U256,
    pub gas_cost_in_token: CurrencyAmount,
    pub gas_cost_in_usd: CurrencyAmount,
}

struct Search<'a> {
    candidates: Vec<&'a RouteWithQuote>,
    trade_type: TradeType,
    max_splits: usize,
    best: Option<(U256, Vec<usize>)>,
}

impl<'a> Search<'a> {
    fn is_better(&self, total: U256, len: usize) -> bool {
        let Some((best_total, best)) = &self.best else {
            return true;
        };
        let ord = match self.trade_type {
            TradeType::ExactInput => total.cmp(best_total),
            TradeType::ExactOutput => best_total.cmp(&total),
        };
        ord == Ordering::Greater || (ord == Ordering::Equal && len < best.len())
    }

    fn run(&mut self, start: usize, remaining: u32, total: U256, chosen: &mut Vec<usize>, used: &mut HashSet<usize>) {
        if remaining == 0 {
            if self.is_better(total, chosen.len()) {
                self.best = Some((total, chosen.clone()));
            }
            return;
        }
        let slots = self.max_splits - chosen.len();
        if slots == 0 {
            return;
        }

        for i in start..self.candidates.len() {
            let candidate = self.candidates[i];
            let percent = candidate.percent();
            // Sorted by percent descending: nothing later can fill the rest
            if percent * (slots as u32) < remaining {
                break;
            }
            if percent > remaining || used.contains(&candidate.route_id()) {
                continue;
            }

            chosen.push(i);
            used.insert(candidate.route_id());
            let next_total = total.saturating_add(candidate.quote_adjusted_for_gas.raw);
            self.run(i + 1, remaining - percent, next_total, chosen, used);
            used.remove(&candidate.route_id());
            chosen.pop();
        }
    }
}

/// Choose the best split across `routes`.
///
/// Returns `None` when no combination covers 100%, or when the best
/// combination quotes zero.
pub fn get_best_route_combination(
    routes: &[RouteWithQuote],
    trade_type: TradeType,
    max_splits: usize,
) -> Option<BestRoutes> {
    if routes.is_empty() || max_splits == 0 {
        return None;
    }

    let mut by_percent: BTreeMap<u32, Vec<&RouteWithQuote>> = BTreeMap::new();
    for route in routes.iter().filter(|r| !r.quote.is_zero()) {
        by_percent.entry(route.percent()).or_default().push(route);
    }

    let mut candidates = Vec::new();
    for (_, mut quotes) in by_percent.into_iter().rev() {
        quotes.sort_by(|a, b| match trade_type {
            TradeType::ExactInput => b.quote_adjusted_for_gas.raw.cmp(&a.quote_adjusted_for_gas.raw),
            TradeType::ExactOutput => a.quote_adjusted_for_gas.raw.cmp(&b.quote_adjusted_for_gas.raw),
        });
        quotes.truncate(max_splits.max(MAX_QUOTES_PER_PERCENT));
        candidates.extend(quotes);
    }

    let mut search = Search {
        candidates,
        trade_type,
        max_splits,
        best: None,
    };
    search.run(0, 100, U256::ZERO, &mut Vec::new(), &mut HashSet::new());

    let (_, chosen) = search.best?;
    let chosen: Vec<RouteWithQuote> = chosen.into_iter().map(|i| search.candidates[i].clone()).collect();
    let first = chosen.first()?;

    let sum = |f: fn(&RouteWithQuote) -> U256| chosen.iter().fold(U256::ZERO, |acc, r| acc.saturating_add(f(r)));
    let quote = CurrencyAmount::new(first.quote.currency.clone(), sum(|r| r.quote.raw));
    if quote.is_zero() {
        return None;
    }

    let best = BestRoutes {
        quote_adjusted_for_gas: CurrencyAmount::new(first.quote.currency.clone(), sum(|r| r.quote_adjusted_for_gas.raw)),
        gas_estimate: sum(|r| r.gas_estimate),
        gas_cost_in_token: CurrencyAmount::new(first.gas_cost_in_token.currency.clone(), sum(|r| r.gas_cost_in_token.raw)),
        gas_cost_in_usd: CurrencyAmount::new(first.gas_cost_in_usd.currency.clone(), sum(|r| r.gas_cost_in_usd.raw)),
        quote,
        routes: chosen,
    };

    tracing::debug!(
        routes = best.routes.len(),
        quote = %best.quote,
        adjusted = %best.quote_adjusted_for_gas,
        "Best route combination"
    );
    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::build_base_route;
    use crate::state::{Pool, RouteWithoutQuote, TokenAmount, V2Pool};
    use alloy_primitives::Address;
    use router_core::{ChainId, Currency, Token};
    use std::sync::Arc;

    fn token(addr: u8, symbol: &str) -> Token {
        Token::new(ChainId::MANTLE, Address::repeat_byte(addr), 18, symbol)
    }

    /// Quote for base route `route_id` at `percent`, with a flat gas cost in token units
    fn quoted(route_id: usize, percent: u32, quote: u64, gas: u64, trade_type: TradeType) -> RouteWithQuote {
        let a = token(1, "A");
        let b = token(2, "B");
        let pool = Pool::V2(V2Pool {
            address: Address::repeat_byte(10 + route_id as u8),
            reserve0: TokenAmount::new(a.clone(), U256::from(1u64)),
            reserve1: TokenAmount::new(b.clone(), U256::from(1u64)),
        });
        let (ca, cb): (Currency, Currency) = (a.into(), b.into());
        let route = Arc::new(build_base_route(&ca, &cb, vec![pool]));
        let (amount_currency, quote_currency) = match trade_type {
            TradeType::ExactInput => (ca, cb),
            TradeType::ExactOutput => (cb, ca),
        };
        let quote = CurrencyAmount::new(quote_currency.clone(), U256::from(quote));
        let gas_cost = CurrencyAmount::new(quote_currency, U256::from(gas));
        RouteWithQuote {
            route: RouteWithoutQuote {
                route,
                route_id,
                percent,
                amount: CurrencyAmount::new(amount_currency, U256::from(percent as u64)),
                trade_type,
            },
            quote_adjusted_for_gas: crate::quote::adjust_quote_for_gas(trade_type, &quote, &gas_cost),
            quote,
            gas_estimate: U256::from(100_000u64),
            gas_cost_in_usd: CurrencyAmount::zero(gas_cost.currency.clone()),
            gas_cost_in_token: gas_cost,
        }
    }

    fn picks(best: &BestRoutes) -> Vec<(usize, u32)> {
        let mut picks: Vec<(usize, u32)> = best.routes.iter().map(|r| (r.route_id(), r.percent())).collect();
        picks.sort();
        picks
    }

    #[test]
    fn test_empty_is_none() {
        assert!(get_best_route_combination(&[], TradeType::ExactInput, 4).is_none());
    }

    #[test]
    fn test_single_route_takes_full_amount() {
        let routes = vec![
            quoted(0, 50, 1_000, 0, TradeType::ExactInput),
            quoted(0, 100, 1_990, 0, TradeType::ExactInput),
        ];
        let best = get_best_route_combination(&routes, TradeType::ExactInput, 4).unwrap();
        assert_eq!(picks(&best), vec![(0, 100)]);
        assert_eq!(best.quote.raw, U256::from(1_990u64));
    }

    #[test]
    fn test_zero_gas_split_beats_dominant_route() {
        // V3 is better at every slice size, but 1000 + 995 still beats 1990
        let routes = vec![
            quoted(0, 50, 1_000, 0, TradeType::ExactInput),
            quoted(0, 100, 1_990, 0, TradeType::ExactInput),
            quoted(1, 50, 995, 0, TradeType::ExactInput),
            quoted(1, 100, 1_980, 0, TradeType::ExactInput),
        ];
        let best = get_best_route_combination(&routes, TradeType::ExactInput, 4).unwrap();
        assert_eq!(picks(&best), vec![(0, 50), (1, 50)]);
        assert_eq!(best.quote.raw, U256::from(1_995u64));
    }

    #[test]
    fn test_wide_split_uses_more_than_eight_routes() {
        let mut routes = Vec::new();
        for id in 0..10 {
            routes.push(quoted(id, 10, 100, 0, TradeType::ExactInput));
            routes.push(quoted(id, 20, 150, 0, TradeType::ExactInput));
            routes.push(quoted(id, 100, 550, 0, TradeType::ExactInput));
        }
        let best = get_best_route_combination(&routes, TradeType::ExactInput, 10).unwrap();
        assert_eq!(best.routes.len(), 10);
        assert!(best.routes.iter().all(|r| r.percent() == 10));
        assert_eq!(best.quote.raw, U256::from(1_000u64));
    }

    #[test]
    fn test_dominant_route_beats_split_after_gas() {
        // V3 route 0, V2 route 1; each route costs 10 in gas
        let routes = vec![
            quoted(0, 50, 1_000, 10, TradeType::ExactInput),
            quoted(0, 100, 1_990, 10, TradeType::ExactInput),
            quoted(1, 50, 995, 10, TradeType::ExactInput),
            quoted(1, 100, 1_980, 10, TradeType::ExactInput),
        ];
        let best = get_best_route_combination(&routes, TradeType::ExactInput, 4).unwrap();
        assert_eq!(picks(&best), vec![(0, 100)]);
        assert_eq!(best.quote_adjusted_for_gas.raw, U256::from(1_980u64));
    }

    #[test]
    fn test_split_wins_when_it_nets_more() {
        let routes = vec![
            quoted(0, 50, 1_000, 0, TradeType::ExactInput),
            quoted(0, 100, 1_500, 0, TradeType::ExactInput),
            quoted(1, 50, 900, 0, TradeType::ExactInput),
            quoted(1, 100, 1_400, 0, TradeType::ExactInput),
        ];
        let best = get_best_route_combination(&routes, TradeType::ExactInput, 4).unwrap();
        assert_eq!(picks(&best), vec![(0, 50), (1, 50)]);
        assert_eq!(best.quote.raw, U256::from(1_900u64));
    }

    #[test]
    fn test_same_route_never_used_twice() {
        // 50% + 50% on route 0 would be 2000 but is not a valid split
        let routes = vec![
            quoted(0, 50, 1_000, 0, TradeType::ExactInput),
            quoted(0, 100, 1_200, 0, TradeType::ExactInput),
        ];
        let best = get_best_route_combination(&routes, TradeType::ExactInput, 4).unwrap();
        assert_eq!(picks(&best), vec![(0, 100)]);
    }

    #[test]
    fn test_max_splits_limits_route_count() {
        let mut routes = Vec::new();
        for id in 0..4 {
            routes.push(quoted(id, 25, 300, 0, TradeType::ExactInput));
            routes.push(quoted(id, 50, 500, 0, TradeType::ExactInput));
            routes.push(quoted(id, 100, 900, 0, TradeType::ExactInput));
        }
        let four = get_best_route_combination(&routes, TradeType::ExactInput, 4).unwrap();
        assert_eq!(four.routes.len(), 4);
        assert_eq!(four.quote.raw, U256::from(1_200u64));

        let two = get_best_route_combination(&routes, TradeType::ExactInput, 2).unwrap();
        assert_eq!(two.routes.len(), 2);
        assert_eq!(two.quote.raw, U256::from(1_000u64));

        let one = get_best_route_combination(&routes, TradeType::ExactInput, 1).unwrap();
        assert_eq!(one.routes.len(), 1);
    }

    #[test]
    fn test_ties_prefer_fewer_routes() {
        let routes = vec![
            quoted(0, 50, 500, 0, TradeType::ExactInput),
            quoted(0, 100, 1_000, 0, TradeType::ExactInput),
            quoted(1, 50, 500, 0, TradeType::ExactInput),
            quoted(1, 100, 1_000, 0, TradeType::ExactInput),
        ];
        let best = get_best_route_combination(&routes, TradeType::ExactInput, 4).unwrap();
        assert_eq!(best.routes.len(), 1);
        assert_eq!(best.routes[0].percent(), 100);
    }

    #[test]
    fn test_exact_output_minimizes_input() {
        let routes = vec![
            quoted(0, 50, 600, 0, TradeType::ExactOutput),
            quoted(0, 100, 1_300, 0, TradeType::ExactOutput),
            quoted(1, 50, 620, 0, TradeType::ExactOutput),
            quoted(1, 100, 1_250, 0, TradeType::ExactOutput),
        ];
        let best = get_best_route_combination(&routes, TradeType::ExactOutput, 4).unwrap();
        assert_eq!(picks(&best), vec![(0, 50), (1, 50)]);
        assert_eq!(best.quote.raw, U256::from(1_220u64));
    }

    #[test]
    fn test_missing_coverage_is_none() {
        let routes = vec![quoted(0, 50, 1_000, 0, TradeType::ExactInput)];
        assert!(get_best_route_combination(&routes, TradeType::ExactInput, 4).is_none());
    }

    #[test]
    fn test_zero_quotes_are_none() {
        let routes = vec![quoted(0, 100, 0, 0, TradeType::ExactInput)];
        assert!(get_best_route_combination(&routes, TradeType::ExactInput, 4).is_none());
    }
}
