//! Amount distribution
//!
//! Splits the trade amount into cumulative percentage slices so each route
//! can be priced at every size it might carry in a split.

use std::sync::Arc;

use router_core::{ConfigError, CurrencyAmount, TradeType};

use crate::state::{BaseRoute, RouteWithoutQuote};

/// Percentages `[d, 2d, ..., 100]` and the matching amounts (rounded down).
pub fn get_amount_distribution(
    amount: &CurrencyAmount,
    distribution_percent: u32,
) -> Result<(Vec<u32>, Vec<CurrencyAmount>), ConfigError> {
    if distribution_percent == 0 || distribution_percent > 100 || 100 % distribution_percent != 0 {
        return Err(ConfigError::InvalidDistributionPercent {
            value: distribution_percent,
        });
    }

    let percents: Vec<u32> = (1..=100 / distribution_percent)
        .map(|i| i * distribution_percent)
        .collect();
    let amounts = percents
        .iter()
        .map(|pct| amount.multiply_fraction(*pct as u64, 100))
        .collect();
    Ok((percents, amounts))
}

/// Pair every slice with every base route, slice-major.
pub fn build_routes_without_quote(
    base_routes: &[Arc<BaseRoute>],
    percents: &[u32],
    amounts: &[CurrencyAmount],
    trade_type: TradeType,
) -> Vec<RouteWithoutQuote> {
    percents
        .iter()
        .zip(amounts)
        .flat_map(|(percent, amount)| {
            base_routes.iter().enumerate().map(move |(route_id, route)| RouteWithoutQuote {
                route: Arc::clone(route),
                route_id,
                percent: *percent,
                amount: amount.clone(),
                trade_type,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};
    use router_core::{ChainId, Currency, Token};

    fn amount(raw: u64) -> CurrencyAmount {
        let token = Token::new(ChainId::MANTLE, Address::repeat_byte(1), 18, "A");
        CurrencyAmount::new(token.into(), U256::from(raw))
    }

    #[test]
    fn test_distribution_fifty() {
        let (percents, amounts) = get_amount_distribution(&amount(1_001), 50).unwrap();
        assert_eq!(percents, vec![50, 100]);
        assert_eq!(amounts[0].raw, U256::from(500u64));
        assert_eq!(amounts[1].raw, U256::from(1_001u64));
    }

    #[test]
    fn test_distribution_five() {
        let (percents, amounts) = get_amount_distribution(&amount(100), 5).unwrap();
        assert_eq!(percents.len(), 20);
        assert_eq!(percents[0], 5);
        assert_eq!(*percents.last().unwrap(), 100);
        assert_eq!(amounts[3].raw, U256::from(20u64));
    }

    #[test]
    fn test_distribution_rejects_non_divisor() {
        assert!(matches!(
            get_amount_distribution(&amount(100), 30),
            Err(ConfigError::InvalidDistributionPercent { value: 30 })
        ));
        assert!(get_amount_distribution(&amount(100), 0).is_err());
    }

    #[test]
    fn test_routes_without_quote_slice_major() {
        let a = Token::new(ChainId::MANTLE, Address::repeat_byte(1), 18, "A");
        let b = Token::new(ChainId::MANTLE, Address::repeat_byte(2), 18, "B");
        let route = |input: &Token, output: &Token| {
            Arc::new(BaseRoute {
                route_type: crate::state::RouteType::V2,
                input: Currency::from(input.clone()),
                output: Currency::from(output.clone()),
                pools: Vec::new(),
                path: Vec::new(),
            })
        };
        let routes = vec![route(&a, &b), route(&a, &b)];
        let (percents, amounts) = get_amount_distribution(&amount(1_000), 50).unwrap();

        let slices = build_routes_without_quote(&routes, &percents, &amounts, TradeType::ExactInput);
        let layout: Vec<(u32, usize)> = slices.iter().map(|r| (r.percent, r.route_id)).collect();
        assert_eq!(layout, vec![(50, 0), (50, 1), (100, 0), (100, 1)]);
    }
}
