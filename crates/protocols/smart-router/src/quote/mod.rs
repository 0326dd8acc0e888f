//! Quote providers
//!
//! Turn route slices into priced, gas-adjusted quotes. Pure-V2 routes are
//! priced off-chain from reserves; V3 and mixed routes go through the
//! on-chain quoters in gas-bounded multicall batches. The dispatcher fans a
//! request out to all of them.

pub mod dispatcher;
pub mod offchain;
pub mod onchain;

use async_trait::async_trait;
use router_core::{CurrencyAmount, Result, TradeType};

use crate::gas_model::{GasCost, GasModel};
use crate::state::{RouteWithQuote, RouteWithoutQuote};

pub use dispatcher::QuoteProviderDispatcher;
pub use offchain::OffChainQuoteProvider;
pub use onchain::{OnChainQuoteProvider, QuoterKind};

/// Prices route slices for one trade direction.
///
/// Routes that cannot be priced are left out of the result; an `Err` means
/// the provider as a whole failed.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn quote_exact_in(&self, routes: &[RouteWithoutQuote], gas_model: &GasModel) -> Result<Vec<RouteWithQuote>>;

    async fn quote_exact_out(&self, routes: &[RouteWithoutQuote], gas_model: &GasModel) -> Result<Vec<RouteWithQuote>>;
}

/// `quote - gas` for exact-input (floored at zero), `quote + gas` for exact-output
pub fn adjust_quote_for_gas(trade_type: TradeType, quote: &CurrencyAmount, gas_cost_in_token: &CurrencyAmount) -> CurrencyAmount {
    let raw = match trade_type {
        TradeType::ExactInput => quote.raw.saturating_sub(gas_cost_in_token.raw),
        TradeType::ExactOutput => quote.raw.saturating_add(gas_cost_in_token.raw),
    };
    CurrencyAmount::new(quote.currency.clone(), raw)
}

/// Assemble a priced route from its raw quote and gas cost
pub(crate) fn with_quote(route: &RouteWithoutQuote, quote: CurrencyAmount, gas: GasCost) -> RouteWithQuote {
    let quote_adjusted_for_gas = adjust_quote_for_gas(route.trade_type, &quote, &gas.gas_cost_in_token);
    tracing::debug!(
        "{}% Swap {} through {} : {}",
        route.percent,
        route.amount,
        route.route,
        quote
    );
    RouteWithQuote {
        route: route.clone(),
        quote,
        quote_adjusted_for_gas,
        gas_estimate: gas.gas_estimate,
        gas_cost_in_token: gas.gas_cost_in_token,
        gas_cost_in_usd: gas.gas_cost_in_usd,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};
    use router_core::{ChainId, Token};

    fn amount(raw: u64) -> CurrencyAmount {
        let token = Token::new(ChainId::MANTLE, Address::repeat_byte(1), 6, "USDC");
        CurrencyAmount::new(token.into(), U256::from(raw))
    }

    #[test]
    fn test_adjust_for_gas() {
        let quote = amount(1_000);
        let gas = amount(30);
        assert_eq!(adjust_quote_for_gas(TradeType::ExactInput, &quote, &gas).raw, U256::from(970u64));
        assert_eq!(adjust_quote_for_gas(TradeType::ExactOutput, &quote, &gas).raw, U256::from(1_030u64));
    }

    #[test]
    fn test_adjust_for_gas_never_negative() {
        let adjusted = adjust_quote_for_gas(TradeType::ExactInput, &amount(10), &amount(30));
        assert!(adjusted.is_zero());
    }
}
