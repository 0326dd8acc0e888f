//! V2 Calculator
//!
//! Constant product swap math (x * y = k) with the 0.25% V2 fee. Intermediate
//! products are computed with arbitrary precision so large reserves cannot
//! overflow 256 bits mid-calculation.

use alloy_primitives::U256;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use router_core::{QuoteError, Token};

use crate::constants::fees::{V2_FEE_DENOM, V2_FEE_NUM};
use crate::state::V2Pool;

pub(crate) fn to_big(value: U256) -> BigUint {
    BigUint::from_bytes_be(&value.to_be_bytes::<32>())
}

pub(crate) fn from_big(value: &BigUint) -> Option<U256> {
    if value.bits() > 256 {
        return None;
    }
    Some(U256::from_be_slice(&value.to_bytes_be()))
}

/// Calculate swap output
///
/// Formula: output = (reserve_out * input * 9975) / (reserve_in * 10000 + input * 9975)
pub fn calculate_output(
    reserve_in: U256,
    reserve_out: U256,
    input_amount: U256,
) -> Result<U256, QuoteError> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(QuoteError::InsufficientReserves);
    }

    let input_with_fee = to_big(input_amount) * BigUint::from(V2_FEE_NUM);
    let numerator = &input_with_fee * to_big(reserve_out);
    let denominator = to_big(reserve_in) * BigUint::from(V2_FEE_DENOM) + input_with_fee;

    let output = numerator / denominator;
    if output.is_zero() {
        return Err(QuoteError::InsufficientInputAmount);
    }
    from_big(&output).ok_or(QuoteError::InsufficientReserves)
}

/// Calculate required input for a desired output (reverse calculation)
///
/// Formula: input = (reserve_in * output * 10000) / ((reserve_out - output) * 9975) + 1
pub fn calculate_input(
    reserve_in: U256,
    reserve_out: U256,
    output_amount: U256,
) -> Result<U256, QuoteError> {
    if reserve_in.is_zero() || reserve_out.is_zero() || output_amount >= reserve_out {
        return Err(QuoteError::InsufficientReserves);
    }

    let numerator = to_big(reserve_in) * to_big(output_amount) * BigUint::from(V2_FEE_DENOM);
    let denominator = to_big(reserve_out - output_amount) * BigUint::from(V2_FEE_NUM);

    let input = numerator / denominator + BigUint::one(); // Round up
    from_big(&input).ok_or(QuoteError::InsufficientReserves)
}

/// Output of swapping `amount_in` of `token_in` through `pool`
pub fn get_output_amount(pool: &V2Pool, token_in: &Token, amount_in: U256) -> Result<U256, QuoteError> {
    let (reserve_in, reserve_out) = pool.reserves_for(token_in).ok_or_else(|| QuoteError::Unsupported {
        message: format!("token {} is not in pair {}", token_in, pool.address),
    })?;
    calculate_output(reserve_in.raw, reserve_out.raw, amount_in)
}

/// Input of the other token needed to receive `amount_out` of `token_out` from `pool`
pub fn get_input_amount(pool: &V2Pool, token_out: &Token, amount_out: U256) -> Result<U256, QuoteError> {
    let (reserve_out, reserve_in) = pool.reserves_for(token_out).ok_or_else(|| QuoteError::Unsupported {
        message: format!("token {} is not in pair {}", token_out, pool.address),
    })?;
    calculate_input(reserve_in.raw, reserve_out.raw, amount_out)
}

/// Convert `amount` (with `from_decimals`) at `price` units of the target per
/// unit of the source, into the target's smallest unit. Rounds down.
pub fn convert_amount(amount: U256, from_decimals: u8, to_decimals: u8, price: f64) -> U256 {
    if !price.is_finite() || price <= 0.0 || amount.is_zero() {
        return U256::ZERO;
    }

    // 18-digit fixed point for the price
    let scaled_price = (price * 1e18).floor();
    if scaled_price < 1.0 || scaled_price > u128::MAX as f64 {
        return U256::ZERO;
    }
    let price_fp = BigUint::from(scaled_price as u128);

    let numerator = to_big(amount) * price_fp * BigUint::from(10u32).pow(to_decimals as u32);
    let denominator = BigUint::from(10u32).pow(18 + from_decimals as u32);
    from_big(&(numerator / denominator)).unwrap_or(U256::MAX)
}
