//! Packed path encoding for the on-chain quoters
//!
//! `token(20) fee(3) token(20) fee(3) ... token(20)`, using the wrapped form
//! of every currency. V2 hops carry [`V2_FEE_PATH_PLACEHOLDER`] as their fee.

use alloy_primitives::{Bytes, U256};
use router_core::QuoteError;

use crate::constants::V2_FEE_PATH_PLACEHOLDER;
use crate::state::{BaseRoute, Pool};

fn path_fee(pool: &Pool) -> u32 {
    match pool {
        Pool::V2(_) => V2_FEE_PATH_PLACEHOLDER,
        Pool::V3(p) => p.fee,
    }
}

/// Encode `route` for the quoters. Exact-output paths run output to input.
pub fn encode_route_path(route: &BaseRoute, exact_output: bool) -> Result<Bytes, QuoteError> {
    let mut tokens = Vec::with_capacity(route.pools.len() + 1);
    let mut current = route.input.wrapped();
    tokens.push(current);
    for pool in &route.pools {
        current = pool.output_token(current).ok_or_else(|| QuoteError::Unsupported {
            message: format!("pool {} does not connect route {}", pool.address(), route),
        })?;
        tokens.push(current);
    }
    let mut fees: Vec<u32> = route.pools.iter().map(path_fee).collect();

    if exact_output {
        tokens.reverse();
        fees.reverse();
    }

    let mut encoded = Vec::with_capacity(tokens.len() * 20 + fees.len() * 3);
    for (i, token) in tokens.iter().enumerate() {
        encoded.extend_from_slice(token.address.as_slice());
        if let Some(fee) = fees.get(i) {
            encoded.extend_from_slice(&fee.to_be_bytes()[1..]);
        }
    }
    Ok(encoded.into())
}

/// Per-hop protocol flags for the mixed quoter: 0 for V3, 1 for V2
pub fn mixed_route_flags(route: &BaseRoute) -> Vec<U256> {
    route
        .pools
        .iter()
        .map(|pool| match pool {
            Pool::V2(_) => U256::from(1u8),
            Pool::V3(_) => U256::ZERO,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::build_base_route;
    use crate::state::{TokenAmount, V2Pool, V3Pool};
    use alloy_primitives::Address;
    use router_core::{ChainId, Currency, Token};

    fn token(addr: u8) -> Token {
        Token::new(ChainId::MANTLE, Address::repeat_byte(addr), 18, "T")
    }

    fn v3(a: &Token, b: &Token, fee: u32) -> Pool {
        Pool::V3(V3Pool {
            address: Address::repeat_byte(0x30),
            token0: a.clone(),
            token1: b.clone(),
            fee,
            sqrt_price_x96: U256::from(1u64) << 96,
            liquidity: 1,
            tick: 0,
        })
    }

    fn v2(a: &Token, b: &Token) -> Pool {
        Pool::V2(V2Pool {
            address: Address::repeat_byte(0x31),
            reserve0: TokenAmount::new(a.clone(), U256::from(1u64)),
            reserve1: TokenAmount::new(b.clone(), U256::from(1u64)),
        })
    }

    #[test]
    fn test_single_hop_layout() {
        let a = token(0xaa);
        let b = token(0xbb);
        let route = build_base_route(&a.clone().into(), &b.clone().into(), vec![v3(&b, &a, 500)]);
        let path = encode_route_path(&route, false).unwrap();
        assert_eq!(path.len(), 43);
        assert_eq!(&path[..20], a.address.as_slice());
        assert_eq!(&path[20..23], &[0x00, 0x01, 0xf4]);
        assert_eq!(&path[23..], b.address.as_slice());
    }

    #[test]
    fn test_exact_output_reverses() {
        let a = token(0xaa);
        let b = token(0xbb);
        let c = token(0xcc);
        let route = build_base_route(
            &a.clone().into(),
            &c.clone().into(),
            vec![v3(&a, &b, 500), v3(&b, &c, 2500)],
        );
        let path = encode_route_path(&route, true).unwrap();
        assert_eq!(path.len(), 66);
        assert_eq!(&path[..20], c.address.as_slice());
        assert_eq!(&path[20..23], &[0x00, 0x09, 0xc4]);
        assert_eq!(&path[23..43], b.address.as_slice());
        assert_eq!(&path[43..46], &[0x00, 0x01, 0xf4]);
        assert_eq!(&path[46..], a.address.as_slice());
    }

    #[test]
    fn test_mixed_route_placeholder_and_flags() {
        let wmnt = token(0x77);
        let mnt = Currency::native(18, "MNT", wmnt.clone());
        let b = token(0xbb);
        let c = token(0xcc);
        let route = build_base_route(&mnt, &c.clone().into(), vec![v2(&wmnt, &b), v3(&b, &c, 100)]);

        let path = encode_route_path(&route, false).unwrap();
        assert_eq!(&path[..20], wmnt.address.as_slice());
        assert_eq!(&path[20..23], &[0x80, 0x00, 0x00]);
        assert_eq!(&path[43..46], &[0x00, 0x00, 0x64]);

        assert_eq!(mixed_route_flags(&route), vec![U256::from(1u8), U256::ZERO]);
    }
}
