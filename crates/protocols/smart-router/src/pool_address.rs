//! Deterministic pool addresses
//!
//! Pools are deployed with CREATE2, so their addresses follow from the token
//! pair (and fee tier) without an RPC round trip. Results are memoized in a
//! [`PoolAddressCache`] owned by the pool provider.

use std::collections::HashMap;

use alloy_primitives::{keccak256, Address, B256};
use parking_lot::RwLock;
use router_core::{ContractAddresses, PoolType, Token};

/// `keccak256(0xff ++ deployer ++ salt ++ init_code_hash)[12..]`
fn create2_address(deployer: Address, salt: B256, init_code_hash: B256) -> Address {
    let mut buf = Vec::with_capacity(1 + 20 + 32 + 32);
    buf.push(0xff);
    buf.extend_from_slice(deployer.as_slice());
    buf.extend_from_slice(salt.as_slice());
    buf.extend_from_slice(init_code_hash.as_slice());
    Address::from_slice(&keccak256(&buf)[12..])
}

/// V2 pair: salt is `keccak256(token0 ++ token1)` (packed)
pub fn compute_v2_pair_address(factory: Address, init_code_hash: B256, a: &Token, b: &Token) -> Address {
    let (token0, token1) = Token::sort_pair(a, b);
    let mut packed = Vec::with_capacity(40);
    packed.extend_from_slice(token0.address.as_slice());
    packed.extend_from_slice(token1.address.as_slice());
    create2_address(factory, keccak256(&packed), init_code_hash)
}

/// V3 pool: salt is `keccak256(abi.encode(token0, token1, uint24 fee))`
pub fn compute_v3_pool_address(
    deployer: Address,
    init_code_hash: B256,
    a: &Token,
    b: &Token,
    fee: u32,
) -> Address {
    let (token0, token1) = Token::sort_pair(a, b);
    let mut encoded = [0u8; 96];
    encoded[12..32].copy_from_slice(token0.address.as_slice());
    encoded[44..64].copy_from_slice(token1.address.as_slice());
    encoded[92..96].copy_from_slice(&fee.to_be_bytes());
    create2_address(deployer, keccak256(encoded), init_code_hash)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PoolKey {
    pool_type: PoolType,
    token0: Address,
    token1: Address,
    fee: u32,
}

/// Memoized pool address derivation for one chain
pub struct PoolAddressCache {
    contracts: ContractAddresses,
    entries: RwLock<HashMap<PoolKey, Address>>,
}

impl PoolAddressCache {
    pub fn new(contracts: ContractAddresses) -> Self {
        Self {
            contracts,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn v2_pair_address(&self, a: &Token, b: &Token) -> Address {
        let (token0, token1) = Token::sort_pair(a, b);
        let key = PoolKey {
            pool_type: PoolType::V2,
            token0: token0.address,
            token1: token1.address,
            fee: 0,
        };
        self.get_or_compute(key, || {
            compute_v2_pair_address(self.contracts.v2_factory, self.contracts.v2_init_code_hash, a, b)
        })
    }

    pub fn v3_pool_address(&self, a: &Token, b: &Token, fee: u32) -> Address {
        let (token0, token1) = Token::sort_pair(a, b);
        let key = PoolKey {
            pool_type: PoolType::V3,
            token0: token0.address,
            token1: token1.address,
            fee,
        };
        self.get_or_compute(key, || {
            compute_v3_pool_address(
                self.contracts.v3_pool_deployer,
                self.contracts.v3_init_code_hash,
                a,
                b,
                fee,
            )
        })
    }

    fn get_or_compute(&self, key: PoolKey, compute: impl FnOnce() -> Address) -> Address {
        if let Some(address) = self.entries.read().get(&key) {
            return *address;
        }
        let address = compute();
        self.entries.write().insert(key, address);
        address
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256};
    use router_core::ChainId;

    fn token(addr: Address) -> Token {
        Token::new(ChainId(1), addr, 18, "T")
    }

    fn contracts() -> ContractAddresses {
        ContractAddresses {
            v2_factory: address!("5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f"),
            v2_init_code_hash: b256!("96e8ac4277198ff8b6f785478aa9a39f403cb768dd02cbee326c3e7da348845f"),
            v3_pool_deployer: address!("1F98431c8aD98523631AE4a59f267346ea31F984"),
            v3_init_code_hash: b256!("e34f199b19b2b4f47f68442619d555527d244f78a3297ea89325f843f87b8b54"),
            quoter_v2: Address::ZERO,
            mixed_route_quoter_v1: Address::ZERO,
            gas_multicall: Address::ZERO,
        }
    }

    #[test]
    fn test_v2_pair_address_known_vector() {
        // USDC/WETH pair on Ethereum mainnet
        let usdc = token(address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"));
        let weth = token(address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"));
        let c = contracts();
        let pair = compute_v2_pair_address(c.v2_factory, c.v2_init_code_hash, &weth, &usdc);
        assert_eq!(pair, address!("B4e16d0168e52d35CaCD2c6185b44281Ec28C9Dc"));
    }

    #[test]
    fn test_v3_pool_address_known_vector() {
        // USDC/WETH 0.05% pool on Ethereum mainnet
        let usdc = token(address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"));
        let weth = token(address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"));
        let c = contracts();
        let pool = compute_v3_pool_address(c.v3_pool_deployer, c.v3_init_code_hash, &usdc, &weth, 500);
        assert_eq!(pool, address!("88e6A0c2dDD26FEEb64F039a2c41296FcB3f5640"));
    }

    #[test]
    fn test_cache_is_order_independent_and_clearable() {
        let cache = PoolAddressCache::new(contracts());
        let a = token(Address::repeat_byte(1));
        let b = token(Address::repeat_byte(2));

        let ab = cache.v3_pool_address(&a, &b, 500);
        let ba = cache.v3_pool_address(&b, &a, 500);
        assert_eq!(ab, ba);
        assert_eq!(cache.len(), 1);

        assert_ne!(cache.v3_pool_address(&a, &b, 2500), ab);
        assert_ne!(cache.v2_pair_address(&a, &b), ab);
        assert_eq!(cache.len(), 3);

        cache.clear();
        assert!(cache.is_empty());
    }
}
