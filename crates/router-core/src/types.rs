//! Core type definitions for the smart router

use std::fmt;
use std::hash::{Hash, Hasher};

use alloy_primitives::{address, Address, U256};
use serde::{Deserialize, Serialize};

/// Sentinel address used for the chain's native coin.
pub const NATIVE_ADDRESS: Address = address!("EeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");

/// EVM chain identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
    pub const MANTLE: ChainId = ChainId(5000);
    pub const MANTLE_TESTNET: ChainId = ChainId(5001);

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn is_mantle(&self) -> bool {
        *self == Self::MANTLE || *self == Self::MANTLE_TESTNET
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ERC-20 token. Identity is `(chain_id, address)`; metadata is ignored by
/// equality and hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub chain_id: ChainId,
    pub address: Address,
    pub decimals: u8,
    pub symbol: String,
}

impl Token {
    pub fn new(chain_id: ChainId, address: Address, decimals: u8, symbol: impl Into<String>) -> Self {
        Self {
            chain_id,
            address,
            decimals,
            symbol: symbol.into(),
        }
    }

    /// Address ordering used by pool contracts to assign token0/token1
    pub fn sorts_before(&self, other: &Token) -> bool {
        self.address < other.address
    }

    /// Returns `(token0, token1)` ordered by address
    pub fn sort_pair<'a>(a: &'a Token, b: &'a Token) -> (&'a Token, &'a Token) {
        if a.sorts_before(b) {
            (a, b)
        } else {
            (b, a)
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.address == other.address
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
        self.address.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// A native coin or an ERC-20 token.
///
/// The native variant carries its canonical wrapped token so routing code can
/// always work on [`Currency::wrapped`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Currency {
    Native {
        decimals: u8,
        symbol: String,
        wrapped: Token,
    },
    Token(Token),
}

impl Currency {
    pub fn native(decimals: u8, symbol: impl Into<String>, wrapped: Token) -> Self {
        Self::Native {
            decimals,
            symbol: symbol.into(),
            wrapped,
        }
    }

    pub fn chain_id(&self) -> ChainId {
        self.wrapped().chain_id
    }

    pub fn address(&self) -> Address {
        match self {
            Self::Native { .. } => NATIVE_ADDRESS,
            Self::Token(token) => token.address,
        }
    }

    pub fn decimals(&self) -> u8 {
        match self {
            Self::Native { decimals, .. } => *decimals,
            Self::Token(token) => token.decimals,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Self::Native { symbol, .. } => symbol,
            Self::Token(token) => &token.symbol,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native { .. })
    }

    /// The ERC-20 form of this currency
    pub fn wrapped(&self) -> &Token {
        match self {
            Self::Native { wrapped, .. } => wrapped,
            Self::Token(token) => token,
        }
    }

    /// Equality after unwrapping native to its wrapped token
    pub fn wraps_to(&self, token: &Token) -> bool {
        self.wrapped() == token
    }
}

impl From<Token> for Currency {
    fn from(token: Token) -> Self {
        Self::Token(token)
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id() == other.chain_id() && self.address() == other.address()
    }
}

impl Eq for Currency {}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Raw integer amount of a currency, in its smallest unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyAmount {
    pub currency: Currency,
    pub raw: U256,
}

impl CurrencyAmount {
    pub fn new(currency: Currency, raw: U256) -> Self {
        Self { currency, raw }
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(currency, U256::ZERO)
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// `raw * numerator / denominator`, rounded down
    pub fn multiply_fraction(&self, numerator: u64, denominator: u64) -> Self {
        let raw = self.raw * U256::from(numerator) / U256::from(denominator);
        Self::new(self.currency.clone(), raw)
    }

    /// Human-readable decimal string
    pub fn to_exact(&self) -> String {
        format_units(self.raw, self.currency.decimals())
    }
}

impl fmt::Display for CurrencyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_exact(), self.currency.symbol())
    }
}

/// Format a raw integer amount with `decimals` fractional digits, trimming
/// trailing zeros.
pub fn format_units(raw: U256, decimals: u8) -> String {
    let digits = raw.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }
    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
    } else {
        digits
    };
    let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
    let frac = frac_part.trim_end_matches('0');
    if frac.is_empty() {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, frac)
    }
}

/// Direction of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeType {
    /// Amount given is the input; maximize output
    ExactInput,
    /// Amount given is the output; minimize input
    ExactOutput,
}

impl TradeType {
    pub fn is_exact_in(&self) -> bool {
        matches!(self, Self::ExactInput)
    }
}

/// Pool protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolType {
    /// Constant-product pool
    V2,
    /// Concentrated-liquidity pool
    V3,
}

impl PoolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V2 => "V2",
            Self::V3 => "V3",
        }
    }
}

impl fmt::Display for PoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(addr: u8, symbol: &str) -> Token {
        Token::new(ChainId::MANTLE, Address::repeat_byte(addr), 18, symbol)
    }

    #[test]
    fn test_token_equality_ignores_metadata() {
        let a = token(1, "AAA");
        let mut b = token(1, "renamed");
        b.decimals = 6;
        assert_eq!(a, b);
        assert_ne!(a, token(2, "AAA"));
    }

    #[test]
    fn test_native_unwraps_to_wrapped_token() {
        let wmnt = token(7, "WMNT");
        let mnt = Currency::native(18, "MNT", wmnt.clone());
        assert!(mnt.is_native());
        assert_eq!(mnt.address(), NATIVE_ADDRESS);
        assert!(mnt.wraps_to(&wmnt));
        assert_ne!(mnt, Currency::from(wmnt));
    }

    #[test]
    fn test_sort_pair() {
        let a = token(1, "A");
        let b = token(2, "B");
        let (t0, t1) = Token::sort_pair(&b, &a);
        assert_eq!(t0, &a);
        assert_eq!(t1, &b);
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(U256::from(1_500_000u64), 6), "1.5");
        assert_eq!(format_units(U256::from(5u64), 3), "0.005");
        assert_eq!(format_units(U256::from(42u64), 0), "42");
        assert_eq!(format_units(U256::from(2_000_000u64), 6), "2");
    }

    #[test]
    fn test_multiply_fraction_rounds_down() {
        let amount = CurrencyAmount::new(token(1, "A").into(), U256::from(101u64));
        assert_eq!(amount.multiply_fraction(50, 100).raw, U256::from(50u64));
    }

    #[test]
    fn test_trade_type_serialization() {
        let json = serde_json::to_string(&TradeType::ExactOutput).unwrap();
        assert_eq!(json, "\"EXACT_OUTPUT\"");
    }
}
