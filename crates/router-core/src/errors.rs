//! Error types for the smart router

use thiserror::Error;

/// Core errors that can occur while routing a trade
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Route(#[from] RouteError),

    #[error("Quote error: {0}")]
    Quote(#[from] QuoteError),

    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),
}

/// Fatal misconfiguration, surfaced immediately
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing provider: {name}")]
    MissingProvider { name: &'static str },

    #[error("distributionPercent must be in 1..=100 and divide 100, got {value}")]
    InvalidDistributionPercent { value: u32 },

    #[error(
        "Multicall request may fail as the gas cost of a single call exceeds the gas limit {gas_limit}. Gas cost: {call_gas}. To: {target}"
    )]
    CallExceedsGasLimit {
        gas_limit: u64,
        call_gas: u64,
        target: String,
    },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// No usable route for the request
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Cannot find a valid swap route: no candidate pools")]
    NoCandidatePools,

    #[error("Cannot find a valid swap route")]
    NoRouteFound,
}

/// Quote acquisition errors
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Quote reverted for route {route}")]
    Reverted { route: String },

    #[error("Failed to decode quote: {message}")]
    Decode { message: String },

    #[error("Insufficient reserves")]
    InsufficientReserves,

    #[error("Insufficient input amount")]
    InsufficientInputAmount,

    #[error("Unsupported route: {message}")]
    Unsupported { message: String },

    #[error("All quote providers failed: {}", reasons.join(","))]
    AggregateFailure { reasons: Vec<String> },
}

/// JSON-RPC transport errors
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("RPC transport failed at {url}: {message}")]
    Transport { url: String, message: String },

    #[error("RPC returned error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("RPC request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("Failed to parse RPC response: {0}")]
    Parse(String),
}

/// Result type alias for router operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Stable error code for callers that map errors to responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Route(e) => e.error_code(),
            Self::Quote(e) => e.error_code(),
            Self::Rpc(e) => e.error_code(),
        }
    }

    /// True for "no valid route" outcomes
    pub fn is_no_route(&self) -> bool {
        matches!(self, Self::Route(_))
    }
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingProvider { .. } => "missing_provider",
            Self::InvalidDistributionPercent { .. } => "invalid_distribution_percent",
            Self::CallExceedsGasLimit { .. } => "call_exceeds_gas_limit",
            Self::Invalid { .. } => "invalid_config",
        }
    }
}

impl RouteError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoCandidatePools => "no_candidate_pools",
            Self::NoRouteFound => "no_route_found",
        }
    }
}

impl QuoteError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Reverted { .. } => "quote_reverted",
            Self::Decode { .. } => "quote_decode",
            Self::InsufficientReserves => "insufficient_reserves",
            Self::InsufficientInputAmount => "insufficient_input_amount",
            Self::Unsupported { .. } => "unsupported_route",
            Self::AggregateFailure { .. } => "aggregate_quote_failure",
        }
    }
}

impl RpcError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "rpc_transport",
            Self::Rpc { .. } => "rpc_error",
            Self::Timeout { .. } => "rpc_timeout",
            Self::Parse(_) => "rpc_parse",
        }
    }
}
