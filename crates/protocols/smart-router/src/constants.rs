//! Router Constants
//!
//! Fee parameters, V3 fee tiers, path-encoding markers, and gas figures.

/// V2 swap fee (0.25% = 9975/10000)
pub mod fees {
    pub const V2_FEE_NUM: u64 = 9975;
    pub const V2_FEE_DENOM: u64 = 10_000;
}

/// V3 fee tiers in hundredths of a bip
pub mod fee_tiers {
    pub const LOWEST: u32 = 100;
    pub const LOW: u32 = 500;
    pub const MEDIUM: u32 = 2500;
    pub const HIGH: u32 = 10_000;

    pub const ALL: [u32; 4] = [LOWEST, LOW, MEDIUM, HIGH];
}

/// Fee field written for V2 hops in a packed mixed-route path.
///
/// The high bit of the 24-bit fee marks the hop as V2 for the mixed quoter.
pub const V2_FEE_PATH_PLACEHOLDER: u32 = 8_388_608;

/// Gas figures used by the gas model
pub mod gas {
    use router_core::ChainId;

    /// Cost of the first hop in a V2 run
    pub const BASE_SWAP_COST_V2: u64 = 135_000;

    /// Each further V2 hop in the same run
    pub const COST_PER_EXTRA_HOP_V2: u64 = 50_000;

    /// Base cost charged once per contiguous V3 run
    pub fn base_swap_cost_v3(chain_id: ChainId) -> u64 {
        if chain_id.is_mantle() {
            2_000
        } else {
            0
        }
    }

    /// Charged for every V3 pool in a route
    pub fn cost_per_hop_v3(chain_id: ChainId) -> u64 {
        if chain_id.is_mantle() {
            80_000
        } else {
            0
        }
    }

    /// Charged per initialized tick crossed (at least one)
    pub fn cost_per_init_tick(chain_id: ChainId) -> u64 {
        if chain_id.is_mantle() {
            31_000
        } else {
            0
        }
    }
}
