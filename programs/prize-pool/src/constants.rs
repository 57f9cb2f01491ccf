/// PDA seeds
pub const PRIZE_POOL_SEED: &[u8] = b"prize_pool";
pub const PRIZE_STRATEGY_SEED: &[u8] = b"prize_strategy";
pub const DEPOSITOR_SEED: &[u8] = b"depositor";
pub const RNG_REQUEST_SEED: &[u8] = b"rng_request";
pub const EXTERNAL_AWARDS_SEED: &[u8] = b"external_awards";
pub const VAULT_SEED: &[u8] = b"vault";

/// Fixed-point scale for rates and fractions (1.0 == 1e18)
pub const MANTISSA_SCALE: u128 = 1_000_000_000_000_000_000;

/// Upper bound on any fraction expressed as a mantissa
pub const MAX_FRACTION_MANTISSA: u128 = MANTISSA_SCALE;

/// Leaves in the sortition tree; must be a power of two
pub const SORTITION_CAPACITY: usize = 1024;
pub const SORTITION_NODE_COUNT: usize = SORTITION_CAPACITY * 2;

/// External award registry limits
pub const MAX_EXTERNAL_ERC20_AWARDS: usize = 8;
pub const MAX_EXTERNAL_NFT_AWARDS: usize = 16;
