/// PDA seeds
pub const VAULT_SEED: &[u8] = b"vault";
pub const STRATEGY_SEED: &[u8] = b"strategy";
pub const SHARE_MINT_SEED: &[u8] = b"share_mint";

/// Seed the pool program uses for position accounts: [POSITION_SEED, pool, owner, lower, upper]
pub const POSITION_SEED: &[u8] = b"position";

/// Time constants
pub const SECONDS_PER_YEAR: u64 = 365 * 86400;

/// Fee constants
pub const MAX_BPS: u16 = 10000;

/// Shares can never be reduced below this once minted
pub const MIN_TOTAL_SUPPLY: u64 = 1000;

/// Share mint decimals
pub const SHARE_DECIMALS: u8 = 9;
