use anchor_lang::prelude::*;

#[event]
pub struct VaultInitialized {
    pub vault: Pubkey,
    pub pool: Pubkey,
    pub governance: Pubkey,
    pub strategy: Pubkey,
    pub keeper: Pubkey,
    pub tick_spacing: i32,
    pub base_threshold: i32,
    pub limit_threshold: i32,
    pub protocol_fee_bps: u16,
    pub max_total_supply: u64,
    pub timestamp: i64,
}

#[event]
pub struct Deposit {
    pub vault: Pubkey,
    pub sender: Pubkey,
    pub to: Pubkey,
    pub shares: u64,
    pub amount0: u64,
    pub amount1: u64,
    pub fee0: u64,
    pub fee1: u64,
}

#[event]
pub struct Withdraw {
    pub vault: Pubkey,
    pub sender: Pubkey,
    pub to: Pubkey,
    pub shares: u64,
    pub amount0: u64,
    pub amount1: u64,
}

/// Emitted per position withdrawn during a rebalance.
#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectFees {
    pub pool: Pubkey,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub fees_from_pool_0: u64,
    pub fees_from_pool_1: u64,
    pub fees_to_protocol_0: u64,
    pub fees_to_protocol_1: u64,
}

/// Vault balances once all liquidity is pulled, before redeploying.
#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub pool: Pubkey,
    pub tick: i32,
    pub total_amount_0: u64,
    pub total_amount_1: u64,
    pub total_supply: u64,
}

#[event]
pub struct Rebalanced {
    pub vault: Pubkey,
    pub caller: Pubkey,
    pub tick: i32,
    pub base_lower: i32,
    pub base_upper: i32,
    pub limit_lower: i32,
    pub limit_upper: i32,
    pub streaming_fee0: u64,
    pub streaming_fee1: u64,
    pub timestamp: i64,
}

#[event]
pub struct ProtocolFeesCollected {
    pub vault: Pubkey,
    pub amount0: u64,
    pub amount1: u64,
    pub remaining0: u64,
    pub remaining1: u64,
}

#[event]
pub struct GovernanceProposed {
    pub vault: Pubkey,
    pub governance: Pubkey,
    pub pending_governance: Pubkey,
}

#[event]
pub struct GovernanceAccepted {
    pub vault: Pubkey,
    pub previous: Pubkey,
    pub governance: Pubkey,
}

#[event]
pub struct StrategyUpdated {
    pub vault: Pubkey,
    pub strategy: Pubkey,
}

#[event]
pub struct KeeperUpdated {
    pub vault: Pubkey,
    pub keeper: Pubkey,
}

/// A governance setter changed one numeric parameter.
#[event]
pub struct ParameterUpdated {
    pub vault: Pubkey,
    pub parameter: String,
    pub value: i64,
}

#[event]
pub struct Finalized {
    pub vault: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct EmergencyWithdraw {
    pub vault: Pubkey,
    pub token_account: Pubkey,
    pub amount: u64,
}

#[event]
pub struct EmergencyBurn {
    pub vault: Pubkey,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
    pub amount0: u64,
    pub amount1: u64,
}
