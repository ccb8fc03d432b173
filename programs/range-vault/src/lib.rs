use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod logic;
pub mod math;
pub mod pool;
pub mod state;

use instructions::*;
use state::TokenAmounts;

declare_id!("RangeVau1t111111111111111111111111111111111");

#[program]
pub mod range_vault {
    use super::*;

    /// Create the vault, its strategy and share mint for a pool
    pub fn initialize_vault(
        ctx: Context<InitializeVault>,
        params: InitializeVaultParams,
    ) -> Result<()> {
        instructions::initialize_vault(ctx, params)
    }

    /// Deposit both tokens for shares; tokens stay idle until the next rebalance
    pub fn deposit<'info>(
        ctx: Context<'_, '_, 'info, 'info, Deposit<'info>>,
        amount0_desired: u64,
        amount1_desired: u64,
        amount0_min: u64,
        amount1_min: u64,
    ) -> Result<()> {
        instructions::deposit(ctx, amount0_desired, amount1_desired, amount0_min, amount1_min)
    }

    /// Burn shares for a proportional slice of idle balances and positions
    pub fn withdraw<'info>(
        ctx: Context<'_, '_, 'info, 'info, Withdraw<'info>>,
        shares: u64,
        amount0_min: u64,
        amount1_min: u64,
    ) -> Result<()> {
        instructions::withdraw(ctx, shares, amount0_min, amount1_min)
    }

    /// Keeper rebalance into base and limit ranges around the spot tick
    pub fn rebalance<'info>(ctx: Context<'_, '_, 'info, 'info, Rebalance<'info>>) -> Result<()> {
        instructions::rebalance(ctx)
    }

    /// Rebalance into ranges chosen by the vault's strategy authority
    pub fn rebalance_with_ranges<'info>(
        ctx: Context<'_, '_, 'info, 'info, RebalanceWithRanges<'info>>,
        ranges: RangesParams,
    ) -> Result<()> {
        instructions::rebalance_with_ranges(ctx, ranges)
    }

    pub fn get_total_amounts<'info>(
        ctx: Context<'_, '_, 'info, 'info, GetTotalAmounts<'info>>,
    ) -> Result<TokenAmounts> {
        instructions::get_total_amounts(ctx)
    }

    pub fn collect_protocol_fees(
        ctx: Context<CollectProtocolFees>,
        amount0: u64,
        amount1: u64,
    ) -> Result<()> {
        instructions::collect_protocol_fees(ctx, amount0, amount1)
    }

    pub fn emergency_withdraw(ctx: Context<EmergencyWithdraw>, amount: u64) -> Result<()> {
        instructions::emergency_withdraw(ctx, amount)
    }

    pub fn emergency_burn<'info>(
        ctx: Context<'_, '_, 'info, 'info, EmergencyBurn<'info>>,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
    ) -> Result<()> {
        instructions::emergency_burn(ctx, tick_lower, tick_upper, liquidity)
    }

    pub fn finalize(ctx: Context<Finalize>) -> Result<()> {
        instructions::finalize(ctx)
    }

    pub fn set_governance(ctx: Context<GovernVault>, pending_governance: Pubkey) -> Result<()> {
        instructions::set_governance(ctx, pending_governance)
    }

    pub fn accept_governance(ctx: Context<AcceptGovernance>) -> Result<()> {
        instructions::accept_governance(ctx)
    }

    pub fn set_strategy(ctx: Context<GovernVault>, strategy: Pubkey) -> Result<()> {
        instructions::set_strategy(ctx, strategy)
    }

    pub fn set_protocol_fee(ctx: Context<GovernVault>, protocol_fee_bps: u16) -> Result<()> {
        instructions::set_protocol_fee(ctx, protocol_fee_bps)
    }

    pub fn set_deposit_fee(ctx: Context<GovernVault>, deposit_fee_bps: u16) -> Result<()> {
        instructions::set_deposit_fee(ctx, deposit_fee_bps)
    }

    pub fn set_streaming_fee(ctx: Context<GovernVault>, streaming_fee_bps: u16) -> Result<()> {
        instructions::set_streaming_fee(ctx, streaming_fee_bps)
    }

    pub fn set_max_total_supply(ctx: Context<GovernVault>, max_total_supply: u64) -> Result<()> {
        instructions::set_max_total_supply(ctx, max_total_supply)
    }

    pub fn set_base_threshold(ctx: Context<ConfigureStrategy>, base_threshold: i32) -> Result<()> {
        instructions::set_base_threshold(ctx, base_threshold)
    }

    pub fn set_limit_threshold(ctx: Context<ConfigureStrategy>, limit_threshold: i32) -> Result<()> {
        instructions::set_limit_threshold(ctx, limit_threshold)
    }

    pub fn set_max_twap_deviation(
        ctx: Context<ConfigureStrategy>,
        max_twap_deviation: i32,
    ) -> Result<()> {
        instructions::set_max_twap_deviation(ctx, max_twap_deviation)
    }

    pub fn set_twap_duration(ctx: Context<ConfigureStrategy>, twap_duration: u32) -> Result<()> {
        instructions::set_twap_duration(ctx, twap_duration)
    }

    pub fn set_rebalance_cooldown(
        ctx: Context<ConfigureStrategy>,
        rebalance_cooldown: i64,
    ) -> Result<()> {
        instructions::set_rebalance_cooldown(ctx, rebalance_cooldown)
    }

    pub fn set_min_tick_move(ctx: Context<ConfigureStrategy>, min_tick_move: i32) -> Result<()> {
        instructions::set_min_tick_move(ctx, min_tick_move)
    }

    pub fn set_keeper(ctx: Context<ConfigureStrategy>, keeper: Pubkey) -> Result<()> {
        instructions::set_keeper(ctx, keeper)
    }
}
