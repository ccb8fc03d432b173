use anchor_lang::prelude::*;

use crate::{
    constants::*,
    errors::VaultError,
    events::{KeeperUpdated, ParameterUpdated},
    state::{Strategy, Vault},
};

/// Strategy parameters are owned by the vault's governance.
#[derive(Accounts)]
pub struct ConfigureStrategy<'info> {
    #[account(has_one = governance @ VaultError::NotGovernance)]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        mut,
        seeds = [STRATEGY_SEED, vault.key().as_ref()],
        bump = strategy.bump,
        has_one = vault
    )]
    pub strategy: Box<Account<'info, Strategy>>,

    pub governance: Signer<'info>,
}

fn parameter_updated(strategy: &Strategy, parameter: &str, value: i64) {
    emit!(ParameterUpdated {
        vault: strategy.vault,
        parameter: parameter.to_string(),
        value,
    });
}

pub fn set_base_threshold(ctx: Context<ConfigureStrategy>, base_threshold: i32) -> Result<()> {
    let tick_spacing = ctx.accounts.vault.tick_spacing;
    let strategy = &mut ctx.accounts.strategy;
    strategy.set_base_threshold(base_threshold, tick_spacing)?;
    parameter_updated(strategy, "base_threshold", base_threshold as i64);
    Ok(())
}

pub fn set_limit_threshold(ctx: Context<ConfigureStrategy>, limit_threshold: i32) -> Result<()> {
    let tick_spacing = ctx.accounts.vault.tick_spacing;
    let strategy = &mut ctx.accounts.strategy;
    strategy.set_limit_threshold(limit_threshold, tick_spacing)?;
    parameter_updated(strategy, "limit_threshold", limit_threshold as i64);
    Ok(())
}

pub fn set_max_twap_deviation(ctx: Context<ConfigureStrategy>, max_twap_deviation: i32) -> Result<()> {
    let strategy = &mut ctx.accounts.strategy;
    strategy.set_max_twap_deviation(max_twap_deviation)?;
    parameter_updated(strategy, "max_twap_deviation", max_twap_deviation as i64);
    Ok(())
}

pub fn set_twap_duration(ctx: Context<ConfigureStrategy>, twap_duration: u32) -> Result<()> {
    let strategy = &mut ctx.accounts.strategy;
    strategy.set_twap_duration(twap_duration)?;
    parameter_updated(strategy, "twap_duration", twap_duration as i64);
    Ok(())
}

pub fn set_rebalance_cooldown(ctx: Context<ConfigureStrategy>, rebalance_cooldown: i64) -> Result<()> {
    let strategy = &mut ctx.accounts.strategy;
    strategy.set_rebalance_cooldown(rebalance_cooldown)?;
    parameter_updated(strategy, "rebalance_cooldown", rebalance_cooldown);
    Ok(())
}

pub fn set_min_tick_move(ctx: Context<ConfigureStrategy>, min_tick_move: i32) -> Result<()> {
    let strategy = &mut ctx.accounts.strategy;
    strategy.set_min_tick_move(min_tick_move)?;
    parameter_updated(strategy, "min_tick_move", min_tick_move as i64);
    Ok(())
}

pub fn set_keeper(ctx: Context<ConfigureStrategy>, keeper: Pubkey) -> Result<()> {
    let strategy = &mut ctx.accounts.strategy;
    strategy.keeper = keeper;

    emit!(KeeperUpdated {
        vault: strategy.vault,
        keeper,
    });
    Ok(())
}
