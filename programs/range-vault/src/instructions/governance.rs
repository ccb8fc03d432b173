use anchor_lang::prelude::*;

use crate::{
    errors::VaultError,
    events::{GovernanceAccepted, GovernanceProposed, ParameterUpdated, StrategyUpdated},
    state::Vault,
};

#[derive(Accounts)]
pub struct GovernVault<'info> {
    #[account(
        mut,
        has_one = governance @ VaultError::NotGovernance
    )]
    pub vault: Box<Account<'info, Vault>>,

    pub governance: Signer<'info>,
}

/// First step of the governance handover.
pub fn set_governance(ctx: Context<GovernVault>, pending_governance: Pubkey) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.propose_governance(ctx.accounts.governance.key, pending_governance)?;

    emit!(GovernanceProposed {
        vault: vault.key(),
        governance: vault.governance,
        pending_governance,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct AcceptGovernance<'info> {
    #[account(mut)]
    pub vault: Box<Account<'info, Vault>>,

    pub pending_governance: Signer<'info>,
}

pub fn accept_governance(ctx: Context<AcceptGovernance>) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    let previous = vault.accept_governance(ctx.accounts.pending_governance.key)?;

    msg!("Governance moved from {} to {}", previous, vault.governance);

    emit!(GovernanceAccepted {
        vault: vault.key(),
        previous,
        governance: vault.governance,
    });
    Ok(())
}

/// Hands range selection to another authority, which then rebalances
/// through `rebalance_with_ranges`.
pub fn set_strategy(ctx: Context<GovernVault>, strategy: Pubkey) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.strategy = strategy;

    emit!(StrategyUpdated {
        vault: vault.key(),
        strategy,
    });
    Ok(())
}

fn parameter_updated(vault: Pubkey, parameter: &str, value: i64) {
    emit!(ParameterUpdated {
        vault,
        parameter: parameter.to_string(),
        value,
    });
}

pub fn set_protocol_fee(ctx: Context<GovernVault>, protocol_fee_bps: u16) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.set_protocol_fee(protocol_fee_bps)?;
    parameter_updated(vault.key(), "protocol_fee_bps", protocol_fee_bps as i64);
    Ok(())
}

pub fn set_deposit_fee(ctx: Context<GovernVault>, deposit_fee_bps: u16) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.set_deposit_fee(deposit_fee_bps)?;
    parameter_updated(vault.key(), "deposit_fee_bps", deposit_fee_bps as i64);
    Ok(())
}

/// Fees already streamed are unaffected; the new rate applies from the next
/// rebalance onwards.
pub fn set_streaming_fee(ctx: Context<GovernVault>, streaming_fee_bps: u16) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.set_streaming_fee(streaming_fee_bps)?;
    parameter_updated(vault.key(), "streaming_fee_bps", streaming_fee_bps as i64);
    Ok(())
}

pub fn set_max_total_supply(ctx: Context<GovernVault>, max_total_supply: u64) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.max_total_supply = max_total_supply;
    parameter_updated(
        vault.key(),
        "max_total_supply",
        i64::try_from(max_total_supply).unwrap_or(i64::MAX),
    );
    Ok(())
}
