use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use super::transfer_from_vault;
use crate::{
    constants::*,
    errors::VaultError,
    events::{EmergencyBurn as EmergencyBurnEvent, EmergencyWithdraw as EmergencyWithdrawEvent, Finalized},
    logic::position,
    pool::*,
    state::{TickRange, Vault},
};

#[derive(Accounts)]
pub struct EmergencyWithdraw<'info> {
    #[account(has_one = governance @ VaultError::NotGovernance)]
    pub vault: Box<Account<'info, Vault>>,

    /// Any token account the vault owns, including stray tokens
    #[account(
        mut,
        token::authority = vault
    )]
    pub source: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = source.mint
    )]
    pub destination: Box<Account<'info, TokenAccount>>,

    pub governance: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn emergency_withdraw(ctx: Context<EmergencyWithdraw>, amount: u64) -> Result<()> {
    let accounts = &ctx.accounts;
    accounts.vault.require_not_finalized()?;
    require!(amount > 0, VaultError::ZeroAmount);

    let pool_key = accounts.vault.pool;
    let bump = [accounts.vault.bump];
    let seeds: &[&[u8]] = &[VAULT_SEED, pool_key.as_ref(), &bump];

    transfer_from_vault(
        &accounts.token_program,
        &accounts.source,
        &accounts.destination,
        &accounts.vault,
        seeds,
        amount,
    )?;

    msg!("Emergency withdrawal of {} from {}", amount, accounts.source.key());

    emit!(EmergencyWithdrawEvent {
        vault: accounts.vault.key(),
        token_account: accounts.source.key(),
        amount,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct EmergencyBurn<'info> {
    #[account(
        mut,
        has_one = governance @ VaultError::NotGovernance,
        has_one = token_vault_0 @ VaultError::InvalidTokenAccount,
        has_one = token_vault_1 @ VaultError::InvalidTokenAccount
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(mut)]
    pub token_vault_0: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub token_vault_1: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = vault.token_mint_0
    )]
    pub destination_0: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = vault.token_mint_1
    )]
    pub destination_1: Box<Account<'info, TokenAccount>>,

    pub pool_accounts: PoolAccounts<'info>,

    pub governance: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    // Remaining accounts: the position account for the range
}

/// Burns liquidity straight from the pool and hands everything collected to
/// governance, bypassing share accounting.
pub fn emergency_burn<'info>(
    ctx: Context<'_, '_, 'info, 'info, EmergencyBurn<'info>>,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
) -> Result<()> {
    let accounts = &ctx.accounts;
    accounts.vault.require_not_finalized()?;

    let pool_key = accounts.vault.pool;
    let bump = [accounts.vault.bump];
    let seeds: &[&[u8]] = &[VAULT_SEED, pool_key.as_ref(), &bump];

    let mut pool = accounts.pool_accounts.client(
        &accounts.vault,
        VaultSigner {
            authority: accounts.vault.to_account_info(),
            payer: None,
            token_vault_0: accounts.token_vault_0.to_account_info(),
            token_vault_1: accounts.token_vault_1.to_account_info(),
            token_program: accounts.token_program.to_account_info(),
            system_program: accounts.system_program.to_account_info(),
            seeds,
        },
        ctx.remaining_accounts,
    )?;

    let collected = position::withdraw_liquidity(
        &mut pool,
        TickRange::new(tick_lower, tick_upper),
        liquidity,
    )?;

    transfer_from_vault(
        &accounts.token_program,
        &accounts.token_vault_0,
        &accounts.destination_0,
        &accounts.vault,
        seeds,
        collected.collected.amount0,
    )?;
    transfer_from_vault(
        &accounts.token_program,
        &accounts.token_vault_1,
        &accounts.destination_1,
        &accounts.vault,
        seeds,
        collected.collected.amount1,
    )?;

    emit!(EmergencyBurnEvent {
        vault: accounts.vault.key(),
        tick_lower,
        tick_upper,
        liquidity,
        amount0: collected.collected.amount0,
        amount1: collected.collected.amount1,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct Finalize<'info> {
    #[account(mut)]
    pub vault: Box<Account<'info, Vault>>,

    pub governance: Signer<'info>,
}

/// Permanently disables the emergency instructions.
pub fn finalize(ctx: Context<Finalize>) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.finalize(ctx.accounts.governance.key)?;

    emit!(Finalized {
        vault: vault.key(),
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
