use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use super::token_balances;
use crate::{
    constants::*,
    errors::VaultError,
    events::Rebalanced,
    logic::rebalance::{self as engine, RebalanceOutcome, RebalancePlan},
    pool::*,
    state::{Strategy, TickRange, Vault},
};

#[derive(Accounts)]
pub struct Rebalance<'info> {
    #[account(
        mut,
        has_one = token_vault_0 @ VaultError::InvalidTokenAccount,
        has_one = token_vault_1 @ VaultError::InvalidTokenAccount
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        mut,
        seeds = [STRATEGY_SEED, vault.key().as_ref()],
        bump = strategy.bump,
        has_one = vault
    )]
    pub strategy: Box<Account<'info, Strategy>>,

    #[account(mut)]
    pub token_vault_0: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub token_vault_1: Box<Account<'info, TokenAccount>>,

    pub pool_accounts: PoolAccounts<'info>,

    /// Pays for any new position account
    #[account(mut)]
    pub keeper: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    // Remaining accounts are the current and the next base and limit position accounts
}

/// Keeper rebalance around the guarded spot tick.
pub fn rebalance<'info>(ctx: Context<'_, '_, 'info, 'info, Rebalance<'info>>) -> Result<()> {
    let accounts = &mut *ctx.accounts;
    accounts.vault.require_strategy(&accounts.strategy.key())?;
    accounts.strategy.require_keeper(accounts.keeper.key)?;
    let now = Clock::get()?.unix_timestamp;
    let balances = token_balances(&accounts.token_vault_0, &accounts.token_vault_1);

    let pool_key = accounts.vault.pool;
    let bump = [accounts.vault.bump];
    let seeds: &[&[u8]] = &[VAULT_SEED, pool_key.as_ref(), &bump];

    let mut pool = accounts.pool_accounts.client(
        &accounts.vault,
        VaultSigner {
            authority: accounts.vault.to_account_info(),
            payer: Some(accounts.keeper.to_account_info()),
            token_vault_0: accounts.token_vault_0.to_account_info(),
            token_vault_1: accounts.token_vault_1.to_account_info(),
            token_program: accounts.token_program.to_account_info(),
            system_program: accounts.system_program.to_account_info(),
            seeds,
        },
        ctx.remaining_accounts,
    )?;

    let outcome = engine::rebalance(
        &mut accounts.vault,
        &mut accounts.strategy,
        &mut pool,
        balances,
        now,
    )?;

    emit_outcome(
        accounts.vault.key(),
        &accounts.vault,
        accounts.keeper.key(),
        outcome,
        now,
    );
    Ok(())
}

#[derive(Accounts)]
pub struct RebalanceWithRanges<'info> {
    #[account(
        mut,
        has_one = token_vault_0 @ VaultError::InvalidTokenAccount,
        has_one = token_vault_1 @ VaultError::InvalidTokenAccount
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(mut)]
    pub token_vault_0: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub token_vault_1: Box<Account<'info, TokenAccount>>,

    pub pool_accounts: PoolAccounts<'info>,

    /// External strategy authority set by governance
    #[account(mut)]
    pub strategy: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug)]
pub struct RangesParams {
    pub base: TickRange,
    pub bid: TickRange,
    pub ask: TickRange,
}

/// Rebalance into caller-chosen ranges. The strategy authority is trusted to
/// have guarded the price itself.
pub fn rebalance_with_ranges<'info>(
    ctx: Context<'_, '_, 'info, 'info, RebalanceWithRanges<'info>>,
    ranges: RangesParams,
) -> Result<()> {
    let accounts = &mut *ctx.accounts;
    accounts.vault.require_strategy(accounts.strategy.key)?;
    let now = Clock::get()?.unix_timestamp;
    let balances = token_balances(&accounts.token_vault_0, &accounts.token_vault_1);

    let pool_key = accounts.vault.pool;
    let bump = [accounts.vault.bump];
    let seeds: &[&[u8]] = &[VAULT_SEED, pool_key.as_ref(), &bump];

    let mut pool = accounts.pool_accounts.client(
        &accounts.vault,
        VaultSigner {
            authority: accounts.vault.to_account_info(),
            payer: Some(accounts.strategy.to_account_info()),
            token_vault_0: accounts.token_vault_0.to_account_info(),
            token_vault_1: accounts.token_vault_1.to_account_info(),
            token_program: accounts.token_program.to_account_info(),
            system_program: accounts.system_program.to_account_info(),
            seeds,
        },
        ctx.remaining_accounts,
    )?;

    let plan = RebalancePlan {
        base: ranges.base,
        bid: ranges.bid,
        ask: ranges.ask,
    };
    let outcome = engine::execute_rebalance(&mut accounts.vault, &mut pool, balances, &plan, now)?;

    emit_outcome(
        accounts.vault.key(),
        &accounts.vault,
        accounts.strategy.key(),
        outcome,
        now,
    );
    Ok(())
}

fn emit_outcome(vault_key: Pubkey, vault: &Vault, caller: Pubkey, outcome: RebalanceOutcome, now: i64) {
    for fees in outcome.fees {
        emit!(fees);
    }
    emit!(outcome.snapshot);

    msg!(
        "Rebalanced at tick {}: base [{}, {}], limit [{}, {}]",
        outcome.tick,
        vault.base.lower,
        vault.base.upper,
        vault.limit.lower,
        vault.limit.upper
    );

    emit!(Rebalanced {
        vault: vault_key,
        caller,
        tick: outcome.tick,
        base_lower: vault.base.lower,
        base_upper: vault.base.upper,
        limit_lower: vault.limit.lower,
        limit_upper: vault.limit.upper,
        streaming_fee0: outcome.streaming_fee.amount0,
        streaming_fee1: outcome.streaming_fee.amount1,
        timestamp: now,
    });
}
