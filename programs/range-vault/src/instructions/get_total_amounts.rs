use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;

use super::token_balances;
use crate::{
    errors::VaultError,
    logic::ledger,
    pool::*,
    state::{TokenAmounts, Vault},
};

#[derive(Accounts)]
pub struct GetTotalAmounts<'info> {
    #[account(
        has_one = token_vault_0 @ VaultError::InvalidTokenAccount,
        has_one = token_vault_1 @ VaultError::InvalidTokenAccount
    )]
    pub vault: Box<Account<'info, Vault>>,

    pub token_vault_0: Box<Account<'info, TokenAccount>>,
    pub token_vault_1: Box<Account<'info, TokenAccount>>,

    pub pool_accounts: PoolViewAccounts<'info>,
    // Remaining accounts are the vault's base and limit position accounts
}

/// Idle balances plus both positions, net of protocol fees. Reads accounts
/// only, so the streaming fee accrued since the last settlement is not
/// deducted.
pub fn get_total_amounts<'info>(
    ctx: Context<'_, '_, 'info, 'info, GetTotalAmounts<'info>>,
) -> Result<TokenAmounts> {
    let accounts = &ctx.accounts;
    let balances = token_balances(&accounts.token_vault_0, &accounts.token_vault_1);

    let pool = accounts.pool_accounts.reader(
        &accounts.vault,
        accounts.vault.key(),
        ctx.remaining_accounts,
    )?;

    ledger::total_amounts(&accounts.vault, &pool, balances)
}
