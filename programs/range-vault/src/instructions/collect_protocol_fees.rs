use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use super::{token_balances, transfer_from_vault};
use crate::{
    constants::*,
    errors::VaultError,
    events::ProtocolFeesCollected,
    state::{TokenAmounts, Vault},
};

#[derive(Accounts)]
pub struct CollectProtocolFees<'info> {
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

    pub governance: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn collect_protocol_fees(
    ctx: Context<CollectProtocolFees>,
    amount0: u64,
    amount1: u64,
) -> Result<()> {
    let accounts = &mut *ctx.accounts;
    let requested = TokenAmounts::new(amount0, amount1);
    // fees charged on pooled principal are only payable after the next rebalance
    token_balances(&accounts.token_vault_0, &accounts.token_vault_1).checked_sub(requested)?;
    accounts.vault.take_protocol_fees(requested)?;

    let pool_key = accounts.vault.pool;
    let bump = [accounts.vault.bump];
    let seeds: &[&[u8]] = &[VAULT_SEED, pool_key.as_ref(), &bump];

    transfer_from_vault(
        &accounts.token_program,
        &accounts.token_vault_0,
        &accounts.destination_0,
        &accounts.vault,
        seeds,
        amount0,
    )?;
    transfer_from_vault(
        &accounts.token_program,
        &accounts.token_vault_1,
        &accounts.destination_1,
        &accounts.vault,
        seeds,
        amount1,
    )?;

    emit!(ProtocolFeesCollected {
        vault: accounts.vault.key(),
        amount0,
        amount1,
        remaining0: accounts.vault.accrued_protocol_fees_0,
        remaining1: accounts.vault.accrued_protocol_fees_1,
    });

    Ok(())
}
