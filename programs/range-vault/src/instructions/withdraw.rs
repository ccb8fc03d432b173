use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, Mint, Token, TokenAccount};

use super::{token_balances, transfer_from_vault, validate_recipient};
use crate::{
    constants::*,
    errors::VaultError,
    events::Withdraw as WithdrawEvent,
    logic::ledger,
    pool::*,
    state::Vault,
};

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(
        mut,
        has_one = share_mint @ VaultError::InvalidTokenAccount,
        has_one = token_vault_0 @ VaultError::InvalidTokenAccount,
        has_one = token_vault_1 @ VaultError::InvalidTokenAccount
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(mut)]
    pub share_mint: Box<Account<'info, Mint>>,

    #[account(mut)]
    pub token_vault_0: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub token_vault_1: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = share_mint,
        token::authority = owner
    )]
    pub owner_shares: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = vault.token_mint_0
    )]
    pub recipient_token_0: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = vault.token_mint_1
    )]
    pub recipient_token_1: Box<Account<'info, TokenAccount>>,

    pub pool_accounts: PoolAccounts<'info>,

    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    // Remaining accounts are the vault's base and limit position accounts
}

pub fn withdraw<'info>(
    ctx: Context<'_, '_, 'info, 'info, Withdraw<'info>>,
    shares: u64,
    amount0_min: u64,
    amount1_min: u64,
) -> Result<()> {
    let accounts = &mut *ctx.accounts;
    let vault_key = accounts.vault.key();
    let to = accounts.recipient_token_0.owner;
    validate_recipient(&to, &vault_key)?;
    require_keys_eq!(
        accounts.recipient_token_1.owner,
        to,
        VaultError::InvalidRecipient
    );

    accounts.vault.total_supply = accounts.share_mint.supply;
    let balances = token_balances(&accounts.token_vault_0, &accounts.token_vault_1);

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

    let outcome = ledger::withdraw(
        &mut accounts.vault,
        &mut pool,
        balances,
        shares,
        amount0_min,
        amount1_min,
        Clock::get()?.unix_timestamp,
    )?;

    token::burn(
        CpiContext::new(
            accounts.token_program.to_account_info(),
            Burn {
                mint: accounts.share_mint.to_account_info(),
                from: accounts.owner_shares.to_account_info(),
                authority: accounts.owner.to_account_info(),
            },
        ),
        shares,
    )?;

    transfer_from_vault(
        &accounts.token_program,
        &accounts.token_vault_0,
        &accounts.recipient_token_0,
        &accounts.vault,
        seeds,
        outcome.amounts.amount0,
    )?;
    transfer_from_vault(
        &accounts.token_program,
        &accounts.token_vault_1,
        &accounts.recipient_token_1,
        &accounts.vault,
        seeds,
        outcome.amounts.amount1,
    )?;

    msg!(
        "Withdrew {} / {} for {} shares",
        outcome.amounts.amount0,
        outcome.amounts.amount1,
        shares
    );

    emit!(WithdrawEvent {
        vault: vault_key,
        sender: accounts.owner.key(),
        to,
        shares,
        amount0: outcome.amounts.amount0,
        amount1: outcome.amounts.amount1,
    });

    Ok(())
}
