use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount, Transfer};

use super::{token_balances, validate_recipient};
use crate::{
    constants::*,
    errors::VaultError,
    events::Deposit as DepositEvent,
    logic::ledger,
    pool::*,
    state::Vault,
};

#[derive(Accounts)]
pub struct Deposit<'info> {
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
        token::mint = vault.token_mint_0,
        token::authority = sender
    )]
    pub sender_token_0: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = vault.token_mint_1,
        token::authority = sender
    )]
    pub sender_token_1: Box<Account<'info, TokenAccount>>,

    /// Receives the minted shares; its owner is the recipient
    #[account(
        mut,
        token::mint = share_mint
    )]
    pub recipient_shares: Box<Account<'info, TokenAccount>>,

    pub pool_accounts: PoolAccounts<'info>,

    #[account(mut)]
    pub sender: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    // Remaining accounts are the vault's base and limit position accounts
}

pub fn deposit<'info>(
    ctx: Context<'_, '_, 'info, 'info, Deposit<'info>>,
    amount0_desired: u64,
    amount1_desired: u64,
    amount0_min: u64,
    amount1_min: u64,
) -> Result<()> {
    let accounts = &mut *ctx.accounts;
    let vault_key = accounts.vault.key();
    let to = accounts.recipient_shares.owner;
    validate_recipient(&to, &vault_key)?;

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

    let outcome = ledger::deposit(
        &mut accounts.vault,
        &mut pool,
        balances,
        amount0_desired,
        amount1_desired,
        amount0_min,
        amount1_min,
        Clock::get()?.unix_timestamp,
    )?;

    for (from, to_vault, amount) in [
        (&accounts.sender_token_0, &accounts.token_vault_0, outcome.amounts.amount0),
        (&accounts.sender_token_1, &accounts.token_vault_1, outcome.amounts.amount1),
    ] {
        if amount == 0 {
            continue;
        }
        token::transfer(
            CpiContext::new(
                accounts.token_program.to_account_info(),
                Transfer {
                    from: from.to_account_info(),
                    to: to_vault.to_account_info(),
                    authority: accounts.sender.to_account_info(),
                },
            ),
            amount,
        )?;
    }

    token::mint_to(
        CpiContext::new_with_signer(
            accounts.token_program.to_account_info(),
            MintTo {
                mint: accounts.share_mint.to_account_info(),
                to: accounts.recipient_shares.to_account_info(),
                authority: accounts.vault.to_account_info(),
            },
            &[seeds],
        ),
        outcome.shares,
    )?;

    msg!(
        "Deposited {} / {} for {} shares",
        outcome.amounts.amount0,
        outcome.amounts.amount1,
        outcome.shares
    );

    emit!(DepositEvent {
        vault: vault_key,
        sender: accounts.sender.key(),
        to,
        shares: outcome.shares,
        amount0: outcome.amounts.amount0,
        amount1: outcome.amounts.amount1,
        fee0: outcome.fee.amount0,
        fee1: outcome.fee.amount1,
    });

    Ok(())
}
