use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{
    constants::*,
    errors::VaultError,
    events::VaultInitialized,
    logic::oracle::check_initial_price,
    pool::deserialize_pool,
    state::{Strategy, TickRange, Vault},
};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct InitializeVaultParams {
    pub governance: Pubkey,
    pub keeper: Pubkey,
    pub protocol_fee_bps: u16,
    pub deposit_fee_bps: u16,
    pub streaming_fee_bps: u16,
    pub max_total_supply: u64,
    pub base_threshold: i32,
    pub limit_threshold: i32,
    pub max_twap_deviation: i32,
    pub twap_duration: u32,
    pub rebalance_cooldown: i64,
    pub min_tick_move: i32,
}

#[derive(Accounts)]
pub struct InitializeVault<'info> {
    #[account(
        init,
        payer = payer,
        space = Vault::LEN,
        seeds = [VAULT_SEED, pool.key().as_ref()],
        bump
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(
        init,
        payer = payer,
        space = Strategy::LEN,
        seeds = [STRATEGY_SEED, vault.key().as_ref()],
        bump
    )]
    pub strategy: Box<Account<'info, Strategy>>,

    /// Vault shares, minted and burned by the vault PDA
    #[account(
        init,
        payer = payer,
        seeds = [SHARE_MINT_SEED, vault.key().as_ref()],
        bump,
        mint::decimals = SHARE_DECIMALS,
        mint::authority = vault,
    )]
    pub share_mint: Box<Account<'info, Mint>>,

    pub token_mint_0: Box<Account<'info, Mint>>,
    pub token_mint_1: Box<Account<'info, Mint>>,

    /// Vault-owned token 0 balance
    #[account(
        init,
        payer = payer,
        associated_token::mint = token_mint_0,
        associated_token::authority = vault,
    )]
    pub token_vault_0: Box<Account<'info, TokenAccount>>,

    /// Vault-owned token 1 balance
    #[account(
        init,
        payer = payer,
        associated_token::mint = token_mint_1,
        associated_token::authority = vault,
    )]
    pub token_vault_1: Box<Account<'info, TokenAccount>>,

    /// The pool the vault provides liquidity to
    /// CHECK: Owned by the pool program, layout read in the handler
    #[account(owner = pool_program.key() @ VaultError::PoolMismatch)]
    pub pool: AccountInfo<'info>,

    /// CHECK: Executable, recorded on the vault
    #[account(executable)]
    pub pool_program: AccountInfo<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub rent: Sysvar<'info, Rent>,
}

pub fn initialize_vault(ctx: Context<InitializeVault>, params: InitializeVaultParams) -> Result<()> {
    let pool_state = deserialize_pool(&ctx.accounts.pool)?;

    require_keys_eq!(
        ctx.accounts.token_mint_0.key(),
        pool_state.token_mint_0,
        VaultError::PoolMismatch
    );
    require_keys_eq!(
        ctx.accounts.token_mint_1.key(),
        pool_state.token_mint_1,
        VaultError::PoolMismatch
    );

    let tick_spacing = pool_state.tick_spacing as i32;
    require!(tick_spacing > 0, VaultError::InvalidTickSpacing);

    let now = Clock::get()?.unix_timestamp;
    let vault_key = ctx.accounts.vault.key();
    let strategy_key = ctx.accounts.strategy.key();

    let vault = &mut ctx.accounts.vault;
    vault.pool = ctx.accounts.pool.key();
    vault.pool_program = ctx.accounts.pool_program.key();
    vault.token_mint_0 = ctx.accounts.token_mint_0.key();
    vault.token_mint_1 = ctx.accounts.token_mint_1.key();
    vault.token_vault_0 = ctx.accounts.token_vault_0.key();
    vault.token_vault_1 = ctx.accounts.token_vault_1.key();
    vault.share_mint = ctx.accounts.share_mint.key();
    vault.tick_spacing = tick_spacing;
    vault.governance = params.governance;
    vault.pending_governance = Pubkey::default();
    vault.strategy = strategy_key;
    vault.set_protocol_fee(params.protocol_fee_bps)?;
    vault.set_deposit_fee(params.deposit_fee_bps)?;
    vault.set_streaming_fee(params.streaming_fee_bps)?;
    vault.max_total_supply = params.max_total_supply;
    vault.base = TickRange::default();
    vault.limit = TickRange::default();
    vault.total_supply = 0;
    vault.last_fee_accrual_ts = now;
    vault.finalized = false;
    vault.bump = ctx.bumps.vault;

    let strategy = &mut ctx.accounts.strategy;
    strategy.vault = vault_key;
    strategy.keeper = params.keeper;
    strategy.set_base_threshold(params.base_threshold, tick_spacing)?;
    strategy.set_limit_threshold(params.limit_threshold, tick_spacing)?;
    strategy.set_max_twap_deviation(params.max_twap_deviation)?;
    strategy.set_twap_duration(params.twap_duration)?;
    strategy.set_rebalance_cooldown(params.rebalance_cooldown)?;
    strategy.set_min_tick_move(params.min_tick_move)?;
    strategy.bump = ctx.bumps.strategy;
    check_initial_price(strategy, pool_state.tick, tick_spacing)?;

    msg!(
        "Vault initialized for pool {} at tick {}",
        ctx.accounts.pool.key(),
        pool_state.tick
    );

    emit!(VaultInitialized {
        vault: vault_key,
        pool: ctx.accounts.pool.key(),
        governance: params.governance,
        strategy: strategy_key,
        keeper: params.keeper,
        tick_spacing,
        base_threshold: params.base_threshold,
        limit_threshold: params.limit_threshold,
        protocol_fee_bps: params.protocol_fee_bps,
        max_total_supply: params.max_total_supply,
        timestamp: now,
    });

    Ok(())
}
