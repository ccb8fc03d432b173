use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::VaultError;
use crate::math::{MAX_TICK, MIN_TICK};

/// A pair of token amounts, ordered as the pool orders its tokens.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenAmounts {
    pub amount0: u64,
    pub amount1: u64,
}

impl TokenAmounts {
    pub fn new(amount0: u64, amount1: u64) -> Self {
        Self { amount0, amount1 }
    }

    pub fn checked_add(self, other: TokenAmounts) -> Result<TokenAmounts> {
        Ok(TokenAmounts {
            amount0: self
                .amount0
                .checked_add(other.amount0)
                .ok_or(VaultError::MathOverflow)?,
            amount1: self
                .amount1
                .checked_add(other.amount1)
                .ok_or(VaultError::MathOverflow)?,
        })
    }

    /// Underflow is a balance shortfall, not an arithmetic fault.
    pub fn checked_sub(self, other: TokenAmounts) -> Result<TokenAmounts> {
        Ok(TokenAmounts {
            amount0: self
                .amount0
                .checked_sub(other.amount0)
                .ok_or(VaultError::InsufficientBalance)?,
            amount1: self
                .amount1
                .checked_sub(other.amount1)
                .ok_or(VaultError::InsufficientBalance)?,
        })
    }

    pub fn saturating_sub(self, other: TokenAmounts) -> TokenAmounts {
        TokenAmounts {
            amount0: self.amount0.saturating_sub(other.amount0),
            amount1: self.amount1.saturating_sub(other.amount1),
        }
    }
}

/// A position range. Both ticks zero means no position.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickRange {
    pub lower: i32,
    pub upper: i32,
}

impl TickRange {
    pub const LEN: usize = 4 + 4;

    pub fn new(lower: i32, upper: i32) -> Self {
        Self { lower, upper }
    }

    pub fn is_set(&self) -> bool {
        *self != TickRange::default()
    }

    /// Checks the range can be handed to the pool.
    pub fn validate(&self, tick_spacing: i32) -> Result<()> {
        require!(self.lower < self.upper, VaultError::TickRangeInverted);
        require!(self.lower >= MIN_TICK, VaultError::TickLowerTooLow);
        require!(self.upper <= MAX_TICK, VaultError::TickUpperTooHigh);
        require!(
            self.lower % tick_spacing == 0,
            VaultError::TickLowerNotAligned
        );
        require!(
            self.upper % tick_spacing == 0,
            VaultError::TickUpperNotAligned
        );
        Ok(())
    }
}

#[account]
#[derive(Default)]
pub struct Vault {
    /// The concentrated liquidity pool this vault provides liquidity to
    pub pool: Pubkey,

    /// Program owning the pool and its positions
    pub pool_program: Pubkey,

    pub token_mint_0: Pubkey,
    pub token_mint_1: Pubkey,

    /// Vault-owned token accounts holding idle balances and accrued protocol fees
    pub token_vault_0: Pubkey,
    pub token_vault_1: Pubkey,

    /// SPL mint of vault shares; the vault PDA is its mint authority
    pub share_mint: Pubkey,

    /// Copied from the pool at construction
    pub tick_spacing: i32,

    pub governance: Pubkey,
    pub pending_governance: Pubkey,

    /// Address allowed to rebalance with caller-supplied ranges
    pub strategy: Pubkey,

    /// Cut of pool trading fees routed to the protocol
    pub protocol_fee_bps: u16,

    /// Cut of every deposit routed to the protocol
    pub deposit_fee_bps: u16,

    /// Annualized management fee on assets, charged at each rebalance
    pub streaming_fee_bps: u16,

    pub max_total_supply: u64,

    pub base: TickRange,
    pub limit: TickRange,

    /// Mirror of the share mint supply
    pub total_supply: u64,

    pub accrued_protocol_fees_0: u64,
    pub accrued_protocol_fees_1: u64,

    pub last_fee_accrual_ts: i64,

    /// Once set, emergency operations are disabled for good
    pub finalized: bool,

    pub bump: u8,

    /// Reserved space for future upgrades
    pub _reserved: [u8; 32],
}

impl Vault {
    pub const LEN: usize = 8 + // discriminator
        32 + // pool
        32 + // pool_program
        32 + // token_mint_0
        32 + // token_mint_1
        32 + // token_vault_0
        32 + // token_vault_1
        32 + // share_mint
        4 + // tick_spacing
        32 + // governance
        32 + // pending_governance
        32 + // strategy
        2 + // protocol_fee_bps
        2 + // deposit_fee_bps
        2 + // streaming_fee_bps
        8 + // max_total_supply
        TickRange::LEN + // base
        TickRange::LEN + // limit
        8 + // total_supply
        8 + // accrued_protocol_fees_0
        8 + // accrued_protocol_fees_1
        8 + // last_fee_accrual_ts
        1 + // finalized
        1 + // bump
        32; // _reserved

    pub fn accrued_protocol_fees(&self) -> TokenAmounts {
        TokenAmounts::new(self.accrued_protocol_fees_0, self.accrued_protocol_fees_1)
    }

    /// Balances that belong to share holders, given what the vault token accounts hold.
    pub fn idle(&self, balances: TokenAmounts) -> TokenAmounts {
        balances.saturating_sub(self.accrued_protocol_fees())
    }

    pub fn accrue_protocol_fees(&mut self, fees: TokenAmounts) -> Result<()> {
        let accrued = self.accrued_protocol_fees().checked_add(fees)?;
        self.accrued_protocol_fees_0 = accrued.amount0;
        self.accrued_protocol_fees_1 = accrued.amount1;
        Ok(())
    }

    pub fn take_protocol_fees(&mut self, amounts: TokenAmounts) -> Result<()> {
        let remaining = self.accrued_protocol_fees().checked_sub(amounts)?;
        self.accrued_protocol_fees_0 = remaining.amount0;
        self.accrued_protocol_fees_1 = remaining.amount1;
        Ok(())
    }

    pub fn require_governance(&self, signer: &Pubkey) -> Result<()> {
        require_keys_eq!(*signer, self.governance, VaultError::NotGovernance);
        Ok(())
    }

    pub fn require_strategy(&self, signer: &Pubkey) -> Result<()> {
        require_keys_eq!(*signer, self.strategy, VaultError::NotStrategy);
        Ok(())
    }

    pub fn require_not_finalized(&self) -> Result<()> {
        require!(!self.finalized, VaultError::Finalized);
        Ok(())
    }

    pub fn propose_governance(&mut self, signer: &Pubkey, candidate: Pubkey) -> Result<()> {
        self.require_governance(signer)?;
        self.pending_governance = candidate;
        Ok(())
    }

    /// Completes the two-step transfer; returns the previous governance.
    pub fn accept_governance(&mut self, signer: &Pubkey) -> Result<Pubkey> {
        require!(
            self.pending_governance != Pubkey::default(),
            VaultError::NotPendingGovernance
        );
        require_keys_eq!(
            *signer,
            self.pending_governance,
            VaultError::NotPendingGovernance
        );
        let previous = self.governance;
        self.governance = self.pending_governance;
        self.pending_governance = Pubkey::default();
        Ok(previous)
    }

    pub fn finalize(&mut self, signer: &Pubkey) -> Result<()> {
        self.require_governance(signer)?;
        self.finalized = true;
        Ok(())
    }

    pub fn set_protocol_fee(&mut self, bps: u16) -> Result<()> {
        require!(bps < MAX_BPS, VaultError::InvalidProtocolFee);
        self.protocol_fee_bps = bps;
        Ok(())
    }

    pub fn set_deposit_fee(&mut self, bps: u16) -> Result<()> {
        require!(bps < MAX_BPS, VaultError::InvalidDepositFee);
        self.deposit_fee_bps = bps;
        Ok(())
    }

    pub fn set_streaming_fee(&mut self, bps: u16) -> Result<()> {
        require!(bps < MAX_BPS, VaultError::InvalidStreamingFee);
        self.streaming_fee_bps = bps;
        Ok(())
    }

    pub fn check_max_total_supply(&self) -> Result<()> {
        require!(
            self.total_supply <= self.max_total_supply,
            VaultError::MaxTotalSupplyExceeded
        );
        Ok(())
    }
}
