//! The external concentrated liquidity pool, as seen by the vault.
//!
//! Positions are always owned by the vault, so they are keyed by their tick
//! range alone. Token settlement for `mint` and `collect` happens between the
//! pool and the vault's token accounts.

use anchor_lang::prelude::*;

pub mod cpi;
#[cfg(test)]
pub mod mock;

pub use cpi::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Slot0 {
    pub sqrt_price_x64: u128,
    pub tick: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PositionSnapshot {
    pub liquidity: u128,
    pub fee_growth_inside_0_last: u128,
    pub fee_growth_inside_1_last: u128,
    pub tokens_owed_0: u64,
    pub tokens_owed_1: u64,
}

/// Account reads only. Enough to value the vault.
pub trait PoolView {
    fn tick_spacing(&self) -> i32;

    fn slot0(&self) -> Result<Slot0>;

    fn position(&self, tick_lower: i32, tick_upper: i32) -> Result<PositionSnapshot>;
}

pub trait LiquidityPool: PoolView {
    /// Tick cumulatives at each of `seconds_agos` before now.
    fn observe(&self, seconds_agos: &[u32]) -> Result<Vec<i64>>;

    /// Adds liquidity; returns the amounts paid by the vault.
    fn mint(&mut self, tick_lower: i32, tick_upper: i32, liquidity: u128) -> Result<(u64, u64)>;

    /// Removes liquidity; the released amounts become owed to the vault.
    fn burn(&mut self, tick_lower: i32, tick_upper: i32, liquidity: u128) -> Result<(u64, u64)>;

    /// Pays owed tokens (principal and fees) to the vault.
    fn collect(
        &mut self,
        tick_lower: i32,
        tick_upper: i32,
        amount0_requested: u64,
        amount1_requested: u64,
    ) -> Result<(u64, u64)>;
}
