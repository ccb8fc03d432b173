//! In-memory pool used by the engine tests.
//!
//! Prices move only through `swap_to_tick`; trading fees are injected with
//! `accrue_fees` and shared pro rata between in-range positions. The oracle
//! keeps tick cumulative checkpoints like an on-chain observation buffer.

use std::collections::BTreeMap;

use anchor_lang::prelude::*;
use ethnum::U256;

use super::{LiquidityPool, PoolView, PositionSnapshot, Slot0};
use crate::errors::VaultError;
use crate::math::full_math::{mul_div_floor, to_u64};
use crate::math::{sqrt_price_to_tick, tick_to_sqrt_price, token_amounts_for_liquidity};

pub const GENESIS_TS: i64 = 1_700_000_000;

#[derive(Clone, Copy, Debug)]
struct Checkpoint {
    timestamp: i64,
    tick_cumulative: i64,
    tick: i32,
}

#[derive(Clone, Copy, Debug, Default)]
struct MockPosition {
    liquidity: u128,
    owed0: u64,
    owed1: u64,
}

pub struct MockPool {
    tick_spacing: i32,
    sqrt_price_x64: u128,
    tick: i32,
    now: i64,
    checkpoints: Vec<Checkpoint>,
    positions: BTreeMap<(i32, i32), MockPosition>,
}

impl MockPool {
    /// A pool sitting at `tick` with a day of oracle history.
    pub fn new(tick: i32, tick_spacing: i32) -> Self {
        let sqrt_price_x64 = tick_to_sqrt_price(tick).unwrap();
        Self::with_sqrt_price(sqrt_price_x64, tick_spacing)
    }

    pub fn with_sqrt_price(sqrt_price_x64: u128, tick_spacing: i32) -> Self {
        let tick = sqrt_price_to_tick(sqrt_price_x64).unwrap();
        Self {
            tick_spacing,
            sqrt_price_x64,
            tick,
            now: GENESIS_TS,
            checkpoints: vec![Checkpoint {
                timestamp: GENESIS_TS - 86400,
                tick_cumulative: 0,
                tick,
            }],
            positions: BTreeMap::new(),
        }
    }

    pub fn now(&self) -> i64 {
        self.now
    }

    pub fn advance(&mut self, seconds: i64) {
        self.now += seconds;
    }

    /// Moves the spot price as a swap would.
    pub fn swap_to_tick(&mut self, tick: i32) {
        let sqrt_price = tick_to_sqrt_price(tick).unwrap();
        self.swap_to_sqrt_price(sqrt_price);
    }

    pub fn swap_to_sqrt_price(&mut self, sqrt_price_x64: u128) {
        let tick_cumulative = self.cumulative_at(self.now);
        self.sqrt_price_x64 = sqrt_price_x64;
        self.tick = sqrt_price_to_tick(sqrt_price_x64).unwrap();
        self.checkpoints.push(Checkpoint {
            timestamp: self.now,
            tick_cumulative,
            tick: self.tick,
        });
    }

    /// Credits trading fees to in-range positions by liquidity share.
    pub fn accrue_fees(&mut self, fees0: u64, fees1: u64) {
        let tick = self.tick;
        let in_range = |(lower, upper): &(i32, i32)| *lower <= tick && tick < *upper;
        let active: u128 = self
            .positions
            .iter()
            .filter(|(range, _)| in_range(range))
            .map(|(_, p)| p.liquidity)
            .sum();
        if active == 0 {
            return;
        }
        for (range, position) in self.positions.iter_mut() {
            if !in_range(range) || position.liquidity == 0 {
                continue;
            }
            let share = |fees: u64| {
                let amount = mul_div_floor(
                    U256::from(fees as u128),
                    U256::from(position.liquidity),
                    U256::from(active),
                )
                .unwrap();
                to_u64(amount).unwrap()
            };
            position.owed0 += share(fees0);
            position.owed1 += share(fees1);
        }
    }

    pub fn liquidity(&self, tick_lower: i32, tick_upper: i32) -> u128 {
        self.positions
            .get(&(tick_lower, tick_upper))
            .map(|p| p.liquidity)
            .unwrap_or(0)
    }

    fn cumulative_at(&self, timestamp: i64) -> i64 {
        let checkpoint = self
            .checkpoints
            .iter()
            .rev()
            .find(|c| c.timestamp <= timestamp)
            .copied()
            .unwrap_or(self.checkpoints[0]);
        checkpoint.tick_cumulative + checkpoint.tick as i64 * (timestamp - checkpoint.timestamp)
    }

    fn sqrt_prices(&self, tick_lower: i32, tick_upper: i32) -> Result<(u128, u128)> {
        require!(tick_lower < tick_upper, VaultError::TickRangeInverted);
        Ok((tick_to_sqrt_price(tick_lower)?, tick_to_sqrt_price(tick_upper)?))
    }
}

impl PoolView for MockPool {
    fn tick_spacing(&self) -> i32 {
        self.tick_spacing
    }

    fn slot0(&self) -> Result<Slot0> {
        Ok(Slot0 {
            sqrt_price_x64: self.sqrt_price_x64,
            tick: self.tick,
        })
    }

    fn position(&self, tick_lower: i32, tick_upper: i32) -> Result<PositionSnapshot> {
        let position = self
            .positions
            .get(&(tick_lower, tick_upper))
            .copied()
            .unwrap_or_default();
        Ok(PositionSnapshot {
            liquidity: position.liquidity,
            tokens_owed_0: position.owed0,
            tokens_owed_1: position.owed1,
            ..Default::default()
        })
    }
}

impl LiquidityPool for MockPool {
    fn observe(&self, seconds_agos: &[u32]) -> Result<Vec<i64>> {
        let oldest = self.checkpoints[0].timestamp;
        seconds_agos
            .iter()
            .map(|ago| {
                let target = self.now - *ago as i64;
                require!(target >= oldest, VaultError::OracleUnavailable);
                Ok(self.cumulative_at(target))
            })
            .collect()
    }

    fn mint(&mut self, tick_lower: i32, tick_upper: i32, liquidity: u128) -> Result<(u64, u64)> {
        require!(liquidity > 0, VaultError::ZeroAmount);
        let (lower, upper) = self.sqrt_prices(tick_lower, tick_upper)?;
        let amounts =
            token_amounts_for_liquidity(self.sqrt_price_x64, lower, upper, liquidity, true)?;
        let position = self.positions.entry((tick_lower, tick_upper)).or_default();
        position.liquidity += liquidity;
        Ok(amounts)
    }

    fn burn(&mut self, tick_lower: i32, tick_upper: i32, liquidity: u128) -> Result<(u64, u64)> {
        let (lower, upper) = self.sqrt_prices(tick_lower, tick_upper)?;
        let sqrt_price = self.sqrt_price_x64;
        let position = self
            .positions
            .get_mut(&(tick_lower, tick_upper))
            .ok_or(VaultError::InvalidPositionAccount)?;
        require!(position.liquidity >= liquidity, VaultError::InsufficientBalance);
        let (amount0, amount1) =
            token_amounts_for_liquidity(sqrt_price, lower, upper, liquidity, false)?;
        position.liquidity -= liquidity;
        position.owed0 += amount0;
        position.owed1 += amount1;
        Ok((amount0, amount1))
    }

    fn collect(
        &mut self,
        tick_lower: i32,
        tick_upper: i32,
        amount0_requested: u64,
        amount1_requested: u64,
    ) -> Result<(u64, u64)> {
        let Some(position) = self.positions.get_mut(&(tick_lower, tick_upper)) else {
            return Ok((0, 0));
        };
        let amount0 = amount0_requested.min(position.owed0);
        let amount1 = amount1_requested.min(position.owed1);
        position.owed0 -= amount0;
        position.owed1 -= amount1;
        Ok((amount0, amount1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twap_lags_spot_after_swap() {
        let mut pool = MockPool::new(0, 60);
        pool.swap_to_tick(1000);
        let cumulatives = pool.observe(&[600, 0]).unwrap();
        assert_eq!((cumulatives[1] - cumulatives[0]) / 600, 0);

        pool.advance(600);
        let cumulatives = pool.observe(&[600, 0]).unwrap();
        assert_eq!((cumulatives[1] - cumulatives[0]) / 600, 1000);
    }

    #[test]
    fn test_burn_then_collect_returns_principal() {
        let mut pool = MockPool::new(0, 60);
        let (paid0, paid1) = pool.mint(-600, 600, 1_000_000_000).unwrap();
        let (burned0, burned1) = pool.burn(-600, 600, 1_000_000_000).unwrap();
        assert!(burned0 <= paid0 && burned1 <= paid1);
        let collected = pool.collect(-600, 600, u64::MAX, u64::MAX).unwrap();
        assert_eq!(collected, (burned0, burned1));
        assert_eq!(pool.position(-600, 600).unwrap(), PositionSnapshot::default());
    }
}
