//! Price guard applied before the keeper may move liquidity.
//!
//! The spot tick is only trusted when it sits close to the pool's
//! time-weighted average tick, and (optionally) when it has moved far enough
//! since the previous rebalance.

use anchor_lang::prelude::*;

use crate::errors::VaultError;
use crate::math::{floor_to_spacing, MAX_TICK, MIN_TICK};
use crate::pool::LiquidityPool;
use crate::state::Strategy;

/// Arithmetic mean tick over the last `twap_duration` seconds, floored toward
/// negative infinity.
pub fn twap_tick<P: LiquidityPool>(pool: &P, twap_duration: u32) -> Result<i32> {
    require!(twap_duration > 0, VaultError::InvalidTwapDuration);
    let cumulatives = pool.observe(&[twap_duration, 0])?;
    require!(cumulatives.len() == 2, VaultError::OracleUnavailable);
    let delta = cumulatives[1]
        .checked_sub(cumulatives[0])
        .ok_or(VaultError::MathOverflow)?;
    let mean = delta.div_euclid(twap_duration as i64);
    Ok(i32::try_from(mean).map_err(|_| VaultError::TickOutOfBounds)?)
}

/// The spot tick, provided it is within `max_twap_deviation` of the TWAP.
pub fn guarded_tick<P: LiquidityPool>(pool: &P, strategy: &Strategy) -> Result<i32> {
    let tick = pool.slot0()?.tick;
    check_twap_deviation(pool, strategy, tick)?;
    Ok(tick)
}

pub fn check_twap_deviation<P: LiquidityPool>(
    pool: &P,
    strategy: &Strategy,
    tick: i32,
) -> Result<()> {
    let twap = twap_tick(pool, strategy.twap_duration)?;
    let deviation = (tick as i64 - twap as i64).abs();
    require!(
        deviation <= strategy.max_twap_deviation as i64,
        VaultError::TwapDeviationExceeded
    );
    Ok(())
}

/// Rejects rebalancing on noise. Skipped until the first rebalance.
pub fn check_tick_move(strategy: &Strategy, tick: i32) -> Result<()> {
    if strategy.min_tick_move == 0 || !strategy.has_rebalanced() {
        return Ok(());
    }
    let moved = (tick as i64 - strategy.last_tick as i64).abs();
    require!(
        moved >= strategy.min_tick_move as i64,
        VaultError::TickMoveTooSmall
    );
    Ok(())
}

/// Whether the widest range built around `tick` fits below and above.
fn room_to_bounds(strategy: &Strategy, tick: i32, tick_spacing: i32) -> (bool, bool) {
    let floor = floor_to_spacing(tick, tick_spacing) as i64;
    let reach = strategy.base_threshold.max(strategy.limit_threshold) as i64;
    (
        floor - reach >= MIN_TICK as i64,
        floor + tick_spacing as i64 + reach <= MAX_TICK as i64,
    )
}

/// Ensures the widest range built around `tick` stays inside the tick bounds.
pub fn check_tick_bounds(strategy: &Strategy, tick: i32, tick_spacing: i32) -> Result<()> {
    let (below, above) = room_to_bounds(strategy, tick, tick_spacing);
    require!(below && above, VaultError::TickNearBounds);
    Ok(())
}

/// A new vault must be able to rebalance at the pool's current price.
pub fn check_initial_price(strategy: &Strategy, tick: i32, tick_spacing: i32) -> Result<()> {
    require!(tick_spacing > 0, VaultError::InvalidTickSpacing);
    require!(tick > MIN_TICK, VaultError::PriceTooLow);
    require!(tick < MAX_TICK, VaultError::PriceTooHigh);
    let (below, above) = room_to_bounds(strategy, tick, tick_spacing);
    require!(below, VaultError::PriceTooLow);
    require!(above, VaultError::PriceTooHigh);
    Ok(())
}
