//! Uniform access to a vault-owned position, named by its tick range.

use anchor_lang::prelude::*;

use super::fees::protocol_share;
use crate::errors::VaultError;
use crate::math::{liquidity_for_amounts, tick_to_sqrt_price, token_amounts_for_liquidity};
use crate::pool::{LiquidityPool, PoolView};
use crate::state::{TickRange, TokenAmounts};

/// What a burn-and-collect released.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Collected {
    /// Principal released by the burn
    pub burned: TokenAmounts,
    /// Everything paid out, principal plus fees
    pub collected: TokenAmounts,
}

impl Collected {
    pub fn fees(&self) -> TokenAmounts {
        self.collected.saturating_sub(self.burned)
    }
}

/// Liquidity currently held in `range`.
pub fn liquidity<P: PoolView>(pool: &P, range: TickRange) -> Result<u128> {
    if !range.is_set() {
        return Ok(0);
    }
    Ok(pool.position(range.lower, range.upper)?.liquidity)
}

/// Amounts held by the position at the current price, with owed fees net of
/// the protocol's cut. `round_up` values the principal generously, which is
/// what a deposit must be priced against.
pub fn position_amounts<P: PoolView>(
    pool: &P,
    range: TickRange,
    protocol_fee_bps: u16,
    round_up: bool,
) -> Result<TokenAmounts> {
    if !range.is_set() {
        return Ok(TokenAmounts::default());
    }
    let position = pool.position(range.lower, range.upper)?;
    let sqrt_price = pool.slot0()?.sqrt_price_x64;
    let (amount0, amount1) = token_amounts_for_liquidity(
        sqrt_price,
        tick_to_sqrt_price(range.lower)?,
        tick_to_sqrt_price(range.upper)?,
        position.liquidity,
        round_up,
    )?;
    let owed = TokenAmounts::new(position.tokens_owed_0, position.tokens_owed_1);
    let kept = owed.checked_sub(protocol_share(owed, protocol_fee_bps)?)?;
    TokenAmounts::new(amount0, amount1).checked_add(kept)
}

/// Removes `liquidity` from the position and collects everything owed.
pub fn withdraw_liquidity<P: LiquidityPool>(
    pool: &mut P,
    range: TickRange,
    liquidity: u128,
) -> Result<Collected> {
    if !range.is_set() || liquidity == 0 {
        return Ok(Collected::default());
    }
    let (burned0, burned1) = pool.burn(range.lower, range.upper, liquidity)?;
    let (collected0, collected1) = pool.collect(range.lower, range.upper, u64::MAX, u64::MAX)?;
    require!(
        collected0 >= burned0 && collected1 >= burned1,
        VaultError::InsufficientBalance
    );
    Ok(Collected {
        burned: TokenAmounts::new(burned0, burned1),
        collected: TokenAmounts::new(collected0, collected1),
    })
}

/// Removes all liquidity from the position and collects everything owed.
pub fn withdraw<P: LiquidityPool>(pool: &mut P, range: TickRange) -> Result<Collected> {
    let all = liquidity(pool, range)?;
    withdraw_liquidity(pool, range, all)
}

/// Adds the most liquidity that `amount0_max` and `amount1_max` can pay for.
/// Returns the amounts the pool pulled, never more than the maxima.
pub fn deposit<P: LiquidityPool>(
    pool: &mut P,
    range: TickRange,
    amount0_max: u64,
    amount1_max: u64,
) -> Result<TokenAmounts> {
    let liquidity = liquidity_for_range(pool, range, amount0_max, amount1_max)?;
    if liquidity == 0 {
        return Ok(TokenAmounts::default());
    }
    let (used0, used1) = pool.mint(range.lower, range.upper, liquidity)?;
    require!(
        used0 <= amount0_max && used1 <= amount1_max,
        VaultError::InsufficientBalance
    );
    Ok(TokenAmounts::new(used0, used1))
}

/// Liquidity `range` can take from the given amounts at the current price.
pub fn liquidity_for_range<P: PoolView>(
    pool: &P,
    range: TickRange,
    amount0: u64,
    amount1: u64,
) -> Result<u128> {
    if !range.is_set() {
        return Ok(0);
    }
    liquidity_for_amounts(
        pool.slot0()?.sqrt_price_x64,
        tick_to_sqrt_price(range.lower)?,
        tick_to_sqrt_price(range.upper)?,
        amount0,
        amount1,
    )
}

/// Zero-liquidity burn so the position's owed fees are up to date.
pub fn poke<P: LiquidityPool>(pool: &mut P, range: TickRange) -> Result<()> {
    if liquidity(pool, range)? > 0 {
        pool.burn(range.lower, range.upper, 0)?;
    }
    Ok(())
}
