//! Token amounts <-> liquidity for a price range.
//!
//! Rounding favours the pool: amounts paid in are rounded up, amounts paid
//! out and liquidity derived from amounts are rounded down. A liquidity value
//! obtained from `liquidity_for_amounts` never requires more than the amounts
//! it was derived from when minted with `round_up = true`.

use anchor_lang::prelude::*;
use ethnum::U256;

use super::full_math::{div_ceil, mul_div_ceil, mul_div_floor, saturating_u128, to_u128};
use crate::errors::VaultError;

fn ordered(sqrt_price_a: u128, sqrt_price_b: u128) -> (u128, u128) {
    if sqrt_price_a > sqrt_price_b {
        (sqrt_price_b, sqrt_price_a)
    } else {
        (sqrt_price_a, sqrt_price_b)
    }
}

/// Token0 needed for `liquidity` between two prices: L * (sb - sa) / (sa * sb).
pub fn amount0_delta(
    sqrt_price_a: u128,
    sqrt_price_b: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u128> {
    let (sa, sb) = ordered(sqrt_price_a, sqrt_price_b);
    require!(sa > 0, VaultError::PriceOutOfBounds);
    if liquidity == 0 || sa == sb {
        return Ok(0);
    }

    let numerator1 = U256::from(liquidity) << 64;
    let numerator2 = U256::from(sb - sa);

    let amount = if round_up {
        div_ceil(mul_div_ceil(numerator1, numerator2, U256::from(sb))?, U256::from(sa))?
    } else {
        mul_div_floor(numerator1, numerator2, U256::from(sb))? / U256::from(sa)
    };
    to_u128(amount)
}

/// Token1 needed for `liquidity` between two prices: L * (sb - sa).
pub fn amount1_delta(
    sqrt_price_a: u128,
    sqrt_price_b: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u128> {
    let (sa, sb) = ordered(sqrt_price_a, sqrt_price_b);
    if liquidity == 0 || sa == sb {
        return Ok(0);
    }

    let q64 = U256::ONE << 64;
    let amount = if round_up {
        mul_div_ceil(U256::from(liquidity), U256::from(sb - sa), q64)?
    } else {
        mul_div_floor(U256::from(liquidity), U256::from(sb - sa), q64)?
    };
    to_u128(amount)
}

/// Liquidity obtainable from `amount0` between two prices, rounded down.
pub fn liquidity_for_amount0(sqrt_price_a: u128, sqrt_price_b: u128, amount0: u64) -> Result<u128> {
    let (sa, sb) = ordered(sqrt_price_a, sqrt_price_b);
    if sa == sb {
        return Ok(0);
    }
    let intermediate = (U256::from(sa) * U256::from(sb)) >> 64;
    let liquidity = mul_div_floor(U256::from(amount0 as u128), intermediate, U256::from(sb - sa))?;
    Ok(saturating_u128(liquidity))
}

/// Liquidity obtainable from `amount1` between two prices, rounded down.
pub fn liquidity_for_amount1(sqrt_price_a: u128, sqrt_price_b: u128, amount1: u64) -> Result<u128> {
    let (sa, sb) = ordered(sqrt_price_a, sqrt_price_b);
    if sa == sb {
        return Ok(0);
    }
    let liquidity = mul_div_floor(
        U256::from(amount1 as u128),
        U256::ONE << 64,
        U256::from(sb - sa),
    )?;
    Ok(saturating_u128(liquidity))
}

/// Largest liquidity for the range [sqrt_price_lower, sqrt_price_upper] at
/// `sqrt_price` that `amount0` and `amount1` can both pay for.
pub fn liquidity_for_amounts(
    sqrt_price: u128,
    sqrt_price_lower: u128,
    sqrt_price_upper: u128,
    amount0: u64,
    amount1: u64,
) -> Result<u128> {
    let (sa, sb) = ordered(sqrt_price_lower, sqrt_price_upper);

    if sqrt_price <= sa {
        liquidity_for_amount0(sa, sb, amount0)
    } else if sqrt_price < sb {
        let liquidity0 = liquidity_for_amount0(sqrt_price, sb, amount0)?;
        let liquidity1 = liquidity_for_amount1(sa, sqrt_price, amount1)?;
        Ok(liquidity0.min(liquidity1))
    } else {
        liquidity_for_amount1(sa, sb, amount1)
    }
}

/// Token amounts represented by `liquidity` in the range at `sqrt_price`.
pub fn amounts_for_liquidity(
    sqrt_price: u128,
    sqrt_price_lower: u128,
    sqrt_price_upper: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<(u128, u128)> {
    let (sa, sb) = ordered(sqrt_price_lower, sqrt_price_upper);

    if sqrt_price <= sa {
        Ok((amount0_delta(sa, sb, liquidity, round_up)?, 0))
    } else if sqrt_price < sb {
        Ok((
            amount0_delta(sqrt_price, sb, liquidity, round_up)?,
            amount1_delta(sa, sqrt_price, liquidity, round_up)?,
        ))
    } else {
        Ok((0, amount1_delta(sa, sb, liquidity, round_up)?))
    }
}

/// Like `amounts_for_liquidity` but narrowed to token amounts.
pub fn token_amounts_for_liquidity(
    sqrt_price: u128,
    sqrt_price_lower: u128,
    sqrt_price_upper: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<(u64, u64)> {
    let (amount0, amount1) =
        amounts_for_liquidity(sqrt_price, sqrt_price_lower, sqrt_price_upper, liquidity, round_up)?;
    Ok((
        u64::try_from(amount0).map_err(|_| VaultError::MathOverflow)?,
        u64::try_from(amount1).map_err(|_| VaultError::MathOverflow)?,
    ))
}
