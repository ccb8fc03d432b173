use anchor_lang::prelude::*;
use ethnum::U256;

use crate::errors::VaultError;

/// floor(a * b / denominator) with a 256-bit intermediate.
pub fn mul_div_floor(a: U256, b: U256, denominator: U256) -> Result<U256> {
    require!(denominator != U256::ZERO, VaultError::MathOverflow);
    let product = a.checked_mul(b).ok_or(VaultError::MathOverflow)?;
    Ok(product / denominator)
}

/// ceil(a * b / denominator) with a 256-bit intermediate.
pub fn mul_div_ceil(a: U256, b: U256, denominator: U256) -> Result<U256> {
    require!(denominator != U256::ZERO, VaultError::MathOverflow);
    let product = a.checked_mul(b).ok_or(VaultError::MathOverflow)?;
    let quotient = product / denominator;
    if product % denominator == U256::ZERO {
        Ok(quotient)
    } else {
        Ok(quotient + U256::ONE)
    }
}

pub fn div_ceil(a: U256, b: U256) -> Result<U256> {
    mul_div_ceil(a, U256::ONE, b)
}

pub fn to_u128(value: U256) -> Result<u128> {
    require!(value <= U256::from(u128::MAX), VaultError::MathOverflow);
    Ok(value.as_u128())
}

pub fn to_u64(value: U256) -> Result<u64> {
    require!(value <= U256::from(u64::MAX as u128), VaultError::MathOverflow);
    Ok(value.as_u128() as u64)
}

/// Converts to u128, clamping instead of failing.
pub fn saturating_u128(value: U256) -> u128 {
    if value > U256::from(u128::MAX) {
        u128::MAX
    } else {
        value.as_u128()
    }
}
