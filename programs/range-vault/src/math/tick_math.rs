//! Conversions between Q64.64 square-root prices and ticks on the 1.0001 grid.
//!
//! Ticks index prices as `price = 1.0001^tick`; the square root of that price
//! is carried as an unsigned Q64.64 fixed point number.

use anchor_lang::prelude::*;
use ethnum::U256;

use crate::errors::VaultError;

pub const MIN_TICK: i32 = -443636;
pub const MAX_TICK: i32 = 443636;

/// tick_to_sqrt_price(MIN_TICK)
pub const MIN_SQRT_PRICE_X64: u128 = 4295048016;
/// tick_to_sqrt_price(MAX_TICK)
pub const MAX_SQRT_PRICE_X64: u128 = 79226673515401279992447579055;

pub const Q64: u128 = 1u128 << 64;

// Bits of the log2 fraction computed in sqrt_price_to_tick
const BIT_PRECISION: u32 = 14;

// log_2(sqrt(1.0001)) in Q32.32 format
const LOG_B_2_X32: i128 = 59543866431248;

// Error margins of the log approximation
const LOG_B_P_ERR_MARGIN_LOWER_X64: i128 = 184467440737095516; // 0.01
const LOG_B_P_ERR_MARGIN_UPPER_X64: i128 = 15793534762490258745; // 2^-precision / log_2_b + 0.01

/// Square-root price at `tick`, Q64.64.
pub fn tick_to_sqrt_price(tick: i32) -> Result<u128> {
    require!(
        (MIN_TICK..=MAX_TICK).contains(&tick),
        VaultError::TickOutOfBounds
    );
    Ok(sqrt_price_at(tick))
}

/// Greatest tick whose square-root price is less than or equal to `sqrt_price`.
pub fn sqrt_price_to_tick(sqrt_price: u128) -> Result<i32> {
    require!(
        (MIN_SQRT_PRICE_X64..=MAX_SQRT_PRICE_X64).contains(&sqrt_price),
        VaultError::PriceOutOfBounds
    );

    // Integer part of log2, from the most significant bit
    let msb: u32 = 128 - sqrt_price.leading_zeros() - 1;
    let log2p_integer_x32 = (msb as i128 - 64) << 32;

    // Fractional part by repeated squaring of r = sqrt_price / 2^msb
    let mut bit: i128 = 0x8000_0000_0000_0000i128;
    let mut precision = 0;
    let mut log2p_fraction_x64 = 0;

    let mut r = if msb >= 64 {
        sqrt_price >> (msb - 63)
    } else {
        sqrt_price << (63 - msb)
    };

    while bit > 0 && precision < BIT_PRECISION {
        r *= r;
        let is_r_more_than_two = r >> 127_u32;
        r >>= 63 + is_r_more_than_two;
        log2p_fraction_x64 += bit * is_r_more_than_two as i128;
        bit >>= 1;
        precision += 1;
    }

    let log2p_fraction_x32 = log2p_fraction_x64 >> 32;
    let log2p_x32 = log2p_integer_x32 + log2p_fraction_x32;

    // Base 2 to base sqrt(1.0001)
    let logbp_x64 = log2p_x32 * LOG_B_2_X32;

    let tick_low: i32 = ((logbp_x64 - LOG_B_P_ERR_MARGIN_LOWER_X64) >> 64) as i32;
    let tick_high: i32 = ((logbp_x64 + LOG_B_P_ERR_MARGIN_UPPER_X64) >> 64) as i32;

    if tick_low == tick_high {
        Ok(tick_low)
    } else if sqrt_price_at(tick_high) <= sqrt_price {
        Ok(tick_high)
    } else {
        Ok(tick_low)
    }
}

/// Rounds `tick` down to a multiple of `spacing`, toward negative infinity.
pub fn floor_to_spacing(tick: i32, spacing: i32) -> i32 {
    tick.div_euclid(spacing) * spacing
}

fn sqrt_price_at(tick: i32) -> u128 {
    let tick = tick.clamp(MIN_TICK, MAX_TICK);
    if tick >= 0 {
        sqrt_price_positive_tick(tick)
    } else {
        sqrt_price_negative_tick(tick)
    }
}

fn sqrt_price_positive_tick(tick: i32) -> u128 {
    let mut ratio: u128 = if tick & 1 != 0 {
        79232123823359799118286999567
    } else {
        79228162514264337593543950336
    };

    if tick & 2 != 0 {
        ratio = mul_shift_96(ratio, 79236085330515764027303304731);
    }
    if tick & 4 != 0 {
        ratio = mul_shift_96(ratio, 79244008939048815603706035061);
    }
    if tick & 8 != 0 {
        ratio = mul_shift_96(ratio, 79259858533276714757314932305);
    }
    if tick & 16 != 0 {
        ratio = mul_shift_96(ratio, 79291567232598584799939703904);
    }
    if tick & 32 != 0 {
        ratio = mul_shift_96(ratio, 79355022692464371645785046466);
    }
    if tick & 64 != 0 {
        ratio = mul_shift_96(ratio, 79482085999252804386437311141);
    }
    if tick & 128 != 0 {
        ratio = mul_shift_96(ratio, 79736823300114093921829183326);
    }
    if tick & 256 != 0 {
        ratio = mul_shift_96(ratio, 80248749790819932309965073892);
    }
    if tick & 512 != 0 {
        ratio = mul_shift_96(ratio, 81282483887344747381513967011);
    }
    if tick & 1024 != 0 {
        ratio = mul_shift_96(ratio, 83390072131320151908154831281);
    }
    if tick & 2048 != 0 {
        ratio = mul_shift_96(ratio, 87770609709833776024991924138);
    }
    if tick & 4096 != 0 {
        ratio = mul_shift_96(ratio, 97234110755111693312479820773);
    }
    if tick & 8192 != 0 {
        ratio = mul_shift_96(ratio, 119332217159966728226237229890);
    }
    if tick & 16384 != 0 {
        ratio = mul_shift_96(ratio, 179736315981702064433883588727);
    }
    if tick & 32768 != 0 {
        ratio = mul_shift_96(ratio, 407748233172238350107850275304);
    }
    if tick & 65536 != 0 {
        ratio = mul_shift_96(ratio, 2098478828474011932436660412517);
    }
    if tick & 131072 != 0 {
        ratio = mul_shift_96(ratio, 55581415166113811149459800483533);
    }
    if tick & 262144 != 0 {
        ratio = mul_shift_96(ratio, 38992368544603139932233054999993551);
    }

    ratio >> 32
}

fn sqrt_price_negative_tick(tick: i32) -> u128 {
    let abs_tick = tick.abs();

    let mut ratio: u128 = if abs_tick & 1 != 0 {
        18445821805675392311
    } else {
        18446744073709551616
    };

    if abs_tick & 2 != 0 {
        ratio = (ratio * 18444899583751176498) >> 64
    }
    if abs_tick & 4 != 0 {
        ratio = (ratio * 18443055278223354162) >> 64
    }
    if abs_tick & 8 != 0 {
        ratio = (ratio * 18439367220385604838) >> 64
    }
    if abs_tick & 16 != 0 {
        ratio = (ratio * 18431993317065449817) >> 64
    }
    if abs_tick & 32 != 0 {
        ratio = (ratio * 18417254355718160513) >> 64
    }
    if abs_tick & 64 != 0 {
        ratio = (ratio * 18387811781193591352) >> 64
    }
    if abs_tick & 128 != 0 {
        ratio = (ratio * 18329067761203520168) >> 64
    }
    if abs_tick & 256 != 0 {
        ratio = (ratio * 18212142134806087854) >> 64
    }
    if abs_tick & 512 != 0 {
        ratio = (ratio * 17980523815641551639) >> 64
    }
    if abs_tick & 1024 != 0 {
        ratio = (ratio * 17526086738831147013) >> 64
    }
    if abs_tick & 2048 != 0 {
        ratio = (ratio * 16651378430235024244) >> 64
    }
    if abs_tick & 4096 != 0 {
        ratio = (ratio * 15030750278693429944) >> 64
    }
    if abs_tick & 8192 != 0 {
        ratio = (ratio * 12247334978882834399) >> 64
    }
    if abs_tick & 16384 != 0 {
        ratio = (ratio * 8131365268884726200) >> 64
    }
    if abs_tick & 32768 != 0 {
        ratio = (ratio * 3584323654723342297) >> 64
    }
    if abs_tick & 65536 != 0 {
        ratio = (ratio * 696457651847595233) >> 64
    }
    if abs_tick & 131072 != 0 {
        ratio = (ratio * 26294789957452057) >> 64
    }
    if abs_tick & 262144 != 0 {
        ratio = (ratio * 37481735321082) >> 64
    }

    ratio
}

fn mul_shift_96(n0: u128, n1: u128) -> u128 {
    let mul: U256 = (U256::from(n0) * U256::from(n1)) >> 96;
    mul.as_u128()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tick_zero_is_unit_price() {
        assert_eq!(tick_to_sqrt_price(0).unwrap(), Q64);
        assert_eq!(sqrt_price_to_tick(Q64).unwrap(), 0);
    }

    #[test]
    fn test_bounds_match_constants() {
        assert_eq!(tick_to_sqrt_price(MIN_TICK).unwrap(), MIN_SQRT_PRICE_X64);
        assert_eq!(tick_to_sqrt_price(MAX_TICK).unwrap(), MAX_SQRT_PRICE_X64);
        assert_eq!(sqrt_price_to_tick(MIN_SQRT_PRICE_X64).unwrap(), MIN_TICK);
        assert_eq!(sqrt_price_to_tick(MAX_SQRT_PRICE_X64).unwrap(), MAX_TICK);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        assert!(tick_to_sqrt_price(MIN_TICK - 1).is_err());
        assert!(tick_to_sqrt_price(MAX_TICK + 1).is_err());
        assert!(sqrt_price_to_tick(MIN_SQRT_PRICE_X64 - 1).is_err());
        assert!(sqrt_price_to_tick(MAX_SQRT_PRICE_X64 + 1).is_err());
    }

    #[test]
    fn test_price_of_hundred() {
        // sqrt(100) = 10, price 100 sits between ticks 46054 and 46055
        let sqrt_price = 10 * Q64;
        assert_eq!(sqrt_price_to_tick(sqrt_price).unwrap(), 46054);
        assert!(tick_to_sqrt_price(46054).unwrap() <= sqrt_price);
        assert!(tick_to_sqrt_price(46055).unwrap() > sqrt_price);
    }

    #[test]
    fn test_floor_to_spacing_negative_ticks() {
        assert_eq!(floor_to_spacing(0, 60), 0);
        assert_eq!(floor_to_spacing(59, 60), 0);
        assert_eq!(floor_to_spacing(60, 60), 60);
        assert_eq!(floor_to_spacing(-1, 60), -60);
        assert_eq!(floor_to_spacing(-60, 60), -60);
        assert_eq!(floor_to_spacing(-61, 60), -120);
    }

    #[test]
    fn test_sqrt_price_strictly_increasing() {
        let mut prev = tick_to_sqrt_price(-1000).unwrap();
        for tick in -999..1000 {
            let next = tick_to_sqrt_price(tick).unwrap();
            assert!(next > prev);
            prev = next;
        }
    }

    proptest! {
        #[test]
        fn prop_tick_round_trip(tick in MIN_TICK..=MAX_TICK) {
            let sqrt_price = tick_to_sqrt_price(tick).unwrap();
            prop_assert_eq!(sqrt_price_to_tick(sqrt_price).unwrap(), tick);
        }

        #[test]
        fn prop_tick_is_floor(tick in MIN_TICK..MAX_TICK) {
            let lower = tick_to_sqrt_price(tick).unwrap();
            let upper = tick_to_sqrt_price(tick + 1).unwrap();
            prop_assert_eq!(sqrt_price_to_tick(upper - 1).unwrap(), tick);
            prop_assert_eq!(sqrt_price_to_tick(lower + 1).unwrap(), tick);
        }

        #[test]
        fn prop_floor_to_spacing_is_aligned(tick in MIN_TICK..=MAX_TICK, spacing in 1i32..=200) {
            let floored = floor_to_spacing(tick, spacing);
            prop_assert_eq!(floored % spacing, 0);
            prop_assert!(floored <= tick);
            prop_assert!(tick - floored < spacing);
        }
    }
}
