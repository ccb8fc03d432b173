use anchor_lang::prelude::*;
use ethnum::U256;

use crate::constants::{MAX_BPS, SECONDS_PER_YEAR};
use crate::math::full_math::{mul_div_floor, to_u64};
use crate::state::TokenAmounts;

/// `amount * bps / MAX_BPS`, rounded down.
pub fn bps_of(amount: u64, bps: u16) -> Result<u64> {
    to_u64(mul_div_floor(
        U256::from(amount as u128),
        U256::from(bps as u128),
        U256::from(MAX_BPS as u128),
    )?)
}

/// The protocol's cut of pool trading fees.
pub fn protocol_share(fees: TokenAmounts, protocol_fee_bps: u16) -> Result<TokenAmounts> {
    Ok(TokenAmounts::new(
        bps_of(fees.amount0, protocol_fee_bps)?,
        bps_of(fees.amount1, protocol_fee_bps)?,
    ))
}

/// Management fee on `assets` for `elapsed` seconds at an annual rate of
/// `streaming_fee_bps`. Never more than the assets themselves.
pub fn streaming_fee(
    assets: TokenAmounts,
    streaming_fee_bps: u16,
    elapsed: i64,
) -> Result<TokenAmounts> {
    if streaming_fee_bps == 0 || elapsed <= 0 {
        return Ok(TokenAmounts::default());
    }
    let rate = U256::from(streaming_fee_bps as u128) * U256::from(elapsed as u128);
    let denominator = U256::from(MAX_BPS as u128) * U256::from(SECONDS_PER_YEAR as u128);
    let fee = |amount: u64| -> Result<u64> {
        let fee = to_u64(mul_div_floor(U256::from(amount as u128), rate, denominator)?)?;
        Ok(fee.min(amount))
    };
    Ok(TokenAmounts::new(fee(assets.amount0)?, fee(assets.amount1)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_share_rounds_down() {
        let share = protocol_share(TokenAmounts::new(999, 10_000), 1000).unwrap();
        assert_eq!(share, TokenAmounts::new(99, 1000));
        assert_eq!(
            protocol_share(TokenAmounts::new(999, 10_000), 0).unwrap(),
            TokenAmounts::default()
        );
    }

    #[test]
    fn test_streaming_fee_is_pro_rata() {
        let assets = TokenAmounts::new(1_000_000_000, 2_000_000_000);
        let year = streaming_fee(assets, 200, SECONDS_PER_YEAR as i64).unwrap();
        assert_eq!(year, TokenAmounts::new(20_000_000, 40_000_000));

        let half = streaming_fee(assets, 200, SECONDS_PER_YEAR as i64 / 2).unwrap();
        assert_eq!(half, TokenAmounts::new(10_000_000, 20_000_000));
    }

    #[test]
    fn test_streaming_fee_is_capped() {
        let assets = TokenAmounts::new(1000, 0);
        let fee = streaming_fee(assets, 5000, 10 * SECONDS_PER_YEAR as i64).unwrap();
        assert_eq!(fee, assets);
    }

    #[test]
    fn test_no_time_no_fee() {
        let assets = TokenAmounts::new(1000, 1000);
        assert_eq!(streaming_fee(assets, 200, 0).unwrap(), TokenAmounts::default());
        assert_eq!(streaming_fee(assets, 200, -5).unwrap(), TokenAmounts::default());
    }
}
