use anchor_lang::prelude::*;

use crate::errors::VaultError;
use crate::math::MAX_TICK;

/// Keeper-driven rebalancing parameters for one vault.
#[account]
#[derive(Default)]
pub struct Strategy {
    pub vault: Pubkey,

    /// The only signer allowed to trigger `rebalance`
    pub keeper: Pubkey,

    /// Half-width of the base range, in ticks
    pub base_threshold: i32,

    /// Width of the one-sided limit range, in ticks
    pub limit_threshold: i32,

    /// Largest tolerated distance between spot and TWAP ticks
    pub max_twap_deviation: i32,

    /// TWAP window in seconds
    pub twap_duration: u32,

    /// Minimum seconds between two keeper rebalances
    pub rebalance_cooldown: i64,

    /// Minimum spot tick move since the last rebalance; zero disables the check
    pub min_tick_move: i32,

    pub last_tick: i32,
    pub last_rebalance_ts: i64,

    pub bump: u8,

    /// Reserved space for future upgrades
    pub _reserved: [u8; 32],
}

impl Strategy {
    pub const LEN: usize = 8 + // discriminator
        32 + // vault
        32 + // keeper
        4 + // base_threshold
        4 + // limit_threshold
        4 + // max_twap_deviation
        4 + // twap_duration
        8 + // rebalance_cooldown
        4 + // min_tick_move
        4 + // last_tick
        8 + // last_rebalance_ts
        1 + // bump
        32; // _reserved

    pub fn has_rebalanced(&self) -> bool {
        self.last_rebalance_ts > 0
    }

    pub fn require_keeper(&self, signer: &Pubkey) -> Result<()> {
        require_keys_eq!(*signer, self.keeper, VaultError::NotKeeper);
        Ok(())
    }

    pub fn validate_threshold(threshold: i32, tick_spacing: i32) -> Result<()> {
        require!(threshold > 0, VaultError::ThresholdNotPositive);
        require!(threshold <= MAX_TICK, VaultError::ThresholdTooHigh);
        require!(
            threshold % tick_spacing == 0,
            VaultError::ThresholdNotTickMultiple
        );
        Ok(())
    }

    pub fn set_base_threshold(&mut self, threshold: i32, tick_spacing: i32) -> Result<()> {
        Self::validate_threshold(threshold, tick_spacing)?;
        self.base_threshold = threshold;
        Ok(())
    }

    pub fn set_limit_threshold(&mut self, threshold: i32, tick_spacing: i32) -> Result<()> {
        Self::validate_threshold(threshold, tick_spacing)?;
        self.limit_threshold = threshold;
        Ok(())
    }

    pub fn set_max_twap_deviation(&mut self, deviation: i32) -> Result<()> {
        require!(deviation >= 0, VaultError::InvalidMaxTwapDeviation);
        self.max_twap_deviation = deviation;
        Ok(())
    }

    pub fn set_twap_duration(&mut self, duration: u32) -> Result<()> {
        require!(duration > 0, VaultError::InvalidTwapDuration);
        self.twap_duration = duration;
        Ok(())
    }

    pub fn set_rebalance_cooldown(&mut self, cooldown: i64) -> Result<()> {
        require!(cooldown >= 0, VaultError::InvalidRebalanceCooldown);
        self.rebalance_cooldown = cooldown;
        Ok(())
    }

    pub fn set_min_tick_move(&mut self, min_tick_move: i32) -> Result<()> {
        require!(min_tick_move >= 0, VaultError::InvalidMinTickMove);
        self.min_tick_move = min_tick_move;
        Ok(())
    }

    pub fn record_rebalance(&mut self, tick: i32, now: i64) {
        self.last_tick = tick;
        self.last_rebalance_ts = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_validation() {
        assert!(Strategy::validate_threshold(2400, 60).is_ok());
        assert_eq!(
            Strategy::validate_threshold(2401, 60).unwrap_err(),
            VaultError::ThresholdNotTickMultiple.into()
        );
        assert_eq!(
            Strategy::validate_threshold(0, 60).unwrap_err(),
            VaultError::ThresholdNotPositive.into()
        );
        assert_eq!(
            Strategy::validate_threshold(-60, 60).unwrap_err(),
            VaultError::ThresholdNotPositive.into()
        );
        assert_eq!(
            Strategy::validate_threshold(887_220, 60).unwrap_err(),
            VaultError::ThresholdTooHigh.into()
        );
    }

    #[test]
    fn test_setters_keep_old_value_on_rejection() {
        let mut strategy = Strategy {
            base_threshold: 2400,
            twap_duration: 600,
            ..Default::default()
        };
        assert!(strategy.set_base_threshold(2430, 60).is_err());
        assert_eq!(strategy.base_threshold, 2400);
        assert!(strategy.set_twap_duration(0).is_err());
        assert_eq!(strategy.twap_duration, 600);
        assert!(strategy.set_max_twap_deviation(-1).is_err());
        assert!(strategy.set_rebalance_cooldown(-1).is_err());
        assert!(strategy.set_min_tick_move(-1).is_err());
        strategy.set_limit_threshold(1200, 60).unwrap();
        assert_eq!(strategy.limit_threshold, 1200);
    }

    #[test]
    fn test_keeper_gate() {
        let keeper = Pubkey::new_unique();
        let strategy = Strategy {
            keeper,
            ..Default::default()
        };
        assert!(strategy.require_keeper(&keeper).is_ok());
        assert_eq!(
            strategy.require_keeper(&Pubkey::new_unique()).unwrap_err(),
            VaultError::NotKeeper.into()
        );
    }
}
