use anchor_lang::prelude::*;

#[error_code]
pub enum VaultError {
    #[msg("Threshold must be a multiple of the pool tick spacing")]
    ThresholdNotTickMultiple,

    #[msg("Threshold must be positive")]
    ThresholdNotPositive,

    #[msg("Threshold exceeds the maximum tick")]
    ThresholdTooHigh,

    #[msg("Max TWAP deviation must not be negative")]
    InvalidMaxTwapDeviation,

    #[msg("TWAP duration must be positive")]
    InvalidTwapDuration,

    #[msg("Rebalance cooldown must not be negative")]
    InvalidRebalanceCooldown,

    #[msg("Minimum tick move must not be negative")]
    InvalidMinTickMove,

    #[msg("Protocol fee must be below 100%")]
    InvalidProtocolFee,

    #[msg("Deposit fee must be below 100%")]
    InvalidDepositFee,

    #[msg("Streaming fee must be below 100%")]
    InvalidStreamingFee,

    #[msg("Pool tick spacing must be positive")]
    InvalidTickSpacing,

    #[msg("Pool price too low")]
    PriceTooLow,

    #[msg("Pool price too high")]
    PriceTooHigh,

    #[msg("Signer is not the vault governance")]
    NotGovernance,

    #[msg("Signer is not the pending governance")]
    NotPendingGovernance,

    #[msg("Signer is not the strategy keeper")]
    NotKeeper,

    #[msg("Signer is not the vault strategy")]
    NotStrategy,

    #[msg("Spot tick deviates too far from the TWAP")]
    TwapDeviationExceeded,

    #[msg("Spot tick has not moved enough since the last rebalance")]
    TickMoveTooSmall,

    #[msg("Spot tick too close to the tick bounds")]
    TickNearBounds,

    #[msg("Rebalance cooldown has not elapsed")]
    RebalanceCooldown,

    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Invalid recipient")]
    InvalidRecipient,

    #[msg("Total supply would fall below the minimum")]
    MinimumSupply,

    #[msg("Total supply would exceed the maximum")]
    MaxTotalSupplyExceeded,

    #[msg("Token0 amount below minimum")]
    Amount0BelowMin,

    #[msg("Token1 amount below minimum")]
    Amount1BelowMin,

    #[msg("Insufficient balance")]
    InsufficientBalance,

    #[msg("Vault is finalized")]
    Finalized,

    #[msg("Tick lower must be below tick upper")]
    TickRangeInverted,

    #[msg("Tick lower too low")]
    TickLowerTooLow,

    #[msg("Tick upper too high")]
    TickUpperTooHigh,

    #[msg("Tick lower not a multiple of tick spacing")]
    TickLowerNotAligned,

    #[msg("Tick upper not a multiple of tick spacing")]
    TickUpperNotAligned,

    #[msg("Bid range must end at or below the current tick")]
    BidAboveCurrentTick,

    #[msg("Ask range must start above the current tick")]
    AskAtOrBelowCurrentTick,

    #[msg("Tick out of bounds")]
    TickOutOfBounds,

    #[msg("Sqrt price out of bounds")]
    PriceOutOfBounds,

    #[msg("Pool account does not match the vault")]
    PoolMismatch,

    #[msg("Invalid token account")]
    InvalidTokenAccount,

    #[msg("Position account not supplied or invalid")]
    InvalidPositionAccount,

    #[msg("Pool oracle has no observation for the requested window")]
    OracleUnavailable,

    #[msg("Pool program returned no data")]
    MissingReturnData,

    #[msg("Math overflow")]
    MathOverflow,
}

/// Coarse grouping of failures for off-chain callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    Configuration,
    Authorization,
    PriceManipulation,
    Cooldown,
    InvalidInput,
    InsufficientBalance,
    Finalized,
    RangeValidity,
    Integration,
}

impl ErrorClass {
    /// Whether the same call may succeed later without changing inputs or roles.
    pub fn is_transient(&self) -> bool {
        matches!(self, ErrorClass::PriceManipulation | ErrorClass::Cooldown)
    }
}

impl VaultError {
    pub fn class(&self) -> ErrorClass {
        use VaultError::*;
        match self {
            ThresholdNotTickMultiple
            | ThresholdNotPositive
            | ThresholdTooHigh
            | InvalidMaxTwapDeviation
            | InvalidTwapDuration
            | InvalidRebalanceCooldown
            | InvalidMinTickMove
            | InvalidProtocolFee
            | InvalidDepositFee
            | InvalidStreamingFee
            | InvalidTickSpacing
            | PriceTooLow
            | PriceTooHigh => ErrorClass::Configuration,

            NotGovernance | NotPendingGovernance | NotKeeper | NotStrategy => {
                ErrorClass::Authorization
            }

            TwapDeviationExceeded | TickMoveTooSmall | TickNearBounds => {
                ErrorClass::PriceManipulation
            }

            RebalanceCooldown => ErrorClass::Cooldown,

            ZeroAmount
            | InvalidRecipient
            | MinimumSupply
            | MaxTotalSupplyExceeded
            | Amount0BelowMin
            | Amount1BelowMin => ErrorClass::InvalidInput,

            InsufficientBalance => ErrorClass::InsufficientBalance,

            Finalized => ErrorClass::Finalized,

            TickRangeInverted
            | TickLowerTooLow
            | TickUpperTooHigh
            | TickLowerNotAligned
            | TickUpperNotAligned
            | BidAboveCurrentTick
            | AskAtOrBelowCurrentTick
            | TickOutOfBounds
            | PriceOutOfBounds => ErrorClass::RangeValidity,

            PoolMismatch
            | InvalidTokenAccount
            | InvalidPositionAccount
            | OracleUnavailable
            | MissingReturnData
            | MathOverflow => ErrorClass::Integration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_price_and_cooldown_failures_are_transient() {
        assert!(VaultError::TwapDeviationExceeded.class().is_transient());
        assert!(VaultError::TickMoveTooSmall.class().is_transient());
        assert!(VaultError::RebalanceCooldown.class().is_transient());

        assert!(!VaultError::ThresholdTooHigh.class().is_transient());
        assert!(!VaultError::NotKeeper.class().is_transient());
        assert!(!VaultError::Finalized.class().is_transient());
        assert!(!VaultError::TickRangeInverted.class().is_transient());
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let a: u32 = VaultError::ZeroAmount.into();
        let b: u32 = VaultError::InvalidRecipient.into();
        let c: u32 = VaultError::MinimumSupply.into();
        assert_ne!(a, b);
        assert_ne!(b, c);
    }
}
