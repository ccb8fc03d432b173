use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::errors::VaultError;
use crate::state::{TokenAmounts, Vault};

pub mod collect_protocol_fees;
pub mod configure_strategy;
pub mod deposit;
pub mod emergency;
pub mod get_total_amounts;
pub mod governance;
pub mod initialize_vault;
pub mod rebalance;
pub mod withdraw;

pub use collect_protocol_fees::*;
pub use configure_strategy::*;
pub use deposit::*;
pub use emergency::*;
pub use get_total_amounts::*;
pub use governance::*;
pub use initialize_vault::*;
pub use rebalance::*;
pub use withdraw::*;

/// Tokens and shares may not be sent to the null key or back to the vault.
pub(crate) fn validate_recipient(recipient: &Pubkey, vault: &Pubkey) -> Result<()> {
    require!(
        *recipient != Pubkey::default() && recipient != vault,
        VaultError::InvalidRecipient
    );
    Ok(())
}

pub(crate) fn token_balances(
    token_vault_0: &TokenAccount,
    token_vault_1: &TokenAccount,
) -> TokenAmounts {
    TokenAmounts::new(token_vault_0.amount, token_vault_1.amount)
}

/// Transfer out of a vault-owned token account, signed by the vault PDA.
pub(crate) fn transfer_from_vault<'info>(
    token_program: &Program<'info, Token>,
    from: &Account<'info, TokenAccount>,
    to: &Account<'info, TokenAccount>,
    vault: &Account<'info, Vault>,
    seeds: &[&[u8]],
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    token::transfer(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            Transfer {
                from: from.to_account_info(),
                to: to.to_account_info(),
                authority: vault.to_account_info(),
            },
            &[seeds],
        ),
        amount,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient_validation() {
        let vault = Pubkey::new_unique();
        assert!(validate_recipient(&Pubkey::new_unique(), &vault).is_ok());
        assert_eq!(
            validate_recipient(&Pubkey::default(), &vault).unwrap_err(),
            VaultError::InvalidRecipient.into()
        );
        assert_eq!(
            validate_recipient(&vault, &vault).unwrap_err(),
            VaultError::InvalidRecipient.into()
        );
    }
}
