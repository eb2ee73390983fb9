//! Credit-token boundary.
//!
//! The fungible token is an external collaborator: the engine never mints or
//! burns it, only moves it between bettors, sellers, and its own per-activity
//! escrow accounts. [`CreditLedger`] is the seam; [`InMemoryCreditLedger`] is
//! the reference adapter used by tests and embedders without a real token
//! backend.

mod memory;

pub use memory::{InMemoryCreditLedger, AIRDROP_AMOUNT};

use crate::domain::{AccountId, Amount};
use crate::error::LedgerError;

/// Balance, allowance, and transfer primitives of the credit token.
pub trait CreditLedger: Send + Sync {
    /// Current balance of an account; unknown accounts hold zero.
    fn balance_of(&self, account: &AccountId) -> Amount;

    /// Move `amount` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InsufficientFunds`] when `from` holds less than
    /// `amount`.
    fn transfer(&self, from: &AccountId, to: &AccountId, amount: Amount)
        -> Result<(), LedgerError>;

    /// Move `amount` from `owner` to `to` on behalf of `spender`, consuming
    /// allowance.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InsufficientAllowance`] when `owner` has approved
    /// `spender` for less than `amount`, [`LedgerError::InsufficientFunds`]
    /// when the balance does not cover it.
    fn transfer_with_allowance(
        &self,
        owner: &AccountId,
        spender: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError>;
}
