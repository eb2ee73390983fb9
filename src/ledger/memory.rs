//! In-memory credit-ledger adapter.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use crate::domain::{AccountId, Amount};
use crate::error::LedgerError;

use super::CreditLedger;

/// Fixed one-shot airdrop grant, in base units.
pub const AIRDROP_AMOUNT: Amount = 10_000;

#[derive(Debug, Default)]
struct LedgerState {
    balances: HashMap<AccountId, Amount>,
    /// (owner, spender) -> approved amount.
    allowances: HashMap<(AccountId, AccountId), Amount>,
    airdropped: HashSet<AccountId>,
}

/// Reference credit-token ledger held entirely in memory.
///
/// Mirrors the usual fungible-token surface: balances, owner-to-spender
/// allowances, and a fixed airdrop each account may claim exactly once.
#[derive(Debug, Default)]
pub struct InMemoryCreditLedger {
    state: RwLock<LedgerState>,
}

impl InMemoryCreditLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account with a starting balance, replacing any prior balance.
    pub fn open_account(&self, account: &AccountId, balance: Amount) {
        self.state
            .write()
            .balances
            .insert(account.clone(), balance);
    }

    /// Approve `spender` to move up to `amount` of `owner`'s funds.
    ///
    /// Overwrites any previous approval for the pair.
    pub fn approve(&self, owner: &AccountId, spender: &AccountId, amount: Amount) {
        self.state
            .write()
            .allowances
            .insert((owner.clone(), spender.clone()), amount);
    }

    /// Remaining approval from `owner` to `spender`.
    #[must_use]
    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.state
            .read()
            .allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Claim the one-shot airdrop into `account`.
    ///
    /// # Errors
    ///
    /// [`LedgerError::AirdropAlreadyClaimed`] on a second claim.
    pub fn claim_airdrop(&self, account: &AccountId) -> Result<Amount, LedgerError> {
        let mut state = self.state.write();
        if !state.airdropped.insert(account.clone()) {
            return Err(LedgerError::AirdropAlreadyClaimed {
                account: account.clone(),
            });
        }
        *state.balances.entry(account.clone()).or_insert(0) += AIRDROP_AMOUNT;
        Ok(AIRDROP_AMOUNT)
    }
}

impl CreditLedger for InMemoryCreditLedger {
    fn balance_of(&self, account: &AccountId) -> Amount {
        self.state
            .read()
            .balances
            .get(account)
            .copied()
            .unwrap_or(0)
    }

    fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let mut state = self.state.write();
        let available = state.balances.get(from).copied().unwrap_or(0);
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                account: from.clone(),
                required: amount,
                available,
            });
        }
        *state.balances.entry(from.clone()).or_insert(0) -= amount;
        *state.balances.entry(to.clone()).or_insert(0) += amount;
        Ok(())
    }

    fn transfer_with_allowance(
        &self,
        owner: &AccountId,
        spender: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let mut state = self.state.write();
        let key = (owner.clone(), spender.clone());
        let approved = state.allowances.get(&key).copied().unwrap_or(0);
        if approved < amount {
            return Err(LedgerError::InsufficientAllowance {
                owner: owner.clone(),
                spender: spender.clone(),
                required: amount,
                available: approved,
            });
        }
        let available = state.balances.get(owner).copied().unwrap_or(0);
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                account: owner.clone(),
                required: amount,
                available,
            });
        }

        state.allowances.insert(key, approved - amount);
        *state.balances.entry(owner.clone()).or_insert(0) -= amount;
        *state.balances.entry(to.clone()).or_insert(0) += amount;
        Ok(())
    }
}
