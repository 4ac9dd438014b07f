//! The external fungible-transfer collaborator.
//!
//! The auction core never touches token balances directly — it goes through
//! [`TokenTransfer`], which is assumed atomic: a transfer either moves the
//! full amount or moves nothing and returns an error.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sealbid_types::{AccountId, Result, SealbidError};

/// Fungible token transfer primitive (external collaborator).
///
/// Implementations must be all-or-nothing: on error, both balances are
/// unchanged.
pub trait TokenTransfer {
    /// Move `amount` from `from` to `to`.
    ///
    /// # Errors
    /// - [`SealbidError::InsufficientFunds`] if `from` cannot cover `amount`
    /// - [`SealbidError::TransferFailed`] for any other rejection
    fn transfer(&mut self, from: AccountId, to: AccountId, amount: Decimal) -> Result<()>;

    /// Current balance of an account. Unknown accounts hold zero.
    fn balance_of(&self, account: AccountId) -> Decimal;
}

/// In-memory token ledger — the reference [`TokenTransfer`] implementation.
///
/// Used by tests and embeddings that do not bridge to a real token system.
#[derive(Debug, Default)]
pub struct InMemoryToken {
    balances: HashMap<AccountId, Decimal>,
}

impl InMemoryToken {
    /// Create an empty token ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Credit new supply to an account.
    pub fn mint(&mut self, account: AccountId, amount: Decimal) {
        *self.balances.entry(account).or_insert(Decimal::ZERO) += amount;
    }

    /// Total supply across all accounts.
    #[must_use]
    pub fn total_supply(&self) -> Decimal {
        self.balances.values().copied().sum()
    }
}

impl TokenTransfer for InMemoryToken {
    fn transfer(&mut self, from: AccountId, to: AccountId, amount: Decimal) -> Result<()> {
        if amount.is_sign_negative() {
            return Err(SealbidError::TransferFailed {
                reason: format!("negative transfer amount {amount}"),
            });
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(SealbidError::InsufficientFunds {
                needed: amount,
                available,
            });
        }
        *self.balances.entry(from).or_insert(Decimal::ZERO) -= amount;
        *self.balances.entry(to).or_insert(Decimal::ZERO) += amount;
        Ok(())
    }

    fn balance_of(&self, account: AccountId) -> Decimal {
        self.balances.get(&account).copied().unwrap_or(Decimal::ZERO)
    }
}
