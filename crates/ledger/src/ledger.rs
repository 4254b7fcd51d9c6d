//! Account ledger service: validated credit/debit/drain over an `AccountStore`.

use std::sync::Arc;

use tracing::debug;

use coinbox_change::Denomination;
use coinbox_core::{AccountId, DomainError, DomainResult};

use crate::account::Account;
use crate::store::AccountStore;

/// Owns buyer balances. Money enters only via `credit` with an amount drawn
/// from the fixed coin set; it leaves only via `debit` or `drain`.
#[derive(Debug, Clone)]
pub struct AccountLedger<S: AccountStore> {
    store: Arc<S>,
}

impl<S: AccountStore> AccountLedger<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Register a fresh account with a zero balance.
    pub fn open(&self) -> DomainResult<Account> {
        let account = Account::new(AccountId::new());
        self.store.insert(account.clone())?;
        debug!(account = %account.id, "account opened");
        Ok(account)
    }

    /// Delete the account, returning its final state. Cascading removal of
    /// the holder's product listings is the coordinator's job.
    pub fn close(&self, id: AccountId) -> DomainResult<Account> {
        let account = self.store.remove(id)?;
        debug!(account = %id, balance = account.balance, "account closed");
        Ok(account)
    }

    pub fn balance(&self, id: AccountId) -> DomainResult<i64> {
        Ok(self.store.find(id)?.balance)
    }

    /// Add a single coin to the balance; returns the new balance.
    ///
    /// The amount must be one of the fixed denominations, upstream filtering
    /// notwithstanding.
    pub fn credit(&self, id: AccountId, amount: i64) -> DomainResult<i64> {
        if Denomination::from_value(amount).is_none() {
            return Err(DomainError::InvalidDenomination(amount));
        }
        let balance = self.store.credit(id, amount)?;
        debug!(account = %id, amount, balance, "balance credited");
        Ok(balance)
    }

    /// Subtract `amount` (non-negative) if the balance covers it; returns the
    /// new balance.
    pub fn debit(&self, id: AccountId, amount: i64) -> DomainResult<i64> {
        if amount < 0 {
            return Err(DomainError::validation("debit amount cannot be negative"));
        }
        let balance = self.store.debit_if_sufficient(id, amount)?;
        debug!(account = %id, amount, balance, "balance debited");
        Ok(balance)
    }

    /// Atomically clear the balance, returning the pre-drain value.
    pub fn drain(&self, id: AccountId) -> DomainResult<i64> {
        let drained = self.store.drain(id)?;
        debug!(account = %id, drained, "balance drained");
        Ok(drained)
    }
}
