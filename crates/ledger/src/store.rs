//! Account persistence contract + in-memory implementation.
//!
//! The trait exposes the atomic primitives the ledger needs so its balance
//! invariants hold under concurrency: a plain read-then-write store cannot
//! implement it correctly without an equivalent locking/transaction layer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, TryLockError};
use std::time::Duration;

use coinbox_core::{AccountId, DomainError, DomainResult};

use crate::account::Account;

/// Atomic account persistence primitives.
pub trait AccountStore: Send + Sync {
    /// Insert a new account. Fails with `Conflict` on a duplicate id.
    fn insert(&self, account: Account) -> DomainResult<()>;

    /// Snapshot of the account, or `NotFound`.
    fn find(&self, id: AccountId) -> DomainResult<Account>;

    /// Delete the account, returning its final state.
    fn remove(&self, id: AccountId) -> DomainResult<Account>;

    /// Atomically add `amount` to the balance; returns the new balance.
    fn credit(&self, id: AccountId, amount: i64) -> DomainResult<i64>;

    /// Atomically subtract `amount` if the balance covers it; returns the new
    /// balance, or `InsufficientFunds` with the balance left untouched.
    fn debit_if_sufficient(&self, id: AccountId, amount: i64) -> DomainResult<i64>;

    /// Atomic read-and-clear: set the balance to zero and return what it was.
    /// No credit or debit can interleave between the read and the clear.
    fn drain(&self, id: AccountId) -> DomainResult<i64>;
}

const LOCK_RETRY_BUDGET: u32 = 64;
const LOCK_RETRY_BACKOFF: Duration = Duration::from_micros(50);

/// Acquire a row lock within a bounded retry window.
///
/// Exhaustion (or a poisoned lock) surfaces `Conflict` with no mutation,
/// leaving the whole operation safe to retry at the caller's discretion.
fn lock_row<T>(row: &Mutex<T>) -> DomainResult<MutexGuard<'_, T>> {
    for _ in 0..LOCK_RETRY_BUDGET {
        match row.try_lock() {
            Ok(guard) => return Ok(guard),
            Err(TryLockError::Poisoned(_)) => {
                return Err(DomainError::conflict("account row lock poisoned"));
            }
            Err(TryLockError::WouldBlock) => std::thread::sleep(LOCK_RETRY_BACKOFF),
        }
    }
    Err(DomainError::conflict("account row lock retry budget exhausted"))
}

/// In-memory account store.
///
/// Each account is an independently lockable row, so operations on different
/// accounts never block each other. Intended for tests/dev and as the
/// reference semantics for real backends.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    rows: RwLock<HashMap<AccountId, Arc<Mutex<Account>>>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` under the row lock. The table read guard is held across the
    /// mutation so a concurrent `remove` cannot interleave with it.
    fn with_row<T>(
        &self,
        id: AccountId,
        f: impl FnOnce(&mut Account) -> DomainResult<T>,
    ) -> DomainResult<T> {
        let rows = self
            .rows
            .read()
            .map_err(|_| DomainError::conflict("account table lock poisoned"))?;
        let row = rows.get(&id).ok_or(DomainError::NotFound)?;
        let mut guard = lock_row(row)?;
        f(&mut guard)
    }
}

impl AccountStore for InMemoryAccountStore {
    fn insert(&self, account: Account) -> DomainResult<()> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| DomainError::conflict("account table lock poisoned"))?;
        if rows.contains_key(&account.id) {
            return Err(DomainError::conflict(format!(
                "account {} already exists",
                account.id
            )));
        }
        rows.insert(account.id, Arc::new(Mutex::new(account)));
        Ok(())
    }

    fn find(&self, id: AccountId) -> DomainResult<Account> {
        self.with_row(id, |account| Ok(account.clone()))
    }

    fn remove(&self, id: AccountId) -> DomainResult<Account> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| DomainError::conflict("account table lock poisoned"))?;
        let row = rows.remove(&id).ok_or(DomainError::NotFound)?;
        let account = lock_row(&row)?.clone();
        Ok(account)
    }

    fn credit(&self, id: AccountId, amount: i64) -> DomainResult<i64> {
        self.with_row(id, |account| {
            let balance = account
                .balance
                .checked_add(amount)
                .ok_or_else(|| DomainError::invariant("balance overflow on credit"))?;
            account.balance = balance;
            Ok(balance)
        })
    }

    fn debit_if_sufficient(&self, id: AccountId, amount: i64) -> DomainResult<i64> {
        self.with_row(id, |account| {
            if amount > account.balance {
                return Err(DomainError::InsufficientFunds {
                    balance: account.balance,
                    required: amount,
                });
            }
            account.balance -= amount;
            Ok(account.balance)
        })
    }

    fn drain(&self, id: AccountId) -> DomainResult<i64> {
        self.with_row(id, |account| Ok(std::mem::replace(&mut account.balance, 0)))
    }
}
