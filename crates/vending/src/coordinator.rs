//! Orchestration of deposit/buy/reset as all-or-nothing operations.

use tracing::{debug, info, warn};

use coinbox_change::{CoinBreakdown, SMALLEST_UNIT, breakdown};
use coinbox_core::{AccountId, DomainError, DomainResult, ProductId};
use coinbox_inventory::{Inventory, Product, ProductStore, ProductUpdate};
use coinbox_ledger::{Account, AccountLedger, AccountStore};

use crate::receipt::Receipt;

/// Composes the ledger and the inventory into atomic transactions.
///
/// Per `buy` invocation the state machine is
/// `Pending -> StockReserved -> Debited -> Committed`; any failure after the
/// reservation releases the stock again, so no partial state is observable.
pub struct TransactionCoordinator<A: AccountStore, P: ProductStore> {
    ledger: AccountLedger<A>,
    inventory: Inventory<P>,
}

impl<A: AccountStore, P: ProductStore> TransactionCoordinator<A, P> {
    pub fn new(ledger: AccountLedger<A>, inventory: Inventory<P>) -> Self {
        Self { ledger, inventory }
    }

    // ── account lifecycle ────────────────────────────────────────────────

    /// Register a fresh account with a zero balance.
    pub fn open_account(&self) -> DomainResult<Account> {
        self.ledger.open()
    }

    /// Delete an account and cascade-delete its product listings.
    /// Returns how many listings were removed.
    pub fn close_account(&self, account_id: AccountId) -> DomainResult<usize> {
        // Existence first, so a missing account does not trigger the cascade.
        self.ledger.balance(account_id)?;
        let removed = self.inventory.remove_by_seller(account_id)?;
        self.ledger.close(account_id)?;
        info!(account = %account_id, removed, "account closed with listing cascade");
        Ok(removed)
    }

    pub fn balance(&self, account_id: AccountId) -> DomainResult<i64> {
        self.ledger.balance(account_id)
    }

    // ── transactions ─────────────────────────────────────────────────────

    /// Add one coin to the buyer's balance; returns the updated balance.
    pub fn deposit(&self, account_id: AccountId, amount: i64) -> DomainResult<i64> {
        let balance = self.ledger.credit(account_id, amount)?;
        info!(account = %account_id, amount, balance, "deposit accepted");
        Ok(balance)
    }

    /// Purchase `qty` units of a product with the buyer's balance.
    ///
    /// Stock is reserved first; if the debit then fails for any reason the
    /// reservation is released, leaving both resources exactly as they were.
    pub fn buy(&self, account_id: AccountId, product_id: ProductId, qty: i64) -> DomainResult<Receipt> {
        if qty < 1 {
            return Err(DomainError::InvalidQuantity(qty));
        }

        let reservation = self.inventory.reserve(product_id, qty)?;

        let (total_price, balance) = match self.charge(account_id, reservation.unit_cost, qty) {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!(account = %account_id, product = %product_id, error = %err, "purchase rolled back");
                if let Err(release_err) = self.inventory.release(product_id, qty) {
                    // The product vanished mid-rollback; its stock is gone with it.
                    warn!(product = %product_id, qty, error = %release_err, "failed to release reserved stock");
                }
                return Err(err);
            }
        };

        let change_amount = balance - balance % SMALLEST_UNIT;
        info!(
            account = %account_id,
            product = %product_id,
            qty,
            total_price,
            balance,
            "purchase committed"
        );
        Ok(Receipt {
            product_name: reservation.name,
            quantity: qty,
            total_price,
            change_amount,
        })
    }

    /// Debit leg of a purchase: checked total, then conditional debit.
    fn charge(&self, account_id: AccountId, unit_cost: i64, qty: i64) -> DomainResult<(i64, i64)> {
        let total = unit_cost
            .checked_mul(qty)
            .ok_or_else(|| DomainError::invariant("total price overflow"))?;
        let balance = self.ledger.debit(account_id, total)?;
        Ok((total, balance))
    }

    /// Drain the balance and decompose it into coins.
    ///
    /// A drained amount the coin set cannot express means a balance invariant
    /// was already broken elsewhere; it is surfaced, not silently discarded.
    pub fn reset(&self, account_id: AccountId) -> DomainResult<CoinBreakdown> {
        let drained = self.ledger.drain(account_id)?;
        let coins = breakdown(drained).map_err(|_| {
            DomainError::invariant(format!(
                "drained balance {drained} is not expressible in the coin set"
            ))
        })?;
        info!(account = %account_id, drained, "balance reset");
        Ok(coins)
    }

    // ── listing management (ownership enforced by the inventory) ─────────

    pub fn create_product(
        &self,
        seller_id: AccountId,
        name: impl Into<String>,
        unit_cost: i64,
        qty: i64,
    ) -> DomainResult<Product> {
        self.inventory.create(seller_id, name, unit_cost, qty)
    }

    pub fn update_product(
        &self,
        product_id: ProductId,
        caller: AccountId,
        fields: ProductUpdate,
    ) -> DomainResult<Product> {
        self.inventory.update(product_id, caller, fields)
    }

    pub fn delete_product(&self, product_id: ProductId, caller: AccountId) -> DomainResult<Product> {
        self.inventory.remove(product_id, caller)
    }

    pub fn get_product(&self, product_id: ProductId) -> DomainResult<Product> {
        self.inventory.get(product_id)
    }

    pub fn list_products(&self) -> DomainResult<Vec<Product>> {
        self.inventory.list()
    }
}
