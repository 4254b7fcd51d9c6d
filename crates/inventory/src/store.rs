//! Product persistence contract + in-memory implementation.
//!
//! Mirrors the account store: per-row locks and conditional updates so the
//! composite check-and-decrement on stock is atomic with respect to all
//! other stock mutations on the same product.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, TryLockError};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use coinbox_core::{AccountId, DomainError, DomainResult, ProductId};

use crate::product::Product;

/// Snapshot taken at the moment stock is decremented.
///
/// Cost and name reflect the row state under the same lock that performed the
/// decrement, never an earlier read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockReservation {
    pub unit_cost: i64,
    pub name: String,
}

/// Atomic product persistence primitives.
pub trait ProductStore: Send + Sync {
    /// Insert a new product. Fails with `Conflict` on a duplicate id.
    fn insert(&self, product: Product) -> DomainResult<()>;

    /// Snapshot of the product, or `NotFound`.
    fn find(&self, id: ProductId) -> DomainResult<Product>;

    /// Snapshot of every product listing.
    fn list(&self) -> DomainResult<Vec<Product>>;

    /// Delete the product, returning its final state.
    fn remove(&self, id: ProductId) -> DomainResult<Product>;

    /// Delete every product owned by `seller_id`; returns how many went.
    fn remove_by_seller(&self, seller_id: AccountId) -> DomainResult<usize>;

    /// Atomically replace the full row, returning the new state.
    fn replace(&self, id: ProductId, product: Product) -> DomainResult<Product>;

    /// Atomic check-and-decrement: subtract `qty` from stock if it fits,
    /// returning a snapshot taken at the same step. `InsufficientStock`
    /// leaves the row untouched.
    fn reserve(&self, id: ProductId, qty: i64) -> DomainResult<StockReservation>;

    /// Put `qty` back (rollback of a reservation).
    fn release(&self, id: ProductId, qty: i64) -> DomainResult<()>;
}

const LOCK_RETRY_BUDGET: u32 = 64;
const LOCK_RETRY_BACKOFF: Duration = Duration::from_micros(50);

fn lock_row<T>(row: &Mutex<T>) -> DomainResult<MutexGuard<'_, T>> {
    for _ in 0..LOCK_RETRY_BUDGET {
        match row.try_lock() {
            Ok(guard) => return Ok(guard),
            Err(TryLockError::Poisoned(_)) => {
                return Err(DomainError::conflict("product row lock poisoned"));
            }
            Err(TryLockError::WouldBlock) => std::thread::sleep(LOCK_RETRY_BACKOFF),
        }
    }
    Err(DomainError::conflict("product row lock retry budget exhausted"))
}

/// In-memory product store with independently lockable rows.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    rows: RwLock<HashMap<ProductId, Arc<Mutex<Product>>>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` under the row lock; the table read guard is held across the
    /// mutation so concurrent deletes cannot interleave.
    fn with_row<T>(
        &self,
        id: ProductId,
        f: impl FnOnce(&mut Product) -> DomainResult<T>,
    ) -> DomainResult<T> {
        let rows = self
            .rows
            .read()
            .map_err(|_| DomainError::conflict("product table lock poisoned"))?;
        let row = rows.get(&id).ok_or(DomainError::NotFound)?;
        let mut guard = lock_row(row)?;
        f(&mut guard)
    }
}

impl ProductStore for InMemoryProductStore {
    fn insert(&self, product: Product) -> DomainResult<()> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| DomainError::conflict("product table lock poisoned"))?;
        if rows.contains_key(&product.id) {
            return Err(DomainError::conflict(format!(
                "product {} already exists",
                product.id
            )));
        }
        rows.insert(product.id, Arc::new(Mutex::new(product)));
        Ok(())
    }

    fn find(&self, id: ProductId) -> DomainResult<Product> {
        self.with_row(id, |product| Ok(product.clone()))
    }

    fn list(&self) -> DomainResult<Vec<Product>> {
        let rows = self
            .rows
            .read()
            .map_err(|_| DomainError::conflict("product table lock poisoned"))?;
        let mut products = Vec::with_capacity(rows.len());
        for row in rows.values() {
            products.push(lock_row(row)?.clone());
        }
        Ok(products)
    }

    fn remove(&self, id: ProductId) -> DomainResult<Product> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| DomainError::conflict("product table lock poisoned"))?;
        let row = rows.remove(&id).ok_or(DomainError::NotFound)?;
        let product = lock_row(&row)?.clone();
        Ok(product)
    }

    fn remove_by_seller(&self, seller_id: AccountId) -> DomainResult<usize> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| DomainError::conflict("product table lock poisoned"))?;
        let before = rows.len();
        let mut kept = HashMap::with_capacity(before);
        for (id, row) in rows.drain() {
            if lock_row(&row)?.seller_id != seller_id {
                kept.insert(id, row);
            }
        }
        let removed = before - kept.len();
        *rows = kept;
        Ok(removed)
    }

    fn replace(&self, id: ProductId, product: Product) -> DomainResult<Product> {
        self.with_row(id, |row| {
            *row = product.clone();
            Ok(row.clone())
        })
    }

    fn reserve(&self, id: ProductId, qty: i64) -> DomainResult<StockReservation> {
        self.with_row(id, |product| {
            if qty > product.stock {
                return Err(DomainError::InsufficientStock {
                    available: product.stock,
                    requested: qty,
                });
            }
            product.stock -= qty;
            Ok(StockReservation {
                unit_cost: product.unit_cost,
                name: product.name.clone(),
            })
        })
    }

    fn release(&self, id: ProductId, qty: i64) -> DomainResult<()> {
        self.with_row(id, |product| {
            product.stock = product
                .stock
                .checked_add(qty)
                .ok_or_else(|| DomainError::invariant("stock overflow on release"))?;
            Ok(())
        })
    }
}
