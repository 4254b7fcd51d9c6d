//! Inventory service: validated, ownership-checked listing CRUD plus atomic
//! stock reservation.

use std::sync::Arc;

use tracing::debug;

use chrono::Utc;
use coinbox_auth::authorize;
use coinbox_core::{AccountId, DomainError, DomainResult, ProductId};

use crate::product::Product;
use crate::store::{ProductStore, StockReservation};

/// Replacement fields for a product update. The whole row is replaced;
/// `seller_id` is re-asserted to the caller and cannot be transferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: String,
    pub unit_cost: i64,
    pub stock: i64,
}

/// Owns product stock, cost and listing lifecycle.
#[derive(Debug, Clone)]
pub struct Inventory<S: ProductStore> {
    store: Arc<S>,
}

impl<S: ProductStore> Inventory<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// List a new product for `seller_id`, with `qty` as the initial stock.
    pub fn create(
        &self,
        seller_id: AccountId,
        name: impl Into<String>,
        unit_cost: i64,
        qty: i64,
    ) -> DomainResult<Product> {
        if qty < 1 {
            return Err(DomainError::InvalidQuantity(qty));
        }
        let product = Product::new(ProductId::new(), seller_id, name, unit_cost, qty);
        product.validate()?;
        self.store.insert(product.clone())?;
        debug!(product = %product.id, seller = %seller_id, "product created");
        Ok(product)
    }

    /// Replace name, cost and stock of an owned product.
    ///
    /// Existence is checked before ownership: a non-owner probing a missing
    /// id observes `NotFound`, not `Unauthorized`.
    pub fn update(
        &self,
        product_id: ProductId,
        caller: AccountId,
        fields: ProductUpdate,
    ) -> DomainResult<Product> {
        let existing = self.store.find(product_id)?;
        authorize(existing.seller_id, caller)?;

        let updated = Product {
            id: existing.id,
            seller_id: caller,
            name: fields.name,
            unit_cost: fields.unit_cost,
            stock: fields.stock,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };
        updated.validate()?;

        let replaced = self.store.replace(product_id, updated)?;
        debug!(product = %product_id, seller = %caller, "product updated");
        Ok(replaced)
    }

    /// Delete an owned product. Same existence-before-ownership ordering as
    /// `update`.
    pub fn remove(&self, product_id: ProductId, caller: AccountId) -> DomainResult<Product> {
        let existing = self.store.find(product_id)?;
        authorize(existing.seller_id, caller)?;

        let removed = self.store.remove(product_id)?;
        debug!(product = %product_id, seller = %caller, "product removed");
        Ok(removed)
    }

    /// Remove every listing owned by `seller_id` (account-deletion cascade).
    pub fn remove_by_seller(&self, seller_id: AccountId) -> DomainResult<usize> {
        let removed = self.store.remove_by_seller(seller_id)?;
        debug!(seller = %seller_id, removed, "seller listings removed");
        Ok(removed)
    }

    /// Atomically take `qty` units of stock, returning the cost/name snapshot
    /// from the same atomic step.
    pub fn reserve(&self, product_id: ProductId, qty: i64) -> DomainResult<StockReservation> {
        if qty < 1 {
            return Err(DomainError::InvalidQuantity(qty));
        }
        let reservation = self.store.reserve(product_id, qty)?;
        debug!(product = %product_id, qty, "stock reserved");
        Ok(reservation)
    }

    /// Return previously reserved stock (purchase rollback).
    pub fn release(&self, product_id: ProductId, qty: i64) -> DomainResult<()> {
        self.store.release(product_id, qty)?;
        debug!(product = %product_id, qty, "stock released");
        Ok(())
    }

    pub fn get(&self, product_id: ProductId) -> DomainResult<Product> {
        self.store.find(product_id)
    }

    pub fn list(&self) -> DomainResult<Vec<Product>> {
        self.store.list()
    }
}
