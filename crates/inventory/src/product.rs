//! Seller-owned product listing record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coinbox_core::{AccountId, DomainError, DomainResult, Entity, ProductId};

/// A stocked, seller-owned item.
///
/// `seller_id` is a back-reference to the owning account; it never changes
/// except to be re-asserted by the owner on update. `unit_cost` is in the
/// smallest currency unit and always positive; `stock` is never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub seller_id: AccountId,
    pub name: String,
    pub unit_cost: i64,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        id: ProductId,
        seller_id: AccountId,
        name: impl Into<String>,
        unit_cost: i64,
        stock: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            seller_id,
            name: name.into(),
            unit_cost,
            stock,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check the record-level invariants. Non-negotiable even when an
    /// upstream validation layer already filtered the input.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if self.unit_cost < 1 {
            return Err(DomainError::validation("unit cost must be positive"));
        }
        if self.stock < 0 {
            return Err(DomainError::invariant("stock cannot be negative"));
        }
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &ProductId {
        &self.id
    }
}
