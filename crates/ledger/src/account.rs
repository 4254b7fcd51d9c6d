//! Buyer account record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coinbox_core::{AccountId, Entity};

/// A buyer's funds holder.
///
/// `balance` is an integer in the smallest currency unit and is never
/// negative; it changes only through `AccountStore` primitives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Fresh account with a zero balance (registration state).
    pub fn new(id: AccountId) -> Self {
        Self {
            id,
            balance: 0,
            created_at: Utc::now(),
        }
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> &AccountId {
        &self.id
    }
}
