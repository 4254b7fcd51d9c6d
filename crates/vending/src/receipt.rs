//! Purchase result record.

use serde::{Deserialize, Serialize};

/// Result of a successful purchase.
///
/// `change_amount` is informational: the portion of the remaining balance
/// immediately redeemable as coins (rounded down to the coin granularity).
/// It is **not** deducted from the stored balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub product_name: String,
    pub quantity: i64,
    pub total_price: i64,
    pub change_amount: i64,
}
