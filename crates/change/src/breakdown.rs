//! Greedy exact-change decomposition over the fixed coin set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use coinbox_core::{DomainError, DomainResult};

use crate::denomination::{Denomination, SMALLEST_UNIT};

/// Coin counts for an exact-change decomposition.
///
/// Always carries an entry for every denomination, zero counts included,
/// so callers get the full map shape (e.g. `{100:1, 50:0, 20:1, 10:0, 5:1}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinBreakdown {
    counts: BTreeMap<Denomination, i64>,
}

impl CoinBreakdown {
    /// Count of coins for a single denomination.
    pub fn count(&self, denomination: Denomination) -> i64 {
        self.counts.get(&denomination).copied().unwrap_or(0)
    }

    /// Total number of coins across all denominations.
    pub fn coin_count(&self) -> i64 {
        self.counts.values().sum()
    }

    /// Total monetary value of the decomposition.
    pub fn total(&self) -> i64 {
        self.counts.iter().map(|(d, n)| d.value() * n).sum()
    }

    /// `(denomination, count)` pairs, largest denomination first.
    pub fn iter_descending(&self) -> impl Iterator<Item = (Denomination, i64)> + '_ {
        Denomination::DESCENDING.iter().map(|d| (*d, self.count(*d)))
    }
}

/// Decompose `amount` into coin counts by greedy descending selection.
///
/// `amount` must be a non-negative multiple of the smallest denomination;
/// anything else fails with `InvalidAmount` (the coin system cannot express it).
pub fn breakdown(amount: i64) -> DomainResult<CoinBreakdown> {
    if amount < 0 || amount % SMALLEST_UNIT != 0 {
        return Err(DomainError::InvalidAmount(amount));
    }

    let mut counts = BTreeMap::new();
    let mut remainder = amount;
    for denomination in Denomination::DESCENDING {
        let count = remainder / denomination.value();
        remainder %= denomination.value();
        counts.insert(denomination, count);
    }

    // remainder is 0 here: amount is a multiple of 5 and 5 is in the set.
    Ok(CoinBreakdown { counts })
}
