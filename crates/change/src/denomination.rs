//! The fixed coin set accepted and returned by the machine.

use serde::{Deserialize, Serialize};

/// One of the fixed coin values.
///
/// The set is canonical: each denomination divides evenly into the next
/// larger one's combinations, so greedy change-making is optimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Denomination {
    Five,
    Ten,
    Twenty,
    Fifty,
    Hundred,
}

/// The smallest coin value; every ledger movement is a multiple of it.
pub const SMALLEST_UNIT: i64 = 5;

impl Denomination {
    /// All denominations, largest first (the order greedy selection uses).
    pub const DESCENDING: [Denomination; 5] = [
        Denomination::Hundred,
        Denomination::Fifty,
        Denomination::Twenty,
        Denomination::Ten,
        Denomination::Five,
    ];

    /// Face value in the smallest currency unit.
    pub const fn value(self) -> i64 {
        match self {
            Denomination::Five => 5,
            Denomination::Ten => 10,
            Denomination::Twenty => 20,
            Denomination::Fifty => 50,
            Denomination::Hundred => 100,
        }
    }

    /// Look a coin up by face value. `None` for anything outside the set.
    pub fn from_value(value: i64) -> Option<Denomination> {
        match value {
            5 => Some(Denomination::Five),
            10 => Some(Denomination::Ten),
            20 => Some(Denomination::Twenty),
            50 => Some(Denomination::Fifty),
            100 => Some(Denomination::Hundred),
            _ => None,
        }
    }
}

impl core::fmt::Display for Denomination {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.value())
    }
}
