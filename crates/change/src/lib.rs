//! `coinbox-change` — exact-change decomposition over the fixed coin set.
//!
//! Pure functions only: no IO, no shared state.

pub mod breakdown;
pub mod denomination;

pub use breakdown::{CoinBreakdown, breakdown};
pub use denomination::{Denomination, SMALLEST_UNIT};
