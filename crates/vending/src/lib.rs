//! `coinbox-vending` — the transaction coordinator tying ledger, inventory,
//! ownership and change-making together.

pub mod coordinator;
pub mod receipt;

pub use coordinator::TransactionCoordinator;
pub use receipt::Receipt;
