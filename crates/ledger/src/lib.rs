//! `coinbox-ledger` — buyer balances with atomic credit/debit/drain.

pub mod account;
pub mod ledger;
pub mod store;

pub use account::Account;
pub use ledger::AccountLedger;
pub use store::{AccountStore, InMemoryAccountStore};
