//! `coinbox-inventory` — seller-owned product listings and atomic stock.

pub mod inventory;
pub mod product;
pub mod store;

pub use inventory::{Inventory, ProductUpdate};
pub use product::Product;
pub use store::{InMemoryProductStore, ProductStore, StockReservation};
