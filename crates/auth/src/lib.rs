//! `coinbox-auth` — ownership authorization for seller-owned resources.

pub mod ownership;

pub use ownership::authorize;
