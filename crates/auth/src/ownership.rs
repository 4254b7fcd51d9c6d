//! Ownership checks at the domain boundary.
//!
//! Role gating (who may create products, who may transact) is a capability
//! check performed by the request layer before the core is invoked. The core
//! only ever compares identities.

use coinbox_core::{AccountId, DomainError, DomainResult};

/// Authorize a caller against the owner of a resource.
///
/// - No IO
/// - No panics
/// - No role logic (pure identity comparison)
pub fn authorize(resource_owner: AccountId, caller: AccountId) -> DomainResult<()> {
    if resource_owner == caller {
        Ok(())
    } else {
        Err(DomainError::Unauthorized)
    }
}
