use async_trait::async_trait;

use tradegate_core::AppResult;

use super::links::{RolePermissionLinkStore, UserRoleLinkStore};
use super::stores::{PermissionStore, RoleStore, UserStore};

/// Transactional view over every authorization graph store.
///
/// Writes become visible to other units of work only after [`commit`].
/// Dropping a unit of work without committing discards its writes.
///
/// [`commit`]: AuthorizationGraphUnitOfWork::commit
#[async_trait]
pub trait AuthorizationGraphUnitOfWork:
    PermissionStore + RoleStore + UserStore + RolePermissionLinkStore + UserRoleLinkStore + Send
{
    /// Makes every write of this unit of work durable.
    async fn commit(self: Box<Self>) -> AppResult<()>;
}

/// Repository port opening units of work on the authorization graph.
#[async_trait]
pub trait AuthorizationGraphRepository: Send + Sync {
    /// Starts a new unit of work.
    async fn begin(&self) -> AppResult<Box<dyn AuthorizationGraphUnitOfWork>>;
}
