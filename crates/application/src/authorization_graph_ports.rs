mod inputs;
mod links;
mod stores;
mod unit_of_work;

pub use inputs::{PermissionInput, RoleInput, SaveRoleInput};
pub use links::{RolePermissionLinkStore, UserRoleLinkStore};
pub use stores::{PermissionStore, RoleStore, UserStore};
pub use unit_of_work::{AuthorizationGraphRepository, AuthorizationGraphUnitOfWork};
