//! Domain entities and invariants of the authorization graph.

#![forbid(unsafe_code)]

mod assignment;
mod identifiers;
mod permission;
mod role;

pub use assignment::{RolePermission, UserRole};
pub use identifiers::{PermissionId, RoleId, RolePermissionId, UserId, UserRoleId};
pub use permission::{
    PERMISSION_DESCRIPTION_MAX_LENGTH, PERMISSION_NAME_MAX_LENGTH, Permission, PermissionDraft,
};
pub use role::{DEFAULT_FALLBACK_ROLE_NAME, Role, RoleDraft};
