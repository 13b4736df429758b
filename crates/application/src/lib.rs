//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_graph_ports;
mod permission_service;
mod role_service;
mod user_role_service;

#[cfg(test)]
mod fake_graph;

pub use authorization_graph_ports::{
    AuthorizationGraphRepository, AuthorizationGraphUnitOfWork, PermissionInput, PermissionStore,
    RoleInput, RolePermissionLinkStore, RoleStore, SaveRoleInput, UserRoleLinkStore, UserStore,
};
pub use permission_service::PermissionService;
pub use role_service::{FallbackRole, RoleService};
pub use user_role_service::UserRoleService;
