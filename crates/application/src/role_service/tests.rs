use std::sync::Arc;

use tradegate_core::AppError;
use tradegate_domain::{PermissionId, RoleId};

use crate::authorization_graph_ports::{RoleInput, SaveRoleInput};
use crate::fake_graph::FakeGraph;

use super::{FallbackRole, RoleService, distinct_in_order};

fn service(graph: &FakeGraph) -> RoleService {
    RoleService::new(Arc::new(graph.clone()), FallbackRole::default())
}

fn new_role(name: &str, permission_ids: Vec<PermissionId>) -> SaveRoleInput {
    SaveRoleInput {
        role_id: None,
        name: name.to_owned(),
        description: None,
        permission_ids,
    }
}

#[test]
fn distinct_in_order_keeps_first_occurrence() {
    let ids = [RoleId::new(2), RoleId::new(2), RoleId::new(3), RoleId::new(2)];
    assert_eq!(distinct_in_order(&ids), vec![RoleId::new(2), RoleId::new(3)]);
}

#[test]
fn fallback_role_rejects_blank_name() {
    assert!(FallbackRole::new("  ").is_err());
    assert_eq!(FallbackRole::default().name(), "ROLE_USER");
}

#[tokio::test]
async fn save_role_links_every_permission() {
    let graph = FakeGraph::default();
    let read = graph.seed_permission("product.read").await;
    let write = graph.seed_permission("product.write").await;

    let role = service(&graph)
        .save_role(new_role("EDITOR", vec![read.id(), write.id()]))
        .await;

    assert!(role.is_ok());
    let role = role.unwrap_or_else(|_| unreachable!());
    let state = graph.snapshot().await;
    assert_eq!(state.grants_of(role.id()), vec![read.id(), write.id()]);
}

#[tokio::test]
async fn save_role_links_repeated_permissions_once() {
    let graph = FakeGraph::default();
    let read = graph.seed_permission("product.read").await;
    let write = graph.seed_permission("product.write").await;

    let role = service(&graph)
        .save_role(new_role("EDITOR", vec![read.id(), read.id(), write.id()]))
        .await;

    assert!(role.is_ok());
    let role = role.unwrap_or_else(|_| unreachable!());
    assert_eq!(graph.snapshot().await.grants_of(role.id()).len(), 2);
}

#[tokio::test]
async fn save_role_without_permissions_creates_nothing() {
    let graph = FakeGraph::default();

    let result = service(&graph).save_role(new_role("VIEWER", Vec::new())).await;

    match result {
        Err(AppError::Validation(message)) => {
            assert_eq!(message, "a role must be assigned at least one permission");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(graph.snapshot().await.roles.is_empty());
}

#[tokio::test]
async fn save_role_requires_name() {
    let graph = FakeGraph::default();
    let read = graph.seed_permission("product.read").await;

    let result = service(&graph).save_role(new_role("  ", vec![read.id()])).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn save_role_rejects_unknown_permission() {
    let graph = FakeGraph::default();
    let read = graph.seed_permission("product.read").await;

    let result = service(&graph)
        .save_role(new_role("EDITOR", vec![read.id(), PermissionId::new(999)]))
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(graph.snapshot().await.roles.is_empty());
}

#[tokio::test]
async fn save_role_update_path_replaces_grant_set() {
    let graph = FakeGraph::default();
    let read = graph.seed_permission("product.read").await;
    let write = graph.seed_permission("product.write").await;
    let delete = graph.seed_permission("product.delete").await;
    let role = graph
        .seed_role("EDITOR", &[read.id(), write.id()])
        .await;

    let result = service(&graph)
        .save_role(SaveRoleInput {
            role_id: Some(role.id()),
            name: "EDITOR".to_owned(),
            description: Some("edits listings".to_owned()),
            permission_ids: vec![delete.id()],
        })
        .await;

    assert!(result.is_ok());
    let state = graph.snapshot().await;
    assert_eq!(state.grants_of(role.id()), vec![delete.id()]);
    assert_eq!(state.roles.len(), 1);
    assert_eq!(state.roles[0].description(), Some("edits listings"));
}

#[tokio::test]
async fn replace_role_permissions_keeps_role_fields() {
    let graph = FakeGraph::default();
    let read = graph.seed_permission("product.read").await;
    let write = graph.seed_permission("product.write").await;
    let role = graph.seed_role("EDITOR", &[read.id()]).await;

    let result = service(&graph)
        .replace_role_permissions(role.id(), vec![write.id()])
        .await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap_or_else(|_| unreachable!()).name(), "EDITOR");
    assert_eq!(graph.snapshot().await.grants_of(role.id()), vec![write.id()]);
}

#[tokio::test]
async fn replace_role_permissions_runs_in_one_unit_of_work() {
    let graph = FakeGraph::default();
    let read = graph.seed_permission("product.read").await;
    let write = graph.seed_permission("product.write").await;
    let role = graph.seed_role("EDITOR", &[read.id()]).await;
    let begun_before = graph.begun_units();

    let result = service(&graph)
        .replace_role_permissions(role.id(), vec![write.id(), write.id()])
        .await;

    assert!(result.is_ok());
    assert_eq!(graph.begun_units() - begun_before, 1);
    assert_eq!(graph.snapshot().await.grants_of(role.id()), vec![write.id()]);
}

#[tokio::test]
async fn replace_role_permissions_requires_existing_role() {
    let graph = FakeGraph::default();
    let read = graph.seed_permission("product.read").await;

    let result = service(&graph)
        .replace_role_permissions(RoleId::new(404), vec![read.id()])
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn update_role_changes_fields_but_not_grants() {
    let graph = FakeGraph::default();
    let read = graph.seed_permission("product.read").await;
    let role = graph.seed_role("EDITOR", &[read.id()]).await;
    let grants_before = graph.snapshot().await.role_permissions;

    let result = service(&graph)
        .update_role(
            role.id(),
            RoleInput {
                name: "CONTENT_EDITOR".to_owned(),
                description: Some("renamed".to_owned()),
            },
        )
        .await;

    assert!(result.is_ok());
    let state = graph.snapshot().await;
    assert_eq!(state.role_permissions, grants_before);
    assert_eq!(state.roles[0].name(), "CONTENT_EDITOR");
}

#[tokio::test]
async fn update_role_requires_existing_grant() {
    let graph = FakeGraph::default();
    let role = graph.seed_role("ORPHAN", &[]).await;

    let result = service(&graph)
        .update_role(
            role.id(),
            RoleInput {
                name: "ORPHAN".to_owned(),
                description: None,
            },
        )
        .await;

    match result {
        Err(AppError::Validation(message)) => {
            assert_eq!(message, "role must have at least one assigned permission");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn update_role_rejects_unknown_role() {
    let graph = FakeGraph::default();

    let result = service(&graph)
        .update_role(
            RoleId::new(404),
            RoleInput {
                name: "GHOST".to_owned(),
                description: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn delete_role_reassigns_users_left_without_roles() {
    let graph = FakeGraph::default();
    let p1 = graph.seed_permission("listing.edit").await;
    let p2 = graph.seed_permission("listing.publish").await;
    let fallback = graph.seed_role("ROLE_USER", &[p1.id()]).await;
    let editor = graph.seed_role("EDITOR", &[p1.id(), p2.id()]).await;
    let user = graph.seed_user().await;
    graph.seed_assignment(user, editor.id()).await;

    let result = service(&graph).delete_role(editor.id()).await;

    assert!(result.is_ok());
    let state = graph.snapshot().await;
    assert_eq!(state.role_ids_of(user), vec![fallback.id()]);
    assert!(state.grants_of(editor.id()).is_empty());
    assert!(state.roles.iter().all(|role| role.id() != editor.id()));
}

#[tokio::test]
async fn delete_role_only_unlinks_users_holding_other_roles() {
    let graph = FakeGraph::default();
    let permission = graph.seed_permission("listing.edit").await;
    graph.seed_role("ROLE_USER", &[permission.id()]).await;
    let editor = graph.seed_role("EDITOR", &[permission.id()]).await;
    let seller = graph.seed_role("SELLER", &[permission.id()]).await;
    let user = graph.seed_user().await;
    graph.seed_assignment(user, editor.id()).await;
    graph.seed_assignment(user, seller.id()).await;

    let result = service(&graph).delete_role(editor.id()).await;

    assert!(result.is_ok());
    assert_eq!(graph.snapshot().await.role_ids_of(user), vec![seller.id()]);
}

#[tokio::test]
async fn delete_role_without_users_removes_role_and_grants() {
    let graph = FakeGraph::default();
    let permission = graph.seed_permission("listing.edit").await;
    graph.seed_role("ROLE_USER", &[permission.id()]).await;
    let editor = graph.seed_role("EDITOR", &[permission.id()]).await;
    let assignments_before = graph.snapshot().await.user_roles;

    let result = service(&graph).delete_role(editor.id()).await;

    assert!(result.is_ok());
    let state = graph.snapshot().await;
    assert_eq!(state.roles.len(), 1);
    assert!(state.grants_of(editor.id()).is_empty());
    assert_eq!(state.user_roles, assignments_before);
}

#[tokio::test]
async fn delete_unknown_role_is_invalid_and_mutates_nothing() {
    let graph = FakeGraph::default();
    let permission = graph.seed_permission("listing.edit").await;
    graph.seed_role("ROLE_USER", &[permission.id()]).await;
    let before = graph.snapshot().await;

    let result = service(&graph).delete_role(RoleId::new(404)).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    let after = graph.snapshot().await;
    assert_eq!(after.roles, before.roles);
    assert_eq!(after.role_permissions, before.role_permissions);
}

#[tokio::test]
async fn delete_role_without_fallback_role_is_illegal_state() {
    let graph = FakeGraph::default();
    let permission = graph.seed_permission("listing.edit").await;
    let editor = graph.seed_role("EDITOR", &[permission.id()]).await;

    let result = service(&graph).delete_role(editor.id()).await;

    assert!(matches!(result, Err(AppError::IllegalState(_))));
    assert_eq!(graph.snapshot().await.roles.len(), 1);
}

#[tokio::test]
async fn delete_fallback_role_is_refused() {
    let graph = FakeGraph::default();
    let permission = graph.seed_permission("listing.edit").await;
    let fallback = graph.seed_role("ROLE_USER", &[permission.id()]).await;
    let user = graph.seed_user().await;
    graph.seed_assignment(user, fallback.id()).await;

    let result = service(&graph).delete_role(fallback.id()).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(graph.snapshot().await.role_ids_of(user), vec![fallback.id()]);
}

#[tokio::test]
async fn delete_role_without_fallback_role_keeps_assigned_users() {
    let graph = FakeGraph::default();
    let permission = graph.seed_permission("listing.edit").await;
    let editor = graph.seed_role("EDITOR", &[permission.id()]).await;
    let user = graph.seed_user().await;
    graph.seed_assignment(user, editor.id()).await;

    let result = service(&graph).delete_role(editor.id()).await;

    assert!(matches!(result, Err(AppError::IllegalState(_))));
    let state = graph.snapshot().await;
    assert_eq!(state.role_ids_of(user), vec![editor.id()]);
    assert_eq!(state.grants_of(editor.id()), vec![permission.id()]);
}

#[tokio::test]
async fn rename_fallback_role_is_refused() {
    let graph = FakeGraph::default();
    let permission = graph.seed_permission("listing.edit").await;
    let fallback = graph.seed_role("ROLE_USER", &[permission.id()]).await;
    let editor = graph.seed_role("EDITOR", &[permission.id()]).await;
    let roles = service(&graph);

    let renamed = roles
        .update_role(
            fallback.id(),
            RoleInput {
                name: "MEMBER".to_owned(),
                description: None,
            },
        )
        .await;
    match renamed {
        Err(AppError::Validation(message)) => {
            assert_eq!(message, "fallback role 'ROLE_USER' cannot be renamed");
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    let saved = roles
        .save_role(SaveRoleInput {
            role_id: Some(fallback.id()),
            name: "MEMBER".to_owned(),
            description: None,
            permission_ids: vec![permission.id()],
        })
        .await;
    assert!(matches!(saved, Err(AppError::Validation(_))));

    assert!(roles.delete_role(editor.id()).await.is_ok());
    assert!(
        graph
            .snapshot()
            .await
            .roles
            .iter()
            .any(|role| role.name() == "ROLE_USER")
    );
}

#[tokio::test]
async fn fallback_role_description_can_change() {
    let graph = FakeGraph::default();
    let permission = graph.seed_permission("listing.edit").await;
    let fallback = graph.seed_role("ROLE_USER", &[permission.id()]).await;

    let result = service(&graph)
        .update_role(
            fallback.id(),
            RoleInput {
                name: "ROLE_USER".to_owned(),
                description: Some("default role".to_owned()),
            },
        )
        .await;

    assert!(result.is_ok());
    assert_eq!(
        graph.snapshot().await.roles[0].description(),
        Some("default role")
    );
}

#[tokio::test]
async fn delete_role_rolls_back_when_reassignment_fails() {
    let graph = FakeGraph::default();
    let permission = graph.seed_permission("listing.edit").await;
    graph.seed_role("ROLE_USER", &[permission.id()]).await;
    let editor = graph.seed_role("EDITOR", &[permission.id()]).await;
    let user = graph.seed_user().await;
    graph.seed_assignment(user, editor.id()).await;
    graph.fail_user_role_inserts();

    let result = service(&graph).delete_role(editor.id()).await;

    assert!(matches!(result, Err(AppError::Internal(_))));
    let state = graph.snapshot().await;
    assert_eq!(state.role_ids_of(user), vec![editor.id()]);
    assert_eq!(state.grants_of(editor.id()), vec![permission.id()]);
}

#[tokio::test]
async fn find_roles_by_ids_requires_ids() {
    let graph = FakeGraph::default();

    let result = service(&graph).find_roles_by_ids(&[]).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn find_role_by_name_returns_none_for_missing_role() {
    let graph = FakeGraph::default();

    let result = service(&graph).find_role_by_name("ROLE_ADMIN").await;

    assert!(matches!(result, Ok(None)));
}

#[tokio::test]
async fn verify_fallback_role_reports_missing_role() {
    let graph = FakeGraph::default();

    let result = service(&graph).verify_fallback_role().await;

    assert!(matches!(result, Err(AppError::IllegalState(_))));
}

#[tokio::test]
async fn list_role_permissions_returns_granted_permissions() {
    let graph = FakeGraph::default();
    let read = graph.seed_permission("product.read").await;
    graph.seed_permission("product.write").await;
    let role = graph.seed_role("VIEWER", &[read.id()]).await;

    let result = service(&graph).list_role_permissions(role.id()).await;

    assert!(result.is_ok());
    let permissions = result.unwrap_or_default();
    assert_eq!(permissions.len(), 1);
    assert_eq!(permissions[0].name(), "product.read");
}
