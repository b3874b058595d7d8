//! Tenant isolation across the scoped stores and the resolver.

use std::sync::Arc;

use docvault_auth::{
    PermissionResolver, ScopeMode, ScopedAclStore, ScopedHierarchyStore, TenantContext,
};
use docvault_core::error::{ErrorKind, RESOURCE_NOT_FOUND_MESSAGE};
use docvault_core::types::{FolderId, OrganizationId, UserId};
use docvault_database::memory::{MemoryAclStore, MemoryHierarchyStore};
use docvault_entity::folder::CreateFolder;
use docvault_entity::permission::{AccessLevel, FolderGrant, ResourceRef};

const ACME: OrganizationId = OrganizationId::new(5);
const GLOBEX: OrganizationId = OrganizationId::new(7);
const USER: UserId = UserId::new(42);

fn tenant(org: OrganizationId) -> TenantContext {
    TenantContext::for_organization(org).unwrap()
}

struct Stores {
    hierarchy: ScopedHierarchyStore,
    acl: ScopedAclStore,
    resolver: PermissionResolver,
}

fn stores() -> Stores {
    let hierarchy = Arc::new(MemoryHierarchyStore::default());
    let acl = Arc::new(MemoryAclStore::new(hierarchy.clone()));
    Stores {
        hierarchy: ScopedHierarchyStore::new(hierarchy.clone()),
        acl: ScopedAclStore::new(acl.clone()),
        resolver: PermissionResolver::new(hierarchy, acl),
    }
}

#[tokio::test]
async fn client_supplied_organization_is_overwritten() {
    let s = stores();
    let folder = s
        .hierarchy
        .create_folder(
            &tenant(ACME),
            ScopeMode::Scoped,
            CreateFolder {
                organization_id: Some(GLOBEX),
                parent_id: None,
                name: "Finance".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(folder.organization_id, ACME);

    let ace = s
        .acl
        .create_folder_ace(
            &tenant(ACME),
            ScopeMode::Scoped,
            FolderGrant {
                organization_id: Some(GLOBEX),
                folder_id: folder.id,
                user_id: USER,
                access_level: AccessLevel::Admin,
                recursive: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(ace.organization_id, ACME);
}

#[tokio::test]
async fn other_tenant_sees_missing_and_foreign_resources_identically() {
    let s = stores();
    let folder = s
        .hierarchy
        .create_folder(
            &tenant(ACME),
            ScopeMode::Scoped,
            CreateFolder {
                organization_id: None,
                parent_id: None,
                name: "Finance".into(),
            },
        )
        .await
        .unwrap();
    s.acl
        .create_folder_ace(
            &tenant(ACME),
            ScopeMode::Scoped,
            FolderGrant {
                organization_id: None,
                folder_id: folder.id,
                user_id: USER,
                access_level: AccessLevel::Admin,
                recursive: true,
            },
        )
        .await
        .unwrap();

    let foreign = s
        .resolver
        .resolve(USER, ResourceRef::Folder(folder.id), GLOBEX)
        .await
        .unwrap_err();
    let missing = s
        .resolver
        .resolve(USER, ResourceRef::Folder(FolderId::new(9_999)), GLOBEX)
        .await
        .unwrap_err();
    assert_eq!(foreign.kind, ErrorKind::NotFound);
    assert_eq!(foreign.kind, missing.kind);
    assert_eq!(foreign.message, missing.message);
    assert_eq!(foreign.message, RESOURCE_NOT_FOUND_MESSAGE);

    let listed = s
        .acl
        .list_folder_aces(&tenant(GLOBEX), ScopeMode::Scoped, folder.id)
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn foreign_tenant_cannot_claim_an_entry_slot() {
    let s = stores();
    let folder = s
        .hierarchy
        .create_folder(
            &tenant(ACME),
            ScopeMode::Scoped,
            CreateFolder {
                organization_id: None,
                parent_id: None,
                name: "Finance".into(),
            },
        )
        .await
        .unwrap();
    let entry = |folder_id| FolderGrant {
        organization_id: None,
        folder_id,
        user_id: USER,
        access_level: AccessLevel::Admin,
        recursive: true,
    };

    let foreign = s
        .acl
        .create_folder_ace(&tenant(GLOBEX), ScopeMode::Scoped, entry(folder.id))
        .await
        .unwrap_err();
    let missing = s
        .acl
        .create_folder_ace(&tenant(GLOBEX), ScopeMode::Scoped, entry(FolderId::new(9_999)))
        .await
        .unwrap_err();
    assert_eq!(foreign.kind, ErrorKind::NotFound);
    assert_eq!(foreign.message, missing.message);

    let err = s
        .acl
        .update_folder_ace(&tenant(GLOBEX), ScopeMode::Scoped, entry(folder.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let owned = s
        .acl
        .create_folder_ace(&tenant(ACME), ScopeMode::Scoped, entry(folder.id))
        .await
        .unwrap();
    assert_eq!(owned.organization_id, ACME);
}

#[tokio::test]
async fn child_cannot_be_created_under_foreign_parent() {
    let s = stores();
    let parent = s
        .hierarchy
        .create_folder(
            &tenant(ACME),
            ScopeMode::Scoped,
            CreateFolder {
                organization_id: None,
                parent_id: None,
                name: "Finance".into(),
            },
        )
        .await
        .unwrap();

    let err = s
        .hierarchy
        .create_folder(
            &tenant(GLOBEX),
            ScopeMode::Scoped,
            CreateFolder {
                organization_id: None,
                parent_id: Some(parent.id),
                name: "Leak".into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn empty_context_is_rejected_unless_bypassed() {
    let s = stores();
    let empty = TenantContext::new();

    let err = s
        .hierarchy
        .get_folder(&empty, ScopeMode::Scoped, FolderId::new(1))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingTenant);

    let err = s
        .hierarchy
        .create_folder(
            &empty,
            ScopeMode::Bypass("tenant provisioning"),
            CreateFolder {
                organization_id: None,
                parent_id: None,
                name: "Root".into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingTenant);

    let provisioned = s
        .hierarchy
        .create_folder(
            &empty,
            ScopeMode::Bypass("tenant provisioning"),
            CreateFolder {
                organization_id: Some(GLOBEX),
                parent_id: None,
                name: "Root".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(provisioned.organization_id, GLOBEX);

    let found = s
        .hierarchy
        .get_folder(&empty, ScopeMode::Bypass("support lookup"), provisioned.id)
        .await
        .unwrap();
    assert!(found.is_some());
}
