//! Integration tests for the Tenant repository using in-memory
//! SurrealDB.

use dietly_core::models::tenant::{CreateTenant, SubscriptionTier, TenantStatus, UpdateTenant};
use dietly_core::models::user::{CreateUser, UserRole};
use dietly_core::repository::{Pagination, TenantRepository, UserRepository};
use dietly_db::repository::{SurrealTenantRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    dietly_db::run_migrations(&db).await.unwrap();
    db
}

#[tokio::test]
async fn create_and_get_tenant() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let tenant = repo
        .create(CreateTenant {
            name: "Sunrise Clinic".into(),
            status: None,
            subscription: None,
        })
        .await
        .unwrap();

    // Defaults apply when unspecified.
    assert_eq!(tenant.name, "Sunrise Clinic");
    assert_eq!(tenant.status, TenantStatus::Active);
    assert_eq!(tenant.subscription, SubscriptionTier::Free);

    let fetched = repo.get_by_id(tenant.id).await.unwrap();
    assert_eq!(fetched.id, tenant.id);
    assert_eq!(fetched.name, tenant.name);
}

#[tokio::test]
async fn create_tenant_with_explicit_tier() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let tenant = repo
        .create(CreateTenant {
            name: "Premium Clinic".into(),
            status: Some(TenantStatus::Inactive),
            subscription: Some(SubscriptionTier::Premium),
        })
        .await
        .unwrap();

    assert_eq!(tenant.status, TenantStatus::Inactive);
    assert_eq!(tenant.subscription, SubscriptionTier::Premium);
}

#[tokio::test]
async fn update_tenant_is_a_partial_patch() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let tenant = repo
        .create(CreateTenant {
            name: "Before".into(),
            status: None,
            subscription: Some(SubscriptionTier::Basic),
        })
        .await
        .unwrap();

    let updated = repo
        .update(
            tenant.id,
            UpdateTenant {
                status: Some(TenantStatus::Suspended),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, TenantStatus::Suspended);
    assert_eq!(updated.name, "Before"); // unchanged
    assert_eq!(updated.subscription, SubscriptionTier::Basic); // unchanged
    assert!(updated.updated_at >= tenant.updated_at);

    // The patch is visible on a subsequent read.
    let fetched = repo.get_by_id(tenant.id).await.unwrap();
    assert_eq!(fetched.status, TenantStatus::Suspended);
}

#[tokio::test]
async fn delete_tenant() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let tenant = repo
        .create(CreateTenant {
            name: "Ephemeral".into(),
            status: None,
            subscription: None,
        })
        .await
        .unwrap();

    repo.delete(tenant.id).await.unwrap();

    let result = repo.get_by_id(tenant.id).await;
    assert!(result.is_err(), "should not find deleted tenant");
}

#[tokio::test]
async fn delete_tenant_does_not_cascade_to_users() {
    let db = setup().await;
    let tenant_repo = SurrealTenantRepository::new(db.clone());
    let user_repo = SurrealUserRepository::new(db);

    let tenant = tenant_repo
        .create(CreateTenant {
            name: "Doomed Clinic".into(),
            status: None,
            subscription: None,
        })
        .await
        .unwrap();

    let user = user_repo
        .create(CreateUser {
            name: "Stays Behind".into(),
            email: "stays@example.com".into(),
            username: "stays".into(),
            password: "some-password".into(),
            role: UserRole::Dietitian,
            tenant_id: Some(tenant.id),
        })
        .await
        .unwrap();

    tenant_repo.delete(tenant.id).await.unwrap();

    // The user survives with its (now dangling) tenant_id intact.
    let survivor = user_repo.get_by_id(user.id).await.unwrap();
    assert_eq!(survivor.tenant_id, Some(tenant.id));
}

#[tokio::test]
async fn list_tenants_with_pagination() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    for i in 0..5 {
        repo.create(CreateTenant {
            name: format!("Clinic {i}"),
            status: None,
            subscription: None,
        })
        .await
        .unwrap();
    }

    let page1 = repo
        .list(Pagination {
            offset: 0,
            limit: 3,
        })
        .await
        .unwrap();

    assert_eq!(page1.items.len(), 3);
    assert_eq!(page1.total, 5);
    assert_eq!(page1.offset, 0);
    assert_eq!(page1.limit, 3);

    let page2 = repo
        .list(Pagination {
            offset: 3,
            limit: 3,
        })
        .await
        .unwrap();

    assert_eq!(page2.items.len(), 2);
    assert_eq!(page2.total, 5);
}
