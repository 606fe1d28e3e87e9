//! Integration tests for the User repository using in-memory
//! SurrealDB.

use dietly_core::error::DietlyError;
use dietly_core::models::tenant::CreateTenant;
use dietly_core::models::user::{CreateUser, UpdateUser, UserRole};
use dietly_core::repository::{Pagination, TenantRepository, UserRepository};
use dietly_db::repository::{SurrealTenantRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: spin up in-memory DB, run migrations, create a tenant.
async fn setup() -> (Surreal<surrealdb::engine::local::Db>, Uuid) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    dietly_db::run_migrations(&db).await.unwrap();

    let tenant = SurrealTenantRepository::new(db.clone())
        .create(CreateTenant {
            name: "Test Clinic".into(),
            status: None,
            subscription: None,
        })
        .await
        .unwrap();

    (db, tenant.id)
}

fn new_user(username: &str, role: UserRole, tenant_id: Option<Uuid>) -> CreateUser {
    CreateUser {
        name: format!("User {username}"),
        email: format!("{username}@example.com"),
        username: username.into(),
        password: "initial-password".into(),
        role,
        tenant_id,
    }
}

#[tokio::test]
async fn create_hashes_the_password() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(new_user("alice", UserRole::Dietitian, Some(tenant_id)))
        .await
        .unwrap();

    assert_ne!(user.password_hash, "initial-password");
    assert!(
        user.password_hash.starts_with("$argon2id$"),
        "expected an Argon2id PHC hash, got: {}",
        user.password_hash
    );
    assert_eq!(user.role, UserRole::Dietitian);
    assert_eq!(user.tenant_id, Some(tenant_id));
}

#[tokio::test]
async fn get_by_username_and_email() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(new_user("bob", UserRole::Patient, Some(tenant_id)))
        .await
        .unwrap();

    let by_username = repo.get_by_username("bob").await.unwrap();
    assert_eq!(by_username.id, user.id);

    let by_email = repo.get_by_email("bob@example.com").await.unwrap();
    assert_eq!(by_email.id, user.id);
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    repo.create(new_user("carol", UserRole::Dietitian, Some(tenant_id)))
        .await
        .unwrap();

    let mut dup = new_user("carol", UserRole::Dietitian, Some(tenant_id));
    dup.email = "different@example.com".into();
    let err = repo.create(dup).await.unwrap_err();

    assert!(
        matches!(err, DietlyError::AlreadyExists { .. }),
        "expected AlreadyExists, got: {err:?}"
    );
}

#[tokio::test]
async fn username_is_unique_across_tenants() {
    let (db, tenant_a) = setup().await;
    let tenant_b = SurrealTenantRepository::new(db.clone())
        .create(CreateTenant {
            name: "Other Clinic".into(),
            status: None,
            subscription: None,
        })
        .await
        .unwrap()
        .id;
    let repo = SurrealUserRepository::new(db);

    repo.create(new_user("dave", UserRole::Dietitian, Some(tenant_a)))
        .await
        .unwrap();

    // Same username in a different tenant must still be rejected:
    // usernames are login identifiers, global by design.
    let mut dup = new_user("dave", UserRole::Dietitian, Some(tenant_b));
    dup.email = "dave2@example.com".into();
    let err = repo.create(dup).await.unwrap_err();
    assert!(matches!(err, DietlyError::AlreadyExists { .. }));
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    repo.create(new_user("erin", UserRole::Patient, Some(tenant_id)))
        .await
        .unwrap();

    let mut dup = new_user("erin2", UserRole::Patient, Some(tenant_id));
    dup.email = "erin@example.com".into();
    let err = repo.create(dup).await.unwrap_err();
    assert!(matches!(err, DietlyError::AlreadyExists { .. }));
}

#[tokio::test]
async fn super_admin_has_no_tenant() {
    let (db, _) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let admin = repo
        .create(new_user("root-admin", UserRole::SuperAdmin, None))
        .await
        .unwrap();

    assert_eq!(admin.tenant_id, None);
    let fetched = repo.get_by_id(admin.id).await.unwrap();
    assert_eq!(fetched.tenant_id, None);
}

#[tokio::test]
async fn scoped_lookup_hides_other_tenants() {
    let (db, tenant_a) = setup().await;
    let tenant_b = SurrealTenantRepository::new(db.clone())
        .create(CreateTenant {
            name: "Other Clinic".into(),
            status: None,
            subscription: None,
        })
        .await
        .unwrap()
        .id;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(new_user("frank", UserRole::Patient, Some(tenant_a)))
        .await
        .unwrap();

    // Own tenant sees the user.
    assert!(repo.get_scoped(tenant_a, user.id).await.is_ok());

    // Another tenant gets NotFound — not a different error that would
    // reveal the user exists.
    let err = repo.get_scoped(tenant_b, user.id).await.unwrap_err();
    assert!(matches!(err, DietlyError::NotFound { .. }));
}

#[tokio::test]
async fn update_is_a_partial_patch_and_rehashes_password() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(new_user("grace", UserRole::Dietitian, Some(tenant_id)))
        .await
        .unwrap();

    let updated = repo
        .update(
            user.id,
            UpdateUser {
                name: Some("Grace Renamed".into()),
                password: Some("new-password".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Grace Renamed");
    assert_eq!(updated.email, user.email); // unchanged
    assert_eq!(updated.username, user.username); // unchanged
    assert_ne!(updated.password_hash, user.password_hash);
    assert!(updated.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn delete_removes_the_user() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(new_user("henry", UserRole::Patient, Some(tenant_id)))
        .await
        .unwrap();

    repo.delete(user.id).await.unwrap();

    let err = repo.get_by_id(user.id).await.unwrap_err();
    assert!(matches!(err, DietlyError::NotFound { .. }));
}

#[tokio::test]
async fn list_by_tenant_filters_by_role() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    for i in 0..3 {
        repo.create(new_user(
            &format!("dietitian-{i}"),
            UserRole::Dietitian,
            Some(tenant_id),
        ))
        .await
        .unwrap();
    }
    for i in 0..2 {
        repo.create(new_user(
            &format!("patient-{i}"),
            UserRole::Patient,
            Some(tenant_id),
        ))
        .await
        .unwrap();
    }

    let all = repo
        .list_by_tenant(tenant_id, None, Pagination::default())
        .await
        .unwrap();
    assert_eq!(all.total, 5);

    let dietitians = repo
        .list_by_tenant(tenant_id, Some(UserRole::Dietitian), Pagination::default())
        .await
        .unwrap();
    assert_eq!(dietitians.total, 3);
    assert!(
        dietitians
            .items
            .iter()
            .all(|u| u.role == UserRole::Dietitian)
    );
}
