//! Integration tests for the profile repositories: transactional
//! create-with-user, cascade delete, and tenant-scoped lookups.

use chrono::NaiveDate;
use dietly_core::error::DietlyError;
use dietly_core::models::dietitian::{CreateDietitianProfile, UpdateDietitianProfile};
use dietly_core::models::patient::{CreatePatientProfile, Gender, UpdatePatientProfile};
use dietly_core::models::tenant::CreateTenant;
use dietly_core::models::user::{CreateUser, UserRole};
use dietly_core::repository::{
    DietitianProfileRepository, Pagination, PatientProfileRepository, TenantRepository,
    UserRepository,
};
use dietly_db::repository::{
    SurrealDietitianRepository, SurrealPatientRepository, SurrealTenantRepository,
    SurrealUserRepository,
};
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

fn new_account(username: &str, tenant_id: Option<Uuid>, role: UserRole) -> CreateUser {
    CreateUser {
        name: format!("User {username}"),
        email: format!("{username}@example.com"),
        username: username.into(),
        password: "initial-password".into(),
        role,
        tenant_id,
    }
}

fn patient_profile() -> CreatePatientProfile {
    CreatePatientProfile {
        date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
        gender: Gender::Female,
        height_cm: 168.0,
        weight_kg: 72.5,
        initial_weight_kg: Some(75.0),
        goal_weight_kg: Some(65.0),
        activity_level: Some("moderate".into()),
        medical_conditions: None,
        dietary_preferences: Some("vegetarian".into()),
    }
}

// -----------------------------------------------------------------------
// Dietitian profiles
// -----------------------------------------------------------------------

#[tokio::test]
async fn create_dietitian_with_user() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealDietitianRepository::new(db);

    let (user, profile) = repo
        .create_for_user(
            new_account("diet1", Some(tenant_id), UserRole::Dietitian),
            CreateDietitianProfile {
                specialization: "Sports nutrition".into(),
                years_of_experience: 7,
                bio: Some("Helps athletes eat better.".into()),
            },
        )
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::Dietitian);
    assert_eq!(user.tenant_id, Some(tenant_id));
    assert_eq!(profile.user_id, user.id);
    assert_eq!(profile.tenant_id, tenant_id);
    assert_eq!(profile.specialization, "Sports nutrition");
    assert_eq!(profile.years_of_experience, 7);
    assert_eq!(profile.bio.as_deref(), Some("Helps athletes eat better."));
}

#[tokio::test]
async fn dietitian_requires_a_tenant() {
    let (db, _) = setup().await;
    let repo = SurrealDietitianRepository::new(db);

    let err = repo
        .create_for_user(
            new_account("orphan", None, UserRole::Dietitian),
            CreateDietitianProfile {
                specialization: "General".into(),
                years_of_experience: 1,
                bio: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DietlyError::Validation { .. }));
}

#[tokio::test]
async fn update_dietitian_profile_merges_fields() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealDietitianRepository::new(db);

    let (user, _) = repo
        .create_for_user(
            new_account("diet2", Some(tenant_id), UserRole::Dietitian),
            CreateDietitianProfile {
                specialization: "General".into(),
                years_of_experience: 3,
                bio: None,
            },
        )
        .await
        .unwrap();

    let updated = repo
        .update_by_user_id(
            user.id,
            UpdateDietitianProfile {
                years_of_experience: Some(4),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.years_of_experience, 4);
    assert_eq!(updated.specialization, "General"); // unchanged
}

#[tokio::test]
async fn update_missing_dietitian_profile_is_not_found() {
    let (db, _) = setup().await;
    let repo = SurrealDietitianRepository::new(db);

    let err = repo
        .update_by_user_id(Uuid::new_v4(), UpdateDietitianProfile::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DietlyError::NotFound { .. }));
}

#[tokio::test]
async fn list_dietitians_joins_owning_users() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealDietitianRepository::new(db);

    for i in 0..2 {
        repo.create_for_user(
            new_account(&format!("diet-l{i}"), Some(tenant_id), UserRole::Dietitian),
            CreateDietitianProfile {
                specialization: "General".into(),
                years_of_experience: i,
                bio: None,
            },
        )
        .await
        .unwrap();
    }

    let page = repo
        .list_by_tenant(tenant_id, Pagination::default())
        .await
        .unwrap();

    assert_eq!(page.total, 2);
    for record in &page.items {
        assert_eq!(record.user.id, record.profile.user_id);
        assert_eq!(record.user.role, UserRole::Dietitian);
    }
}

// -----------------------------------------------------------------------
// Patient profiles
// -----------------------------------------------------------------------

#[tokio::test]
async fn create_patient_roundtrips_all_profile_fields() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealPatientRepository::new(db);

    let submitted = patient_profile();
    let (user, profile) = repo
        .create_for_user(
            new_account("pat1", Some(tenant_id), UserRole::Patient),
            submitted.clone(),
        )
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::Patient);

    // Lookup returns every submitted field unchanged.
    let fetched = repo
        .get_by_identifier(&profile.id.to_string(), Some(tenant_id))
        .await
        .unwrap();
    let p = &fetched.profile;
    assert_eq!(p.date_of_birth, submitted.date_of_birth);
    assert_eq!(p.gender, submitted.gender);
    assert_eq!(p.height_cm, submitted.height_cm);
    assert_eq!(p.weight_kg, submitted.weight_kg);
    assert_eq!(p.initial_weight_kg, submitted.initial_weight_kg);
    assert_eq!(p.goal_weight_kg, submitted.goal_weight_kg);
    assert_eq!(p.activity_level, submitted.activity_level);
    assert_eq!(p.medical_conditions, submitted.medical_conditions);
    assert_eq!(p.dietary_preferences, submitted.dietary_preferences);
    assert_eq!(fetched.user.id, user.id);
}

#[tokio::test]
async fn duplicate_username_commits_neither_row() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealPatientRepository::new(db);

    repo.create_for_user(
        new_account("taken", Some(tenant_id), UserRole::Patient),
        patient_profile(),
    )
    .await
    .unwrap();

    let mut dup = new_account("taken", Some(tenant_id), UserRole::Patient);
    dup.email = "other@example.com".into();
    let err = repo
        .create_for_user(dup, patient_profile())
        .await
        .unwrap_err();
    assert!(matches!(err, DietlyError::AlreadyExists { .. }));

    // The failed attempt must not leave an orphan profile behind.
    let page = repo
        .list_by_tenant(tenant_id, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn deleting_the_user_cascades_to_the_profile() {
    let (db, tenant_id) = setup().await;
    let patients = SurrealPatientRepository::new(db.clone());
    let users = SurrealUserRepository::new(db);

    let (user, _) = patients
        .create_for_user(
            new_account("gone", Some(tenant_id), UserRole::Patient),
            patient_profile(),
        )
        .await
        .unwrap();

    users.delete(user.id).await.unwrap();

    let user_err = users.get_by_id(user.id).await.unwrap_err();
    assert!(matches!(user_err, DietlyError::NotFound { .. }));

    let profile_err = patients.get_by_user_id(user.id).await.unwrap_err();
    assert!(matches!(profile_err, DietlyError::NotFound { .. }));
}

#[tokio::test]
async fn cross_tenant_lookup_is_not_found() {
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
    let repo = SurrealPatientRepository::new(db);

    let (_, profile) = repo
        .create_for_user(
            new_account("isolated", Some(tenant_a), UserRole::Patient),
            patient_profile(),
        )
        .await
        .unwrap();

    // By profile id, from the wrong tenant: NotFound.
    let err = repo
        .get_by_identifier(&profile.id.to_string(), Some(tenant_b))
        .await
        .unwrap_err();
    assert!(matches!(err, DietlyError::NotFound { .. }));

    // By username, from the wrong tenant: NotFound.
    let err = repo
        .get_by_identifier("isolated", Some(tenant_b))
        .await
        .unwrap_err();
    assert!(matches!(err, DietlyError::NotFound { .. }));

    // Unscoped (SuperAdmin path) still finds it.
    assert!(repo.get_by_identifier("isolated", None).await.is_ok());
}

#[tokio::test]
async fn get_by_identifier_accepts_username() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealPatientRepository::new(db);

    let (user, profile) = repo
        .create_for_user(
            new_account("by-name", Some(tenant_id), UserRole::Patient),
            patient_profile(),
        )
        .await
        .unwrap();

    let fetched = repo
        .get_by_identifier("by-name", Some(tenant_id))
        .await
        .unwrap();
    assert_eq!(fetched.profile.id, profile.id);
    assert_eq!(fetched.user.id, user.id);
}

#[tokio::test]
async fn update_patient_profile_merges_fields() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealPatientRepository::new(db);

    let (user, _) = repo
        .create_for_user(
            new_account("patch-me", Some(tenant_id), UserRole::Patient),
            patient_profile(),
        )
        .await
        .unwrap();

    let updated = repo
        .update_by_user_id(
            user.id,
            UpdatePatientProfile {
                weight_kg: Some(70.0),
                goal_weight_kg: Some(64.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.weight_kg, 70.0);
    assert_eq!(updated.goal_weight_kg, Some(64.0));
    // Untouched fields survive the patch.
    assert_eq!(updated.height_cm, 168.0);
    assert_eq!(updated.activity_level.as_deref(), Some("moderate"));
}

#[tokio::test]
async fn update_missing_patient_profile_is_not_found() {
    let (db, _) = setup().await;
    let repo = SurrealPatientRepository::new(db);

    let err = repo
        .update_by_user_id(Uuid::new_v4(), UpdatePatientProfile::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DietlyError::NotFound { .. }));
}

#[tokio::test]
async fn list_patients_is_tenant_scoped() {
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
    let repo = SurrealPatientRepository::new(db);

    for i in 0..3 {
        repo.create_for_user(
            new_account(&format!("a-pat{i}"), Some(tenant_a), UserRole::Patient),
            patient_profile(),
        )
        .await
        .unwrap();
    }
    repo.create_for_user(
        new_account("b-pat", Some(tenant_b), UserRole::Patient),
        patient_profile(),
    )
    .await
    .unwrap();

    let page_a = repo
        .list_by_tenant(tenant_a, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page_a.total, 3);
    assert!(
        page_a
            .items
            .iter()
            .all(|r| r.profile.tenant_id == tenant_a && r.user.tenant_id == Some(tenant_a))
    );

    let page_b = repo
        .list_by_tenant(tenant_b, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page_b.total, 1);
}
