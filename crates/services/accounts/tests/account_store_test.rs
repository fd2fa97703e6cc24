//! Account manager tests against a real (in-memory SQLite) store.

mod support;

use accounts_lib::infra::Database;
use common::{AppError, DatabaseSettings};
use domain::{DomainError, ExtraFields};

use support::{build_user, setup_store};

fn domain_error(err: AppError) -> DomainError {
    match err {
        AppError::Domain(err) => err,
        other => panic!("expected domain error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_user() {
    let store = setup_store().await;

    store
        .service
        .create_user(Some("test@example.com"), Some("password"), ExtraFields::new())
        .await
        .unwrap();

    let users = store.repo.list().await.unwrap();
    assert_eq!(users.len(), 1);

    let user = &users[0];
    assert_eq!(user.email, "test@example.com");
    assert!(!user.is_staff);
    assert!(!user.is_superuser);
    assert!(user.is_active);
    assert!(user.last_login.is_none());
    assert!(user.check_password("password"));
    assert_ne!(user.password, "password");
}

#[tokio::test]
async fn test_create_user_no_email() {
    let store = setup_store().await;

    let err = store
        .service
        .create_user(None, Some("password"), ExtraFields::new())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "The given email must be set");
    assert_eq!(store.repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_superuser() {
    let store = setup_store().await;

    store
        .service
        .create_superuser(Some("test@example.com"), Some("password"), ExtraFields::new())
        .await
        .unwrap();

    let user = store.service.get_by_natural_key("test@example.com").await.unwrap();
    assert_eq!(user.email, "test@example.com");
    assert!(user.is_staff);
    assert!(user.is_superuser);
    assert!(user.check_password("password"));
}

#[tokio::test]
async fn test_create_superuser_is_staff_false() {
    let store = setup_store().await;

    let err = store
        .service
        .create_superuser(
            Some("test@example.com"),
            Some("password"),
            ExtraFields::new().is_staff(false),
        )
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Superuser must have is_staff=True.");
    assert_eq!(store.repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_superuser_is_superuser_false() {
    let store = setup_store().await;

    let err = store
        .service
        .create_superuser(
            Some("test@example.com"),
            Some("password"),
            ExtraFields::new().is_superuser(false),
        )
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Superuser must have is_superuser=True.");
    assert_eq!(store.repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_email_rejected_by_store() {
    let store = setup_store().await;

    store
        .service
        .create_user(Some("test@example.com"), Some("password"), ExtraFields::new())
        .await
        .unwrap();

    // Domain case differs but normalizes to the same address
    let err = store
        .service
        .create_user(Some("test@EXAMPLE.com"), Some("other"), ExtraFields::new())
        .await
        .unwrap_err();

    assert_eq!(domain_error(err), DomainError::Conflict("Email".to_string()));
    assert_eq!(store.repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_padded_duplicate_email_rejected() {
    let store = setup_store().await;

    store
        .service
        .create_user(Some("test@example.com"), Some("password"), ExtraFields::new())
        .await
        .unwrap();

    let err = store
        .service
        .create_user(Some(" test@example.com\n"), Some("other"), ExtraFields::new())
        .await
        .unwrap_err();

    assert_eq!(domain_error(err), DomainError::Conflict("Email".to_string()));
    assert_eq!(store.repo.count().await.unwrap(), 1);

    let user = store
        .service
        .get_by_natural_key("  test@example.com ")
        .await
        .unwrap();
    assert_eq!(user.email, "test@example.com");
}

#[tokio::test]
async fn test_local_part_case_is_significant() {
    let store = setup_store().await;

    for email in ["jane@example.com", "Jane@example.com"] {
        store
            .service
            .create_user(Some(email), None, ExtraFields::new())
            .await
            .unwrap();
    }

    assert_eq!(store.repo.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_extra_fields_persisted() {
    let store = setup_store().await;

    let created = store
        .service
        .create_user(
            Some("ada@example.com"),
            None,
            ExtraFields::new()
                .first_name("Ada")
                .last_name("Lovelace")
                .is_active(false),
        )
        .await
        .unwrap();

    let user = store.repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(user.full_name(), "Ada Lovelace");
    assert!(!user.is_active);
    assert!(!user.has_usable_password());
}

#[tokio::test]
async fn test_authenticate() {
    let store = setup_store().await;

    store
        .service
        .create_user(Some("test@example.com"), Some("password"), ExtraFields::new())
        .await
        .unwrap();

    let user = store
        .service
        .authenticate("test@EXAMPLE.COM", "password")
        .await
        .unwrap();
    assert!(user.last_login.is_some());

    let err = store
        .service
        .authenticate("test@example.com", "wrong")
        .await
        .unwrap_err();
    assert_eq!(domain_error(err), DomainError::InvalidCredentials);

    let err = store
        .service
        .authenticate("missing@example.com", "password")
        .await
        .unwrap_err();
    assert_eq!(domain_error(err), DomainError::InvalidCredentials);
}

#[tokio::test]
async fn test_deactivated_account_cannot_authenticate() {
    let store = setup_store().await;

    let user = store
        .service
        .create_user(Some("test@example.com"), Some("password"), ExtraFields::new())
        .await
        .unwrap();
    store.repo.set_active(user.id, false).await.unwrap();

    let err = store
        .service
        .authenticate("test@example.com", "password")
        .await
        .unwrap_err();
    assert_eq!(domain_error(err), DomainError::InvalidCredentials);
}

#[tokio::test]
async fn test_set_password() {
    let store = setup_store().await;

    let user = store
        .service
        .create_user(Some("test@example.com"), None, ExtraFields::new())
        .await
        .unwrap();
    assert!(!user.has_usable_password());

    store.service.set_password(user.id, "n3w-s3cret").await.unwrap();

    let user = store.service.authenticate("test@example.com", "n3w-s3cret").await.unwrap();
    assert!(user.has_usable_password());
}

#[tokio::test]
async fn test_privilege_grant_and_delete() {
    let store = setup_store().await;

    let user = store
        .service
        .create_user(Some("staff@example.com"), None, ExtraFields::new())
        .await
        .unwrap();

    let user = store.repo.update_privileges(user.id, true, false).await.unwrap();
    assert!(user.is_staff);
    assert!(!user.is_superuser);

    store.repo.delete(user.id).await.unwrap();
    assert!(store.repo.find_by_id(user.id).await.unwrap().is_none());

    let err = store.repo.delete(user.id).await.unwrap_err();
    assert!(matches!(domain_error(err), DomainError::NotFound(_)));
}

#[tokio::test]
async fn test_migrations_applied() {
    let store = setup_store().await;

    store.db.ping().await.unwrap();
    let status = store.db.migration_status().await.unwrap();
    assert!(!status.is_empty());
    assert!(status.iter().all(|(_, applied)| *applied));
}

#[tokio::test]
async fn test_migration_status_before_first_migration() {
    let settings = DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        conn_max_age_secs: 0,
        max_connections: 1,
    };
    let db = Database::connect_without_migrations(&settings).await.unwrap();

    let status = db.migration_status().await.unwrap();
    assert!(!status.is_empty());
    assert!(status.iter().all(|(_, applied)| !*applied));

    db.run_migrations().await.unwrap();
    let status = db.migration_status().await.unwrap();
    assert!(status.iter().all(|(_, applied)| *applied));
}

#[test]
fn test_display_is_email() {
    let user = build_user("test@example.com");
    assert_eq!(user.to_string(), "test@example.com");
}
