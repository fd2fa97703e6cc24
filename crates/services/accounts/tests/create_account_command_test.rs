//! Management command tests.

mod support;

use accounts_lib::cli::{AccountKind, CreateAccountArgs};
use accounts_lib::commands::create_account;
use common::AppError;
use domain::{DomainError, PasswordPolicy};

use support::setup_store;

fn args(email: &str, password: Option<&str>) -> CreateAccountArgs {
    CreateAccountArgs {
        email: email.to_string(),
        password: password.map(str::to_string),
        no_password: false,
        first_name: String::new(),
        last_name: String::new(),
        skip_password_validation: false,
    }
}

#[tokio::test]
async fn test_createsuperuser() {
    let store = setup_store().await;
    let policy = PasswordPolicy::default();

    let user = create_account::execute(
        args("admin@example.com", Some("c0rrect-h0rse-battery")),
        AccountKind::Superuser,
        store.service.as_ref(),
        &policy,
    )
    .await
    .unwrap();

    assert!(user.is_staff);
    assert!(user.is_superuser);
    assert!(user.check_password("c0rrect-h0rse-battery"));
}

#[tokio::test]
async fn test_createuser_rejects_weak_password() {
    let store = setup_store().await;
    let policy = PasswordPolicy::default();

    let err = create_account::execute(
        args("user@example.com", Some("12345")),
        AccountKind::Regular,
        store.service.as_ref(),
        &policy,
    )
    .await
    .unwrap_err();

    match err {
        AppError::Domain(DomainError::Password(message)) => {
            assert!(message.contains("too short"));
            assert!(message.contains("entirely numeric"));
        }
        other => panic!("expected password error, got {:?}", other),
    }
    assert_eq!(store.repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_createuser_skip_password_validation() {
    let store = setup_store().await;
    let policy = PasswordPolicy::default();

    let mut weak = args("user@example.com", Some("password"));
    weak.skip_password_validation = true;

    let user = create_account::execute(weak, AccountKind::Regular, store.service.as_ref(), &policy)
        .await
        .unwrap();

    assert!(!user.is_staff);
    assert!(user.check_password("password"));
}

#[tokio::test]
async fn test_createuser_rejects_invalid_email() {
    let store = setup_store().await;
    let policy = PasswordPolicy::default();

    let err = create_account::execute(
        args("not-an-email", Some("c0rrect-h0rse-battery")),
        AccountKind::Regular,
        store.service.as_ref(),
        &policy,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(store.repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_createuser_requires_password_or_opt_out() {
    let store = setup_store().await;
    let policy = PasswordPolicy::default();

    let err = create_account::execute(
        args("user@example.com", None),
        AccountKind::Regular,
        store.service.as_ref(),
        &policy,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let mut no_password = args("user@example.com", None);
    no_password.no_password = true;
    let user = create_account::execute(
        no_password,
        AccountKind::Regular,
        store.service.as_ref(),
        &policy,
    )
    .await
    .unwrap();
    assert!(!user.has_usable_password());
}

#[tokio::test]
async fn test_createuser_password_similar_to_email() {
    let store = setup_store().await;
    let policy = PasswordPolicy::default();

    let err = create_account::execute(
        args("margaretha@example.com", Some("Margaretha")),
        AccountKind::Regular,
        store.service.as_ref(),
        &policy,
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("too similar to the email address"));
}
