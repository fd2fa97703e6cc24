//! Shared fixtures for integration tests.

use std::sync::Arc;

use chrono::Utc;

use accounts_lib::infra::Database;
use accounts_lib::repository::{UserRepository, UserStore};
use accounts_lib::service::{AccountManager, AccountService};
use common::DatabaseSettings;
use domain::{ExtraFields, NewUser, User};

/// In-memory store with the schema applied.
pub struct TestStore {
    #[allow(dead_code)]
    pub db: Database,
    pub repo: Arc<dyn UserRepository>,
    pub service: Arc<dyn AccountService>,
}

pub async fn setup_store() -> TestStore {
    // A single connection keeps every query on the same in-memory database
    let settings = DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        conn_max_age_secs: 0,
        max_connections: 1,
    };
    let db = Database::connect(&settings)
        .await
        .expect("Failed to open in-memory database");

    let repo: Arc<dyn UserRepository> = Arc::new(UserStore::new(db.get_connection()));
    let service: Arc<dyn AccountService> = Arc::new(AccountManager::new(repo.clone()));

    TestStore { db, repo, service }
}

/// Build an unsaved user, like a model factory's `build()`.
#[allow(dead_code)]
pub fn build_user(email: &str) -> User {
    NewUser::regular(Some(email), None, ExtraFields::new())
        .expect("valid factory email")
        .into_user(0, Utc::now())
}
