//! Account manager - the only path that creates user records.
//!
//! Validation happens in `domain::NewUser` before anything reaches the
//! repository, so a rejected call never leaves a partial record behind.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;

use common::{AppResult, OptionExt};
use domain::{normalize_email, DomainError, ExtraFields, NewUser, Password, User};

use crate::repository::UserRepository;

/// Hash checked when the email is unknown, so a miss costs as much as a wrong password.
static DUMMY_HASH: Lazy<String> = Lazy::new(|| {
    Password::new("timing-equalizer")
        .map(Password::into_string)
        .unwrap_or_default()
});

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create a regular account. `None` as password stores an unusable one.
    async fn create_user(
        &self,
        email: Option<&str>,
        password: Option<&str>,
        extra: ExtraFields,
    ) -> AppResult<User>;

    /// Create an account holding both `is_staff` and `is_superuser`.
    async fn create_superuser(
        &self,
        email: Option<&str>,
        password: Option<&str>,
        extra: ExtraFields,
    ) -> AppResult<User>;

    /// Look an account up by its login identifier.
    async fn get_by_natural_key(&self, email: &str) -> AppResult<User>;

    /// Return the account if the credentials match and it may log in.
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User>;

    /// Replace an account's password.
    async fn set_password(&self, id: i32, password: &str) -> AppResult<User>;
}

/// Concrete implementation of AccountService using a repository.
pub struct AccountManager {
    repo: Arc<dyn UserRepository>,
}

impl AccountManager {
    /// Create new account manager with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    async fn persist(&self, new_user: NewUser) -> AppResult<User> {
        let user = self.repo.create(new_user).await?;
        tracing::info!(
            user_id = user.id,
            is_staff = user.is_staff,
            is_superuser = user.is_superuser,
            "Account created"
        );
        Ok(user)
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn create_user(
        &self,
        email: Option<&str>,
        password: Option<&str>,
        extra: ExtraFields,
    ) -> AppResult<User> {
        let new_user = NewUser::regular(email, password, extra)?;
        self.persist(new_user).await
    }

    async fn create_superuser(
        &self,
        email: Option<&str>,
        password: Option<&str>,
        extra: ExtraFields,
    ) -> AppResult<User> {
        let new_user = NewUser::superuser(email, password, extra)?;
        self.persist(new_user).await
    }

    async fn get_by_natural_key(&self, email: &str) -> AppResult<User> {
        self.repo
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_not_found("User")
    }

    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let found = self.repo.find_by_email(&normalize_email(email)).await?;

        let stored = match &found {
            Some(user) => Password::from_hash(user.password.clone()),
            None => Password::from_hash(DUMMY_HASH.as_str().to_string()),
        };
        let password_valid = stored.verify(password);

        match found {
            Some(user) if password_valid && user.is_active => {
                tracing::debug!(user_id = user.id, "Authentication succeeded");
                self.repo.touch_last_login(user.id).await
            }
            _ => {
                tracing::debug!("Authentication failed");
                Err(DomainError::InvalidCredentials.into())
            }
        }
    }

    async fn set_password(&self, id: i32, password: &str) -> AppResult<User> {
        let hash = Password::new(password)?.into_string();
        self.repo.update_password(id, hash).await
    }
}
