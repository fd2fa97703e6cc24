//! User repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{AppError, AppResult, OptionExt};
use domain::{DomainError, NewUser, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Find user by exact (already normalized) email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a validated account. A duplicate email yields `DomainError::Conflict`.
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// Replace the stored password hash
    async fn update_password(&self, id: i32, password_hash: String) -> AppResult<User>;

    /// Grant or revoke privilege flags
    async fn update_privileges(&self, id: i32, is_staff: bool, is_superuser: bool)
        -> AppResult<User>;

    /// Enable or disable login
    async fn set_active(&self, id: i32, is_active: bool) -> AppResult<User>;

    /// Stamp the current time as the last successful login
    async fn touch_last_login(&self, id: i32) -> AppResult<User>;

    /// Delete user by ID
    async fn delete(&self, id: i32) -> AppResult<()>;

    /// List all users ordered by ID
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Number of stored users
    async fn count(&self) -> AppResult<u64>;
}

/// SeaORM-backed implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: i32) -> AppResult<user::Model> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("User")
    }

    async fn save(&self, active: ActiveModel) -> AppResult<User> {
        let model = active.update(&self.db).await.map_err(map_write_error)?;
        Ok(User::from(model))
    }
}

/// Unique-constraint violations become a domain conflict; everything else passes through.
fn map_write_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!(%detail, "Unique constraint violated");
            DomainError::conflict("Email").into()
        }
        _ => AppError::from(err),
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let active_model = ActiveModel {
            email: Set(new_user.email().to_string()),
            password: Set(new_user.password().as_str().to_string()),
            first_name: Set(new_user.first_name().to_string()),
            last_name: Set(new_user.last_name().to_string()),
            is_staff: Set(new_user.is_staff()),
            is_superuser: Set(new_user.is_superuser()),
            is_active: Set(new_user.is_active()),
            date_joined: Set(Utc::now()),
            last_login: Set(None),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(map_write_error)?;
        Ok(User::from(model))
    }

    async fn update_password(&self, id: i32, password_hash: String) -> AppResult<User> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.password = Set(password_hash);
        self.save(active).await
    }

    async fn update_privileges(
        &self,
        id: i32,
        is_staff: bool,
        is_superuser: bool,
    ) -> AppResult<User> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.is_staff = Set(is_staff);
        active.is_superuser = Set(is_superuser);
        self.save(active).await
    }

    async fn set_active(&self, id: i32, is_active: bool) -> AppResult<User> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.is_active = Set(is_active);
        self.save(active).await
    }

    async fn touch_last_login(&self, id: i32) -> AppResult<User> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.last_login = Set(Some(Utc::now()));
        self.save(active).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("User").into());
        }

        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(UserEntity::find().count(&self.db).await?)
    }
}
