//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{FIELD_IS_STAFF, FIELD_IS_SUPERUSER, USERNAME_FIELD};
use crate::email::normalize_email;
use crate::error::{DomainError, DomainResult};
use crate::password::Password;

/// User domain entity, identified by email.
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    /// Stored password hash (never serialized)
    #[serde(skip_serializing, default)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("is_staff", &self.is_staff)
            .field("is_superuser", &self.is_superuser)
            .field("is_active", &self.is_active)
            .field("date_joined", &self.date_joined)
            .field("last_login", &self.last_login)
            .finish()
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.email)
    }
}

impl User {
    /// First and last name separated by a space, trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn short_name(&self) -> &str {
        &self.first_name
    }

    /// Value of the login identifier field.
    pub fn username(&self) -> &str {
        &self.email
    }

    pub fn has_usable_password(&self) -> bool {
        self.stored_password().is_usable()
    }

    /// Check a plain text password against the stored hash.
    pub fn check_password(&self, raw: &str) -> bool {
        self.stored_password().verify(raw)
    }

    /// Replace the stored hash with a hash of `raw`.
    pub fn set_password(&mut self, raw: &str) -> DomainResult<()> {
        self.password = Password::new(raw)?.into_string();
        Ok(())
    }

    pub fn set_unusable_password(&mut self) {
        self.password = Password::unusable().into_string();
    }

    /// Active superusers hold every permission. Finer-grained permissions
    /// are resolved by the hosting application.
    pub fn has_perm(&self, _perm: &str) -> bool {
        self.is_active && self.is_superuser
    }

    /// Whether the account may enter the admin site.
    pub fn can_access_admin(&self) -> bool {
        self.is_active && self.is_staff
    }

    fn stored_password(&self) -> Password {
        Password::from_hash(self.password.clone())
    }
}

/// Optional fields accepted by the creation operations.
///
/// `None` means "not supplied": the operation picks its own default.
/// `Some(false)` for a privilege flag is an explicit choice and is honoured
/// or rejected, never silently replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub is_active: Option<bool>,
}

impl ExtraFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn is_staff(mut self, is_staff: bool) -> Self {
        self.is_staff = Some(is_staff);
        self
    }

    pub fn is_superuser(mut self, is_superuser: bool) -> Self {
        self.is_superuser = Some(is_superuser);
        self
    }

    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}

/// A validated account ready to be persisted.
///
/// Only obtainable through [`NewUser::regular`] or [`NewUser::superuser`], so
/// every value of this type already satisfies the creation invariants: the
/// email is non-empty and normalized, the password is hashed, and a superuser
/// carries both privilege flags.
#[derive(Debug, Clone)]
pub struct NewUser {
    email: String,
    password: Password,
    first_name: String,
    last_name: String,
    is_staff: bool,
    is_superuser: bool,
    is_active: bool,
}

impl NewUser {
    /// Build a regular account. Privilege flags default to `false`.
    pub fn regular(
        email: Option<&str>,
        password: Option<&str>,
        extra: ExtraFields,
    ) -> DomainResult<Self> {
        let is_staff = extra.is_staff.unwrap_or(false);
        let is_superuser = extra.is_superuser.unwrap_or(false);
        Self::build(email, password, extra, is_staff, is_superuser)
    }

    /// Build a superuser. Privilege flags default to `true`, and an explicit
    /// `false` for either one is rejected.
    pub fn superuser(
        email: Option<&str>,
        password: Option<&str>,
        extra: ExtraFields,
    ) -> DomainResult<Self> {
        let is_staff = extra.is_staff.unwrap_or(true);
        let is_superuser = extra.is_superuser.unwrap_or(true);

        if !is_staff {
            return Err(DomainError::PrivilegeInvariant(FIELD_IS_STAFF));
        }
        if !is_superuser {
            return Err(DomainError::PrivilegeInvariant(FIELD_IS_SUPERUSER));
        }

        Self::build(email, password, extra, is_staff, is_superuser)
    }

    fn build(
        email: Option<&str>,
        password: Option<&str>,
        extra: ExtraFields,
        is_staff: bool,
        is_superuser: bool,
    ) -> DomainResult<Self> {
        let email = match email {
            Some(email) if !email.is_empty() => normalize_email(email),
            _ => return Err(DomainError::MissingField(USERNAME_FIELD)),
        };

        Ok(Self {
            email,
            password: Password::from_option(password)?,
            first_name: extra.first_name.unwrap_or_default(),
            last_name: extra.last_name.unwrap_or_default(),
            is_staff,
            is_superuser,
            is_active: extra.is_active.unwrap_or(true),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &Password {
        &self.password
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn is_staff(&self) -> bool {
        self.is_staff
    }

    pub fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Materialize the entity once the store has assigned an id.
    pub fn into_user(self, id: i32, date_joined: DateTime<Utc>) -> User {
        User {
            id,
            email: self.email,
            password: self.password.into_string(),
            first_name: self.first_name,
            last_name: self.last_name,
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
            is_active: self.is_active,
            date_joined,
            last_login: None,
        }
    }
}
