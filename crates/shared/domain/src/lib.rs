//! Domain layer - account entity, creation rules and password handling.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.

pub mod constants;
pub mod email;
pub mod error;
pub mod password;
pub mod password_validation;
pub mod user;

pub use constants::*;
pub use email::normalize_email;
pub use error::{DomainError, DomainResult};
pub use password::Password;
pub use password_validation::{PasswordPolicy, PasswordValidator, UserAttributes};
pub use user::{ExtraFields, NewUser, User};
