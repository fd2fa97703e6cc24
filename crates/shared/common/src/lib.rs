//! Common utilities shared by the account service and its tooling.
//!
//! This crate provides:
//! - Unified application error type
//! - Environment-driven settings

pub mod error;
pub mod settings;

pub use error::{AppError, AppResult, OptionExt};
pub use settings::{DatabaseSettings, EnvSource, ProcessEnv, SecuritySettings, Settings};
