//! Service layer - account use cases.

mod account_manager;

pub use account_manager::{AccountManager, AccountService};
