//! Management command implementations.

pub mod check;
pub mod create_account;
pub mod migrate;
