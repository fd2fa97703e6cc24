//! Command-line interface.

pub mod args;

pub use args::{AccountKind, Cli, Commands, CreateAccountArgs, MigrateAction, MigrateArgs};
