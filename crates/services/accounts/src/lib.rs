//! Account service library.
//!
//! Email-authenticated user accounts: the account manager, its SeaORM store
//! and the management commands that drive them.

pub mod cli;
pub mod commands;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use common::{AppResult, Settings};
use domain::PasswordPolicy;

use crate::cli::{AccountKind, Cli, Commands};
use crate::infra::Database;
use crate::repository::UserStore;
use crate::service::{AccountManager, AccountService};

/// Wire the account manager to a SeaORM store on `db`.
pub fn account_service(db: &Database) -> Arc<dyn AccountService> {
    let user_repo = Arc::new(UserStore::new(db.get_connection()));
    Arc::new(AccountManager::new(user_repo))
}

/// Dispatch a parsed command line.
pub async fn run(cli: Cli, settings: Settings) -> AppResult<()> {
    match cli.command {
        Commands::Migrate(args) => commands::migrate::execute(args.action, &settings).await,
        Commands::Createsuperuser(args) => {
            create_account(args, AccountKind::Superuser, &settings).await
        }
        Commands::Createuser(args) => {
            create_account(args, AccountKind::Regular, &settings).await
        }
        Commands::Check => commands::check::execute(&settings).await,
    }
}

async fn create_account(
    args: cli::CreateAccountArgs,
    kind: AccountKind,
    settings: &Settings,
) -> AppResult<()> {
    let db = Database::connect(&settings.database).await?;
    let service = account_service(&db);
    commands::create_account::execute(args, kind, service.as_ref(), &PasswordPolicy::default())
        .await?;
    Ok(())
}
