//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// Account management commands
#[derive(Parser, Debug)]
#[command(name = "accounts")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run database migrations
    Migrate(MigrateArgs),

    /// Create an account with staff and superuser privileges
    Createsuperuser(CreateAccountArgs),

    /// Create a regular account
    Createuser(CreateAccountArgs),

    /// Print the effective settings and check the database connection
    Check,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments shared by the account creation commands
#[derive(Parser, Debug, Clone)]
pub struct CreateAccountArgs {
    /// Login email address
    #[arg(long, env = "ACCOUNT_EMAIL")]
    pub email: String,

    /// Plain text password
    #[arg(long, env = "ACCOUNT_PASSWORD", hide_env_values = true, conflicts_with = "no_password")]
    pub password: Option<String>,

    /// Store an unusable password (the account cannot log in with a password)
    #[arg(long)]
    pub no_password: bool,

    #[arg(long, default_value = "")]
    pub first_name: String,

    #[arg(long, default_value = "")]
    pub last_name: String,

    /// Skip the password strength checks
    #[arg(long)]
    pub skip_password_validation: bool,
}

/// Which creation path a command uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Regular,
    Superuser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_createsuperuser() {
        let cli = Cli::try_parse_from([
            "accounts",
            "createsuperuser",
            "--email",
            "admin@example.com",
            "--password",
            "s3cure-enough",
        ])
        .unwrap();

        match cli.command {
            Commands::Createsuperuser(args) => {
                assert_eq!(args.email, "admin@example.com");
                assert_eq!(args.password.as_deref(), Some("s3cure-enough"));
                assert!(!args.no_password);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_password_conflicts_with_no_password() {
        let result = Cli::try_parse_from([
            "accounts",
            "createuser",
            "--email",
            "a@example.com",
            "--password",
            "x",
            "--no-password",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_help_does_not_need_settings() {
        let err = Cli::try_parse_from(["accounts", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_parse_migrate() {
        let cli = Cli::try_parse_from(["accounts", "migrate", "status"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Migrate(MigrateArgs { action: MigrateAction::Status })
        ));
    }
}
