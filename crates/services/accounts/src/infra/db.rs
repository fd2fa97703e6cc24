//! Database connection and initialization.

use std::collections::HashSet;

use common::DatabaseSettings;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr,
    EntityTrait, QueryOrder, Statement,
};
use sea_orm_migration::{seaql_migrations, MigrationName, MigratorTrait, SchemaManager};

use super::migrations::Migrator;

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open the pool and apply pending migrations.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, DbErr> {
        let db = Self::connect_without_migrations(settings).await?;

        Migrator::up(&db.connection, None).await?;
        tracing::info!("Database connected and migrations applied");

        Ok(db)
    }

    /// Open the pool only (for migration commands).
    pub async fn connect_without_migrations(settings: &DatabaseSettings) -> Result<Self, DbErr> {
        let connection = SeaDatabase::connect(Self::options(settings)).await?;
        Ok(Self { connection })
    }

    fn options(settings: &DatabaseSettings) -> ConnectOptions {
        let mut options = ConnectOptions::new(settings.url.clone());
        options
            .max_connections(settings.max_connections)
            .sqlx_logging(false);
        // Zero leaves the driver's default connection lifetime in place
        if settings.conn_max_age_secs > 0 {
            options.max_lifetime(settings.conn_max_age());
        }
        options
    }

    /// Get a reference to the database connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    /// Get a clone of the database connection.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Run pending migrations.
    pub async fn run_migrations(&self) -> Result<(), DbErr> {
        Migrator::up(&self.connection, None).await
    }

    /// Rollback the last migration.
    pub async fn rollback_migration(&self) -> Result<(), DbErr> {
        Migrator::down(&self.connection, Some(1)).await
    }

    /// List all migrations with their applied status.
    pub async fn migration_status(&self) -> Result<Vec<(String, bool)>, DbErr> {
        // The bookkeeping table only exists once a migration has run
        let manager = SchemaManager::new(&self.connection);
        let applied: HashSet<String> = if manager.has_table("seaql_migrations").await? {
            seaql_migrations::Entity::find()
                .order_by_asc(seaql_migrations::Column::Version)
                .all(&self.connection)
                .await?
                .into_iter()
                .map(|m| m.version)
                .collect()
        } else {
            HashSet::new()
        };

        Ok(Migrator::migrations()
            .iter()
            .map(|m| {
                let name = m.name().to_string();
                let is_applied = applied.contains(&name);
                (name, is_applied)
            })
            .collect())
    }

    /// Reset database and run all migrations fresh.
    pub async fn fresh_migrations(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn settings(conn_max_age_secs: u64) -> DatabaseSettings {
        DatabaseSettings {
            url: "sqlite::memory:".to_string(),
            conn_max_age_secs,
            max_connections: 5,
        }
    }

    #[test]
    fn test_conn_max_age_bounds_lifetime() {
        let options = Database::options(&settings(600));
        assert_eq!(options.get_max_lifetime(), Some(Duration::from_secs(600)));
        assert_eq!(options.get_max_connections(), Some(5));
    }

    #[test]
    fn test_zero_conn_max_age_leaves_lifetime_unset() {
        let options = Database::options(&settings(0));
        assert_eq!(options.get_max_lifetime(), None);
    }
}
