//! Check command - show effective settings and ping the database.

use common::{AppError, AppResult, Settings};

use crate::infra::Database;

/// Execute the check command
pub async fn execute(settings: &Settings) -> AppResult<()> {
    let rendered = serde_json::to_string_pretty(settings)
        .map_err(|e| AppError::internal(format!("Settings serialization failed: {}", e)))?;
    println!("{}", rendered);

    if settings.uses_insecure_secret_key() && !settings.debug {
        tracing::warn!("DJANGO_SECRET_KEY is the insecure default while DJANGO_DEBUG is off");
    }
    if !settings.debug && settings.allowed_hosts.is_empty() {
        tracing::warn!("DJANGO_ALLOWED_HOSTS is empty while DJANGO_DEBUG is off");
    }

    let db = Database::connect_without_migrations(&settings.database).await?;
    db.ping().await?;

    let pending: Vec<String> = db
        .migration_status()
        .await?
        .into_iter()
        .filter(|(_, applied)| !applied)
        .map(|(name, _)| name)
        .collect();

    if pending.is_empty() {
        println!("Database reachable, no pending migrations.");
    } else {
        println!("Database reachable, pending migrations: {}", pending.join(", "));
    }

    Ok(())
}
