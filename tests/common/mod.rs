use anyhow::{Context, Result};
use simple_notes_api::config::DatabaseConfig;
use simple_notes_api::database::manager;
use sqlx::PgPool;

/// Connect to `DATABASE_URL` and migrate, or `None` when no database is configured.
pub async fn test_pool() -> Result<Option<PgPool>> {
    let _ = dotenvy::dotenv();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping Postgres test");
        return Ok(None);
    };

    let config = DatabaseConfig {
        url: Some(url),
        max_connections: 2,
        connection_timeout_secs: 10,
        run_migrations: true,
    };
    let pool = manager::connect_and_migrate(&config)
        .await
        .context("failed to connect to test database")?;
    Ok(Some(pool))
}

/// Owner name unique to one test run, so tests never see each other's rows.
pub fn unique_owner(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
}
