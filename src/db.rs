use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::models::RepositoryResult;

/// Opens a connection pool against the configured Postgres instance.
pub async fn connect(config: &DatabaseConfig) -> RepositoryResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;

    info!(
        max_connections = config.max_connections,
        "Connected to database"
    );

    Ok(pool)
}

/// Applies any pending migrations from the bundled `migrations/` directory.
pub async fn migrate(pool: &PgPool) -> RepositoryResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(sqlx::Error::from)?;

    info!("Database migrations applied");

    Ok(())
}
