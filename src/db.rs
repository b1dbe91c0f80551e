use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub type DbPool = sqlx::SqlitePool;

pub const MIGRATIONS: &str = include_str!("schema.sql");

/// Open (creating if necessary) the SQLite database behind a connection pool.
pub async fn init_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await
}

pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(MIGRATIONS).execute(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}
