use crate::error::StoreError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

const SCHEMA_META_TABLE: &str = "
CREATE TABLE IF NOT EXISTS taskforge_meta (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
)";
const SCHEMA_VERSION_KEY: &str = "schema_version";
pub const SCHEMA_VERSION: u32 = 1;

/// Open a pool on `url`, creating the database file if needed, and bring
/// the schema up to date.
pub async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool, StoreError> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(options)
        .await?;
    init_schema(&pool).await?;
    Ok(pool)
}

async fn ensure_schema_version(pool: &SqlitePool) -> Result<(), StoreError> {
    sqlx::query(SCHEMA_META_TABLE).execute(pool).await?;

    let stored: Option<(String,)> =
        sqlx::query_as("SELECT value FROM taskforge_meta WHERE key = $1")
            .bind(SCHEMA_VERSION_KEY)
            .fetch_optional(pool)
            .await?;

    if let Some((value,)) = stored {
        let parsed = value.parse::<u32>().map_err(|_| {
            StoreError::Migration(format!("invalid schema version value: {value}"))
        })?;
        if parsed != SCHEMA_VERSION {
            return Err(StoreError::Migration(format!(
                "incompatible schema version: stored={parsed}, expected={SCHEMA_VERSION}"
            )));
        }
        return Ok(());
    }

    sqlx::query("INSERT INTO taskforge_meta (key, value) VALUES ($1, $2)")
        .bind(SCHEMA_VERSION_KEY)
        .bind(SCHEMA_VERSION.to_string())
        .execute(pool)
        .await?;
    Ok(())
}

/// Create tables and indexes. Safe to run on every start.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), StoreError> {
    sqlx::query("PRAGMA foreign_keys = ON;").execute(pool).await?;

    ensure_schema_version(pool).await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             name TEXT NOT NULL,
             email TEXT NOT NULL UNIQUE,
             password_hash TEXT NOT NULL,
             created_at TEXT NOT NULL,
             updated_at TEXT NOT NULL
         )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS tasks (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             title TEXT NOT NULL,
             description TEXT NOT NULL DEFAULT '',
             status TEXT NOT NULL DEFAULT 'pending',
             priority TEXT NOT NULL DEFAULT 'medium',
             due_date TEXT,
             assigned_to INTEGER NOT NULL REFERENCES users(id),
             created_by INTEGER NOT NULL REFERENCES users(id),
             created_at TEXT NOT NULL,
             updated_at TEXT NOT NULL,
             deleted_at TEXT
         )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_tasks_assigned_to
             ON tasks(assigned_to, deleted_at)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_tasks_created_by
             ON tasks(created_by, deleted_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
