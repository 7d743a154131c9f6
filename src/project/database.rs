/// SQLite bootstrap for budget storage
///
/// Opens the single application database and makes sure the schema exists:
/// - projects: name, unique slug, budget
/// - categories: per-project expense categories
/// - expenses: amounts recorded against a project category

use crate::config::DatabaseConfig;
use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Open (creating if missing) the configured database file and initialize its schema
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool> {
    std::fs::create_dir_all(&config.data_dir)
        .map_err(|e| anyhow::anyhow!("Failed to create data directory '{}': {}", config.data_dir, e))?;
    let db_path = config.database_path();

    tracing::info!("🗄️ Opening budget database: {}", db_path.display());

    let options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open database '{}': {}", db_path.display(), e))?;

    init_schema(&pool).await?;

    tracing::info!("✅ Budget database ready: {}", db_path.display());

    Ok(pool)
}

/// Single-connection in-memory database with the schema applied
///
/// The pool never recycles its connection, otherwise the database would vanish.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;

    Ok(pool)
}

/// Create tables and indexes. Safe to call multiple times.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            budget TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            UNIQUE (project_id, name)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Amounts are decimal strings; ordering happens after parsing
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS expenses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            amount TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_categories_project ON categories(project_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_expenses_project ON expenses(project_id)")
        .execute(pool)
        .await?;

    Ok(())
}
