use anyhow::Result;
use sqlx::SqlitePool;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use std::{str::FromStr, time::Duration};

/// Per-connection PRAGMAs shared by every pool
///
/// - busy_timeout reduces SQLITE_BUSY errors
/// - foreign_keys must be explicitly enabled
/// - cache_size and temp_store=memory speed up queries
fn connect_options(database_url: &str) -> Result<SqliteConnectOptions> {
    Ok(SqliteConnectOptions::from_str(database_url)?
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true)
        .pragma("cache_size", "-20000")
        .pragma("temp_store", "memory"))
}

/// Create a read-only connection pool for concurrent reads
///
/// The database must already exist, create the write pool first.
pub async fn create_read_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = connect_options(database_url)?.read_only(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    tracing::info!(
        "Created read-only pool with {} max connections",
        max_connections
    );

    Ok(pool)
}

/// Create the read-write connection pool
///
/// Limited to 1 connection: every mutation and transaction goes through it,
/// which serializes writers.
pub async fn create_write_pool(database_url: &str) -> Result<SqlitePool> {
    let options = connect_options(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    tracing::info!("Created read-write pool with 1 max connection");

    Ok(pool)
}

/// Apply pending migrations through the write pool.
pub async fn migrate(write_pool: &SqlitePool) -> Result<()> {
    let mut conn = write_pool.acquire().await?;
    eventflow_db::migrate(&mut conn).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use temp_dir::TempDir;

    #[tokio::test]
    async fn test_write_pool_applies_pragmas() {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite:{}", dir.child("db.sqlite3").to_str().unwrap());
        let pool = create_write_pool(&url).await.unwrap();

        let journal_mode: (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(journal_mode.0, "wal");

        let foreign_keys: (i32,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(foreign_keys.0, 1);

        let temp_store: (i32,) = sqlx::query_as("PRAGMA temp_store")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(temp_store.0, 2); // 2 = memory
    }

    #[tokio::test]
    async fn test_read_pool_is_read_only() {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite:{}", dir.child("db.sqlite3").to_str().unwrap());
        let write_pool = create_write_pool(&url).await.unwrap();
        migrate(&write_pool).await.unwrap();

        let read_pool = create_read_pool(&url, 2).await.unwrap();

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM account")
            .fetch_one(&read_pool)
            .await
            .unwrap();
        assert_eq!(count.0, 0);

        assert!(
            sqlx::query("DELETE FROM account")
                .execute(&read_pool)
                .await
                .is_err()
        );
    }
}
