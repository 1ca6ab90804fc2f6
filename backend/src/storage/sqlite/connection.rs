use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

const IN_MEMORY_URL: &str = "sqlite::memory:";

/// DbConnection manages the SQLite pool
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
    database_name: String,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and set up the schema
    pub async fn new(url: &str) -> Result<Self> {
        if database_name_from_url(url) == "memory" {
            return Self::init_in_memory().await;
        }

        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {}", url))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database: {}", url))?;

        Self::setup_schema(&pool).await?;
        info!("Opened database {}", url);

        Ok(Self {
            pool: Arc::new(pool),
            database_name: database_name_from_url(url),
        })
    }

    /// A private in-memory database.
    ///
    /// Every SQLite connection to `:memory:` gets its own empty database, so
    /// the pool is held at a single connection that is never recycled.
    pub async fn init_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str(IN_MEMORY_URL)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
            database_name: "memory".to_string(),
        })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS birthdays (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                date TEXT NOT NULL,
                reminder_type TEXT NOT NULL,
                repeat_type TEXT NOT NULL,
                event_type TEXT NOT NULL,
                show_preference TEXT NOT NULL,
                show_age INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Duplicate detection looks records up by (name, date)
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_birthdays_name_date
            ON birthdays(name, date);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_birthdays_event_type
            ON birthdays(event_type);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

/// "sqlite://data/birthdays.db?mode=rwc" -> "birthdays"
fn database_name_from_url(url: &str) -> String {
    let path = url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or_default();

    if path.is_empty() || path == ":memory:" {
        return "memory".to_string();
    }

    Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(path)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_name_from_url() {
        assert_eq!(database_name_from_url("sqlite:birthdays.db"), "birthdays");
        assert_eq!(database_name_from_url("sqlite://data/events.sqlite?mode=rwc"), "events");
        assert_eq!(database_name_from_url("sqlite::memory:"), "memory");
    }

    #[tokio::test]
    async fn test_in_memory_schema_is_created() {
        let db = DbConnection::init_in_memory().await.expect("Failed to create test database");
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM birthdays")
            .fetch_one(db.pool())
            .await
            .expect("birthdays table should exist");
        assert_eq!(row.0, 0);
        assert_eq!(db.database_name(), "memory");
    }

    #[tokio::test]
    async fn test_file_database_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.db");
        let url = format!("sqlite://{}", path.display());

        let db = DbConnection::new(&url).await.expect("Failed to open file database");
        assert!(path.exists());
        assert_eq!(db.database_name(), "events");
    }
}
