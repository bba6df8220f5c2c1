//! Best-effort audit log of upload emails.
//!
//! Nothing here returns an error to the caller: a missing or unreachable
//! database disables logging, and failed inserts are logged and dropped.

use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct EmailAuditLog {
    pool: Option<SqlitePool>,
}

impl EmailAuditLog {
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    pub async fn connect(database_url: Option<&str>) -> Self {
        let Some(url) = database_url else {
            tracing::info!("DATABASE_URL not set; email audit logging disabled");
            return Self::disabled();
        };

        match open_pool(url).await {
            Ok(pool) => {
                tracing::info!("Email audit logging enabled");
                Self { pool: Some(pool) }
            }
            Err(err) => {
                tracing::warn!("Audit database unavailable, logging disabled: {}", err);
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    /// Returns whether a row was written.
    pub async fn log_email(&self, email: &str) -> bool {
        let Some(pool) = &self.pool else {
            return false;
        };

        let timestamp = Utc::now().to_rfc3339();
        let result = sqlx::query("INSERT INTO users (email, timestamp) VALUES (?1, ?2)")
            .bind(email)
            .bind(&timestamp)
            .execute(pool)
            .await;

        match result {
            Ok(done) => done.rows_affected() == 1,
            Err(err) => {
                tracing::warn!("Failed to write audit record: {}", err);
                false
            }
        }
    }
}

async fn open_pool(url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL,
            timestamp TEXT NOT NULL
        )",
    )
    .execute(&pool)
    .await?;

    Ok(pool)
}
