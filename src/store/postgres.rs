//! PostgreSQL store backed by a `sqlx` connection pool.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::{debug, info};

use super::{StoreError, TweetStore};
use crate::model::{Tweet, User};

/// Created on connect when missing. `fk_users` enforces tweet authorship.
const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        created TIMESTAMP DEFAULT NOW()
    );

    CREATE TABLE IF NOT EXISTS tweet (
        id SERIAL PRIMARY KEY,
        message VARCHAR(200) NOT NULL,
        author_id INT,
        created TIMESTAMP DEFAULT NOW(),
        CONSTRAINT fk_users FOREIGN KEY (author_id) REFERENCES users(id)
    );";

/// SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Durable [`TweetStore`].
///
/// Each operation is a single statement; concurrency control is left to
/// PostgreSQL.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Opens a pool, verifies the connection and creates the schema.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(map_sqlx_error)?;
        let store = Self { pool };
        store.migrate().await?;
        info!(max_connections, "postgres store ready");
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

/// Identifiers are `SERIAL` rendered in decimal. Only the canonical
/// rendering names a row, so `"01"` or `"+1"` never alias user `1`.
fn parse_id(id: &str) -> Option<i32> {
    id.parse::<i32>().ok().filter(|n| n.to_string() == id)
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => StoreError::Unavailable { message: err.to_string() },
        other => StoreError::Query { message: other.to_string() },
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == FOREIGN_KEY_VIOLATION)
}

fn tweet_from_row(row: &PgRow) -> Result<Tweet, sqlx::Error> {
    let id: i32 = row.try_get("id")?;
    let author_id: Option<i32> = row.try_get("author_id")?;
    Ok(Tweet {
        id: id.to_string(),
        author_id: author_id.map(|a| a.to_string()).unwrap_or_default(),
        message: row.try_get("message")?,
    })
}

#[async_trait]
impl TweetStore for PostgresStore {
    async fn register_user(&self, name: &str) -> Result<User, StoreError> {
        let id: i32 = sqlx::query_scalar("INSERT INTO users (name) VALUES ($1) RETURNING id")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        debug!(user_id = id, "user registered");
        Ok(User { id: id.to_string(), name: name.to_owned() })
    }

    async fn create_tweet(&self, author_id: &str, message: &str) -> Result<Tweet, StoreError> {
        let unknown = || StoreError::UnknownAuthor { author_id: author_id.to_owned() };
        let author = parse_id(author_id).ok_or_else(unknown)?;

        let id: i32 = sqlx::query_scalar(
            "INSERT INTO tweet (message, author_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(message)
        .bind(author)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| if is_foreign_key_violation(&e) { unknown() } else { map_sqlx_error(e) })?;

        debug!(tweet_id = id, author_id, "tweet created");
        Ok(Tweet { id: id.to_string(), author_id: author.to_string(), message: message.to_owned() })
    }

    async fn list_tweets(&self) -> Result<Vec<Tweet>, StoreError> {
        let rows = sqlx::query("SELECT id, message, author_id FROM tweet ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        rows.iter()
            .map(tweet_from_row)
            .collect::<Result<_, _>>()
            .map_err(map_sqlx_error)
    }

    async fn tweets_by_author(&self, author_id: &str) -> Result<Vec<Tweet>, StoreError> {
        let Some(author) = parse_id(author_id) else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query(
            "SELECT id, message, author_id FROM tweet WHERE author_id = $1 ORDER BY id",
        )
        .bind(author)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        rows.iter()
            .map(tweet_from_row)
            .collect::<Result<_, _>>()
            .map_err(map_sqlx_error)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("postgres store closed");
    }
}
