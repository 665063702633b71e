//! Storage port for users and tweets, plus its two adapters.
//!
//! Handlers only see [`TweetStore`]. Adapters map their own failures into
//! [`StoreError`] so the HTTP layer can decide between 400 and 500 without
//! knowing which backend is running.

mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Tweet, User};

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Errors surfaced by store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The tweet references a user that does not exist.
    #[error("unknown author {author_id}")]
    UnknownAuthor { author_id: String },
    /// The backend could not be reached.
    #[error("store unavailable: {message}")]
    Unavailable { message: String },
    /// A statement failed for any other reason.
    #[error("store query failed: {message}")]
    Query { message: String },
}

/// Append-only collection of users and tweets.
///
/// Implementations assign identifiers and must be safe to call from many
/// request tasks at once.
#[async_trait]
pub trait TweetStore: Send + Sync {
    /// Stores a new user and returns it with its assigned identifier.
    async fn register_user(&self, name: &str) -> Result<User, StoreError>;

    /// Stores a new tweet. Fails with [`StoreError::UnknownAuthor`] when
    /// `author_id` does not name a registered user.
    async fn create_tweet(&self, author_id: &str, message: &str) -> Result<Tweet, StoreError>;

    /// Every tweet, in insertion order.
    async fn list_tweets(&self) -> Result<Vec<Tweet>, StoreError>;

    /// Tweets written by `author_id`, in insertion order. Empty when there
    /// are none, including when the author does not exist.
    async fn tweets_by_author(&self, author_id: &str) -> Result<Vec<Tweet>, StoreError>;

    /// Cheap reachability check for readiness probes.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Releases backend resources. Called once, after the server has drained.
    async fn close(&self);
}

/// Shared handle injected into handlers.
pub type SharedStore = Arc<dyn TweetStore>;
