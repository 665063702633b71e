//! Unified infrastructure error type.

use thiserror::Error;

use crate::store::StoreError;

/// The error type returned by tweetd's fallible startup and serving operations.
///
/// Per-request failures (400, 404, 500, ...) are expressed as HTTP
/// [`Response`](crate::Response) values, never as `Error`s. This type surfaces
/// infrastructure failures: binding to a port, accepting a connection, or
/// bringing the store up.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("store: {0}")]
    Store(#[from] StoreError),

    #[error("config: {0}")]
    Config(String),
}
