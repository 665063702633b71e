//! # tweetd
//!
//! A minimal tweet REST service: register a user, post a tweet, list every
//! tweet, list one author's tweets. Nothing more.
//!
//! ## The contract
//!
//! | Method | Path | Body | Success |
//! |---|---|---|---|
//! | GET  | `/`               | -                     | `Welcome to the Tweet Api` |
//! | POST | `/registerUser`   | `{name}`              | User as JSON |
//! | GET  | `/listTweets`     | -                     | array of Tweet |
//! | POST | `/createTweet`    | `{message, authorId}` | Tweet as JSON |
//! | GET  | `/getTweets/{id}` | -                     | array of Tweet, `[]` when none |
//!
//! Bad input is a `400` with `{"error": "..."}`; a failing store is a `500`
//! and the server keeps serving. Wrong methods get `405` with an `allow`
//! header.
//!
//! ## Storage
//!
//! Users and tweets live behind [`store::TweetStore`], with two backends:
//! [`store::MemoryStore`] (mutex-guarded, ephemeral) and
//! [`store::PostgresStore`] (`users` / `tweet` tables, foreign-keyed).
//! Both enforce that a tweet's author exists.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use tweetd::api::{self, AppState};
//! use tweetd::store::MemoryStore;
//! use tweetd::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tweetd::Error> {
//!     let state = AppState::new(Arc::new(MemoryStore::new()));
//!     Server::bind("127.0.0.1:5000").await?.serve(api::routes(state)).await
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod api;
pub mod config;
pub mod health;
pub mod middleware;
pub mod model;
pub mod store;

pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
