//! The tweet REST contract: route table and endpoint handlers.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET  | `/`               | [`home`] |
//! | POST | `/registerUser`   | [`register_user`] |
//! | GET  | `/listTweets`     | [`list_tweets`] |
//! | POST | `/createTweet`    | [`create_tweet`] |
//! | GET  | `/getTweets/{id}` | [`get_tweets`] |
//! | GET  | `/healthz`, `/readyz` | [`health`](crate::health) |

mod error;

pub use error::{ApiError, ApiResult};

use tracing::info;

use crate::health;
use crate::method::Method;
use crate::model::{NewTweet, NewUser, Tweet, User};
use crate::request::Request;
use crate::response::Json;
use crate::router::Router;
use crate::store::SharedStore;

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
}

impl AppState {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

/// Builds the full routing table over `state`.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new(state)
        .on(Method::Get,  "/",               home)
        .on(Method::Post, "/registerUser",   register_user)
        .on(Method::Get,  "/listTweets",     list_tweets)
        .on(Method::Post, "/createTweet",    create_tweet)
        .on(Method::Get,  "/getTweets",      get_tweets)
        .on(Method::Get,  "/getTweets/",     get_tweets)
        .on(Method::Get,  "/getTweets/{id}", get_tweets)
        .on(Method::Get,  "/healthz",        health::liveness)
        .on(Method::Get,  "/readyz",         health::readiness)
}

// GET /
pub async fn home(_req: Request, _state: AppState) -> &'static str {
    "Welcome to the Tweet Api"
}

// POST /registerUser
pub async fn register_user(req: Request, state: AppState) -> ApiResult<Json<User>> {
    let input: NewUser = req.json()?;
    input.validate()?;
    let user = state.store.register_user(&input.name).await?;
    info!(user_id = %user.id, "registered user");
    Ok(Json(user))
}

// GET /listTweets
pub async fn list_tweets(_req: Request, state: AppState) -> ApiResult<Json<Vec<Tweet>>> {
    Ok(Json(state.store.list_tweets().await?))
}

// POST /createTweet
pub async fn create_tweet(req: Request, state: AppState) -> ApiResult<Json<Tweet>> {
    let input: NewTweet = req.json()?;
    input.validate()?;
    let tweet = state.store.create_tweet(&input.author_id, &input.message).await?;
    info!(tweet_id = %tweet.id, author_id = %tweet.author_id, "created tweet");
    Ok(Json(tweet))
}

// GET /getTweets/{id}
//
// An author with no tweets, known or not, yields `[]`.
pub async fn get_tweets(req: Request, state: AppState) -> ApiResult<Json<Vec<Tweet>>> {
    let author_id = req.param("id")
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingAuthorId)?;
    Ok(Json(state.store.tweets_by_author(author_id).await?))
}
