//! Process-local store. Nothing survives a restart.

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use super::{StoreError, TweetStore};
use crate::model::{Tweet, User};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    tweets: Vec<Tweet>,
    next_user_id: u64,
    next_tweet_id: u64,
}

/// In-memory [`TweetStore`].
///
/// Both tables and both id counters sit behind one mutex, so the author
/// check and the insert of a tweet are a single atomic step. The guard is
/// never held across an `.await`.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TweetStore for MemoryStore {
    async fn register_user(&self, name: &str) -> Result<User, StoreError> {
        let mut t = self.tables.lock();
        t.next_user_id += 1;
        let user = User { id: t.next_user_id.to_string(), name: name.to_owned() };
        t.users.push(user.clone());
        debug!(user_id = %user.id, "user registered");
        Ok(user)
    }

    async fn create_tweet(&self, author_id: &str, message: &str) -> Result<Tweet, StoreError> {
        let mut t = self.tables.lock();
        if !t.users.iter().any(|u| u.id == author_id) {
            return Err(StoreError::UnknownAuthor { author_id: author_id.to_owned() });
        }
        t.next_tweet_id += 1;
        let tweet = Tweet {
            id: t.next_tweet_id.to_string(),
            author_id: author_id.to_owned(),
            message: message.to_owned(),
        };
        t.tweets.push(tweet.clone());
        debug!(tweet_id = %tweet.id, author_id, "tweet created");
        Ok(tweet)
    }

    async fn list_tweets(&self) -> Result<Vec<Tweet>, StoreError> {
        Ok(self.tables.lock().tweets.clone())
    }

    async fn tweets_by_author(&self, author_id: &str) -> Result<Vec<Tweet>, StoreError> {
        let t = self.tables.lock();
        Ok(t.tweets.iter().filter(|tw| tw.author_id == author_id).cloned().collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn assigns_sequential_ids_per_entity() {
        let store = MemoryStore::new();
        let ada = store.register_user("Ada").await.unwrap();
        let bob = store.register_user("Bob").await.unwrap();
        assert_eq!((ada.id.as_str(), bob.id.as_str()), ("1", "2"));

        let tweet = store.create_tweet("2", "hello").await.unwrap();
        assert_eq!(tweet, Tweet { id: "1".into(), author_id: "2".into(), message: "hello".into() });
    }

    #[tokio::test]
    async fn rejects_unknown_author_without_consuming_an_id() {
        let store = MemoryStore::new();
        let err = store.create_tweet("9", "orphan").await.unwrap_err();
        assert_eq!(err, StoreError::UnknownAuthor { author_id: "9".into() });
        assert!(store.list_tweets().await.unwrap().is_empty());

        store.register_user("Ada").await.unwrap();
        assert_eq!(store.create_tweet("1", "first").await.unwrap().id, "1");
    }

    #[tokio::test]
    async fn filters_by_author_in_insertion_order() {
        let store = MemoryStore::new();
        store.register_user("Ada").await.unwrap();
        store.register_user("Bob").await.unwrap();
        store.create_tweet("1", "a1").await.unwrap();
        store.create_tweet("2", "b1").await.unwrap();
        store.create_tweet("1", "a2").await.unwrap();

        let ada: Vec<_> = store.tweets_by_author("1").await.unwrap()
            .into_iter().map(|t| t.message).collect();
        assert_eq!(ada, ["a1", "a2"]);
        assert_eq!(store.list_tweets().await.unwrap().len(), 3);
        assert!(store.tweets_by_author("3").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn padded_author_ids_do_not_alias() {
        let store = MemoryStore::new();
        store.register_user("Ada").await.unwrap();
        store.create_tweet("1", "hi").await.unwrap();

        for id in ["01", "+1"] {
            let err = store.create_tweet(id, "again").await.unwrap_err();
            assert_eq!(err, StoreError::UnknownAuthor { author_id: id.into() });
            assert!(store.tweets_by_author(id).await.unwrap().is_empty());
        }
        assert_eq!(store.list_tweets().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_lose_nothing() {
        const N: usize = 200;
        let store = Arc::new(MemoryStore::new());
        store.register_user("Ada").await.unwrap();

        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..N {
            let store = Arc::clone(&store);
            tasks.spawn(async move { store.create_tweet("1", &format!("t{i}")).await });
        }

        let mut ids = HashSet::new();
        while let Some(res) = tasks.join_next().await {
            ids.insert(res.unwrap().unwrap().id);
        }
        assert_eq!(ids.len(), N);
        assert_eq!(store.list_tweets().await.unwrap().len(), N);
    }
}
