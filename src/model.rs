//! Users, tweets and the payloads that create them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest accepted user name, in characters. Mirrors `users.name VARCHAR(100)`.
pub const MAX_NAME_CHARS: usize = 100;
/// Longest accepted tweet message, in characters. Mirrors `tweet.message VARCHAR(200)`.
pub const MAX_MESSAGE_CHARS: usize = 200;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

/// A stored tweet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    pub id: String,
    pub author_id: String,
    pub message: String,
}

/// Body of `POST /registerUser`. A missing `name` decodes as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewUser {
    pub name: String,
}

/// Body of `POST /createTweet`. Missing fields decode as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewTweet {
    pub message: String,
    pub author_id: String,
}

/// Field-level validation failures, always reported to the client as 400.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("user name is empty")]
    EmptyName,
    #[error("user name exceeds 100 characters")]
    NameTooLong,
    #[error("tweet message is empty")]
    EmptyMessage,
    #[error("tweet message exceeds 200 characters")]
    MessageTooLong,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.name.chars().count() > MAX_NAME_CHARS {
            return Err(ValidationError::NameTooLong);
        }
        Ok(())
    }
}

impl NewTweet {
    /// Checks the message only; whether `author_id` names a real user is the
    /// store's call.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.message.is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        if self.message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(ValidationError::MessageTooLong);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn tweet_serialises_with_camel_case_keys() {
        let tweet = Tweet { id: "1".into(), author_id: "1".into(), message: "hi".into() };
        assert_eq!(
            serde_json::to_string(&tweet).unwrap(),
            r#"{"id":"1","authorId":"1","message":"hi"}"#
        );
    }

    #[test]
    fn missing_fields_decode_as_empty() {
        let user: NewUser = serde_json::from_str("{}").unwrap();
        assert_eq!(user.validate(), Err(ValidationError::EmptyName));

        let tweet: NewTweet = serde_json::from_str(r#"{"authorId":"3"}"#).unwrap();
        assert_eq!(tweet.author_id, "3");
        assert_eq!(tweet.validate(), Err(ValidationError::EmptyMessage));
    }

    #[rstest]
    #[case("Ada", Ok(()))]
    #[case("", Err(ValidationError::EmptyName))]
    #[case(&"n".repeat(MAX_NAME_CHARS), Ok(()))]
    #[case(&"n".repeat(MAX_NAME_CHARS + 1), Err(ValidationError::NameTooLong))]
    fn validates_user_name(#[case] name: &str, #[case] expected: Result<(), ValidationError>) {
        let user = NewUser { name: name.to_owned() };
        assert_eq!(user.validate(), expected);
    }

    #[rstest]
    #[case("hi", Ok(()))]
    #[case("", Err(ValidationError::EmptyMessage))]
    #[case(&"é".repeat(MAX_MESSAGE_CHARS), Ok(()))]
    #[case(&"m".repeat(MAX_MESSAGE_CHARS + 1), Err(ValidationError::MessageTooLong))]
    fn validates_tweet_message(#[case] message: &str, #[case] expected: Result<(), ValidationError>) {
        let tweet = NewTweet { message: message.to_owned(), author_id: "1".into() };
        assert_eq!(tweet.validate(), expected);
    }
}
