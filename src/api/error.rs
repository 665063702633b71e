//! HTTP mapping for request-level failures.
//!
//! Validation problems become `400` with their message; store failures
//! become `500` with a fixed message and the cause goes to the log only.

use thiserror::Error;
use tracing::{error, warn};

use crate::model::ValidationError;
use crate::response::{IntoResponse, Response};
use crate::status::Status;
use crate::store::StoreError;

/// Convenient result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("please provide the user id")]
    MissingAuthorId,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    fn status(&self) -> Status {
        match self {
            Self::InvalidJson(_)
            | Self::Validation(_)
            | Self::MissingAuthorId
            | Self::Store(StoreError::UnknownAuthor { .. }) => Status::BadRequest,
            Self::Store(_) => Status::InternalServerError,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == Status::InternalServerError {
            error!(error = %self, "request failed");
            "internal server error".to_owned()
        } else {
            warn!(error = %self, "request rejected");
            self.to_string()
        };
        Response::error(status, &message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use serde_json::Value;

    fn body(res: &Response) -> Value {
        serde_json::from_slice(res.body()).unwrap()
    }

    #[test]
    fn validation_errors_are_client_errors() {
        let res = ApiError::from(ValidationError::EmptyMessage).into_response();
        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(body(&res)["error"], "tweet message is empty");
    }

    #[test]
    fn unknown_author_is_a_client_error() {
        let err = StoreError::UnknownAuthor { author_id: "7".into() };
        let res = ApiError::from(err).into_response();
        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(body(&res)["error"], "unknown author 7");
    }

    #[test]
    fn store_failures_are_redacted() {
        let err = StoreError::Unavailable { message: "connection refused at 10.0.0.3".into() };
        let res = ApiError::from(err).into_response();
        assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body(&res)["error"], "internal server error");
        assert_eq!(res.header("content-type"), Some("application/json"));
    }
}
