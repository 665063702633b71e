//! Request tracing: one span and one access-log event per request.
//!
//! Every request is assigned a [`RequestId`]. A client-supplied
//! `x-request-id` header is reused when it parses as a UUID so ids can be
//! correlated across hops; otherwise a fresh v4 UUID is generated. The id is
//! echoed back on the response.
//!
//! The span wraps the raw `http::Request` so that reading the body, and a
//! failure to read it, happen inside the span too.

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::time::{Duration, Instant};

use http::HeaderMap;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::response::Response;

/// Header carrying the request identifier in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-request identifier attached to the request span and response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(Uuid);

impl RequestId {
    fn generate() -> Self { Self(Uuid::new_v4()) }

    /// Reuses the inbound header when present and well-formed.
    fn from_headers(headers: &HeaderMap) -> Self {
        headers.get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(Self::generate)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RequestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Runs `next` inside a request span and stamps the response with the
/// request id.
pub async fn trace<B, F, Fut>(req: http::Request<B>, next: F) -> Response
where
    F: FnOnce(http::Request<B>) -> Fut,
    Fut: Future<Output = Response>,
{
    let request_id = RequestId::from_headers(req.headers());
    let span = info_span!(
        "request",
        method = %req.method(),
        path = %req.uri().path(),
        request_id = %request_id,
    );

    async move {
        let started = Instant::now();
        let mut res = next(req).await;
        info!(
            status = res.status_code().as_u16(),
            latency_ms = millis(started.elapsed()),
            "request completed"
        );
        res.push_header(REQUEST_ID_HEADER, request_id.to_string());
        res
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;

    fn request(request_id: Option<&str>) -> http::Request<()> {
        let mut req = http::Request::get("/");
        if let Some(id) = request_id {
            req = req.header(REQUEST_ID_HEADER, id);
        }
        req.body(()).unwrap()
    }

    #[tokio::test]
    async fn stamps_a_fresh_request_id() {
        let res = trace(request(None), |_| async { Response::text("hi") }).await;
        let id = res.header(REQUEST_ID_HEADER).unwrap();
        assert!(id.parse::<RequestId>().is_ok());
    }

    #[tokio::test]
    async fn reuses_a_valid_inbound_request_id() {
        let inbound = "00000000-0000-4000-8000-000000000001";
        let res = trace(request(Some(inbound)), |_| async { Response::text("hi") }).await;
        assert_eq!(res.header(REQUEST_ID_HEADER), Some(inbound));
    }

    #[tokio::test]
    async fn replaces_a_malformed_inbound_request_id() {
        let res = trace(request(Some("not-a-uuid")), |_| async { Response::text("hi") }).await;
        assert_ne!(res.header(REQUEST_ID_HEADER), Some("not-a-uuid"));
    }

    #[test]
    fn latency_saturates_instead_of_wrapping() {
        assert_eq!(millis(Duration::from_micros(2_500)), 2);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }

    #[tokio::test]
    async fn error_responses_carry_the_request_id() {
        let res = trace(request(None), |_| async {
            Response::error(Status::BadRequest, "request body could not be read")
        })
        .await;
        assert!(res.header(REQUEST_ID_HEADER).is_some());
        assert_eq!(res.header("content-type"), Some("application/json"));
    }
}
