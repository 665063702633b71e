//! Health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the store be reached? Failure → pulled from load-balancer. |

use tracing::warn;

use crate::api::AppState;
use crate::{Request, Response, Status};

/// Liveness probe.
///
/// Always returns `200 OK` with body `"ok"`. If the process can respond to
/// HTTP at all, it is alive; this handler has no dependencies.
pub async fn liveness(_req: Request, _state: AppState) -> Response {
    Response::text("ok")
}

/// Readiness probe: `200 ready` while the store answers a ping, `503` otherwise.
pub async fn readiness(_req: Request, state: AppState) -> Response {
    match state.store.ping().await {
        Ok(()) => Response::text("ready"),
        Err(e) => {
            warn!(error = %e, "readiness check failed");
            Response::error(Status::ServiceUnavailable, "store unavailable")
        }
    }
}
