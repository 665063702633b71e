//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. A path that exists under
//! some other method resolves to `405` with an `allow` header; a path that
//! exists under no method resolves to `404`.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// Outcome of matching a method + path pair against the routing table.
pub(crate) enum RouteMatch<S> {
    Found(BoxedHandler<S>, HashMap<String, String>),
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

/// The application router.
///
/// Build it once at startup with the shared state `S` every handler
/// receives; pass it to [`Server::serve`](crate::Server::serve). Each
/// [`Router::on`] call returns `self` so registrations chain naturally.
pub struct Router<S> {
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
    state: S,
}

impl<S> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(state: S) -> Self {
        Self { routes: HashMap::new(), state }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is malformed or conflicts with an existing route for
    /// the same method. Routes are fixed at startup, so this is a programming
    /// error rather than a runtime condition.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{method} {path}`: {e}"));
        self
    }

    pub(crate) fn lookup(&self, method: &http::Method, path: &str) -> RouteMatch<S> {
        if let Ok(m) = Method::try_from(method) {
            if let Some(matched) = self.routes.get(&m).and_then(|tree| tree.at(path).ok()) {
                let handler = Arc::clone(matched.value);
                let params = matched.params.iter()
                    .map(|(k, v)| (k.to_owned(), v.to_owned()))
                    .collect();
                return RouteMatch::Found(handler, params);
            }
        }

        let mut allowed: Vec<Method> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(m, _)| *m)
            .collect();
        if allowed.is_empty() {
            return RouteMatch::NotFound;
        }
        allowed.sort();
        RouteMatch::MethodNotAllowed(allowed)
    }

    /// Routes one request and produces one response.
    pub async fn handle(&self, req: Request) -> Response {
        match self.lookup(req.method(), req.path()) {
            RouteMatch::Found(handler, params) => {
                handler.call(req.with_params(params), self.state.clone()).await
            }
            RouteMatch::MethodNotAllowed(allowed) => {
                let allow = allowed.iter()
                    .map(|m| m.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                let mut res = Response::error(Status::MethodNotAllowed, "method not allowed");
                res.push_header("allow", allow);
                res
            }
            RouteMatch::NotFound => Response::error(Status::NotFound, "not found"),
        }
    }
}
