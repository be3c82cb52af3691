//! Request identification.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) as early as possible
//! - Preserve an ID supplied by the caller
//! - Make the ID available to handlers and logs via the header
//!
//! # Design Decisions
//! - The ID travels in the `x-request-id` header, request and response side
//! - Handlers read it through `RequestIdExt` instead of poking at headers

use std::task::{Context, Poll};

use axum::http::{HeaderMap, HeaderValue, Request};
use tower::{Layer, Service};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Tower layer that stamps every request with an ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Service produced by [`RequestIdLayer`].
#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for RequestIdService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        if !request.headers().contains_key(X_REQUEST_ID) {
            let id = Uuid::new_v4().to_string();
            if let Ok(value) = HeaderValue::from_str(&id) {
                request.headers_mut().insert(X_REQUEST_ID, value);
            }
        }
        self.inner.call(request)
    }
}

/// Convenience accessor for the request ID.
pub trait RequestIdExt {
    /// The request ID, or "unknown" when the layer did not run.
    fn request_id(&self) -> &str;
}

impl RequestIdExt for HeaderMap {
    fn request_id(&self) -> &str {
        self.get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}
