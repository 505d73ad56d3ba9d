#![allow(unreachable_pub, clippy::redundant_pub_crate)]
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use api_types::ErrorResponse;
use axum::{
    http::{HeaderValue, Request, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use runtime::rate_limiter::RateLimiter;
use tower::{Layer, Service};
use tracing::warn;

#[derive(Clone, Debug)]
pub(super) struct RateLimitLayer {
    limiter: RateLimiter,
    period: Duration,
}

impl RateLimitLayer {
    pub fn new(max: u64, period: Duration) -> Self {
        Self { limiter: RateLimiter::new(max, period), period }
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimit<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimit { inner, limiter: self.limiter.clone(), period: self.period }
    }
}

#[derive(Clone, Debug)]
pub(super) struct RateLimit<S> {
    inner: S,
    limiter: RateLimiter,
    period: Duration,
}

impl<S> RateLimit<S> {
    fn too_many_requests(&self) -> Response {
        let retry_after = self.period.as_secs().max(1);
        let body = ErrorResponse::new(
            "rate-limit",
            "Too Many Requests",
            StatusCode::TOO_MANY_REQUESTS,
            format!("Rate limit exceeded. Retry after {} seconds", retry_after),
        );
        let mut resp = body.into_response();
        resp.headers_mut().insert(RETRY_AFTER, HeaderValue::from(retry_after));
        resp
    }
}

impl<S, ReqBody> Service<Request<ReqBody>> for RateLimit<S>
where
    S: Service<Request<ReqBody>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        if self.limiter.try_acquire() {
            Box::pin(self.inner.call(req))
        } else {
            warn!(path = %req.uri().path(), "Rate limit exceeded");
            Box::pin(std::future::ready(Ok(self.too_many_requests())))
        }
    }
}
