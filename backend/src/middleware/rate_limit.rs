//! Fixed-window per-peer rate limiting.
//!
//! Each peer address gets a counter that resets when its window elapses;
//! requests past the budget are answered with `429` and the standard
//! failure envelope without ever reaching a handler. Health probes are
//! exempt so orchestrators are never throttled.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpResponse};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use serde_json::json;
use tracing::warn;

/// Counters are pruned once the map grows past this many peers.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct WindowState {
    started: Instant,
    count: u32,
}

#[derive(Debug)]
struct Limiter {
    window: Duration,
    max: u32,
    peers: Mutex<HashMap<IpAddr, WindowState>>,
}

impl Limiter {
    fn lock(&self) -> MutexGuard<'_, HashMap<IpAddr, WindowState>> {
        self.peers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a hit for `peer` and report whether it is within budget.
    fn allow(&self, peer: IpAddr, now: Instant) -> bool {
        let mut peers = self.lock();
        if peers.len() > PRUNE_THRESHOLD {
            let window = self.window;
            peers.retain(|_, state| now.duration_since(state.started) < window);
        }
        let state = peers.entry(peer).or_insert(WindowState {
            started: now,
            count: 0,
        });
        if now.duration_since(state.started) >= self.window {
            state.started = now;
            state.count = 0;
        }
        state.count += 1;
        state.count <= self.max
    }
}

/// Middleware enforcing a fixed-window request budget per peer address.
///
/// # Examples
/// ```
/// use std::time::Duration;
///
/// use actix_web::App;
/// use backend::middleware::RateLimit;
///
/// let app = App::new().wrap(RateLimit::new(Duration::from_secs(900), 100));
/// ```
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<Limiter>,
}

impl RateLimit {
    /// Allow `max` requests per peer per `window`.
    pub fn new(window: Duration, max: u32) -> Self {
        Self {
            limiter: Arc::new(Limiter {
                window,
                max,
                peers: Mutex::new(HashMap::new()),
            }),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service,
            limiter: Arc::clone(&self.limiter),
        }))
    }
}

/// Service wrapper produced by [`RateLimit`].
pub struct RateLimitMiddleware<S> {
    service: S,
    limiter: Arc<Limiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if !req.path().starts_with("/health") {
            // Requests arriving without a peer address (unix sockets,
            // in-process tests) share one unspecified bucket.
            let peer = req
                .peer_addr()
                .map_or(IpAddr::from([0, 0, 0, 0]), |addr| addr.ip());
            if !self.limiter.allow(peer, Instant::now()) {
                warn!(%peer, "request budget exhausted");
                let response = HttpResponse::TooManyRequests().json(json!({
                    "success": false,
                    "code": "too_many_requests",
                    "message": "Too many requests, please try again later.",
                }));
                return Box::pin(ready(Ok(req.into_response(response).map_into_right_body())));
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res.map_into_left_body())
        })
    }
}
