//! Cross-cutting request layers: CORS, request logging, deadline, panic recovery.

use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    Router,
    extract::{Request, State},
    http::{
        HeaderMap, HeaderValue, Method, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN, VARY,
        },
    },
    middleware::{Next, from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{error, info, warn};

use crate::app::HttpSettings;
use crate::app::errors::ApiError;

const ALLOW_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Wrap `router` with every cross-cutting layer, CORS outermost.
pub fn apply(router: Router, settings: &HttpSettings) -> Router {
    let cors_policy = CorsPolicy::new(settings.allowed_origins.clone());

    router.layer(
        ServiceBuilder::new()
            .layer(from_fn_with_state(cors_policy, cors))
            .layer(from_fn(log_requests))
            .layer(from_fn_with_state(settings.request_timeout, enforce_deadline))
            .layer(CatchPanicLayer::custom(handle_panic)),
    )
}

/// Origin policy captured once at startup.
///
/// An empty allow-list mirrors whatever `Origin` the request carries.
#[derive(Debug, Clone, Default)]
pub struct CorsPolicy {
    allowed: Arc<[String]>,
}

impl CorsPolicy {
    pub fn new(allowed_origins: Vec<String>) -> Self {
        Self {
            allowed: allowed_origins.into(),
        }
    }

    pub fn is_mirror(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Value for `Access-Control-Allow-Origin`, if any.
    pub fn allow_origin(&self, origin: Option<&HeaderValue>) -> Option<HeaderValue> {
        if self.is_mirror() {
            return Some(
                origin
                    .cloned()
                    .unwrap_or_else(|| HeaderValue::from_static("*")),
            );
        }
        let origin = origin?;
        let listed = origin
            .to_str()
            .is_ok_and(|o| self.allowed.iter().any(|allowed| allowed == o));
        listed.then(|| origin.clone())
    }

    fn decorate(&self, origin: Option<&HeaderValue>, headers: &mut HeaderMap) {
        if let Some(value) = self.allow_origin(origin) {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
        headers.append(VARY, HeaderValue::from_static("Origin"));
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("false"),
        );
    }
}

/// Preflight requests are answered here and never reach a handler.
pub async fn cors(State(policy): State<CorsPolicy>, req: Request, next: Next) -> Response {
    let origin = req.headers().get(ORIGIN).cloned();

    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    policy.decorate(origin.as_ref(), response.headers_mut());
    response
}

pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(req).await;

    info!(
        %method,
        %path,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request completed"
    );
    response
}

/// Drops the inner future once `limit` elapses, cancelling any in-flight
/// store call it was awaiting.
pub async fn enforce_deadline(State(limit): State<Duration>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    match tokio::time::timeout(limit, next.run(req)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(%path, timeout_ms = limit.as_millis() as u64, "request deadline exceeded");
            ApiError::internal().into_response()
        }
    }
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else {
        "non-string panic payload"
    };
    error!(panic = %detail, "request handler panicked");
    ApiError::panic().into_response()
}
