// ABOUTME: Request tracing middleware for correlation and structured logging
// ABOUTME: Creates a span per HTTP request carrying the request id and authenticated user

use axum::http::{HeaderMap, Request};
use tracing::Span;
use uuid::Uuid;

/// Header carrying the correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request context that flows through the request lifecycle
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Correlation id, from `x-request-id` or generated
    pub request_id: String,
    /// Authenticated user, once known
    pub user_id: Option<Uuid>,
}

impl RequestContext {
    /// Create new request context with generated request ID
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: format!("req_{}", Uuid::new_v4().simple()),
            user_id: None,
        }
    }

    /// Build from request headers, reusing the inbound request id when present
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map_or_else(Self::new, |request_id| Self {
                request_id: request_id.to_owned(),
                user_id: None,
            })
    }

    /// Update context with the authenticated user
    #[must_use]
    pub const fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Record context in current tracing span
    pub fn record_in_span(&self) {
        let span = Span::current();
        span.record("request_id", self.request_id.as_str());

        if let Some(user_id) = &self.user_id {
            span.record("user_id", user_id.to_string());
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a tracing span for an HTTP request
pub fn create_request_span<B>(request: &Request<B>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
        user_id = tracing::field::Empty,
    )
}
