// ABOUTME: HTTP middleware for request tracing, authentication, and cross-origin access
// ABOUTME: Provides bearer authentication, CORS setup, and per-request spans

pub mod auth;
pub mod cors;
pub mod tracing;

// Authentication middleware
pub use auth::AuthMiddleware;

// CORS configuration
pub use cors::setup_cors;

// Request tracing and context management
pub use tracing::{create_request_span, RequestContext, REQUEST_ID_HEADER};
