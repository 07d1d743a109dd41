// ABOUTME: Route module organization for the Equilibria HTTP API
// ABOUTME: Assembles domain route groups under /api/v1 and applies the shared middleware stack
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the Equilibria API
//!
//! Each domain module owns its route definitions and thin handlers that
//! authenticate, validate, and delegate to the database and intelligence layers.

/// Registration, login, logout and current-user routes
pub mod auth;
/// Liveness and readiness probes
pub mod health;
/// Recovery check-in routes
pub mod recovery;
/// Profile management routes
pub mod users;
/// Wearable sync routes
pub mod wearables;
/// Workout plan and session routes
pub mod workouts;

use std::sync::Arc;

use axum::{body::Body, extract::DefaultBodyLimit, http::HeaderName, Router};
use equilibria_core::constants::{endpoints, limits};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::middleware::{create_request_span, setup_cors, REQUEST_ID_HEADER};
use crate::resources::ServerResources;

pub use auth::{AuthRoutes, AuthService};
pub use health::HealthRoutes;
pub use recovery::RecoveryRoutes;
pub use users::UserRoutes;
pub use wearables::WearableRoutes;
pub use workouts::WorkoutRoutes;

/// Build the complete application router
///
/// Domain routes are nested under `/api/v1`; health probes stay at the root.
/// Every response carries an `x-request-id`, generated when the client sent none.
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let api = Router::new()
        .merge(AuthRoutes::routes(Arc::clone(&resources)))
        .merge(UserRoutes::routes(Arc::clone(&resources)))
        .merge(RecoveryRoutes::routes(Arc::clone(&resources)))
        .merge(WearableRoutes::routes(Arc::clone(&resources)))
        .merge(WorkoutRoutes::routes(Arc::clone(&resources)));

    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    let cors = setup_cors(&resources.config);

    Router::new()
        .nest(endpoints::API_V1, api)
        .merge(HealthRoutes::routes(resources))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    request_id_header.clone(),
                    MakeRequestUuid,
                ))
                .layer(TraceLayer::new_for_http().make_span_with(create_request_span::<Body>))
                .layer(PropagateRequestIdLayer::new(request_id_header))
                .layer(cors),
        )
        .layer(DefaultBodyLimit::max(limits::MAX_REQUEST_SIZE))
}
