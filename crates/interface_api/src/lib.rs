//! HTTP API Layer
//!
//! This crate provides the REST API of the member mirror using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: list member endpoints and health checks
//! - **Middleware**: request logging
//! - **DTOs**: path parameters and response bodies
//! - **Error Handling**: consistent `{message, errors?}` error bodies
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(service, config).with_readiness_check(members);
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use core_kernel::HealthCheckable;
use domain_mailchimp::MemberService;

use crate::config::ApiConfig;
use crate::handlers::{fallback, health, members};
use crate::middleware::request_logging_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: MemberService,
    pub config: ApiConfig,
    /// Adapters that must be healthy for the service to be ready
    pub readiness: Vec<Arc<dyn HealthCheckable>>,
}

impl AppState {
    pub fn new(service: MemberService, config: ApiConfig) -> Self {
        Self {
            service,
            config,
            readiness: Vec::new(),
        }
    }

    /// Adds an adapter to the readiness check
    pub fn with_readiness_check(mut self, adapter: Arc<dyn HealthCheckable>) -> Self {
        self.readiness.push(adapter);
        self
    }
}

/// Creates the main API router
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let member_routes = Router::new()
        .route(
            "/:list_id/members",
            post(members::create_member)
                .get(members::list_members)
                .fallback(fallback::method_not_allowed),
        )
        .route(
            "/:list_id/members/:member_id",
            get(members::get_member)
                .put(members::replace_member)
                .patch(members::patch_member)
                .delete(members::delete_member)
                .post(members::remove_member)
                .fallback(fallback::method_not_allowed),
        )
        .route(
            "/:list_id/members/:member_id/:remove_flag",
            post(members::remove_member_with_flag).fallback(fallback::method_not_allowed),
        );

    Router::new()
        .merge(public_routes)
        .nest("/mailchimp/list", member_routes)
        .fallback(fallback::not_found)
        .layer(axum_middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
