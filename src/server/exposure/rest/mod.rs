//! REST API exposure
//!
//! Consumes a `PortalHost` and produces an Axum `Router`.

pub mod session;

use super::super::host::PortalHost;
use crate::registration::handlers::{list_registrations, register, update_registration_status};
use anyhow::Result;
use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub const SERVICE_NAME: &str = "tourney-portal";

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// Returns a router with:
    /// - Health check routes
    /// - Registration routes (intake, listing, status changes)
    /// - Admin session routes
    /// - Custom routes
    pub fn build_router(host: Arc<PortalHost>, custom_routes: Vec<Router>) -> Result<Router> {
        let body_limit = host.registration_body_limit();

        let registration_routes = Router::new()
            .route("/api/register", post(register).get(list_registrations))
            .route("/api/register/{id}", patch(update_registration_status))
            .layer(DefaultBodyLimit::max(body_limit));

        let session_routes = Router::new()
            .route("/api/auth/sign-in", post(session::sign_in))
            .route("/api/auth/sign-out", post(session::sign_out))
            .route("/api/auth/session", get(session::session));

        let mut app = Self::health_routes().merge(
            registration_routes
                .merge(session_routes)
                .with_state(host),
        );

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        Ok(app.layer(TraceLayer::new_for_http()))
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": SERVICE_NAME
        }))
    }
}
