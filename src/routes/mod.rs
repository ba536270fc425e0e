// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod auth;
pub mod favourites;
pub mod recipes;
pub mod reset;
pub mod schedule;

use crate::flash;
use crate::middleware::auth::{current_user, require_auth, AuthUser};
use crate::middleware::method_override::method_override;
use crate::middleware::security::add_security_headers;
use crate::views::Page;
use crate::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{middleware, routing::get, Extension, Json, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

async fn index(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let user = current_user(&state, &jar);
    Page::new("index").render(jar, user.as_ref())
}

async fn dashboard(Extension(user): Extension<AuthUser>, jar: CookieJar) -> Response {
    Page::new("dashboard").render(jar, Some(&user))
}

/// Redirect after a successful change, with a notice for the next page.
pub(crate) fn success_redirect(jar: CookieJar, message: &str, to: &str) -> Response {
    (flash::success(jar, message), Redirect::to(to)).into_response()
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .merge(auth::routes())
        .merge(reset::routes());

    // Everything under /dashboard requires a session
    let protected_routes = Router::new()
        .route("/dashboard", get(dashboard))
        .merge(recipes::routes())
        .merge(favourites::routes())
        .merge(schedule::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(add_security_headers))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state);

    // Method override has to rewrite the request before routing
    Router::new()
        .fallback_service(app)
        .layer(middleware::from_fn(method_override))
}
