// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session authentication middleware.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::error::AppError;
use crate::AppState;

/// Cookie holding the session id.
pub const SESSION_COOKIE: &str = "recipe_session";

/// Authenticated user behind the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
}

/// Middleware that requires a live session.
///
/// Without one the request never reaches the handler: the user is sent to
/// the login page with a notice.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_user = current_user(&state, &jar).ok_or(AppError::Unauthenticated)?;

    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// The logged-in user, if any, for pages that render either way.
pub fn current_user(state: &AppState, jar: &CookieJar) -> Option<AuthUser> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| state.sessions.authenticated(cookie.value()))
}

/// Cookie carrying a new session id.
pub fn session_cookie(session_id: String, secure: bool, ttl_hours: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(ttl_hours))
        .build()
}

/// Removal cookie matching the attributes of [`session_cookie`].
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE)
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}
