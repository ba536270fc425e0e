// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signup, login and logout.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use super::success_redirect;
use crate::error::{AppError, PageResult, RedirectExt};
use crate::middleware::auth::{
    clear_session_cookie, current_user, session_cookie, SESSION_COOKIE,
};
use crate::models::User;
use crate::views::Page;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", get(signup_page).post(signup))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

/// Signup form. The username is the user's email address.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupForm {
    #[serde(default)]
    #[validate(email(message = "Please enter a valid email address"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Please enter a password"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Please enter your email"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Please enter a password"))]
    pub password: String,
}

async fn signup_page(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let user = current_user(&state, &jar);
    Page::new("signup").render(jar, user.as_ref())
}

/// Register an account and log it in.
async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> PageResult {
    form.validate()
        .map_err(AppError::from)
        .redirect_to("/signup")?;

    let username = form.username.trim();
    let user = state
        .credentials
        .register(username, &form.password)
        .await
        .redirect_to("/signup")?;

    start_session(&state, jar, &user).redirect_to("/login")
}

async fn login_page(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let user = current_user(&state, &jar);
    Page::new("login").render(jar, user.as_ref())
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> PageResult {
    form.validate()
        .map_err(AppError::from)
        .redirect_to("/login")?;

    let user = state
        .credentials
        .authenticate(form.username.trim(), &form.password)
        .await
        .redirect_to("/login")?;

    start_session(&state, jar, &user).redirect_to("/login")
}

fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: &User,
) -> crate::error::Result<Response> {
    let session_id = state.sessions.login(user)?;
    let jar = jar.add(session_cookie(
        session_id,
        state.config.secure_cookies(),
        state.config.session_ttl_hours,
    ));

    tracing::info!(user_id = %user.id, "User logged in");
    Ok((jar, Redirect::to("/dashboard")).into_response())
}

/// End the session. Works whether or not anyone is logged in.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.logout(cookie.value());
    }
    let jar = jar.remove(clear_session_cookie(state.config.secure_cookies()));

    success_redirect(jar, "Thank you, you are now logged out", "/login")
}
