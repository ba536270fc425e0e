// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Forgotten password: request a reset link, then set a new password.

use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use super::success_redirect;
use crate::error::{AppError, PageResult, RedirectExt, Redirected};
use crate::middleware::auth::current_user;
use crate::views::Page;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/forgot", get(forgot_page).post(forgot))
        .route("/reset/{token}", get(reset_page).post(reset))
}

#[derive(Debug, Deserialize)]
pub struct ForgotForm {
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetForm {
    #[serde(default)]
    pub password: String,
    /// Confirmation
    #[serde(default)]
    pub password2: String,
}

async fn forgot_page(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let user = current_user(&state, &jar);
    Page::new("forgot").render(jar, user.as_ref())
}

/// Issue a reset token and email the link.
async fn forgot(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ForgotForm>,
) -> PageResult {
    state
        .password_reset
        .issue_token(form.username.trim())
        .await
        .redirect_to("/forgot")?;

    Ok(success_redirect(
        jar,
        "Successfully sent you an email!",
        "/login",
    ))
}

/// Show the new-password form for a still-valid token.
async fn reset_page(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    jar: CookieJar,
) -> PageResult {
    state
        .password_reset
        .validate_token(&token)
        .await
        .redirect_to("/login")?;

    let user = current_user(&state, &jar);
    Ok(Page::new("reset")
        .local("token", &token)
        .render(jar, user.as_ref()))
}

/// Consume the token and set the new password.
///
/// Input mistakes send the user back to the form; a dead token sends them
/// to the login page.
async fn reset(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    jar: CookieJar,
    Form(form): Form<ResetForm>,
) -> PageResult {
    state
        .password_reset
        .consume_token(&token, &form.password, &form.password2)
        .await
        .map_err(|error| {
            let to = match error {
                AppError::PasswordMismatch | AppError::Validation(_) => format!("/reset/{token}"),
                _ => "/login".to_string(),
            };
            Redirected { error, to }
        })?;

    Ok(success_redirect(
        jar,
        "Your password has been changed, please login!",
        "/login",
    ))
}
