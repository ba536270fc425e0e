// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! Every failure reaches the browser the same way: a redirect carrying a
//! one-shot notice. Handlers pick the redirect target with
//! [`RedirectExt::redirect_to`].

use axum::http::HeaderValue;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use crate::flash::{self, Level};

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Not allowed to modify {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Reset token expired or not found")]
    TokenExpiredOrNotFound,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Username already registered")]
    UsernameTaken,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Mail delivery error: {0}")]
    Mail(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Text shown to the user in the flash notice.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthenticated => "Please login first!".to_string(),
            AppError::Forbidden(what) => format!("You are not allowed to change this {what}!"),
            AppError::NotFound(what) => format!("{what} not found!"),
            AppError::UserNotFound => "User not found with this email!".to_string(),
            AppError::TokenExpiredOrNotFound => "Token expired!".to_string(),
            AppError::PasswordMismatch => "Passwords do not match!".to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::UsernameTaken => {
                "A user with the given username is already registered".to_string()
            }
            AppError::InvalidCredentials => "Invalid username or password".to_string(),
            AppError::Mail(_) => "We could not send the email, please try again".to_string(),
            AppError::Database(_) | AppError::Internal(_) => {
                "Something went wrong, please try again".to_string()
            }
        }
    }

    /// Default redirect target when the handler did not choose one.
    fn default_target(&self) -> &'static str {
        match self {
            AppError::Unauthenticated
            | AppError::InvalidCredentials
            | AppError::TokenExpiredOrNotFound => "/login",
            _ => "/",
        }
    }

    fn log(&self) {
        match self {
            AppError::Database(msg) => tracing::error!(error = %msg, "Database error"),
            AppError::Mail(msg) => tracing::error!(error = %msg, "Mail delivery failed"),
            AppError::Internal(err) => tracing::error!(error = %err, "Internal server error"),
            AppError::Forbidden(_) => tracing::warn!(error = %self, "Ownership check failed"),
            _ => tracing::debug!(error = %self, "Request rejected"),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .iter()
            .flat_map(|(_, errs)| errs.iter())
            .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid input".to_string());

        AppError::Validation(message)
    }
}

/// An error paired with the page the user is sent back to.
#[derive(Debug)]
pub struct Redirected {
    pub error: AppError,
    pub to: String,
}

impl IntoResponse for Redirected {
    fn into_response(self) -> Response {
        self.error.log();
        let jar = flash::set(CookieJar::new(), Level::Error, &self.error.user_message());
        // Targets built from request input may not fit in a header
        let to = match HeaderValue::from_str(&self.to) {
            Ok(_) => self.to.as_str(),
            Err(_) => self.error.default_target(),
        };
        (jar, Redirect::to(to)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let to = self.default_target().to_string();
        Redirected { error: self, to }.into_response()
    }
}

/// Attach a redirect target to a failed operation.
pub trait RedirectExt<T> {
    fn redirect_to(self, to: impl Into<String>) -> std::result::Result<T, Redirected>;
}

impl<T> RedirectExt<T> for Result<T> {
    fn redirect_to(self, to: impl Into<String>) -> std::result::Result<T, Redirected> {
        self.map_err(|error| Redirected {
            error,
            to: to.into(),
        })
    }
}

/// Result type alias for services and the database layer
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for page handlers
pub type PageResult<T = Response> = std::result::Result<T, Redirected>;
