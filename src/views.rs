// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page view models.
//!
//! Handlers describe a page by name plus the values it displays; the
//! front end owns the markup. Rendering consumes any pending flash notice.

use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::flash::{self, Level};
use crate::middleware::auth::AuthUser;

#[derive(Debug, Serialize)]
struct CurrentUserView<'a> {
    id: &'a str,
    username: &'a str,
}

#[derive(Debug, Serialize)]
struct PageBody<'a> {
    view: &'static str,
    current_user: Option<CurrentUserView<'a>>,
    error: Option<String>,
    success: Option<String>,
    #[serde(flatten)]
    locals: Map<String, Value>,
}

/// A page to render.
#[derive(Debug)]
pub struct Page {
    view: &'static str,
    locals: Map<String, Value>,
}

impl Page {
    pub fn new(view: &'static str) -> Self {
        Self {
            view,
            locals: Map::new(),
        }
    }

    /// Add a value the page displays.
    pub fn local(mut self, key: &str, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value).unwrap_or_else(|e| {
            tracing::error!(key, error = %e, "Failed to serialize page value");
            Value::Null
        });
        self.locals.insert(key.to_string(), value);
        self
    }

    pub fn render(self, jar: CookieJar, user: Option<&AuthUser>) -> Response {
        let (jar, notice) = flash::take(jar);
        let (error, success) = match notice {
            Some(n) if n.level == Level::Error => (Some(n.message), None),
            Some(n) => (None, Some(n.message)),
            None => (None, None),
        };

        let body = PageBody {
            view: self.view,
            current_user: user.map(|u| CurrentUserView {
                id: &u.user_id,
                username: &u.username,
            }),
            error,
            success,
            locals: self.locals,
        };

        (jar, Json(body)).into_response()
    }
}
