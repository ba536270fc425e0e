// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Lets HTML forms reach PUT and DELETE routes.
//!
//! A `POST /path?_method=DELETE` is handled as `DELETE /path`. Must run
//! before routing, so it wraps the whole router.

use axum::{
    extract::Request,
    http::Method,
    middleware::Next,
    response::Response,
};

const OVERRIDE_PARAM: &str = "_method";

pub async fn method_override(mut request: Request, next: Next) -> Response {
    if request.method() == Method::POST {
        if let Some(method) = override_method(request.uri().query()) {
            tracing::trace!(%method, path = %request.uri().path(), "Method override");
            *request.method_mut() = method;
        }
    }
    next.run(request).await
}

fn override_method(query: Option<&str>) -> Option<Method> {
    let value = query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == OVERRIDE_PARAM)
        .map(|(_, value)| value)?;

    match value.to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}
