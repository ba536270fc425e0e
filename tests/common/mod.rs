// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use recipe_box::config::Config;
use recipe_box::db::firestore::FirestoreDb;
use recipe_box::db::Db;
use recipe_box::routes::create_router;
use recipe_box::services::Mailer;
use recipe_box::AppState;
use std::sync::Arc;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a database connected to the emulator.
#[allow(dead_code)]
pub async fn test_db() -> Db {
    Db::firestore(
        FirestoreDb::new("test-project")
            .await
            .expect("Failed to connect to Firestore emulator"),
    )
}

/// Create a test app on the in-memory store with an outbox mailer.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with_config(Config::default())
}

#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (Router, Arc<AppState>) {
    let mailer = Mailer::outbox(&config.mail_from);
    let state = Arc::new(AppState::new(config, Db::memory(), mailer));
    (create_router(state.clone()), state)
}

/// Build a request, optionally with a form body and session cookie.
#[allow(dead_code)]
pub fn request(method: &str, uri: &str, form: Option<&str>, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match form {
        Some(form) => builder
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request through a clone of the app.
#[allow(dead_code)]
pub async fn send(app: &Router, req: Request<Body>) -> Response {
    app.clone().oneshot(req).await.unwrap()
}

#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

#[allow(dead_code)]
pub fn find_cookie(response: &Response, name: &str) -> Option<String> {
    set_cookie_headers(response)
        .into_iter()
        .find(|value| value.starts_with(&format!("{name}=")))
}

/// `name=value` pair to send back in a Cookie header.
#[allow(dead_code)]
pub fn cookie_pair(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Where a 303 response points.
#[allow(dead_code)]
pub fn location(response: &Response) -> String {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect without Location")
        .to_str()
        .unwrap()
        .to_string()
}

/// The flash notice a response queues, as `(level, message)`.
#[allow(dead_code)]
pub fn flash(response: &Response) -> Option<(String, String)> {
    let cookie = find_cookie(response, "recipe_flash")?;
    let pair = cookie_pair(&cookie);
    // The jar percent-encodes the whole value, separator included
    let value = urlencoding::decode(pair.trim_start_matches("recipe_flash=")).ok()?;
    let (level, message) = value.split_once(':')?;
    Some((level.to_string(), message.to_string()))
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Sign up and return the session cookie pair.
#[allow(dead_code)]
pub async fn signup(app: &Router, username: &str, password: &str) -> String {
    let form = format!(
        "username={}&password={}",
        urlencoding::encode(username),
        urlencoding::encode(password)
    );
    let response = send(app, request("POST", "/signup", Some(&form), None)).await;
    assert_eq!(location(&response), "/dashboard");
    cookie_pair(&find_cookie(&response, "recipe_session").expect("no session cookie"))
}

/// Log in and return the response.
#[allow(dead_code)]
pub async fn login(app: &Router, username: &str, password: &str) -> Response {
    let form = format!(
        "username={}&password={}",
        urlencoding::encode(username),
        urlencoding::encode(password)
    );
    send(app, request("POST", "/login", Some(&form), None)).await
}
