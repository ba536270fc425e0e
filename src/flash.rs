// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! One-shot notices carried across a redirect in a short-lived cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;

/// Cookie holding the pending notice.
pub const FLASH_COOKIE: &str = "recipe_flash";

/// Notices older than this are dropped by the browser.
const FLASH_MAX_AGE_MINUTES: i64 = 5;

/// Kind of notice, selects the template slot it is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Error => "error",
        }
    }
}

/// A notice waiting to be shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

/// Build the cookie that carries `message` to the next page.
///
/// The jar percent-encodes values on the way out and decodes them on the
/// way in, so the message is stored as is.
pub fn cookie(level: Level, message: &str) -> Cookie<'static> {
    let value = format!("{}:{}", level.as_str(), message);
    Cookie::build((FLASH_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(FLASH_MAX_AGE_MINUTES))
        .build()
}

/// Queue a notice for the next rendered page.
pub fn set(jar: CookieJar, level: Level, message: &str) -> CookieJar {
    jar.add(cookie(level, message))
}

/// Queue a success notice.
pub fn success(jar: CookieJar, message: &str) -> CookieJar {
    set(jar, Level::Success, message)
}

/// Read and clear the pending notice.
pub fn take(jar: CookieJar) -> (CookieJar, Option<Notice>) {
    let Some(value) = jar.get(FLASH_COOKIE).map(|c| c.value().to_string()) else {
        return (jar, None);
    };
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), parse(&value))
}

fn parse(value: &str) -> Option<Notice> {
    let (level, message) = value.split_once(':')?;
    let level = match level {
        "success" => Level::Success,
        "error" => Level::Error,
        _ => return None,
    };
    Some(Notice {
        level,
        message: message.to_string(),
    })
}
