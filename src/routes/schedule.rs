// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Meal schedule.

use axum::{
    extract::{Path, State},
    response::Response,
    routing::{delete, get},
    Extension, Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use super::success_redirect;
use crate::error::{PageResult, RedirectExt};
use crate::middleware::auth::AuthUser;
use crate::models::Schedule;
use crate::services::credentials::new_id;
use crate::views::Page;
use crate::AppState;

const SCHEDULE_PAGE: &str = "/dashboard/schedule";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(SCHEDULE_PAGE, get(list_schedule).post(create_schedule))
        .route("/dashboard/schedule/newschedule", get(new_schedule_page))
        .route("/dashboard/schedule/{id}", delete(delete_schedule))
}

#[derive(Debug, Deserialize)]
pub struct ScheduleForm {
    #[serde(default)]
    pub receipename: String,
    /// Date as typed into the form, kept verbatim
    #[serde(default, rename = "scheduleDate")]
    pub schedule_date: String,
    #[serde(default)]
    pub time: String,
}

async fn list_schedule(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    jar: CookieJar,
) -> PageResult {
    let mut schedule = state
        .db
        .list_owned::<Schedule>(&user.user_id)
        .await
        .redirect_to("/dashboard")?;
    schedule.sort_by(|a, b| {
        (a.schedule_date.as_str(), a.time.as_str())
            .cmp(&(b.schedule_date.as_str(), b.time.as_str()))
    });

    Ok(Page::new("schedule")
        .local("schedule", &schedule)
        .render(jar, Some(&user)))
}

async fn new_schedule_page(Extension(user): Extension<AuthUser>, jar: CookieJar) -> Response {
    Page::new("newschedule").render(jar, Some(&user))
}

async fn create_schedule(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    jar: CookieJar,
    Form(form): Form<ScheduleForm>,
) -> PageResult {
    let schedule = Schedule {
        id: new_id().redirect_to(SCHEDULE_PAGE)?,
        recipe_name: form.receipename,
        schedule_date: form.schedule_date,
        time: form.time,
        owner_id: user.user_id,
    };
    state
        .db
        .create_owned(&schedule)
        .await
        .redirect_to(SCHEDULE_PAGE)?;

    Ok(success_redirect(
        jar,
        "you just added a new schedule!",
        SCHEDULE_PAGE,
    ))
}

async fn delete_schedule(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> PageResult {
    state
        .db
        .delete_owned::<Schedule>(&user.user_id, &id)
        .await
        .redirect_to(SCHEDULE_PAGE)?;

    Ok(success_redirect(
        jar,
        "your schedule has been deleted!",
        SCHEDULE_PAGE,
    ))
}
