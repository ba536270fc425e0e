// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favourite dishes.

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
use crate::models::Favourite;
use crate::services::credentials::new_id;
use crate::views::Page;
use crate::AppState;

const FAVOURITES_PAGE: &str = "/dashboard/favourites";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(FAVOURITES_PAGE, get(list_favourites).post(create_favourite))
        .route(
            "/dashboard/favourites/newfavourite",
            get(new_favourite_page),
        )
        .route("/dashboard/favourites/{id}", delete(delete_favourite))
}

#[derive(Debug, Deserialize)]
pub struct FavouriteForm {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

async fn list_favourites(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    jar: CookieJar,
) -> PageResult {
    let favourites = state
        .db
        .list_owned::<Favourite>(&user.user_id)
        .await
        .redirect_to("/dashboard")?;

    Ok(Page::new("favourites")
        .local("favourite", &favourites)
        .render(jar, Some(&user)))
}

async fn new_favourite_page(Extension(user): Extension<AuthUser>, jar: CookieJar) -> Response {
    Page::new("newfavourite").render(jar, Some(&user))
}

async fn create_favourite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    jar: CookieJar,
    Form(form): Form<FavouriteForm>,
) -> PageResult {
    let favourite = Favourite {
        id: new_id().redirect_to(FAVOURITES_PAGE)?,
        image: form.image,
        title: form.title,
        description: form.description,
        owner_id: user.user_id,
    };
    state
        .db
        .create_owned(&favourite)
        .await
        .redirect_to(FAVOURITES_PAGE)?;

    Ok(success_redirect(
        jar,
        "you just added a new fav!",
        FAVOURITES_PAGE,
    ))
}

async fn delete_favourite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> PageResult {
    state
        .db
        .delete_owned::<Favourite>(&user.user_id, &id)
        .await
        .redirect_to(FAVOURITES_PAGE)?;

    Ok(success_redirect(
        jar,
        "your fav has been deleted!",
        FAVOURITES_PAGE,
    ))
}
