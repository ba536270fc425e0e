// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recipes and their ingredients.
//!
//! All routes here sit behind the auth guard and only ever touch records
//! owned by the logged-in user.

use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, post, put},
    Extension, Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use super::success_redirect;
use crate::db::Db;
use crate::error::{AppError, PageResult, RedirectExt, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Ingredient, Recipe};
use crate::services::credentials::new_id;
use crate::views::Page;
use crate::AppState;

const RECIPES_PAGE: &str = "/dashboard/myreceipes";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(RECIPES_PAGE, get(list_recipes))
        .route(
            "/dashboard/newreceipe",
            get(new_recipe_page).post(create_recipe),
        )
        .route(
            "/dashboard/myreceipes/{id}",
            get(show_recipe).post(create_ingredient).delete(delete_recipe),
        )
        .route(
            "/dashboard/myreceipes/{id}/newingredient",
            get(new_ingredient_page),
        )
        .route(
            "/dashboard/myreceipes/{id}/{ingredient_id}",
            put(update_ingredient).delete(delete_ingredient),
        )
        .route(
            "/dashboard/myreceipes/{id}/{ingredient_id}/edit",
            post(edit_ingredient_page),
        )
}

#[derive(Debug, Deserialize)]
pub struct RecipeForm {
    #[serde(default)]
    pub receipe: String,
    /// Image URL
    #[serde(default)]
    pub logo: String,
}

#[derive(Debug, Deserialize)]
pub struct IngredientForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dish: String,
    #[serde(default)]
    pub quantity: String,
}

/// Page of a loaded recipe. Ids taken straight from the path may not be
/// valid in a Location header.
fn recipe_page(recipe_id: &str) -> String {
    format!("{RECIPES_PAGE}/{recipe_id}")
}

/// An ingredient of `recipe_id` owned by `owner_id`.
async fn owned_ingredient(
    db: &Db,
    owner_id: &str,
    recipe_id: &str,
    ingredient_id: &str,
) -> Result<Ingredient> {
    let ingredient = db.get_owned::<Ingredient>(owner_id, ingredient_id).await?;
    if ingredient.recipe_id != recipe_id {
        return Err(AppError::NotFound("ingredient".to_string()));
    }
    Ok(ingredient)
}

// ─── Recipes ─────────────────────────────────────────────────

async fn list_recipes(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    jar: CookieJar,
) -> PageResult {
    let recipes = state
        .db
        .list_owned::<Recipe>(&user.user_id)
        .await
        .redirect_to("/dashboard")?;

    Ok(Page::new("receipe")
        .local("receipe", &recipes)
        .render(jar, Some(&user)))
}

async fn new_recipe_page(Extension(user): Extension<AuthUser>, jar: CookieJar) -> Response {
    Page::new("newreceipe").render(jar, Some(&user))
}

async fn create_recipe(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    jar: CookieJar,
    Form(form): Form<RecipeForm>,
) -> PageResult {
    let recipe = Recipe {
        id: new_id().redirect_to("/dashboard/newreceipe")?,
        name: form.receipe,
        image: form.logo,
        owner_id: user.user_id.clone(),
    };
    state
        .db
        .create_owned(&recipe)
        .await
        .redirect_to("/dashboard/newreceipe")?;

    tracing::info!(user_id = %user.user_id, recipe_id = %recipe.id, "Recipe created");
    Ok(success_redirect(jar, "new receipe added!", RECIPES_PAGE))
}

/// Recipe detail page listing its ingredients.
async fn show_recipe(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> PageResult {
    let recipe = state
        .db
        .get_owned::<Recipe>(&user.user_id, &id)
        .await
        .redirect_to(RECIPES_PAGE)?;
    let ingredients = state
        .db
        .list_ingredients(&user.user_id, &id)
        .await
        .redirect_to(RECIPES_PAGE)?;

    Ok(Page::new("ingredients")
        .local("receipe", &recipe)
        .local("ingredient", &ingredients)
        .render(jar, Some(&user)))
}

/// Delete a recipe and its ingredients.
async fn delete_recipe(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> PageResult {
    let removed = state
        .db
        .delete_recipe(&user.user_id, &id)
        .await
        .redirect_to(RECIPES_PAGE)?;

    tracing::info!(
        user_id = %user.user_id,
        recipe_id = %id,
        ingredients = removed,
        "Recipe deleted"
    );
    Ok(success_redirect(jar, "the receipe has been deleted", RECIPES_PAGE))
}

// ─── Ingredients ─────────────────────────────────────────────

async fn new_ingredient_page(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> PageResult {
    let recipe = state
        .db
        .get_owned::<Recipe>(&user.user_id, &id)
        .await
        .redirect_to(RECIPES_PAGE)?;

    Ok(Page::new("newingredient")
        .local("receipe", &recipe)
        .render(jar, Some(&user)))
}

async fn create_ingredient(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    jar: CookieJar,
    Form(form): Form<IngredientForm>,
) -> PageResult {
    // The parent must exist and belong to the caller
    let recipe = state
        .db
        .get_owned::<Recipe>(&user.user_id, &id)
        .await
        .redirect_to(RECIPES_PAGE)?;

    let ingredient = Ingredient {
        id: new_id().redirect_to(recipe_page(&recipe.id))?,
        name: form.name,
        best_dish: form.dish,
        quantity: form.quantity,
        owner_id: user.user_id.clone(),
        recipe_id: recipe.id.clone(),
    };
    state
        .db
        .create_owned(&ingredient)
        .await
        .redirect_to(recipe_page(&recipe.id))?;

    Ok(success_redirect(
        jar,
        "your ingredient has been added!",
        &recipe_page(&recipe.id),
    ))
}

/// Edit form for one ingredient.
async fn edit_ingredient_page(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((id, ingredient_id)): Path<(String, String)>,
    jar: CookieJar,
) -> PageResult {
    let recipe = state
        .db
        .get_owned::<Recipe>(&user.user_id, &id)
        .await
        .redirect_to(RECIPES_PAGE)?;
    let ingredient = owned_ingredient(&state.db, &user.user_id, &recipe.id, &ingredient_id)
        .await
        .redirect_to(recipe_page(&recipe.id))?;

    Ok(Page::new("edit")
        .local("receipe", &recipe)
        .local("ingredient", &ingredient)
        .render(jar, Some(&user)))
}

/// Replace the editable fields of an ingredient.
async fn update_ingredient(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((id, ingredient_id)): Path<(String, String)>,
    jar: CookieJar,
    Form(form): Form<IngredientForm>,
) -> PageResult {
    let mut ingredient = owned_ingredient(&state.db, &user.user_id, &id, &ingredient_id)
        .await
        .redirect_to(RECIPES_PAGE)?;
    let back = recipe_page(&ingredient.recipe_id);

    ingredient.name = form.name;
    ingredient.best_dish = form.dish;
    ingredient.quantity = form.quantity;

    state
        .db
        .update_owned(&ingredient)
        .await
        .redirect_to(back.as_str())?;

    Ok(success_redirect(jar, "Successfully updated ingredient!", &back))
}

async fn delete_ingredient(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((id, ingredient_id)): Path<(String, String)>,
    jar: CookieJar,
) -> PageResult {
    let ingredient = owned_ingredient(&state.db, &user.user_id, &id, &ingredient_id)
        .await
        .redirect_to(RECIPES_PAGE)?;
    let back = recipe_page(&ingredient.recipe_id);
    state
        .db
        .delete_owned::<Ingredient>(&user.user_id, &ingredient.id)
        .await
        .redirect_to(back.as_str())?;

    Ok(success_redirect(jar, "your ingredient has been deleted!", &back))
}
