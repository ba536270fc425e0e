// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recipes and their ingredients.

use serde::{Deserialize, Serialize};

use super::Owned;
use crate::db::collections;

/// A user's recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    /// Image URL shown with the recipe
    pub image: String,
    pub owner_id: String,
}

/// An ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    /// Dish the ingredient works best in
    pub best_dish: String,
    pub quantity: String,
    pub owner_id: String,
    /// Parent recipe
    pub recipe_id: String,
}

impl Owned for Recipe {
    const COLLECTION: &'static str = collections::RECIPES;
    const KIND: &'static str = "recipe";

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl Owned for Ingredient {
    const COLLECTION: &'static str = collections::INGREDIENTS;
    const KIND: &'static str = "ingredient";

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}
