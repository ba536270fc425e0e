// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! [`Db`] exposes typed operations on top of either Firestore or the
//! in-process [`MemoryStore`].

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use futures_util::{stream, StreamExt};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::DatabaseUrl;
use crate::error::AppError;
use crate::models::{Ingredient, Owned, Recipe, ResetToken, User};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const RESETS: &str = "resets";
    pub const RECIPES: &str = "recipes";
    pub const INGREDIENTS: &str = "ingredients";
    pub const FAVOURITES: &str = "favourites";
    pub const SCHEDULES: &str = "schedules";
}

/// Equality filter on a string field.
pub type Filter = (&'static str, String);

const MAX_CONCURRENT_DB_OPS: usize = 16;

#[derive(Clone)]
enum Backend {
    Firestore(FirestoreDb),
    Memory(MemoryStore),
}

/// Document database handle, cheap to clone.
#[derive(Clone)]
pub struct Db {
    backend: Backend,
}

impl Db {
    /// Connect to the configured database.
    ///
    /// A Firestore connection failure is logged and yields an offline handle;
    /// the server keeps running and each request fails on its own.
    pub async fn connect(url: &DatabaseUrl) -> Self {
        match url {
            DatabaseUrl::Memory => {
                tracing::warn!("Using in-memory document store, data is lost on restart");
                Self::memory()
            }
            DatabaseUrl::Firestore { project_id } => match FirestoreDb::new(project_id).await {
                Ok(db) => Self::firestore(db),
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        project = %project_id,
                        "Database unreachable at startup"
                    );
                    Self::firestore(FirestoreDb::offline())
                }
            },
        }
    }

    pub fn firestore(db: FirestoreDb) -> Self {
        Self {
            backend: Backend::Firestore(db),
        }
    }

    pub fn memory() -> Self {
        Self::with_store(MemoryStore::new())
    }

    pub fn with_store(store: MemoryStore) -> Self {
        Self {
            backend: Backend::Memory(store),
        }
    }

    /// Handle whose every operation fails.
    pub fn offline() -> Self {
        Self::firestore(FirestoreDb::offline())
    }

    // ─── Generic Operations ──────────────────────────────────────

    async fn get<T>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        match &self.backend {
            Backend::Firestore(db) => db.get(collection, id).await,
            Backend::Memory(store) => store.get(collection, id),
        }
    }

    async fn find<T>(&self, collection: &str, filters: &[Filter]) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        match &self.backend {
            Backend::Firestore(db) => db.find(collection, filters).await,
            Backend::Memory(store) => store.find(collection, filters),
        }
    }

    async fn put<T>(&self, collection: &str, id: &str, doc: &T) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Sync + Send,
    {
        match &self.backend {
            Backend::Firestore(db) => db.put(collection, id, doc).await,
            Backend::Memory(store) => store.put(collection, id, doc),
        }
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.remove(collection, id).await,
            Backend::Memory(store) => store.remove(collection, id).map(|_| ()),
        }
    }

    // ─── User Operations ─────────────────────────────────────────

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get(collections::USERS, user_id).await
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let users: Vec<User> = self
            .find(collections::USERS, &[("username", username.to_string())])
            .await?;
        Ok(users.into_iter().next())
    }

    /// Store a new user, failing if the username is already registered.
    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let filters = [("username", user.username.clone())];
        match &self.backend {
            Backend::Memory(store) => store.transaction(|tx| {
                if !tx.find::<User>(collections::USERS, &filters)?.is_empty() {
                    return Err(AppError::UsernameTaken);
                }
                tx.put(collections::USERS, &user.id, user)
            }),
            Backend::Firestore(db) => {
                let existing: Vec<User> = db.find(collections::USERS, &filters).await?;
                if !existing.is_empty() {
                    return Err(AppError::UsernameTaken);
                }
                db.put(collections::USERS, &user.id, user).await
            }
        }
    }

    pub async fn update_user(&self, user: &User) -> Result<(), AppError> {
        self.put(collections::USERS, &user.id, user).await
    }

    // ─── Reset Token Operations ──────────────────────────────────

    pub async fn insert_reset_token(&self, reset: &ResetToken) -> Result<(), AppError> {
        self.put(collections::RESETS, &reset.id, reset).await
    }

    /// Find the record holding `token`, valid or not.
    pub async fn find_reset_token(&self, token: &str) -> Result<Option<ResetToken>, AppError> {
        let resets: Vec<ResetToken> = self
            .find(collections::RESETS, &[("token", token.to_string())])
            .await?;
        Ok(resets.into_iter().next())
    }

    /// All reset records for a user, including invalidated ones.
    pub async fn reset_tokens_for(&self, username: &str) -> Result<Vec<ResetToken>, AppError> {
        self.find(collections::RESETS, &[("username", username.to_string())])
            .await
    }

    /// Invalidate every outstanding token of a user except the record
    /// `keep_id`. Returns how many were cleared.
    pub async fn supersede_reset_tokens(
        &self,
        username: &str,
        keep_id: &str,
    ) -> Result<usize, AppError> {
        let outstanding: Vec<ResetToken> = self
            .reset_tokens_for(username)
            .await?
            .into_iter()
            .filter(|r| r.token.is_some() && r.id != keep_id)
            .collect();

        for mut reset in outstanding.iter().cloned() {
            reset.invalidate();
            self.put(collections::RESETS, &reset.id, &reset).await?;
        }

        Ok(outstanding.len())
    }

    /// Save the user's new password and invalidate `token` atomically.
    ///
    /// Returns `false` and writes nothing when the token is no longer valid
    /// at `now`, which is what a concurrent consumer that lost the race sees.
    pub async fn commit_password_reset(
        &self,
        user: &User,
        token: &str,
        now: i64,
    ) -> Result<bool, AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.commit_password_reset(user, token, now).await,
            Backend::Memory(store) => store.transaction(|tx| {
                let current: Vec<ResetToken> =
                    tx.find(collections::RESETS, &[("token", token.to_string())])?;
                let Some(mut reset) = current.into_iter().find(|r| r.is_valid(now)) else {
                    return Ok(false);
                };
                reset.invalidate();
                tx.put(collections::USERS, &user.id, user)?;
                tx.put(collections::RESETS, &reset.id, &reset)?;
                Ok(true)
            }),
        }
    }

    // ─── Owned Record Operations ─────────────────────────────────

    /// All records of kind `T` belonging to `owner_id`.
    pub async fn list_owned<T: Owned>(&self, owner_id: &str) -> Result<Vec<T>, AppError> {
        self.find(T::COLLECTION, &[("owner_id", owner_id.to_string())])
            .await
    }

    /// Fetch a record, checking that `owner_id` owns it.
    pub async fn get_owned<T: Owned>(&self, owner_id: &str, id: &str) -> Result<T, AppError> {
        let record: T = self
            .get(T::COLLECTION, id)
            .await?
            .ok_or_else(|| AppError::NotFound(T::KIND.to_string()))?;
        if record.owner_id() != owner_id {
            return Err(AppError::Forbidden(T::KIND.to_string()));
        }
        Ok(record)
    }

    pub async fn create_owned<T: Owned>(&self, record: &T) -> Result<(), AppError> {
        self.put(T::COLLECTION, record.id(), record).await
    }

    /// Replace a record after checking that its stored owner matches.
    pub async fn update_owned<T: Owned>(&self, record: &T) -> Result<(), AppError> {
        self.get_owned::<T>(record.owner_id(), record.id()).await?;
        self.put(T::COLLECTION, record.id(), record).await
    }

    /// Delete a record owned by `owner_id`.
    pub async fn delete_owned<T: Owned>(&self, owner_id: &str, id: &str) -> Result<T, AppError> {
        let record = self.get_owned::<T>(owner_id, id).await?;
        self.remove(T::COLLECTION, id).await?;
        Ok(record)
    }

    /// Ingredients of one recipe.
    pub async fn list_ingredients(
        &self,
        owner_id: &str,
        recipe_id: &str,
    ) -> Result<Vec<Ingredient>, AppError> {
        self.find(
            collections::INGREDIENTS,
            &[
                ("owner_id", owner_id.to_string()),
                ("recipe_id", recipe_id.to_string()),
            ],
        )
        .await
    }

    /// Delete a recipe together with its ingredients.
    ///
    /// Returns the number of ingredients removed.
    pub async fn delete_recipe(&self, owner_id: &str, recipe_id: &str) -> Result<usize, AppError> {
        let recipe = self.get_owned::<Recipe>(owner_id, recipe_id).await?;
        let ingredients = self.list_ingredients(owner_id, &recipe.id).await?;
        let count = ingredients.len();

        stream::iter(ingredients)
            .map(|ingredient| async move {
                self.remove(collections::INGREDIENTS, &ingredient.id).await
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(), AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>, AppError>>()?;

        self.remove(collections::RECIPES, &recipe.id).await?;

        tracing::debug!(recipe_id, count, "Deleted recipe and its ingredients");
        Ok(count)
    }
}
