// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod favourite;
pub mod recipe;
pub mod reset;
pub mod schedule;
pub mod user;

use serde::{de::DeserializeOwned, Serialize};

pub use favourite::Favourite;
pub use recipe::{Ingredient, Recipe};
pub use reset::ResetToken;
pub use schedule::Schedule;
pub use user::User;

/// A record that belongs to exactly one user.
pub trait Owned: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection the records live in
    const COLLECTION: &'static str;
    /// Name used in user-facing messages
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn owner_id(&self) -> &str;
}
