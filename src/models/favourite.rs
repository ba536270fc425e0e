// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use serde::{Deserialize, Serialize};

use super::Owned;
use crate::db::collections;

/// A recipe the user bookmarked from elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favourite {
    pub id: String,
    pub image: String,
    pub title: String,
    pub description: String,
    pub owner_id: String,
}

impl Owned for Favourite {
    const COLLECTION: &'static str = collections::FAVOURITES;
    const KIND: &'static str = "favourite";

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}
