// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use serde::{Deserialize, Serialize};

use super::Owned;
use crate::db::collections;

/// A meal planned for a given day and time.
///
/// Date and time are kept exactly as the user typed them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub recipe_name: String,
    pub schedule_date: String,
    pub time: String,
    pub owner_id: String,
}

impl Owned for Schedule {
    const COLLECTION: &'static str = collections::SCHEDULES;
    const KIND: &'static str = "schedule";

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}
