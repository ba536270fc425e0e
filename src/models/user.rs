// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage.

use serde::{Deserialize, Serialize};

/// Registered user, stored in the `users` collection keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque document id, used as owner id on every owned record
    pub id: String,
    /// Login name (email address), unique
    pub username: String,
    /// PBKDF2-HMAC-SHA256 of the password (hex)
    pub password_hash: String,
    /// Per-user random salt (hex)
    pub salt: String,
    /// When the account was created (ISO 8601)
    pub created_at: String,
}
