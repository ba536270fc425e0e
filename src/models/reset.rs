// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Password reset token records.

use serde::{Deserialize, Serialize};

/// A password reset request, stored in the `resets` collection.
///
/// Consumed and superseded records keep their document but have both
/// `token` and `expires_at` cleared, so they never match a lookup again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetToken {
    /// Opaque document id
    pub id: String,
    /// Username the token was issued for
    pub username: String,
    /// Hex encoded random token, `None` once invalidated
    pub token: Option<String>,
    /// Expiry as unix milliseconds, `None` once invalidated
    pub expires_at: Option<i64>,
}

impl ResetToken {
    /// Whether this record can still be used at `now` (unix millis).
    pub fn is_valid(&self, now: i64) -> bool {
        self.token.is_some() && self.expires_at.is_some_and(|exp| exp > now)
    }

    /// Clear the token so it can never be presented again.
    pub fn invalidate(&mut self) {
        self.token = None;
        self.expires_at = None;
    }
}
