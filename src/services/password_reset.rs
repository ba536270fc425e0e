// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Password reset by emailed single-use token.
//!
//! A token moves through `issued → valid → consumed` or expires after the
//! configured lifetime. Lookups only ever match valid tokens, so "never
//! issued", "expired" and "already used" all fail as
//! [`AppError::TokenExpiredOrNotFound`].

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::ResetToken;
use crate::services::credentials::{self, new_id, random_hex};
use crate::services::mailer::Mailer;
use crate::time_utils::{format_millis, now_millis};

/// Bytes of randomness in a reset token.
pub const TOKEN_BYTES: usize = 32;

/// Per-token locks serialising consumption within this process.
pub type ConsumeLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

/// A freshly issued token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Unix milliseconds
    pub expires_at: i64,
}

#[derive(Clone)]
pub struct PasswordResetService {
    db: Db,
    mailer: Mailer,
    base_url: String,
    ttl_millis: i64,
    consume_locks: ConsumeLocks,
}

impl PasswordResetService {
    pub fn new(db: Db, mailer: Mailer, base_url: &str, ttl_secs: i64) -> Self {
        Self {
            db,
            mailer,
            base_url: base_url.trim_end_matches('/').to_string(),
            ttl_millis: ttl_secs.saturating_mul(1000),
            consume_locks: Arc::new(DashMap::new()),
        }
    }

    /// Link the user follows to reach the reset form.
    pub fn reset_link(&self, token: &str) -> String {
        format!("{}/reset/{}", self.base_url, token)
    }

    /// Issue a token for `username` and email the reset link.
    ///
    /// Earlier outstanding tokens of the user are invalidated first. The mail
    /// is only sent once the new token is stored.
    pub async fn issue_token(&self, username: &str) -> Result<IssuedToken> {
        let user = self
            .db
            .find_user_by_username(username)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let token = random_hex(TOKEN_BYTES)?;
        let expires_at = now_millis().saturating_add(self.ttl_millis);

        // A failed insert must leave the earlier links valid
        let reset = ResetToken {
            id: new_id()?,
            username: user.username.clone(),
            token: Some(token.clone()),
            expires_at: Some(expires_at),
        };
        self.db.insert_reset_token(&reset).await?;

        let superseded = self
            .db
            .supersede_reset_tokens(&user.username, &reset.id)
            .await?;

        tracing::info!(
            user_id = %user.id,
            superseded,
            expires_at = %format_millis(expires_at).unwrap_or_default(),
            "Password reset token issued"
        );

        self.mailer
            .send_reset_link(&user.username, &self.reset_link(&token))
            .await?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Username behind a still-valid token.
    pub async fn validate_token(&self, token: &str) -> Result<String> {
        self.find_valid(token).await.map(|reset| reset.username)
    }

    async fn find_valid(&self, token: &str) -> Result<ResetToken> {
        self.db
            .find_reset_token(token)
            .await?
            .filter(|reset| reset.is_valid(now_millis()))
            .ok_or(AppError::TokenExpiredOrNotFound)
    }

    /// Set a new password using `token`, which is invalidated on success.
    ///
    /// Returns the username whose password changed. Of two concurrent calls
    /// with the same token at most one succeeds.
    pub async fn consume_token(
        &self,
        token: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<String> {
        let lock = self
            .consume_locks
            .entry(token.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = {
            let _guard = lock.lock().await;
            self.consume_locked(token, password, confirmation).await
        };

        // The map and `lock` hold two references; any more are waiters
        self.consume_locks
            .remove_if(token, |_, held| Arc::strong_count(held) <= 2);
        drop(lock);
        result
    }

    async fn consume_locked(
        &self,
        token: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<String> {
        let reset = self.find_valid(token).await?;

        if password != confirmation {
            return Err(AppError::PasswordMismatch);
        }
        if password.is_empty() {
            return Err(AppError::Validation("Password must not be empty".to_string()));
        }

        let mut user = self
            .db
            .find_user_by_username(&reset.username)
            .await?
            .ok_or(AppError::UserNotFound)?;

        credentials::set_password(&mut user, password)?;

        // Conditional on the token still being valid at write time
        if !self.db.commit_password_reset(&user, token, now_millis()).await? {
            return Err(AppError::TokenExpiredOrNotFound);
        }

        tracing::info!(user_id = %user.id, "Password reset completed");
        Ok(user.username)
    }
}
