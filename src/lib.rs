// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recipe Box: a personal recipe organizer.
//!
//! Users keep recipes with their ingredients, a list of favourite dishes and
//! a cooking schedule. Accounts use local username/password login with an
//! emailed, single-use password reset link.

pub mod config;
pub mod db;
pub mod error;
pub mod flash;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod views;

use config::Config;
use db::Db;
use services::{CredentialStore, Mailer, PasswordResetService, SessionStore};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub sessions: SessionStore,
    pub credentials: CredentialStore,
    pub password_reset: PasswordResetService,
    pub mailer: Mailer,
}

impl AppState {
    /// Wire the services together around one database and mailer.
    pub fn new(config: Config, db: Db, mailer: Mailer) -> Self {
        let session_ttl = chrono::Duration::try_hours(config.session_ttl_hours)
            .unwrap_or(chrono::Duration::MAX);
        let sessions = SessionStore::new(session_ttl);
        let credentials = CredentialStore::new(db.clone());
        let password_reset = PasswordResetService::new(
            db.clone(),
            mailer.clone(),
            &config.base_url,
            config.reset_token_ttl_secs,
        );

        Self {
            config,
            db,
            sessions,
            credentials,
            password_reset,
            mailer,
        }
    }
}
