// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-side login sessions.
//!
//! The browser only holds a random session id; who is logged in lives here.
//! Sessions are per process and do not survive a restart.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::User;
use crate::services::credentials::random_hex;

/// Bytes of randomness in a session id.
const SESSION_ID_BYTES: usize = 32;

#[derive(Debug, Clone)]
struct Session {
    user: AuthUser,
    expires_at: DateTime<Utc>,
}

/// Concurrent session map shared by all requests.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Start a session for `user` and return its id.
    pub fn login(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        // Drop expired sessions so the map does not grow without bound
        self.sessions.retain(|_, s| s.expires_at > now);

        let id = random_hex(SESSION_ID_BYTES)?;
        self.sessions.insert(
            id.clone(),
            Session {
                user: AuthUser {
                    user_id: user.id.clone(),
                    username: user.username.clone(),
                },
                expires_at: now
                    .checked_add_signed(self.ttl)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            },
        );
        tracing::debug!(user_id = %user.id, active = self.count(), "Session started");
        Ok(id)
    }

    /// The user behind a session id, if the session is live.
    pub fn authenticated(&self, session_id: &str) -> Option<AuthUser> {
        let now = Utc::now();
        let live = self
            .sessions
            .get(session_id)
            .map(|s| (s.expires_at > now).then(|| s.user.clone()))?;
        if live.is_none() {
            self.sessions.remove(session_id);
        }
        live
    }

    /// End a session. Unknown ids are ignored.
    pub fn logout(&self, session_id: &str) {
        if let Some((_, session)) = self.sessions.remove(session_id) {
            tracing::debug!(
                user_id = %session.user.user_id,
                active = self.count(),
                "Session ended"
            );
        }
    }

    /// Number of sessions held, including expired ones not yet swept.
    pub fn count(&self) -> usize {
        self.sessions.len()
    }
}
