// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (authentication, security, etc.).

pub mod auth;
pub mod method_override;
pub mod security;

pub use auth::{current_user, require_auth, AuthUser};
pub use method_override::method_override;
