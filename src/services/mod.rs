// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod credentials;
pub mod mailer;
pub mod password_reset;
pub mod sessions;

pub use credentials::CredentialStore;
pub use mailer::{Mailer, OutgoingMail};
pub use password_reset::{IssuedToken, PasswordResetService};
pub use sessions::SessionStore;
