// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential store: salted password hashes and random identifiers.
//!
//! Passwords are derived with PBKDF2-HMAC-SHA256 and a per-user random salt.
//! Verification goes through `ring::pbkdf2::verify`, which compares in
//! constant time.

use std::num::NonZeroU32;

use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::time_utils::format_utc_rfc3339;

static PBKDF2_ALG: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;
const PBKDF2_ITERATIONS: NonZeroU32 = match NonZeroU32::new(100_000) {
    Some(n) => n,
    None => unreachable!(),
};
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;
const ID_LEN: usize = 16;

/// `len` random bytes from the OS generator, hex encoded.
pub fn random_hex(len: usize) -> Result<String> {
    let mut bytes = vec![0u8; len];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("System random source failed")))?;
    Ok(hex::encode(bytes))
}

/// Fresh opaque document id.
pub fn new_id() -> Result<String> {
    random_hex(ID_LEN)
}

/// Hex encoded salt and derived key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    pub salt: String,
    pub hash: String,
}

/// Derive a new salted hash for `password`.
pub fn hash_password(password: &str) -> Result<PasswordHash> {
    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("System random source failed")))?;

    let mut hash = [0u8; HASH_LEN];
    pbkdf2::derive(
        PBKDF2_ALG,
        PBKDF2_ITERATIONS,
        &salt,
        password.as_bytes(),
        &mut hash,
    );

    Ok(PasswordHash {
        salt: hex::encode(salt),
        hash: hex::encode(hash),
    })
}

/// Check `password` against a stored salt and hash.
pub fn verify_password(password: &str, salt_hex: &str, hash_hex: &str) -> bool {
    let (Ok(salt), Ok(hash)) = (hex::decode(salt_hex), hex::decode(hash_hex)) else {
        return false;
    };
    pbkdf2::verify(
        PBKDF2_ALG,
        PBKDF2_ITERATIONS,
        &salt,
        password.as_bytes(),
        &hash,
    )
    .is_ok()
}

/// Replace the user's password hash in place. The caller persists the user.
pub fn set_password(user: &mut User, password: &str) -> Result<()> {
    let derived = hash_password(password)?;
    user.salt = derived.salt;
    user.password_hash = derived.hash;
    Ok(())
}

/// Registers and authenticates users against the `users` collection.
#[derive(Clone)]
pub struct CredentialStore {
    db: Db,
}

impl CredentialStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Create an account. Fails with `UsernameTaken` if the name exists.
    pub async fn register(&self, username: &str, password: &str) -> Result<User> {
        let derived = hash_password(password)?;
        let user = User {
            id: new_id()?,
            username: username.to_string(),
            password_hash: derived.hash,
            salt: derived.salt,
            created_at: format_utc_rfc3339(chrono::Utc::now()),
        };

        self.db.insert_user(&user).await?;
        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Look up a user and check the password.
    ///
    /// Unknown usernames and wrong passwords are reported the same way.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let Some(user) = self.db.find_user_by_username(username).await? else {
            tracing::debug!("Login attempt for unknown username");
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(password, &user.salt, &user.password_hash) {
            tracing::debug!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        Ok(user)
    }
}
