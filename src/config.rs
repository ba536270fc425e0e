// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Assembled once at startup and shared through `AppState`.

use std::env;
use std::ops::RangeInclusive;

/// Accepted reset token lifetimes, up to 30 days.
pub const RESET_TOKEN_TTL_SECS: RangeInclusive<i64> = 1..=30 * 24 * 3600;

/// Accepted session lifetimes, up to a year.
pub const SESSION_TTL_HOURS: RangeInclusive<i64> = 1..=365 * 24;

/// Default sender address for password reset mail.
pub const DEFAULT_MAIL_FROM: &str = "cooking4393@gmail.com";

/// Where documents are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// Google Firestore project (`firestore://<project-id>`).
    Firestore { project_id: String },
    /// In-process document store (`memory://`).
    Memory,
}

impl DatabaseUrl {
    /// Parse a `DATABASE_URL` value.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let value = value.trim();
        if value == "memory://" || value.is_empty() {
            return Ok(DatabaseUrl::Memory);
        }
        match value.strip_prefix("firestore://") {
            Some(project) if !project.is_empty() => Ok(DatabaseUrl::Firestore {
                project_id: project.trim_end_matches('/').to_string(),
            }),
            _ => Err(ConfigError::Invalid("DATABASE_URL", value.to_string())),
        }
    }
}

/// Outgoing SMTP relay settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    /// Relay secret, only ever read from the environment
    pub password: String,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Public URL of the site, prefix of emailed reset links
    pub base_url: String,
    /// Document database location
    pub database: DatabaseUrl,
    /// Sender address for outgoing mail
    pub mail_from: String,
    /// SMTP relay; `None` keeps mail in the in-process outbox
    pub smtp: Option<SmtpConfig>,
    /// Lifetime of a password reset token in seconds
    pub reset_token_ttl_secs: i64,
    /// Lifetime of a login session in hours
    pub session_ttl_hours: i64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            database: DatabaseUrl::Memory,
            mail_from: DEFAULT_MAIL_FROM.to_string(),
            smtp: None,
            reset_token_ttl_secs: 3600,
            session_ttl_hours: 168,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honoured for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let mail_from = env::var("MAIL_FROM").unwrap_or_else(|_| DEFAULT_MAIL_FROM.to_string());

        let smtp = match env::var("SMTP_HOST") {
            Ok(host) if !host.trim().is_empty() => Some(SmtpConfig {
                host: host.trim().to_string(),
                username: env::var("SMTP_USERNAME").unwrap_or_else(|_| mail_from.clone()),
                password: env::var("SMTP_PASSWORD")
                    .map(|v| v.trim().to_string())
                    .map_err(|_| ConfigError::Missing("SMTP_PASSWORD"))?,
            }),
            _ => None,
        };

        Ok(Self {
            port: parse_or("PORT", 3000)?,
            base_url: env::var("BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            database: DatabaseUrl::parse(
                &env::var("DATABASE_URL").unwrap_or_else(|_| "memory://".to_string()),
            )?,
            mail_from,
            smtp,
            reset_token_ttl_secs: within(
                "RESET_TOKEN_TTL_SECS",
                parse_or("RESET_TOKEN_TTL_SECS", 3600)?,
                RESET_TOKEN_TTL_SECS,
            )?,
            session_ttl_hours: within(
                "SESSION_TTL_HOURS",
                parse_or("SESSION_TTL_HOURS", 168)?,
                SESSION_TTL_HOURS,
            )?,
        })
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, value)),
        Err(_) => Ok(default),
    }
}

fn within(
    name: &'static str,
    value: i64,
    range: RangeInclusive<i64>,
) -> Result<i64, ConfigError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid(name, value.to_string()))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
