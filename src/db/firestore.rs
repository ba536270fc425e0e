// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with generic document operations.

use firestore::FirestoreConsistencySelector;
use serde::{de::DeserializeOwned, Serialize};

use super::Filter;
use crate::db::collections;
use crate::error::AppError;
use crate::models::{ResetToken, User};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator does not accept real credentials
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// A client with no connection.
    ///
    /// All database operations will return an error if called.
    pub fn offline() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Document Operations ─────────────────────────────────────

    /// Fetch a document by id.
    pub async fn get<T>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All documents whose fields equal every filter value.
    pub async fn find<T>(&self, collection: &str, filters: &[Filter]) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        query(self.get_client()?, collection, filters).await
    }

    /// Create or replace a document.
    pub async fn put<T>(&self, collection: &str, id: &str, doc: &T) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Sync + Send,
    {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id)
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a document.
    pub async fn remove(&self, collection: &str, id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collection)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Password Reset ──────────────────────────────────────────

    /// Store the user's new password and clear `token` in one commit.
    ///
    /// Returns `false` without writing anything if the token is no longer
    /// valid at `now`.
    pub async fn commit_password_reset(
        &self,
        user: &User,
        token: &str,
        now: i64,
    ) -> Result<bool, AppError> {
        let client = self.get_client()?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        // Reading through the transaction makes a concurrent commit on the
        // same token conflict
        let in_transaction = client.clone_with_consistency_selector(
            FirestoreConsistencySelector::Transaction(transaction.transaction_id().clone()),
        );
        let current: Vec<ResetToken> = match query(
            &in_transaction,
            collections::RESETS,
            &[("token", token.to_string())],
        )
        .await
        {
            Ok(current) => current,
            Err(e) => {
                let _ = transaction.rollback().await;
                return Err(e);
            }
        };

        let Some(mut reset) = current.into_iter().find(|r| r.is_valid(now)) else {
            let _ = transaction.rollback().await;
            return Ok(false);
        };
        reset.invalidate();

        client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add user to transaction: {}", e))
            })?;

        client
            .fluent()
            .update()
            .in_col(collections::RESETS)
            .document_id(&reset.id)
            .object(&reset)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add reset to transaction: {}", e))
            })?;

        if let Err(e) = transaction.commit().await {
            // A losing writer sees the token already cleared
            let after: Vec<ResetToken> = self
                .find(collections::RESETS, &[("token", token.to_string())])
                .await?;
            if !after.iter().any(|r| r.is_valid(now)) {
                tracing::warn!(error = %e, "Password reset lost a concurrent commit");
                return Ok(false);
            }
            return Err(AppError::Database(format!(
                "Transaction commit failed: {}",
                e
            )));
        }

        Ok(true)
    }
}

/// Run an equality query on `client`, which may be bound to a transaction.
async fn query<T>(
    client: &firestore::FirestoreDb,
    collection: &str,
    filters: &[Filter],
) -> Result<Vec<T>, AppError>
where
    T: DeserializeOwned + Send,
{
    let filters = filters.to_vec();
    client
        .fluent()
        .select()
        .from(collection)
        .filter(move |q| {
            q.for_all(
                filters
                    .iter()
                    .map(|(field, value)| q.field(*field).eq(value.clone())),
            )
        })
        .obj()
        .query()
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}
