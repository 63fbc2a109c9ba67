// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed profile operations.
//!
//! Requests are authorized with the signed-in user's Firebase ID token, so
//! the project's security rules apply exactly as they do for the web SDK.

use std::sync::Arc;

use async_trait::async_trait;
use firestore::FirestoreWritePrecondition;

use crate::db::{collections, ProfileStore};
use crate::error::ClientError;
use crate::models::{AccountRecord, ProfilePatch, UserProfile};
use crate::services::IdentityProvider;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
    identity: Option<Arc<dyn IdentityProvider>>,
}

impl FirestoreDb {
    /// Create the page's database handle.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn connect(
        project_id: &str,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self, ClientError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id, identity).await;
        }

        let token_identity = identity.clone();
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(move || {
            let identity = token_identity.clone();
            async move {
                // The token source needs a Sync future; the provider's is only
                // Send, so the lookup runs as its own task.
                let lookup = tokio::spawn(async move { identity.id_token().await }).await;

                // Signed-out requests go out with an empty token and are
                // rejected by the security rules.
                let token = match lookup {
                    Ok(Ok(token)) => token.unwrap_or_default(),
                    Ok(Err(e)) => {
                        tracing::warn!(error = %e, "Could not obtain ID token");
                        String::new()
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "ID token lookup task failed");
                        String::new()
                    }
                };
                Ok(gcloud_sdk::Token {
                    token_type: "Bearer".to_string(),
                    token: gcloud_sdk::SecretValue::new(token.into()),
                    expiry: chrono::Utc::now() + chrono::Duration::minutes(1),
                })
            }
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| ClientError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
            identity: Some(identity),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(
        project_id: &str,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self, ClientError> {
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
            ClientError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
            identity: Some(identity),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            client: None,
            identity: None,
        }
    }

    /// Get the client, failing when offline or when nobody is signed in.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, ClientError> {
        let client = self.client.as_ref().ok_or_else(|| {
            ClientError::Database("Database not connected (offline mode)".to_string())
        })?;

        match &self.identity {
            Some(identity) if identity.current_user().is_some() => Ok(client),
            _ => Err(ClientError::Unauthenticated),
        }
    }

    /// Write only `fields` of `object`. Without a precondition this upserts.
    async fn write_fields<T>(
        &self,
        uid: &str,
        object: &T,
        fields: &[&str],
        precondition: Option<FirestoreWritePrecondition>,
    ) -> Result<(), ClientError>
    where
        T: serde::Serialize + for<'de> serde::Deserialize<'de> + Sync + Send,
    {
        let mut update = self
            .get_client()?
            .fluent()
            .update()
            .fields(fields.iter().copied())
            .in_col(collections::USERS);
        if let Some(precondition) = precondition {
            update = update.precondition(precondition);
        }

        let _: () = update
            .document_id(uid)
            .object(object)
            .execute()
            .await
            .map_err(|e| ClientError::Database(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for FirestoreDb {
    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, ClientError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| ClientError::Database(e.to_string()))
    }

    async fn save_account_record(
        &self,
        uid: &str,
        record: &AccountRecord,
    ) -> Result<(), ClientError> {
        self.write_fields(uid, record, &AccountRecord::FIELDS, None)
            .await?;
        tracing::debug!(uid, role = record.role.as_str(), "Account record saved");
        Ok(())
    }

    async fn update_profile(&self, uid: &str, patch: &ProfilePatch) -> Result<(), ClientError> {
        // Fails instead of recreating a document deleted since it was read
        self.write_fields(
            uid,
            patch,
            &ProfilePatch::PROFILE_FIELDS,
            Some(FirestoreWritePrecondition::Exists(true)),
        )
        .await?;
        tracing::debug!(uid, "Profile updated");
        Ok(())
    }

    async fn merge_profile(&self, uid: &str, patch: &ProfilePatch) -> Result<(), ClientError> {
        let mut fields = vec!["email"];
        fields.extend(ProfilePatch::PROFILE_FIELDS);
        self.write_fields(uid, patch, &fields, None).await?;
        tracing::debug!(uid, "Profile created (merge)");
        Ok(())
    }
}
