// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider (Firebase Authentication).
//!
//! Handles:
//! - Account creation and password sign-in over the Identity Toolkit REST API
//! - Auth-state change notifications (fired on load and on every sign-in/out)
//! - ID token refresh when the stored session has expired
//! - Local session persistence between page loads

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};

use crate::config::ClientConfig;
use crate::models::{FirebaseConfig, UserAccount};
use crate::services::session_store::{SessionStore, StoredSession};

const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const DEFAULT_SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1";
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Error reported by the identity provider.
///
/// Displays like the Firebase web SDK: `Firebase: {detail} (auth/{code}).`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Firebase: {detail} (auth/{code}).")]
pub struct AuthError {
    pub code: String,
    pub detail: String,
}

impl AuthError {
    pub fn new(code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            detail: detail.into(),
        }
    }

    /// Map an Identity Toolkit error message (`WEAK_PASSWORD : Password
    /// should be at least 6 characters`) to its SDK error code.
    pub fn from_rest_message(message: &str) -> Self {
        let (rest_code, detail) = match message.split_once(':') {
            Some((code, detail)) => (code.trim(), detail.trim()),
            None => (message.trim(), ""),
        };

        let code = match rest_code {
            "EMAIL_EXISTS" => "email-already-in-use",
            "WEAK_PASSWORD" => "weak-password",
            "INVALID_EMAIL" => "invalid-email",
            "EMAIL_NOT_FOUND" => "user-not-found",
            "INVALID_PASSWORD" => "wrong-password",
            "INVALID_LOGIN_CREDENTIALS" => "invalid-credential",
            "USER_DISABLED" => "user-disabled",
            "TOO_MANY_ATTEMPTS_TRY_LATER" => "too-many-requests",
            "MISSING_PASSWORD" => "missing-password",
            "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" => "user-token-expired",
            _ => "internal-error",
        };

        Self::new(code, if detail.is_empty() { "Error" } else { detail })
    }

    fn network(err: reqwest::Error) -> Self {
        tracing::warn!(error = %err, "Identity request failed");
        Self::new("network-request-failed", "Error")
    }

    fn internal(detail: impl Into<String>) -> Self {
        Self::new("internal-error", detail)
    }
}

/// Identity provider operations used by the pages.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account; the new account becomes the signed-in user.
    async fn create_account(&self, email: &str, password: &str)
        -> Result<UserAccount, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserAccount, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    fn current_user(&self) -> Option<UserAccount>;

    /// Subscribe to auth-state changes. The receiver starts at the current
    /// state, which counts as the first notification.
    fn subscribe(&self) -> watch::Receiver<Option<UserAccount>>;

    /// ID token for authorizing database requests, refreshed if expired.
    async fn id_token(&self) -> Result<Option<String>, AuthError>;
}

/// Identity Toolkit / Secure Token endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEndpoints {
    pub identity_url: String,
    pub secure_token_url: String,
}

impl AuthEndpoints {
    pub fn production() -> Self {
        Self {
            identity_url: DEFAULT_IDENTITY_URL.to_string(),
            secure_token_url: DEFAULT_SECURE_TOKEN_URL.to_string(),
        }
    }

    /// Endpoints of the Firebase Auth emulator running at `host`.
    pub fn emulator(host: &str) -> Self {
        let host = host.trim_end_matches('/');
        let base = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{}", host)
        };
        Self {
            identity_url: format!("{}/identitytoolkit.googleapis.com/v1", base),
            secure_token_url: format!("{}/securetoken.googleapis.com/v1", base),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        match &config.auth_emulator_host {
            Some(host) => Self::emulator(host),
            None => Self::production(),
        }
    }
}

/// Firebase Authentication over REST.
pub struct FirebaseAuth {
    http: reqwest::Client,
    api_key: String,
    endpoints: AuthEndpoints,
    store: SessionStore,
    session: Mutex<Option<StoredSession>>,
    state: watch::Sender<Option<UserAccount>>,
}

impl FirebaseAuth {
    /// Create a signed-out client.
    pub fn new(
        http: reqwest::Client,
        api_key: impl Into<String>,
        endpoints: AuthEndpoints,
        store: SessionStore,
    ) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            http,
            api_key: api_key.into(),
            endpoints,
            store,
            session: Mutex::new(None),
            state,
        }
    }

    /// Create the page's identity handle and restore any persisted session.
    pub async fn initialize(remote: &FirebaseConfig, config: &ClientConfig) -> Self {
        let auth = Self::new(
            config.http_client(),
            remote.api_key.clone(),
            AuthEndpoints::from_config(config),
            SessionStore::new(config.session_file.clone()),
        );
        auth.restore().await;
        auth
    }

    /// Restore the persisted session, refreshing it if it has expired.
    ///
    /// Any failure leaves the client signed out.
    pub async fn restore(&self) {
        let stored = match self.store.load() {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable session");
                None
            }
        };

        let Some(mut stored) = stored else {
            tracing::debug!("No persisted session");
            return;
        };

        if stored.is_expired(Utc::now()) {
            match self.refresh(&stored).await {
                Ok(refreshed) => {
                    self.persist(&refreshed);
                    stored = refreshed;
                }
                Err(e) => {
                    tracing::warn!(error = %e, uid = %stored.uid, "Session refresh failed, signing out");
                    if let Err(e) = self.store.clear() {
                        tracing::warn!(error = %e, "Failed to clear session");
                    }
                    return;
                }
            }
        }

        tracing::info!(uid = %stored.uid, "Restored session");
        let account = stored.account();
        *self.session.lock().await = Some(stored);
        self.state.send_replace(Some(account));
    }

    async fn password_request(
        &self,
        endpoint: &str,
        email: &str,
        password: &str,
    ) -> Result<UserAccount, AuthError> {
        let url = format!("{}/accounts:{}", self.endpoints.identity_url, endpoint);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&PasswordRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(AuthError::network)?;

        let body: PasswordResponse = check_response_json(response).await?;
        let session = StoredSession {
            uid: body.local_id,
            email: body.email.or_else(|| Some(email.to_string())),
            id_token: body.id_token,
            refresh_token: body.refresh_token,
            expires_at: Utc::now() + Duration::seconds(parse_expires_in(&body.expires_in)),
        };

        Ok(self.establish(session).await)
    }

    async fn refresh(&self, stored: &StoredSession) -> Result<StoredSession, AuthError> {
        let url = format!("{}/token", self.endpoints.secure_token_url);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", stored.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(AuthError::network)?;

        let body: RefreshResponse = check_response_json(response).await?;
        tracing::debug!(uid = %body.user_id, "ID token refreshed");

        Ok(StoredSession {
            uid: body.user_id,
            email: stored.email.clone(),
            id_token: body.id_token,
            refresh_token: body.refresh_token,
            expires_at: Utc::now() + Duration::seconds(parse_expires_in(&body.expires_in)),
        })
    }

    /// Make `session` the signed-in session and notify subscribers.
    async fn establish(&self, session: StoredSession) -> UserAccount {
        let account = session.account();
        self.persist(&session);
        *self.session.lock().await = Some(session);
        self.state.send_replace(Some(account.clone()));
        tracing::info!(uid = %account.uid, "Signed in");
        account
    }

    fn persist(&self, session: &StoredSession) {
        if let Err(e) = self.store.save(session) {
            tracing::warn!(error = %e, "Failed to persist session");
        }
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuth {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserAccount, AuthError> {
        self.password_request("signUp", email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserAccount, AuthError> {
        self.password_request("signInWithPassword", email, password)
            .await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.session.lock().await = None;
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to clear session");
        }
        self.state.send_replace(None);
        tracing::info!("Signed out");
        Ok(())
    }

    fn current_user(&self) -> Option<UserAccount> {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<UserAccount>> {
        self.state.subscribe()
    }

    async fn id_token(&self) -> Result<Option<String>, AuthError> {
        let mut guard = self.session.lock().await;
        let Some(current) = guard.as_ref() else {
            return Ok(None);
        };

        if !current.is_expired(Utc::now()) {
            return Ok(Some(current.id_token.clone()));
        }

        let refreshed = self.refresh(current).await?;
        self.persist(&refreshed);
        let token = refreshed.id_token.clone();
        *guard = Some(refreshed);
        Ok(Some(token))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: String,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: String,
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct RestErrorBody {
    error: RestError,
}

#[derive(Debug, Deserialize)]
struct RestError {
    message: String,
}

/// Check response status and parse the JSON body, mapping REST errors.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AuthError> {
    let status = response.status();
    let body = response.text().await.map_err(AuthError::network)?;

    if !status.is_success() {
        return Err(match serde_json::from_str::<RestErrorBody>(&body) {
            Ok(err) => AuthError::from_rest_message(&err.error.message),
            Err(_) => AuthError::internal(format!("HTTP {}", status)),
        });
    }

    serde_json::from_str(&body)
        .map_err(|e| AuthError::internal(format!("invalid identity response: {}", e)))
}

fn parse_expires_in(raw: &str) -> i64 {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS)
}
