// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase configuration served by the backend.

use serde::{Deserialize, Serialize};

/// Firebase web configuration returned by `GET /get-firebase-configuration`.
///
/// `apiKey` and `projectId` are required to build the identity and database
/// handles; a body without them is treated as malformed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseConfig {
    pub api_key: String,
    #[serde(default)]
    pub auth_domain: Option<String>,
    pub project_id: String,
    #[serde(default)]
    pub storage_bucket: Option<String>,
    #[serde(default)]
    pub messaging_sender_id: Option<String>,
    #[serde(default)]
    pub app_id: Option<String>,
}

impl std::fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("api_key", &"<redacted>")
            .field("auth_domain", &self.auth_domain)
            .field("project_id", &self.project_id)
            .field("app_id", &self.app_id)
            .finish()
    }
}
