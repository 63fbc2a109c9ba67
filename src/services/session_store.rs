// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local persistence of the signed-in session.
//!
//! A sign-in on the auth page has to be visible to the next page load
//! (dashboard, profile), so the session is kept in a small JSON file.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::models::UserAccount;

/// ID tokens this close to expiry are refreshed before use.
const EXPIRY_SKEW_SECS: i64 = 60;

/// Signed-in session as persisted between page loads.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub uid: String,
    pub email: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn account(&self) -> UserAccount {
        UserAccount {
            uid: self.uid.clone(),
            email: self.email.clone(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_SKEW_SECS) >= self.expires_at
    }
}

impl std::fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredSession")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// File-backed session store. Without a path, nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    path: Option<PathBuf>,
}

impl SessionStore {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Store that keeps nothing across page loads.
    pub fn in_memory() -> Self {
        Self { path: None }
    }

    /// Load the persisted session, if any.
    pub fn load(&self) -> Result<Option<StoredSession>, ClientError> {
        let Some(path) = &self.path else {
            return Ok(None);
        };

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ClientError::Persistence(format!("{}: {}", path.display(), e))),
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| ClientError::Persistence(format!("{}: {}", path.display(), e)))
    }

    /// Write the session. The file holds a refresh token, so on Unix it is
    /// readable by the owner only.
    pub fn save(&self, session: &StoredSession) -> Result<(), ClientError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::Persistence(format!("{}: {}", parent.display(), e)))?;
        }

        let json = serde_json::to_string_pretty(session)
            .map_err(|e| ClientError::Persistence(e.to_string()))?;
        write_private(path, json.as_bytes())
            .map_err(|e| ClientError::Persistence(format!("{}: {}", path.display(), e)))
    }

    pub fn clear(&self) -> Result<(), ClientError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Persistence(format!("{}: {}", path.display(), e))),
        }
    }
}

fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        let mut file = options.open(path)?;
        // Files created by older versions keep their mode on open
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        file.write_all(contents)
    }
    #[cfg(not(unix))]
    {
        options.open(path)?.write_all(contents)
    }
}
