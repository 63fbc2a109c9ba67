//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AccountRecord, ProfilePatch, UserProfile};

/// Collection names as constants.
pub mod collections {
    /// Profile documents (keyed by account uid)
    pub const USERS: &str = "users";
}

/// Profile document operations, one document per account.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Read `users/{uid}`; `None` when the document does not exist.
    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>>;

    /// Merge the registration fields into `users/{uid}`.
    async fn save_account_record(&self, uid: &str, record: &AccountRecord) -> Result<()>;

    /// Update only the CV-derived fields of an existing document.
    async fn update_profile(&self, uid: &str, patch: &ProfilePatch) -> Result<()>;

    /// Create-with-merge: write `email` plus the CV-derived fields,
    /// preserving any other fields already present.
    async fn merge_profile(&self, uid: &str, patch: &ProfilePatch) -> Result<()>;
}
