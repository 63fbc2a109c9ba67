// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page controllers.
//!
//! Every page starts uninitialized: only the backend client exists. A page
//! controller can only be built from a [`Session`], which [`start`] returns
//! once the remote configuration has been fetched and the identity and
//! database handles exist.

pub mod auth;
pub mod dashboard;
pub mod profile;
pub mod session;

pub use auth::{AuthEvent, AuthForm, AuthMode, AuthPage, Credentials};
pub use dashboard::DashboardPage;
pub use profile::ProfilePage;
pub use session::PageEvent;

use std::future::Future;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::db::{FirestoreDb, ProfileStore};
use crate::error::{ClientError, Result};
use crate::models::FirebaseConfig;
use crate::services::{BackendClient, FirebaseAuth, IdentityProvider};
use crate::ui::{Route, View};

/// Identity and database handles built from the remote configuration.
#[derive(Clone)]
pub struct Handles {
    pub identity: Arc<dyn IdentityProvider>,
    pub db: Arc<dyn ProfileStore>,
}

/// Everything a ready page needs. Built once per page load.
#[derive(Clone)]
pub struct Session {
    pub identity: Arc<dyn IdentityProvider>,
    pub db: Arc<dyn ProfileStore>,
    pub backend: BackendClient,
}

/// The three pages of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Auth,
    Dashboard,
    Profile,
}

impl PageKind {
    /// Blocking message shown when the page cannot start.
    pub fn bootstrap_alert(self, error: &ClientError) -> String {
        match self {
            PageKind::Auth => format!(
                "Could not connect to the secure server. Make sure the backend server is \
                 running and publicly reachable.\n\nError: {}",
                error
            ),
            PageKind::Dashboard => {
                "The system could not be loaded. Make sure the backend server is running."
                    .to_string()
            }
            PageKind::Profile => {
                "The profile page could not be loaded. Make sure the backend is running."
                    .to_string()
            }
        }
    }
}

/// How a page's event loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageExit {
    /// The page navigated away.
    Navigated(Route),
    /// The event source closed.
    Closed,
}

/// Bootstrap a page: fetch the remote configuration, then build the handles
/// with `connect`.
///
/// On any failure the error is logged, a blocking alert is shown and `None`
/// is returned; `connect` is never called if the configuration fetch fails.
/// There is no retry.
pub async fn start<V, F, Fut>(
    kind: PageKind,
    view: &mut V,
    backend: BackendClient,
    connect: F,
) -> Option<Session>
where
    V: View + ?Sized,
    F: FnOnce(FirebaseConfig) -> Fut,
    Fut: Future<Output = Result<Handles>>,
{
    let result = async {
        let remote = backend.fetch_configuration().await?;
        let handles = connect(remote).await?;
        Ok::<_, ClientError>(handles)
    }
    .await;

    match result {
        Ok(handles) => {
            tracing::info!(page = ?kind, "Page initialized");
            Some(Session {
                identity: handles.identity,
                db: handles.db,
                backend,
            })
        }
        Err(e) => {
            tracing::error!(page = ?kind, error = %e, "Page initialization failed");
            view.alert(&kind.bootstrap_alert(&e));
            None
        }
    }
}

/// Build the production handles: Firebase Auth plus Firestore.
pub async fn connect_firebase(remote: FirebaseConfig, config: ClientConfig) -> Result<Handles> {
    let identity: Arc<dyn IdentityProvider> =
        Arc::new(FirebaseAuth::initialize(&remote, &config).await);
    let db = FirestoreDb::connect(&remote.project_id, identity.clone()).await?;

    Ok(Handles {
        identity,
        db: Arc::new(db),
    })
}
