// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session listener shared by the signed-in pages.
//!
//! The page loop handles the current auth state first, then waits on both
//! auth-state changes and UI events. Auth changes win over queued events so
//! a sign-out always routes away before anything else runs.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::models::{SelectedFile, UserAccount};
use crate::pages::{PageExit, Session};
use crate::services::IdentityProvider;
use crate::ui::Route;

/// UI events on the signed-in pages.
#[derive(Debug, Clone)]
pub enum PageEvent {
    Logout,
    /// Files chosen in the CV upload input.
    CvSelected(Vec<SelectedFile>),
}

/// A page driven by the session listener.
#[async_trait]
pub trait SessionPage: Send {
    fn session(&self) -> &Session;

    /// Send an unauthenticated visitor to the entry page.
    fn redirect_to_entry(&mut self);

    async fn on_signed_in(&mut self, account: UserAccount);

    /// Page-specific events (logout is handled by the listener).
    async fn on_event(&mut self, event: PageEvent);
}

/// Run `page` until it navigates away or `events` closes.
pub async fn run_session_page<P: SessionPage>(
    mut page: P,
    mut events: mpsc::Receiver<PageEvent>,
) -> PageExit {
    let mut auth = page.session().identity.subscribe();

    let initial = auth.borrow_and_update().clone();
    if let Some(exit) = apply_auth_state(&mut page, initial).await {
        return exit;
    }

    loop {
        tokio::select! {
            biased;

            changed = auth.changed() => {
                if changed.is_err() {
                    tracing::warn!("Auth state channel closed");
                    return PageExit::Closed;
                }
                let state = auth.borrow_and_update().clone();
                if let Some(exit) = apply_auth_state(&mut page, state).await {
                    return exit;
                }
            }

            event = events.recv() => match event {
                Some(PageEvent::Logout) => {
                    let identity = page.session().identity.clone();
                    logout(identity.as_ref()).await;
                }
                Some(event) => page.on_event(event).await,
                None => return PageExit::Closed,
            },
        }
    }
}

async fn apply_auth_state<P: SessionPage>(
    page: &mut P,
    state: Option<UserAccount>,
) -> Option<PageExit> {
    match state {
        None => {
            tracing::info!("No signed-in user, redirecting to entry page");
            page.redirect_to_entry();
            Some(PageExit::Navigated(Route::Entry))
        }
        Some(account) => {
            tracing::debug!(uid = %account.uid, "Auth state: signed in");
            page.on_signed_in(account).await;
            None
        }
    }
}

/// Request sign-out. The resulting auth-state change does the routing.
pub async fn logout(identity: &dyn IdentityProvider) {
    if let Err(e) = identity.sign_out().await {
        tracing::error!(error = %e, "Sign-out failed");
    }
}
