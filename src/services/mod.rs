// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - clients for the external collaborators.

pub mod backend;
pub mod identity;
pub mod session_store;

pub use backend::BackendClient;
pub use identity::{AuthEndpoints, AuthError, FirebaseAuth, IdentityProvider};
pub use session_store::{SessionStore, StoredSession};
