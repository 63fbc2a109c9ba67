// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types.

use crate::services::identity::AuthError;

/// Client error type shared by every page.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Fetching or applying the remote configuration failed.
    #[error("Configuration request failed: {0}")]
    Bootstrap(String),

    /// The identity provider rejected the request.
    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("Not signed in")]
    Unauthenticated,

    #[error("Database error: {0}")]
    Database(String),

    /// User input rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// The analysis backend did not return a successful result.
    #[error("{0}")]
    Analysis(String),

    #[error("Session persistence error: {0}")]
    Persistence(String),
}

impl ClientError {
    /// Generic message used when the analysis backend gives no detail.
    pub const ANALYSIS_FALLBACK: &'static str = "Server failed to process the PDF.";
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
