// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod analysis;
pub mod remote_config;
pub mod user;

pub use analysis::{AnalysisReport, AnalysisResponse, ExtractedProfile, SelectedFile, PDF_MIME};
pub use remote_config::FirebaseConfig;
pub use user::{AccountRecord, ProfilePatch, Role, UserAccount, UserProfile};
