// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CV Portal: job-seeker / recruiter client
//!
//! This crate provides the client side of the CV portal: it fetches the
//! Firebase configuration from the backend, signs users in, uploads CVs for
//! AI analysis and renders the resulting profile.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod pages;
pub mod render;
pub mod services;
pub mod time_utils;
pub mod ui;

pub use config::ClientConfig;
pub use error::{ClientError, Result};
