// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backend API client.
//!
//! Handles:
//! - Fetching the Firebase configuration at page load
//! - Uploading a CV for analysis

use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::models::{AnalysisReport, AnalysisResponse, FirebaseConfig, SelectedFile};

/// Backend API client.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.http_client(), config.backend_url.clone())
    }

    /// Fetch the Firebase configuration.
    ///
    /// Any network, HTTP or parse failure is a bootstrap error.
    pub async fn fetch_configuration(&self) -> Result<FirebaseConfig> {
        let url = format!("{}/get-firebase-configuration", self.base_url);
        tracing::info!(url = %url, "Fetching Firebase configuration");

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ClientError::Bootstrap(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Bootstrap(format!(
                "Server error: {} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let config: FirebaseConfig = response
            .json()
            .await
            .map_err(|e| ClientError::Bootstrap(format!("invalid configuration: {}", e)))?;

        tracing::info!(project = %config.project_id, "Firebase configuration received");
        Ok(config)
    }

    /// Upload a CV as the single multipart part `file`.
    ///
    /// Succeeds only for a 2xx response whose `status` is `success`. Every
    /// other outcome carries the backend's `detail` or a generic message.
    pub async fn analyze_cv(&self, file: &SelectedFile) -> Result<AnalysisReport> {
        let url = format!("{}/analyze-cv", self.base_url);

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime)
            .map_err(|e| ClientError::Analysis(e.to_string()))?;
        let form = Form::new().part("file", part);

        tracing::info!(file = %file.name, size = file.bytes.len(), "Uploading CV for analysis");

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::Analysis(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Analysis(e.to_string()))?;

        let body: AnalysisResponse = serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            tracing::warn!(error = %e, status = %status, "Analysis response is not JSON");
            AnalysisResponse::default()
        });

        if status.is_success() && body.is_success() {
            tracing::info!("CV analysis succeeded");
            return Ok(AnalysisReport {
                raw_analysis: body.raw_text().map(str::to_string),
                profile: body.profile.unwrap_or_default(),
            });
        }

        let message = body
            .detail_message()
            .unwrap_or_else(|| ClientError::ANALYSIS_FALLBACK.to_string());
        tracing::warn!(status = %status, detail = %message, "CV analysis failed");
        Err(ClientError::Analysis(message))
    }
}
