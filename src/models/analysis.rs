// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CV analysis request/response models.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::user::{lenient_number, lenient_string_list, lenient_text};

/// MIME type accepted by the analysis endpoint.
pub const PDF_MIME: &str = "application/pdf";

/// A file picked by the user for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn is_pdf(&self) -> bool {
        self.mime == PDF_MIME
    }
}

impl std::fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Structured profile extracted from a CV by the backend.
///
/// The extraction is model output, so a mistyped field reads as missing
/// instead of failing the whole response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedProfile {
    #[serde(default, deserialize_with = "lenient_text")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub headline: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub skills: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub experience_years: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub seniority: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub summary: Option<String>,
}

/// Body returned by `POST /analyze-cv`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub status: Option<String>,
    /// Absent when the value is not an object
    #[serde(default, deserialize_with = "lenient_profile")]
    pub profile: Option<ExtractedProfile>,
    #[serde(default)]
    pub raw_analysis: Option<String>,
    #[serde(default)]
    pub analysis: Option<String>,
    /// Error detail (a string, or a list for request validation errors)
    #[serde(default)]
    pub detail: Option<Value>,
}

impl AnalysisResponse {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }

    /// Raw analysis text, preferring `raw_analysis` over `analysis`.
    pub fn raw_text(&self) -> Option<&str> {
        self.raw_analysis
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.analysis.as_deref().filter(|s| !s.is_empty()))
    }

    /// Backend-supplied error detail, if any.
    pub fn detail_message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

fn lenient_profile<'de, D>(deserializer: D) -> Result<Option<ExtractedProfile>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

/// Successful analysis result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisReport {
    pub profile: ExtractedProfile,
    pub raw_analysis: Option<String>,
}
