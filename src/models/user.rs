//! User account and profile models.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::analysis::ExtractedProfile;

/// Account issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Provider account ID (also used as the profile document ID)
    pub uid: String,
    pub email: Option<String>,
}

/// Role chosen at registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Jobseeker,
    Recruiter,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Jobseeker => "jobseeker",
            Role::Recruiter => "recruiter",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jobseeker" => Ok(Role::Jobseeker),
            "recruiter" => Ok(Role::Recruiter),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Profile document stored in Firestore under `users/{uid}`.
///
/// Every field is optional: documents are created either at registration
/// (email + role only) or by the first CV analysis, and older documents may
/// carry values of the wrong type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub email: Option<String>,
    /// Kept as a string so unknown roles still display
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Absent when the stored value is not a list
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub skills: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub experience_years: Option<f64>,
    #[serde(default)]
    pub seniority: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub last_cv_updated_at: Option<String>,
}

/// Fields written when an account registers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub email: String,
    pub role: Role,
    pub created_at: String,
}

impl AccountRecord {
    pub const FIELDS: [&'static str; 3] = ["email", "role", "createdAt"];
}

/// Profile fields written after a successful CV analysis.
///
/// `email` is only written when the document is being created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub experience_years: Option<f64>,
    pub seniority: Option<String>,
    pub summary: Option<String>,
    pub last_cv_updated_at: String,
}

impl ProfilePatch {
    /// Document fields owned by CV analysis.
    pub const PROFILE_FIELDS: [&'static str; 8] = [
        "fullName",
        "headline",
        "location",
        "skills",
        "experienceYears",
        "seniority",
        "summary",
        "lastCvUpdatedAt",
    ];

    /// Project an extracted profile onto document fields.
    pub fn from_extracted(profile: &ExtractedProfile, updated_at: String) -> Self {
        Self {
            email: None,
            full_name: non_empty(&profile.full_name),
            headline: non_empty(&profile.headline),
            location: non_empty(&profile.location),
            skills: profile.skills.clone().unwrap_or_default(),
            experience_years: profile.experience_years,
            seniority: non_empty(&profile.seniority),
            summary: non_empty(&profile.summary),
            last_cv_updated_at: updated_at,
        }
    }

    /// Same patch, carrying the base `email` for a first write.
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// A list of strings; `None` when the value is not a list. Null items are
/// dropped and other scalars are stringified.
pub(crate) fn lenient_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Null => None,
                    Value::String(s) => Some(s),
                    other => Some(other.to_string()),
                })
                .collect(),
        ),
        _ => None,
    })
}

/// A string, or the text of a number or boolean.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        _ => None,
    })
}
