// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile page projection.
//!
//! Maps a possibly-partial profile document onto display strings. Empty
//! strings count as absent.

use chrono::TimeZone;

use crate::models::UserProfile;
use crate::time_utils::format_display_time;

/// Skills beyond this many are not shown as chips.
pub const MAX_SKILL_CHIPS: usize = 12;

const NO_NAME: &str = "Unnamed candidate";
const NO_HEADLINE: &str = "Add a headline from your CV";
const NO_LOCATION: &str = "Location unknown";
const NO_SENIORITY: &str = "Not set";
const NO_SUMMARY: &str = "No AI summary yet. Upload or refresh your CV from the dashboard.";
const NEVER_UPDATED: &str = "Never";

/// Display values for the profile page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDisplay {
    pub full_name: String,
    pub headline: String,
    pub location: String,
    /// `Level: {seniority}`
    pub seniority: String,
    pub summary: String,
    pub initials: String,
    pub last_updated: String,
    pub experience: String,
    pub skill_chips: Vec<String>,
    /// `{n} skills`, counting every skill (not just the chips)
    pub skill_count: String,
    pub role_focus: String,
}

impl ProfileDisplay {
    /// Project `profile` using the local time zone for timestamps.
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self::from_profile_in(profile, &chrono::Local)
    }

    pub fn from_profile_in<Tz>(profile: &UserProfile, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let full_name = present(&profile.full_name).unwrap_or(NO_NAME);
        let headline = present(&profile.headline);
        let skills: &[String] = profile.skills.as_deref().unwrap_or(&[]);

        let role_focus = match (headline, skills.first()) {
            (Some(headline), _) => headline.to_string(),
            (None, Some(first)) => format!("Strong in {}", first),
            (None, None) => "-".to_string(),
        };

        Self {
            full_name: full_name.to_string(),
            headline: headline.unwrap_or(NO_HEADLINE).to_string(),
            location: present(&profile.location).unwrap_or(NO_LOCATION).to_string(),
            seniority: format!(
                "Level: {}",
                present(&profile.seniority).unwrap_or(NO_SENIORITY)
            ),
            summary: present(&profile.summary).unwrap_or(NO_SUMMARY).to_string(),
            initials: initials(full_name),
            last_updated: present(&profile.last_cv_updated_at)
                .map(|raw| format_display_time(raw, tz))
                .unwrap_or_else(|| NEVER_UPDATED.to_string()),
            experience: experience_label(profile.experience_years),
            skill_chips: skills.iter().take(MAX_SKILL_CHIPS).cloned().collect(),
            skill_count: format!("{} skills", skills.len()),
            role_focus,
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Uppercase first letters of the first two space-separated tokens, or `?`.
pub fn initials(name: &str) -> String {
    let initials: String = name
        .split(' ')
        .filter(|token| !token.is_empty())
        .take(2)
        .filter_map(|token| token.chars().next())
        .flat_map(char::to_uppercase)
        .collect();

    if initials.is_empty() {
        "?".to_string()
    } else {
        initials
    }
}

/// `{n} yrs`, or `n/a` when unknown. Whole numbers print without decimals.
pub fn experience_label(years: Option<f64>) -> String {
    match years {
        Some(years) if years.is_finite() && years.fract() == 0.0 => {
            format!("{} yrs", years as i64)
        }
        Some(years) if years.is_finite() => format!("{} yrs", years),
        _ => "n/a".to_string(),
    }
}
