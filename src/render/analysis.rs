// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard CV analysis panel.

use crate::models::AnalysisReport;

const MISSING: &str = "-";

/// State of the dashboard's analysis panel.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisPanel {
    Analyzing,
    Result(AnalysisSummary),
    Error(String),
}

/// Display values of a successful analysis. Absent fields read `-`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSummary {
    pub name: String,
    pub headline: String,
    pub location: String,
    /// Comma-joined skills
    pub skills: String,
    pub raw_analysis: String,
}

impl AnalysisSummary {
    pub fn from_report(report: &AnalysisReport) -> Self {
        let profile = &report.profile;
        let skills = profile
            .skills
            .as_deref()
            .map(|skills| skills.join(", "))
            .unwrap_or_default();

        Self {
            name: or_missing(profile.full_name.as_deref()),
            headline: or_missing(profile.headline.as_deref()),
            location: or_missing(profile.location.as_deref()),
            skills: or_missing(Some(skills.as_str())),
            raw_analysis: or_missing(report.raw_analysis.as_deref()),
        }
    }
}

fn or_missing(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(MISSING)
        .to_string()
}
