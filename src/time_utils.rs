// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Format a stored RFC3339 timestamp for display in `tz`
/// (`1/15/2024, 10:00:00 AM`). Unparsable input is returned as-is.
pub fn format_display_time<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed
            .with_timezone(tz)
            .format("%-m/%-d/%Y, %-I:%M:%S %p")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}
