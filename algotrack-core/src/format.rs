//! Timestamp formatting helpers shared by storage and interchange.
//!
//! Stored timestamps are RFC 3339 UTC with millisecond precision and a `Z`
//! suffix, so lexical order in SQL matches chronological order.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Layouts accepted for offset-less input, tried in order.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Format a timestamp for storage in SQLite.
pub fn to_storage(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339 and the `YYYY-MM-DD HH:MM:SS` form SQLite's
/// `CURRENT_TIMESTAMP` produces.
pub fn parse_storage(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Parse an interchange timestamp, tolerating common alternate layouts.
///
/// Returns `None` when nothing matches; callers substitute "now".
pub fn parse_flexible(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Format a timestamp for the CSV export's creation column.
pub fn to_csv(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Serde adapter for interchange timestamps.
///
/// Serializes in the storage layout. Deserializes leniently: null, empty, or
/// unparseable strings become the current time rather than an error.
pub mod lenient {
    use super::{parse_flexible, to_storage};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&to_storage(*ts))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .and_then(parse_flexible)
            .unwrap_or_else(Utc::now))
    }
}
