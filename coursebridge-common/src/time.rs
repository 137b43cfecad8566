//! Timestamp utilities
//!
//! All timestamps are persisted as RFC 3339 strings in UTC so rows stay
//! readable with plain SQLite tooling and sort lexicographically.

use chrono::{NaiveDate, Utc};

/// Current UTC timestamp as an RFC 3339 string
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// Validate a calendar date in `YYYY-MM-DD` form
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
