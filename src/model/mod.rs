pub mod booking;
pub mod package;
pub mod user;

use chrono::{SecondsFormat, Utc};

/// Current instant as a fixed-width RFC 3339 UTC string.
///
/// Fixed width keeps lexicographic order equal to chronological order, which the
/// newest-first listings rely on.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
