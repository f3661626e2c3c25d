//! Transcript file naming.

use chrono::{DateTime, TimeZone};
use regex_lite::Regex;

use super::TranscriptFormat;

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize_label(project: &str) -> String {
    let unsafe_chars = Regex::new(r"[^a-zA-Z0-9_-]").expect("Invalid regex");
    unsafe_chars.replace_all(project, "_").into_owned()
}

/// `{label}_{YYYYMMDD_HHMMSS}.{ext}`
pub fn transcript_file_name<Tz>(
    project: &str,
    generated_at: &DateTime<Tz>,
    format: TranscriptFormat,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}_{}.{}",
        sanitize_label(project),
        generated_at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}
