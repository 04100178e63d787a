//! Post-side domain helpers: tag parsing, validation, date formatting.

use time::{OffsetDateTime, format_description::FormatItem, macros::format_description};

/// Author recorded when a submission does not name one.
pub const DEFAULT_AUTHOR: &str = "Atelier Studio";

pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");

/// Parse a comma-separated tag field: split on commas, trim whitespace,
/// discard empty segments. Order is preserved and duplicates are allowed.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn format_publish_date(at: OffsetDateTime) -> String {
    at.format(HUMAN_DATE_FORMAT)
        .expect("valid calendar date")
}
