
use chrono::{DateTime, Utc};

pub const MISSING_DATE: &str = "N/A";

pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => MISSING_DATE.to_string(),
    }
}

pub fn format_timestamp(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(date) => date.format("%Y-%m-%d %H:%M").to_string(),
        None => MISSING_DATE.to_string(),
    }
}

/// `true` when `message` mentions `needle`, ignoring ASCII case.
pub fn contains_ignore_case(message: &str, needle: &str) -> bool {
    message.to_ascii_lowercase().contains(&needle.to_ascii_lowercase())
}
