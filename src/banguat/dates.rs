//! Date normalization for the Banguat feed.
//!
//! The service reports dates as `DD/MM/YYYY` while storage and the API use
//! `YYYY-MM-DD`. Unrecognized input falls back to the current date so one
//! odd record never aborts a whole fetch.

use chrono::Utc;

/// Normalizes a feed date into `YYYY-MM-DD`. Never fails.
///
/// Already-canonical input passes through untouched; `D/M/YYYY` and
/// `DD/MM/YYYY` are rearranged with zero padding; anything else logs a
/// warning and yields today's date (UTC).
pub fn normalize_date(raw: &str) -> String {
    if raw.is_empty() {
        return today();
    }
    if is_canonical(raw) {
        return raw.to_string();
    }
    if let Some(converted) = convert_slash_date(raw) {
        return converted;
    }
    tracing::warn!("Unrecognized date format in feed: {:?}", raw);
    today()
}

/// Today's date (UTC) as `YYYY-MM-DD`
pub fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

// Shape check only (\d{4}-\d{2}-\d{2}); values are not calendar-validated.
fn is_canonical(raw: &str) -> bool {
    let b = raw.as_bytes();
    b.len() == 10
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[7] == b'-'
        && b[8..].iter().all(u8::is_ascii_digit)
}

fn convert_slash_date(raw: &str) -> Option<String> {
    let mut parts = raw.split('/');
    let day = parts.next()?;
    let month = parts.next()?;
    let year = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if day.is_empty() || day.len() > 2 || !digits(day) {
        return None;
    }
    if month.is_empty() || month.len() > 2 || !digits(month) {
        return None;
    }
    if year.len() != 4 || !digits(year) {
        return None;
    }
    Some(format!("{}-{:0>2}-{:0>2}", year, month, day))
}
