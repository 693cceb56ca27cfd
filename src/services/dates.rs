use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Layouts carrying an explicit offset
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M:%S%z",
    "%a, %d %b %Y %H:%M %z",
    "%d %b %Y %H:%M:%S %z",
    "%a %b %d %H:%M:%S %z %Y",
];

/// Layouts without offset, read as UTC
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%a, %d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d %B %Y", "%B %d, %Y", "%d/%m/%Y"];

/// Parse a feed date, whatever its format. An empty or unreadable date becomes `now`, so the
/// original publication time is lost for malformed dates.
pub fn parse_date(input: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    let Some(raw) = input.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return now;
    };

    match try_parse(raw) {
        Some(date) => date,
        None => {
            tracing::debug!("Unreadable date {:?}, using ingestion time instead", raw);
            now
        }
    }
}

fn try_parse(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }

    if let Ok(date) = DateTime::parse_from_rfc2822(raw) {
        return Some(date.with_timezone(&Utc));
    }

    let offset = OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(raw, format).ok())
        .map(|date| date.with_timezone(&Utc));
    if offset.is_some() {
        return offset;
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok());
    if let Some(naive) = naive {
        return Some(Utc.from_utc_datetime(&naive));
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
