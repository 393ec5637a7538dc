use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time, UtcOffset};

use crate::error::{codes, AppError};

/// Calendar date of `ts` as seen from `offset` (the caller's local offset).
pub fn local_date(ts: OffsetDateTime, offset: UtcOffset) -> Date {
    ts.to_offset(offset).date()
}

/// Local midnight of `date` in `offset`.
pub fn start_of_day(date: Date, offset: UtcOffset) -> OffsetDateTime {
    date.with_time(Time::MIDNIGHT).assume_offset(offset)
}

// A `Date` has every component these descriptions read; formatting into a `String` does not fail.

/// `yyyy-MM-dd`
pub fn iso_date_key(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

/// `yyyy-MM`
pub fn month_key(date: Date) -> String {
    date.format(format_description!("[year]-[month]"))
        .unwrap_or_default()
}

/// `dd MMM yyyy`, e.g. `07 Nov 2024`.
pub fn display_date(date: Date) -> String {
    date.format(format_description!("[day] [month repr:short] [year]"))
        .unwrap_or_default()
}

/// Parse a user-supplied custom range bound into a calendar date.
///
/// Deterministic allowlist only (no fuzzy parsing):
/// - `yyyy-MM-dd`
/// - RFC3339; the calendar date is taken in the timestamp's own offset.
///
/// Blank input means "not supplied yet" and yields `Ok(None)`.
pub fn parse_date_bound(field: &str, raw_input: &str) -> Result<Option<Date>, AppError> {
    let trimmed = raw_input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if let Ok(date) = Date::parse(trimmed, format_description!("[year]-[month]-[day]")) {
        return Ok(Some(date));
    }

    if let Ok(dt) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Ok(Some(dt.date()));
    }

    Err(AppError::new(
        codes::FILTER_DATE_UNPARSEABLE,
        format!("Unparseable date for {field}; expected yyyy-MM-dd"),
    )
    .with_details(format!("raw={trimmed}")))
}
