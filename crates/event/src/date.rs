use eventflow_shared::{Error, Result};
use time::{Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description};

/// Parses `YYYY-MM-DD` (midnight UTC) or an RFC 3339 date-time into a unix
/// timestamp.
pub fn parse_date(value: &str) -> Result<i64> {
    let value = value.trim();

    if let Ok(datetime) = OffsetDateTime::parse(value, &Rfc3339) {
        return Ok(datetime.unix_timestamp());
    }

    let date = Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::Invalid("Invalid date format".to_owned()))?;

    Ok(date.midnight().assume_utc().unix_timestamp())
}

pub(crate) fn parse_future_date(value: &str, now: i64) -> Result<i64> {
    ensure_future(parse_date(value)?, now)
}

pub(crate) fn ensure_future(timestamp: i64, now: i64) -> Result<i64> {
    if timestamp <= now {
        eventflow_shared::invalid!("Event date must be in the future");
    }

    Ok(timestamp)
}

/// RFC 3339 rendering of a stored timestamp, empty when out of range.
pub fn format_date(timestamp: i64) -> String {
    OffsetDateTime::from_unix_timestamp(timestamp)
        .ok()
        .and_then(|datetime| datetime.format(&Rfc3339).ok())
        .unwrap_or_default()
}
