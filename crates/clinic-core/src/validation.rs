//! Input validation utilities.
//!
//! Form fields arrive as strings. These helpers coerce them into typed values and map
//! every failure to a field-specific `ClinicError` so the form can be redisplayed.

use crate::{ClinicError, ClinicResult};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use clinic_types::{optional_bounded, NonEmptyText};

/// Naive date-time layouts accepted after RFC 3339 has been tried.
///
/// `%.f` accepts an optional fractional part, so seconds-precision input matches too.
const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Offset-carrying layouts that RFC 3339 rejects (missing seconds, space separator).
const OFFSET_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M%:z",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validates a required, bounded text field.
///
/// # Errors
///
/// * `MissingField` if the value is empty after trimming.
/// * `FieldTooLong` if the trimmed value exceeds `max` characters.
pub fn required_text(field: &'static str, value: &str, max: usize) -> ClinicResult<NonEmptyText> {
    NonEmptyText::bounded(value, max).map_err(|e| ClinicError::from_text(field, e))
}

/// Validates an optional, bounded text field. Blank input becomes `None`.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> ClinicResult<Option<String>> {
    optional_bounded(value, max).map_err(|e| ClinicError::from_text(field, e))
}

/// Parses an optional ISO-8601 date.
///
/// A full ISO date-time is accepted as well and truncated to its calendar date as
/// written; an offset does not shift the day.
pub fn parse_optional_date(field: &'static str, value: Option<&str>) -> ClinicResult<Option<NaiveDate>> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Ok(Some(date));
    }
    if let Some(dt) = parse_with_offset(raw) {
        return Ok(Some(dt.date_naive()));
    }
    if let Some(dt) = parse_naive(raw) {
        return Ok(Some(dt.date()));
    }

    Err(ClinicError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

fn parse_with_offset(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).ok().or_else(|| {
        OFFSET_DATE_TIME_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(raw, format).ok())
    })
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// Parses a required ISO-8601 instant.
///
/// Values carrying a UTC offset are normalised to UTC. A bare date means midnight.
///
/// # Errors
///
/// * `MissingField` if the value is blank.
/// * `InvalidDate` if no accepted layout matches.
pub fn parse_date_time(field: &'static str, value: &str) -> ClinicResult<NaiveDateTime> {
    let raw = value.trim();
    if raw.is_empty() {
        return Err(ClinicError::MissingField { field });
    }

    if let Some(dt) = parse_with_offset(raw) {
        return Ok(dt.naive_utc());
    }
    if let Some(dt) = parse_naive(raw) {
        return Ok(dt);
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    Err(ClinicError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

/// Parses a surrogate id submitted as text (e.g. from a `<select>`).
pub fn parse_id(field: &'static str, value: &str) -> ClinicResult<i64> {
    let raw = value.trim();
    if raw.is_empty() {
        return Err(ClinicError::MissingField { field });
    }
    raw.parse::<i64>().map_err(|_| ClinicError::InvalidId {
        field,
        value: raw.to_string(),
    })
}

/// Normalises free-text notes: blank becomes `None`, anything else is kept verbatim.
pub fn optional_notes(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_parse_date_time_accepts_html_datetime_local() {
        // <input type="datetime-local"> submits minutes precision without seconds
        assert_eq!(
            parse_date_time("date", "2024-03-05T14:30").unwrap(),
            ymd_hms(2024, 3, 5, 14, 30, 0)
        );
        assert_eq!(
            parse_date_time("date", "2024-03-05 14:30:15").unwrap(),
            ymd_hms(2024, 3, 5, 14, 30, 15)
        );
        assert_eq!(
            parse_date_time("date", "2024-03-05T14:30:15.250").unwrap(),
            ymd_hms(2024, 3, 5, 14, 30, 15) + chrono::Duration::milliseconds(250)
        );
    }

    #[test]
    fn test_parse_date_time_normalises_offsets_to_utc() {
        assert_eq!(
            parse_date_time("date", "2024-03-05T14:30:00+02:00").unwrap(),
            ymd_hms(2024, 3, 5, 12, 30, 0)
        );
        assert_eq!(
            parse_date_time("date", "2024-03-05T14:30:00Z").unwrap(),
            ymd_hms(2024, 3, 5, 14, 30, 0)
        );
        assert_eq!(
            parse_date_time("date", "2024-03-05T14:30-05:00").unwrap(),
            ymd_hms(2024, 3, 5, 19, 30, 0)
        );
    }

    #[test]
    fn test_parse_date_time_bare_date_is_midnight() {
        assert_eq!(
            parse_date_time("date", "2024-03-05").unwrap(),
            ymd_hms(2024, 3, 5, 0, 0, 0)
        );
    }

    #[test]
    fn test_parse_date_time_rejects_garbage_and_blank() {
        assert!(matches!(
            parse_date_time("date", "next tuesday"),
            Err(ClinicError::InvalidDate { field: "date", .. })
        ));
        assert!(matches!(
            parse_date_time("date", "2024-02-30T10:00"),
            Err(ClinicError::InvalidDate { .. })
        ));
        assert!(matches!(
            parse_date_time("date", "  "),
            Err(ClinicError::MissingField { field: "date" })
        ));
    }

    #[test]
    fn test_parse_optional_date() {
        assert_eq!(parse_optional_date("birthdate", None).unwrap(), None);
        assert_eq!(parse_optional_date("birthdate", Some("")).unwrap(), None);
        assert_eq!(
            parse_optional_date("birthdate", Some("1990-07-14")).unwrap(),
            NaiveDate::from_ymd_opt(1990, 7, 14)
        );
        assert_eq!(
            parse_optional_date("birthdate", Some("1990-07-14T08:00:00")).unwrap(),
            NaiveDate::from_ymd_opt(1990, 7, 14)
        );
        assert_eq!(
            parse_optional_date("birthdate", Some("1990-07-14T02:00:00+05:00")).unwrap(),
            NaiveDate::from_ymd_opt(1990, 7, 14)
        );
        assert_eq!(
            parse_optional_date("birthdate", Some("1990-07-14T23:30-03:00")).unwrap(),
            NaiveDate::from_ymd_opt(1990, 7, 14)
        );
        assert!(matches!(
            parse_optional_date("birthdate", Some("14/07/1990")),
            Err(ClinicError::InvalidDate {
                field: "birthdate",
                ..
            })
        ));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("doctor_id", " 42 ").unwrap(), 42);
        assert!(matches!(
            parse_id("doctor_id", "forty-two"),
            Err(ClinicError::InvalidId {
                field: "doctor_id",
                ..
            })
        ));
        assert!(matches!(
            parse_id("patient_id", ""),
            Err(ClinicError::MissingField {
                field: "patient_id"
            })
        ));
    }

    #[test]
    fn test_optional_notes_keeps_text_verbatim() {
        assert_eq!(optional_notes(Some("   ")), None);
        assert_eq!(
            optional_notes(Some("  fasting since 8pm\n")),
            Some("  fasting since 8pm\n".to_string())
        );
    }
}
