use chrono::{ DateTime, NaiveDate, NaiveTime, Utc };

use crate::error::{ AppError, Result };

/// Which end of a range a date-only value stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates. A plain date
/// expands to the first or last instant of that day depending on `bound`.
pub fn parse_timestamp(field: &str, raw: &str, bound: Bound) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid_date(field, raw))?;
    let time = match bound {
        Bound::Start => NaiveTime::MIN,
        Bound::End =>
            NaiveTime::from_hms_milli_opt(23, 59, 59, 999).ok_or_else(|| invalid_date(field, raw))?,
    };

    Ok(date.and_time(time).and_utc())
}

pub fn parse_optional_timestamp(
    field: &str,
    raw: Option<&str>,
    bound: Bound
) -> Result<Option<DateTime<Utc>>> {
    raw.filter(|r| !r.trim().is_empty())
        .map(|r| parse_timestamp(field, r, bound))
        .transpose()
}

/// Calendar date from `YYYY-MM-DD` or the date part of an RFC 3339 timestamp.
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|ts| ts.date_naive()))
        .map_err(|_| invalid_date(field, raw))
}

pub fn parse_optional_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.filter(|r| !r.trim().is_empty())
        .map(|r| parse_date(field, r))
        .transpose()
}

/// Query values that arrive empty (`?user_id=`) count as absent.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn invalid_date(field: &str, raw: &str) -> AppError {
    AppError::InvalidInput(format!("Invalid {}: {}", field, raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{ Datelike, Timelike };

    #[test]
    fn test_rfc3339_is_normalised_to_utc() {
        let ts = parse_timestamp("start_date", "2025-03-01T10:00:00+02:00", Bound::Start).unwrap();
        assert_eq!(ts.hour(), 8);
    }

    #[test]
    fn test_plain_date_expands_to_day_bounds() {
        let start = parse_timestamp("start_date", "2025-03-01", Bound::Start).unwrap();
        assert_eq!((start.hour(), start.minute(), start.second()), (0, 0, 0));

        let end = parse_timestamp("end_date", "2025-03-01", Bound::End).unwrap();
        assert_eq!(end.day(), 1);
        assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));
    }

    #[test]
    fn test_garbage_dates_are_rejected() {
        let err = parse_timestamp("before_date", "yesterday", Bound::End).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Invalid before_date: yesterday");
        assert!(parse_date("start_date", "2025-13-40").is_err());
    }

    #[test]
    fn test_blank_values_are_absent() {
        assert_eq!(parse_optional_timestamp("start_date", Some("  "), Bound::Start).unwrap(), None);
        assert_eq!(parse_optional_date("end_date", None).unwrap(), None);
        assert_eq!(non_empty(Some("".to_string())), None);
    }

    #[test]
    fn test_date_from_timestamp() {
        let date = parse_date("start_date", "2025-03-01T23:30:00Z").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }
}
