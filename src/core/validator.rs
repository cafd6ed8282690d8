//! Field-local checks applied to every query before it is sent.
//!
//! Each check fails on the first violation it finds; callers get one error at a time.

use chrono::NaiveDate;

use super::error::{Error, Result};

/// The textual date pattern accepted by the API.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Oldest date the API has rates for.
pub const OLDEST_DATE: &str = "1999-01-04";

/// Longest allowed time frame in hours, slightly under 365 days.
pub const MAX_TIMEFRAME_HOURS: f64 = 8759.992992006;

/// Fails unless `code` is exactly three characters long. There is no charset check.
pub fn validate_code(code: &str) -> Result<()> {
    if code.len() != 3 {
        return Err(Error::InvalidCode);
    }
    Ok(())
}

/// Validates every code in `symbols`, stopping at the first invalid one.
pub fn validate_symbols<S: AsRef<str>>(symbols: &[S]) -> Result<()> {
    symbols
        .iter()
        .try_for_each(|code| validate_code(code.as_ref()))
}

/// Parses a `YYYY-MM-DD` date. Only zero-padded four digit years and two digit
/// months and days are accepted.
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    let bytes = date.as_bytes();
    let well_shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_shaped {
        return Err(Error::InvalidDateFormat {
            date: date.to_string(),
        });
    }

    NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| Error::InvalidDateFormat {
        date: date.to_string(),
    })
}

fn oldest_date() -> NaiveDate {
    NaiveDate::parse_from_str(OLDEST_DATE, DATE_FORMAT).expect("OLDEST_DATE is a valid date")
}

/// Fails if `date` is malformed or older than [`OLDEST_DATE`].
pub fn validate_date(date: &str) -> Result<()> {
    let selected = parse_date(date)?;
    if selected < oldest_date() {
        return Err(Error::InvalidDate);
    }
    Ok(())
}

/// Checks that `start..=end` is ordered and spans no more than [`MAX_TIMEFRAME_HOURS`].
pub fn validate_time_frame(start: &str, end: &str) -> Result<()> {
    let from = parse_date(start)?;
    let to = parse_date(end)?;
    if to < from {
        return Err(Error::InvalidTimeFrame);
    }

    let hours = (to - from).num_seconds() as f64 / 3600.0;
    if hours > MAX_TIMEFRAME_HOURS {
        return Err(Error::TimeframeExceeded);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_code_length() {
        assert!(validate_code("USD").is_ok());
        assert!(validate_code("btc").is_ok());
        assert!(validate_code("1$_").is_ok());

        for code in ["", "U", "US", "USDT", "EURO"] {
            assert!(
                matches!(validate_code(code), Err(Error::InvalidCode)),
                "{code:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_symbols_stops_at_first_invalid() {
        assert!(validate_symbols(&["USD", "EUR", "GBP"]).is_ok());
        assert!(validate_symbols::<&str>(&[]).is_ok());
        assert!(matches!(
            validate_symbols(&["USD", "EURO", "GB"]),
            Err(Error::InvalidCode)
        ));
    }

    #[test]
    fn test_validate_date_floor() {
        assert!(matches!(validate_date("1999-01-03"), Err(Error::InvalidDate)));
        assert!(matches!(validate_date("1970-01-01"), Err(Error::InvalidDate)));
        assert!(validate_date("1999-01-04").is_ok());
        assert!(validate_date("2020-02-29").is_ok());
    }

    #[test]
    fn test_validate_date_format() {
        for date in [
            "99-1-4",
            "1999-1-04",
            "1999/01/04",
            "04-01-1999",
            "2021-13-01",
            "2021-02-30",
            "+999-01-04",
            "",
            "2021-01-01T00:00:00",
        ] {
            assert!(
                matches!(validate_date(date), Err(Error::InvalidDateFormat { .. })),
                "{date:?} should be a format error"
            );
        }
    }

    #[test]
    fn test_validate_time_frame_order() {
        assert!(matches!(
            validate_time_frame("2020-01-01", "2019-12-31"),
            Err(Error::InvalidTimeFrame)
        ));
        assert!(validate_time_frame("2020-01-01", "2020-01-01").is_ok());
        assert!(validate_time_frame("2020-01-01", "2020-06-01").is_ok());
    }

    #[test]
    fn test_validate_time_frame_span() {
        // 364 days
        assert!(validate_time_frame("2021-01-01", "2021-12-31").is_ok());
        // 365 days
        assert!(matches!(
            validate_time_frame("2021-01-01", "2022-01-01"),
            Err(Error::TimeframeExceeded)
        ));
        // 365 days, leap year
        assert!(matches!(
            validate_time_frame("2020-01-01", "2020-12-31"),
            Err(Error::TimeframeExceeded)
        ));
    }

    #[test]
    fn test_validate_time_frame_format_errors_propagate() {
        assert!(matches!(
            validate_time_frame("2020-1-1", "2020-02-01"),
            Err(Error::InvalidDateFormat { date }) if date == "2020-1-1"
        ));
        assert!(matches!(
            validate_time_frame("2020-01-01", "tomorrow"),
            Err(Error::InvalidDateFormat { date }) if date == "tomorrow"
        ));
    }
}
