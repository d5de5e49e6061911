//! Loose calendar-date parsing.
//!
//! Accepts the phrases people type into queries (`12 Jun 2016`, `June 12`,
//! `12/06/2016`, `12h59 Jun-12`) as well as the `Tue Jun 12 10:00:00 2016`
//! form written into records. Components the phrase leaves out are filled
//! toward the start or the end of their natural range, so a bare `June`
//! is either the first or the last instant of June.
//!
//! Parsing happens in two passes:
//! 1. Definitive matches: month names, 4-digit years, 2-digit days above 12
//!    and `HH[:mm[:ss]]` times. Each component may be claimed once.
//! 2. Residual numbers are assigned day, then month, then year.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

const WEEKDAYS: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

const SEPARATORS: [char; 8] = [',', '\t', ' ', '\n', '\r', '\\', '/', '-'];

static TIME_OF_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})[:h](\d{1,2})?(?::(\d{1,2}))?$").expect("time-of-day pattern is valid")
});

/// Why a phrase could not be read as a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("more than one year in date")]
    AmbiguousYear,
    #[error("month missing or given more than once")]
    AmbiguousMonth,
    #[error("more than one day in date")]
    AmbiguousDay,
    #[error("more than one hour in date")]
    AmbiguousHour,
    #[error("more than one minute in date")]
    AmbiguousMin,
    #[error("more than one second in date")]
    AmbiguousSec,
    #[error("unrecognised date field")]
    UnknownField,
    #[error("date does not exist")]
    Invalid,
}

#[derive(Debug, Default)]
struct Components {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    min: Option<u32>,
    sec: Option<u32>,
}

fn claim<T>(slot: &mut Option<T>, value: T, err: DateError) -> Result<(), DateError> {
    if slot.is_some() {
        return Err(err);
    }
    *slot = Some(value);
    Ok(())
}

/// One-based position of the name `token` starts with.
fn name_number(token: &str, names: &[&str]) -> Option<u32> {
    if token.len() < 3 || !token.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    (1u32..)
        .zip(names)
        .find_map(|(number, name)| token.starts_with(*name).then_some(number))
}

fn all_digits(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

/// First pass. Returns `true` when the token was consumed.
fn claim_definitive(token: &str, parts: &mut Components) -> Result<bool, DateError> {
    if let Some(month) = name_number(token, &MONTHS) {
        claim(&mut parts.month, month, DateError::AmbiguousMonth)?;
        return Ok(true);
    }
    if name_number(token, &WEEKDAYS).is_some() {
        return Ok(true);
    }
    if token.len() == 4 && all_digits(token) {
        let year = token.parse().map_err(|_| DateError::UnknownField)?;
        claim(&mut parts.year, year, DateError::AmbiguousYear)?;
        return Ok(true);
    }
    if token.len() == 2 && all_digits(token) {
        let day: u32 = token.parse().map_err(|_| DateError::UnknownField)?;
        if day > 12 {
            claim(&mut parts.day, day, DateError::AmbiguousDay)?;
            return Ok(true);
        }
        return Ok(false);
    }
    if token.contains([':', 'h']) {
        let caps = TIME_OF_DAY
            .captures(token)
            .ok_or(DateError::UnknownField)?;
        let number = |index: usize| caps.get(index).and_then(|m| m.as_str().parse::<u32>().ok());

        if let Some(hour) = number(1) {
            claim(&mut parts.hour, hour, DateError::AmbiguousHour)?;
        }
        if let Some(min) = number(2) {
            claim(&mut parts.min, min, DateError::AmbiguousMin)?;
        }
        if let Some(sec) = number(3) {
            claim(&mut parts.sec, sec, DateError::AmbiguousSec)?;
        }
        return Ok(true);
    }
    Ok(false)
}

/// Second pass: whatever is left must be a bare number.
fn claim_residual(token: &str, parts: &mut Components) -> Result<(), DateError> {
    if !all_digits(token) {
        return Err(DateError::UnknownField);
    }
    let value: u32 = token.parse().map_err(|_| DateError::UnknownField)?;

    if parts.day.is_none() {
        parts.day = Some(value);
    } else if parts.month.is_none() {
        parts.month = Some(value);
    } else if parts.year.is_none() {
        parts.year = Some(i32::try_from(value).map_err(|_| DateError::UnknownField)?);
    } else {
        return Err(DateError::UnknownField);
    }
    Ok(())
}

fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    next.pred_opt()
        .filter(|last| *last >= first)
        .map(|last| last.day())
}

/// Parse `text` into calendar components without attaching a time zone.
///
/// `round_toward_start` picks the earliest instant for components the text
/// leaves out; otherwise the latest. `today` supplies the default year.
///
/// # Errors
///
/// Returns the [`DateError`] describing the first component that could not
/// be assigned, or [`DateError::Invalid`] when the components do not form a
/// real date and time.
pub fn parse_naive_on(
    text: &str,
    round_toward_start: bool,
    today: NaiveDate,
) -> Result<NaiveDateTime, DateError> {
    let lowered = text.to_lowercase();
    let mut tokens: Vec<Option<&str>> = lowered
        .split(SEPARATORS)
        .filter(|token| !token.is_empty())
        .map(Some)
        .collect();

    let mut parts = Components::default();

    for slot in &mut tokens {
        if let Some(token) = *slot {
            if claim_definitive(token, &mut parts)? {
                *slot = None;
            }
        }
    }

    for token in tokens.into_iter().flatten() {
        claim_residual(token, &mut parts)?;
    }

    if parts.day.is_none() && parts.month.is_none() {
        return Err(DateError::AmbiguousMonth);
    }

    let year = parts.year.unwrap_or_else(|| today.year());
    let month = parts
        .month
        .unwrap_or(if round_toward_start { 1 } else { 12 });
    let day = match parts.day {
        Some(day) => day,
        None if round_toward_start => 1,
        None => last_day_of_month(year, month).ok_or(DateError::Invalid)?,
    };
    let (hour, min, sec) = if round_toward_start { (0, 0, 0) } else { (23, 59, 59) };

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(DateError::Invalid)?;
    let time = NaiveTime::from_hms_opt(
        parts.hour.unwrap_or(hour),
        parts.min.unwrap_or(min),
        parts.sec.unwrap_or(sec),
    )
    .ok_or(DateError::Invalid)?;

    Ok(date.and_time(time))
}

/// Parse `text` as a local timestamp, defaulting the year from `today`.
///
/// # Errors
///
/// See [`parse_naive_on`]. A local time skipped by a DST transition is
/// [`DateError::Invalid`].
pub fn parse_date_on(
    text: &str,
    round_toward_start: bool,
    today: NaiveDate,
) -> Result<DateTime<Local>, DateError> {
    let naive = parse_naive_on(text, round_toward_start, today)?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or(DateError::Invalid)
}

/// Parse `text` as a local timestamp relative to the current date.
///
/// # Errors
///
/// See [`parse_date_on`].
pub fn parse_date(text: &str, round_toward_start: bool) -> Result<DateTime<Local>, DateError> {
    parse_date_on(text, round_toward_start, Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;
    use chrono::Timelike;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
    }

    fn ymd_hms(text: &str, from: bool) -> (i32, u32, u32, u32, u32, u32) {
        let parsed = parse_naive_on(text, from, today())
            .unwrap_or_else(|err| panic!("{text:?} should parse: {err}"));
        (
            parsed.year(),
            parsed.month(),
            parsed.day(),
            parsed.hour(),
            parsed.minute(),
            parsed.second(),
        )
    }

    #[test]
    fn test_day_month_year_variants() {
        init_test_logging();
        for text in [
            "12 June 2016",
            "12 Jun 2016",
            "12 Jun, 2016",
            "12-June-2016",
            "12/6/2016",
            "12/06/2016",
        ] {
            assert_eq!(ymd_hms(text, true), (2016, 6, 12, 0, 0, 0), "{text}");
        }
    }

    #[test]
    fn test_missing_year_uses_current_year() {
        init_test_logging();
        assert_eq!(ymd_hms("June 12", true), (2026, 6, 12, 0, 0, 0));
        assert_eq!(ymd_hms("Jun-12", true), (2026, 6, 12, 0, 0, 0));
        assert_eq!(ymd_hms("12 June ", true), (2026, 6, 12, 0, 0, 0));
    }

    #[test]
    fn test_time_of_day() {
        init_test_logging();
        assert_eq!(
            ymd_hms(" 12:59:5 12 June 2016", true),
            (2016, 6, 12, 12, 59, 5)
        );
        assert_eq!(ymd_hms(" 12h59:5 June 12", true), (2026, 6, 12, 12, 59, 5));
        assert_eq!(
            ymd_hms("12 Jun 23:01:19 2016", true),
            (2016, 6, 12, 23, 1, 19)
        );
        assert_eq!(ymd_hms("12:30 Jun 12", false), (2026, 6, 12, 12, 30, 59));
    }

    #[test]
    fn test_record_timestamp_form() {
        init_test_logging();
        assert_eq!(
            ymd_hms("Tue Jun 12 10:00:00 2016", true),
            (2016, 6, 12, 10, 0, 0)
        );
        assert_eq!(
            ymd_hms("Sun Jun  5 08:15:00 2016", true),
            (2016, 6, 5, 8, 15, 0)
        );
    }

    #[test]
    fn test_rounding_direction() {
        init_test_logging();
        assert_eq!(ymd_hms("June 2016", true), (2016, 6, 1, 0, 0, 0));
        assert_eq!(ymd_hms("June 2016", false), (2016, 6, 30, 23, 59, 59));
        assert_eq!(ymd_hms("Dec", false), (2026, 12, 31, 23, 59, 59));
    }

    #[test]
    fn test_february_end_follows_leap_years() {
        init_test_logging();
        assert_eq!(ymd_hms("Feb 2024", false).2, 29);
        assert_eq!(ymd_hms("Feb 2023", false).2, 28);
        assert_eq!(ymd_hms("Feb 1900", false).2, 28);
        assert_eq!(ymd_hms("Feb 2000", false).2, 29);
    }

    #[test]
    fn test_impossible_dates_are_invalid() {
        init_test_logging();
        assert_eq!(
            parse_naive_on("30 Feb 2016", true, today()),
            Err(DateError::Invalid)
        );
        assert_eq!(
            parse_naive_on(" 12:69:5 12 June ", true, today()),
            Err(DateError::Invalid)
        );
        assert_eq!(
            parse_naive_on("31 4 2016", true, today()),
            Err(DateError::Invalid)
        );
    }

    #[test]
    fn test_ambiguity_errors() {
        init_test_logging();
        let cases = [
            ("2016", DateError::AmbiguousMonth),
            ("", DateError::AmbiguousMonth),
            ("Jun Jul 12", DateError::AmbiguousMonth),
            ("12 Jun 2015 2016", DateError::AmbiguousYear),
            ("13 14 Jun", DateError::AmbiguousDay),
            ("10:00 11:00 Jun 12", DateError::AmbiguousHour),
        ];
        for (text, expected) in cases {
            assert_eq!(parse_naive_on(text, true, today()), Err(expected), "{text}");
        }
    }

    #[test]
    fn test_unknown_fields() {
        init_test_logging();
        for text in ["open", "0x1234abcd", "12 Jun 2016 extra", "1 2 3 4", "chris"] {
            assert_eq!(
                parse_naive_on(text, true, today()),
                Err(DateError::UnknownField),
                "{text}"
            );
        }
    }

    #[test]
    fn test_bare_small_number_is_a_day() {
        init_test_logging();
        assert_eq!(ymd_hms("5", true), (2026, 1, 5, 0, 0, 0));
    }

    #[test]
    fn test_local_timestamp_matches_components() {
        init_test_logging();
        let parsed = parse_date("12 Jun 2016", true).expect("parse");
        assert_eq!(
            (parsed.year(), parsed.month(), parsed.day()),
            (2016, 6, 12)
        );
    }
}
