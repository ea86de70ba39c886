//! Permissive date/time string parsing.
//!
//! Converts free-form textual dates (ISO-style, US-style, RFC-style, or
//! ad-hoc mixes of numbers, month names, timezone abbreviations, and
//! separators) into a normalized, validated [`DateRecord`], resolving
//! ambiguity via positional and contextual heuristics. A strict
//! `year-month-day[Thh:mm:ss.mmm]` attempt runs first; everything else is
//! handled by a lenient token-driven fallback.
//!
//! ```
//! use datescan::DateRecord;
//!
//! let record = DateRecord::parse("Dec 25 1995 10:30 PM GMT")?;
//! assert_eq!((record.year, record.month, record.day), (1995, 11, 25));
//! assert_eq!(record.hour, 22);
//! assert_eq!(record.utc_offset_seconds, Some(0));
//! # Ok::<(), datescan::ParseError>(())
//! ```

mod composer;
mod consts;
mod keywords;
mod parser;
mod prelude;
mod scanner;
mod token;

pub use consts::*;

use crate::prelude::*;
use std::fmt;
use std::str::FromStr;

/// A parsed, validated date-time.
///
/// All fields are set on every successfully parsed record; a missing time
/// of day reads as midnight. Only the timezone may be genuinely absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRecord {
    pub year: i32,
    /// 0-based month, 0 = January.
    pub month: u8,
    /// Day of the month, 1-31.
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
    /// Offset east of UTC in seconds, or `None` when the input named no
    /// timezone.
    pub utc_offset_seconds: Option<i32>,
}

/// Why a date string failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The input was empty.
    #[error("Empty date string")]
    EmptyInput,
    /// The token stream cannot be read as a date in any supported shape.
    #[error("Malformed date string")]
    Malformed,
    /// More numeric fields than any date or time component can hold.
    #[error("Too many numeric fields")]
    TooManyFields,
    /// A field value fell outside its valid range.
    #[error("{field} out of range: {value}")]
    OutOfRange { field: DateField, value: i32 },
    /// No year/month/day could be established.
    #[error("No complete calendar date found")]
    MissingDate,
}

/// Output fields subject to range validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DateField {
    #[display(fmt = "month")]
    Month,
    #[display(fmt = "day")]
    Day,
    #[display(fmt = "hour")]
    Hour,
    #[display(fmt = "minute")]
    Minute,
    #[display(fmt = "second")]
    Second,
    #[display(fmt = "millisecond")]
    Millisecond,
    #[display(fmt = "timezone hour")]
    ZoneHour,
    #[display(fmt = "timezone minute")]
    ZoneMinute,
}

impl DateRecord {
    /// Parses a date string, treating Unicode whitespace as separators.
    ///
    /// # Errors
    /// Returns a [`ParseError`] when the input cannot plausibly represent a
    /// date; no partial record is ever produced.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Self::parse_with(input, char::is_whitespace)
    }

    /// Parses with a caller-supplied whitespace classifier, for embedders
    /// that define their own separator set.
    ///
    /// # Errors
    /// Returns a [`ParseError`] when the input cannot plausibly represent a
    /// date.
    pub fn parse_with<F>(input: &str, is_whitespace: F) -> Result<Self, ParseError>
    where
        F: Fn(char) -> bool,
    {
        parser::parse_record(input, is_whitespace)
    }

    /// Whether the record carries an explicit zero offset.
    pub fn is_utc(&self) -> bool {
        self.utc_offset_seconds == Some(0)
    }
}

impl FromStr for DateRecord {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DateRecord {
    /// Canonical `YYYY-MM-DDThh:mm:ss.mmm[Z|±hh:mm]` rendering. Years
    /// outside 0..=9999 use the six-digit signed form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if (0..=9999).contains(&self.year) {
            write!(f, "{:04}", self.year)?;
        } else {
            write!(f, "{:+07}", self.year)?;
        }
        write!(
            f,
            "-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
            self.month + 1,
            self.day,
            self.hour,
            self.minute,
            self.second,
            self.millisecond
        )?;
        match self.utc_offset_seconds {
            Some(0) => f.write_str("Z"),
            Some(offset) => {
                let sign = if offset < 0 { '-' } else { '+' };
                let magnitude = offset.unsigned_abs();
                write!(
                    f,
                    "{}{:02}:{:02}",
                    sign,
                    magnitude / 3600,
                    magnitude % 3600 / 60
                )
            }
            None => Ok(()),
        }
    }
}

impl serde::Serialize for DateRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for DateRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(input: &str) -> DateRecord {
        DateRecord::parse(input).unwrap_or_else(|e| panic!("{input:?} should parse: {e}"))
    }

    #[test]
    fn test_all_numeric_iso_triples() {
        for month in 1..=12u8 {
            for day in 1..=31u8 {
                let input = format!("2020-{month:02}-{day:02}");
                let parsed = record(&input);
                assert_eq!(
                    (parsed.year, parsed.month, parsed.day),
                    (2020, month - 1, day),
                    "for {input}"
                );
            }
        }
    }

    #[test]
    fn test_single_digit_fields() {
        let parsed = record("2020-1-5");
        assert_eq!((parsed.year, parsed.month, parsed.day), (2020, 0, 5));
    }

    #[test]
    fn test_two_digit_year_expansion() {
        assert_eq!(record("1/5/49").year, 2049);
        assert_eq!(record("1/5/50").year, 1950);
        assert_eq!(record("12/31/99").year, 1999);
        assert_eq!(record("12/31/0").year, 2000);
    }

    #[test]
    fn test_month_name_positions() {
        let expected = record("Jan 5 2020");
        assert_eq!((expected.year, expected.month, expected.day), (2020, 0, 5));
        assert_eq!(record("5 Jan 2020"), expected);
        assert_eq!(record("2020 Jan 5"), expected);
        assert_eq!(record("5-Jan-2020"), expected);
        assert_eq!(record("January 5, 2020"), expected);
    }

    #[test]
    fn test_range_boundaries() {
        assert!(matches!(
            DateRecord::parse("2020-01-32"),
            Err(ParseError::OutOfRange {
                field: DateField::Day,
                value: 32
            })
        ));
        assert!(matches!(
            DateRecord::parse("2020-13-01"),
            Err(ParseError::OutOfRange {
                field: DateField::Month,
                value: 13
            })
        ));
        assert!(matches!(
            DateRecord::parse("Jan 5 2020 25:00"),
            Err(ParseError::OutOfRange {
                field: DateField::Hour,
                value: 25
            })
        ));
    }

    #[test]
    fn test_timezone_designators() {
        assert_eq!(record("2020-01-01T00:00:00Z").utc_offset_seconds, Some(0));
        assert_eq!(
            record("2020-01-01T00:00:00+05:30").utc_offset_seconds,
            Some(19_800)
        );
        assert_eq!(
            record("2020-01-01T00:00:00+0530").utc_offset_seconds,
            Some(19_800)
        );
        assert_eq!(
            record("2020-01-01T00:00:00-08:00").utc_offset_seconds,
            Some(-28_800)
        );
        assert_eq!(record("2020-01-01T00:00:00").utc_offset_seconds, None);
        assert_eq!(record("2020-01-01").utc_offset_seconds, None);
    }

    #[test]
    fn test_meridiem_markers() {
        assert_eq!(record("Jan 5 2020 3:15 PM").hour, 15);
        assert_eq!(record("Jan 5 2020 3:15 PM").minute, 15);
        assert_eq!(record("Jan 5 2020 12:00 AM").hour, 0);
        assert_eq!(record("Jan 5 2020 12:00 PM").hour, 12);
        assert_eq!(record("Jan 5 2020 3:15 am").hour, 3);
    }

    #[test]
    fn test_time_only_fails() {
        assert_eq!(DateRecord::parse("12:30:00"), Err(ParseError::MissingDate));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(DateRecord::parse(""), Err(ParseError::EmptyInput));
        assert_eq!("".parse::<DateRecord>(), Err(ParseError::EmptyInput));
    }

    #[test]
    fn test_whitespace_and_comment_idempotence() {
        let expected = record("Dec 25 1995 10:30 PM GMT");
        let variants = [
            "Dec  25\t 1995   10:30 PM GMT",
            " Dec 25 1995 10:30 PM GMT ",
            "(happy holidays) Dec 25 1995 10:30 PM GMT",
            "Dec (nested (comment)) 25 1995 10:30 PM GMT",
            "Dec 25 1995 10:30 PM GMT (end)",
        ];
        for variant in variants {
            assert_eq!(record(variant), expected, "for {variant:?}");
        }
    }

    #[test]
    fn test_weekday_and_filler_words_are_ignored() {
        let parsed = record("Friday December 25 1995");
        assert_eq!((parsed.year, parsed.month, parsed.day), (1995, 11, 25));
    }

    #[test]
    fn test_display_canonical_form() {
        assert_eq!(
            record("Dec 25 1995 10:30 PM GMT").to_string(),
            "1995-12-25T22:30:00.000Z"
        );
        assert_eq!(record("2020-01-05").to_string(), "2020-01-05T00:00:00.000");
        assert_eq!(
            record("2020-01-05T10:30:45.678+05:30").to_string(),
            "2020-01-05T10:30:45.678+05:30"
        );
        assert_eq!(
            record("Jan 5 2020 10:30 GMT-8").to_string(),
            "2020-01-05T10:30:00.000-08:00"
        );
    }

    #[test]
    fn test_round_trip() {
        let inputs = [
            "2020-01-05",
            "2020-01-05T10:30:45.678Z",
            "2020-02-29T23:59:59.999-08:00",
            "+123456-01-01",
            "25/12/1995 3:15 PM",
            "Jan 5 2020 EST",
        ];
        for input in inputs {
            let parsed = record(input);
            let reparsed = record(&parsed.to_string());
            assert_eq!(parsed, reparsed, "round trip of {input:?}");
        }
    }

    #[test]
    fn test_named_timezones() {
        assert_eq!(record("Dec 25 1995 EST").utc_offset_seconds, Some(-18_000));
        assert_eq!(
            record("Dec 25 1995 10:30 pst").utc_offset_seconds,
            Some(-28_800)
        );
        assert!(record("Dec 25 1995 UTC").is_utc());
        assert!(!record("Dec 25 1995").is_utc());
    }

    #[test]
    fn test_from_str_round_trip() {
        let parsed: DateRecord = "2020-01-05T10:30:00.000Z".parse().expect("valid date");
        assert_eq!(parsed.to_string(), "2020-01-05T10:30:00.000Z");
    }

    #[test]
    fn test_serde_string_format() {
        let parsed = record("2020-01-05T10:30:00.000Z");
        let json = serde_json::to_string(&parsed).expect("serializable");
        assert_eq!(json, r#""2020-01-05T10:30:00.000Z""#);
        let restored: DateRecord = serde_json::from_str(&json).expect("deserializable");
        assert_eq!(parsed, restored);
    }

    #[test]
    fn test_serde_validates() {
        assert!(serde_json::from_str::<DateRecord>(r#""2020-13-01""#).is_err());
        assert!(serde_json::from_str::<DateRecord>(r#""not a date""#).is_err());
        assert!(serde_json::from_str::<DateRecord>(r#""""#).is_err());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ParseError::OutOfRange {
                field: DateField::Month,
                value: 13
            }
            .to_string(),
            "month out of range: 13"
        );
        assert_eq!(ParseError::EmptyInput.to_string(), "Empty date string");
        assert_eq!(
            ParseError::MissingDate.to_string(),
            "No complete calendar date found"
        );
    }

    #[test]
    fn test_custom_whitespace_classifier() {
        let parsed = DateRecord::parse_with("Jan!5!2020", |c| c == '!').expect("valid date");
        assert_eq!((parsed.year, parsed.month, parsed.day), (2020, 0, 5));
    }

    #[test]
    fn test_day_bound_is_range_only() {
        // Per-month day counts are out of scope; 31 is accepted everywhere.
        let parsed = record("2020-02-31");
        assert_eq!((parsed.month, parsed.day), (1, 31));
    }
}
