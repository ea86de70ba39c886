//! The two cooperating parse strategies: a structured year-month-day
//! attempt followed by a lenient token-driven fallback, both feeding the
//! same composers.

use crate::composer::{DayComposer, TimeComposer, TimeZoneComposer};
use crate::consts::MAX_SIGNIFICANT_DIGITS;
use crate::keywords::KeywordCategory;
use crate::token::{DateToken, Tokenizer};
use crate::{DateRecord, ParseError};

pub(crate) fn parse_record<F>(input: &str, is_whitespace: F) -> Result<DateRecord, ParseError>
where
    F: Fn(char) -> bool,
{
    if input.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    let mut scanner = Tokenizer::new(input, is_whitespace);
    let mut day = DayComposer::default();
    let mut time = TimeComposer::default();
    let mut tz = TimeZoneComposer::default();

    let first_unhandled = parse_structured(&mut scanner, &mut day, &mut time, &mut tz);
    if first_unhandled == DateToken::Invalid {
        return Err(ParseError::Malformed);
    }
    parse_lenient(&mut scanner, first_unhandled, &mut day, &mut time, &mut tz)?;

    let (year, month, day) = day.finalize()?;
    let (hour, minute, second, millisecond) = time.finalize()?;
    let utc_offset_seconds = tz.finalize()?;
    Ok(DateRecord {
        year,
        month: month as u8,
        day: day as u8,
        hour: hour as u8,
        minute: minute as u8,
        second: second as u8,
        millisecond: millisecond as u16,
        utc_offset_seconds,
    })
}

/// Attempt the structured `year-month-day[Thh:mm[:ss[.sss]]][Z|±hh:mm|±hhmm]`
/// format, where the year is four digits (or six with a sign) and the other
/// date and time fields two.
///
/// Returns the first token the lenient strategy should continue from:
/// `EndOfInput` when the input was fully consumed, `Invalid` when the time
/// part began but is terminally malformed. The composers keep whatever was
/// accumulated before a bail-out.
fn parse_structured<F>(
    scanner: &mut Tokenizer<'_, F>,
    day: &mut DayComposer,
    time: &mut TimeComposer,
    tz: &mut TimeZoneComposer,
) -> DateToken
where
    F: Fn(char) -> bool,
{
    match scanner.peek() {
        token if token.ascii_sign().is_some() => {
            // Extended six-digit year. The sign token is handed back to the
            // lenient strategy if the shape does not hold.
            let sign_token = scanner.next();
            let sign = match sign_token.ascii_sign() {
                Some(sign) => sign,
                None => return sign_token,
            };
            let year = match scanner.peek() {
                DateToken::Number { value, digits: 6 } => value,
                _ => return sign_token,
            };
            if sign < 0 && year == 0 {
                // A minus-zero year is not a date.
                return sign_token;
            }
            scanner.next();
            day.add(sign * year as i32, 6);
        }
        DateToken::Number { value, digits: 4 } => {
            scanner.next();
            day.add(value as i32, 4);
        }
        _ => return scanner.next(),
    }
    if scanner.skip_symbol('-') {
        match scanner.peek() {
            DateToken::Number { value, digits: 2 } if DayComposer::is_month(value as i32) => {
                scanner.next();
                day.add(value as i32, 2);
            }
            _ => return scanner.next(),
        }
        if scanner.skip_symbol('-') {
            match scanner.peek() {
                DateToken::Number { value, digits: 2 } if DayComposer::is_day(value as i32) => {
                    scanner.next();
                    day.add(value as i32, 2);
                }
                _ => return scanner.next(),
            }
        }
    }
    if scanner.peek().is_keyword(KeywordCategory::TimeSeparator) {
        scanner.next();
        match scanner.peek() {
            DateToken::Number { value, digits: 2 } if TimeComposer::is_hour(value) => {
                scanner.next();
                time.add(value);
            }
            _ => return DateToken::Invalid,
        }
        if !scanner.skip_symbol(':') {
            return DateToken::Invalid;
        }
        match scanner.peek() {
            DateToken::Number { value, digits: 2 } if TimeComposer::is_minute(value) => {
                scanner.next();
                time.add(value);
            }
            _ => return DateToken::Invalid,
        }
        if scanner.skip_symbol(':') {
            match scanner.peek() {
                DateToken::Number { value, digits: 2 } if TimeComposer::is_second(value) => {
                    scanner.next();
                    time.add(value);
                }
                _ => return DateToken::Invalid,
            }
            if scanner.skip_symbol('.') {
                match scanner.peek() {
                    DateToken::Number { value, digits } => {
                        scanner.next();
                        time.add(read_milliseconds(value, digits));
                    }
                    _ => return DateToken::Invalid,
                }
            }
        }
        if scanner.peek().is_zulu() {
            scanner.next();
            tz.set(0);
        } else if let Some(sign) = scanner.peek().ascii_sign() {
            scanner.next();
            tz.set_sign(sign);
            match scanner.peek() {
                DateToken::Number { value, digits: 4 } => {
                    scanner.next();
                    let (hour, minute) = (value / 100, value % 100);
                    if !TimeComposer::is_hour(hour) || !TimeComposer::is_minute(minute) {
                        return DateToken::Invalid;
                    }
                    tz.set_hour(hour);
                    tz.set_minute(minute);
                }
                DateToken::Number { value, digits: 2 } if TimeComposer::is_hour(value) => {
                    scanner.next();
                    tz.set_hour(value);
                    if !scanner.skip_symbol(':') {
                        return DateToken::Invalid;
                    }
                    match scanner.peek() {
                        DateToken::Number { value, digits: 2 } if TimeComposer::is_minute(value) => {
                            scanner.next();
                            tz.set_minute(value);
                        }
                        _ => return DateToken::Invalid,
                    }
                }
                _ => return DateToken::Invalid,
            }
        }
        if scanner.peek() != DateToken::EndOfInput {
            return DateToken::Invalid;
        }
    } else if scanner.peek() != DateToken::EndOfInput {
        return scanner.next();
    }
    day.set_iso_date();
    DateToken::EndOfInput
}

/// The permissive fallback: consume tokens until end of input, routing each
/// number to whichever composer expects it and folding keywords in.
fn parse_lenient<F>(
    scanner: &mut Tokenizer<'_, F>,
    first: DateToken,
    day: &mut DayComposer,
    time: &mut TimeComposer,
    tz: &mut TimeZoneComposer,
) -> Result<(), ParseError>
where
    F: Fn(char) -> bool,
{
    let mut has_read_number = !day.is_empty();
    let mut token = first;
    while token != DateToken::EndOfInput {
        match token {
            DateToken::Number { value: n, digits } => {
                has_read_number = true;
                if scanner.skip_symbol(':') {
                    if scanner.skip_symbol(':') {
                        // "hh::" shorthand for hh:00:
                        if !time.is_empty() {
                            return Err(ParseError::Malformed);
                        }
                        time.add(n);
                        time.add(0);
                    } else {
                        if !time.add(n) {
                            return Err(ParseError::TooManyFields);
                        }
                        if scanner.peek().is_symbol('.') {
                            scanner.next();
                        }
                    }
                } else if scanner.skip_symbol('.') && time.is_expecting(n) {
                    time.add(n);
                    let (value, digits) = match scanner.peek() {
                        DateToken::Number { value, digits } => {
                            scanner.next();
                            (value, digits)
                        }
                        _ => return Err(ParseError::Malformed),
                    };
                    if !time.add_final(read_milliseconds(value, digits)) {
                        return Err(ParseError::TooManyFields);
                    }
                } else if tz.is_expecting(n) {
                    tz.set_minute(n);
                } else if time.is_expecting(n) {
                    time.add_final(n);
                } else {
                    if !day.add(n as i32, digits) {
                        return Err(ParseError::TooManyFields);
                    }
                    scanner.skip_symbol('-');
                }
            }
            DateToken::Keyword {
                category, value, ..
            } => match category {
                KeywordCategory::AmPm if !time.is_empty() => {
                    time.set_hour_offset(value as u32);
                }
                KeywordCategory::MonthName => {
                    day.set_named_month(value as u32);
                    scanner.skip_symbol('-');
                }
                KeywordCategory::TimeZoneName if has_read_number => {
                    tz.set(value);
                }
                KeywordCategory::TimeSeparator => {
                    // Punctuation between date and time.
                }
                _ => {
                    // A meridiem with no time or a timezone name before any
                    // number is treated as noise.
                }
            },
            DateToken::Symbol(symbol @ ('+' | '-')) if tz.is_utc() || !time.is_empty() => {
                // A numeric offset is only plausible right after a UTC
                // keyword or a time of day.
                tz.set_sign(if symbol == '-' { -1 } else { 1 });
                let (n, digits) = match scanner.peek() {
                    DateToken::Number { value, digits } => {
                        scanner.next();
                        (value, digits)
                    }
                    _ => (0, 0),
                };
                has_read_number = true;
                if scanner.peek().is_symbol(':') {
                    tz.set_hour(n);
                    tz.expect_minute();
                } else if digits == 1 || digits == 2 {
                    // Whole-hour offsets like GMT-8.
                    tz.set_hour(n);
                    tz.set_minute(0);
                } else if digits == 3 || digits == 4 {
                    tz.set_hour(n / 100);
                    tz.set_minute(n % 100);
                } else {
                    return Err(ParseError::Malformed);
                }
            }
            DateToken::Symbol('+' | '-' | ')') if has_read_number => {
                // A stray sign or unmatched parenthesis is legal only before
                // the first number.
                return Err(ParseError::Malformed);
            }
            DateToken::Invalid => return Err(ParseError::Malformed),
            _ => {
                // Whitespace, unknown words and remaining symbols are noise.
            }
        }
        token = scanner.next();
    }
    Ok(())
}

/// Normalize a fraction-of-second numeral to milliseconds using its first
/// three significant digits: `.5` is 500ms, `.0005` is 0ms.
fn read_milliseconds(value: u32, digits: usize) -> u32 {
    match digits {
        1 => value * 100,
        2 => value * 10,
        3 => value,
        _ => {
            let mut value = value;
            let mut digits = digits.min(MAX_SIGNIFICANT_DIGITS);
            while digits > 3 {
                value /= 10;
                digits -= 1;
            }
            value
        }
    }
}
