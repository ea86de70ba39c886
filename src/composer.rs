//! Field composers: accumulators for the day, time-of-day and timezone
//! components of a date string. Each collects partial values during the
//! parse and validates them in an explicit finalize step.

use crate::consts::{
    CURRENT_CENTURY, HOURS_PER_MERIDIEM, MAX_DAY, MAX_HOUR, MAX_MILLISECOND, MAX_MINUTE, MAX_MONTH,
    MAX_SECOND, MAX_TWO_DIGIT_YEAR, MIN_DAY, MIN_MONTH, MINUTES_PER_HOUR, PREVIOUS_CENTURY,
    SECONDS_PER_HOUR, SECONDS_PER_MINUTE, TWO_DIGIT_YEAR_PIVOT,
};
use crate::{DateField, ParseError};

const TIME_SLOTS: usize = 4;
const DAY_SLOTS: usize = 3;

/// Accumulates hour, minute, second and millisecond slots, in that order.
#[derive(Debug, Default)]
pub(crate) struct TimeComposer {
    slots: [u32; TIME_SLOTS],
    filled: usize,
    hour_offset: Option<u32>,
}

impl TimeComposer {
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Whether `n` is in range for the next unfilled slot. The hour slot is
    /// never "expected": a time run only starts at an explicit separator.
    pub fn is_expecting(&self, n: u32) -> bool {
        match self.filled {
            1 => Self::is_minute(n),
            2 => Self::is_second(n),
            3 => Self::is_millisecond(n),
            _ => false,
        }
    }

    pub fn add(&mut self, n: u32) -> bool {
        if self.filled < TIME_SLOTS {
            self.slots[self.filled] = n;
            self.filled += 1;
            true
        } else {
            false
        }
    }

    /// Append `n` and zero-fill the remaining slots, ending the time run.
    pub fn add_final(&mut self, n: u32) -> bool {
        if !self.add(n) {
            return false;
        }
        while self.filled < TIME_SLOTS {
            self.slots[self.filled] = 0;
            self.filled += 1;
        }
        true
    }

    /// Record the hour adjustment of an AM/PM marker (AM 0, PM 12).
    pub fn set_hour_offset(&mut self, n: u32) {
        self.hour_offset = Some(n);
    }

    pub fn is_hour(n: u32) -> bool {
        n <= MAX_HOUR
    }

    pub fn is_minute(n: u32) -> bool {
        n <= MAX_MINUTE
    }

    pub fn is_second(n: u32) -> bool {
        n <= MAX_SECOND
    }

    fn is_millisecond(n: u32) -> bool {
        n <= MAX_MILLISECOND
    }

    fn is_meridiem_hour(n: u32) -> bool {
        n <= HOURS_PER_MERIDIEM
    }

    /// Validate and return (hour, minute, second, millisecond). Unfilled
    /// slots are zero; an AM/PM marker requires a 0-12 hour, which is then
    /// folded into the 24-hour clock.
    pub fn finalize(&self) -> Result<(u32, u32, u32, u32), ParseError> {
        let [mut hour, minute, second, millisecond] = self.slots;
        if let Some(offset) = self.hour_offset {
            if !Self::is_meridiem_hour(hour) {
                return Err(out_of_range(DateField::Hour, hour));
            }
            hour = hour % HOURS_PER_MERIDIEM + offset;
        }
        if !Self::is_hour(hour) {
            return Err(out_of_range(DateField::Hour, hour));
        }
        if !Self::is_minute(minute) {
            return Err(out_of_range(DateField::Minute, minute));
        }
        if !Self::is_second(second) {
            return Err(out_of_range(DateField::Second, second));
        }
        if !Self::is_millisecond(millisecond) {
            return Err(out_of_range(DateField::Millisecond, millisecond));
        }
        Ok((hour, minute, second, millisecond))
    }
}

fn out_of_range(field: DateField, value: u32) -> ParseError {
    ParseError::OutOfRange {
        field,
        value: value as i32,
    }
}

/// One numeric date field: its value and the digit count it was written
/// with, which the disambiguation heuristics consult.
type DaySlot = (i32, usize);

/// Accumulates the numeric date fields plus an optional named month.
#[derive(Debug, Default)]
pub(crate) struct DayComposer {
    slots: [DaySlot; DAY_SLOTS],
    filled: usize,
    named_month: Option<u32>,
    is_iso_date: bool,
}

impl DayComposer {
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Append a numeric date field. A leading field of four or more digits
    /// is an unambiguous year and fixes year-month-day ordering.
    pub fn add(&mut self, value: i32, digits: usize) -> bool {
        if self.filled == DAY_SLOTS {
            return false;
        }
        if self.filled == 0 && digits >= 4 {
            self.is_iso_date = true;
        }
        self.slots[self.filled] = (value, digits);
        self.filled += 1;
        true
    }

    /// Record a month taken from a keyword, 0-based.
    pub fn set_named_month(&mut self, month: u32) {
        self.named_month = Some(month);
    }

    /// Force strictly positional year-month-day interpretation, with no
    /// two-digit-year expansion.
    pub fn set_iso_date(&mut self) {
        self.is_iso_date = true;
    }

    pub fn is_month(x: i32) -> bool {
        (MIN_MONTH..=MAX_MONTH).contains(&x)
    }

    pub fn is_day(x: i32) -> bool {
        (MIN_DAY..=MAX_DAY).contains(&x)
    }

    /// A slot that could plausibly hold a day of the month. Anything else
    /// must be a year.
    fn can_be_day(slot: DaySlot) -> bool {
        let (value, digits) = slot;
        digits < 4 && Self::is_day(value)
    }

    fn expand_two_digit_year(slot: DaySlot) -> i32 {
        let (value, digits) = slot;
        if digits > 2 {
            return value;
        }
        if (0..TWO_DIGIT_YEAR_PIVOT).contains(&value) {
            value + CURRENT_CENTURY
        } else if (TWO_DIGIT_YEAR_PIVOT..=MAX_TWO_DIGIT_YEAR).contains(&value) {
            value + PREVIOUS_CENTURY
        } else {
            value
        }
    }

    /// Validate and return (year, 0-based month, day).
    ///
    /// Requires exactly two numeric slots alongside a named month, or
    /// exactly three without one. Without the ISO flag the year is the
    /// first slot that cannot hold a day (falling back to the last slot),
    /// and the remaining pair is assigned by range-plausibility with
    /// month-then-day preferred when both orders fit.
    pub fn finalize(&self) -> Result<(i32, u32, u32), ParseError> {
        let (year_slot, month, day) = if let Some(named) = self.named_month {
            if self.filled < 2 {
                return Err(ParseError::MissingDate);
            }
            if self.filled > 2 {
                return Err(ParseError::TooManyFields);
            }
            let (year_slot, day_slot) = if self.is_iso_date || !Self::can_be_day(self.slots[0]) {
                (self.slots[0], self.slots[1])
            } else {
                (self.slots[1], self.slots[0])
            };
            (year_slot, named as i32 + 1, day_slot.0)
        } else {
            if self.filled < 3 {
                return Err(ParseError::MissingDate);
            }
            let [first, second, third] = self.slots;
            if self.is_iso_date {
                (first, second.0, third.0)
            } else {
                let year_index = (0..DAY_SLOTS)
                    .find(|&i| !Self::can_be_day(self.slots[i]))
                    .unwrap_or(DAY_SLOTS - 1);
                let (x, y) = match year_index {
                    0 => (second.0, third.0),
                    1 => (first.0, third.0),
                    _ => (first.0, second.0),
                };
                // Prefer month-then-day when both orders are range-valid.
                let (month, day) = if Self::is_month(x) && Self::is_day(y) {
                    (x, y)
                } else {
                    (y, x)
                };
                (self.slots[year_index], month, day)
            }
        };
        if !Self::is_month(month) {
            return Err(ParseError::OutOfRange {
                field: DateField::Month,
                value: month,
            });
        }
        if !Self::is_day(day) {
            return Err(ParseError::OutOfRange {
                field: DateField::Day,
                value: day,
            });
        }
        let year = if self.is_iso_date {
            year_slot.0
        } else {
            Self::expand_two_digit_year(year_slot)
        };
        Ok((year, (month - 1) as u32, day as u32))
    }
}

/// Accumulates a timezone offset from a sign and hour/minute fields, or
/// directly from a recognized timezone name.
#[derive(Debug, Default)]
pub(crate) struct TimeZoneComposer {
    sign: Option<i32>,
    hour: Option<u32>,
    minute: Option<u32>,
}

impl TimeZoneComposer {
    /// Direct offset from a timezone keyword, in minutes east of UTC.
    pub fn set(&mut self, offset_in_minutes: i32) {
        self.sign = Some(if offset_in_minutes < 0 { -1 } else { 1 });
        let magnitude = offset_in_minutes.unsigned_abs();
        self.hour = Some(magnitude / MINUTES_PER_HOUR);
        self.minute = Some(magnitude % MINUTES_PER_HOUR);
    }

    pub fn set_sign(&mut self, sign: i32) {
        self.sign = Some(if sign < 0 { -1 } else { 1 });
    }

    pub fn set_hour(&mut self, hour: u32) {
        self.hour = Some(hour);
    }

    pub fn set_minute(&mut self, minute: u32) {
        self.minute = Some(minute);
    }

    /// Mark the minute as still expected, as after an `hh:` form.
    pub fn expect_minute(&mut self) {
        self.minute = None;
    }

    /// True only between an hour and its pending minute.
    pub fn is_expecting(&self, n: u32) -> bool {
        self.hour.is_some() && self.minute.is_none() && TimeComposer::is_minute(n)
    }

    pub fn is_utc(&self) -> bool {
        self.hour == Some(0) && self.minute == Some(0)
    }

    pub fn is_empty(&self) -> bool {
        self.hour.is_none()
    }

    /// Offset east of UTC in seconds, or `None` when no timezone was given.
    pub fn finalize(&self) -> Result<Option<i32>, ParseError> {
        let Some(hour) = self.hour else {
            return Ok(None);
        };
        let minute = self.minute.unwrap_or(0);
        if !TimeComposer::is_hour(hour) {
            return Err(out_of_range(DateField::ZoneHour, hour));
        }
        if !TimeComposer::is_minute(minute) {
            return Err(out_of_range(DateField::ZoneMinute, minute));
        }
        let seconds = (hour * SECONDS_PER_HOUR + minute * SECONDS_PER_MINUTE) as i32;
        Ok(Some(self.sign.unwrap_or(1) * seconds))
    }
}
