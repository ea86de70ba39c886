//! Static keyword table mapping month names, timezone names, the time
//! separator and AM/PM markers to (category, value) pairs.

/// Number of lowercase characters a word is matched by.
pub(crate) const PREFIX_LENGTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeywordCategory {
    /// Value is a 0-based month (0 = January).
    MonthName,
    /// Value is an offset east of UTC in minutes.
    TimeZoneName,
    /// The `T` separating date and time fields.
    TimeSeparator,
    /// Value is the hour offset the marker adds (AM 0, PM 12).
    AmPm,
}

pub(crate) struct KeywordEntry {
    pub prefix: [char; PREFIX_LENGTH],
    pub category: KeywordCategory,
    pub value: i32,
}

const fn entry(prefix: [char; PREFIX_LENGTH], category: KeywordCategory, value: i32) -> KeywordEntry {
    KeywordEntry {
        prefix,
        category,
        value,
    }
}

use KeywordCategory::{AmPm, MonthName, TimeSeparator, TimeZoneName};

static KEYWORDS: &[KeywordEntry] = &[
    entry(['j', 'a', 'n'], MonthName, 0),
    entry(['f', 'e', 'b'], MonthName, 1),
    entry(['m', 'a', 'r'], MonthName, 2),
    entry(['a', 'p', 'r'], MonthName, 3),
    entry(['m', 'a', 'y'], MonthName, 4),
    entry(['j', 'u', 'n'], MonthName, 5),
    entry(['j', 'u', 'l'], MonthName, 6),
    entry(['a', 'u', 'g'], MonthName, 7),
    entry(['s', 'e', 'p'], MonthName, 8),
    entry(['o', 'c', 't'], MonthName, 9),
    entry(['n', 'o', 'v'], MonthName, 10),
    entry(['d', 'e', 'c'], MonthName, 11),
    entry(['a', 'm', '\0'], AmPm, 0),
    entry(['p', 'm', '\0'], AmPm, 12),
    entry(['u', 't', '\0'], TimeZoneName, 0),
    entry(['u', 't', 'c'], TimeZoneName, 0),
    entry(['z', '\0', '\0'], TimeZoneName, 0),
    entry(['g', 'm', 't'], TimeZoneName, 0),
    entry(['c', 'd', 't'], TimeZoneName, -5 * 60),
    entry(['c', 's', 't'], TimeZoneName, -6 * 60),
    entry(['e', 'd', 't'], TimeZoneName, -4 * 60),
    entry(['e', 's', 't'], TimeZoneName, -5 * 60),
    entry(['m', 'd', 't'], TimeZoneName, -6 * 60),
    entry(['m', 's', 't'], TimeZoneName, -7 * 60),
    entry(['p', 'd', 't'], TimeZoneName, -7 * 60),
    entry(['p', 's', 't'], TimeZoneName, -8 * 60),
    entry(['t', '\0', '\0'], TimeSeparator, 0),
];

/// Look up a scanned word by its lowercase prefix and true length.
///
/// A word longer than its keyword is accepted only for month names, so
/// "January" matches while "utcetera" does not.
pub(crate) fn lookup(prefix: &[char; PREFIX_LENGTH], length: usize) -> Option<&'static KeywordEntry> {
    KEYWORDS.iter().find(|entry| {
        entry.prefix == *prefix
            && (length <= PREFIX_LENGTH || entry.category == KeywordCategory::MonthName)
    })
}
