//! Lenient conversion of decoded text values to typed values.
//!
//! These converters back the document tree's typed accessors. They are
//! deliberately forgiving: a value that does not parse yields the type's
//! zero/default rather than an error, which is the behavior wanted when
//! reading tolerant configuration data. Non-empty values that fail to
//! parse are reported through the warning system so silent fallbacks
//! still leave a trace.

use core::fmt;

use quokka_common::warning::warn_once;

/// A calendar date-time as read from an ISO-8601 value.
///
/// No time zone is carried; a trailing `Z` or numeric offset in the
/// source text is accepted and discarded. The all-zero value doubles as
/// the lenient fallback.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DateTime {
    /// Calendar year.
    pub year: i32,
    /// Month, 1-12.
    pub month: u8,
    /// Day of month, 1-31.
    pub day: u8,
    /// Hour, 0-23.
    pub hour: u8,
    /// Minute, 0-59.
    pub minute: u8,
    /// Second, 0-59.
    pub second: u8,
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// A 128-bit globally unique identifier.
///
/// The default (nil, all zero bytes) doubles as the lenient fallback.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Guid(pub [u8; 16]);

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7], b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]
        )
    }
}

/// Text as an integer; `0` when it does not parse.
#[must_use]
pub fn to_int(text: &str) -> i64 {
    let trimmed = text.trim();
    match trimmed.parse::<i64>() {
        Ok(value) => value,
        Err(_) => {
            fallback("integer", trimmed);
            0
        }
    }
}

/// Text as a boolean; `false` when unrecognized.
///
/// Accepts `true`/`false`, `yes`/`no` and `1`/`0`, case-insensitively.
#[must_use]
pub fn to_bool(text: &str) -> bool {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => true,
        "false" | "no" | "0" | "" => false,
        other => {
            fallback("boolean", other);
            false
        }
    }
}

/// Text as a float; `0.0` when it does not parse.
#[must_use]
pub fn to_float(text: &str) -> f64 {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(value) => value,
        Err(_) => {
            fallback("float", trimmed);
            0.0
        }
    }
}

/// Text as an ISO-8601 date-time; the all-zero [`DateTime`] when it does
/// not parse.
///
/// Accepts `YYYY-MM-DD`, optionally followed by `T` or a space and
/// `HH:MM[:SS[.frac]]`, optionally followed by `Z` or a numeric offset
/// (the offset is discarded, not applied).
#[must_use]
pub fn to_datetime(text: &str) -> DateTime {
    match parse_datetime(text.trim()) {
        Some(value) => value,
        None => {
            fallback("date-time", text.trim());
            DateTime::default()
        }
    }
}

/// Text as a GUID; the nil [`Guid`] when it does not parse.
///
/// Accepts the hyphenated form, the bare 32-digit form, and either with
/// surrounding braces.
#[must_use]
pub fn to_guid(text: &str) -> Guid {
    match parse_guid(text.trim()) {
        Some(value) => value,
        None => {
            fallback("guid", text.trim());
            Guid::default()
        }
    }
}

/// Text as a currency amount; `0.0` when nothing numeric remains after
/// stripping symbols and digit grouping.
#[must_use]
pub fn to_currency(text: &str) -> f64 {
    match parse_currency(text.trim()) {
        Some(value) => value,
        None => {
            fallback("currency", text.trim());
            0.0
        }
    }
}

/// First character of the text; `'\0'` when empty.
#[must_use]
pub fn to_char(text: &str) -> char {
    text.chars().next().unwrap_or('\0')
}

/// Report a failed conversion once. Empty values fall back silently:
/// reading an absent setting is routine, not noteworthy.
fn fallback(kind: &str, text: &str) {
    if !text.is_empty() {
        warn_once("Tree", &format!("value `{text}` is not a {kind}, using the default"));
    }
}

fn parse_datetime(text: &str) -> Option<DateTime> {
    if text.is_empty() {
        return None;
    }
    let (date, time) = match text.split_once(['T', ' ']) {
        Some((date, time)) => (date, Some(time)),
        None => (text, None),
    };

    let mut date_parts = date.split('-');
    let year = date_parts.next()?.parse::<i32>().ok()?;
    let month = date_parts.next()?.parse::<u8>().ok()?;
    let day = date_parts.next()?.parse::<u8>().ok()?;
    if date_parts.next().is_some() || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    let (mut hour, mut minute, mut second) = (0, 0, 0);
    if let Some(time) = time {
        // Strip a trailing zone designator; the local fields are kept as
        // written.
        let time = time.trim_end_matches('Z');
        let time = time.split_once(['+', '-']).map_or(time, |(clock, _)| clock);
        let mut clock_parts = time.split(':');
        hour = clock_parts.next()?.parse::<u8>().ok()?;
        minute = clock_parts.next()?.parse::<u8>().ok()?;
        second = match clock_parts.next() {
            Some(seconds) => seconds.split('.').next()?.parse::<u8>().ok()?,
            None => 0,
        };
        if clock_parts.next().is_some() || hour > 23 || minute > 59 || second > 59 {
            return None;
        }
    }

    Some(DateTime {
        year,
        month,
        day,
        hour,
        minute,
        second,
    })
}

fn parse_guid(text: &str) -> Option<Guid> {
    let body = text
        .strip_prefix('{')
        .and_then(|inner| inner.strip_suffix('}'))
        .unwrap_or(text);
    let digits: String = body.chars().filter(|&ch| ch != '-').collect();
    if digits.len() != 32 || !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    let mut bytes = [0_u8; 16];
    for (index, byte) in bytes.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&digits[index * 2..index * 2 + 2], 16).ok()?;
    }
    Some(Guid(bytes))
}

fn parse_currency(text: &str) -> Option<f64> {
    // Keep sign, digits and the decimal point; currency symbols and digit
    // grouping go.
    let cleaned: String = text
        .chars()
        .filter(|&ch| ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetime_accepts_date_only() {
        assert_eq!(
            parse_datetime("2024-03-09"),
            Some(DateTime {
                year: 2024,
                month: 3,
                day: 9,
                ..DateTime::default()
            })
        );
    }

    #[test]
    fn datetime_discards_zone() {
        let expected = Some(DateTime {
            year: 2024,
            month: 3,
            day: 9,
            hour: 10,
            minute: 30,
            second: 5,
        });
        assert_eq!(parse_datetime("2024-03-09T10:30:05Z"), expected);
        assert_eq!(parse_datetime("2024-03-09 10:30:05+02:00"), expected);
        assert_eq!(parse_datetime("2024-03-09T10:30:05.250-05:00"), expected);
    }

    #[test]
    fn datetime_rejects_out_of_range_fields() {
        assert_eq!(parse_datetime("2024-13-01"), None);
        assert_eq!(parse_datetime("2024-01-32"), None);
        assert_eq!(parse_datetime("2024-01-01T25:00"), None);
    }

    #[test]
    fn guid_accepts_common_shapes() {
        let expected = "6f9619ff-8b86-d011-b42d-00c04fc964ff";
        assert_eq!(parse_guid(expected).map(|g| g.to_string()), Some(expected.to_string()));
        assert_eq!(
            parse_guid("{6F9619FF-8B86-D011-B42D-00C04FC964FF}").map(|g| g.to_string()),
            Some(expected.to_string())
        );
        assert_eq!(
            parse_guid("6f9619ff8b86d011b42d00c04fc964ff").map(|g| g.to_string()),
            Some(expected.to_string())
        );
    }

    #[test]
    fn currency_strips_symbols_and_grouping() {
        assert_eq!(parse_currency("$1,234.56"), Some(1234.56));
        assert_eq!(parse_currency("€ 42"), Some(42.0));
        assert_eq!(parse_currency("-3.99"), Some(-3.99));
        assert_eq!(parse_currency("free"), None);
    }
}
