//! Publish-date parsing.
//!
//! Review providers emit ISO-8601 timestamps in a few slightly different
//! shapes. The accepted formats are tried in a fixed order and the first
//! successful parse wins. Anything else is treated as "no usable date" rather
//! than an error.

use chrono::NaiveDateTime;

const SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const FRACTIONAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const MAX_FRACTION_DIGITS: usize = 6;

/// Timestamp shapes accepted for a review's publish date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishDateFormat {
    /// `YYYY-MM-DDTHH:MM:SS.ffffffZ`
    FractionalUtc,
    /// `YYYY-MM-DDTHH:MM:SS.ffffff`
    Fractional,
    /// `YYYY-MM-DDTHH:MM:SS`
    Seconds,
}

impl PublishDateFormat {
    /// Formats in the order they are attempted.
    pub const ORDERED: [Self; 3] = [Self::FractionalUtc, Self::Fractional, Self::Seconds];

    /// Parse `raw` strictly in this format.
    ///
    /// Fractional formats require between one and six fraction digits.
    #[must_use]
    pub fn parse(self, raw: &str) -> Option<NaiveDateTime> {
        match self {
            Self::FractionalUtc => raw.strip_suffix('Z').and_then(parse_fractional),
            Self::Fractional => parse_fractional(raw),
            Self::Seconds => NaiveDateTime::parse_from_str(raw, SECONDS_FORMAT).ok(),
        }
    }
}

fn parse_fractional(raw: &str) -> Option<NaiveDateTime> {
    let (_, fraction) = raw.rsplit_once('.')?;
    let digits_ok = (1..=MAX_FRACTION_DIGITS).contains(&fraction.len())
        && fraction.bytes().all(|byte| byte.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    NaiveDateTime::parse_from_str(raw, FRACTIONAL_FORMAT).ok()
}

/// Parse a publish date using the first matching [`PublishDateFormat`].
///
/// Returns `None` for empty or unrecognised input.
///
/// # Examples
///
/// ```
/// use review_scorer::parse_publish_date;
///
/// assert!(parse_publish_date("2024-01-01T12:00:00.123Z").is_some());
/// assert!(parse_publish_date("2024-01-01T12:00:00").is_some());
/// assert!(parse_publish_date("last week").is_none());
/// ```
#[must_use]
pub fn parse_publish_date(raw: &str) -> Option<NaiveDateTime> {
    PublishDateFormat::ORDERED
        .into_iter()
        .find_map(|format| format.parse(raw))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use rstest::rstest;

    use super::*;

    fn at(h: u32, m: u32, s: u32, micro: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|date| date.and_hms_micro_opt(h, m, s, micro))
            .expect("valid timestamp")
    }

    #[rstest]
    #[case("2024-03-05T10:20:30.123456Z", Some(at(10, 20, 30, 123_456)))]
    #[case("2024-03-05T10:20:30.5Z", Some(at(10, 20, 30, 500_000)))]
    #[case("2024-03-05T10:20:30.250", Some(at(10, 20, 30, 250_000)))]
    #[case("2024-03-05T10:20:30", Some(at(10, 20, 30, 0)))]
    #[case("2024-03-05T10:20:30Z", None)]
    #[case("2024-03-05T10:20:30.1234567Z", None)]
    #[case("2024-03-05T10:20:30.Z", None)]
    #[case("2024-03-05", None)]
    #[case("", None)]
    #[case("yesterday", None)]
    fn parses_supported_shapes(#[case] raw: &str, #[case] expected: Option<NaiveDateTime>) {
        assert_eq!(parse_publish_date(raw), expected);
    }

    #[rstest]
    fn formats_are_tried_in_declared_order() {
        assert_eq!(
            PublishDateFormat::ORDERED,
            [
                PublishDateFormat::FractionalUtc,
                PublishDateFormat::Fractional,
                PublishDateFormat::Seconds,
            ]
        );
    }

    #[rstest]
    fn utc_format_requires_suffix() {
        assert!(
            PublishDateFormat::FractionalUtc
                .parse("2024-03-05T10:20:30.1")
                .is_none()
        );
        assert!(
            PublishDateFormat::Fractional
                .parse("2024-03-05T10:20:30.1Z")
                .is_none()
        );
    }
}
