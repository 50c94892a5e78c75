use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Characters accepted between a leading timestamp and the rest of the name.
pub const TIMESTAMP_SEPARATORS: &[char] = &[' ', '_', '-', '.', ':', 'T'];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimestampShape {
    /// `YYYY-MM-DD` followed by `HH.MM` and optionally `.SS`
    DateTime,
    /// `YYYY-MM-DD`
    Date,
    /// `YYYYMMDD`
    CompactDate,
    /// `YYYY-MM`
    YearMonth,
    /// `YYMMDD`
    ShortDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampMatch {
    pub shape: TimestampShape,
    pub timestamp: String,
    pub separator: char,
    pub rest: String,
}

struct Matcher {
    shape: TimestampShape,
    pattern: Regex,
}

impl Matcher {
    fn new(shape: TimestampShape, pattern: &str) -> Self {
        Self {
            shape,
            pattern: Regex::new(pattern).expect("Failed to create regex pattern for timestamp"),
        }
    }

    fn find<'a>(&self, name: &'a str) -> Option<&'a str> {
        self.pattern.find(name).map(|m| m.as_str())
    }
}

// Tried in order, most specific first. A longer shape must come before every
// shape that matches one of its prefixes.
static MATCHERS: LazyLock<Vec<Matcher>> = LazyLock::new(|| {
    vec![
        Matcher::new(
            TimestampShape::DateTime,
            r"^[12]\d{3}-[01]\d-[0123]\d[T:_-][012]\d[:.-][0-5]\d[:.-][0-5]\d",
        ),
        Matcher::new(
            TimestampShape::DateTime,
            r"^[12]\d{3}-[01]\d-[0123]\d[T:_-][012]\d[:.-][0-5]\d",
        ),
        Matcher::new(TimestampShape::Date, r"^[12]\d{3}-[01]\d-[0123]\d"),
        Matcher::new(TimestampShape::CompactDate, r"^[12]\d{7}"),
        Matcher::new(TimestampShape::YearMonth, r"^[12]\d{3}-[01]\d"),
        Matcher::new(TimestampShape::ShortDate, r"^\d{6}"),
    ]
});

/// Detect a leading date/time-stamp followed by a separator and a non-empty rest.
///
/// Returns `None` when no shape matches, in which case smart-prepend falls
/// back to a plain prepend.
pub fn detect_timestamp(name: &str) -> Option<TimestampMatch> {
    MATCHERS.iter().find_map(|matcher| {
        let timestamp = matcher.find(name)?;
        let after = &name[timestamp.len()..];
        let mut chars = after.chars();
        let separator = chars.next().filter(|ch| TIMESTAMP_SEPARATORS.contains(ch))?;
        let rest = chars.as_str();
        if rest.is_empty() {
            return None;
        }

        log::debug!(
            "found {:?} timestamp '{timestamp}' with separator '{separator}' in '{name}'",
            matcher.shape
        );
        Some(TimestampMatch {
            shape: matcher.shape,
            timestamp: timestamp.to_string(),
            separator,
            rest: rest.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(name: &str) -> TimestampMatch {
        detect_timestamp(name).expect("timestamp must be detected")
    }

    #[test]
    fn date_with_time_and_seconds() {
        let found = detect("2021-12-31T18.48.22 test.txt");
        assert_eq!(found.shape, TimestampShape::DateTime);
        assert_eq!(found.timestamp, "2021-12-31T18.48.22");
        assert_eq!(found.separator, ' ');
        assert_eq!(found.rest, "test.txt");
    }

    #[test]
    fn date_with_time_without_seconds() {
        let found = detect("2013-05-09T16.17_img_00042 -- fun.jpeg");
        assert_eq!(found.timestamp, "2013-05-09T16.17");
        assert_eq!(found.separator, '_');
        assert_eq!(found.rest, "img_00042 -- fun.jpeg");
    }

    #[test]
    fn space_before_the_time_ends_the_timestamp_at_the_date() {
        let found = detect("2021-12-31 18.48 x.txt");
        assert_eq!(found.shape, TimestampShape::Date);
        assert_eq!(found.timestamp, "2021-12-31");
        assert_eq!(found.separator, ' ');
        assert_eq!(found.rest, "18.48 x.txt");
    }

    #[test]
    fn seconds_are_dropped_when_no_separator_follows_them() {
        let found = detect("2021-12-31T18.48.22x.txt");
        assert_eq!(found.shape, TimestampShape::DateTime);
        assert_eq!(found.timestamp, "2021-12-31T18.48");
        assert_eq!(found.separator, '.');
        assert_eq!(found.rest, "22x.txt");
    }

    #[test]
    fn plain_date() {
        let found = detect("2021-12-31 test.txt");
        assert_eq!(found.shape, TimestampShape::Date);
        assert_eq!(found.timestamp, "2021-12-31");
        assert_eq!(found.rest, "test.txt");
    }

    #[test]
    fn compact_date() {
        let found = detect("20211231_test.txt");
        assert_eq!(found.shape, TimestampShape::CompactDate);
        assert_eq!(found.timestamp, "20211231");
        assert_eq!(found.separator, '_');
    }

    #[test]
    fn year_month() {
        let found = detect("2021-12_test.txt");
        assert_eq!(found.shape, TimestampShape::YearMonth);
        assert_eq!(found.timestamp, "2021-12");
    }

    #[test]
    fn short_date() {
        let found = detect("211231_test.txt");
        assert_eq!(found.shape, TimestampShape::ShortDate);
        assert_eq!(found.timestamp, "211231");
    }

    #[test]
    fn colon_and_t_are_accepted_as_separators() {
        assert_eq!(detect("2021-12-31:notes").separator, ':');
        let found = detect("2021-12-31Tnotes");
        assert_eq!(found.timestamp, "2021-12-31");
        assert_eq!(found.separator, 'T');
        assert_eq!(found.rest, "notes");
    }

    #[test]
    fn no_timestamp_is_none() {
        assert!(detect_timestamp("test.txt").is_none());
        assert!(detect_timestamp("12345_short.txt").is_none());
        assert!(detect_timestamp("").is_none());
    }

    #[test]
    fn rest_must_not_be_empty() {
        assert!(detect_timestamp("211231_").is_none());
        assert!(detect_timestamp("20211231").is_none());
    }

    #[test]
    fn parts_rebuild_the_name() {
        for name in [
            "2021-12-31T18.48.22 test.txt",
            "2021-12-31_18-48 x",
            "20211231 test.txt",
            "2012-12_test.txt",
            "211231_test.txt",
        ] {
            let found = detect(name);
            assert_eq!(
                format!("{}{}{}", found.timestamp, found.separator, found.rest),
                name
            );
        }
    }

    #[test]
    fn rest_does_not_start_with_another_timestamp() {
        for name in [
            "2021-12-31T18.48.22 test.txt",
            "2021-12-31 test.txt",
            "20211231_test.txt",
            "2021-12_test.txt",
            "211231_test.txt",
        ] {
            let found = detect(name);
            assert!(detect_timestamp(&found.rest).is_none(), "{name}");
        }
    }
}
