//! Bucket key formatting.
//!
//! A [`KeyFormat`] renders a parsed instant into the label used as the
//! histogram key. Patterns use chrono's strftime vocabulary; a handful of
//! named presets cover the common granularities.

use std::fmt::{self, Write};
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};

use crate::error::{Result, TimebucketError};
use crate::parse::Instant;

/// Named key-format presets and the patterns they expand to.
pub const KEY_PRESETS: &[(&str, &str)] = &[
    ("year", "%Y"),
    ("month", "%Y-%m"),
    ("day", "%Y-%m-%d"),
    ("hour", "%Y-%m-%dT%H"),
    ("minute", "%Y-%m-%dT%H:%M"),
    ("second", "%Y-%m-%dT%H:%M:%S"),
];

/// A validated key-format pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFormat {
    pattern: String,
}

impl KeyFormat {
    /// Build a key format from a preset name or a strftime pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use timebucket_core::key::KeyFormat;
    ///
    /// assert_eq!(KeyFormat::new("day").unwrap().pattern(), "%Y-%m-%d");
    /// assert_eq!(KeyFormat::new("%H:%M").unwrap().pattern(), "%H:%M");
    /// assert!(KeyFormat::new("%Y-%Q").is_err());
    /// ```
    pub fn new(spec: &str) -> Result<Self> {
        if spec.is_empty() {
            return Err(TimebucketError::InvalidKeyFormat(
                "key format is missing".to_string(),
            ));
        }

        let pattern = KEY_PRESETS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(spec))
            .map(|(_, pattern)| (*pattern).to_string())
            .unwrap_or_else(|| spec.to_string());

        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(TimebucketError::InvalidKeyFormat(format!(
                "'{}' contains an unsupported specifier",
                spec
            )));
        }

        Ok(KeyFormat { pattern })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Render the bucket key for `instant` in the instant's own offset.
    pub fn format(&self, instant: &Instant) -> Result<String> {
        let mut key = String::new();
        write!(key, "{}", instant.format(&self.pattern))
            .map_err(|_| TimebucketError::Format(self.pattern.clone()))?;
        Ok(key)
    }
}

impl fmt::Display for KeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

impl FromStr for KeyFormat {
    type Err = TimebucketError;

    fn from_str(s: &str) -> Result<Self> {
        KeyFormat::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_with_layout;

    fn instant(value: &str) -> Instant {
        parse_with_layout(value, "%+").unwrap()
    }

    #[test]
    fn day_pattern() {
        let key = KeyFormat::new("%Y-%m-%d").unwrap();
        assert_eq!(key.format(&instant("2020-01-01T12:00:00Z")).unwrap(), "2020-01-01");
    }

    #[test]
    fn presets_expand() {
        let ts = instant("2020-03-04T05:06:07Z");
        let cases = [
            ("year", "2020"),
            ("month", "2020-03"),
            ("day", "2020-03-04"),
            ("hour", "2020-03-04T05"),
            ("minute", "2020-03-04T05:06"),
            ("second", "2020-03-04T05:06:07"),
        ];
        for (preset, expected) in cases {
            let key = KeyFormat::new(preset).unwrap();
            assert_eq!(key.format(&ts).unwrap(), expected, "preset {preset}");
        }
    }

    #[test]
    fn preset_names_are_case_insensitive() {
        assert_eq!(KeyFormat::new("DAY").unwrap().pattern(), "%Y-%m-%d");
    }

    #[test]
    fn time_of_day_pattern() {
        let key = KeyFormat::new("%H:%M").unwrap();
        assert_eq!(key.format(&instant("2020-01-01T23:59:30Z")).unwrap(), "23:59");
    }

    #[test]
    fn renders_in_source_offset() {
        // 23:30 at -05:00 is already the next day in UTC; the key stays local.
        let key = KeyFormat::new("day").unwrap();
        assert_eq!(
            key.format(&instant("2020-01-01T23:30:00-05:00")).unwrap(),
            "2020-01-01"
        );
    }

    #[test]
    fn literal_text_is_kept() {
        let key = KeyFormat::new("week %W of %Y").unwrap();
        assert_eq!(
            key.format(&instant("2020-01-08T00:00:00Z")).unwrap(),
            "week 01 of 2020"
        );
    }

    #[test]
    fn formatting_is_repeatable() {
        let key = KeyFormat::new("hour").unwrap();
        let ts = instant("2021-06-30T18:45:00+02:00");
        assert_eq!(key.format(&ts).unwrap(), key.format(&ts).unwrap());
    }

    #[test]
    fn empty_key_format_is_rejected() {
        assert!(matches!(
            KeyFormat::new(""),
            Err(TimebucketError::InvalidKeyFormat(_))
        ));
    }

    #[test]
    fn unsupported_specifier_is_rejected() {
        assert!(matches!(
            "%Y-%Q".parse::<KeyFormat>(),
            Err(TimebucketError::InvalidKeyFormat(_))
        ));
    }
}
