//! Ordered layout sets.
//!
//! A [`LayoutSet`] is tried front to back; the first layout that parses a
//! value wins. The built-in ordering is part of the tool's observable
//! behavior, so ambiguous inputs always resolve the same way.

use std::fmt;
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};

use crate::error::{Result, TimebucketError};
use crate::parse::{Instant, parse_with_layout};

/// Built-in layouts, in match order.
///
/// Zone abbreviations (`%Z`) are accepted and ignored; such values resolve as UTC.
pub const DEFAULT_LAYOUTS: &[&str] = &[
    // timestamps
    "%-m/%-d/%y %H:%M:%S %p",
    "%-m/%-d/%y %H:%M:%S %p %Z",
    "%+",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d %b %YT%H:%M:%S%.f",
    // date only
    "%Y",
    "%Y-%m-%d",
    // time only
    "%H:%M:%S%.f",
];

/// A single date/time layout in chrono strftime syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout(String);

impl Layout {
    /// Validate a layout pattern.
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(TimebucketError::InvalidLayout(
                "layout must not be empty".to_string(),
            ));
        }
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(TimebucketError::InvalidLayout(format!(
                "'{}' contains an unsupported specifier",
                pattern
            )));
        }
        Ok(Layout(pattern))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Strictly parse `value` with this layout.
    pub fn parse(&self, value: &str) -> Option<Instant> {
        parse_with_layout(value, &self.0)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A non-empty, ordered, immutable list of layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSet {
    layouts: Vec<Layout>,
}

impl LayoutSet {
    /// Build a layout set, validating every layout.
    pub fn new<I, S>(layouts: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let layouts = layouts
            .into_iter()
            .map(Layout::new)
            .collect::<Result<Vec<_>>>()?;
        if layouts.is_empty() {
            return Err(TimebucketError::InvalidLayout(
                "layout set must contain at least one layout".to_string(),
            ));
        }
        Ok(LayoutSet { layouts })
    }

    /// Build a layout set from a comma-separated list, replacing the defaults.
    pub fn from_list(list: &str) -> Result<Self> {
        Self::new(list.split(','))
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Always false; a layout set cannot be built empty.
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layout> {
        self.layouts.iter()
    }

    /// The layout patterns, in order.
    pub fn names(&self) -> Vec<String> {
        self.layouts.iter().map(|l| l.0.clone()).collect()
    }

    /// Find the first layout that parses `value`, returning its position.
    pub fn matching(&self, value: &str) -> Option<(usize, Instant)> {
        self.layouts
            .iter()
            .enumerate()
            .find_map(|(i, layout)| layout.parse(value).map(|instant| (i, instant)))
    }
}

impl Default for LayoutSet {
    fn default() -> Self {
        LayoutSet {
            layouts: DEFAULT_LAYOUTS
                .iter()
                .map(|l| Layout((*l).to_string()))
                .collect(),
        }
    }
}

impl FromStr for LayoutSet {
    type Err = TimebucketError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_list(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn default_layouts_are_valid() {
        let validated = LayoutSet::new(DEFAULT_LAYOUTS.iter().copied()).unwrap();
        assert_eq!(validated, LayoutSet::default());
        assert_eq!(validated.len(), DEFAULT_LAYOUTS.len());
    }

    #[test]
    fn empty_set_is_rejected() {
        let result = LayoutSet::new(Vec::<String>::new());
        assert!(matches!(result, Err(TimebucketError::InvalidLayout(_))));
    }

    #[test]
    fn empty_layout_is_rejected() {
        assert!(LayoutSet::from_list("%Y,,%Y-%m-%d").is_err());
        assert!(LayoutSet::from_list("").is_err());
    }

    #[test]
    fn unsupported_specifier_is_rejected() {
        assert!(matches!(
            Layout::new("%Y-%Q"),
            Err(TimebucketError::InvalidLayout(_))
        ));
    }

    #[test]
    fn from_list_preserves_order() {
        let set: LayoutSet = "%Y-%m-%d,%Y,%H:%M".parse().unwrap();
        assert_eq!(set.names(), vec!["%Y-%m-%d", "%Y", "%H:%M"]);
    }

    #[test]
    fn first_matching_layout_wins() {
        let month_first = LayoutSet::new(["%m/%d/%Y", "%d/%m/%Y"]).unwrap();
        let (index, instant) = month_first.matching("01/02/2020").unwrap();
        assert_eq!(index, 0);
        assert_eq!((instant.month(), instant.day()), (1, 2));

        let day_first = LayoutSet::new(["%d/%m/%Y", "%m/%d/%Y"]).unwrap();
        let (index, instant) = day_first.matching("01/02/2020").unwrap();
        assert_eq!(index, 0);
        assert_eq!((instant.month(), instant.day()), (2, 1));
    }

    #[test]
    fn falls_through_to_later_layout() {
        let set = LayoutSet::new(["%d/%m/%Y", "%m/%d/%Y"]).unwrap();
        // 13 is not a valid month, so only the second layout fits.
        let (index, instant) = set.matching("12/13/2020").unwrap();
        assert_eq!(index, 1);
        assert_eq!((instant.month(), instant.day()), (12, 13));
    }

    #[test]
    fn default_order_resolves_common_shapes() {
        let set = LayoutSet::default();
        let cases = [
            ("1/2/06 15:04:05 PM", 0),
            ("1/2/06 15:04:05 PM MST", 1),
            ("2020-01-01T00:00:00Z", 2),
            ("2020-01-01T00:00:00.123456789+02:00", 2),
            ("2020-01-01T00:00:00", 3),
            ("2020-01-01T00:00:00.5", 3),
            ("01 Jan 2020T00:00:00.001", 4),
            ("2020", 5),
            ("2020-01-01", 6),
            ("15:04:05", 7),
            ("15:04:05.25", 7),
        ];
        for (value, expected) in cases {
            let (index, _) = set
                .matching(value)
                .unwrap_or_else(|| panic!("no layout matched {value:?}"));
            assert_eq!(index, expected, "wrong layout for {value:?}");
        }
    }

    #[test]
    fn no_match_returns_none() {
        let set = LayoutSet::default();
        assert!(set.matching("").is_none());
        assert!(set.matching("not a date").is_none());
        assert!(set.matching("2020-01-01T").is_none());
    }

    #[test]
    fn default_set_rejects_loose_values() {
        let set = LayoutSet::default();
        for value in ["7", "20", " 2020", "+2020", "2020-1-1", "2020-01-01T1:2:3", "1/2/0615:04:05PM"] {
            assert_eq!(set.matching(value), None, "{value:?} should not match");
        }
    }

    #[test]
    fn matched_instant_has_expected_fields() {
        let set = LayoutSet::default();
        let (_, instant) = set.matching("1/2/06 15:04:05 PM").unwrap();
        assert_eq!(instant.year(), 2006);
        assert_eq!(instant.hour(), 15);
    }
}
