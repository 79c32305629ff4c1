//! Strict date/time parsing against ordered layouts.
//!
//! A layout is a chrono strftime pattern (`%Y-%m-%d`, `%+`, `%H:%M:%S%.f`, ...).
//! A value matches a layout only if the whole string is consumed by the
//! layout's items, field by field:
//! - zero-padded numerics take exactly their width in ASCII digits (`%Y` four,
//!   `%m`/`%d`/`%H`/`%M`/`%S`/`%y` two), with no sign or leading whitespace
//! - unpadded numerics (`%-m`, `%-d`, ...) take one digit up to their width
//! - whitespace in the layout must appear verbatim in the value
//! - `%+` is read as `%Y-%m-%dT%H:%M:%S%.f` followed by `Z` or `+hh:mm`
//!
//! Fields the layout does not mention are filled with fixed defaults:
//! - date: year 0, January 1st
//! - time: 00:00:00.000000000
//! - offset: UTC
//!
//! Layouts carrying an epoch timestamp (`%s`) resolve from the timestamp alone.

use std::iter;

use chrono::format::{self, Fixed, Item, Numeric, Pad, ParseResult, Parsed, StrftimeItems};
use chrono::{DateTime, FixedOffset};

use crate::error::{Result, TimebucketError};
use crate::layout::LayoutSet;

/// A parsed point in time, keeping the offset found in the source string.
pub type Instant = DateTime<FixedOffset>;

/// `%+` spelled out with fixed-width fields.
const RFC3339_ITEMS: &[Item<'static>] = &[
    Item::Numeric(Numeric::Year, Pad::Zero),
    Item::Literal("-"),
    Item::Numeric(Numeric::Month, Pad::Zero),
    Item::Literal("-"),
    Item::Numeric(Numeric::Day, Pad::Zero),
    Item::Literal("T"),
    Item::Numeric(Numeric::Hour, Pad::Zero),
    Item::Literal(":"),
    Item::Numeric(Numeric::Minute, Pad::Zero),
    Item::Literal(":"),
    Item::Numeric(Numeric::Second, Pad::Zero),
    Item::Fixed(Fixed::Nanosecond),
    Item::Fixed(Fixed::TimezoneOffsetColonZ),
];

/// Parse a value using the first layout in `layouts` that matches it.
///
/// # Examples
///
/// ```
/// use timebucket_core::layout::LayoutSet;
/// use timebucket_core::parse::parse_instant;
///
/// let layouts = LayoutSet::default();
/// let instant = parse_instant("01 Jan 2020T00:00:00.001", &layouts).unwrap();
/// assert_eq!(instant.to_rfc3339(), "2020-01-01T00:00:00.001+00:00");
/// ```
pub fn parse_instant(value: &str, layouts: &LayoutSet) -> Result<Instant> {
    layouts
        .matching(value)
        .map(|(_, instant)| instant)
        .ok_or_else(|| TimebucketError::Parse {
            value: value.to_string(),
            layouts: layouts.names(),
        })
}

/// Parse a value against a single layout, or `None` if it does not fit.
///
/// The value is not trimmed; leftover input makes the parse fail.
pub fn parse_with_layout(value: &str, layout: &str) -> Option<Instant> {
    let mut parsed = Parsed::new();
    let mut rest = value;
    for item in strict_items(layout) {
        rest = consume(&mut parsed, rest, &item)?;
    }
    if !rest.is_empty() {
        return None;
    }
    resolve(parsed).ok()
}

fn strict_items(layout: &str) -> Vec<Item<'_>> {
    StrftimeItems::new(layout)
        .flat_map(|item| match item {
            Item::Fixed(Fixed::RFC3339) => RFC3339_ITEMS.to_vec(),
            other => vec![other],
        })
        .collect()
}

/// Match one layout item at the start of `rest`, returning what is left.
fn consume<'v>(parsed: &mut Parsed, rest: &'v str, item: &Item<'_>) -> Option<&'v str> {
    match item {
        Item::Literal(text) | Item::Space(text) => rest.strip_prefix(*text),
        Item::OwnedLiteral(text) | Item::OwnedSpace(text) => rest.strip_prefix(&**text),
        Item::Numeric(numeric, pad) => {
            let len = numeric_len(rest, numeric, *pad)?;
            let (field, tail) = rest.split_at(len);
            let left = format::parse_and_remainder(parsed, field, iter::once(item)).ok()?;
            left.is_empty().then_some(tail)
        }
        Item::Error => None,
        _ => {
            if rest.starts_with(char::is_whitespace) {
                return None;
            }
            format::parse_and_remainder(parsed, rest, iter::once(item)).ok()
        }
    }
}

/// Rendered width of a numeric field, or `None` for open-ended ones (`%s`).
fn field_width(numeric: &Numeric) -> Option<usize> {
    match numeric {
        Numeric::Year | Numeric::IsoYear => Some(4),
        Numeric::YearDiv100
        | Numeric::YearMod100
        | Numeric::IsoYearDiv100
        | Numeric::IsoYearMod100
        | Numeric::Month
        | Numeric::Day
        | Numeric::WeekFromSun
        | Numeric::WeekFromMon
        | Numeric::IsoWeek
        | Numeric::Hour
        | Numeric::Hour12
        | Numeric::Minute
        | Numeric::Second => Some(2),
        Numeric::Ordinal => Some(3),
        Numeric::NumDaysFromSun | Numeric::WeekdayFromMon => Some(1),
        Numeric::Nanosecond => Some(9),
        _ => None,
    }
}

/// Byte length of the numeric field at the start of `rest`.
fn numeric_len(rest: &str, numeric: &Numeric, pad: Pad) -> Option<usize> {
    let bytes = rest.as_bytes();
    let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    match (field_width(numeric), pad) {
        (Some(width), Pad::Zero) => (digits >= width).then_some(width),
        (Some(width), Pad::None) => (digits > 0).then_some(digits.min(width)),
        (Some(width), Pad::Space) => {
            let field = bytes.get(..width)?;
            let spaces = field.iter().take_while(|b| **b == b' ').count();
            (spaces < width && field[spaces..].iter().all(u8::is_ascii_digit)).then_some(width)
        }
        (None, _) => {
            let sign = usize::from(bytes.first() == Some(&b'-'));
            let digits = bytes[sign..].iter().take_while(|b| b.is_ascii_digit()).count();
            (digits > 0).then_some(sign + digits)
        }
    }
}

fn resolve(mut parsed: Parsed) -> ParseResult<Instant> {
    if parsed.timestamp().is_none() {
        fill_date_defaults(&mut parsed)?;
        fill_time_defaults(&mut parsed)?;
    }
    if parsed.offset().is_none() {
        parsed.set_offset(0)?;
    }
    parsed.to_datetime()
}

fn fill_date_defaults(parsed: &mut Parsed) -> ParseResult<()> {
    let has_year = parsed.year().is_some()
        || parsed.year_div_100().is_some()
        || parsed.year_mod_100().is_some()
        || parsed.isoyear().is_some()
        || parsed.isoyear_div_100().is_some()
        || parsed.isoyear_mod_100().is_some();
    if !has_year {
        parsed.set_year(0)?;
    }

    let has_day_of_year = parsed.month().is_some()
        || parsed.ordinal().is_some()
        || parsed.isoweek().is_some()
        || parsed.week_from_sun().is_some()
        || parsed.week_from_mon().is_some();
    if !has_day_of_year {
        parsed.set_month(1)?;
    }

    if parsed.month().is_some() && parsed.day().is_none() {
        parsed.set_day(1)?;
    }
    Ok(())
}

fn fill_time_defaults(parsed: &mut Parsed) -> ParseResult<()> {
    if parsed.hour_div_12().is_none() && parsed.hour_mod_12().is_none() {
        parsed.set_hour(0)?;
    }
    if parsed.minute().is_none() {
        parsed.set_minute(0)?;
    }
    Ok(())
}
