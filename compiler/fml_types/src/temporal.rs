//! Calendar values: absolute dates and ISO-8601 durations.
//!
//! Dates are `chrono::DateTime<FixedOffset>`. Durations keep months and
//! seconds apart because a month has no fixed length; adding one moves the
//! calendar month and clamps the day.

use std::fmt;

use chrono::{DateTime, FixedOffset, Months, NaiveDate, TimeDelta, TimeZone};

/// Absolute timestamp with the offset it was written in.
pub type Date = DateTime<FixedOffset>;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;
const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;

/// Parse a date literal.
///
/// Accepts RFC 3339 (`2020-01-15T10:00:00+01:00`), the basic-offset form
/// `2020-01-15T10:00:00+0100`, and a plain `2020-01-15` taken as midnight
/// UTC.
pub fn parse_date(text: &str) -> Option<Date> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date);
    }
    if let Ok(date) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(date);
    }
    let day = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    let midnight = day.and_hms_opt(0, 0, 0)?;
    let utc = FixedOffset::east_opt(0)?;
    Some(utc.from_utc_datetime(&midnight))
}

/// Render a date the way literals are written.
pub fn format_date(date: &Date) -> String {
    date.to_rfc3339()
}

/// Signed calendar duration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IsoDuration {
    pub months: i64,
    pub seconds: i64,
}

impl IsoDuration {
    pub const ZERO: IsoDuration = IsoDuration {
        months: 0,
        seconds: 0,
    };

    pub const fn new(months: i64, seconds: i64) -> Self {
        IsoDuration { months, seconds }
    }

    /// Parse `[-]P[nY][nM][nW][nD][T[nH][nM][nS]]`. At least one component
    /// is required and components must appear in that order. Each `n` may
    /// carry its own `-`, as mixed-sign durations are displayed.
    pub fn parse(text: &str) -> Option<Self> {
        let (negative, rest) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let rest = rest.strip_prefix('P')?;
        let (date_part, time_part) = match rest.split_once('T') {
            Some((date, time)) => (date, Some(time)),
            None => (rest, None),
        };

        let mut duration = IsoDuration::ZERO;
        let mut components = 0;

        for (value, unit) in components_of(date_part, &['Y', 'M', 'W', 'D'])? {
            components += 1;
            let added = match unit {
                'Y' => IsoDuration::new(value.checked_mul(12)?, 0),
                'M' => IsoDuration::new(value, 0),
                'W' => IsoDuration::new(0, value.checked_mul(SECONDS_PER_WEEK)?),
                _ => IsoDuration::new(0, value.checked_mul(SECONDS_PER_DAY)?),
            };
            duration = duration.checked_add(added)?;
        }

        if let Some(time_part) = time_part {
            let time = components_of(time_part, &['H', 'M', 'S'])?;
            // `PT` alone is not a duration.
            if time.is_empty() {
                return None;
            }
            for (value, unit) in time {
                components += 1;
                let seconds = match unit {
                    'H' => value.checked_mul(SECONDS_PER_HOUR)?,
                    'M' => value.checked_mul(SECONDS_PER_MINUTE)?,
                    _ => value,
                };
                duration = duration.checked_add(IsoDuration::new(0, seconds))?;
            }
        }

        if components == 0 {
            return None;
        }
        if negative {
            duration = duration.checked_neg()?;
        }
        Some(duration)
    }

    pub fn is_zero(&self) -> bool {
        *self == IsoDuration::ZERO
    }

    pub fn checked_add(self, other: IsoDuration) -> Option<IsoDuration> {
        Some(IsoDuration {
            months: self.months.checked_add(other.months)?,
            seconds: self.seconds.checked_add(other.seconds)?,
        })
    }

    pub fn checked_sub(self, other: IsoDuration) -> Option<IsoDuration> {
        self.checked_add(other.checked_neg()?)
    }

    pub fn checked_neg(self) -> Option<IsoDuration> {
        Some(IsoDuration {
            months: self.months.checked_neg()?,
            seconds: self.seconds.checked_neg()?,
        })
    }

    pub fn checked_mul(self, factor: i64) -> Option<IsoDuration> {
        Some(IsoDuration {
            months: self.months.checked_mul(factor)?,
            seconds: self.seconds.checked_mul(factor)?,
        })
    }
}

/// Split `5Y-3M` into `[(5, 'Y'), (-3, 'M')]`, enforcing unit order.
fn components_of(text: &str, units: &[char]) -> Option<Vec<(i64, char)>> {
    let mut out = Vec::new();
    let mut next_unit = 0;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if c.is_ascii_digit() || (c == '-' && i == start) {
            continue;
        }
        let offset = units[next_unit..].iter().position(|&u| u == c)?;
        next_unit += offset + 1;
        out.push((component_value(&text[start..i])?, c));
        start = i + c.len_utf8();
    }

    // Trailing digits without a unit.
    if start != text.len() {
        return None;
    }
    Some(out)
}

/// `5` or `-5`. A sign alone is not a number.
fn component_value(text: &str) -> Option<i64> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() {
        return None;
    }
    text.parse().ok()
}

/// ISO 8601 text that [`IsoDuration::parse`] reads back.
///
/// A duration with no positive part is written `-P...` with positive
/// components. When months and seconds have opposite signs no single sign
/// fits, so every component carries its own: one month less a day is
/// `P1M-1D`.
impl fmt::Display for IsoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("PT0S");
        }
        let (months, seconds) = (i128::from(self.months), i128::from(self.seconds));
        if months <= 0 && seconds <= 0 {
            f.write_str("-P")?;
            write_components(f, -months, -seconds)
        } else {
            f.write_str("P")?;
            write_components(f, months, seconds)
        }
    }
}

/// Components of a duration after the `P`. Each takes the sign of the part
/// (months or seconds) it comes from.
fn write_components(f: &mut fmt::Formatter<'_>, months: i128, seconds: i128) -> fmt::Result {
    let (years, months) = (months / 12, months % 12);
    let days = seconds / i128::from(SECONDS_PER_DAY);
    let rest = seconds % i128::from(SECONDS_PER_DAY);
    let hours = rest / i128::from(SECONDS_PER_HOUR);
    let minutes = rest % i128::from(SECONDS_PER_HOUR) / i128::from(SECONDS_PER_MINUTE);
    let secs = rest % i128::from(SECONDS_PER_MINUTE);

    for (value, unit) in [(years, 'Y'), (months, 'M'), (days, 'D')] {
        if value != 0 {
            write!(f, "{value}{unit}")?;
        }
    }
    if hours != 0 || minutes != 0 || secs != 0 {
        f.write_str("T")?;
        for (value, unit) in [(hours, 'H'), (minutes, 'M'), (secs, 'S')] {
            if value != 0 {
                write!(f, "{value}{unit}")?;
            }
        }
    }
    Ok(())
}

/// `date + duration`. Months are applied before seconds.
pub fn add_duration(date: &Date, duration: IsoDuration) -> Option<Date> {
    let shifted = if duration.months >= 0 {
        let months = u32::try_from(duration.months).ok()?;
        date.checked_add_months(Months::new(months))?
    } else {
        let months = u32::try_from(duration.months.checked_neg()?).ok()?;
        date.checked_sub_months(Months::new(months))?
    };
    shifted.checked_add_signed(TimeDelta::try_seconds(duration.seconds)?)
}

/// `date - duration`.
pub fn sub_duration(date: &Date, duration: IsoDuration) -> Option<Date> {
    add_duration(date, duration.checked_neg()?)
}

/// `later - earlier` as a seconds-only duration.
pub fn between(later: &Date, earlier: &Date) -> IsoDuration {
    IsoDuration::new(0, later.signed_duration_since(*earlier).num_seconds())
}

#[cfg(test)]
mod tests;
