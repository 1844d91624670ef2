//! Period calculation - calendar windows for the weekly, monthly and yearly views.
//!
//! Bounds are inclusive on both ends: a period starts at midnight on its first day and
//! ends on the last millisecond of its last day. All instants are UTC.
//!
//! Allocation rates are stored per week. Monthly and yearly figures are derived with
//! fixed factors (4.33 weeks per month, 52 per year), not exact calendar lengths.

use crate::errors::{Error, Result};
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Average weeks per month used to scale weekly rates.
pub const WEEKS_PER_MONTH: f64 = 4.33;
/// Weeks per year used to scale weekly rates.
pub const WEEKS_PER_YEAR: f64 = 52.0;

const WEEK_MILLIS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Length of a budget period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Seven days starting on the configured week-start day
    #[default]
    Weekly,
    /// One calendar month
    Monthly,
    /// One calendar year
    Yearly,
}

impl Granularity {
    /// Every granularity, in display order.
    pub const ALL: [Self; 3] = [Self::Weekly, Self::Monthly, Self::Yearly];

    /// How many weekly allocations one period of this granularity is worth.
    #[must_use]
    pub const fn weekly_factor(self) -> f64 {
        match self {
            Self::Weekly => 1.0,
            Self::Monthly => WEEKS_PER_MONTH,
            Self::Yearly => WEEKS_PER_YEAR,
        }
    }

    /// Scales a weekly rate to this granularity without rounding.
    #[must_use]
    pub fn scale_weekly(self, weekly: f64) -> f64 {
        weekly * self.weekly_factor()
    }

    /// Converts an amount entered in this granularity to the canonical weekly rate,
    /// rounded to cents.
    #[must_use]
    pub fn to_weekly(self, display_amount: f64) -> f64 {
        round_to_cents(display_amount / self.weekly_factor())
    }

    /// Converts a weekly rate to this granularity for editing, rounded to cents.
    #[must_use]
    pub fn from_weekly(self, weekly: f64) -> f64 {
        round_to_cents(self.scale_weekly(weekly))
    }

    /// Lowercase name, as used in config files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(Error::InvalidInput {
                message: format!("Unknown period '{other}', expected weekly, monthly or yearly"),
            }),
        }
    }
}

/// Direction of a period navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// One period back
    Previous,
    /// One period forward
    Next,
}

/// An inclusive calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    /// Granularity the bounds were computed for
    pub granularity: Granularity,
    /// First instant of the period (midnight)
    pub start: DateTime<Utc>,
    /// Last instant of the period (23:59:59.999 on the final day)
    pub end: DateTime<Utc>,
}

impl Period {
    /// Whether `instant` falls inside the period, bounds included.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Calendar date of the first day.
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Calendar date of the last day.
    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }
}

/// Computes the period of the given granularity that contains `reference`.
#[must_use]
pub fn compute_bounds(reference: NaiveDate, granularity: Granularity, week_start: Weekday) -> Period {
    let (first, last) = match granularity {
        Granularity::Weekly => {
            let first = first_of_week(reference, week_start);
            (first, first + Duration::days(6))
        }
        Granularity::Monthly => (first_of_month(reference), last_of_month(reference)),
        Granularity::Yearly => (first_of_year(reference), last_of_year(reference)),
    };

    Period {
        granularity,
        start: start_of_day(first),
        end: end_of_day(last),
    }
}

/// Steps `reference` one period forwards or backwards.
///
/// Weekly steps move exactly seven days. Monthly and yearly steps keep the day of the
/// month where possible and clamp to the last valid day otherwise, so Mar 31 steps back
/// to Feb 29 in a leap year and Feb 29 steps forward a year to Feb 28.
#[must_use]
pub fn navigate(reference: NaiveDate, granularity: Granularity, direction: Direction) -> NaiveDate {
    let months = match granularity {
        Granularity::Weekly => {
            return match direction {
                Direction::Previous => reference - Duration::days(7),
                Direction::Next => reference + Duration::days(7),
            };
        }
        Granularity::Monthly => Months::new(1),
        Granularity::Yearly => Months::new(12),
    };

    let stepped = match direction {
        Direction::Previous => reference.checked_sub_months(months),
        Direction::Next => reference.checked_add_months(months),
    };
    // Only fails at the edge of chrono's representable range.
    stepped.unwrap_or(reference)
}

/// Number of weekly allocations between two instants: `ceil((end - start) / 7 days)`.
///
/// A partial week counts as a whole one. Spans of zero or less yield zero.
#[must_use]
pub fn weeks_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let millis = (end - start).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis + WEEK_MILLIS - 1) / WEEK_MILLIS
}

/// Rounds a monetary amount to whole cents.
#[must_use]
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Midnight at the start of `date`.
#[must_use]
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Last millisecond of `date`.
#[must_use]
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date + Duration::days(1)) - Duration::milliseconds(1)
}

fn first_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let offset = (7 + date.weekday().num_days_from_monday() - week_start.num_days_from_monday()) % 7;
    date - Duration::days(i64::from(offset))
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn last_of_month(date: NaiveDate) -> NaiveDate {
    // 32 days past the 1st always lands in the following month.
    first_of_month(first_of_month(date) + Duration::days(32)) - Duration::days(1)
}

fn first_of_year(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.ordinal0()))
}

fn last_of_year(date: NaiveDate) -> NaiveDate {
    first_of_year(first_of_year(date) + Duration::days(366)) - Duration::days(1)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use chrono::Timelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn days_of(year: i32) -> impl Iterator<Item = NaiveDate> {
        date(year, 1, 1)
            .iter_days()
            .take_while(move |d| d.year() == year)
    }

    #[test]
    fn test_weekly_bounds_sunday_start() {
        // Wednesday 2024-01-17
        let period = compute_bounds(date(2024, 1, 17), Granularity::Weekly, Weekday::Sun);
        assert_eq!(period.start_date(), date(2024, 1, 14));
        assert_eq!(period.end_date(), date(2024, 1, 20));
        assert_eq!(period.start.time(), NaiveTime::MIN);
        assert_eq!(period.end.hour(), 23);
        assert_eq!(period.end.minute(), 59);
        assert_eq!(period.end.second(), 59);
        assert_eq!(period.end.timestamp_subsec_millis(), 999);
    }

    #[test]
    fn test_weekly_bounds_on_week_start_day() {
        let period = compute_bounds(date(2024, 1, 14), Granularity::Weekly, Weekday::Sun);
        assert_eq!(period.start_date(), date(2024, 1, 14));

        let period = compute_bounds(date(2024, 1, 21), Granularity::Weekly, Weekday::Mon);
        assert_eq!(period.start_date(), date(2024, 1, 15));
        assert_eq!(period.end_date(), date(2024, 1, 21));
    }

    #[test]
    fn test_monthly_bounds_leap_february() {
        let period = compute_bounds(date(2024, 2, 15), Granularity::Monthly, Weekday::Sun);
        assert_eq!(period.start_date(), date(2024, 2, 1));
        assert_eq!(period.end_date(), date(2024, 2, 29));

        let period = compute_bounds(date(2023, 12, 31), Granularity::Monthly, Weekday::Sun);
        assert_eq!(period.start_date(), date(2023, 12, 1));
        assert_eq!(period.end_date(), date(2023, 12, 31));
    }

    #[test]
    fn test_yearly_bounds() {
        let period = compute_bounds(date(2024, 7, 4), Granularity::Yearly, Weekday::Sun);
        assert_eq!(period.start, start_of_day(date(2024, 1, 1)));
        assert_eq!(period.end, end_of_day(date(2024, 12, 31)));

        let period = compute_bounds(date(2023, 1, 1), Granularity::Yearly, Weekday::Sun);
        assert_eq!(period.end_date(), date(2023, 12, 31));
    }

    #[test]
    fn test_bounds_are_idempotent_within_period() {
        for granularity in Granularity::ALL {
            for day in days_of(2024) {
                let period = compute_bounds(day, granularity, Weekday::Sun);
                assert!(period.contains(start_of_day(day)));
                for inner in [period.start_date(), day, period.end_date()] {
                    assert_eq!(compute_bounds(inner, granularity, Weekday::Sun), period);
                }
            }
        }
    }

    #[test]
    fn test_weekly_span_and_start_day() {
        for week_start in [Weekday::Sun, Weekday::Mon, Weekday::Sat] {
            for day in days_of(2024) {
                let period = compute_bounds(day, Granularity::Weekly, week_start);
                assert_eq!(period.start_date().weekday(), week_start);
                assert_eq!(period.end_date() - period.start_date(), Duration::days(6));
                assert_eq!(
                    period.end - period.start,
                    Duration::days(7) - Duration::milliseconds(1)
                );
            }
        }
    }

    #[test]
    fn test_navigate_weekly() {
        let day = date(2024, 1, 3);
        assert_eq!(navigate(day, Granularity::Weekly, Direction::Next), date(2024, 1, 10));
        assert_eq!(
            navigate(day, Granularity::Weekly, Direction::Previous),
            date(2023, 12, 27)
        );
    }

    #[test]
    fn test_navigate_monthly_clamps_to_last_day() {
        assert_eq!(
            navigate(date(2024, 3, 31), Granularity::Monthly, Direction::Previous),
            date(2024, 2, 29)
        );
        assert_eq!(
            navigate(date(2023, 1, 31), Granularity::Monthly, Direction::Next),
            date(2023, 2, 28)
        );
        assert_eq!(
            navigate(date(2023, 12, 15), Granularity::Monthly, Direction::Next),
            date(2024, 1, 15)
        );
    }

    #[test]
    fn test_navigate_yearly_from_leap_day() {
        assert_eq!(
            navigate(date(2024, 2, 29), Granularity::Yearly, Direction::Next),
            date(2025, 2, 28)
        );
        assert_eq!(
            navigate(date(2024, 6, 1), Granularity::Yearly, Direction::Previous),
            date(2023, 6, 1)
        );
    }

    #[test]
    fn test_navigate_round_trip_lands_in_same_period() {
        for granularity in Granularity::ALL {
            let day = date(2024, 5, 20);
            let back = navigate(
                navigate(day, granularity, Direction::Previous),
                granularity,
                Direction::Next,
            );
            assert_eq!(
                compute_bounds(back, granularity, Weekday::Sun),
                compute_bounds(day, granularity, Weekday::Sun)
            );
        }
    }

    #[test]
    fn test_weeks_between_rounds_up() {
        let start = start_of_day(date(2024, 1, 1));
        assert_eq!(weeks_between(start, start), 0);
        assert_eq!(weeks_between(start, start + Duration::seconds(1)), 1);
        assert_eq!(weeks_between(start, start + Duration::days(7)), 1);
        assert_eq!(weeks_between(start, start + Duration::days(21)), 3);
        assert_eq!(
            weeks_between(start, start + Duration::days(21) + Duration::milliseconds(1)),
            4
        );
        assert_eq!(weeks_between(start, end_of_day(date(2024, 1, 21))), 3);
    }

    #[test]
    fn test_weeks_between_negative_span_is_zero() {
        let start = start_of_day(date(2024, 1, 8));
        assert_eq!(weeks_between(start, start - Duration::days(3)), 0);
    }

    #[test]
    fn test_granularity_conversions() {
        assert_eq!(Granularity::Monthly.to_weekly(433.0), 100.0);
        assert_eq!(Granularity::Monthly.from_weekly(100.0), 433.0);
        assert_eq!(Granularity::Yearly.to_weekly(5200.0), 100.0);
        assert_eq!(Granularity::Yearly.from_weekly(25.0), 1300.0);
        assert_eq!(Granularity::Weekly.to_weekly(12.346), 12.35);
    }

    #[test]
    fn test_granularity_parse_and_display() {
        assert_eq!("Monthly".parse::<Granularity>().unwrap(), Granularity::Monthly);
        assert_eq!(" yearly ".parse::<Granularity>().unwrap(), Granularity::Yearly);
        assert!(matches!(
            "daily".parse::<Granularity>(),
            Err(Error::InvalidInput { .. })
        ));
        for granularity in Granularity::ALL {
            assert_eq!(granularity.to_string().parse::<Granularity>().unwrap(), granularity);
        }
    }

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(99.999_999), 100.0);
        assert_eq!(round_to_cents(-1.234), -1.23);
        assert_eq!(round_to_cents(0.0), 0.0);
    }
}
