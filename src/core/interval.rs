use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

use chrono::{
    DateTime,
    Datelike,
    Local,
    Months,
    NaiveDate,
    NaiveDateTime,
    NaiveTime,
    TimeDelta,
    TimeZone,
    Timelike,
};
use crate::prelude::*;

/// Length of a metering interval in seconds.
const INTERVAL_SECONDS: u32 = 15 * 60;

/// Anything that reads as a local wall-clock time.
pub trait WallClock {
    fn wall_clock(&self) -> NaiveDateTime;
}

impl WallClock for NaiveDateTime {
    fn wall_clock(&self) -> NaiveDateTime {
        *self
    }
}

/// Drops the offset and keeps the wall-clock reading in that offset.
impl<Tz: TimeZone> WallClock for DateTime<Tz> {
    fn wall_clock(&self) -> NaiveDateTime {
        self.naive_local()
    }
}

/// Floor the timestamp to the quarter-hour grid shared by readings and prices.
///
/// Idempotent, and the result carries no seconds and no sub-second part.
pub fn floor_to_interval(timestamp: impl WallClock) -> NaiveDateTime {
    let timestamp = timestamp.wall_clock();
    let seconds = timestamp.num_seconds_from_midnight();
    let floored = TimeDelta::seconds(i64::from(seconds - seconds % INTERVAL_SECONDS));
    timestamp.date().and_time(NaiveTime::MIN + floored)
}

#[derive(Copy, Clone, Eq, PartialEq)]
#[must_use]
pub struct Interval {
    /// Inclusive.
    pub start: NaiveDateTime,

    /// Exclusive.
    pub end: NaiveDateTime,
}

impl Debug for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

impl Interval {
    pub const fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn contains(self, other: NaiveDateTime) -> bool {
        (self.start <= other) && (other < self.end)
    }
}

/// Calendar month, the only billing period there is.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[must_use]
pub struct Month {
    /// First day of the month.
    start: NaiveDate,

    /// First day of the following month.
    end: NaiveDate,
}

impl Month {
    pub fn try_new(year: i32, month: u32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .with_context(|| format!("invalid month: {year}-{month:02}"))?;
        let end = start
            .checked_add_months(Months::new(1))
            .with_context(|| format!("month out of range: {year}-{month:02}"))?;
        Ok(Self { start, end })
    }

    /// The month of the local clock.
    pub fn current() -> Result<Self> {
        let today = Local::now().date_naive();
        Self::try_new(today.year(), today.month())
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.start.year()
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.start.month()
    }

    /// `[first day of the month, first day of the next month)`, December rolling over
    /// into January of the next year.
    pub fn interval(self) -> Interval {
        Interval::new(self.start.and_time(NaiveTime::MIN), self.end.and_time(NaiveTime::MIN))
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year(), self.month())
    }
}

impl Debug for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl FromStr for Month {
    type Err = Error;

    /// Parse `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self> {
        let (year, month) =
            s.split_once('-').with_context(|| format!("expected `YYYY-MM`, got `{s}`"))?;
        Self::try_new(
            year.parse().with_context(|| format!("invalid year in `{s}`"))?,
            month.parse().with_context(|| format!("invalid month in `{s}`"))?,
        )
    }
}
