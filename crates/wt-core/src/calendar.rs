//! Work calendar: which days are work days and which hours of them are work time.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interval::Interval;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Errors for calendar settings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// The offset was not `HH:MM` within a single day.
    #[error("invalid time of day {value:?}: expected HH:MM between 00:00 and 24:00")]
    InvalidOffset { value: String },

    /// A work window ends before it starts.
    #[error("{window} window ends ({end}) before it starts ({start})")]
    InvertedWindow {
        window: &'static str,
        start: DayOffset,
        end: DayOffset,
    },

    /// The morning window runs into the afternoon window.
    #[error("morning window ends ({morning_end}) after afternoon starts ({afternoon_start})")]
    OverlappingWindows {
        morning_end: DayOffset,
        afternoon_start: DayOffset,
    },
}

/// An offset from the start of a day, written as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayOffset(u32);

impl DayOffset {
    /// Creates an offset; `None` if it falls outside `00:00..=24:00`.
    #[must_use]
    pub const fn new(hours: u32, minutes: u32) -> Option<Self> {
        if minutes >= 60 {
            return None;
        }
        let Some(total) = hours.checked_mul(60) else {
            return None;
        };
        if total > MINUTES_PER_DAY {
            return None;
        }
        let total = total + minutes;
        if total > MINUTES_PER_DAY {
            return None;
        }
        Some(Self(total))
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::minutes(i64::from(self.0))
    }
}

impl FromStr for DayOffset {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalendarError::InvalidOffset {
            value: s.to_string(),
        };

        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

        let (hours, minutes) = s.trim().split_once(':').ok_or_else(invalid)?;
        if !(1..=2).contains(&hours.len()) || minutes.len() != 2 || !digits(hours) || !digits(minutes)
        {
            return Err(invalid());
        }
        let hours: u32 = hours.parse().map_err(|_| invalid())?;
        let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
        Self::new(hours, minutes).ok_or_else(invalid)
    }
}

impl TryFrom<String> for DayOffset {
    type Error = CalendarError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayOffset> for String {
    fn from(offset: DayOffset) -> Self {
        offset.to_string()
    }
}

impl fmt::Display for DayOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// A span of work days. Split into one-day chunks starting at `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Working hours within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkWindow {
    pub start: DayOffset,
    pub end: DayOffset,
}

/// Work days plus the morning and afternoon windows applied to each of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkCalendar {
    pub days: Vec<DayRange>,
    pub morning: WorkWindow,
    pub afternoon: WorkWindow,
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self {
            days: Vec::new(),
            morning: WorkWindow {
                start: DayOffset(9 * 60),
                end: DayOffset(12 * 60),
            },
            afternoon: WorkWindow {
                start: DayOffset(13 * 60),
                end: DayOffset(18 * 60),
            },
        }
    }
}

impl WorkCalendar {
    /// Checks that both windows run forward and the morning ends before the afternoon.
    pub fn validate(&self) -> Result<(), CalendarError> {
        for (window, name) in [(self.morning, "morning"), (self.afternoon, "afternoon")] {
            if window.end < window.start {
                return Err(CalendarError::InvertedWindow {
                    window: name,
                    start: window.start,
                    end: window.end,
                });
            }
        }
        if self.morning.end > self.afternoon.start {
            return Err(CalendarError::OverlappingWindows {
                morning_end: self.morning.end,
                afternoon_start: self.afternoon.start,
            });
        }
        Ok(())
    }

    /// Earliest start and latest end across all day ranges.
    #[must_use]
    pub fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = self.days.iter().map(|day| day.from).min()?;
        let end = self.days.iter().map(|day| day.to).max()?;
        Some((start, end))
    }
}

/// One interval per calendar day covered by the configured day ranges.
///
/// Each range is cut into consecutive one-day chunks starting at its `from`;
/// the last chunk stops at `to`. Empty or backwards ranges produce nothing.
#[must_use]
pub fn work_day_intervals(calendar: &WorkCalendar) -> Vec<Interval> {
    let mut days = Vec::new();
    for range in &calendar.days {
        let mut cursor = range.from;
        while cursor < range.to {
            let next = (cursor + Duration::days(1)).min(range.to);
            days.push(Interval::from_ordered(cursor, next));
            cursor = next;
        }
    }
    days
}

/// The morning and afternoon work windows of every work day, in day order.
#[must_use]
pub fn work_time_intervals(calendar: &WorkCalendar) -> Vec<Interval> {
    work_day_intervals(calendar)
        .iter()
        .flat_map(|day| {
            [calendar.morning, calendar.afternoon]
                .into_iter()
                .filter_map(move |window| window_on(day.start(), window))
        })
        .collect()
}

fn window_on(day_start: DateTime<Utc>, window: WorkWindow) -> Option<Interval> {
    let start = day_start + window.start.as_duration();
    let end = day_start + window.end.as_duration();
    match Interval::new(start, end) {
        Ok(interval) => Some(interval),
        Err(err) => {
            tracing::warn!(error = %err, "skipping inverted work window");
            None
        }
    }
}
