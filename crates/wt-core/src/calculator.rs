//! Priority pipeline from raw events to work-time buckets and metrics.
//!
//! # Priority
//!
//! When events overlap, time goes to the highest-priority category:
//! leave > support > meeting > improve. Each bucket is derived by removing
//! every higher-priority bucket from its own events:
//!
//! 1. off-work    = work days - work time
//! 2. leave       = leave events - off-work
//! 3. rest        = leave + off-work
//! 4. support     = support events - rest
//! 5. unworkable  = rest + support
//! 6. meeting     = meeting events - unworkable
//! 7. improving   = (improve events - unworkable) - meeting
//! 8. dev         = work time - all events
//! 9. dev without improving = work time - all non-improve events
//!
//! Buckets are derived, never stored: [`calculate`] recomputes everything from
//! a snapshot of events and settings.

use serde::{Deserialize, Serialize};

use crate::calendar::{WorkCalendar, work_day_intervals, work_time_intervals};
use crate::classify::{CategoryTitles, EventCategory};
use crate::event::{CalendarEvent, interval_from_event};
use crate::interval::{
    Interval, IntervalError, difference, focus_hours, intersection, total_hours, union,
};

/// Settings snapshot consumed by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkSettings {
    pub calendar: WorkCalendar,
    pub titles: CategoryTitles,
}

/// An event left out of every bucket because its times were unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEvent {
    pub title: String,
    /// The category the title would have counted towards.
    pub category: EventCategory,
    pub error: IntervalError,
}

/// Every derived interval set.
///
/// `work_days` and `work_time` are kept as generated; all other buckets are
/// normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimeBuckets {
    pub work_days: Vec<Interval>,
    pub work_time: Vec<Interval>,
    pub off_work: Vec<Interval>,
    pub leave: Vec<Interval>,
    pub rest: Vec<Interval>,
    pub support: Vec<Interval>,
    pub unworkable: Vec<Interval>,
    pub meeting: Vec<Interval>,
    pub improving: Vec<Interval>,
    pub dev: Vec<Interval>,
    pub dev_without_improving: Vec<Interval>,
}

/// What percentages are relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentBasis {
    /// Percentages are shares of the total work hours.
    WorkHours,
    /// There are no work hours; every percentage is reported as 0.
    NoWorkTime,
}

/// Whole-number shares of work time per category.
///
/// Each share is rounded on its own, so they need not add up to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Percentages {
    pub basis: PercentBasis,
    pub leave: u32,
    pub support: u32,
    pub meeting: u32,
    pub improving: u32,
    pub dev: u32,
}

/// Hour totals derived from [`TimeBuckets`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub work_hours: f64,
    pub leave_hours: f64,
    pub support_hours: f64,
    pub meeting_hours: f64,
    pub improving_hours: f64,
    pub dev_hours: f64,
    pub focus_dev_hours: f64,
    pub broken_dev_hours: f64,
    pub dev_without_improving_hours: f64,
    pub focus_dev_without_improving_hours: f64,
    pub broken_dev_without_improving_hours: f64,
    pub percentages: Percentages,
}

/// Full result of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeReport {
    pub buckets: TimeBuckets,
    pub metrics: Metrics,
    pub rejected: Vec<RejectedEvent>,
}

/// A pair of buckets that share time although priority forbids it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityViolation {
    pub lower: &'static str,
    pub higher: &'static str,
    pub overlap: Vec<Interval>,
}

impl TimeReport {
    /// Confirms that meeting time avoids unworkable time and that improving
    /// time avoids both.
    pub fn check_priority_containment(&self) -> Result<(), PriorityViolation> {
        let b = &self.buckets;
        let pairs = [
            ("meeting", &b.meeting, "unworkable", &b.unworkable),
            ("improving", &b.improving, "meeting", &b.meeting),
            ("improving", &b.improving, "unworkable", &b.unworkable),
        ];
        for (lower, lower_set, higher, higher_set) in pairs {
            let overlap = intersection(lower_set, higher_set);
            if !overlap.is_empty() {
                return Err(PriorityViolation {
                    lower,
                    higher,
                    overlap,
                });
            }
        }
        Ok(())
    }
}

/// Runs the whole pipeline over a snapshot of events and settings.
#[must_use]
pub fn calculate(events: &[CalendarEvent], settings: &WorkSettings) -> TimeReport {
    let (buckets, rejected) = compute_buckets(events, settings);
    let metrics = compute_metrics(&buckets);
    TimeReport {
        buckets,
        metrics,
        rejected,
    }
}

/// Derives every bucket; events with unusable times are returned separately.
#[must_use]
pub fn compute_buckets(
    events: &[CalendarEvent],
    settings: &WorkSettings,
) -> (TimeBuckets, Vec<RejectedEvent>) {
    let mut categorized: Vec<(EventCategory, Interval)> = Vec::with_capacity(events.len());
    let mut rejected = Vec::new();

    for event in events {
        let category = settings.titles.categorize(&event.title);
        match interval_from_event(event) {
            Ok(interval) => categorized.push((category, interval)),
            Err(error) => {
                tracing::warn!(title = %event.title, %category, error = %error, "rejecting event");
                rejected.push(RejectedEvent {
                    title: event.title.clone(),
                    category,
                    error,
                });
            }
        }
    }

    let of = |wanted: EventCategory| -> Vec<Interval> {
        categorized
            .iter()
            .filter(|(category, _)| *category == wanted)
            .map(|(_, interval)| *interval)
            .collect()
    };
    let all_events: Vec<Interval> = categorized.iter().map(|(_, interval)| *interval).collect();
    let all_but_improve: Vec<Interval> = categorized
        .iter()
        .filter(|(category, _)| *category != EventCategory::Improve)
        .map(|(_, interval)| *interval)
        .collect();

    let work_days = work_day_intervals(&settings.calendar);
    let work_time = work_time_intervals(&settings.calendar);

    let off_work = difference(&work_days, &work_time);
    let leave = difference(&of(EventCategory::Leave), &off_work);
    let rest = union(&leave, &off_work);
    let support = difference(&of(EventCategory::Support), &rest);
    let unworkable = union(&rest, &support);
    let meeting = difference(&of(EventCategory::Meeting), &unworkable);
    let valid_improving = difference(&of(EventCategory::Improve), &unworkable);
    let improving = difference(&valid_improving, &meeting);
    let dev = difference(&work_time, &all_events);
    let dev_without_improving = difference(&work_time, &all_but_improve);

    tracing::debug!(
        events = categorized.len(),
        rejected = rejected.len(),
        work_days = work_days.len(),
        dev_blocks = dev.len(),
        "computed time buckets"
    );

    let buckets = TimeBuckets {
        work_days,
        work_time,
        off_work,
        leave,
        rest,
        support,
        unworkable,
        meeting,
        improving,
        dev,
        dev_without_improving,
    };
    (buckets, rejected)
}

/// Converts buckets into hours, focus/broken splits and percentages.
#[must_use]
pub fn compute_metrics(buckets: &TimeBuckets) -> Metrics {
    let work_hours = total_hours(&buckets.work_time);
    let leave_hours = total_hours(&buckets.leave);
    let support_hours = total_hours(&buckets.support);
    let meeting_hours = total_hours(&buckets.meeting);
    let improving_hours = total_hours(&buckets.improving);

    let dev_hours = total_hours(&buckets.dev);
    let focus_dev_hours = focus_hours(&buckets.dev);
    let dev_without_improving_hours = total_hours(&buckets.dev_without_improving);
    let focus_dev_without_improving_hours = focus_hours(&buckets.dev_without_improving);

    let percent = |hours: f64| percent_of(hours, work_hours);
    let percentages = Percentages {
        basis: if work_hours > 0.0 {
            PercentBasis::WorkHours
        } else {
            PercentBasis::NoWorkTime
        },
        leave: percent(leave_hours),
        support: percent(support_hours),
        meeting: percent(meeting_hours),
        improving: percent(improving_hours),
        dev: percent(dev_hours),
    };

    Metrics {
        work_hours,
        leave_hours,
        support_hours,
        meeting_hours,
        improving_hours,
        dev_hours,
        focus_dev_hours,
        broken_dev_hours: (dev_hours - focus_dev_hours).max(0.0),
        dev_without_improving_hours,
        focus_dev_without_improving_hours,
        broken_dev_without_improving_hours: (dev_without_improving_hours
            - focus_dev_without_improving_hours)
            .max(0.0),
        percentages,
    }
}

/// `round(100 * hours / work_hours)`, or 0 when there is no work time.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn percent_of(hours: f64, work_hours: f64) -> u32 {
    if work_hours <= 0.0 || !hours.is_finite() || hours <= 0.0 {
        return 0;
    }
    (100.0 * hours / work_hours).round() as u32
}
