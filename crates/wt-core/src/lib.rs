//! Core engine for work-time statistics.
//!
//! This crate turns calendar events and a work calendar into categorized
//! work time:
//! - Interval: union, difference and duration of half-open interval sets
//! - Calendar: work days and the morning/afternoon work windows
//! - Classify: title-based leave/support/improve/meeting partition
//! - Calculator: the priority pipeline producing buckets and metrics

pub mod calculator;
pub mod calendar;
pub mod classify;
pub mod event;
pub mod interval;

pub use calculator::{
    Metrics, PercentBasis, Percentages, PriorityViolation, RejectedEvent, TimeBuckets, TimeReport,
    WorkSettings, calculate, compute_buckets, compute_metrics, percent_of,
};
pub use calendar::{
    CalendarError, DayOffset, DayRange, WorkCalendar, WorkWindow, work_day_intervals,
    work_time_intervals,
};
pub use classify::{CategoryTitles, ClassifiedEvents, EventCategory, classify_events};
pub use event::{CalendarEvent, EventSource, interval_from_event};
pub use interval::{
    Interval, IntervalError, difference, filter_out_broken_time, focus_hours, intersection,
    normalize, total_hours, union,
};
