//! Shared utilities for CLI commands.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use wt_core::{CalendarEvent, EventSource, TimeReport, calculate, classify_events};

use crate::Config;
use crate::source::JsonDirSource;

/// Number of events per category, before any interval is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventCounts {
    pub leave: usize,
    pub support: usize,
    pub improve: usize,
    pub meeting: usize,
}

impl EventCounts {
    pub fn total(&self) -> usize {
        self.leave + self.support + self.improve + self.meeting
    }
}

/// Everything a command needs to render one calculation.
#[derive(Debug)]
pub struct LoadedReport {
    pub calendar_id: String,
    pub period: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub counts: EventCounts,
    pub report: TimeReport,
}

/// Fetches the events for the configured work days and runs the calculator.
pub fn load_report(config: &Config, calendar_id: Option<&str>) -> Result<LoadedReport> {
    let settings = config.settings();
    settings
        .calendar
        .validate()
        .context("invalid work calendar in configuration")?;

    let calendar_id = calendar_id.unwrap_or(config.calendar_id.as_str()).to_string();
    let period = settings.calendar.span();

    let events = match period {
        Some((time_min, time_max)) => JsonDirSource::new(&config.events_dir)
            .list_events(&calendar_id, time_min, time_max)
            .with_context(|| format!("failed to load events for calendar {calendar_id}"))?,
        None => {
            tracing::warn!("no work days configured; skipping event lookup");
            Vec::new()
        }
    };

    Ok(LoadedReport {
        calendar_id,
        period,
        counts: count_events(&events, config),
        report: calculate(&events, &settings),
    })
}

fn count_events(events: &[CalendarEvent], config: &Config) -> EventCounts {
    let classified = classify_events(events, &config.titles);
    EventCounts {
        leave: classified.leave.len(),
        support: classified.support.len(),
        improve: classified.improve.len(),
        meeting: classified.meeting.len(),
    }
}

/// Formats fractional hours with one decimal, e.g. "7.5h".
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.1}h")
}

/// Formats an instant as "2025-01-15 09:00 UTC".
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d %H:%M UTC").to_string()
}
