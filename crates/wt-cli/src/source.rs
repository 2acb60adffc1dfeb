//! File-backed event source reading Google Calendar style event exports.
//!
//! Each calendar lives in `<events_dir>/<calendar_id>.json` as an
//! `events.list` response body: `{ "items": [ ... ] }`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use wt_core::{CalendarEvent, EventSource, interval_from_event};

/// The subset of an `events.list` response that the report needs.
#[derive(Debug, Deserialize)]
struct EventList {
    #[serde(default)]
    items: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    start: Option<EventTime>,
    #[serde(default)]
    end: Option<EventTime>,
    #[serde(default)]
    attendees: Vec<Attendee>,
}

/// Timed events carry `dateTime`, all-day events carry `date`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    #[serde(default)]
    date_time: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Attendee {
    #[serde(default, rename = "self")]
    is_self: bool,
    #[serde(default)]
    response_status: Option<String>,
}

impl EventTime {
    fn into_timestamp(self) -> Option<String> {
        self.date_time.or(self.date)
    }
}

impl RawEvent {
    /// True when the current user is on the guest list and has not declined.
    fn attended(&self) -> bool {
        self.attendees
            .iter()
            .any(|a| a.is_self && a.response_status.as_deref() != Some("declined"))
    }

    fn cancelled(&self) -> bool {
        self.status.as_deref() == Some("cancelled")
    }

    fn into_event(self) -> CalendarEvent {
        CalendarEvent {
            title: self.summary.unwrap_or_default(),
            start: self.start.and_then(EventTime::into_timestamp),
            end: self.end.and_then(EventTime::into_timestamp),
        }
    }
}

/// Reads events from per-calendar JSON files in a directory.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the export for a calendar.
    pub fn calendar_path(&self, calendar_id: &str) -> PathBuf {
        self.dir.join(format!("{calendar_id}.json"))
    }
}

impl EventSource for JsonDirSource {
    type Error = anyhow::Error;

    fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>> {
        let path = self.calendar_path(calendar_id);
        let list = read_event_list(&path)?;
        let total = list.items.len();

        let events: Vec<CalendarEvent> = list
            .items
            .into_iter()
            .filter(|raw| !raw.cancelled() && raw.attended())
            .map(RawEvent::into_event)
            .filter(|event| in_window(event, time_min, time_max))
            .collect();

        tracing::debug!(
            path = ?path,
            total,
            selected = events.len(),
            "loaded calendar events"
        );
        Ok(events)
    }
}

fn read_event_list(path: &Path) -> Result<EventList> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Keeps events overlapping `[time_min, time_max)`.
///
/// Events whose times cannot be read are kept so the calculator can report them.
fn in_window(event: &CalendarEvent, time_min: DateTime<Utc>, time_max: DateTime<Utc>) -> bool {
    match interval_from_event(event) {
        Ok(interval) => interval.start() < time_max && interval.end() > time_min,
        Err(_) => true,
    }
}
