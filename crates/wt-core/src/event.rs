//! Calendar events as delivered by an external provider.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::interval::{Interval, IntervalError};

/// A calendar event snapshot.
///
/// Timestamps are kept exactly as the provider sent them so that malformed
/// values can be reported instead of silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Category tag or free-form meeting name.
    pub title: String,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

impl CalendarEvent {
    pub fn new(title: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }
}

/// A provider of calendar events for a query window.
///
/// Implementations should only return events the current user attends and
/// has not declined.
pub trait EventSource {
    type Error;

    fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, Self::Error>;
}

/// Maps an event's start and end to an interval.
///
/// Accepts RFC 3339 timestamps with any offset, or a bare `YYYY-MM-DD` date
/// for all-day events (midnight UTC).
pub fn interval_from_event(event: &CalendarEvent) -> Result<Interval, IntervalError> {
    let start = parse_timestamp("start", event.start.as_deref())?;
    let end = parse_timestamp("end", event.end.as_deref())?;
    Interval::new(start, end)
}

fn parse_timestamp(field: &'static str, value: Option<&str>) -> Result<DateTime<Utc>, IntervalError> {
    let raw = value
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or(IntervalError::MissingTimestamp { field })?;

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| IntervalError::InvalidTimestamp {
            field,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rfc3339_offsets_are_converted_to_utc() {
        let event = CalendarEvent::new("Standup", "2025-01-15T10:00:00+08:00", "2025-01-15T10:15:00+08:00");
        let interval = interval_from_event(&event).unwrap();
        assert_eq!(
            interval.start(),
            Utc.with_ymd_and_hms(2025, 1, 15, 2, 0, 0).unwrap()
        );
        assert_eq!(interval.duration_ms(), 15 * 60 * 1000);
    }

    #[test]
    fn all_day_dates_resolve_to_midnight() {
        let event = CalendarEvent::new("Leave", "2025-01-15", "2025-01-16");
        let interval = interval_from_event(&event).unwrap();
        assert_eq!(
            interval.start(),
            Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap()
        );
        assert!((interval.hours() - 24.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_start_is_rejected() {
        let event = CalendarEvent {
            title: "Sync".to_string(),
            start: None,
            end: Some("2025-01-15T10:00:00Z".to_string()),
        };
        assert_eq!(
            interval_from_event(&event),
            Err(IntervalError::MissingTimestamp { field: "start" })
        );
    }

    #[test]
    fn blank_end_counts_as_missing() {
        let event = CalendarEvent::new("Sync", "2025-01-15T10:00:00Z", "  ");
        assert_eq!(
            interval_from_event(&event),
            Err(IntervalError::MissingTimestamp { field: "end" })
        );
    }

    #[test]
    fn garbage_timestamp_is_rejected() {
        let event = CalendarEvent::new("Sync", "tomorrow", "2025-01-15T10:00:00Z");
        let err = interval_from_event(&event).unwrap_err();
        assert_eq!(err.to_string(), r#"invalid start timestamp: "tomorrow""#);
    }

    #[test]
    fn backwards_event_is_rejected() {
        let event = CalendarEvent::new("Sync", "2025-01-15T11:00:00Z", "2025-01-15T10:00:00Z");
        assert!(matches!(
            interval_from_event(&event),
            Err(IntervalError::EndBeforeStart { .. })
        ));
    }

    #[test]
    fn deserializes_with_missing_timestamps() {
        let event: CalendarEvent = serde_json::from_str(r#"{"title": "Sync"}"#).unwrap();
        assert_eq!(event.start, None);
        assert_eq!(event.end, None);
    }
}
