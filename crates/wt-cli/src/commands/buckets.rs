//! Buckets command: the intervals behind every category total.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use wt_core::{Interval, TimeBuckets, total_hours};

use super::util::{format_hours, format_instant, load_report};
use crate::Config;

#[derive(Debug, Args)]
pub struct BucketsArgs {
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,

    /// Calendar to read (defaults to `calendar_id` from the config).
    #[arg(long)]
    pub calendar_id: Option<String>,
}

pub fn run<W: Write>(writer: &mut W, args: &BucketsArgs, config: &Config) -> Result<()> {
    let data = load_report(config, args.calendar_id.as_deref())?;

    if args.json {
        serde_json::to_writer_pretty(&mut *writer, &data.report.buckets)?;
        writeln!(writer)?;
    } else {
        write_buckets(writer, &data.report.buckets)?;
    }
    Ok(())
}

fn named(buckets: &TimeBuckets) -> [(&'static str, &[Interval]); 11] {
    [
        ("work_days", buckets.work_days.as_slice()),
        ("work_time", buckets.work_time.as_slice()),
        ("off_work", buckets.off_work.as_slice()),
        ("leave", buckets.leave.as_slice()),
        ("rest", buckets.rest.as_slice()),
        ("support", buckets.support.as_slice()),
        ("unworkable", buckets.unworkable.as_slice()),
        ("meeting", buckets.meeting.as_slice()),
        ("improving", buckets.improving.as_slice()),
        ("dev", buckets.dev.as_slice()),
        ("dev_without_improving", buckets.dev_without_improving.as_slice()),
    ]
}

fn write_buckets<W: Write>(writer: &mut W, buckets: &TimeBuckets) -> std::io::Result<()> {
    for (name, intervals) in named(buckets) {
        writeln!(
            writer,
            "{name} ({}, {})",
            intervals.len(),
            format_hours(total_hours(intervals))
        )?;
        for interval in intervals {
            writeln!(
                writer,
                "  {} - {}",
                format_instant(interval.start()),
                format_instant(interval.end())
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use insta::assert_snapshot;
    use wt_core::{CalendarEvent, DayRange, WorkCalendar, WorkSettings, compute_buckets};

    #[test]
    fn test_buckets_lists_intervals() {
        let settings = WorkSettings {
            calendar: WorkCalendar {
                days: vec![DayRange {
                    from: Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap(),
                    to: Utc.with_ymd_and_hms(2025, 1, 16, 0, 0, 0).unwrap(),
                }],
                ..WorkCalendar::default()
            },
            ..WorkSettings::default()
        };
        let events = vec![
            CalendarEvent::new("Leave", "2025-01-15T09:00:00Z", "2025-01-15T10:00:00Z"),
            CalendarEvent::new("Sync", "2025-01-15T17:00:00Z", "2025-01-15T18:30:00Z"),
        ];
        let (buckets, _) = compute_buckets(&events, &settings);

        let mut output = Vec::new();
        write_buckets(&mut output, &buckets).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        work_days (1, 24.0h)
          2025-01-15 00:00 UTC - 2025-01-16 00:00 UTC
        work_time (2, 8.0h)
          2025-01-15 09:00 UTC - 2025-01-15 12:00 UTC
          2025-01-15 13:00 UTC - 2025-01-15 18:00 UTC
        off_work (3, 16.0h)
          2025-01-15 00:00 UTC - 2025-01-15 09:00 UTC
          2025-01-15 12:00 UTC - 2025-01-15 13:00 UTC
          2025-01-15 18:00 UTC - 2025-01-16 00:00 UTC
        leave (1, 1.0h)
          2025-01-15 09:00 UTC - 2025-01-15 10:00 UTC
        rest (3, 17.0h)
          2025-01-15 00:00 UTC - 2025-01-15 10:00 UTC
          2025-01-15 12:00 UTC - 2025-01-15 13:00 UTC
          2025-01-15 18:00 UTC - 2025-01-16 00:00 UTC
        support (0, 0.0h)
        unworkable (3, 17.0h)
          2025-01-15 00:00 UTC - 2025-01-15 10:00 UTC
          2025-01-15 12:00 UTC - 2025-01-15 13:00 UTC
          2025-01-15 18:00 UTC - 2025-01-16 00:00 UTC
        meeting (1, 1.0h)
          2025-01-15 17:00 UTC - 2025-01-15 18:00 UTC
        improving (0, 0.0h)
        dev (2, 6.0h)
          2025-01-15 10:00 UTC - 2025-01-15 12:00 UTC
          2025-01-15 13:00 UTC - 2025-01-15 17:00 UTC
        dev_without_improving (2, 6.0h)
          2025-01-15 10:00 UTC - 2025-01-15 12:00 UTC
          2025-01-15 13:00 UTC - 2025-01-15 17:00 UTC
        ");
    }
}
