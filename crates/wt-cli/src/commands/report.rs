//! Report command: hours and shares of work time per category.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use wt_core::{EventCategory, Metrics, PercentBasis};

use super::util::{EventCounts, LoadedReport, format_hours, format_instant, load_report};
use crate::Config;

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,

    /// Calendar to report on (defaults to `calendar_id` from the config).
    #[arg(long)]
    pub calendar_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReportJson<'a> {
    calendar_id: &'a str,
    period_start: Option<DateTime<Utc>>,
    period_end: Option<DateTime<Utc>>,
    events: EventCounts,
    metrics: &'a Metrics,
    rejected: Vec<RejectedJson<'a>>,
}

#[derive(Debug, Serialize)]
struct RejectedJson<'a> {
    title: &'a str,
    category: EventCategory,
    error: String,
}

pub fn run<W: Write>(writer: &mut W, args: &ReportArgs, config: &Config) -> Result<()> {
    let data = load_report(config, args.calendar_id.as_deref())?;

    if args.json {
        write_json(writer, &data)?;
    } else {
        write_report(writer, &data)?;
    }
    Ok(())
}

fn write_json<W: Write>(writer: &mut W, data: &LoadedReport) -> Result<()> {
    let json = ReportJson {
        calendar_id: &data.calendar_id,
        period_start: data.period.map(|(start, _)| start),
        period_end: data.period.map(|(_, end)| end),
        events: data.counts,
        metrics: &data.report.metrics,
        rejected: data
            .report
            .rejected
            .iter()
            .map(|r| RejectedJson {
                title: &r.title,
                category: r.category,
                error: r.error.to_string(),
            })
            .collect(),
    };
    serde_json::to_writer_pretty(&mut *writer, &json)?;
    writeln!(writer)?;
    Ok(())
}

fn format_share(share: u32, basis: PercentBasis) -> String {
    match basis {
        PercentBasis::WorkHours => format!("{share}%"),
        PercentBasis::NoWorkTime => "-".to_string(),
    }
}

/// Writes the human-readable report.
pub fn write_report<W: Write>(writer: &mut W, data: &LoadedReport) -> std::io::Result<()> {
    let m = &data.report.metrics;
    let p = &m.percentages;
    let c = &data.counts;

    writeln!(writer, "WORK TIME REPORT: {}", data.calendar_id)?;
    match data.period {
        Some((start, end)) => writeln!(
            writer,
            "Period: {} to {}",
            format_instant(start),
            format_instant(end)
        )?,
        None => writeln!(writer, "Period: no work days configured")?,
    }
    writeln!(
        writer,
        "Events: {} (leave {}, support {}, improve {}, meeting {})",
        c.total(),
        c.leave,
        c.support,
        c.improve,
        c.meeting
    )?;

    writeln!(writer)?;
    writeln!(writer, "{:<12} {:>7} {:>6}", "CATEGORY", "HOURS", "SHARE")?;
    writeln!(writer, "{}", "─".repeat(27))?;
    for (label, hours, share) in [
        ("Leave", m.leave_hours, p.leave),
        ("Support", m.support_hours, p.support),
        ("Meeting", m.meeting_hours, p.meeting),
        ("Improving", m.improving_hours, p.improving),
        ("Development", m.dev_hours, p.dev),
    ] {
        writeln!(
            writer,
            "{label:<12} {:>7} {:>6}",
            format_hours(hours),
            format_share(share, p.basis)
        )?;
    }
    writeln!(writer, "{:<12} {:>7}", "Work", format_hours(m.work_hours))?;
    if p.basis == PercentBasis::NoWorkTime {
        writeln!(writer)?;
        writeln!(
            writer,
            "No work time in the configured calendar; shares are unavailable."
        )?;
    }

    writeln!(writer)?;
    writeln!(
        writer,
        "{:<12} {:>7} {:>7} {:>7}",
        "DEVELOPMENT", "TOTAL", "FOCUS", "BROKEN"
    )?;
    writeln!(writer, "{}", "─".repeat(36))?;
    for (label, total, focus, broken) in [
        ("Free", m.dev_hours, m.focus_dev_hours, m.broken_dev_hours),
        (
            "Free+Improve",
            m.dev_without_improving_hours,
            m.focus_dev_without_improving_hours,
            m.broken_dev_without_improving_hours,
        ),
    ] {
        writeln!(
            writer,
            "{label:<12} {:>7} {:>7} {:>7}",
            format_hours(total),
            format_hours(focus),
            format_hours(broken)
        )?;
    }

    if !data.report.rejected.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "REJECTED EVENTS ({})", data.report.rejected.len())?;
        for rejected in &data.report.rejected {
            writeln!(
                writer,
                "- {} ({}): {}",
                rejected.title, rejected.category, rejected.error
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use insta::assert_snapshot;
    use wt_core::{CalendarEvent, CategoryTitles, DayRange, WorkCalendar, WorkSettings, calculate};

    fn settings(days: Vec<DayRange>) -> WorkSettings {
        WorkSettings {
            calendar: WorkCalendar {
                days,
                ..WorkCalendar::default()
            },
            titles: CategoryTitles::default(),
        }
    }

    fn one_day() -> DayRange {
        DayRange {
            from: Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap(),
            to: Utc.with_ymd_and_hms(2025, 1, 16, 0, 0, 0).unwrap(),
        }
    }

    fn render(data: &LoadedReport) -> String {
        let mut output = Vec::new();
        write_report(&mut output, data).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_report_mixed_day() {
        let events = vec![
            CalendarEvent::new("Support", "2025-01-15T09:00:00Z", "2025-01-15T10:00:00Z"),
            CalendarEvent::new("Retro", "2025-01-15T10:00:00Z", "2025-01-15T11:30:00Z"),
            CalendarEvent::new("Improve", "2025-01-15T13:00:00Z", "2025-01-15T15:00:00Z"),
            CalendarEvent {
                title: "Ghost".to_string(),
                start: None,
                end: Some("2025-01-15T16:00:00Z".to_string()),
            },
        ];
        let day = one_day();
        let data = LoadedReport {
            calendar_id: "primary".to_string(),
            period: Some((day.from, day.to)),
            counts: EventCounts {
                leave: 0,
                support: 1,
                improve: 1,
                meeting: 2,
            },
            report: calculate(&events, &settings(vec![day])),
        };

        assert_snapshot!(render(&data), @r"
        WORK TIME REPORT: primary
        Period: 2025-01-15 00:00 UTC to 2025-01-16 00:00 UTC
        Events: 4 (leave 0, support 1, improve 1, meeting 2)

        CATEGORY       HOURS  SHARE
        ───────────────────────────
        Leave           0.0h     0%
        Support         1.0h    13%
        Meeting         1.5h    19%
        Improving       2.0h    25%
        Development     3.5h    44%
        Work            8.0h

        DEVELOPMENT    TOTAL   FOCUS  BROKEN
        ────────────────────────────────────
        Free            3.5h    3.0h    0.5h
        Free+Improve    5.5h    5.0h    0.5h

        REJECTED EVENTS (1)
        - Ghost (meeting): missing start timestamp
        ");
    }

    #[test]
    fn test_report_without_work_days() {
        let data = LoadedReport {
            calendar_id: "team".to_string(),
            period: None,
            counts: EventCounts::default(),
            report: calculate(&[], &settings(Vec::new())),
        };

        assert_snapshot!(render(&data), @r"
        WORK TIME REPORT: team
        Period: no work days configured
        Events: 0 (leave 0, support 0, improve 0, meeting 0)

        CATEGORY       HOURS  SHARE
        ───────────────────────────
        Leave           0.0h      -
        Support         0.0h      -
        Meeting         0.0h      -
        Improving       0.0h      -
        Development     0.0h      -
        Work            0.0h

        No work time in the configured calendar; shares are unavailable.

        DEVELOPMENT    TOTAL   FOCUS  BROKEN
        ────────────────────────────────────
        Free            0.0h    0.0h    0.0h
        Free+Improve    0.0h    0.0h    0.0h
        ");
    }

    #[test]
    fn test_report_json_fields() {
        let day = one_day();
        let events = vec![CalendarEvent::new(
            "Retro",
            "2025-01-15T10:00:00Z",
            "2025-01-15T11:00:00Z",
        )];
        let data = LoadedReport {
            calendar_id: "primary".to_string(),
            period: Some((day.from, day.to)),
            counts: EventCounts {
                meeting: 1,
                ..EventCounts::default()
            },
            report: calculate(&events, &settings(vec![day])),
        };

        let mut output = Vec::new();
        write_json(&mut output, &data).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();

        assert_eq!(value["calendar_id"], "primary");
        assert_eq!(value["events"]["meeting"], 1);
        assert_eq!(value["metrics"]["meeting_hours"], 1.0);
        assert_eq!(value["metrics"]["dev_hours"], 7.0);
        assert_eq!(value["metrics"]["percentages"]["meeting"], 13);
        assert_eq!(value["metrics"]["percentages"]["basis"], "work_hours");
        assert_eq!(value["rejected"].as_array().unwrap().len(), 0);
        assert_eq!(value["period_start"], "2025-01-15T00:00:00Z");
    }

    #[test]
    fn test_report_json_lists_rejected_category() {
        let day = one_day();
        let events = vec![CalendarEvent::new(
            "Support",
            "2025-01-15T12:00:00Z",
            "2025-01-15T10:00:00Z",
        )];
        let data = LoadedReport {
            calendar_id: "primary".to_string(),
            period: Some((day.from, day.to)),
            counts: EventCounts {
                support: 1,
                ..EventCounts::default()
            },
            report: calculate(&events, &settings(vec![day])),
        };

        let mut output = Vec::new();
        write_json(&mut output, &data).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();

        assert_eq!(value["rejected"][0]["title"], "Support");
        assert_eq!(value["rejected"][0]["category"], "support");
        assert_eq!(value["metrics"]["support_hours"], 0.0);
    }
}
