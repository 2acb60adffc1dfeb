//! Title-based event classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::event::CalendarEvent;

/// The reserved event titles that mark non-meeting categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryTitles {
    pub leave: String,
    pub support: String,
    pub improve: String,
}

impl Default for CategoryTitles {
    fn default() -> Self {
        Self {
            leave: "Leave".to_string(),
            support: "Support".to_string(),
            improve: "Improve".to_string(),
        }
    }
}

/// What an event's time counts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Leave,
    Support,
    Improve,
    /// Anything that does not carry a reserved title, including typos.
    Meeting,
}

impl EventCategory {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Leave => "leave",
            Self::Support => "support",
            Self::Improve => "improve",
            Self::Meeting => "meeting",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl CategoryTitles {
    /// Exact, case-sensitive title match; unmatched titles are meetings.
    #[must_use]
    pub fn categorize(&self, title: &str) -> EventCategory {
        if title == self.leave {
            EventCategory::Leave
        } else if title == self.support {
            EventCategory::Support
        } else if title == self.improve {
            EventCategory::Improve
        } else {
            EventCategory::Meeting
        }
    }
}

/// Events partitioned by category, each group in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedEvents<'a> {
    pub leave: Vec<&'a CalendarEvent>,
    pub support: Vec<&'a CalendarEvent>,
    pub improve: Vec<&'a CalendarEvent>,
    pub meeting: Vec<&'a CalendarEvent>,
}

/// Splits events into leave, support, improve and meeting groups.
///
/// Every event lands in exactly one group.
#[must_use]
pub fn classify_events<'a>(
    events: &'a [CalendarEvent],
    titles: &CategoryTitles,
) -> ClassifiedEvents<'a> {
    let mut classified = ClassifiedEvents::default();
    for event in events {
        let group = match titles.categorize(&event.title) {
            EventCategory::Leave => &mut classified.leave,
            EventCategory::Support => &mut classified.support,
            EventCategory::Improve => &mut classified.improve,
            EventCategory::Meeting => &mut classified.meeting,
        };
        group.push(event);
    }
    classified
}
