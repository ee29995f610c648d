use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::protocol::{date_time, format_date_time};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for EventId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Every event field except the server-assigned id. Request body for create
/// and update; update replaces the stored record wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub name: String,
    pub description: String,
    #[serde(with = "date_time")]
    pub start_date: NaiveDateTime,
    #[serde(with = "date_time")]
    pub end_date: NaiveDateTime,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_attendees: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attendees: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparation_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    #[serde(flatten)]
    pub draft: EventDraft,
}

impl Event {
    pub fn new(id: EventId, draft: EventDraft) -> Self {
        Self { id, draft }
    }

    pub fn name(&self) -> &str {
        &self.draft.name
    }

    pub fn description(&self) -> &str {
        &self.draft.description
    }

    pub fn location(&self) -> &str {
        &self.draft.location
    }

    pub fn start_date(&self) -> NaiveDateTime {
        self.draft.start_date
    }

    pub fn end_date(&self) -> NaiveDateTime {
        self.draft.end_date
    }
}

/// Raw form input as typed by a user. Empty strings mean "not filled in".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventForm {
    pub name: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub min_attendees: String,
    pub max_attendees: String,
    pub location_notes: String,
    pub preparation_notes: String,
}

impl From<&EventDraft> for EventForm {
    fn from(draft: &EventDraft) -> Self {
        Self {
            name: draft.name.clone(),
            description: draft.description.clone(),
            start_date: format_date_time(&draft.start_date),
            end_date: format_date_time(&draft.end_date),
            location: draft.location.clone(),
            min_attendees: draft.min_attendees.map(|v| v.to_string()).unwrap_or_default(),
            max_attendees: draft.max_attendees.map(|v| v.to_string()).unwrap_or_default(),
            location_notes: draft.location_notes.clone().unwrap_or_default(),
            preparation_notes: draft.preparation_notes.clone().unwrap_or_default(),
        }
    }
}

impl From<&Event> for EventForm {
    fn from(event: &Event) -> Self {
        Self::from(&event.draft)
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
