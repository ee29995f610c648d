//! Row formatting and per-table search for the active/archived tables.

use chrono::NaiveDateTime;
use shared::{
    catalog::{filter_events, Category},
    domain::{Event, EventId},
};

const DATE_CELL_FORMAT: &str = "%b %-d, %Y, %I:%M %p";
const MISSING_CELL: &str = "N/A";

/// One of the two dashboard tables plus its search box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTable {
    category: Category,
    query: String,
}

impl EventTable {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            query: String::new(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    /// The subset of `events` matching the current query, order preserved.
    pub fn visible<'a>(&self, events: &'a [Event]) -> Vec<&'a Event> {
        filter_events(events, &self.query)
    }

    pub fn empty_message(&self) -> &'static str {
        match self.category {
            Category::Active => "No active events found",
            Category::Archived => "No archived events found",
        }
    }

    /// Archived rows are read-only.
    pub fn allows_actions(&self) -> bool {
        self.category == Category::Active
    }

    pub fn rows(&self, events: &[Event]) -> Vec<TableRow> {
        self.visible(events)
            .into_iter()
            .map(|event| TableRow::new(event, self.allows_actions()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub id: EventId,
    pub name: String,
    pub description: String,
    pub start: String,
    pub end: String,
    pub location: String,
    pub attendees: String,
    pub actions: bool,
}

impl TableRow {
    fn new(event: &Event, actions: bool) -> Self {
        Self {
            id: event.id,
            name: event.name().to_string(),
            description: event.description().to_string(),
            start: format_date_cell(Some(event.start_date())),
            end: format_date_cell(Some(event.end_date())),
            location: event.location().to_string(),
            attendees: format_attendees(event.draft.min_attendees, event.draft.max_attendees),
            actions,
        }
    }
}

pub fn format_date_cell(value: Option<NaiveDateTime>) -> String {
    match value {
        Some(value) => value.format(DATE_CELL_FORMAT).to_string(),
        None => MISSING_CELL.to_string(),
    }
}

/// A missing or zero maximum means "no limit".
pub fn format_attendees(min: Option<u32>, max: Option<u32>) -> String {
    let max = max
        .filter(|&max| max > 0)
        .map_or_else(|| "∞".to_string(), |max| max.to_string());
    format!("{} - {max}", min.unwrap_or(0))
}

#[cfg(test)]
#[path = "tests/table_tests.rs"]
mod tests;
