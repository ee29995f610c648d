//! Categorization and search over loaded events.

use chrono::NaiveDateTime;

use crate::domain::Event;

/// Which bucket an event falls into at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Active,
    Archived,
}

impl Category {
    pub fn of(event: &Event, now: NaiveDateTime) -> Self {
        if event.end_date() < now {
            Category::Archived
        } else {
            Category::Active
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Active => "active",
            Category::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorizedEvents {
    /// Soonest start first.
    pub active: Vec<Event>,
    /// Most recently ended first.
    pub archived: Vec<Event>,
}

impl CategorizedEvents {
    pub fn get(&self, category: Category) -> &[Event] {
        match category {
            Category::Active => &self.active,
            Category::Archived => &self.archived,
        }
    }

    pub fn len(&self) -> usize {
        self.active.len() + self.archived.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.archived.is_empty()
    }
}

/// Splits `events` around `now` and orders each bucket for display.
pub fn categorize(events: Vec<Event>, now: NaiveDateTime) -> CategorizedEvents {
    let (mut active, mut archived): (Vec<_>, Vec<_>) = events
        .into_iter()
        .partition(|event| Category::of(event, now) == Category::Active);

    active.sort_unstable_by_key(Event::start_date);
    archived.sort_unstable_by(|a, b| b.end_date().cmp(&a.end_date()));

    CategorizedEvents { active, archived }
}

/// Case-insensitive substring match on name, description and location.
/// An empty query keeps every event.
pub fn filter_events<'a>(events: &'a [Event], query: &str) -> Vec<&'a Event> {
    if query.is_empty() {
        return events.iter().collect();
    }
    let needle = query.to_lowercase();
    events
        .iter()
        .filter(|event| matches_query(event, &needle))
        .collect()
}

fn matches_query(event: &Event, needle: &str) -> bool {
    [event.name(), event.description(), event.location()]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
