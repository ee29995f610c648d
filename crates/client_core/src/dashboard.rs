//! The dashboard view model: loaded events, the form/banner state machine and
//! the two searchable tables. Every change goes through a named transition.

use chrono::{Local, NaiveDateTime};
use shared::{
    catalog::{categorize, CategorizedEvents, Category},
    domain::{Event, EventForm, EventId},
    validation::ValidationErrors,
};
use tracing::{debug, info, warn};

use crate::{
    repository::EventRepository,
    table::{EventTable, TableRow},
};

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load events. Please try again.";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save event";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete event";
pub const CREATED_MESSAGE: &str = "Event created successfully!";
pub const UPDATED_MESSAGE: &str = "Event updated successfully!";
pub const DELETED_MESSAGE: &str = "Event deleted successfully!";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this event?";

/// Source of "now" for categorization.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time, matching how event times are entered.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Asks the user a yes/no question before a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Loading,
    /// `editing` is `None` for a new event.
    ShowingForm { editing: Option<Event> },
    Error { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved,
    Failed,
    /// Submit arrived while no form was open.
    NotEditing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Aborted,
    Failed,
}

pub struct Dashboard<R, C = SystemClock> {
    repository: R,
    clock: C,
    state: ViewState,
    success_message: Option<String>,
    events: CategorizedEvents,
    active_table: EventTable,
    archived_table: EventTable,
}

impl<R: EventRepository> Dashboard<R> {
    pub fn new(repository: R) -> Self {
        Self::with_clock(repository, SystemClock)
    }
}

impl<R: EventRepository, C: Clock> Dashboard<R, C> {
    /// Starts in `Loading`; the caller is expected to `load` next.
    pub fn with_clock(repository: R, clock: C) -> Self {
        Self {
            repository,
            clock,
            state: ViewState::Loading,
            success_message: None,
            events: CategorizedEvents::default(),
            active_table: EventTable::new(Category::Active),
            archived_table: EventTable::new(Category::Archived),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            ViewState::Error { message } => Some(message),
            _ => None,
        }
    }

    pub fn events(&self) -> &CategorizedEvents {
        &self.events
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn can_create(&self) -> bool {
        self.state != ViewState::Loading
    }

    pub async fn load(&mut self) {
        self.state = ViewState::Loading;
        match self.repository.list_events().await {
            Ok(events) => {
                self.events = categorize(events, self.clock.now());
                debug!(
                    active = self.events.active.len(),
                    archived = self.events.archived.len(),
                    "events loaded"
                );
                self.state = ViewState::Idle;
            }
            Err(error) => {
                warn!(%error, "loading events failed");
                self.state = ViewState::Error {
                    message: LOAD_FAILED_MESSAGE.to_string(),
                };
            }
        }
    }

    pub fn open_create_form(&mut self) {
        self.state = ViewState::ShowingForm { editing: None };
    }

    pub fn open_edit_form(&mut self, event: Event) {
        self.state = ViewState::ShowingForm {
            editing: Some(event),
        };
    }

    /// Initial form contents: the edited event, or blank for a new one.
    pub fn form_seed(&self) -> EventForm {
        match &self.state {
            ViewState::ShowingForm {
                editing: Some(event),
            } => EventForm::from(event),
            _ => EventForm::default(),
        }
    }

    pub fn cancel(&mut self) {
        if matches!(self.state, ViewState::ShowingForm { .. }) {
            self.state = ViewState::Idle;
        }
    }

    /// Validation failures leave the form open and come back as `Err` for
    /// inline display. Remote failures close the form behind an error banner.
    pub async fn submit(&mut self, form: EventForm) -> Result<SubmitOutcome, ValidationErrors> {
        let ViewState::ShowingForm { editing } = &self.state else {
            return Ok(SubmitOutcome::NotEditing);
        };
        let target = editing.as_ref().map(|event| event.id);
        let draft = form.into_draft()?;

        self.state = ViewState::Loading;
        let result = match target {
            Some(id) => self
                .repository
                .update_event(id, &draft)
                .await
                .map(|_| UPDATED_MESSAGE),
            None => self
                .repository
                .create_event(&draft)
                .await
                .map(|_| CREATED_MESSAGE),
        };

        match result {
            Ok(message) => {
                info!(name = %draft.name, "event saved");
                self.success_message = Some(message.to_string());
                self.load().await;
                Ok(SubmitOutcome::Saved)
            }
            Err(error) => {
                let message = error
                    .server_message()
                    .unwrap_or(SAVE_FAILED_MESSAGE)
                    .to_string();
                self.state = ViewState::Error { message };
                Ok(SubmitOutcome::Failed)
            }
        }
    }

    pub async fn delete(&mut self, id: EventId, confirm: &dyn Confirm) -> DeleteOutcome {
        if !confirm.confirm(DELETE_PROMPT) {
            debug!(event_id = %id, "delete declined");
            return DeleteOutcome::Aborted;
        }

        self.state = ViewState::Loading;
        match self.repository.delete_event(id).await {
            Ok(()) => {
                info!(event_id = %id, "event deleted");
                self.success_message = Some(DELETED_MESSAGE.to_string());
                self.load().await;
                DeleteOutcome::Deleted
            }
            Err(_) => {
                self.state = ViewState::Error {
                    message: DELETE_FAILED_MESSAGE.to_string(),
                };
                DeleteOutcome::Failed
            }
        }
    }

    /// Clears the success banner and leaves an error state.
    pub fn dismiss_message(&mut self) {
        self.success_message = None;
        if matches!(self.state, ViewState::Error { .. }) {
            self.state = ViewState::Idle;
        }
    }

    pub fn table(&self, category: Category) -> &EventTable {
        match category {
            Category::Active => &self.active_table,
            Category::Archived => &self.archived_table,
        }
    }

    fn table_mut(&mut self, category: Category) -> &mut EventTable {
        match category {
            Category::Active => &mut self.active_table,
            Category::Archived => &mut self.archived_table,
        }
    }

    pub fn set_query(&mut self, category: Category, query: impl Into<String>) {
        self.table_mut(category).set_query(query);
    }

    pub fn clear_query(&mut self, category: Category) {
        self.table_mut(category).clear_query();
    }

    pub fn visible(&self, category: Category) -> Vec<&Event> {
        self.table(category).visible(self.events.get(category))
    }

    pub fn rows(&self, category: Category) -> Vec<TableRow> {
        self.table(category).rows(self.events.get(category))
    }
}

#[cfg(test)]
#[path = "tests/dashboard_tests.rs"]
mod tests;
