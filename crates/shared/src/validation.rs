//! Form validation for event drafts.
//!
//! Every rule runs on every call; the result lists all violations at once,
//! keyed by the form field (or cross-field group) they belong to.

use std::{collections::BTreeMap, fmt};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{EventDraft, EventForm},
    protocol::parse_date_time,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Name,
    Description,
    StartDate,
    EndDate,
    Location,
    MinAttendees,
    MaxAttendees,
    Dates,
    Attendees,
}

impl FormField {
    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Description => "description",
            FormField::StartDate => "startDate",
            FormField::EndDate => "endDate",
            FormField::Location => "location",
            FormField::MinAttendees => "minAttendees",
            FormField::MaxAttendees => "maxAttendees",
            FormField::Dates => "dates",
            FormField::Attendees => "attendees",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<FormField, String>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.errors.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    pub fn summary(&self) -> String {
        self.errors.values().cloned().collect::<Vec<_>>().join("; ")
    }

    fn insert(&mut self, field: FormField, message: &str) {
        self.errors.insert(field, message.to_string());
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Checks a raw form. An empty map means the form can be submitted.
pub fn validate_form(form: &EventForm) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if form.name.trim().is_empty() {
        errors.insert(FormField::Name, "Event name is required");
    }
    if form.description.trim().is_empty() {
        errors.insert(FormField::Description, "Description is required");
    }
    let start = required_date_time(
        &form.start_date,
        FormField::StartDate,
        "Start date is required",
        "Start date must be a valid date and time",
        &mut errors,
    );
    let end = required_date_time(
        &form.end_date,
        FormField::EndDate,
        "End date is required",
        "End date must be a valid date and time",
        &mut errors,
    );
    if form.location.trim().is_empty() {
        errors.insert(FormField::Location, "Location is required");
    }

    if let (Some(start), Some(end)) = (start, end) {
        check_date_order(start, end, &mut errors);
    }

    let min = optional_count(
        &form.min_attendees,
        FormField::MinAttendees,
        "Minimum attendees must be a whole number",
        &mut errors,
    );
    let max = optional_count(
        &form.max_attendees,
        FormField::MaxAttendees,
        "Maximum attendees must be a whole number",
        &mut errors,
    );
    if let (Some(min), Some(max)) = (min, max) {
        check_attendee_bounds(min, max, &mut errors);
    }

    errors
}

/// Checks an already-typed draft with the same rules the form applies.
pub fn validate_draft(draft: &EventDraft) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if draft.name.trim().is_empty() {
        errors.insert(FormField::Name, "Event name is required");
    }
    if draft.description.trim().is_empty() {
        errors.insert(FormField::Description, "Description is required");
    }
    if draft.location.trim().is_empty() {
        errors.insert(FormField::Location, "Location is required");
    }
    check_date_order(draft.start_date, draft.end_date, &mut errors);
    if let (Some(min), Some(max)) = (draft.min_attendees, draft.max_attendees) {
        check_attendee_bounds(min, max, &mut errors);
    }
    errors.into_result()
}

impl EventForm {
    /// Validates the form and converts it into a typed draft.
    pub fn into_draft(self) -> Result<EventDraft, ValidationErrors> {
        let errors = validate_form(&self);
        let (Some(start_date), Some(end_date)) = (
            parse_date_time(&self.start_date),
            parse_date_time(&self.end_date),
        ) else {
            return Err(errors);
        };
        errors.into_result()?;

        Ok(EventDraft {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            start_date,
            end_date,
            location: self.location.trim().to_string(),
            min_attendees: parse_count(&self.min_attendees),
            max_attendees: parse_count(&self.max_attendees),
            location_notes: non_blank(self.location_notes),
            preparation_notes: non_blank(self.preparation_notes),
        })
    }
}

fn required_date_time(
    raw: &str,
    field: FormField,
    missing: &str,
    malformed: &str,
    errors: &mut ValidationErrors,
) -> Option<NaiveDateTime> {
    if raw.trim().is_empty() {
        errors.insert(field, missing);
        return None;
    }
    let parsed = parse_date_time(raw);
    if parsed.is_none() {
        errors.insert(field, malformed);
    }
    parsed
}

fn optional_count(
    raw: &str,
    field: FormField,
    malformed: &str,
    errors: &mut ValidationErrors,
) -> Option<u32> {
    if raw.trim().is_empty() {
        return None;
    }
    let parsed = parse_count(raw);
    if parsed.is_none() {
        errors.insert(field, malformed);
    }
    parsed
}

fn check_date_order(start: NaiveDateTime, end: NaiveDateTime, errors: &mut ValidationErrors) {
    if start >= end {
        errors.insert(FormField::Dates, "Start date must be before end date");
    }
}

fn check_attendee_bounds(min: u32, max: u32, errors: &mut ValidationErrors) {
    if min > max {
        errors.insert(FormField::Attendees, "Minimum attendees cannot exceed maximum");
    }
}

fn parse_count(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}

fn non_blank(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
