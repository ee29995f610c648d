use super::*;

fn complete_form() -> EventForm {
    EventForm {
        name: "Alpha Conference".into(),
        description: "Two days of talks".into(),
        start_date: "2024-06-01T10:00".into(),
        end_date: "2024-06-02T10:00".into(),
        location: "Hall A".into(),
        min_attendees: "10".into(),
        max_attendees: "50".into(),
        location_notes: String::new(),
        preparation_notes: String::new(),
    }
}

#[test]
fn consistent_form_has_no_errors() {
    assert!(validate_form(&complete_form()).is_empty());
}

#[test]
fn reversed_dates_are_reported_under_dates() {
    let form = EventForm {
        start_date: "2024-06-02T10:00".into(),
        end_date: "2024-06-01T10:00".into(),
        ..complete_form()
    };
    let errors = validate_form(&form);
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.get(FormField::Dates),
        Some("Start date must be before end date")
    );
}

#[test]
fn equal_dates_are_rejected() {
    let form = EventForm {
        end_date: "2024-06-01T10:00".into(),
        ..complete_form()
    };
    assert!(validate_form(&form).contains(FormField::Dates));
}

#[test]
fn min_above_max_is_reported_under_attendees() {
    let form = EventForm {
        min_attendees: "50".into(),
        max_attendees: "10".into(),
        ..complete_form()
    };
    let errors = validate_form(&form);
    assert_eq!(
        errors.get(FormField::Attendees),
        Some("Minimum attendees cannot exceed maximum")
    );
}

#[test]
fn one_sided_attendee_bound_is_fine() {
    let form = EventForm {
        min_attendees: "500".into(),
        max_attendees: String::new(),
        ..complete_form()
    };
    assert!(validate_form(&form).is_empty());
}

#[test]
fn empty_form_reports_every_required_field() {
    let errors = validate_form(&EventForm::default());
    let fields: Vec<_> = errors.iter().map(|(field, _)| field).collect();
    assert_eq!(
        fields,
        vec![
            FormField::Name,
            FormField::Description,
            FormField::StartDate,
            FormField::EndDate,
            FormField::Location,
        ]
    );
    assert_eq!(errors.get(FormField::Name), Some("Event name is required"));
}

#[test]
fn blank_text_counts_as_missing() {
    let form = EventForm {
        name: "   ".into(),
        location: "\t".into(),
        ..complete_form()
    };
    let errors = validate_form(&form);
    assert!(errors.contains(FormField::Name));
    assert!(errors.contains(FormField::Location));
    assert!(!errors.contains(FormField::Description));
}

#[test]
fn all_violations_are_reported_together() {
    let form = EventForm {
        name: String::new(),
        start_date: "2024-06-02T10:00".into(),
        end_date: "2024-06-01T10:00".into(),
        min_attendees: "50".into(),
        max_attendees: "10".into(),
        ..complete_form()
    };
    let errors = validate_form(&form);
    assert!(errors.contains(FormField::Name));
    assert!(errors.contains(FormField::Dates));
    assert!(errors.contains(FormField::Attendees));
}

#[test]
fn malformed_values_are_reported_per_field() {
    let form = EventForm {
        start_date: "tomorrow".into(),
        max_attendees: "-3".into(),
        ..complete_form()
    };
    let errors = validate_form(&form);
    assert!(errors.contains(FormField::StartDate));
    assert!(errors.contains(FormField::MaxAttendees));
    assert!(!errors.contains(FormField::Dates));
    assert!(!errors.contains(FormField::Attendees));
}

#[test]
fn validation_is_deterministic() {
    let form = EventForm::default();
    assert_eq!(validate_form(&form), validate_form(&form));
}

#[test]
fn into_draft_trims_text_and_drops_blank_notes() {
    let form = EventForm {
        name: "  Alpha Conference ".into(),
        location_notes: "   ".into(),
        preparation_notes: " Print agendas ".into(),
        ..complete_form()
    };
    let draft = form.into_draft().expect("valid");
    assert_eq!(draft.name, "Alpha Conference");
    assert_eq!(draft.min_attendees, Some(10));
    assert_eq!(draft.max_attendees, Some(50));
    assert_eq!(draft.location_notes, None);
    assert_eq!(draft.preparation_notes.as_deref(), Some("Print agendas"));
}

#[test]
fn into_draft_returns_errors_for_invalid_form() {
    let errors = EventForm::default().into_draft().expect_err("invalid");
    assert!(errors.contains(FormField::StartDate));
}

#[test]
fn validate_draft_applies_cross_field_rules() {
    let mut draft = complete_form().into_draft().expect("valid");
    assert!(validate_draft(&draft).is_ok());

    std::mem::swap(&mut draft.start_date, &mut draft.end_date);
    draft.min_attendees = Some(100);
    let errors = validate_draft(&draft).expect_err("invalid");
    assert!(errors.contains(FormField::Dates));
    assert!(errors.contains(FormField::Attendees));
}

#[test]
fn errors_serialize_as_field_keyed_map() {
    let errors = validate_form(&EventForm {
        name: String::new(),
        ..complete_form()
    });
    let value = serde_json::to_value(&errors).expect("json");
    assert_eq!(value, serde_json::json!({ "name": "Event name is required" }));
}
