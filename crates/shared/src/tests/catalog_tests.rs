use super::*;
use crate::domain::{EventDraft, EventId};
use chrono::{Duration, NaiveDate};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 15)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("now")
}

fn event(name: &str, start_offset_h: i64, end_offset_h: i64) -> Event {
    Event::new(
        EventId::new_v4(),
        EventDraft {
            name: name.to_string(),
            description: format!("{name} description"),
            start_date: now() + Duration::hours(start_offset_h),
            end_date: now() + Duration::hours(end_offset_h),
            location: "Main Hall".into(),
            min_attendees: None,
            max_attendees: None,
            location_notes: None,
            preparation_notes: None,
        },
    )
}

#[test]
fn empty_input_yields_two_empty_buckets() {
    let categorized = categorize(Vec::new(), now());
    assert!(categorized.active.is_empty());
    assert!(categorized.archived.is_empty());
}

#[test]
fn past_event_is_archived_and_future_event_is_active() {
    let past = event("past", -48, -24);
    let future = event("future", 24, 48);
    let categorized = categorize(vec![past.clone(), future.clone()], now());
    assert_eq!(categorized.active, vec![future]);
    assert_eq!(categorized.archived, vec![past]);
}

#[test]
fn event_ending_exactly_now_is_still_active() {
    let boundary = event("boundary", -2, 0);
    let categorized = categorize(vec![boundary.clone()], now());
    assert_eq!(categorized.active, vec![boundary]);
}

#[test]
fn running_event_is_active() {
    let running = event("running", -1, 1);
    assert_eq!(Category::of(&running, now()), Category::Active);
}

#[test]
fn partition_keeps_every_event_exactly_once() {
    let events: Vec<_> = (0..20)
        .map(|i| {
            let end = (i * 7 % 13) - 6;
            event(&format!("e{i}"), end - 3, end)
        })
        .collect();
    let categorized = categorize(events.clone(), now());
    assert_eq!(categorized.len(), events.len());

    for original in &events {
        let in_active = categorized.active.iter().filter(|e| e.id == original.id).count();
        let in_archived = categorized.archived.iter().filter(|e| e.id == original.id).count();
        assert_eq!(in_active + in_archived, 1, "{} misplaced", original.name());
        let expected = Category::of(original, now());
        assert_eq!(in_active == 1, expected == Category::Active);
    }
}

#[test]
fn active_is_sorted_by_start_and_archived_by_end_descending() {
    let events = vec![
        event("later", 30, 40),
        event("soon", 2, 50),
        event("ended-long-ago", -100, -90),
        event("ended-recently", -20, -1),
        event("ended-midway", -60, -30),
        event("middle", 10, 11),
    ];
    let categorized = categorize(events, now());

    let active: Vec<_> = categorized.active.iter().map(Event::name).collect();
    assert_eq!(active, vec!["soon", "middle", "later"]);
    assert!(categorized
        .active
        .windows(2)
        .all(|pair| pair[0].start_date() <= pair[1].start_date()));

    let archived: Vec<_> = categorized.archived.iter().map(Event::name).collect();
    assert_eq!(archived, vec!["ended-recently", "ended-midway", "ended-long-ago"]);
    assert!(categorized
        .archived
        .windows(2)
        .all(|pair| pair[0].end_date() >= pair[1].end_date()));
}

#[test]
fn empty_query_is_identity() {
    let events = vec![event("a", 1, 2), event("b", 3, 4)];
    let filtered: Vec<Event> = filter_events(&events, "").into_iter().cloned().collect();
    assert_eq!(filtered, events);
}

#[test]
fn query_is_case_insensitive() {
    let events = vec![event("alpha conference", 1, 2), event("beta meetup", 3, 4)];
    let filtered = filter_events(&events, "ALPHA");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name(), "alpha conference");
}

#[test]
fn query_matches_description_and_location() {
    let mut by_location = event("one", 1, 2);
    by_location.draft.location = "Berlin Office".into();
    let mut by_description = event("two", 1, 2);
    by_description.draft.description = "Quarterly planning in berlin".into();
    let other = event("three", 1, 2);

    let events = vec![by_location, by_description, other];
    let names: Vec<_> = filter_events(&events, "Berlin")
        .into_iter()
        .map(Event::name)
        .collect();
    assert_eq!(names, vec!["one", "two"]);
}

#[test]
fn unmatched_query_yields_nothing() {
    let events = vec![event("one", 1, 2)];
    assert!(filter_events(&events, "zzz").is_empty());
}
