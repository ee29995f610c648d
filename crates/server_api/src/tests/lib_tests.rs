use super::*;
use chrono::NaiveDate;
use shared::validation::FormField;

async fn setup() -> ApiContext {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    ApiContext { storage }
}

fn draft(name: &str) -> EventDraft {
    EventDraft {
        name: name.to_string(),
        description: "Description".into(),
        start_date: NaiveDate::from_ymd_opt(2025, 12, 1)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .expect("start"),
        end_date: NaiveDate::from_ymd_opt(2025, 12, 2)
            .and_then(|d| d.and_hms_opt(17, 0, 0))
            .expect("end"),
        location: "Location".into(),
        min_attendees: None,
        max_attendees: None,
        location_notes: None,
        preparation_notes: None,
    }
}

#[tokio::test]
async fn create_rejects_duplicate_name_in_any_case() {
    let ctx = setup().await;
    create_event(&ctx, draft("Tech Conference")).await.expect("first");

    let err = create_event(&ctx, draft("TECH conference"))
        .await
        .expect_err("duplicate");
    assert_eq!(err.code, ErrorCode::Conflict);
    assert_eq!(err.message, "An event with this name already exists");
    assert_eq!(list_events(&ctx).await.expect("list").len(), 1);
}

#[tokio::test]
async fn create_rejects_start_after_end() {
    let ctx = setup().await;
    let mut reversed = draft("Backwards");
    std::mem::swap(&mut reversed.start_date, &mut reversed.end_date);

    let err = create_event(&ctx, reversed).await.expect_err("invalid");
    assert_eq!(err.code, ErrorCode::Validation);
    let fields = err.fields.expect("field errors");
    assert!(fields.contains(FormField::Dates));
}

#[tokio::test]
async fn update_keeps_own_name_in_different_case() {
    let ctx = setup().await;
    let created = create_event(&ctx, draft("Event Name")).await.expect("create");

    let mut changed = draft("EVENT NAME");
    changed.description = "Updated description".into();
    let updated = update_event(&ctx, created.id, changed).await.expect("update");
    assert_eq!(updated.name(), "EVENT NAME");
    assert_eq!(updated.description(), "Updated description");
}

#[tokio::test]
async fn update_rejects_rename_onto_other_event() {
    let ctx = setup().await;
    create_event(&ctx, draft("Existing Event")).await.expect("first");
    let second = create_event(&ctx, draft("Another Event")).await.expect("second");

    let err = update_event(&ctx, second.id, draft("existing event"))
        .await
        .expect_err("conflict");
    assert_eq!(err.code, ErrorCode::Conflict);

    let unchanged = get_event(&ctx, second.id).await.expect("get");
    assert_eq!(unchanged.name(), "Another Event");
}

#[tokio::test]
async fn missing_events_report_not_found() {
    let ctx = setup().await;
    let id = EventId::new_v4();

    assert_eq!(get_event(&ctx, id).await.expect_err("get").code, ErrorCode::NotFound);
    assert_eq!(
        update_event(&ctx, id, draft("x")).await.expect_err("update").code,
        ErrorCode::NotFound
    );
    assert_eq!(delete_event(&ctx, id).await.expect_err("delete").code, ErrorCode::NotFound);
}

#[tokio::test]
async fn delete_removes_event() {
    let ctx = setup().await;
    let created = create_event(&ctx, draft("Doomed")).await.expect("create");
    delete_event(&ctx, created.id).await.expect("delete");
    assert!(list_events(&ctx).await.expect("list").is_empty());
}

#[tokio::test]
async fn create_rejects_non_ascii_name_in_other_case() {
    let ctx = setup().await;
    create_event(&ctx, draft("Café Night")).await.expect("first");

    let err = create_event(&ctx, draft("CAFÉ NIGHT"))
        .await
        .expect_err("duplicate");
    assert_eq!(err.code, ErrorCode::Conflict);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_with_same_name_store_one_event() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("event_tracker_api_race_{suffix}"));
    let db_path = temp_root.join("events.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));
    let ctx = ApiContext {
        storage: Storage::new(&database_url).await.expect("db"),
    };

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let ctx = ctx.clone();
            tokio::spawn(async move { create_event(&ctx, draft("Race")).await })
        })
        .collect();

    let mut created = 0;
    for task in tasks {
        match task.await.expect("join") {
            Ok(_) => created += 1,
            Err(err) => assert_eq!(err.code, ErrorCode::Conflict, "{}", err.message),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(list_events(&ctx).await.expect("list").len(), 1);

    drop(ctx);
    std::fs::remove_dir_all(temp_root).expect("cleanup");
}
