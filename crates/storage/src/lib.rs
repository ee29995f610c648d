use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;
use uuid::Uuid;

use shared::domain::{Event, EventDraft, EventId};

const EVENT_COLUMNS: &str = "id, name, description, start_date, end_date, location, \
     min_attendees, max_attendees, location_notes, preparation_notes";

/// Another event already uses this name, compared without regard to case.
#[derive(Debug, Error)]
#[error("an event named '{name}' already exists")]
pub struct NameTaken {
    pub name: String,
}

/// Uniqueness key for event names. Full Unicode lowercasing, so `CAFÉ` and
/// `café` collide.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Every in-memory connection is its own database, so keep exactly one alive.
        let pool_options = if database_url.starts_with("sqlite::memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(connect_options).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// All events in insertion order.
    pub async fn list_events(&self) -> Result<Vec<Event>> {
        let rows = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at, rowid"
        ))
        .fetch_all(&self.pool)
        .await
        .context("failed to list events")?;
        rows.iter().map(event_from_row).collect()
    }

    pub async fn get_event(&self, id: EventId) -> Result<Option<Event>> {
        let row = sqlx::query(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?"))
            .bind(id.0.to_string())
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to load event {id}"))?;
        row.as_ref().map(event_from_row).transpose()
    }

    pub async fn find_event_by_name_ignore_case(&self, name: &str) -> Result<Option<Event>> {
        let row = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE name_key = ? LIMIT 1"
        ))
        .bind(name_key(name))
        .fetch_optional(&self.pool)
        .await
        .context("failed to look up event by name")?;
        row.as_ref().map(event_from_row).transpose()
    }

    /// Fails with [`NameTaken`] when the name collides with a stored event.
    pub async fn insert_event(&self, draft: &EventDraft) -> Result<Event> {
        let id = EventId::new_v4();
        sqlx::query(
            "INSERT INTO events (id, name, name_key, description, start_date, end_date, location,
                                 min_attendees, max_attendees, location_notes, preparation_notes)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.0.to_string())
        .bind(&draft.name)
        .bind(name_key(&draft.name))
        .bind(&draft.description)
        .bind(draft.start_date)
        .bind(draft.end_date)
        .bind(&draft.location)
        .bind(draft.min_attendees.map(i64::from))
        .bind(draft.max_attendees.map(i64::from))
        .bind(draft.location_notes.as_deref())
        .bind(draft.preparation_notes.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|error| write_error(error, draft, "failed to insert event".into()))?;
        Ok(Event::new(id, draft.clone()))
    }

    /// Replaces every column of an existing event. `None` when the id is
    /// unknown, [`NameTaken`] when renaming onto another event's name.
    pub async fn update_event(&self, id: EventId, draft: &EventDraft) -> Result<Option<Event>> {
        let result = sqlx::query(
            "UPDATE events
             SET name = ?, name_key = ?, description = ?, start_date = ?, end_date = ?, location = ?,
                 min_attendees = ?, max_attendees = ?, location_notes = ?, preparation_notes = ?,
                 updated_at = CURRENT_TIMESTAMP
             WHERE id = ?",
        )
        .bind(&draft.name)
        .bind(name_key(&draft.name))
        .bind(&draft.description)
        .bind(draft.start_date)
        .bind(draft.end_date)
        .bind(&draft.location)
        .bind(draft.min_attendees.map(i64::from))
        .bind(draft.max_attendees.map(i64::from))
        .bind(draft.location_notes.as_deref())
        .bind(draft.preparation_notes.as_deref())
        .bind(id.0.to_string())
        .execute(&self.pool)
        .await
        .map_err(|error| write_error(error, draft, format!("failed to update event {id}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(Event::new(id, draft.clone())))
    }

    /// Returns whether a row was removed.
    pub async fn delete_event(&self, id: EventId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id.0.to_string())
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete event {id}"))?;
        Ok(result.rows_affected() > 0)
    }
}

fn write_error(error: sqlx::Error, draft: &EventDraft, context: String) -> anyhow::Error {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => NameTaken {
            name: draft.name.clone(),
        }
        .into(),
        _ => anyhow::Error::new(error).context(context),
    }
}

fn event_from_row(row: &SqliteRow) -> Result<Event> {
    let raw_id: String = row.try_get("id")?;
    let id = Uuid::parse_str(&raw_id)
        .with_context(|| format!("stored event id '{raw_id}' is not a uuid"))?;

    Ok(Event::new(
        EventId(id),
        EventDraft {
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            start_date: row.try_get::<NaiveDateTime, _>("start_date")?,
            end_date: row.try_get::<NaiveDateTime, _>("end_date")?,
            location: row.try_get("location")?,
            min_attendees: attendee_count(row, "min_attendees")?,
            max_attendees: attendee_count(row, "max_attendees")?,
            location_notes: row.try_get("location_notes")?,
            preparation_notes: row.try_get("preparation_notes")?,
        },
    ))
}

fn attendee_count(row: &SqliteRow, column: &str) -> Result<Option<u32>> {
    let value: Option<i64> = row.try_get(column)?;
    value
        .map(|v| u32::try_from(v).with_context(|| format!("{column} out of range: {v}")))
        .transpose()
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
