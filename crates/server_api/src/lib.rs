use shared::{
    domain::{Event, EventDraft, EventId},
    error::{ApiError, ErrorCode},
    validation::validate_draft,
};
use storage::{NameTaken, Storage};
use tracing::{info, warn};

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub async fn list_events(ctx: &ApiContext) -> Result<Vec<Event>, ApiError> {
    ctx.storage.list_events().await.map_err(internal)
}

pub async fn get_event(ctx: &ApiContext, id: EventId) -> Result<Event, ApiError> {
    ctx.storage
        .get_event(id)
        .await
        .map_err(internal)?
        .ok_or_else(|| event_not_found(id))
}

pub async fn create_event(ctx: &ApiContext, draft: EventDraft) -> Result<Event, ApiError> {
    validate_draft(&draft)?;

    if ctx
        .storage
        .find_event_by_name_ignore_case(&draft.name)
        .await
        .map_err(internal)?
        .is_some()
    {
        warn!(name = %draft.name, "rejecting event with duplicate name");
        return Err(ApiError::duplicate_name());
    }

    // The lookup above gives the common case a clean answer; the unique
    // name_key column settles concurrent creates.
    let event = ctx
        .storage
        .insert_event(&draft)
        .await
        .map_err(write_failure)?;
    info!(event_id = %event.id, name = %event.name(), "event created");
    Ok(event)
}

pub async fn update_event(
    ctx: &ApiContext,
    id: EventId,
    draft: EventDraft,
) -> Result<Event, ApiError> {
    get_event(ctx, id).await?;
    validate_draft(&draft)?;

    let clash = ctx
        .storage
        .find_event_by_name_ignore_case(&draft.name)
        .await
        .map_err(internal)?;
    if clash.is_some_and(|other| other.id != id) {
        warn!(event_id = %id, name = %draft.name, "rejecting rename onto existing name");
        return Err(ApiError::duplicate_name());
    }

    let event = ctx
        .storage
        .update_event(id, &draft)
        .await
        .map_err(write_failure)?
        .ok_or_else(|| event_not_found(id))?;
    info!(event_id = %id, "event updated");
    Ok(event)
}

pub async fn delete_event(ctx: &ApiContext, id: EventId) -> Result<(), ApiError> {
    if !ctx.storage.delete_event(id).await.map_err(internal)? {
        return Err(event_not_found(id));
    }
    info!(event_id = %id, "event deleted");
    Ok(())
}

fn event_not_found(id: EventId) -> ApiError {
    ApiError::not_found(format!("event {id} not found"))
}

fn write_failure(err: anyhow::Error) -> ApiError {
    match err.downcast_ref::<NameTaken>() {
        Some(taken) => {
            warn!(name = %taken.name, "name claimed by a concurrent write");
            ApiError::duplicate_name()
        }
        None => internal(err),
    }
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, err.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
