use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use server_api::{create_event, delete_event, get_event, list_events, update_event, ApiContext};
use shared::{
    domain::{Event, EventDraft, EventId},
    error::{ApiError, ErrorCode},
    protocol::{events_item_route, EVENTS_ROUTE},
};
use storage::Storage;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod cors;

use app_state::AppState;
use config::{load_settings, prepare_database_url};
use cors::create_cors_layer;

const MAX_BODY_BYTES: usize = 64 * 1024;

type HttpError = (StatusCode, Json<ApiError>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url);
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(
        Arc::new(state),
        create_cors_layer(&settings.cors_allowed_origins),
    );

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(%error, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}

fn build_router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(EVENTS_ROUTE, get(http_list_events).post(http_create_event))
        .route(
            &events_item_route(":event_id"),
            get(http_get_event)
                .put(http_update_event)
                .delete(http_delete_event),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, HttpError> {
    state.api.storage.health_check().await.map_err(|e| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new(ErrorCode::Internal, e.to_string())),
        )
    })?;
    Ok("ok")
}

async fn http_list_events(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Event>>, HttpError> {
    let events = list_events(&state.api).await.map_err(http_error)?;
    Ok(Json(events))
}

async fn http_get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<Json<Event>, HttpError> {
    let event = get_event(&state.api, parse_event_id(&event_id)?)
        .await
        .map_err(http_error)?;
    Ok(Json(event))
}

async fn http_create_event(
    State(state): State<Arc<AppState>>,
    body: Result<Json<EventDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Event>), HttpError> {
    let Json(draft) = body.map_err(invalid_body)?;
    let event = create_event(&state.api, draft).await.map_err(http_error)?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn http_update_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    body: Result<Json<EventDraft>, JsonRejection>,
) -> Result<Json<Event>, HttpError> {
    let id = parse_event_id(&event_id)?;
    let Json(draft) = body.map_err(invalid_body)?;
    let event = update_event(&state.api, id, draft)
        .await
        .map_err(http_error)?;
    Ok(Json(event))
}

async fn http_delete_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<StatusCode, HttpError> {
    delete_event(&state.api, parse_event_id(&event_id)?)
        .await
        .map_err(http_error)?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_event_id(raw: &str) -> Result<EventId, HttpError> {
    raw.parse().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(
                ErrorCode::Validation,
                format!("invalid event id '{raw}'"),
            )),
        )
    })
}

fn invalid_body(rejection: JsonRejection) -> HttpError {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError::new(ErrorCode::Validation, rejection.body_text())),
    )
}

fn http_error(err: ApiError) -> HttpError {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::Internal => {
            error!(message = %err.message, "internal error while serving events");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
