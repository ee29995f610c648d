use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Event, EventDraft, EventId},
    error::ApiError,
};
use tracing::{debug, error};
use url::Url;

use crate::error::TransportError;

pub const DEFAULT_EVENTS_URL: &str = "http://localhost:8080/api/events";

/// Remote CRUD operations on the events resource. Each call is issued once;
/// failures come back unchanged.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn list_events(&self) -> Result<Vec<Event>, TransportError>;
    async fn get_event(&self, id: EventId) -> Result<Event, TransportError>;
    async fn create_event(&self, draft: &EventDraft) -> Result<Event, TransportError>;
    /// Full replacement of the stored event.
    async fn update_event(&self, id: EventId, draft: &EventDraft)
        -> Result<Event, TransportError>;
    async fn delete_event(&self, id: EventId) -> Result<(), TransportError>;
}

pub struct HttpEventRepository {
    http: Client,
    base_url: Url,
}

impl HttpEventRepository {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, TransportError> {
        let invalid = |reason: String| TransportError::InvalidEndpoint {
            url: base_url.to_string(),
            reason,
        };
        let mut parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(invalid("expected an http(s) URL".into()));
        }
        // `/api/events/` and `/api/events` name the same collection.
        if let Ok(mut segments) = parsed.path_segments_mut() {
            segments.pop_if_empty();
        }
        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn item_url(&self, id: EventId) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&id.to_string());
        }
        url
    }
}

#[async_trait]
impl EventRepository for HttpEventRepository {
    async fn list_events(&self) -> Result<Vec<Event>, TransportError> {
        let result = async {
            let response = self
                .http
                .get(self.base_url.clone())
                .send()
                .await
                .map_err(TransportError::Network)?;
            decode(ensure_success(response).await?).await
        }
        .await;
        log_failure("list_events", result)
    }

    async fn get_event(&self, id: EventId) -> Result<Event, TransportError> {
        let result = async {
            let response = self
                .http
                .get(self.item_url(id))
                .send()
                .await
                .map_err(TransportError::Network)?;
            decode(ensure_success(response).await?).await
        }
        .await;
        log_failure("get_event", result)
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<Event, TransportError> {
        let result = async {
            let response = self
                .http
                .post(self.base_url.clone())
                .json(draft)
                .send()
                .await
                .map_err(TransportError::Network)?;
            decode::<Event>(ensure_success(response).await?).await
        }
        .await;
        if let Ok(event) = &result {
            debug!(event_id = %event.id, "event created");
        }
        log_failure("create_event", result)
    }

    async fn update_event(
        &self,
        id: EventId,
        draft: &EventDraft,
    ) -> Result<Event, TransportError> {
        let result = async {
            let response = self
                .http
                .put(self.item_url(id))
                .json(draft)
                .send()
                .await
                .map_err(TransportError::Network)?;
            decode(ensure_success(response).await?).await
        }
        .await;
        log_failure("update_event", result)
    }

    async fn delete_event(&self, id: EventId) -> Result<(), TransportError> {
        let result = async {
            let response = self
                .http
                .delete(self.item_url(id))
                .send()
                .await
                .map_err(TransportError::Network)?;
            ensure_success(response).await.map(|_| ())
        }
        .await;
        log_failure("delete_event", result)
    }
}

async fn ensure_success(response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    // Error bodies are best effort; a missing or foreign body still yields the status.
    let message = response
        .bytes()
        .await
        .ok()
        .and_then(|body| serde_json::from_slice::<ApiError>(&body).ok())
        .map(|api_error| api_error.message);
    Err(TransportError::Status { status, message })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, TransportError> {
    let body = response.bytes().await.map_err(TransportError::Network)?;
    serde_json::from_slice(&body).map_err(TransportError::Decode)
}

fn log_failure<T>(
    operation: &'static str,
    result: Result<T, TransportError>,
) -> Result<T, TransportError> {
    if let Err(error) = &result {
        error!(operation, %error, "events request failed");
    }
    result
}

#[cfg(test)]
#[path = "tests/repository_tests.rs"]
mod tests;
