//! Event Grid envelope types and the topic publisher.
//!
//! Outbound, [`EventGridEvent::new`] wraps a payload in a fresh envelope and an
//! [`EventPublisher`] posts batches of envelopes to a topic. Inbound, the
//! storage event processor classifies each pushed envelope through an
//! [`InboundEvent`] view.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::{timeout, Duration};
use uuid::Uuid;

use crate::{config::EventGridConfig, db::Document, error::AppError};

pub const BLOB_CREATED_EVENT_TYPE: &str = "Microsoft.Storage.BlobCreated";
pub const SUBSCRIPTION_VALIDATION_EVENT_TYPE: &str =
    "Microsoft.EventGrid.SubscriptionValidationEvent";

/// Header carrying the topic access key.
pub const SAS_KEY_HEADER: &str = "aeg-sas-key";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventGridEvent {
    pub id: String,
    pub subject: String,
    pub event_type: String,
    pub data_version: String,
    pub event_time: DateTime<Utc>,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_version: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionValidationResponse {
    pub validation_response: String,
}

/// What the storage event processor should do with one envelope.
#[derive(Debug, PartialEq)]
pub enum EventKind<'a> {
    SubscriptionValidation { validation_code: String },
    JsonBlobCreated(&'a Document),
    Ignored,
}

impl EventGridEvent {
    /// Wraps `data` in an envelope with a fresh UUID v4 id, stamped now.
    pub fn new(
        subject: impl Into<String>,
        event_type: impl Into<String>,
        data_version: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            subject: subject.into(),
            event_type: event_type.into(),
            data_version: data_version.into(),
            event_time: Utc::now(),
            data,
            topic: None,
            metadata_version: None,
        }
    }
}

static NO_DATA: Value = Value::Null;

/// Read-only view of one pushed envelope.
///
/// Only `subject`, `eventType` and `data` take part in classification, so
/// a missing or oddly typed field just reads as absent. Timestamps, versions
/// and ids are never validated.
#[derive(Debug, PartialEq)]
pub struct InboundEvent<'a> {
    pub id: Option<&'a str>,
    pub subject: &'a str,
    pub event_type: &'a str,
    pub data: &'a Value,
}

impl<'a> InboundEvent<'a> {
    pub fn from_object(envelope: &'a Document) -> Self {
        Self {
            id: text_field(envelope, "id"),
            subject: text_field(envelope, "subject").unwrap_or_default(),
            event_type: text_field(envelope, "eventType").unwrap_or_default(),
            data: envelope.get("data").unwrap_or(&NO_DATA),
        }
    }

    /// Classifies this envelope on its own, independent of the rest of its batch.
    pub fn kind(&self) -> EventKind<'a> {
        if let Some(code) = self.data.get("validationCode").and_then(Value::as_str) {
            return EventKind::SubscriptionValidation {
                validation_code: code.to_string(),
            };
        }

        if self.event_type != BLOB_CREATED_EVENT_TYPE || !is_json_subject(self.subject) {
            return EventKind::Ignored;
        }

        match self.data.as_object() {
            Some(document) => EventKind::JsonBlobCreated(document),
            None => {
                tracing::warn!(
                    event_id = self.id.unwrap_or("-"),
                    subject = self.subject,
                    "blob created event data is not a JSON object, skipping"
                );
                EventKind::Ignored
            }
        }
    }
}

fn text_field<'a>(envelope: &'a Document, field: &str) -> Option<&'a str> {
    envelope.get(field).and_then(Value::as_str)
}

fn is_json_subject(subject: &str) -> bool {
    subject.to_lowercase().ends_with(".json")
}

/// Publishes envelopes to an event bus topic.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, events: &[EventGridEvent]) -> Result<(), AppError>;
}

/// Publisher for an Event Grid custom topic.
pub struct EventGridClient {
    config: EventGridConfig,
    transport: ReqwestTopicTransport,
}

impl EventGridClient {
    pub fn new(config: EventGridConfig) -> Self {
        Self {
            config,
            transport: ReqwestTopicTransport::new(),
        }
    }
}

#[async_trait]
impl EventPublisher for EventGridClient {
    async fn publish(&self, events: &[EventGridEvent]) -> Result<(), AppError> {
        publish_with_transport(events, &self.config, &self.transport).await
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PublishErrorCode {
    TransportError,
    Timeout,
}

impl PublishErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            PublishErrorCode::TransportError => "transport_error",
            PublishErrorCode::Timeout => "timeout",
        }
    }
}

#[async_trait]
trait TopicTransport {
    async fn send(
        &self,
        endpoint: &str,
        key: &str,
        payload: String,
        request_timeout: Duration,
    ) -> Result<u16, PublishErrorCode>;
}

struct ReqwestTopicTransport {
    client: reqwest::Client,
}

impl ReqwestTopicTransport {
    fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TopicTransport for ReqwestTopicTransport {
    async fn send(
        &self,
        endpoint: &str,
        key: &str,
        payload: String,
        request_timeout: Duration,
    ) -> Result<u16, PublishErrorCode> {
        let request = self
            .client
            .post(endpoint)
            .header("content-type", "application/json")
            .header(SAS_KEY_HEADER, key)
            .body(payload);

        let response = match timeout(request_timeout, request.send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(error)) => {
                if error.is_timeout() {
                    return Err(PublishErrorCode::Timeout);
                }

                return Err(PublishErrorCode::TransportError);
            }
            Err(_) => return Err(PublishErrorCode::Timeout),
        };

        Ok(response.status().as_u16())
    }
}

async fn publish_with_transport<T: TopicTransport + Sync>(
    events: &[EventGridEvent],
    config: &EventGridConfig,
    transport: &T,
) -> Result<(), AppError> {
    let payload = serde_json::to_string(events)
        .map_err(|e| AppError::Internal(format!("Failed to serialize events: {e}")))?;

    match transport
        .send(&config.endpoint, &config.key, payload, config.timeout)
        .await
    {
        Ok(status) if StatusCode::from_u16(status).is_ok_and(|v| v.is_success()) => {
            tracing::info!(count = events.len(), "Published events successfully.");
            Ok(())
        }
        Ok(status) => Err(AppError::Internal(format!(
            "Event Grid publish rejected with status {status}"
        ))),
        Err(error) => Err(AppError::Internal(format!(
            "Event Grid publish failed: {}",
            error.as_str()
        ))),
    }
}

/// Keeps every published envelope in memory instead of sending it anywhere.
#[derive(Clone, Default)]
pub struct RecordingPublisher {
    published: Arc<RwLock<Vec<EventGridEvent>>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Result<Vec<EventGridEvent>, AppError> {
        let published = self
            .published
            .read()
            .map_err(|e| AppError::Internal(format!("Lock error: {e}")))?;
        Ok(published.clone())
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, events: &[EventGridEvent]) -> Result<(), AppError> {
        let mut published = self
            .published
            .write()
            .map_err(|e| AppError::Internal(format!("Lock error: {e}")))?;
        published.extend_from_slice(events);
        Ok(())
    }
}
