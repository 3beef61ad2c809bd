use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::attachment::Attachment;
use crate::model::item::{Item, ItemId, ItemKind};

/// Error type for trash submission. Recoverable: the caller keeps the
/// item and may retry the delete action.
#[derive(Debug, thiserror::Error)]
pub enum TrashError {
    #[error("trash service rejected the record (status {status})")]
    Rejected { status: u16 },
    #[error("trash service unreachable: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for TrashError {
    fn from(e: reqwest::Error) -> Self {
        TrashError::Transport(e.to_string())
    }
}

/// The create-record request sent to the external trash store.
/// Field names follow the service's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashRecord {
    pub item_type: ItemKind,
    pub item_id: ItemId,
    pub title: String,
    pub description: String,
    pub metadata: TrashMetadata,
    /// Full item snapshot for restore-from-trash on the service side
    pub original_data: Item,
    pub deleted_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashMetadata {
    pub attachments: Vec<Attachment>,
    pub completed: bool,
    /// Display label at deletion time, e.g. `Today at 2:15 pm`
    pub recency_signal: String,
}

impl TrashRecord {
    pub fn new(item: &Item, recency_signal: String, deleted_by: &str) -> Self {
        TrashRecord {
            item_type: item.kind,
            item_id: item.id.clone(),
            title: item.title(),
            description: item.content.clone(),
            metadata: TrashMetadata {
                attachments: item.attachments.clone(),
                completed: item.completed,
                recency_signal,
            },
            original_data: item.clone(),
            deleted_by: deleted_by.to_string(),
        }
    }
}

/// The external trash collaborator. One submission per user action —
/// no retry, no backoff; retrying is the user's call.
#[async_trait]
pub trait TrashStore: Send + Sync {
    async fn submit(&self, record: TrashRecord) -> Result<(), TrashError>;
}

/// HTTP trash client: POSTs the record as JSON to the configured
/// endpoint, single attempt.
pub struct HttpTrash {
    client: reqwest::Client,
    url: String,
}

impl HttpTrash {
    pub fn new(url: impl Into<String>) -> Self {
        HttpTrash {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl TrashStore for HttpTrash {
    async fn submit(&self, record: TrashRecord) -> Result<(), TrashError> {
        let response = self.client.post(&self.url).json(&record).send().await?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("trash submission rejected: {} {}", status, record.item_id);
            return Err(TrashError::Rejected {
                status: status.as_u16(),
            });
        }
        log::debug!("trashed {} ({})", record.item_id, record.item_type.as_str());
        Ok(())
    }
}

/// In-memory trash store for tests and demo mode. Records every
/// accepted submission; can be switched into a failing state to
/// exercise the delete-failure path.
#[derive(Default)]
pub struct MemoryTrash {
    records: Mutex<Vec<TrashRecord>>,
    failing: Mutex<bool>,
}

impl MemoryTrash {
    pub fn new() -> Self {
        Self::default()
    }

    /// All submissions reject with a transport error until cleared.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn records(&self) -> Vec<TrashRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl TrashStore for MemoryTrash {
    async fn submit(&self, record: TrashRecord) -> Result<(), TrashError> {
        if *self.failing.lock().unwrap() {
            return Err(TrashError::Transport("trash store offline".into()));
        }
        self.records.lock().unwrap().push(record);
        Ok(())
    }
}
