use std::path::Path;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EventRecord, EventStore};
use crate::error::ServiceResult;

/// ## Summary
/// In-process event store, optionally seeded from a JSON file at startup.
///
/// Clones share the same underlying records.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventStore {
    events: Arc<RwLock<Vec<EventRecord>>>,
}

impl MemoryEventStore {
    #[must_use]
    pub fn new(events: Vec<EventRecord>) -> Self {
        Self {
            events: Arc::new(RwLock::new(events)),
        }
    }

    /// ## Summary
    /// Loads a JSON array of event records.
    ///
    /// Frequency tags are not validated here; a record with an unknown tag
    /// is reported when the listing computes its occurrences.
    ///
    /// ## Errors
    /// Returns an error if the file cannot be read or is not a JSON array of records.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub async fn from_seed_file(path: impl AsRef<Path>) -> ServiceResult<Self> {
        let raw = tokio::fs::read(path.as_ref()).await?;
        let events: Vec<EventRecord> = serde_json::from_slice(&raw)?;

        tracing::info!(count = events.len(), "Loaded event seed file");

        Ok(Self::new(events))
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

impl EventStore for MemoryEventStore {
    fn list_active(&self) -> BoxFuture<'_, ServiceResult<Vec<EventRecord>>> {
        Box::pin(async move {
            let events = self.events.read().await;
            Ok(events.iter().filter(|event| event.active).cloned().collect())
        })
    }

    fn get(&self, id: Uuid) -> BoxFuture<'_, ServiceResult<Option<EventRecord>>> {
        Box::pin(async move {
            let events = self.events.read().await;
            Ok(events.iter().find(|event| event.id == id).cloned())
        })
    }
}
