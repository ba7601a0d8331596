//! Event records, their storage seam and the upcoming-events listing.

pub mod listing;
pub mod store;

use chrono::{NaiveDate, NaiveDateTime};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chapel_core::error::CoreResult;
use chapel_core::types::RecurrenceRule;

use crate::error::ServiceResult;

pub use listing::{EventDetail, InvalidRulePolicy, UpcomingEvent, event_detail, list_upcoming};
pub use store::MemoryEventStore;

const fn default_active() -> bool {
    true
}

/// ## Summary
/// A scheduled event as kept by the admin panel.
///
/// `frequency` holds the raw stored tag; it is only validated when the
/// record's [`RecurrenceRule`] is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub base_date: NaiveDateTime,
    pub frequency: String,
    #[serde(default)]
    pub repeat_until: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl EventRecord {
    /// ## Summary
    /// Builds the recurrence rule stored on this record.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidRule` if the stored frequency tag is unknown.
    pub fn rule(&self) -> CoreResult<RecurrenceRule> {
        RecurrenceRule::from_tag(self.base_date, &self.frequency, self.repeat_until)
    }
}

/// ## Summary
/// Read access to stored events.
///
/// Implementations hand out owned records so callers never hold a lock
/// while computing occurrences.
pub trait EventStore: Send + Sync {
    /// All records flagged active by the admin panel.
    fn list_active(&self) -> BoxFuture<'_, ServiceResult<Vec<EventRecord>>>;

    /// A single record by id, whether or not it is active.
    fn get(&self, id: Uuid) -> BoxFuture<'_, ServiceResult<Option<EventRecord>>>;
}
