//! Upcoming-events listing for the public schedule page.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::Serialize;
use uuid::Uuid;

use chapel_core::types::Frequency;
use chapel_core::util::slug::generate_slug;

use super::{EventRecord, EventStore};
use crate::clock::ScheduleClock;
use crate::error::{ServiceError, ServiceResult};
use crate::recurrence::{describe_frequency, next_occurrence, upcoming_occurrences};

/// What the listing does with a record whose frequency tag is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidRulePolicy {
    /// Fail the whole listing.
    #[default]
    Fail,
    /// Log the record and leave it out.
    Skip,
}

impl InvalidRulePolicy {
    #[must_use]
    pub const fn from_skip_flag(skip_invalid_rules: bool) -> Self {
        if skip_invalid_rules {
            Self::Skip
        } else {
            Self::Fail
        }
    }
}

/// ## Summary
/// One entry of the upcoming-events listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingEvent {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub occurrence_date: DateTime<FixedOffset>,
    pub base_date: NaiveDateTime,
    pub frequency: Frequency,
    pub frequency_label: &'static str,
    pub repeat_until: Option<NaiveDate>,
}

impl UpcomingEvent {
    fn new(
        record: EventRecord,
        frequency: Frequency,
        occurrence: NaiveDateTime,
        clock: &ScheduleClock,
    ) -> Self {
        Self {
            id: record.id,
            slug: generate_slug(&record.title),
            title: record.title,
            description: record.description,
            location: record.location,
            image_url: record.image_url,
            occurrence_date: clock.localize(occurrence),
            base_date: record.base_date,
            frequency,
            frequency_label: describe_frequency(frequency),
            repeat_until: record.repeat_until,
        }
    }
}

/// ## Summary
/// A single event with its next occurrence and a short preview of the ones after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDetail {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub base_date: NaiveDateTime,
    pub frequency: Frequency,
    pub frequency_label: &'static str,
    pub repeat_until: Option<NaiveDate>,
    /// Enabled in the admin panel and still has an occurrence due.
    pub active: bool,
    pub occurrence_date: Option<DateTime<FixedOffset>>,
    pub upcoming: Vec<DateTime<FixedOffset>>,
}

/// ## Summary
/// Turns stored records into the sorted upcoming-events listing.
///
/// Records without a due occurrence are dropped. Survivors are stably
/// sorted by occurrence, so events at the same time keep store order.
///
/// ## Errors
/// Returns `CoreError::InvalidRule` for the first record with an unknown
/// frequency tag when `policy` is [`InvalidRulePolicy::Fail`].
pub fn collect_upcoming(
    records: Vec<EventRecord>,
    clock: &ScheduleClock,
    reference: NaiveDateTime,
    policy: InvalidRulePolicy,
) -> ServiceResult<Vec<UpcomingEvent>> {
    let mut upcoming = Vec::with_capacity(records.len());

    for record in records {
        let rule = match record.rule() {
            Ok(rule) => rule,
            Err(err) => match policy {
                InvalidRulePolicy::Fail => {
                    tracing::error!(
                        id = %record.id,
                        error = %err,
                        "Stored event has an invalid recurrence rule"
                    );
                    return Err(err.into());
                }
                InvalidRulePolicy::Skip => {
                    tracing::warn!(
                        id = %record.id,
                        error = %err,
                        "Skipping event with invalid recurrence rule"
                    );
                    continue;
                }
            },
        };

        let Some(occurrence) = next_occurrence(&rule, reference) else {
            tracing::trace!(id = %record.id, "Event has no upcoming occurrence");
            continue;
        };

        upcoming.push((
            occurrence,
            UpcomingEvent::new(record, rule.frequency, occurrence, clock),
        ));
    }

    upcoming.sort_by_key(|(occurrence, _)| *occurrence);

    Ok(upcoming.into_iter().map(|(_, event)| event).collect())
}

/// ## Summary
/// Lists active events that still have an occurrence on or after `reference`.
///
/// ## Errors
/// Returns an error if the store fails, or if a record has an unknown
/// frequency tag and `policy` is [`InvalidRulePolicy::Fail`].
#[tracing::instrument(skip(store, clock))]
pub async fn list_upcoming(
    store: &dyn EventStore,
    clock: &ScheduleClock,
    reference: NaiveDateTime,
    policy: InvalidRulePolicy,
) -> ServiceResult<Vec<UpcomingEvent>> {
    let records = store.list_active().await?;
    let fetched = records.len();

    let upcoming = collect_upcoming(records, clock, reference, policy)?;

    tracing::debug!(
        fetched,
        listed = upcoming.len(),
        "Built upcoming events listing"
    );

    Ok(upcoming)
}

/// ## Summary
/// Looks up one event and computes its next occurrence plus up to
/// `preview_limit` occurrences from that point on.
///
/// ## Errors
/// Returns `ServiceError::NotFound` for an unknown id and
/// `CoreError::InvalidRule` if the record's frequency tag is unknown.
#[tracing::instrument(skip(store, clock))]
pub async fn event_detail(
    store: &dyn EventStore,
    clock: &ScheduleClock,
    id: Uuid,
    reference: NaiveDateTime,
    preview_limit: usize,
) -> ServiceResult<EventDetail> {
    let record = store
        .get(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("event {id}")))?;
    let rule = record.rule()?;

    let occurrence = next_occurrence(&rule, reference);
    let upcoming = if record.active {
        upcoming_occurrences(&rule, reference, preview_limit)
            .into_iter()
            .map(|occurrence| clock.localize(occurrence))
            .collect()
    } else {
        Vec::new()
    };

    Ok(EventDetail {
        id: record.id,
        slug: generate_slug(&record.title),
        title: record.title,
        description: record.description,
        location: record.location,
        image_url: record.image_url,
        base_date: record.base_date,
        frequency: rule.frequency,
        frequency_label: describe_frequency(rule.frequency),
        repeat_until: record.repeat_until,
        active: record.active && occurrence.is_some(),
        occurrence_date: occurrence
            .filter(|_| record.active)
            .map(|occurrence| clock.localize(occurrence)),
        upcoming,
    })
}

