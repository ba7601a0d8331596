//! Upcoming-events listing over an in-memory store.

use chapel_core::error::CoreError;
use chapel_core::types::Frequency;
use chapel_service::clock::ScheduleClock;
use chapel_service::error::ServiceError;
use chapel_service::events::listing::collect_upcoming;
use chapel_service::events::{
    EventRecord, InvalidRulePolicy, MemoryEventStore, event_detail, list_upcoming,
};
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("valid date")
        .and_hms_opt(hour, minute, 0)
        .expect("valid time")
}

fn record(title: &str, base_date: NaiveDateTime, frequency: &str) -> EventRecord {
    EventRecord {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: Some(format!("{title} description")),
        location: Some("Main Hall".to_string()),
        image_url: None,
        base_date,
        frequency: frequency.to_string(),
        repeat_until: None,
        active: true,
    }
}

fn utc_clock() -> ScheduleClock {
    ScheduleClock::new(chrono_tz::Tz::UTC)
}

#[test_log::test(tokio::test)]
async fn listing_sorts_by_next_occurrence_and_drops_finished_events() {
    let sunday = record("Sunday Service", at(2025, 6, 1, 10, 30), "weekly");
    let retreat = record("Retreat", at(2025, 6, 12, 9, 0), "none");
    let past_concert = record("Concert", at(2025, 5, 20, 19, 0), "none");
    let mut youth = record("Youth Night", at(2025, 1, 3, 19, 0), "biweekly");
    youth.repeat_until = Some(NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date"));

    let store = MemoryEventStore::new(vec![
        sunday.clone(),
        retreat.clone(),
        past_concert,
        youth,
    ]);

    let listing = list_upcoming(
        &store,
        &utc_clock(),
        at(2025, 6, 9, 8, 0),
        InvalidRulePolicy::Fail,
    )
    .await
    .expect("listing succeeds");

    let titles: Vec<_> = listing.iter().map(|event| event.title.as_str()).collect();
    assert_eq!(titles, vec!["Retreat", "Sunday Service"]);

    assert_eq!(listing[0].id, retreat.id);
    assert_eq!(listing[1].occurrence_date.to_rfc3339(), "2025-06-15T10:30:00+00:00");
    assert_eq!(listing[1].base_date, sunday.base_date);
    assert_eq!(listing[1].frequency, Frequency::Weekly);
    assert_eq!(listing[1].slug, "sunday-service");
}

#[tokio::test]
async fn listing_skips_inactive_records() {
    let mut hidden = record("Hidden", at(2025, 6, 10, 9, 0), "none");
    hidden.active = false;
    let store = MemoryEventStore::new(vec![hidden]);

    let listing = list_upcoming(
        &store,
        &utc_clock(),
        at(2025, 6, 1, 0, 0),
        InvalidRulePolicy::Fail,
    )
    .await
    .expect("listing succeeds");

    assert!(listing.is_empty());
}

#[tokio::test]
async fn invalid_frequency_fails_listing_by_default() {
    let store = MemoryEventStore::new(vec![
        record("Good", at(2025, 6, 10, 9, 0), "weekly"),
        record("Corrupt", at(2025, 6, 10, 9, 0), "daily"),
    ]);

    let err = list_upcoming(
        &store,
        &utc_clock(),
        at(2025, 6, 1, 0, 0),
        InvalidRulePolicy::Fail,
    )
    .await
    .expect_err("corrupt tag must surface");

    assert!(matches!(
        err,
        ServiceError::CoreError(CoreError::InvalidRule { ref tag }) if tag == "daily"
    ));
}

#[tokio::test]
async fn invalid_frequency_is_skipped_when_configured() {
    let store = MemoryEventStore::new(vec![
        record("Good", at(2025, 6, 10, 9, 0), "weekly"),
        record("Corrupt", at(2025, 6, 10, 9, 0), "Weekly"),
    ]);

    let listing = list_upcoming(
        &store,
        &utc_clock(),
        at(2025, 6, 1, 0, 0),
        InvalidRulePolicy::from_skip_flag(true),
    )
    .await
    .expect("listing succeeds");

    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].title, "Good");
}

#[test]
fn equal_occurrences_keep_store_order() {
    let first = record("First", at(2025, 6, 10, 19, 0), "none");
    let second = record("Second", at(2025, 6, 3, 19, 0), "weekly");
    let third = record("Third", at(2025, 6, 10, 19, 0), "none");

    let listing = collect_upcoming(
        vec![first, second, third],
        &utc_clock(),
        at(2025, 6, 10, 0, 0),
        InvalidRulePolicy::Fail,
    )
    .expect("listing succeeds");

    let titles: Vec<_> = listing.iter().map(|event| event.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);
}

#[test]
fn occurrences_are_localized_in_configured_zone() {
    let clock = ScheduleClock::new(chrono_tz::America::Mexico_City);
    let listing = collect_upcoming(
        vec![record("Vigil", at(2025, 12, 24, 22, 0), "yearly")],
        &clock,
        at(2025, 12, 1, 0, 0),
        InvalidRulePolicy::Fail,
    )
    .expect("listing succeeds");

    assert_eq!(
        listing[0].occurrence_date.to_rfc3339(),
        "2025-12-24T22:00:00-06:00"
    );
}

#[test_log::test(tokio::test)]
async fn detail_includes_preview() {
    let mut monthly = record("Communion", at(2025, 1, 31, 11, 0), "monthly");
    monthly.repeat_until = Some(NaiveDate::from_ymd_opt(2025, 5, 31).expect("valid date"));
    let id = monthly.id;
    let store = MemoryEventStore::new(vec![monthly]);

    let detail = event_detail(&store, &utc_clock(), id, at(2025, 2, 1, 0, 0), 10)
        .await
        .expect("detail succeeds");

    assert!(detail.active);
    assert_eq!(detail.frequency_label, "Every month");
    assert_eq!(
        detail.occurrence_date.map(|date| date.to_rfc3339()),
        Some("2025-02-28T11:00:00+00:00".to_string())
    );
    let preview: Vec<_> = detail.upcoming.iter().map(|date| date.to_rfc3339()).collect();
    assert_eq!(
        preview,
        vec![
            "2025-02-28T11:00:00+00:00",
            "2025-03-31T11:00:00+00:00",
            "2025-04-30T11:00:00+00:00",
            "2025-05-31T11:00:00+00:00",
        ]
    );
}

#[tokio::test]
async fn detail_of_finished_event_is_inactive() {
    let concert = record("Concert", at(2025, 5, 20, 19, 0), "none");
    let id = concert.id;
    let store = MemoryEventStore::new(vec![concert]);

    let detail = event_detail(&store, &utc_clock(), id, at(2025, 6, 1, 0, 0), 5)
        .await
        .expect("detail succeeds");

    assert!(!detail.active);
    assert!(detail.occurrence_date.is_none());
    assert!(detail.upcoming.is_empty());
}

#[tokio::test]
async fn detail_of_unknown_id_is_not_found() {
    let store = MemoryEventStore::default();
    let err = event_detail(&store, &utc_clock(), Uuid::new_v4(), at(2025, 6, 1, 0, 0), 5)
        .await
        .expect_err("unknown id");

    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[test]
fn listing_serializes_storage_tags() {
    let listing = collect_upcoming(
        vec![record("Prayer", at(2025, 6, 4, 6, 0), "biweekly")],
        &utc_clock(),
        at(2025, 6, 1, 0, 0),
        InvalidRulePolicy::Fail,
    )
    .expect("listing succeeds");

    let json = serde_json::to_value(&listing).expect("serializable");
    assert_eq!(json[0]["frequency"], "biweekly");
    assert_eq!(json[0]["frequency_label"], "Every two weeks");
    assert_eq!(json[0]["occurrence_date"], "2025-06-04T06:00:00+00:00");
    assert_eq!(json[0]["base_date"], "2025-06-04T06:00:00");
}
