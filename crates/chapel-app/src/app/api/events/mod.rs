//! Read-only schedule endpoints backing the public site.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use salvo::{Depot, Request, Response, Router, handler, writing::Json};
use serde::Serialize;
use uuid::Uuid;

use chapel_core::config::Settings;
use chapel_core::constants::{EVENTS_ROUTE_COMPONENT, FREQUENCIES_ROUTE_COMPONENT};
use chapel_core::types::Frequency;
use chapel_service::clock::ScheduleClock;
use chapel_service::events::{
    EventDetail, EventStore, InvalidRulePolicy, UpcomingEvent, event_detail, list_upcoming,
};
use chapel_service::recurrence::describe_frequency;

use crate::config::get_config_from_depot;
use crate::error::{AppError, AppResult, ErrorResponse};
use crate::store_handler::get_store_from_depot;

/// Query parameter overriding "now" with the start of a given day.
const REFERENCE_QUERY: &str = "reference";
const REFERENCE_FORMAT: &str = "%Y-%m-%d";

/// Everything a schedule handler needs, pulled out of the depot up front.
struct ScheduleContext {
    settings: Arc<Settings>,
    store: Arc<dyn EventStore>,
    clock: ScheduleClock,
}

impl ScheduleContext {
    fn from_depot(depot: &Depot) -> AppResult<Self> {
        let settings = get_config_from_depot(depot)?;
        let store = get_store_from_depot(depot)?;
        let clock = ScheduleClock::from_config(&settings.schedule)?;
        Ok(Self {
            settings,
            store,
            clock,
        })
    }

    /// Start of the requested day, or the current wall-clock time.
    fn reference(&self, requested: Option<&str>) -> AppResult<NaiveDateTime> {
        let Some(raw) = requested else {
            return Ok(self.clock.now());
        };
        NaiveDate::parse_from_str(raw, REFERENCE_FORMAT)
            .map(ScheduleClock::start_of_day)
            .map_err(|err| {
                AppError::BadRequest(format!(
                    "Invalid reference date {raw:?}, expected YYYY-MM-DD: {err}"
                ))
            })
    }
}

fn render_error(res: &mut Response, err: &AppError) {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!(error = ?err, "Schedule request failed");
    } else {
        tracing::debug!(error = %err, "Rejected schedule request");
    }
    res.status_code(status);
    res.render(Json(ErrorResponse::from(err)));
}

async fn upcoming_events(
    context: ScheduleContext,
    requested_reference: Option<String>,
) -> AppResult<Vec<UpcomingEvent>> {
    let reference = context.reference(requested_reference.as_deref())?;
    let policy = InvalidRulePolicy::from_skip_flag(context.settings.schedule.skip_invalid_rules);

    Ok(list_upcoming(context.store.as_ref(), &context.clock, reference, policy).await?)
}

async fn single_event(
    context: ScheduleContext,
    raw_id: Option<String>,
    requested_reference: Option<String>,
) -> AppResult<EventDetail> {
    let raw_id = raw_id.ok_or_else(|| AppError::BadRequest("Event id required".to_string()))?;
    let id = Uuid::parse_str(&raw_id)
        .map_err(|_err| AppError::BadRequest(format!("Invalid event id {raw_id:?}")))?;
    let reference = context.reference(requested_reference.as_deref())?;

    Ok(event_detail(
        context.store.as_ref(),
        &context.clock,
        id,
        reference,
        context.settings.schedule.preview_limit,
    )
    .await?)
}

/// ## Summary
/// GET /api/events - Upcoming events sorted by next occurrence.
///
/// Events whose series has ended are left out. `?reference=YYYY-MM-DD`
/// computes the listing as of the start of that day instead of now.
///
/// ## Errors
/// Returns HTTP 400 for a malformed reference date
/// Returns HTTP 500 if a stored event has an unknown frequency tag
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn list_events(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    tracing::debug!("Processing upcoming events request");

    let requested_reference = req.query::<String>(REFERENCE_QUERY);
    let result = match ScheduleContext::from_depot(depot) {
        Ok(context) => upcoming_events(context, requested_reference).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(events) => res.render(Json(events)),
        Err(err) => render_error(res, &err),
    }
}

/// ## Summary
/// GET /api/events/{id} - One event with its next occurrence and a preview of later ones.
///
/// ## Errors
/// Returns HTTP 400 for a malformed id or reference date
/// Returns HTTP 404 if no event has this id
/// Returns HTTP 500 if the event has an unknown frequency tag
#[handler]
#[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
async fn get_event(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let raw_id = req.param::<String>("id");
    let requested_reference = req.query::<String>(REFERENCE_QUERY);
    tracing::debug!(id = ?raw_id, "Processing event detail request");

    let result = match ScheduleContext::from_depot(depot) {
        Ok(context) => single_event(context, raw_id, requested_reference).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(detail) => res.render(Json(detail)),
        Err(err) => render_error(res, &err),
    }
}

/// ## Summary
/// Frequency vocabulary entry
#[derive(Debug, Serialize)]
pub struct FrequencyResponse {
    pub tag: Frequency,
    pub label: &'static str,
    pub recurring: bool,
}

/// ## Summary
/// GET /api/frequencies - The accepted frequency tags with display labels.
#[handler]
async fn list_frequencies() -> Json<Vec<FrequencyResponse>> {
    Json(
        Frequency::ALL
            .into_iter()
            .map(|frequency| FrequencyResponse {
                tag: frequency,
                label: describe_frequency(frequency),
                recurring: frequency.is_recurring(),
            })
            .collect(),
    )
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(EVENTS_ROUTE_COMPONENT)
        .get(list_events)
        .push(Router::with_path("{id}").get(get_event))
}

#[must_use]
pub fn frequency_routes() -> Router {
    Router::with_path(FREQUENCIES_ROUTE_COMPONENT).get(list_frequencies)
}
