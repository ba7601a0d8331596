mod app_specific;
mod events;

use salvo::Router;

use chapel_core::constants::API_ROUTE_COMPONENT;

/// ## Summary
/// Constructs the main API router with the read-only schedule endpoints.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .push(app_specific::routes())
        .push(events::routes())
        .push(events::frequency_routes())
}
