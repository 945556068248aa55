use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::demand::{DemandProfileDraft, DemandProfileId};
use super::listing::{ListingDraft, ListingId};
use super::notifications::NotificationId;
use super::search::{FilterCriteria, SearchParams};
use super::service::{CatalogError, CatalogService};
use super::store::{DemandProfileStore, ListingStore, NotificationStore, RepositoryError};

type SharedService<L, D, N> = State<Arc<CatalogService<L, D, N>>>;

/// Router builder exposing search, publication, demand and notification endpoints.
pub fn catalog_router<L, D, N>(service: Arc<CatalogService<L, D, N>>) -> Router
where
    L: ListingStore + 'static,
    D: DemandProfileStore + 'static,
    N: NotificationStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/listings",
            get(search_handler::<L, D, N>).post(publish_handler::<L, D, N>),
        )
        .route(
            "/api/v1/listings/:listing_id",
            get(listing_handler::<L, D, N>)
                .put(update_listing_handler::<L, D, N>)
                .delete(remove_listing_handler::<L, D, N>),
        )
        .route(
            "/api/v1/demand-profiles",
            get(list_demand_handler::<L, D, N>).post(register_demand_handler::<L, D, N>),
        )
        .route(
            "/api/v1/demand-profiles/:demand_profile_id",
            put(update_demand_handler::<L, D, N>).delete(remove_demand_handler::<L, D, N>),
        )
        .route(
            "/api/v1/notifications",
            get(pending_notifications_handler::<L, D, N>),
        )
        .route(
            "/api/v1/notifications/sent",
            post(mark_many_sent_handler::<L, D, N>),
        )
        .route(
            "/api/v1/notifications/:notification_id",
            axum::routing::delete(mark_sent_handler::<L, D, N>),
        )
        .with_state(service)
}

/// HTTP status for a catalog failure.
pub fn error_status(error: &CatalogError) -> StatusCode {
    match error {
        CatalogError::InvalidListing(_) | CatalogError::InvalidDemand(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        CatalogError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        CatalogError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        CatalogError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub(crate) fn error_response(error: CatalogError) -> Response {
    let status = error_status(&error);
    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}

fn respond<T: serde::Serialize>(status: StatusCode, result: Result<T, CatalogError>) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn search_handler<L, D, N>(
    State(service): SharedService<L, D, N>,
    Query(params): Query<SearchParams>,
) -> Response
where
    L: ListingStore + 'static,
    D: DemandProfileStore + 'static,
    N: NotificationStore + 'static,
{
    let criteria = FilterCriteria::from(params);
    respond(StatusCode::OK, service.search(&criteria))
}

pub(crate) async fn publish_handler<L, D, N>(
    State(service): SharedService<L, D, N>,
    Json(draft): Json<ListingDraft>,
) -> Response
where
    L: ListingStore + 'static,
    D: DemandProfileStore + 'static,
    N: NotificationStore + 'static,
{
    respond(StatusCode::CREATED, service.publish_listing(draft))
}

pub(crate) async fn listing_handler<L, D, N>(
    State(service): SharedService<L, D, N>,
    Path(listing_id): Path<String>,
) -> Response
where
    L: ListingStore + 'static,
    D: DemandProfileStore + 'static,
    N: NotificationStore + 'static,
{
    respond(StatusCode::OK, service.listing(&ListingId(listing_id)))
}

pub(crate) async fn update_listing_handler<L, D, N>(
    State(service): SharedService<L, D, N>,
    Path(listing_id): Path<String>,
    Json(draft): Json<ListingDraft>,
) -> Response
where
    L: ListingStore + 'static,
    D: DemandProfileStore + 'static,
    N: NotificationStore + 'static,
{
    respond(
        StatusCode::OK,
        service.update_listing(&ListingId(listing_id), draft),
    )
}

pub(crate) async fn remove_listing_handler<L, D, N>(
    State(service): SharedService<L, D, N>,
    Path(listing_id): Path<String>,
) -> Response
where
    L: ListingStore + 'static,
    D: DemandProfileStore + 'static,
    N: NotificationStore + 'static,
{
    match service.remove_listing(&ListingId(listing_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_demand_handler<L, D, N>(State(service): SharedService<L, D, N>) -> Response
where
    L: ListingStore + 'static,
    D: DemandProfileStore + 'static,
    N: NotificationStore + 'static,
{
    respond(StatusCode::OK, service.demand_profiles())
}

pub(crate) async fn register_demand_handler<L, D, N>(
    State(service): SharedService<L, D, N>,
    Json(draft): Json<DemandProfileDraft>,
) -> Response
where
    L: ListingStore + 'static,
    D: DemandProfileStore + 'static,
    N: NotificationStore + 'static,
{
    respond(StatusCode::CREATED, service.register_demand(draft))
}

pub(crate) async fn update_demand_handler<L, D, N>(
    State(service): SharedService<L, D, N>,
    Path(demand_profile_id): Path<String>,
    Json(draft): Json<DemandProfileDraft>,
) -> Response
where
    L: ListingStore + 'static,
    D: DemandProfileStore + 'static,
    N: NotificationStore + 'static,
{
    respond(
        StatusCode::OK,
        service.update_demand(&DemandProfileId(demand_profile_id), draft),
    )
}

pub(crate) async fn remove_demand_handler<L, D, N>(
    State(service): SharedService<L, D, N>,
    Path(demand_profile_id): Path<String>,
) -> Response
where
    L: ListingStore + 'static,
    D: DemandProfileStore + 'static,
    N: NotificationStore + 'static,
{
    match service.remove_demand(&DemandProfileId(demand_profile_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn pending_notifications_handler<L, D, N>(
    State(service): SharedService<L, D, N>,
) -> Response
where
    L: ListingStore + 'static,
    D: DemandProfileStore + 'static,
    N: NotificationStore + 'static,
{
    respond(StatusCode::OK, service.pending_notifications())
}

pub(crate) async fn mark_sent_handler<L, D, N>(
    State(service): SharedService<L, D, N>,
    Path(notification_id): Path<String>,
) -> Response
where
    L: ListingStore + 'static,
    D: DemandProfileStore + 'static,
    N: NotificationStore + 'static,
{
    match service.mark_sent(&NotificationId(notification_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SentNotifications {
    pub(crate) ids: Vec<NotificationId>,
}

pub(crate) async fn mark_many_sent_handler<L, D, N>(
    State(service): SharedService<L, D, N>,
    Json(payload): Json<SentNotifications>,
) -> Response
where
    L: ListingStore + 'static,
    D: DemandProfileStore + 'static,
    N: NotificationStore + 'static,
{
    match service.mark_many_sent(&payload.ids) {
        Ok(removed) => (StatusCode::OK, Json(json!({ "removed": removed }))).into_response(),
        Err(error) => error_response(error),
    }
}
