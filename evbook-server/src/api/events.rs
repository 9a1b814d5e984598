//! Event handlers. The caller is always present: these routes are only
//! reachable through the bearer gate.

use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use evbook_core::framework::DatabaseProcessor;
use evbook_core::identity::Caller;
use evbook_core::lifecycle::EventLifecycle;
use evbook_sdk::objects::{
    ApproveEventRequest, EventView, MessageResponse, ProposeEventRequest, RejectEventRequest,
};

use crate::api::error::ApiError;
use crate::state::AppState;

fn lifecycle(state: &AppState) -> EventLifecycle<DatabaseProcessor> {
    EventLifecycle::new(state.processor())
}

/// `GET /api/events`
pub(crate) async fn list_events(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<EventView>>, ApiError> {
    Ok(Json(lifecycle(&state).list_events(&caller).await?))
}

/// `POST /api/events`
pub(crate) async fn propose_event(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    body: Result<Json<ProposeEventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EventView>), ApiError> {
    let Json(proposal) = body?;
    let view = lifecycle(&state).propose_event(&caller, proposal).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `POST /api/events/{event_id}/approve`
pub(crate) async fn approve_event(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    event_id: Result<Path<i64>, PathRejection>,
    body: Result<Json<ApproveEventRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(event_id) = event_id?;
    let Json(request) = body?;
    lifecycle(&state)
        .approve_event(&caller, event_id, request.confirmed_date)
        .await?;
    Ok(Json(MessageResponse::new("Event approved successfully")))
}

/// `POST /api/events/{event_id}/reject`
pub(crate) async fn reject_event(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    event_id: Result<Path<i64>, PathRejection>,
    body: Result<Json<RejectEventRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(event_id) = event_id?;
    let Json(request) = body?;
    lifecycle(&state)
        .reject_event(&caller, event_id, request.remarks)
        .await?;
    Ok(Json(MessageResponse::new("Event rejected successfully")))
}
