//! HTTP handlers.
//!
//! # Endpoints
//!
//! - `POST /login`                     – exchange credentials for a bearer token
//! - `GET  /api/events`                – events visible to the caller
//! - `POST /api/events`                – propose a new event (HR)
//! - `POST /api/events/{id}/approve`   – approve a pending event (assigned vendor)
//! - `POST /api/events/{id}/reject`    – reject a pending event (assigned vendor)
//!
//! Everything under `/api` sits behind [`gate::require_bearer`].

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::state::AppState;

pub(crate) mod auth;
pub(crate) mod error;
pub(crate) mod events;
pub(crate) mod gate;

/// Routes that do not need a token.
pub fn public_router() -> Router<AppState> {
    Router::new().route("/login", post(auth::login))
}

/// Routes that require a bearer token, to be nested under `/api`.
pub fn protected_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/events",
            get(events::list_events).post(events::propose_event),
        )
        .route("/events/{event_id}/approve", post(events::approve_event))
        .route("/events/{event_id}/reject", post(events::reject_event))
        .route_layer(middleware::from_fn_with_state(
            state.config.clone(),
            gate::require_bearer,
        ))
}
