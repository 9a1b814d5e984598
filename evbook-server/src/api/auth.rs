use axum::{Json, extract::State, extract::rejection::JsonRejection};
use evbook_core::identity::IdentityService;
use evbook_sdk::objects::{LoginRequest, LoginResponse};

use crate::api::error::ApiError;
use crate::state::AppState;

/// `POST /login`: verify credentials and issue a bearer token.
pub(crate) async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = body?;
    let identity = IdentityService::new(state.processor(), state.token_service().await);
    let issued = identity
        .authenticate(&request.username, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token: issued.token,
        role: issued.caller.role,
        expires_at: issued.expires_at,
    }))
}
