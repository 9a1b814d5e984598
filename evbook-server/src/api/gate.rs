//! Bearer-token gate for the `/api` routes.
//!
//! The middleware is the only place a token is checked. On success it inserts
//! the [`Caller`] into the request extensions; handlers read it with
//! `Extension<Caller>` and never see an unauthenticated request.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use evbook_core::config::SharedConfig;
use evbook_core::identity::Caller;
use evbook_sdk::token::parse_bearer;

use crate::api::error::ApiError;

pub(crate) async fn require_bearer(
    State(config): State<SharedConfig>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // `Request` is not `Sync`; nothing borrowed from it may live across an await.
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let caller = authenticate(&config, header.as_deref()).await?;
    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}

async fn authenticate(config: &SharedConfig, header: Option<&str>) -> Result<Caller, ApiError> {
    let token = header
        .and_then(parse_bearer)
        .ok_or(ApiError::Unauthorized("missing bearer token"))?;

    let tokens = config.auth.read().await.token_service();
    let now = time::OffsetDateTime::now_utc().unix_timestamp();
    Ok(tokens.validate(token, now)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Extension, Router,
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
    };
    use evbook_core::config::AuthConfig;
    use evbook_sdk::objects::Role;
    use tower::ServiceExt;

    const SECRET: &[u8] = b"gate-test-secret-0123456789";

    fn config() -> SharedConfig {
        SharedConfig::new(AuthConfig::new(SECRET.to_vec().into_boxed_slice(), 3600))
    }

    async fn whoami(Extension(caller): Extension<Caller>) -> String {
        format!("{}:{}", caller.user_id, caller.role)
    }

    fn app(config: SharedConfig) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(middleware::from_fn_with_state(config, require_bearer))
    }

    fn token_for(user_id: i64, role: Role) -> String {
        let now = time::OffsetDateTime::now_utc().unix_timestamp();
        AuthConfig::new(SECRET.to_vec().into_boxed_slice(), 3600)
            .token_service()
            .issue(Caller { user_id, role }, now)
            .unwrap()
            .token
    }

    async fn call(app: Router, authorization: Option<String>) -> (StatusCode, String) {
        let mut request = HttpRequest::builder().uri("/whoami");
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value);
        }
        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_valid_token_attaches_caller() {
        let token = token_for(7, Role::Vendor);
        let (status, body) = call(app(config()), Some(format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "7:Vendor");
    }

    #[tokio::test]
    async fn test_missing_or_malformed_header_is_unauthorized() {
        for header in [None, Some("Basic abc".to_string()), Some("Bearer ".to_string())] {
            let (status, _) = call(app(config()), header).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_unauthorized() {
        let now = time::OffsetDateTime::now_utc().unix_timestamp();
        let forged = AuthConfig::new(b"some-other-secret-value".to_vec().into_boxed_slice(), 3600)
            .token_service()
            .issue(
                Caller {
                    user_id: 1,
                    role: Role::Hr,
                },
                now,
            )
            .unwrap()
            .token;
        let (status, body) = call(app(config()), Some(format!("Bearer {forged}"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("unauthorized"));
    }

    #[tokio::test]
    async fn test_rotated_secret_invalidates_old_tokens() {
        let config = config();
        let token = token_for(1, Role::Hr);

        let (status, _) = call(app(config.clone()), Some(format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::OK);

        *config.auth.write().await =
            AuthConfig::new(b"rotated-secret-0123456789".to_vec().into_boxed_slice(), 3600);
        let (status, _) = call(app(config), Some(format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
