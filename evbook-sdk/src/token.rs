//! Bearer-token format shared by the server and its clients.
//!
//! A token is self-contained: it carries the caller's identity and role and
//! is authenticated with an HMAC keyed by a server-held secret, so no session
//! store is needed. The wire format is:
//!
//! ```text
//! {base64(claims_json)}.{base64(HMAC-SHA256(base64(claims_json), secret))}
//! ```
//!
//! Clients should treat the token as opaque and send it back as
//! `Authorization: Bearer {token}`.

use serde::{Deserialize, Serialize};

use crate::objects::Role;

/// Scheme prefix of the `Authorization` header value.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Default token lifetime (in seconds).
pub const DEFAULT_TOKEN_TTL: i64 = 24 * 60 * 60;

/// Claims asserted by a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub user_id: i64,
    pub role: Role,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

impl TokenClaims {
    pub fn new(user_id: i64, role: Role, issued_at: i64, ttl: i64) -> Self {
        Self {
            user_id,
            role,
            iat: issued_at,
            exp: issued_at + ttl,
        }
    }
}

/// Errors produced by token operations.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid token format")]
    InvalidFormat,
    #[error("invalid base64 encoding")]
    InvalidBase64,
    #[error("invalid claims: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid signature")]
    SignatureMismatch,
    #[error("token expired")]
    Expired,
}

impl From<ring::error::Unspecified> for TokenError {
    fn from(_: ring::error::Unspecified) -> Self {
        Self::SignatureMismatch
    }
}

/// Serialize and sign `claims` with `key`.
pub fn sign_token(claims: &TokenClaims, key: &[u8]) -> Result<String, TokenError> {
    let json = serde_json::to_vec(claims)?;
    let payload = fast32::base64::RFC4648_NOPAD.encode(&json);
    let tag = ring::hmac::sign(
        &ring::hmac::Key::new(ring::hmac::HMAC_SHA256, key),
        payload.as_bytes(),
    );
    Ok(format!(
        "{}.{}",
        payload,
        fast32::base64::RFC4648_NOPAD.encode(tag.as_ref())
    ))
}

/// Verify the signature and expiry of `token`, returning its claims.
///
/// The signature is checked before the payload is decoded, so nothing from an
/// unauthenticated payload is ever parsed.
pub fn verify_token(token: &str, key: &[u8], now: i64) -> Result<TokenClaims, TokenError> {
    let (payload, signature) = token.split_once('.').ok_or(TokenError::InvalidFormat)?;
    if payload.is_empty() || signature.is_empty() {
        return Err(TokenError::InvalidFormat);
    }
    let signature = fast32::base64::RFC4648_NOPAD
        .decode_str(signature)
        .map_err(|_| TokenError::InvalidBase64)?;
    ring::hmac::verify(
        &ring::hmac::Key::new(ring::hmac::HMAC_SHA256, key),
        payload.as_bytes(),
        &signature,
    )?;

    let json = fast32::base64::RFC4648_NOPAD
        .decode_str(payload)
        .map_err(|_| TokenError::InvalidBase64)?;
    let claims: TokenClaims = serde_json::from_slice(&json)?;
    if claims.exp <= now {
        return Err(TokenError::Expired);
    }
    Ok(claims)
}

/// Extract the token from an `Authorization` header value.
pub fn parse_bearer(header_value: &str) -> Option<&str> {
    let token = header_value.strip_prefix(BEARER_PREFIX)?.trim();
    (!token.is_empty()).then_some(token)
}
