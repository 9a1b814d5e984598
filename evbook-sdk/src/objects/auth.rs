//! Login request and response types, plus the role carried by every user.

use serde::{Deserialize, Serialize};

/// The role a user acts under.
///
/// `HR` users propose events and see the ones they created; `Vendor` users
/// see, approve and reject the events assigned to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "HR")]
    Hr,
    #[serde(rename = "Vendor")]
    Vendor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Hr => "HR",
            Role::Vendor => "Vendor",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Opaque bearer token to send as `Authorization: Bearer {token}`.
    pub token: String,
    pub role: Role,
    /// Unix timestamp after which the token is rejected.
    pub expires_at: i64,
}
