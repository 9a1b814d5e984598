//! Token signing configuration.

use crate::identity::TokenService;

/// Secret and lifetime used to issue and validate bearer tokens.
#[derive(Clone)]
pub struct AuthConfig {
    token_secret: Box<[u8]>,
    /// Token lifetime in seconds.
    pub token_ttl: i64,
}

impl AuthConfig {
    pub fn new(token_secret: Box<[u8]>, token_ttl: i64) -> Self {
        Self {
            token_secret,
            token_ttl,
        }
    }

    pub fn secret_bytes(&self) -> &[u8] {
        &self.token_secret
    }

    /// Build a token service snapshot of this configuration.
    pub fn token_service(&self) -> TokenService {
        TokenService::new(self.token_secret.clone(), self.token_ttl)
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}
