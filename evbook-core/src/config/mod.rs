//! Runtime configuration types.
//!
//! These types represent the validated runtime configuration shared by the
//! server's handlers. The actual config loading/parsing is handled by the
//! server crate.

mod auth;
mod server;

pub use auth::AuthConfig;
pub use server::ServerConfig;

use std::sync::Arc;
use tokio::sync::RwLock;

/// Configuration that can change while the server runs.
///
/// Only the auth section is reloadable. The listen address and request
/// timeout are fixed at startup.
#[derive(Clone)]
pub struct SharedConfig {
    /// Token signing secret and lifetime.
    pub auth: Arc<RwLock<AuthConfig>>,
}

impl SharedConfig {
    pub fn new(auth: AuthConfig) -> Self {
        Self {
            auth: Arc::new(RwLock::new(auth)),
        }
    }

    /// Swap in a reloaded auth section (used during SIGHUP reload).
    pub async fn update_auth(&self, auth: AuthConfig) {
        *self.auth.write().await = auth;
    }
}
