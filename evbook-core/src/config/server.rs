//! Server configuration.

use std::net::SocketAddr;
use std::time::Duration;

/// Server configuration with runtime values.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address and port to listen on.
    pub listen: SocketAddr,
    /// Requests running longer than this are aborted.
    pub request_timeout: Duration,
}
