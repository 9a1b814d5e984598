//! Runtime configuration re-exports.
//!
//! The actual config types are defined in `evbook-core::config`.
//! This module re-exports them for convenience.

pub use evbook_core::config::{AuthConfig, ServerConfig, SharedConfig};
