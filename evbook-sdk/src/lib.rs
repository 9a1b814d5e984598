//! Shared types for the event-booking approval service.
//!
//! The server and any client agree on the JSON bodies in [`objects`] and on
//! the bearer-token format in [`token`]. The typed HTTP client lives behind
//! the `client` feature.

pub mod objects;
pub mod token;

#[cfg(feature = "client")]
pub mod client;
