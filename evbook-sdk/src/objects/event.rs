//! Event API request and response types.

use serde::{Deserialize, Serialize};
use time::Date;

/// Lifecycle state of an event.
///
/// `Pending` is the only non-terminal state. An event leaves it exactly once,
/// either to `Approved` or to `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventStatus {
    Pending,
    Approved,
    Rejected,
}

/// Read-side projection of an event, enriched with the assigned vendor's
/// display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventView {
    pub id: i64,
    pub company_name: String,
    /// Candidate dates in the order they were proposed.
    pub proposed_dates: Vec<Date>,
    pub location: String,
    pub event_name: String,
    pub status: EventStatus,
    pub remarks: Option<String>,
    pub confirmed_date: Option<Date>,
    pub created_by: i64,
    /// Unix timestamp.
    pub created_at: i64,
    pub vendor_name: String,
}

/// Body of `POST /api/events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposeEventRequest {
    pub company_name: String,
    pub proposed_dates: Vec<Date>,
    pub location: String,
    pub event_name: String,
    pub vendor_id: i64,
}

/// Body of `POST /api/events/{id}/approve`.
///
/// `confirmed_date` must be an ISO calendar date such as `"2024-07-22"`.
/// Other date spellings (`"22/07/2024"`, timestamps, free text) fail to
/// deserialize and the server answers 400. The date is not checked against
/// the event's proposed dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveEventRequest {
    /// `YYYY-MM-DD`.
    pub confirmed_date: Date,
}

/// Body of `POST /api/events/{id}/reject`. Empty remarks are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectEventRequest {
    pub remarks: String,
}

/// Plain acknowledgement or error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
