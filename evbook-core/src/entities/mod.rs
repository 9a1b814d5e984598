pub mod events;
pub mod users;

use evbook_sdk::objects::{EventStatus as SdkEventStatus, Role as SdkRole};

/// User role for database operations.
///
/// This is the sqlx::Type version. For API/DTO use, see `evbook_sdk::objects::Role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "lowercase", type_name = "user_role")]
pub enum UserRole {
    Hr,
    Vendor,
}

impl From<UserRole> for SdkRole {
    fn from(value: UserRole) -> Self {
        match value {
            UserRole::Hr => SdkRole::Hr,
            UserRole::Vendor => SdkRole::Vendor,
        }
    }
}

/// Event status for database operations.
///
/// This is the sqlx::Type version. For API/DTO use, see `evbook_sdk::objects::EventStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "lowercase", type_name = "event_status")]
pub enum EventStatus {
    Pending,
    Approved,
    Rejected,
}

impl From<EventStatus> for SdkEventStatus {
    fn from(value: EventStatus) -> Self {
        match value {
            EventStatus::Pending => SdkEventStatus::Pending,
            EventStatus::Approved => SdkEventStatus::Approved,
            EventStatus::Rejected => SdkEventStatus::Rejected,
        }
    }
}
