//! Role-scoped event visibility and the approve/reject state machine.
//!
//! ```text
//!            approve (sets confirmed_date)
//! Pending ─┬──────────────────────────────▶ Approved
//!          └──────────────────────────────▶ Rejected
//!            reject (sets remarks)
//! ```
//!
//! Both terminal states are final. The engine keeps no state of its own; it is
//! a policy layer over the event repository.

use evbook_sdk::objects::{EventStatus as SdkEventStatus, EventView, ProposeEventRequest, Role};
use kanau::processor::Processor;
use time::Date;

use crate::entities::events::{
    EventRecord, EventScope, EventWithVendorName, FinalizeEvent, GetEventById, GetEventView,
    InsertEvent, ListEventViews, Transition,
};
use crate::entities::users::{GetUserById, UserRecord};
use crate::entities::{EventStatus, UserRole};
use crate::identity::Caller;

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("event not found")]
    NotFound,
    #[error("caller is not permitted to act on this event")]
    Forbidden,
    #[error("event already finalized as {0:?}")]
    AlreadyFinalized(SdkEventStatus),
    #[error("invalid proposal: {0}")]
    InvalidProposal(String),
    #[error("event repository error: {0}")]
    Store(#[from] sqlx::Error),
}

/// Everything the engine needs from storage.
pub trait EventRepository:
    Processor<GetEventById, Output = Option<EventRecord>, Error = sqlx::Error>
    + Processor<GetEventView, Output = Option<EventWithVendorName>, Error = sqlx::Error>
    + Processor<ListEventViews, Output = Vec<EventWithVendorName>, Error = sqlx::Error>
    + Processor<InsertEvent, Output = i64, Error = sqlx::Error>
    + Processor<FinalizeEvent, Output = u64, Error = sqlx::Error>
    + Processor<GetUserById, Output = Option<UserRecord>, Error = sqlx::Error>
{
}

impl<T> EventRepository for T where
    T: Processor<GetEventById, Output = Option<EventRecord>, Error = sqlx::Error>
        + Processor<GetEventView, Output = Option<EventWithVendorName>, Error = sqlx::Error>
        + Processor<ListEventViews, Output = Vec<EventWithVendorName>, Error = sqlx::Error>
        + Processor<InsertEvent, Output = i64, Error = sqlx::Error>
        + Processor<FinalizeEvent, Output = u64, Error = sqlx::Error>
        + Processor<GetUserById, Output = Option<UserRecord>, Error = sqlx::Error>
{
}

/// Decides whether `caller` may approve or reject `event`.
pub type FinalizePolicy = fn(&Caller, &EventRecord) -> bool;

/// Only the vendor assigned to an event may finalize it.
pub fn assigned_vendor_only(caller: &Caller, event: &EventRecord) -> bool {
    caller.role == Role::Vendor && event.vendor_id == caller.user_id
}

pub fn to_view(row: EventWithVendorName) -> EventView {
    let EventWithVendorName { event, vendor_name } = row;
    EventView {
        id: event.id,
        company_name: event.company_name,
        proposed_dates: event.proposed_dates,
        location: event.location,
        event_name: event.event_name,
        status: event.status.into(),
        remarks: event.remarks,
        confirmed_date: event.confirmed_date,
        created_by: event.created_by,
        created_at: event.created_at.assume_utc().unix_timestamp(),
        vendor_name,
    }
}

pub struct EventLifecycle<S> {
    store: S,
    may_finalize: FinalizePolicy,
}

impl<S: EventRepository> EventLifecycle<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            may_finalize: assigned_vendor_only,
        }
    }

    /// Replace the finalize authorization policy.
    pub fn with_policy(mut self, policy: FinalizePolicy) -> Self {
        self.may_finalize = policy;
        self
    }

    /// Events visible to `caller`: the ones they created (HR) or the ones
    /// assigned to them (Vendor), oldest first.
    pub async fn list_events(&self, caller: &Caller) -> Result<Vec<EventView>, LifecycleError> {
        let scope = match caller.role {
            Role::Hr => EventScope::CreatedBy(caller.user_id),
            Role::Vendor => EventScope::AssignedTo(caller.user_id),
        };
        let rows = self.store.process(ListEventViews { scope }).await?;
        Ok(rows.into_iter().map(to_view).collect())
    }

    /// Create a pending event on behalf of an HR user.
    pub async fn propose_event(
        &self,
        caller: &Caller,
        proposal: ProposeEventRequest,
    ) -> Result<EventView, LifecycleError> {
        if caller.role != Role::Hr {
            return Err(LifecycleError::Forbidden);
        }

        let ProposeEventRequest {
            company_name,
            proposed_dates,
            location,
            event_name,
            vendor_id,
        } = proposal;

        for (field, value) in [
            ("company_name", &company_name),
            ("location", &location),
            ("event_name", &event_name),
        ] {
            if value.trim().is_empty() {
                return Err(LifecycleError::InvalidProposal(format!(
                    "{field} must not be empty"
                )));
            }
        }

        let proposed_dates = dedup_dates(proposed_dates);
        if proposed_dates.is_empty() {
            return Err(LifecycleError::InvalidProposal(
                "at least one proposed date is required".to_string(),
            ));
        }

        let vendor = self.store.process(GetUserById { user_id: vendor_id }).await?;
        if !matches!(vendor, Some(UserRecord { role: UserRole::Vendor, .. })) {
            return Err(LifecycleError::InvalidProposal(format!(
                "user {vendor_id} is not a vendor"
            )));
        }

        let event_id = self
            .store
            .process(InsertEvent {
                company_name,
                proposed_dates,
                location,
                event_name,
                vendor_id,
                created_by: caller.user_id,
            })
            .await?;
        tracing::info!(event_id, created_by = caller.user_id, vendor_id, "Event proposed");

        let row = self
            .store
            .process(GetEventView { event_id })
            .await?
            .ok_or(LifecycleError::NotFound)?;
        Ok(to_view(row))
    }

    /// Move a pending event to `Approved` with the given confirmed date.
    pub async fn approve_event(
        &self,
        caller: &Caller,
        event_id: i64,
        confirmed_date: Date,
    ) -> Result<(), LifecycleError> {
        self.finalize(caller, event_id, Transition::Approve { confirmed_date })
            .await
    }

    /// Move a pending event to `Rejected`. Empty remarks are allowed.
    pub async fn reject_event(
        &self,
        caller: &Caller,
        event_id: i64,
        remarks: String,
    ) -> Result<(), LifecycleError> {
        self.finalize(caller, event_id, Transition::Reject { remarks })
            .await
    }

    async fn finalize(
        &self,
        caller: &Caller,
        event_id: i64,
        transition: Transition,
    ) -> Result<(), LifecycleError> {
        let event = self
            .store
            .process(GetEventById { event_id })
            .await?
            .ok_or(LifecycleError::NotFound)?;

        if !(self.may_finalize)(caller, &event) {
            tracing::warn!(
                event_id,
                user_id = caller.user_id,
                role = %caller.role,
                "Finalize attempt by a caller other than the assigned vendor"
            );
            return Err(LifecycleError::Forbidden);
        }
        if event.status != EventStatus::Pending {
            return Err(LifecycleError::AlreadyFinalized(event.status.into()));
        }

        let target = transition.target_status();
        let updated = self
            .store
            .process(FinalizeEvent {
                event_id,
                transition,
            })
            .await?;

        if updated == 0 {
            // Lost a race: either deleted or finalized by a concurrent call.
            let current = self
                .store
                .process(GetEventById { event_id })
                .await?
                .ok_or(LifecycleError::NotFound)?;
            return Err(LifecycleError::AlreadyFinalized(current.status.into()));
        }

        tracing::info!(event_id, user_id = caller.user_id, status = ?target, "Event finalized");
        Ok(())
    }
}

fn dedup_dates(dates: Vec<Date>) -> Vec<Date> {
    let mut unique = Vec::with_capacity(dates.len());
    for date in dates {
        if !unique.contains(&date) {
            unique.push(date);
        }
    }
    unique
}
