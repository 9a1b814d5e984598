use crate::entities::EventStatus;
use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use time::{Date, PrimitiveDateTime};

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub company_name: String,
    pub proposed_dates: Vec<Date>,
    pub location: String,
    pub event_name: String,
    pub status: EventStatus,
    pub remarks: Option<String>,
    pub confirmed_date: Option<Date>,
    pub vendor_id: i64,
    pub created_by: i64,
    pub created_at: PrimitiveDateTime,
}

/// An event joined with its vendor's display name.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct EventWithVendorName {
    #[sqlx(flatten)]
    pub event: EventRecord,
    pub vendor_name: String,
}

/// Which events a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventScope {
    /// Events proposed by this HR user.
    CreatedBy(i64),
    /// Events assigned to this vendor.
    AssignedTo(i64),
}

/// A one-way move out of `Pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Approve { confirmed_date: Date },
    Reject { remarks: String },
}

impl Transition {
    pub fn target_status(&self) -> EventStatus {
        match self {
            Transition::Approve { .. } => EventStatus::Approved,
            Transition::Reject { .. } => EventStatus::Rejected,
        }
    }
}

const EVENT_VIEW_COLUMNS: &str = r#"
    e.id, e.company_name, e.proposed_dates, e.location, e.event_name, e.status,
    e.remarks, e.confirmed_date, e.vendor_id, e.created_by, e.created_at,
    u.full_name AS vendor_name
"#;

#[derive(Debug, Clone, Copy)]
pub struct GetEventById {
    pub event_id: i64,
}

impl Processor<GetEventById> for DatabaseProcessor {
    type Output = Option<EventRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetEventById")]
    async fn process(&self, query: GetEventById) -> Result<Option<EventRecord>, sqlx::Error> {
        let event = sqlx::query_as::<_, EventRecord>(
            r#"
            SELECT id, company_name, proposed_dates, location, event_name, status,
                   remarks, confirmed_date, vendor_id, created_by, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(query.event_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(event)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetEventView {
    pub event_id: i64,
}

impl Processor<GetEventView> for DatabaseProcessor {
    type Output = Option<EventWithVendorName>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetEventView")]
    async fn process(
        &self,
        query: GetEventView,
    ) -> Result<Option<EventWithVendorName>, sqlx::Error> {
        let sql = format!(
            "SELECT {EVENT_VIEW_COLUMNS} FROM events e JOIN users u ON u.id = e.vendor_id WHERE e.id = $1"
        );
        let event = sqlx::query_as::<_, EventWithVendorName>(&sql)
            .bind(query.event_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }
}

#[derive(Debug, Clone, Copy)]
/// List events in a scope, oldest first.
pub struct ListEventViews {
    pub scope: EventScope,
}

impl Processor<ListEventViews> for DatabaseProcessor {
    type Output = Vec<EventWithVendorName>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListEventViews")]
    async fn process(&self, query: ListEventViews) -> Result<Vec<EventWithVendorName>, sqlx::Error> {
        let (filter, user_id) = match query.scope {
            EventScope::CreatedBy(user_id) => ("e.created_by", user_id),
            EventScope::AssignedTo(user_id) => ("e.vendor_id", user_id),
        };
        let sql = format!(
            "SELECT {EVENT_VIEW_COLUMNS} FROM events e JOIN users u ON u.id = e.vendor_id \
             WHERE {filter} = $1 ORDER BY e.created_at ASC, e.id ASC"
        );
        let events = sqlx::query_as::<_, EventWithVendorName>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }
}

#[derive(Debug, Clone)]
/// Insert a new pending event. Returns its id.
pub struct InsertEvent {
    pub company_name: String,
    pub proposed_dates: Vec<Date>,
    pub location: String,
    pub event_name: String,
    pub vendor_id: i64,
    pub created_by: i64,
}

impl Processor<InsertEvent> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:InsertEvent")]
    async fn process(&self, cmd: InsertEvent) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO events
                (company_name, proposed_dates, location, event_name, vendor_id, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(cmd.company_name)
        .bind(cmd.proposed_dates)
        .bind(cmd.location)
        .bind(cmd.event_name)
        .bind(cmd.vendor_id)
        .bind(cmd.created_by)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// Apply a transition to an event that is still pending.
///
/// Status and its companion field change in one statement, guarded by
/// `status = 'pending'`. Returns the number of rows updated: zero means the
/// event is gone or was finalized concurrently.
pub struct FinalizeEvent {
    pub event_id: i64,
    pub transition: Transition,
}

impl Processor<FinalizeEvent> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:FinalizeEvent")]
    async fn process(&self, cmd: FinalizeEvent) -> Result<u64, sqlx::Error> {
        let result = match cmd.transition {
            Transition::Approve { confirmed_date } => {
                sqlx::query(
                    r#"
                    UPDATE events
                    SET status = 'approved', confirmed_date = $2
                    WHERE id = $1 AND status = 'pending'
                    "#,
                )
                .bind(cmd.event_id)
                .bind(confirmed_date)
                .execute(&self.pool)
                .await?
            }
            Transition::Reject { remarks } => {
                sqlx::query(
                    r#"
                    UPDATE events
                    SET status = 'rejected', remarks = $2
                    WHERE id = $1 AND status = 'pending'
                    "#,
                )
                .bind(cmd.event_id)
                .bind(remarks)
                .execute(&self.pool)
                .await?
            }
        };
        Ok(result.rows_affected())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CountEvents;

impl Processor<CountEvents> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CountEvents")]
    async fn process(&self, _query: CountEvents) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await
    }
}
