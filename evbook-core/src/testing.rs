//! In-memory stand-in for the Postgres repositories.

use std::sync::{Arc, Mutex};

use kanau::processor::Processor;
use time::macros::{date, datetime};
use time::{Duration, PrimitiveDateTime};

use crate::entities::events::{
    CountEvents, EventRecord, EventScope, EventWithVendorName, FinalizeEvent, GetEventById,
    GetEventView, InsertEvent, ListEventViews, Transition,
};
use crate::entities::users::{CountUsers, CreateUser, GetUserById, GetUserByUsername, UserRecord};
use crate::entities::{EventStatus, UserRole};
use crate::identity::hash_password;

const EPOCH: PrimitiveDateTime = datetime!(2024-07-01 0:00);

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    users: Vec<UserRecord>,
    events: Vec<EventRecord>,
    fail_next: bool,
    race_on_update: Option<(i64, EventStatus)>,
}

impl Inner {
    fn check_failure(&mut self) -> Result<(), sqlx::Error> {
        if std::mem::take(&mut self.fail_next) {
            return Err(sqlx::Error::Protocol("injected failure".to_string()));
        }
        Ok(())
    }

    fn insert_user(&mut self, cmd: CreateUser) -> Result<UserRecord, sqlx::Error> {
        if self.users.iter().any(|u| u.username == cmd.username) {
            return Err(sqlx::Error::Protocol(format!(
                "duplicate username {}",
                cmd.username
            )));
        }
        let user = UserRecord {
            id: self.users.len() as i64 + 1,
            username: cmd.username,
            password_hash: cmd.password_hash,
            full_name: cmd.full_name,
            role: cmd.role,
        };
        self.users.push(user.clone());
        Ok(user)
    }

    fn insert_event(&mut self, cmd: InsertEvent) -> i64 {
        let id = self.events.len() as i64 + 1;
        self.events.push(EventRecord {
            id,
            company_name: cmd.company_name,
            proposed_dates: cmd.proposed_dates,
            location: cmd.location,
            event_name: cmd.event_name,
            status: EventStatus::Pending,
            remarks: None,
            confirmed_date: None,
            vendor_id: cmd.vendor_id,
            created_by: cmd.created_by,
            created_at: EPOCH + Duration::seconds(id),
        });
        id
    }

    fn view(&self, event: &EventRecord) -> EventWithVendorName {
        let vendor_name = self
            .users
            .iter()
            .find(|u| u.id == event.vendor_id)
            .map(|u| u.full_name.clone())
            .unwrap();
        EventWithVendorName {
            event: event.clone(),
            vendor_name,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, username: &str, password: &str, full_name: &str, role: UserRole) -> UserRecord {
        let hash = hash_password(password).unwrap();
        self.add_user_with_hash(username, &hash, full_name, role)
    }

    pub fn add_user_with_hash(
        &self,
        username: &str,
        password_hash: &str,
        full_name: &str,
        role: UserRole,
    ) -> UserRecord {
        self.inner
            .lock()
            .unwrap()
            .insert_user(CreateUser {
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                full_name: full_name.to_string(),
                role,
            })
            .unwrap()
    }

    pub fn add_event(&self, company_name: &str, created_by: i64, vendor_id: i64) -> i64 {
        self.inner.lock().unwrap().insert_event(InsertEvent {
            company_name: company_name.to_string(),
            proposed_dates: vec![date!(2024 - 07 - 20), date!(2024 - 07 - 21)],
            location: "Jakarta".to_string(),
            event_name: "Vaccine boost".to_string(),
            vendor_id,
            created_by,
        })
    }

    pub fn event_id(&self, company_name: &str) -> i64 {
        self.inner
            .lock()
            .unwrap()
            .events
            .iter()
            .find(|e| e.company_name == company_name)
            .map(|e| e.id)
            .unwrap()
    }

    pub fn event(&self, event_id: i64) -> Option<EventRecord> {
        self.inner
            .lock()
            .unwrap()
            .events
            .iter()
            .find(|e| e.id == event_id)
            .cloned()
    }

    pub fn events(&self) -> Vec<EventRecord> {
        self.inner.lock().unwrap().events.clone()
    }

    pub fn users(&self) -> Vec<UserRecord> {
        self.inner.lock().unwrap().users.clone()
    }

    /// Make the next query fail with a storage error.
    pub fn fail_next_query(&self) {
        self.inner.lock().unwrap().fail_next = true;
    }

    /// Simulate a concurrent writer finalizing `event_id` just before the
    /// next guarded update runs.
    pub fn finalize_behind_next_update(&self, event_id: i64, status: EventStatus) {
        self.inner.lock().unwrap().race_on_update = Some((event_id, status));
    }
}

impl Processor<GetUserByUsername> for MemoryStore {
    type Output = Option<UserRecord>;
    type Error = sqlx::Error;
    async fn process(&self, query: GetUserByUsername) -> Result<Option<UserRecord>, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_failure()?;
        Ok(inner
            .users
            .iter()
            .find(|u| u.username == query.username)
            .cloned())
    }
}

impl Processor<GetUserById> for MemoryStore {
    type Output = Option<UserRecord>;
    type Error = sqlx::Error;
    async fn process(&self, query: GetUserById) -> Result<Option<UserRecord>, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_failure()?;
        Ok(inner.users.iter().find(|u| u.id == query.user_id).cloned())
    }
}

impl Processor<CreateUser> for MemoryStore {
    type Output = UserRecord;
    type Error = sqlx::Error;
    async fn process(&self, cmd: CreateUser) -> Result<UserRecord, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_failure()?;
        inner.insert_user(cmd)
    }
}

impl Processor<CountUsers> for MemoryStore {
    type Output = i64;
    type Error = sqlx::Error;
    async fn process(&self, _query: CountUsers) -> Result<i64, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_failure()?;
        Ok(inner.users.len() as i64)
    }
}

impl Processor<GetEventById> for MemoryStore {
    type Output = Option<EventRecord>;
    type Error = sqlx::Error;
    async fn process(&self, query: GetEventById) -> Result<Option<EventRecord>, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_failure()?;
        Ok(inner
            .events
            .iter()
            .find(|e| e.id == query.event_id)
            .cloned())
    }
}

impl Processor<GetEventView> for MemoryStore {
    type Output = Option<EventWithVendorName>;
    type Error = sqlx::Error;
    async fn process(
        &self,
        query: GetEventView,
    ) -> Result<Option<EventWithVendorName>, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_failure()?;
        Ok(inner
            .events
            .iter()
            .find(|e| e.id == query.event_id)
            .map(|e| inner.view(e)))
    }
}

impl Processor<ListEventViews> for MemoryStore {
    type Output = Vec<EventWithVendorName>;
    type Error = sqlx::Error;
    async fn process(&self, query: ListEventViews) -> Result<Vec<EventWithVendorName>, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_failure()?;
        let mut rows: Vec<_> = inner
            .events
            .iter()
            .filter(|e| match query.scope {
                EventScope::CreatedBy(user_id) => e.created_by == user_id,
                EventScope::AssignedTo(user_id) => e.vendor_id == user_id,
            })
            .map(|e| inner.view(e))
            .collect();
        rows.sort_by_key(|r| (r.event.created_at, r.event.id));
        Ok(rows)
    }
}

impl Processor<InsertEvent> for MemoryStore {
    type Output = i64;
    type Error = sqlx::Error;
    async fn process(&self, cmd: InsertEvent) -> Result<i64, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_failure()?;
        Ok(inner.insert_event(cmd))
    }
}

impl Processor<FinalizeEvent> for MemoryStore {
    type Output = u64;
    type Error = sqlx::Error;
    async fn process(&self, cmd: FinalizeEvent) -> Result<u64, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_failure()?;
        if let Some((event_id, status)) = inner.race_on_update.take() {
            if let Some(event) = inner.events.iter_mut().find(|e| e.id == event_id) {
                event.status = status;
            }
        }
        let Some(event) = inner
            .events
            .iter_mut()
            .find(|e| e.id == cmd.event_id && e.status == EventStatus::Pending)
        else {
            return Ok(0);
        };
        event.status = cmd.transition.target_status();
        match cmd.transition {
            Transition::Approve { confirmed_date } => event.confirmed_date = Some(confirmed_date),
            Transition::Reject { remarks } => event.remarks = Some(remarks),
        }
        Ok(1)
    }
}

impl Processor<CountEvents> for MemoryStore {
    type Output = i64;
    type Error = sqlx::Error;
    async fn process(&self, _query: CountEvents) -> Result<i64, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.check_failure()?;
        Ok(inner.events.len() as i64)
    }
}
