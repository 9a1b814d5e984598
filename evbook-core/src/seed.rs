//! Demo data for local development.
//!
//! Seeds two HR users, two vendors and four pending events. Each table is only
//! touched while it is empty, so running the seeder repeatedly is harmless.

use kanau::processor::Processor;
use time::{Date, Duration};

use crate::entities::UserRole;
use crate::entities::events::{CountEvents, InsertEvent};
use crate::entities::users::{CountUsers, CreateUser, GetUserByUsername, UserRecord};
use crate::identity::{AuthError, hash_password};

/// Password given to every seeded user.
pub const DEMO_PASSWORD: &str = "password";

const DEMO_USERS: [(&str, &str, UserRole); 4] = [
    ("HR1", "HR 1", UserRole::Hr),
    ("HR2", "HR 2", UserRole::Hr),
    ("Vendor1", "Vendor 1", UserRole::Vendor),
    ("Vendor2", "Vendor 2", UserRole::Vendor),
];

/// (company, creator username, vendor username)
const DEMO_EVENTS: [(&str, &str, &str); 4] = [
    ("ABC", "HR1", "Vendor1"),
    ("DEF", "HR1", "Vendor2"),
    ("GHI", "HR2", "Vendor1"),
    ("JKL", "HR2", "Vendor2"),
];

const DEMO_LOCATION: &str = "Jl. Kyai Maja No.43, Gunung, Kec. Kby. Baru, Kota Jakarta Selatan, Daerah Khusus Ibukota Jakarta 12120";
const DEMO_EVENT_NAME: &str = "Vaccine boost";

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to hash demo password: {0}")]
    Hashing(#[from] AuthError),
    #[error("database error: {0}")]
    Store(#[from] sqlx::Error),
}

/// What a seeding run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub events: usize,
}

/// Insert the demo users and events. Proposed dates are `today` and the two
/// following days.
pub async fn seed_demo_data<S>(store: &S, today: Date) -> Result<SeedReport, SeedError>
where
    S: Processor<CountUsers, Output = i64, Error = sqlx::Error>
        + Processor<CreateUser, Output = UserRecord, Error = sqlx::Error>
        + Processor<GetUserByUsername, Output = Option<UserRecord>, Error = sqlx::Error>
        + Processor<CountEvents, Output = i64, Error = sqlx::Error>
        + Processor<InsertEvent, Output = i64, Error = sqlx::Error>,
{
    let mut report = SeedReport::default();

    if store.process(CountUsers).await? > 0 {
        tracing::info!("Users already seeded");
    } else {
        let password_hash = hash_password(DEMO_PASSWORD)?;
        for (username, full_name, role) in DEMO_USERS {
            store
                .process(CreateUser {
                    username: username.to_string(),
                    password_hash: password_hash.clone(),
                    full_name: full_name.to_string(),
                    role,
                })
                .await?;
            report.users += 1;
        }
        tracing::info!(count = report.users, "Users table seeded");
    }

    if store.process(CountEvents).await? > 0 {
        tracing::info!("Events already seeded");
        return Ok(report);
    }

    let proposed_dates: Vec<Date> = (0..3)
        .filter_map(|offset| today.checked_add(Duration::days(offset)))
        .collect();

    for (company, creator, vendor) in DEMO_EVENTS {
        let creator = store
            .process(GetUserByUsername {
                username: creator.to_string(),
            })
            .await?;
        let vendor = store
            .process(GetUserByUsername {
                username: vendor.to_string(),
            })
            .await?;
        let (Some(creator), Some(vendor)) = (creator, vendor) else {
            tracing::warn!(company, "Skipping demo event: seeded users are missing");
            continue;
        };

        store
            .process(InsertEvent {
                company_name: company.to_string(),
                proposed_dates: proposed_dates.clone(),
                location: DEMO_LOCATION.to_string(),
                event_name: DEMO_EVENT_NAME.to_string(),
                vendor_id: vendor.id,
                created_by: creator.id,
            })
            .await?;
        report.events += 1;
    }
    tracing::info!(count = report.events, "Events table seeded");

    Ok(report)
}
