use sqlx::PgPool;

/// Executes repository queries against the shared Postgres pool.
///
/// Every query type in [`crate::entities`] is a `kanau` [`Processor`] input
/// for this type, so services take it (or a test double) by value instead of
/// reaching for a global handle.
///
/// [`Processor`]: kanau::processor::Processor
#[derive(Clone)]
pub struct DatabaseProcessor {
    pub pool: PgPool,
}

impl DatabaseProcessor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
