use crate::entities::UserRole;
use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;

/// A stored user. The role is fixed at creation; there is no update query
/// for it and the schema rejects one.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: UserRole,
}

#[derive(Debug, Clone)]
/// Exact-match lookup by username.
pub struct GetUserByUsername {
    pub username: String,
}

impl Processor<GetUserByUsername> for DatabaseProcessor {
    type Output = Option<UserRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetUserByUsername")]
    async fn process(&self, query: GetUserByUsername) -> Result<Option<UserRecord>, sqlx::Error> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, password_hash, full_name, role
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(query.username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[derive(Debug, Clone)]
pub struct GetUserById {
    pub user_id: i64,
}

impl Processor<GetUserById> for DatabaseProcessor {
    type Output = Option<UserRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetUserById")]
    async fn process(&self, query: GetUserById) -> Result<Option<UserRecord>, sqlx::Error> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, password_hash, full_name, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(query.user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[derive(Debug, Clone)]
/// Insert a user. A duplicate username fails with a unique violation.
pub struct CreateUser {
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: UserRole,
}

impl Processor<CreateUser> for DatabaseProcessor {
    type Output = UserRecord;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateUser")]
    async fn process(&self, cmd: CreateUser) -> Result<UserRecord, sqlx::Error> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (username, password_hash, full_name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, full_name, role
            "#,
        )
        .bind(cmd.username)
        .bind(cmd.password_hash)
        .bind(cmd.full_name)
        .bind(cmd.role)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CountUsers;

impl Processor<CountUsers> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CountUsers")]
    async fn process(&self, _query: CountUsers) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
    }
}
