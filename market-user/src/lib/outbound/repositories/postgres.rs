use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use crate::domain::user::models::NationalCode;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::CredentialStore;
use crate::user::errors::UserError;

const USER_COLUMNS: &str =
    "id, first_name, last_name, national_code, password, last_login, created_at, deleted_at";

pub struct PostgresCredentialStore {
    pool: PgPool,
    timeout: Duration,
}

impl PostgresCredentialStore {
    /// # Arguments
    /// * `pool` - Connection pool; each call holds one connection for its duration
    /// * `timeout` - Deadline for a single query or transaction
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Run one store operation under the deadline. Dropping the future on
    /// expiry returns its connection and rolls back any open transaction.
    async fn bounded<T, F>(&self, operation: &'static str, future: F) -> Result<T, UserError>
    where
        F: Future<Output = Result<T, UserError>>,
    {
        tokio::time::timeout(self.timeout, future)
            .await
            .map_err(|_| UserError::Timeout(operation.to_string()))?
    }

    async fn find_one(&self, query: &str, bind: Bind<'_>) -> Result<Option<User>, UserError> {
        let query = sqlx::query_as::<_, UserRow>(query);
        let query = match bind {
            Bind::Id(id) => query.bind(id),
            Bind::Text(text) => query.bind(text),
        };

        query
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?
            .map(User::try_from)
            .transpose()
    }
}

enum Bind<'a> {
    Id(i64),
    Text(&'a str),
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    first_name: String,
    last_name: String,
    national_code: String,
    password: String,
    last_login: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            first_name: PersonName::new("first name", row.first_name)?,
            last_name: PersonName::new("last name", row.last_name)?,
            national_code: NationalCode::new(row.national_code)?,
            password_hash: row.password,
            last_login: row.last_login,
            created_at: row.created_at,
            deleted_at: row.deleted_at,
        })
    }
}

fn database_error(e: sqlx::Error) -> UserError {
    UserError::DatabaseError(e.to_string())
}

fn expect_single_row(rows_affected: u64, operation: &str, id: UserId) -> Result<(), UserError> {
    // The caller was authorized against an active record, so anything else is a bug.
    if rows_affected != 1 {
        return Err(UserError::InvariantViolation(format!(
            "{} affected {} rows for user {}",
            operation, rows_affected, id
        )));
    }
    Ok(())
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        self.bounded("create user", async {
            let mut tx = self.pool.begin().await.map_err(database_error)?;

            let row = sqlx::query_as::<_, UserRow>(&format!(
                r#"
                INSERT INTO market_user (first_name, last_name, national_code, password)
                VALUES ($1, $2, $3, $4)
                RETURNING {}
                "#,
                USER_COLUMNS
            ))
            .bind(user.first_name.as_str())
            .bind(user.last_name.as_str())
            .bind(user.national_code.as_str())
            .bind(user.password_hash.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return UserError::NationalCodeAlreadyExists(
                            user.national_code.to_string(),
                        );
                    }
                }
                database_error(e)
            })?;

            tx.commit().await.map_err(database_error)?;

            User::try_from(row)
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError> {
        let query = format!("SELECT {} FROM market_user WHERE id = $1", USER_COLUMNS);

        self.bounded("find user by id", self.find_one(&query, Bind::Id(id.0)))
            .await
    }

    async fn find_by_national_code(
        &self,
        national_code: &NationalCode,
    ) -> Result<Option<User>, UserError> {
        // Active row first (false sorts before true), then the newest deleted one.
        let query = format!(
            r#"
            SELECT {}
            FROM market_user
            WHERE national_code = $1
            ORDER BY deleted_at IS NOT NULL, id DESC
            LIMIT 1
            "#,
            USER_COLUMNS
        );

        self.bounded(
            "find user by national code",
            self.find_one(&query, Bind::Text(national_code.as_str())),
        )
        .await
    }

    async fn update_password_hash(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), UserError> {
        self.bounded("update password", async {
            let mut tx = self.pool.begin().await.map_err(database_error)?;

            let result = sqlx::query(
                r#"
                UPDATE market_user
                SET password = $1
                WHERE id = $2 AND deleted_at IS NULL
                "#,
            )
            .bind(password_hash)
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;

            // Returning early drops the transaction, which rolls it back.
            expect_single_row(result.rows_affected(), "password update", id)?;

            tx.commit().await.map_err(database_error)
        })
        .await
    }

    async fn soft_delete(&self, id: UserId) -> Result<(), UserError> {
        self.bounded("soft delete user", async {
            let mut tx = self.pool.begin().await.map_err(database_error)?;

            let result = sqlx::query(
                r#"
                UPDATE market_user
                SET deleted_at = NOW()
                WHERE id = $1 AND deleted_at IS NULL
                "#,
            )
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;

            expect_single_row(result.rows_affected(), "soft delete", id)?;

            tx.commit().await.map_err(database_error)
        })
        .await
    }

    async fn record_login(&self, id: UserId) -> Result<(), UserError> {
        self.bounded("record login", async {
            sqlx::query("UPDATE market_user SET last_login = NOW() WHERE id = $1")
                .bind(id.0)
                .execute(&self.pool)
                .await
                .map_err(database_error)?;
            Ok(())
        })
        .await
    }
}
