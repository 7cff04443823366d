/// Session persistence
///
/// Session lifecycle (issuance, rotation, revocation) is owned by the
/// external auth collaborator; the store only persists the rows and answers
/// token lookups. The API's auth middleware resolves a bearer token through
/// [`Session::find_by_token`] and treats an expired row as absent.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sessions (
///     session_token TEXT PRIMARY KEY,
///     user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     expires TIMESTAMPTZ NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Persisted session row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// Opaque token minted by the auth collaborator
    pub session_token: String,

    /// User the session belongs to
    pub user_id: String,

    /// Expiry timestamp
    pub expires: DateTime<Utc>,
}

impl Session {
    /// Persists a session issued by the auth collaborator
    pub async fn create(
        pool: &PgPool,
        session_token: &str,
        user_id: &str,
        expires: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (session_token, user_id, expires)
            VALUES ($1, $2, $3)
            RETURNING session_token, user_id, expires
            "#,
        )
        .bind(session_token)
        .bind(user_id)
        .bind(expires)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    /// Finds a session by token
    pub async fn find_by_token(
        pool: &PgPool,
        session_token: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT session_token, user_id, expires
            FROM sessions
            WHERE session_token = $1
            "#,
        )
        .bind(session_token)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Checks whether the session is still valid at `now`
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.expires > now
    }

    /// Deletes a session (sign-out)
    pub async fn delete(pool: &PgPool, session_token: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE session_token = $1")
            .bind(session_token)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes all expired sessions, returns how many were removed
    pub async fn delete_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires <= NOW()")
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
