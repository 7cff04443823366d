/// Verification token persistence
///
/// One-shot tokens used by the auth collaborator for email verification:
/// created before the email goes out, consumed (deleted) exactly once when
/// the link is followed.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE verification_tokens (
///     identifier TEXT NOT NULL,
///     token TEXT NOT NULL,
///     expires TIMESTAMPTZ NOT NULL,
///     PRIMARY KEY (identifier, token)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// One-shot verification token
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VerificationToken {
    /// What is being verified (usually an email address)
    pub identifier: String,

    /// The token value
    pub token: String,

    /// Expiry timestamp
    pub expires: DateTime<Utc>,
}

impl VerificationToken {
    /// Persists a freshly minted token
    pub async fn create(
        pool: &PgPool,
        identifier: &str,
        token: &str,
        expires: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        let vt = sqlx::query_as::<_, VerificationToken>(
            r#"
            INSERT INTO verification_tokens (identifier, token, expires)
            VALUES ($1, $2, $3)
            RETURNING identifier, token, expires
            "#,
        )
        .bind(identifier)
        .bind(token)
        .bind(expires)
        .fetch_one(pool)
        .await?;

        Ok(vt)
    }

    /// Consumes a token: deletes it and returns it if it existed
    ///
    /// Single DELETE .. RETURNING so two concurrent uses cannot both
    /// succeed. Expiry is left to the caller to judge (the auth collaborator
    /// may want to show "link expired" rather than "link invalid").
    pub async fn consume(
        pool: &PgPool,
        identifier: &str,
        token: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let vt = sqlx::query_as::<_, VerificationToken>(
            r#"
            DELETE FROM verification_tokens
            WHERE identifier = $1 AND token = $2
            RETURNING identifier, token, expires
            "#,
        )
        .bind(identifier)
        .bind(token)
        .fetch_optional(pool)
        .await?;

        Ok(vt)
    }
}
