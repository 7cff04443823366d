/// External account linkage
///
/// One row per (provider, provider account) pair, written by the auth
/// collaborator when a user signs in with an identity provider. The store
/// persists the OAuth token fields opaquely and never interprets them.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE accounts (
///     user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     type VARCHAR(50) NOT NULL,
///     provider VARCHAR(255) NOT NULL,
///     provider_account_id VARCHAR(255) NOT NULL,
///     refresh_token TEXT,
///     access_token TEXT,
///     expires_at TIMESTAMPTZ,
///     token_type VARCHAR(50),
///     scope TEXT,
///     id_token TEXT,
///     session_state TEXT,
///     PRIMARY KEY (provider, provider_account_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Linked external identity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    /// User this identity is linked to
    pub user_id: String,

    /// Account type reported by the provider (e.g. "oauth")
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub account_type: String,

    /// Provider name (e.g. "github")
    pub provider: String,

    /// Provider-side account id
    pub provider_account_id: String,

    /// OAuth refresh token
    pub refresh_token: Option<String>,

    /// OAuth access token
    pub access_token: Option<String>,

    /// Access token expiry
    pub expires_at: Option<DateTime<Utc>>,

    /// OAuth token type
    pub token_type: Option<String>,

    /// Granted scopes
    pub scope: Option<String>,

    /// OpenID Connect id token
    pub id_token: Option<String>,

    /// Provider session state
    pub session_state: Option<String>,
}

/// Input for linking an external account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkAccount {
    pub user_id: String,
    pub account_type: String,
    pub provider: String,
    pub provider_account_id: String,
    pub refresh_token: Option<String>,
    pub access_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub id_token: Option<String>,
    pub session_state: Option<String>,
}

impl Account {
    /// Links an external identity to a user
    pub async fn link(pool: &PgPool, data: LinkAccount) -> Result<Self, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (user_id, type, provider, provider_account_id,
                                  refresh_token, access_token, expires_at,
                                  token_type, scope, id_token, session_state)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING user_id, type, provider, provider_account_id,
                      refresh_token, access_token, expires_at, token_type,
                      scope, id_token, session_state
            "#,
        )
        .bind(data.user_id)
        .bind(data.account_type)
        .bind(data.provider)
        .bind(data.provider_account_id)
        .bind(data.refresh_token)
        .bind(data.access_token)
        .bind(data.expires_at)
        .bind(data.token_type)
        .bind(data.scope)
        .bind(data.id_token)
        .bind(data.session_state)
        .fetch_one(pool)
        .await?;

        Ok(account)
    }

    /// Finds a linked account by its composite provider key
    pub async fn find_by_provider(
        pool: &PgPool,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT user_id, type, provider, provider_account_id,
                   refresh_token, access_token, expires_at, token_type,
                   scope, id_token, session_state
            FROM accounts
            WHERE provider = $1 AND provider_account_id = $2
            "#,
        )
        .bind(provider)
        .bind(provider_account_id)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    /// Lists all identities linked to a user
    pub async fn list_by_user(pool: &PgPool, user_id: &str) -> Result<Vec<Self>, sqlx::Error> {
        let accounts = sqlx::query_as::<_, Account>(
            r#"
            SELECT user_id, type, provider, provider_account_id,
                   refresh_token, access_token, expires_at, token_type,
                   scope, id_token, session_state
            FROM accounts
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(accounts)
    }

    /// Unlinks an external identity
    pub async fn unlink(
        pool: &PgPool,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM accounts WHERE provider = $1 AND provider_account_id = $2")
                .bind(provider)
                .bind(provider_account_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
