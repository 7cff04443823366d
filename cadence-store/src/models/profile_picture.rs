/// ProfilePicture model and database operations
///
/// A user may accumulate many uploaded avatars; the "current" one is
/// whichever URL `users.image` points at. That column is deliberately not a
/// foreign key into this table (provider avatars never appear here), so the
/// linkage stays loose.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE profile_pictures (
///     id TEXT PRIMARY KEY,
///     user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     url VARCHAR(512) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::id::new_id;

/// One uploaded avatar
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProfilePicture {
    /// Opaque picture id
    pub id: String,

    /// Owning user
    pub user_id: String,

    /// Picture URL
    pub url: String,

    /// When the picture was uploaded
    pub created_at: DateTime<Utc>,
}

impl ProfilePicture {
    /// Records an uploaded avatar for a user
    pub async fn create(pool: &PgPool, user_id: &str, url: &str) -> Result<Self, sqlx::Error> {
        let picture = sqlx::query_as::<_, ProfilePicture>(
            r#"
            INSERT INTO profile_pictures (id, user_id, url)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, url, created_at
            "#,
        )
        .bind(new_id())
        .bind(user_id)
        .bind(url)
        .fetch_one(pool)
        .await?;

        Ok(picture)
    }

    /// Lists a user's uploaded avatars, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: &str) -> Result<Vec<Self>, sqlx::Error> {
        let pictures = sqlx::query_as::<_, ProfilePicture>(
            r#"
            SELECT id, user_id, url, created_at
            FROM profile_pictures
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(pictures)
    }

    /// Deletes an uploaded avatar
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM profile_pictures WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
