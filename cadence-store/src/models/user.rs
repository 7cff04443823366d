/// User model and database operations
///
/// Users are created by the external auth collaborator on first sign-in
/// (possibly with a provider-supplied id) and updated through the
/// profile-settings operations of the store.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('ADMIN', 'USER', 'RESTRICTED');
/// CREATE TYPE color_theme AS ENUM (
///     'bland', 'bumblebee', 'coffee', 'cupcake',
///     'forest', 'galaxy', 'lavender', 'valentine'
/// );
/// CREATE TYPE ld_theme AS ENUM ('light', 'dark');
///
/// CREATE TABLE users (
///     id TEXT PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL,
///     email_verified TIMESTAMPTZ,
///     image VARCHAR(512),
///     role user_role NOT NULL DEFAULT 'USER',
///     color_theme color_theme NOT NULL DEFAULT 'galaxy',
///     ld_theme ld_theme NOT NULL DEFAULT 'dark',
///     show_completed_tasks_default BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::id::new_id;

/// Role granted to a user account
///
/// ADMIN bypasses ownership checks; RESTRICTED exists for moderation and
/// carries no extra capability in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// May mutate any resource
    Admin,

    /// Default role, may mutate own resources
    User,

    /// Limited account
    Restricted,
}

impl UserRole {
    /// Converts role to string for display and logging
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::User => "USER",
            UserRole::Restricted => "RESTRICTED",
        }
    }

    /// Checks if this role bypasses ownership checks
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// UI color theme, one of a fixed palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "color_theme", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    Bland,
    Bumblebee,
    Coffee,
    Cupcake,
    Forest,
    Galaxy,
    Lavender,
    Valentine,
}

impl ColorTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorTheme::Bland => "bland",
            ColorTheme::Bumblebee => "bumblebee",
            ColorTheme::Coffee => "coffee",
            ColorTheme::Cupcake => "cupcake",
            ColorTheme::Forest => "forest",
            ColorTheme::Galaxy => "galaxy",
            ColorTheme::Lavender => "lavender",
            ColorTheme::Valentine => "valentine",
        }
    }
}

/// Light/dark theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ld_theme", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LdTheme {
    Light,
    Dark,
}

/// User model representing an account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Opaque id, generated or provider-supplied
    pub id: String,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// When the email was verified (None if unverified)
    pub email_verified: Option<DateTime<Utc>>,

    /// Current avatar URL
    ///
    /// Plain URL, not a foreign key into profile_pictures: provider avatars
    /// from first sign-in never exist in that table.
    pub image: Option<String>,

    /// Account role
    pub role: UserRole,

    /// UI color theme
    pub color_theme: ColorTheme,

    /// Light/dark preference
    pub ld_theme: LdTheme,

    /// Default for the include-completed filter when listing tasks
    pub show_completed_tasks_default: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
///
/// Called by the auth collaborator on first sign-in; the id is optional
/// because identity providers may bring their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Provider-supplied id, or None to generate one
    pub id: Option<String>,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Provider avatar URL, if any
    pub image: Option<String>,
}

/// Patch for user preferences
///
/// Closed on purpose: only the profile-settings fields are reachable.
/// Role, email and verification state cannot be changed through this type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferencesPatch {
    /// New display name
    pub name: Option<String>,

    /// New avatar URL (use Some(None) to clear)
    pub image: Option<Option<String>>,

    /// New color theme
    pub color_theme: Option<ColorTheme>,

    /// New light/dark preference
    pub ld_theme: Option<LdTheme>,

    /// New default for the include-completed listing filter
    pub show_completed_tasks_default: Option<bool>,
}

impl PreferencesPatch {
    /// Checks whether the patch changes anything
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.image.is_none()
            && self.color_theme.is_none()
            && self.ld_theme.is_none()
            && self.show_completed_tasks_default.is_none()
    }
}

impl User {
    /// Creates a new user with default role and themes
    ///
    /// # Errors
    ///
    /// Returns an error if the id already exists or the database fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let id = data.id.unwrap_or_else(new_id);

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, image)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, email_verified, image, role, color_theme,
                      ld_theme, show_completed_tasks_default, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.email)
        .bind(data.image)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by id
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, email_verified, image, role, color_theme,
                   ld_theme, show_completed_tasks_default, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    ///
    /// Used by the auth collaborator to decide between sign-in and first
    /// sign-up.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, email_verified, image, role, color_theme,
                   ld_theme, show_completed_tasks_default, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Marks a user's email as verified now
    pub async fn mark_email_verified(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email_verified = NOW(),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Applies a preferences patch
    ///
    /// Only non-None fields are updated; `updated_at` is bumped. Returns the
    /// updated user, or None if the user does not exist.
    pub async fn update_preferences(
        pool: &PgPool,
        id: &str,
        patch: PreferencesPatch,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut bind_count = 1;

        if patch.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if patch.image.is_some() {
            bind_count += 1;
            query.push_str(&format!(", image = ${}", bind_count));
        }
        if patch.color_theme.is_some() {
            bind_count += 1;
            query.push_str(&format!(", color_theme = ${}", bind_count));
        }
        if patch.ld_theme.is_some() {
            bind_count += 1;
            query.push_str(&format!(", ld_theme = ${}", bind_count));
        }
        if patch.show_completed_tasks_default.is_some() {
            bind_count += 1;
            query.push_str(&format!(", show_completed_tasks_default = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, email, email_verified, image, role, \
             color_theme, ld_theme, show_completed_tasks_default, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(name) = patch.name {
            q = q.bind(name);
        }
        if let Some(image) = patch.image {
            q = q.bind(image);
        }
        if let Some(color_theme) = patch.color_theme {
            q = q.bind(color_theme);
        }
        if let Some(ld_theme) = patch.ld_theme {
            q = q.bind(ld_theme);
        }
        if let Some(show) = patch.show_completed_tasks_default {
            q = q.bind(show);
        }

        let user = q.fetch_optional(pool).await?;

        Ok(user)
    }

    /// Deletes a user by id
    ///
    /// Auth rows (accounts, sessions, profile pictures) cascade at the schema
    /// level; tasks do not, so callers must delete the user's tasks first.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_as_str() {
        assert_eq!(UserRole::Admin.as_str(), "ADMIN");
        assert_eq!(UserRole::User.as_str(), "USER");
        assert_eq!(UserRole::Restricted.as_str(), "RESTRICTED");
    }

    #[test]
    fn test_user_role_is_admin() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::User.is_admin());
        assert!(!UserRole::Restricted.is_admin());
    }

    #[test]
    fn test_color_theme_serde_round_trip() {
        let json = serde_json::to_string(&ColorTheme::Galaxy).unwrap();
        assert_eq!(json, "\"galaxy\"");

        let theme: ColorTheme = serde_json::from_str("\"valentine\"").unwrap();
        assert_eq!(theme, ColorTheme::Valentine);
    }

    #[test]
    fn test_color_theme_rejects_unknown_value() {
        let result = serde_json::from_str::<ColorTheme>("\"chartreuse\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_preferences_patch_default_is_empty() {
        let patch = PreferencesPatch::default();
        assert!(patch.is_empty());

        let patch = PreferencesPatch {
            ld_theme: Some(LdTheme::Light),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
