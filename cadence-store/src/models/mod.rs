/// Database models for Cadence
///
/// This module contains all database rows and their CRUD operations. Model
/// functions take a pool (or transaction) and return raw rows; ownership
/// checks and validation live one level up in [`crate::store`].
///
/// # Models
///
/// - `user`: User accounts, roles and theme preferences
/// - `account`: External identity linkage (written by the auth collaborator)
/// - `session`: Opaque session tokens (issued by the auth collaborator)
/// - `verification_token`: One-shot email verification tokens
/// - `profile_picture`: Uploaded avatars, many per user
/// - `task`: Recurring tasks with a completion cadence
/// - `completion`: One completion event toward a task's current cycle
/// - `comment`: Collaborative comments on tasks
///
/// # Example
///
/// ```no_run
/// use cadence_store::models::user::{CreateUser, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(
///     &pool,
///     CreateUser {
///         id: None,
///         name: "Ada".to_string(),
///         email: "ada@example.com".to_string(),
///         image: None,
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod account;
pub mod comment;
pub mod completion;
pub mod profile_picture;
pub mod session;
pub mod task;
pub mod user;
pub mod verification_token;
