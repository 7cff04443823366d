/// Common test utilities for store integration tests
///
/// These tests need a live PostgreSQL instance. They are skipped (with a
/// note on stderr) when DATABASE_URL is not set, so the unit suite stays
/// runnable anywhere.

use cadence_store::authz::Caller;
use cadence_store::db::migrations::run_migrations;
use cadence_store::models::user::{CreateUser, User, UserRole};
use cadence_store::store::TaskStore;
use sqlx::PgPool;

/// Test context: a migrated pool, a store and one fresh user
pub struct TestContext {
    pub db: PgPool,
    pub store: TaskStore,
    pub user: User,
}

impl TestContext {
    /// Creates a context against DATABASE_URL, or None to skip the test
    pub async fn try_new() -> Option<Self> {
        let url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("skipping: DATABASE_URL not set");
                return None;
            }
        };

        let db = PgPool::connect(&url).await.expect("connect to test database");
        run_migrations(&db).await.expect("run migrations");

        let user = create_test_user(&db, "Test User").await;

        Some(TestContext {
            store: TaskStore::new(db.clone()),
            db,
            user,
        })
    }

    /// Caller context for the test user
    pub fn caller(&self) -> Caller {
        Caller::new(self.user.id.clone(), self.user.role)
    }

    /// Caller context for another user with the given role
    pub async fn other_caller(&self, role: UserRole) -> Caller {
        let user = create_test_user(&self.db, "Other User").await;
        if role != UserRole::User {
            sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
                .bind(&user.id)
                .bind(role)
                .execute(&self.db)
                .await
                .expect("set role");
        }
        Caller::new(user.id, role)
    }
}

/// Creates a user with a unique email
pub async fn create_test_user(db: &PgPool, name: &str) -> User {
    User::create(
        db,
        CreateUser {
            id: None,
            name: name.to_string(),
            email: format!("test-{}@example.com", cadence_store::id::new_id()),
            image: None,
        },
    )
    .await
    .expect("create test user")
}

/// Skips the surrounding test when no database is available
#[macro_export]
macro_rules! require_db {
    () => {
        match common::TestContext::try_new().await {
            Some(ctx) => ctx,
            None => return,
        }
    };
}
