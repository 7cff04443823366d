/// Integration tests for the Task Tracking Store contract
///
/// These verify the database-backed behavior that the unit suite cannot:
/// cascade deletion atomicity, ownership failures against real rows, the
/// listing filter, and cycle status computed over persisted completions.
/// Requires DATABASE_URL; each test is skipped without it.

mod common;

use cadence_store::error::StoreError;
use cadence_store::models::task::{NewTask, TaskPatch, Timeframe};
use cadence_store::models::user::{LdTheme, PreferencesPatch, UserRole};
use cadence_store::store::ListTasksOptions;
use chrono::{Duration, Utc};

fn new_task(title: &str, quota: i32, timeframe: Timeframe) -> NewTask {
    NewTask {
        title: title.to_string(),
        times_to_complete: quota,
        timeframe,
    }
}

#[tokio::test]
async fn test_create_task_validation() {
    let ctx = require_db!();
    let caller = ctx.caller();

    // Zero quota is rejected
    let err = ctx
        .store
        .create_task(&caller, new_task("stretch", 0, Timeframe::Day))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    // Empty title is rejected
    let err = ctx
        .store
        .create_task(&caller, new_task("   ", 1, Timeframe::Day))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    // A valid weekly task starts at progress 0/3
    let task = ctx
        .store
        .create_task(&caller, new_task("run", 3, Timeframe::Week))
        .await
        .unwrap();
    assert_eq!(task.times_to_complete, 3);

    let status = ctx.store.get_task(&caller, &task.id).await.unwrap();
    assert_eq!(status.completions_this_cycle, 0);
    assert_eq!(status.progress, 0.0);
    assert!(!status.complete);
}

#[tokio::test]
async fn test_quota_met_after_exact_count() {
    let ctx = require_db!();
    let caller = ctx.caller();

    let task = ctx
        .store
        .create_task(&caller, new_task("meditate", 3, Timeframe::Week))
        .await
        .unwrap();

    for expected in 1..=2i64 {
        ctx.store.record_completion(&caller, &task.id).await.unwrap();
        let status = ctx.store.get_task(&caller, &task.id).await.unwrap();
        assert_eq!(status.completions_this_cycle, expected);
        assert!(!status.complete, "incomplete after {} of 3", expected);
    }

    ctx.store.record_completion(&caller, &task.id).await.unwrap();
    let status = ctx.store.get_task(&caller, &task.id).await.unwrap();
    assert_eq!(status.completions_this_cycle, 3);
    assert!(status.complete);
    assert_eq!(status.progress, 1.0);
}

#[tokio::test]
async fn test_new_window_starts_fresh_count() {
    let ctx = require_db!();
    let caller = ctx.caller();

    let task = ctx
        .store
        .create_task(&caller, new_task("journal", 2, Timeframe::Day))
        .await
        .unwrap();

    // Backdate creation 30 hours so the second daily window is current,
    // and plant two completions inside the first window.
    let created = Utc::now() - Duration::hours(30);
    sqlx::query("UPDATE tasks SET created_at = $2 WHERE id = $1")
        .bind(&task.id)
        .bind(created)
        .execute(&ctx.db)
        .await
        .unwrap();
    for hours in [5i64, 20] {
        sqlx::query(
            "INSERT INTO task_completions (id, task_id, user_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $4)",
        )
        .bind(cadence_store::id::new_id())
        .bind(&task.id)
        .bind(&ctx.user.id)
        .bind(created + Duration::hours(hours))
        .execute(&ctx.db)
        .await
        .unwrap();
    }

    // The prior window's two completions do not carry into this one
    let status = ctx.store.get_task(&caller, &task.id).await.unwrap();
    assert_eq!(status.completions_this_cycle, 0);
    assert!(!status.complete);

    // One completion now makes this window 1/2
    ctx.store.record_completion(&caller, &task.id).await.unwrap();
    let status = ctx.store.get_task(&caller, &task.id).await.unwrap();
    assert_eq!(status.completions_this_cycle, 1);
    assert!(!status.complete);

    // History still holds all three events
    let history = ctx.store.list_completions(&caller, &task.id).await.unwrap();
    assert_eq!(history.len(), 3);
}

#[tokio::test]
async fn test_delete_task_cascades() {
    let ctx = require_db!();
    let caller = ctx.caller();

    let task = ctx
        .store
        .create_task(&caller, new_task("tidy desk", 1, Timeframe::Day))
        .await
        .unwrap();
    ctx.store.record_completion(&caller, &task.id).await.unwrap();
    ctx.store
        .add_comment(&caller, &task.id, "done early today")
        .await
        .unwrap();

    ctx.store.delete_task(&caller, &task.id).await.unwrap();

    // No orphans remain
    let (completions,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM task_completions WHERE task_id = $1")
            .bind(&task.id)
            .fetch_one(&ctx.db)
            .await
            .unwrap();
    let (comments,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE task_id = $1")
        .bind(&task.id)
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(completions, 0);
    assert_eq!(comments, 0);

    // Querying the task afterward is NotFound
    let err = ctx.store.list_comments(&caller, &task.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn test_completion_ownership_and_not_found() {
    let ctx = require_db!();
    let caller = ctx.caller();

    // Unknown task id
    let err = ctx
        .store
        .record_completion(&caller, "zzzzzzzzzzzz")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));

    let task = ctx
        .store
        .create_task(&caller, new_task("practice", 1, Timeframe::Day))
        .await
        .unwrap();

    // Another plain user cannot complete it
    let stranger = ctx.other_caller(UserRole::User).await;
    let err = ctx
        .store
        .record_completion(&stranger, &task.id)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Authorization(_)));

    // An admin can
    let admin = ctx.other_caller(UserRole::Admin).await;
    ctx.store.record_completion(&admin, &task.id).await.unwrap();
}

#[tokio::test]
async fn test_listing_filters_completed_tasks() {
    let ctx = require_db!();
    let caller = ctx.caller();

    let done = ctx
        .store
        .create_task(&caller, new_task("feed the cat", 1, Timeframe::Day))
        .await
        .unwrap();
    ctx.store.record_completion(&caller, &done.id).await.unwrap();

    let open = ctx
        .store
        .create_task(&caller, new_task("water plants", 2, Timeframe::Week))
        .await
        .unwrap();

    // Explicit include: both show up, newest first
    let all = ctx
        .store
        .list_tasks_for_user(
            &caller,
            &ctx.user.id,
            ListTasksOptions {
                include_completed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(all.len() >= 2);
    assert_eq!(all[0].task.id, open.id);

    // Default defers to the user preference (false for fresh users)
    let visible = ctx
        .store
        .list_tasks_for_user(&caller, &ctx.user.id, ListTasksOptions::default())
        .await
        .unwrap();
    assert!(visible.iter().all(|t| !t.complete));
    assert!(visible.iter().any(|t| t.task.id == open.id));
    assert!(!visible.iter().any(|t| t.task.id == done.id));

    // A stranger may not list someone else's tasks
    let stranger = ctx.other_caller(UserRole::User).await;
    let err = ctx
        .store
        .list_tasks_for_user(&stranger, &ctx.user.id, ListTasksOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Authorization(_)));
}

#[tokio::test]
async fn test_comments_are_collaborative_but_deletion_is_not() {
    let ctx = require_db!();
    let caller = ctx.caller();

    let task = ctx
        .store
        .create_task(&caller, new_task("read a chapter", 1, Timeframe::Day))
        .await
        .unwrap();

    // Any authenticated user may comment
    let friend = ctx.other_caller(UserRole::User).await;
    let first = ctx
        .store
        .add_comment(&friend, &task.id, "which book?")
        .await
        .unwrap();
    let second = ctx
        .store
        .add_comment(&caller, &task.id, "the one you lent me")
        .await
        .unwrap();

    // Empty comments are rejected
    let err = ctx.store.add_comment(&caller, &task.id, "  ").await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    // Chronological thread for the task owner
    let thread = ctx.store.list_comments(&caller, &task.id).await.unwrap();
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[0].id, first.id);
    assert_eq!(thread[1].id, second.id);

    // Only the author (or an admin) may delete
    let err = ctx
        .store
        .delete_comment(&caller, &first.id)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Authorization(_)));
    ctx.store.delete_comment(&friend, &first.id).await.unwrap();
}

#[tokio::test]
async fn test_update_task_and_preferences() {
    let ctx = require_db!();
    let caller = ctx.caller();

    let task = ctx
        .store
        .create_task(&caller, new_task("stretch", 1, Timeframe::Day))
        .await
        .unwrap();

    // Patch bumps updated_at and rejects a bad quota
    let updated = ctx
        .store
        .update_task(
            &caller,
            &task.id,
            TaskPatch {
                times_to_complete: Some(2),
                timeframe: Some(Timeframe::Week),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.times_to_complete, 2);
    assert_eq!(updated.timeframe, Timeframe::Week);
    assert!(updated.updated_at >= task.updated_at);

    let err = ctx
        .store
        .update_task(
            &caller,
            &task.id,
            TaskPatch {
                times_to_complete: Some(0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    // Preferences patch touches only the profile-settings fields
    let user = ctx
        .store
        .update_user_preferences(
            &caller,
            PreferencesPatch {
                ld_theme: Some(LdTheme::Light),
                show_completed_tasks_default: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(user.ld_theme, LdTheme::Light);
    assert!(user.show_completed_tasks_default);
    assert_eq!(user.role, ctx.user.role);

    // With the preference flipped, the default listing includes completed
    ctx.store.record_completion(&caller, &task.id).await.unwrap();
    ctx.store.record_completion(&caller, &task.id).await.unwrap();
    let visible = ctx
        .store
        .list_tasks_for_user(&caller, &ctx.user.id, ListTasksOptions::default())
        .await
        .unwrap();
    assert!(visible.iter().any(|t| t.task.id == task.id && t.complete));
}
