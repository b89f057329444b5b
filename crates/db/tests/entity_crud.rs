//! Integration tests for plain CRUD paths not covered by the aggregate
//! and soft-delete suites: moderation, comments, history dedup,
//! notifications, and orders.

use sqlx::PgPool;
use toolhub_db::models::comment::{CreateComment, UpdateComment, VOTE_DISLIKE, VOTE_LIKE};
use toolhub_db::models::history::{HistoryListParams, TrackAction};
use toolhub_db::models::notification::{CreateNotification, NotificationListParams};
use toolhub_db::models::order::UpdateOrderStatus;
use toolhub_db::models::course::CreateCourse;
use toolhub_db::models::tool::{CreateTool, STATUS_APPROVED, STATUS_PENDING, STATUS_REJECTED};
use toolhub_db::models::user::CreateUser;
use toolhub_db::repositories::comment_repo::VoteOutcome;
use toolhub_db::repositories::{
    CommentRepo, CourseHistoryRepo, CourseRepo, HistoryRepo, NotificationRepo, OrderRepo, ToolRepo,
    UserRepo,
};
use toolhub_core::types::DbId;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, name: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "$argon2id$test".to_string(),
            email_verified: true,
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_approved_tool(pool: &PgPool, name: &str, admin: DbId) -> DbId {
    let tool = ToolRepo::create(
        pool,
        &CreateTool {
            name: name.to_string(),
            description: "crud test".to_string(),
            category: "coding".to_string(),
            tags: vec![],
            website: None,
            pricing: None,
            features: vec![],
        },
        admin,
    )
    .await
    .unwrap();
    ToolRepo::approve(pool, tool.id, admin).await.unwrap();
    tool.id
}

// ---------------------------------------------------------------------------
// Tool moderation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn submission_flows_through_moderation(pool: PgPool) {
    let admin = new_user(&pool, "crud_admin1").await;
    let alice = new_user(&pool, "crud_alice1").await;

    let tool = ToolRepo::create(
        &pool,
        &CreateTool {
            name: "Pending Tool".to_string(),
            description: "awaiting review".to_string(),
            category: "writing".to_string(),
            tags: vec!["draft".to_string()],
            website: Some("https://example.com".to_string()),
            pricing: None,
            features: vec![],
        },
        alice,
    )
    .await
    .unwrap();
    assert_eq!(tool.status, STATUS_PENDING);

    let pending = ToolRepo::list_pending(&pool, 50, 0).await.unwrap();
    assert!(pending.iter().any(|t| t.id == tool.id));

    // Rejected submissions carry the reason.
    let rejected = ToolRepo::reject(&pool, tool.id, "needs a description")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rejected.status, STATUS_REJECTED);
    assert_eq!(rejected.rejected_reason.as_deref(), Some("needs a description"));

    // Approval clears the rejection and stamps the reviewer.
    let approved = ToolRepo::approve(&pool, tool.id, admin).await.unwrap().unwrap();
    assert_eq!(approved.status, STATUS_APPROVED);
    assert_eq!(approved.approved_by, Some(admin));
    assert!(approved.approved_at.is_some());
    assert_eq!(approved.rejected_reason, None);

    // Only approved tools may take engagement.
    assert!(ToolRepo::find_approved(&pool, tool.id).await.unwrap().is_some());
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn comment_threads_expose_one_reply_level(pool: PgPool) {
    let admin = new_user(&pool, "crud_admin2").await;
    let alice = new_user(&pool, "crud_alice2").await;
    let bob = new_user(&pool, "crud_bob2").await;
    let tool_id = new_approved_tool(&pool, "Commented Tool", admin).await;

    let parent = CommentRepo::create(
        &pool,
        &CreateComment {
            tool_id,
            parent_id: None,
            content: "solid tool".to_string(),
            rating: Some(4),
            is_anonymous: false,
        },
        alice,
    )
    .await
    .unwrap();

    CommentRepo::create(
        &pool,
        &CreateComment {
            tool_id,
            parent_id: Some(parent.id),
            content: "agreed".to_string(),
            rating: None,
            is_anonymous: true,
        },
        bob,
    )
    .await
    .unwrap();

    let threads = CommentRepo::list_threads_for_tool(&pool, tool_id, None, None).await.unwrap();
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].replies.len(), 1);
    // The anonymous reply has its author redacted.
    assert_eq!(threads[0].replies[0].username, None);
    assert_eq!(threads[0].comment.username.as_deref(), Some("crud_alice2"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn comment_votes_toggle_and_switch(pool: PgPool) {
    let admin = new_user(&pool, "crud_admin3").await;
    let alice = new_user(&pool, "crud_alice3").await;
    let bob = new_user(&pool, "crud_bob3").await;
    let tool_id = new_approved_tool(&pool, "Voted Tool", admin).await;

    let comment = CommentRepo::create(
        &pool,
        &CreateComment {
            tool_id,
            parent_id: None,
            content: "vote on me".to_string(),
            rating: None,
            is_anonymous: false,
        },
        alice,
    )
    .await
    .unwrap();

    assert_eq!(
        CommentRepo::toggle_vote(&pool, comment.id, bob, VOTE_LIKE).await.unwrap(),
        VoteOutcome::Added
    );
    let c = CommentRepo::find_by_id(&pool, comment.id).await.unwrap().unwrap();
    assert_eq!((c.like_count, c.dislike_count), (1, 0));

    // Voting the other way replaces the vote.
    assert_eq!(
        CommentRepo::toggle_vote(&pool, comment.id, bob, VOTE_DISLIKE).await.unwrap(),
        VoteOutcome::Switched
    );
    let c = CommentRepo::find_by_id(&pool, comment.id).await.unwrap().unwrap();
    assert_eq!((c.like_count, c.dislike_count), (0, 1));

    // Voting the same way again removes it.
    assert_eq!(
        CommentRepo::toggle_vote(&pool, comment.id, bob, VOTE_DISLIKE).await.unwrap(),
        VoteOutcome::Removed
    );
    let c = CommentRepo::find_by_id(&pool, comment.id).await.unwrap().unwrap();
    assert_eq!((c.like_count, c.dislike_count), (0, 0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unapproved_comments_hidden_until_moderated(pool: PgPool) {
    let admin = new_user(&pool, "crud_admin4").await;
    let alice = new_user(&pool, "crud_alice4").await;
    let tool_id = new_approved_tool(&pool, "Moderated Tool", admin).await;

    let comment = CommentRepo::create(
        &pool,
        &CreateComment {
            tool_id,
            parent_id: None,
            content: "spam?".to_string(),
            rating: None,
            is_anonymous: false,
        },
        alice,
    )
    .await
    .unwrap();

    CommentRepo::moderate(&pool, comment.id, false).await.unwrap();
    assert!(CommentRepo::list_threads_for_tool(&pool, tool_id, None, None)
        .await
        .unwrap()
        .is_empty());

    let pending = CommentRepo::list_pending(&pool, 50, 0).await.unwrap();
    assert!(pending.iter().any(|c| c.id == comment.id));

    CommentRepo::moderate(&pool, comment.id, true).await.unwrap();
    assert_eq!(
        CommentRepo::list_threads_for_tool(&pool, tool_id, None, None).await.unwrap().len(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn comment_update_is_owner_scoped(pool: PgPool) {
    let admin = new_user(&pool, "crud_admin5").await;
    let alice = new_user(&pool, "crud_alice5").await;
    let bob = new_user(&pool, "crud_bob5").await;
    let tool_id = new_approved_tool(&pool, "Owned Tool", admin).await;

    let comment = CommentRepo::create(
        &pool,
        &CreateComment {
            tool_id,
            parent_id: None,
            content: "original".to_string(),
            rating: None,
            is_anonymous: false,
        },
        alice,
    )
    .await
    .unwrap();

    let patch = UpdateComment {
        content: Some("edited".to_string()),
        rating: None,
        is_anonymous: None,
    };
    assert!(CommentRepo::update(&pool, comment.id, bob, &patch).await.unwrap().is_none());

    let updated = CommentRepo::update(&pool, comment.id, alice, &patch)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.content, "edited");
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeat_tracking_refreshes_instead_of_duplicating(pool: PgPool) {
    let alice = new_user(&pool, "crud_alice6").await;

    let action = TrackAction {
        action: "view".to_string(),
        target_type: "tool".to_string(),
        target_id: Some(42),
        target_name: Some("Some Tool".to_string()),
        metadata: None,
    };

    let first = HistoryRepo::track(&pool, alice, &action).await.unwrap();
    let second = HistoryRepo::track(&pool, alice, &action).await.unwrap();
    assert_eq!(first.id, second.id, "same action within the hour reuses the row");

    let listed = HistoryRepo::list_for_user(
        &pool,
        alice,
        &HistoryListParams {
            action: None,
            target_type: None,
            limit: None,
            offset: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(listed.len(), 1);

    // A different target is a new row.
    let other = TrackAction {
        target_id: Some(43),
        ..action
    };
    let third = HistoryRepo::track(&pool, alice, &other).await.unwrap();
    assert_ne!(first.id, third.id);

    let cleared = HistoryRepo::clear_for_user(&pool, alice, None).await.unwrap();
    assert_eq!(cleared, 2);
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn notification_read_lifecycle(pool: PgPool) {
    let alice = new_user(&pool, "crud_alice7").await;

    for i in 0..3 {
        NotificationRepo::create(
            &pool,
            &CreateNotification {
                user_id: alice,
                kind: "system".to_string(),
                title: format!("hello {i}"),
                content: "content".to_string(),
                related_id: None,
                related_type: None,
            },
        )
        .await
        .unwrap();
    }

    assert_eq!(NotificationRepo::unread_count(&pool, alice).await.unwrap(), 3);

    let listed = NotificationRepo::list_for_user(
        &pool,
        alice,
        &NotificationListParams {
            unread_only: true,
            limit: None,
            offset: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(listed.len(), 3);

    NotificationRepo::mark_read(&pool, listed[0].id, alice).await.unwrap();
    assert_eq!(NotificationRepo::unread_count(&pool, alice).await.unwrap(), 2);

    let marked = NotificationRepo::mark_all_read(&pool, alice).await.unwrap();
    assert_eq!(marked, 2);
    assert_eq!(NotificationRepo::unread_count(&pool, alice).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Courses and orders
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn order_status_transitions_stamp_timestamps(pool: PgPool) {
    let alice = new_user(&pool, "crud_alice8").await;

    let course = CourseRepo::create(
        &pool,
        &CreateCourse {
            title: "Evening Rust".to_string(),
            description: "course".to_string(),
            instructor: "Prof. Crab".to_string(),
            price: 149.0,
            image_url: None,
            duration: None,
            start_date: None,
            end_date: None,
            max_students: 2,
            tags: vec![],
            category: None,
        },
    )
    .await
    .unwrap();

    let order = OrderRepo::create(&pool, course.id, alice, course.price, None, None)
        .await
        .unwrap();
    assert_eq!(order.status, "pending");
    assert!(order.paid_at.is_none());

    assert!(OrderRepo::has_active_enrollment(&pool, alice, course.id).await.unwrap());

    let paid = OrderRepo::update_status(
        &pool,
        order.id,
        &UpdateOrderStatus {
            status: "paid".to_string(),
            payment_method: Some("card".to_string()),
            payment_transaction_id: Some("txn_123".to_string()),
            notes: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!(paid.paid_at.is_some());
    assert_eq!(paid.payment_method.as_deref(), Some("card"));

    let cancelled = OrderRepo::update_status(
        &pool,
        order.id,
        &UpdateOrderStatus {
            status: "cancelled".to_string(),
            payment_method: None,
            payment_transaction_id: None,
            notes: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!(cancelled.cancelled_at.is_some());
    // Earlier stamps are preserved.
    assert!(cancelled.paid_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn student_count_respects_capacity(pool: PgPool) {
    let course = CourseRepo::create(
        &pool,
        &CreateCourse {
            title: "Tiny Course".to_string(),
            description: "only one seat".to_string(),
            instructor: "Prof. Small".to_string(),
            price: 10.0,
            image_url: None,
            duration: None,
            start_date: None,
            end_date: None,
            max_students: 1,
            tags: vec![],
            category: None,
        },
    )
    .await
    .unwrap();

    assert!(CourseRepo::increment_students(&pool, course.id).await.unwrap());
    // Full: the second enrollment is refused.
    assert!(!CourseRepo::increment_students(&pool, course.id).await.unwrap());

    assert!(CourseRepo::decrement_students(&pool, course.id).await.unwrap());
    // Empty: nothing to decrement.
    assert!(!CourseRepo::decrement_students(&pool, course.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn course_progress_only_moves_forward(pool: PgPool) {
    let alice = new_user(&pool, "crud_alice9").await;

    let course = CourseRepo::create(
        &pool,
        &CreateCourse {
            title: "Progress Course".to_string(),
            description: "course".to_string(),
            instructor: "Prof. Steady".to_string(),
            price: 0.0,
            image_url: None,
            duration: None,
            start_date: None,
            end_date: None,
            max_students: 10,
            tags: vec![],
            category: None,
        },
    )
    .await
    .unwrap();

    let entry = CourseHistoryRepo::track(&pool, alice, course.id, Some(40)).await.unwrap();
    assert_eq!(entry.progress_percent, 40);

    // Revisiting with lower progress keeps the high-water mark.
    let entry = CourseHistoryRepo::track(&pool, alice, course.id, Some(25)).await.unwrap();
    assert_eq!(entry.progress_percent, 40);

    let entry = CourseHistoryRepo::track(&pool, alice, course.id, Some(80)).await.unwrap();
    assert_eq!(entry.progress_percent, 80);

    let (count, avg) = CourseHistoryRepo::stats_for_user(&pool, alice).await.unwrap();
    assert_eq!(count, 1);
    assert_eq!(avg, 80.0);
}
