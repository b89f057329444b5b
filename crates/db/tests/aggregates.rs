//! Integration tests for the derived rating/favorite counters.
//!
//! Exercises the recompute statements through the repository layer to
//! verify that after any sequence of create/update/soft-delete operations
//! the stored counters equal what the live dependent rows say, including
//! the empty case.

use sqlx::PgPool;
use toolhub_db::aggregates::{CourseAggregates, ToolAggregates};
use toolhub_db::models::comment::CreateComment;
use toolhub_db::models::course::{CreateCourse, CreateCourseRating};
use toolhub_db::models::favorite::CreateFavorite;
use toolhub_db::models::rating::{CreateRating, UpdateRating};
use toolhub_db::models::tool::{CreateTool, Tool};
use toolhub_db::models::user::CreateUser;
use toolhub_db::repositories::{
    CommentRepo, CourseRatingRepo, CourseRepo, FavoriteRepo, RatingRepo, ToolRepo, UserRepo,
};
use toolhub_core::types::DbId;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, name: &str) -> DbId {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "$argon2id$test".to_string(),
            email_verified: true,
        },
    )
    .await
    .unwrap();
    user.id
}

async fn new_approved_tool(pool: &PgPool, name: &str, admin: DbId) -> DbId {
    let tool = ToolRepo::create(
        pool,
        &CreateTool {
            name: name.to_string(),
            description: "aggregate test tool".to_string(),
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

async fn fetch_tool(pool: &PgPool, id: DbId) -> Tool {
    ToolRepo::find_by_id(pool, id).await.unwrap().unwrap()
}

fn rate(tool_id: DbId, stars: i16) -> CreateRating {
    CreateRating {
        tool_id,
        rating: stars,
        comment: None,
    }
}

// ---------------------------------------------------------------------------
// Rating aggregate
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn new_tool_has_empty_aggregate(pool: PgPool) {
    let admin = new_user(&pool, "agg_admin0").await;
    let tool_id = new_approved_tool(&pool, "Empty Aggregate", admin).await;

    let tool = fetch_tool(&pool, tool_id).await;
    assert_eq!(tool.rating_count, 0);
    assert_eq!(tool.average_rating, 0.0);
    assert_eq!(tool.favorite_count, 0);
}

/// The full lifecycle scenario: two ratings, an edit, a soft delete.
#[sqlx::test(migrations = "../../db/migrations")]
async fn rating_lifecycle_keeps_counters_in_sync(pool: PgPool) {
    let admin = new_user(&pool, "agg_admin1").await;
    let alice = new_user(&pool, "agg_alice1").await;
    let bob = new_user(&pool, "agg_bob1").await;
    let tool_id = new_approved_tool(&pool, "Lifecycle Tool", admin).await;

    // Alice rates 4, Bob rates 5.
    RatingRepo::create(&pool, &rate(tool_id, 4), alice).await.unwrap();
    let bob_rating = RatingRepo::create(&pool, &rate(tool_id, 5), bob).await.unwrap();

    let tool = fetch_tool(&pool, tool_id).await;
    assert_eq!(tool.rating_count, 2);
    assert_eq!(tool.average_rating, 4.50);

    // Alice edits her rating down to 2.
    let alice_rating = RatingRepo::find_by_user_and_tool(&pool, alice, tool_id)
        .await
        .unwrap()
        .unwrap();
    RatingRepo::update(
        &pool,
        alice_rating.id,
        alice,
        &UpdateRating {
            rating: 2,
            comment: None,
        },
    )
    .await
    .unwrap()
    .unwrap();

    let tool = fetch_tool(&pool, tool_id).await;
    assert_eq!(tool.rating_count, 2);
    assert_eq!(tool.average_rating, 3.50);

    // Bob withdraws his rating.
    RatingRepo::soft_delete(&pool, bob_rating.id, bob)
        .await
        .unwrap()
        .unwrap();

    let tool = fetch_tool(&pool, tool_id).await;
    assert_eq!(tool.rating_count, 1);
    assert_eq!(tool.average_rating, 2.00);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_last_rating_resets_to_zero(pool: PgPool) {
    let admin = new_user(&pool, "agg_admin2").await;
    let alice = new_user(&pool, "agg_alice2").await;
    let tool_id = new_approved_tool(&pool, "Reset Tool", admin).await;

    let rating = RatingRepo::create(&pool, &rate(tool_id, 3), alice).await.unwrap();
    RatingRepo::soft_delete(&pool, rating.id, alice)
        .await
        .unwrap()
        .unwrap();

    // Back to the empty case: 0.00 / 0, not NULL.
    let tool = fetch_tool(&pool, tool_id).await;
    assert_eq!(tool.rating_count, 0);
    assert_eq!(tool.average_rating, 0.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn average_rounds_to_two_digits(pool: PgPool) {
    let admin = new_user(&pool, "agg_admin3").await;
    let tool_id = new_approved_tool(&pool, "Rounding Tool", admin).await;

    for (i, stars) in [5i16, 4, 4].into_iter().enumerate() {
        let user = new_user(&pool, &format!("agg_rater3_{i}")).await;
        RatingRepo::create(&pool, &rate(tool_id, stars), user).await.unwrap();
    }

    // mean(5, 4, 4) = 4.3333... -> stored as 4.33 exactly.
    let tool = fetch_tool(&pool, tool_id).await;
    assert_eq!(tool.average_rating, 4.33);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn recompute_is_idempotent(pool: PgPool) {
    let admin = new_user(&pool, "agg_admin4").await;
    let alice = new_user(&pool, "agg_alice4").await;
    let tool_id = new_approved_tool(&pool, "Idempotent Tool", admin).await;

    RatingRepo::create(&pool, &rate(tool_id, 4), alice).await.unwrap();

    let first = ToolAggregates::recompute_rating(&pool, tool_id).await.unwrap();
    let second = ToolAggregates::recompute_rating(&pool, tool_id).await.unwrap();
    assert_eq!(first, second);

    let tool = fetch_tool(&pool, tool_id).await;
    assert_eq!(tool.rating_count, first.rating_count);
    assert_eq!(tool.average_rating, first.average_rating);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn recompute_on_missing_tool_errors(pool: PgPool) {
    let result = ToolAggregates::recompute_rating(&pool, 999_999).await;
    assert!(matches!(result, Err(sqlx::Error::RowNotFound)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_live_rating_is_rejected(pool: PgPool) {
    let admin = new_user(&pool, "agg_admin5").await;
    let alice = new_user(&pool, "agg_alice5").await;
    let tool_id = new_approved_tool(&pool, "Unique Tool", admin).await;

    RatingRepo::create(&pool, &rate(tool_id, 4), alice).await.unwrap();
    let second = RatingRepo::create(&pool, &rate(tool_id, 5), alice).await;
    assert!(second.is_err(), "second live rating must hit uq_ratings_user_tool");

    // A failed insert leaves the aggregate untouched.
    let tool = fetch_tool(&pool, tool_id).await;
    assert_eq!(tool.rating_count, 1);
    assert_eq!(tool.average_rating, 4.00);

    // After withdrawing, the user may rate again.
    let rating = RatingRepo::find_by_user_and_tool(&pool, alice, tool_id)
        .await
        .unwrap()
        .unwrap();
    RatingRepo::soft_delete(&pool, rating.id, alice).await.unwrap();
    RatingRepo::create(&pool, &rate(tool_id, 5), alice).await.unwrap();

    let tool = fetch_tool(&pool, tool_id).await;
    assert_eq!(tool.rating_count, 1);
    assert_eq!(tool.average_rating, 5.00);
}

// ---------------------------------------------------------------------------
// Favorite aggregate
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn favorite_count_tracks_adds_and_removes(pool: PgPool) {
    let admin = new_user(&pool, "agg_admin6").await;
    let alice = new_user(&pool, "agg_alice6").await;
    let bob = new_user(&pool, "agg_bob6").await;
    let tool_id = new_approved_tool(&pool, "Favorite Tool", admin).await;

    let fav = CreateFavorite {
        tool_id,
        folder_id: None,
        notes: None,
    };
    let alice_fav = FavoriteRepo::create(&pool, &fav, alice).await.unwrap();
    FavoriteRepo::create(&pool, &fav, bob).await.unwrap();

    let tool = fetch_tool(&pool, tool_id).await;
    assert_eq!(tool.favorite_count, 2);

    FavoriteRepo::soft_delete(&pool, alice_fav.id, alice)
        .await
        .unwrap()
        .unwrap();

    let tool = fetch_tool(&pool, tool_id).await;
    assert_eq!(tool.favorite_count, 1);

    FavoriteRepo::soft_delete_by_tool(&pool, bob, tool_id).await.unwrap();

    let tool = fetch_tool(&pool, tool_id).await;
    assert_eq!(tool.favorite_count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn favorite_recompute_is_idempotent(pool: PgPool) {
    let admin = new_user(&pool, "agg_admin7").await;
    let alice = new_user(&pool, "agg_alice7").await;
    let tool_id = new_approved_tool(&pool, "Favorite Idem Tool", admin).await;

    FavoriteRepo::create(
        &pool,
        &CreateFavorite {
            tool_id,
            folder_id: None,
            notes: None,
        },
        alice,
    )
    .await
    .unwrap();

    let first = ToolAggregates::recompute_favorites(&pool, tool_id).await.unwrap();
    let second = ToolAggregates::recompute_favorites(&pool, tool_id).await.unwrap();
    assert_eq!(first, 1);
    assert_eq!(second, 1);
}

// ---------------------------------------------------------------------------
// Comment rating channel (read-path only)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn comment_summary_ignores_unrated_and_deleted(pool: PgPool) {
    let admin = new_user(&pool, "agg_admin8").await;
    let alice = new_user(&pool, "agg_alice8").await;
    let bob = new_user(&pool, "agg_bob8").await;
    let tool_id = new_approved_tool(&pool, "Comment Summary Tool", admin).await;

    // One rated comment, one without a rating.
    CommentRepo::create(
        &pool,
        &CreateComment {
            tool_id,
            parent_id: None,
            content: "great".to_string(),
            rating: Some(5),
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
            parent_id: None,
            content: "no stars from me".to_string(),
            rating: None,
            is_anonymous: false,
        },
        bob,
    )
    .await
    .unwrap();

    let summary = ToolAggregates::comment_rating_summary(&pool, tool_id).await.unwrap();
    assert_eq!(summary.rating_count, 1);
    assert_eq!(summary.average_rating, 5.00);

    // The comment channel never touches the persisted rating counters.
    let tool = fetch_tool(&pool, tool_id).await;
    assert_eq!(tool.rating_count, 0);
    assert_eq!(tool.average_rating, 0.0);

    // Soft-deleting the rated comment empties the summary.
    let rated = CommentRepo::list_by_user(&pool, alice, None, None).await.unwrap();
    CommentRepo::soft_delete(&pool, rated[0].id, alice).await.unwrap();

    let summary = ToolAggregates::comment_rating_summary(&pool, tool_id).await.unwrap();
    assert_eq!(summary.rating_count, 0);
    assert_eq!(summary.average_rating, 0.0);
}

// ---------------------------------------------------------------------------
// Course analogues
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn course_rating_lifecycle_keeps_counters_in_sync(pool: PgPool) {
    let alice = new_user(&pool, "agg_alice9").await;
    let bob = new_user(&pool, "agg_bob9").await;

    let course = CourseRepo::create(
        &pool,
        &CreateCourse {
            title: "Prompt Engineering 101".to_string(),
            description: "night school".to_string(),
            instructor: "Prof. Example".to_string(),
            price: 99.0,
            image_url: None,
            duration: None,
            start_date: None,
            end_date: None,
            max_students: 30,
            tags: vec![],
            category: None,
        },
    )
    .await
    .unwrap();

    CourseRatingRepo::create(
        &pool,
        &CreateCourseRating {
            course_id: course.id,
            rating: 4,
            comment: None,
        },
        alice,
    )
    .await
    .unwrap();
    let bob_rating = CourseRatingRepo::create(
        &pool,
        &CreateCourseRating {
            course_id: course.id,
            rating: 5,
            comment: None,
        },
        bob,
    )
    .await
    .unwrap();

    let course = CourseRepo::find_by_id(&pool, course.id).await.unwrap().unwrap();
    assert_eq!(course.rating_count, 2);
    assert_eq!(course.average_rating, 4.50);

    CourseRatingRepo::soft_delete(&pool, bob_rating.id, bob)
        .await
        .unwrap()
        .unwrap();

    let course = CourseRepo::find_by_id(&pool, course.id).await.unwrap().unwrap();
    assert_eq!(course.rating_count, 1);
    assert_eq!(course.average_rating, 4.00);

    let idem = CourseAggregates::recompute_rating(&pool, course.id).await.unwrap();
    assert_eq!(idem.rating_count, 1);
    assert_eq!(idem.average_rating, 4.00);
}
