//! Recompute of the derived counters on `tools` and `courses`.
//!
//! `rating_count`, `average_rating`, and `favorite_count` are denormalized
//! copies of what the live (non-soft-deleted) dependent rows say. They are
//! never written from client input: every mutation of a dependent table
//! calls back into this module, which re-derives the values from source
//! with a single UPDATE per parent. Recomputing from source instead of
//! maintaining running counters keeps the values correct when a rating is
//! edited in place or a soft-deleted row must drop out retroactively.
//!
//! Each function is idempotent: calling it again with no intervening
//! writes produces the same stored values. The functions are generic over
//! [`sqlx::PgExecutor`] so repositories can run them on the same
//! transaction as the triggering insert/update — a failed recompute then
//! rolls the dependent write back instead of leaving a stale counter.
//!
//! There is no locking around concurrent recomputes for the same parent;
//! the last writer wins with a value derived from a consistent snapshot,
//! which can be stale by at most one in-flight update. Acceptable for a
//! review site, not for anything needing strict serializability.

use sqlx::{FromRow, PgExecutor};
use toolhub_core::types::DbId;

/// The pair of persisted rating counters on a parent row.
#[derive(Debug, Clone, Copy, PartialEq, FromRow, serde::Serialize)]
pub struct RatingAggregate {
    pub rating_count: i64,
    /// Mean of active ratings rounded to 2 digits; 0.00 when none exist.
    pub average_rating: f64,
}

/// Read-path summary of the comment rating channel (never persisted).
#[derive(Debug, Clone, Copy, PartialEq, FromRow, serde::Serialize)]
pub struct CommentRatingSummary {
    pub rating_count: i64,
    pub average_rating: f64,
}

/// Recompute statements for the derived columns on `tools`.
pub struct ToolAggregates;

impl ToolAggregates {
    /// Re-derive `average_rating` and `rating_count` from the live ratings
    /// of `tool_id` and persist both in one UPDATE.
    ///
    /// With no active ratings the average resolves to `0.00` and the count
    /// to `0` — never NULL and never a division by zero. Errors with
    /// `RowNotFound` if the tool row itself is gone.
    pub async fn recompute_rating<'e>(
        executor: impl PgExecutor<'e>,
        tool_id: DbId,
    ) -> Result<RatingAggregate, sqlx::Error> {
        sqlx::query_as::<_, RatingAggregate>(
            "UPDATE tools SET
                 average_rating = COALESCE(
                     (SELECT ROUND(AVG(r.rating)::numeric, 2)::float8
                        FROM ratings r
                       WHERE r.tool_id = tools.id AND r.deleted_at IS NULL),
                     0),
                 rating_count = (SELECT COUNT(*)
                                   FROM ratings r
                                  WHERE r.tool_id = tools.id AND r.deleted_at IS NULL)
             WHERE id = $1
             RETURNING rating_count, average_rating",
        )
        .bind(tool_id)
        .fetch_one(executor)
        .await
    }

    /// Re-derive `favorite_count` from the live favorites of `tool_id`.
    pub async fn recompute_favorites<'e>(
        executor: impl PgExecutor<'e>,
        tool_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "UPDATE tools SET
                 favorite_count = (SELECT COUNT(*)
                                     FROM favorites f
                                    WHERE f.tool_id = tools.id AND f.deleted_at IS NULL)
             WHERE id = $1
             RETURNING favorite_count",
        )
        .bind(tool_id)
        .fetch_one(executor)
        .await?;
        Ok(count)
    }

    /// Average over the independent `comments.rating` channel: live,
    /// approved comments carrying a star value. Computed on read; no
    /// counter column exists for it.
    pub async fn comment_rating_summary<'e>(
        executor: impl PgExecutor<'e>,
        tool_id: DbId,
    ) -> Result<CommentRatingSummary, sqlx::Error> {
        let (rating_count, average_rating): (i64, f64) = sqlx::query_as(
            "SELECT COUNT(*),
                    COALESCE(ROUND(AVG(c.rating)::numeric, 2)::float8, 0)
               FROM comments c
              WHERE c.tool_id = $1
                AND c.rating IS NOT NULL
                AND c.is_approved
                AND c.deleted_at IS NULL",
        )
        .bind(tool_id)
        .fetch_one(executor)
        .await?;
        Ok(CommentRatingSummary {
            rating_count,
            average_rating,
        })
    }
}

/// Recompute statements for the derived columns on `courses`.
/// Mirrors [`ToolAggregates`] over the course_* dependent tables.
pub struct CourseAggregates;

impl CourseAggregates {
    /// Re-derive `average_rating` and `rating_count` for `course_id`.
    pub async fn recompute_rating<'e>(
        executor: impl PgExecutor<'e>,
        course_id: DbId,
    ) -> Result<RatingAggregate, sqlx::Error> {
        sqlx::query_as::<_, RatingAggregate>(
            "UPDATE courses SET
                 average_rating = COALESCE(
                     (SELECT ROUND(AVG(r.rating)::numeric, 2)::float8
                        FROM course_ratings r
                       WHERE r.course_id = courses.id AND r.deleted_at IS NULL),
                     0),
                 rating_count = (SELECT COUNT(*)
                                   FROM course_ratings r
                                  WHERE r.course_id = courses.id AND r.deleted_at IS NULL)
             WHERE id = $1
             RETURNING rating_count, average_rating",
        )
        .bind(course_id)
        .fetch_one(executor)
        .await
    }

    /// Re-derive `favorite_count` for `course_id`.
    pub async fn recompute_favorites<'e>(
        executor: impl PgExecutor<'e>,
        course_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "UPDATE courses SET
                 favorite_count = (SELECT COUNT(*)
                                     FROM course_favorites f
                                    WHERE f.course_id = courses.id AND f.deleted_at IS NULL)
             WHERE id = $1
             RETURNING favorite_count",
        )
        .bind(course_id)
        .fetch_one(executor)
        .await?;
        Ok(count)
    }
}
