//! Repository for the `comments`, `comment_votes`, and `comment_reports`
//! tables.
//!
//! The like/dislike/report counters on a comment are derived from the
//! vote/report tables and re-derived in the same transaction as the
//! vote/report write, mirroring how the tool counters are kept.

use sqlx::{PgExecutor, PgPool};
use toolhub_core::types::DbId;

use crate::models::comment::{
    Comment, CommentStats, CommentThread, CommentWithAuthor, CreateComment, UpdateComment,
    VOTE_DISLIKE, VOTE_LIKE,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, tool_id, user_id, parent_id, content, rating, is_anonymous, \
                        like_count, dislike_count, report_count, is_approved, \
                        deleted_at, created_at, updated_at";

/// Joined column list for author-facing reads.
const AUTHOR_COLUMNS: &str = "c.id, c.tool_id, c.user_id, c.parent_id, c.content, c.rating, \
                        c.is_anonymous, c.like_count, c.dislike_count, c.is_approved, \
                        c.created_at, u.username, u.avatar AS user_avatar";

/// Default page size for comment listings.
const DEFAULT_LIMIT: i64 = 20;

/// Maximum page size for comment listings.
const MAX_LIMIT: i64 = 100;

/// Outcome of a vote toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Added,
    Removed,
    Switched,
}

/// Provides CRUD operations for comments, votes, and reports.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new comment or reply, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateComment,
        user_id: DbId,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (tool_id, user_id, parent_id, content, rating, is_anonymous)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(input.tool_id)
            .bind(user_id)
            .bind(input.parent_id)
            .bind(&input.content)
            .bind(input.rating)
            .bind(input.is_anonymous)
            .fetch_one(pool)
            .await
    }

    /// Find a live comment by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Top-level approved comments for a tool, each bundled with its
    /// direct replies (one nesting level).
    pub async fn list_threads_for_tool(
        pool: &PgPool,
        tool_id: DbId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<CommentThread>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = offset.unwrap_or(0);

        let query = format!(
            "SELECT {AUTHOR_COLUMNS}
             FROM comments c
             JOIN users u ON u.id = c.user_id
             WHERE c.tool_id = $1 AND c.parent_id IS NULL
               AND c.is_approved AND c.deleted_at IS NULL
             ORDER BY c.created_at DESC
             LIMIT $2 OFFSET $3"
        );
        let parents = sqlx::query_as::<_, CommentWithAuthor>(&query)
            .bind(tool_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let mut threads = Vec::with_capacity(parents.len());
        for parent in parents {
            let replies = Self::list_replies(pool, parent.id).await?;
            threads.push(CommentThread {
                comment: parent.redact_if_anonymous(),
                replies: replies
                    .into_iter()
                    .map(CommentWithAuthor::redact_if_anonymous)
                    .collect(),
            });
        }
        Ok(threads)
    }

    /// Approved replies to a comment, oldest first.
    pub async fn list_replies(
        pool: &PgPool,
        parent_id: DbId,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        let query = format!(
            "SELECT {AUTHOR_COLUMNS}
             FROM comments c
             JOIN users u ON u.id = c.user_id
             WHERE c.parent_id = $1 AND c.is_approved AND c.deleted_at IS NULL
             ORDER BY c.created_at ASC"
        );
        sqlx::query_as::<_, CommentWithAuthor>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// A user's live comments, newest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = offset.unwrap_or(0);

        let query = format!(
            "SELECT {COLUMNS} FROM comments
             WHERE user_id = $1 AND deleted_at IS NULL
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Content substring search over approved comments.
    pub async fn search(
        pool: &PgPool,
        term: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let pattern = format!("%{term}%");
        let query = format!(
            "SELECT {COLUMNS} FROM comments
             WHERE content ILIKE $1 AND is_approved AND deleted_at IS NULL
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(&pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Edit a comment. Only non-`None` fields in `input` are applied.
    /// Scoped to the owning user.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateComment,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "UPDATE comments SET
                content = COALESCE($3, content),
                rating = COALESCE($4, rating),
                is_anonymous = COALESCE($5, is_anonymous)
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.content)
            .bind(input.rating)
            .bind(input.is_anonymous)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a comment. Scoped to the owning user; returns `true`
    /// if the row was updated.
    pub async fn soft_delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE comments SET deleted_at = NOW()
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Toggle a like/dislike vote, atomically with the counter re-derive.
    ///
    /// Voting the same way twice removes the vote; voting the other way
    /// replaces it.
    pub async fn toggle_vote(
        pool: &PgPool,
        comment_id: DbId,
        user_id: DbId,
        action: &str,
    ) -> Result<VoteOutcome, sqlx::Error> {
        debug_assert!(action == VOTE_LIKE || action == VOTE_DISLIKE);

        let mut tx = pool.begin().await?;

        let existing: Option<(String,)> = sqlx::query_as(
            "SELECT action FROM comment_votes WHERE comment_id = $1 AND user_id = $2",
        )
        .bind(comment_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = match existing {
            Some((prev,)) if prev == action => {
                sqlx::query("DELETE FROM comment_votes WHERE comment_id = $1 AND user_id = $2")
                    .bind(comment_id)
                    .bind(user_id)
                    .execute(&mut *tx)
                    .await?;
                VoteOutcome::Removed
            }
            Some(_) => {
                sqlx::query(
                    "UPDATE comment_votes SET action = $3
                     WHERE comment_id = $1 AND user_id = $2",
                )
                .bind(comment_id)
                .bind(user_id)
                .bind(action)
                .execute(&mut *tx)
                .await?;
                VoteOutcome::Switched
            }
            None => {
                sqlx::query(
                    "INSERT INTO comment_votes (comment_id, user_id, action)
                     VALUES ($1, $2, $3)",
                )
                .bind(comment_id)
                .bind(user_id)
                .bind(action)
                .execute(&mut *tx)
                .await?;
                VoteOutcome::Added
            }
        };

        Self::recompute_vote_counts(&mut *tx, comment_id).await?;

        tx.commit().await?;
        Ok(outcome)
    }

    /// Report a comment, atomically with the counter re-derive. Repeat
    /// reports from the same user are ignored.
    pub async fn report(
        pool: &PgPool,
        comment_id: DbId,
        user_id: DbId,
        reason: &str,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO comment_reports (comment_id, user_id, reason)
             VALUES ($1, $2, $3)
             ON CONFLICT (comment_id, user_id) DO NOTHING",
        )
        .bind(comment_id)
        .bind(user_id)
        .bind(reason)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE comments SET
                 report_count = (SELECT COUNT(*) FROM comment_reports r
                                  WHERE r.comment_id = comments.id)
             WHERE id = $1",
        )
        .bind(comment_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Comments awaiting moderation, newest first.
    pub async fn list_pending(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments
             WHERE NOT is_approved AND deleted_at IS NULL
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Set a comment's approval flag. Returns `true` if the row was
    /// updated.
    pub async fn moderate(pool: &PgPool, id: DbId, approved: bool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE comments SET is_approved = $2 WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(approved)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Moderation counters for the admin dashboard.
    pub async fn stats(pool: &PgPool) -> Result<CommentStats, sqlx::Error> {
        sqlx::query_as::<_, CommentStats>(
            "SELECT COUNT(*) AS total_comments,
                    COUNT(*) FILTER (WHERE NOT is_approved) AS pending_comments,
                    COUNT(*) FILTER (WHERE is_approved) AS approved_comments,
                    COALESCE(SUM(like_count), 0)::bigint AS total_likes,
                    COALESCE(SUM(report_count), 0)::bigint AS total_reports
             FROM comments
             WHERE deleted_at IS NULL",
        )
        .fetch_one(pool)
        .await
    }

    /// Re-derive both vote counters from `comment_votes`.
    async fn recompute_vote_counts<'e>(
        executor: impl PgExecutor<'e>,
        comment_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE comments SET
                 like_count = (SELECT COUNT(*) FROM comment_votes v
                                WHERE v.comment_id = comments.id AND v.action = 'like'),
                 dislike_count = (SELECT COUNT(*) FROM comment_votes v
                                   WHERE v.comment_id = comments.id AND v.action = 'dislike')
             WHERE id = $1",
        )
        .bind(comment_id)
        .execute(executor)
        .await?;
        Ok(())
    }
}
