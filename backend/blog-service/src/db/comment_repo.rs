use crate::models::{Comment, CommentChanges, NewComment, Page};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new comment on a post
pub async fn create_comment(pool: &PgPool, comment: &NewComment) -> Result<Comment, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        WITH inserted AS (
            INSERT INTO comments (id, post_id, author_id, text)
            VALUES ($1, $2, $3, $4)
            RETURNING id, post_id, author_id, text, created
        )
        SELECT c.id, c.author_id, u.username AS author, c.post_id, c.text, c.created
        FROM inserted c
        JOIN users u ON u.id = c.author_id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(comment.post_id)
    .bind(comment.author_id)
    .bind(&comment.text)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// Get all comments for a post, newest first
pub async fn get_comments_by_post(
    pool: &PgPool,
    post_id: Uuid,
    page: Page,
) -> Result<Vec<Comment>, sqlx::Error> {
    let comments = sqlx::query_as::<_, Comment>(
        r#"
        SELECT c.id, c.author_id, u.username AS author, c.post_id, c.text, c.created
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.post_id = $1
        ORDER BY c.created DESC, c.id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(post_id)
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

/// Get a single comment by ID, scoped to its post
pub async fn get_comment_by_id(
    pool: &PgPool,
    post_id: Uuid,
    comment_id: Uuid,
) -> Result<Option<Comment>, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        SELECT c.id, c.author_id, u.username AS author, c.post_id, c.text, c.created
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.id = $1 AND c.post_id = $2
        "#,
    )
    .bind(comment_id)
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(comment)
}

/// Update comment text
pub async fn update_comment(
    pool: &PgPool,
    comment_id: Uuid,
    changes: &CommentChanges,
) -> Result<Option<Comment>, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        WITH updated AS (
            UPDATE comments
            SET text = COALESCE($2, text)
            WHERE id = $1
            RETURNING id, post_id, author_id, text, created
        )
        SELECT c.id, c.author_id, u.username AS author, c.post_id, c.text, c.created
        FROM updated c
        JOIN users u ON u.id = c.author_id
        "#,
    )
    .bind(comment_id)
    .bind(&changes.text)
    .fetch_optional(pool)
    .await?;

    Ok(comment)
}

/// Delete a comment
pub async fn delete_comment(pool: &PgPool, comment_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
