use crate::models::{NewPost, Page, Post, PostChanges};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new post
pub async fn create_post(pool: &PgPool, post: &NewPost) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        WITH inserted AS (
            INSERT INTO posts (id, text, author_id, image, group_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, text, author_id, image, group_id, pub_date
        )
        SELECT p.id, p.text, p.author_id, u.username AS author, p.image, p.group_id, p.pub_date
        FROM inserted p
        JOIN users u ON u.id = p.author_id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&post.text)
    .bind(post.author_id)
    .bind(&post.image)
    .bind(post.group_id)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// List posts, newest first
pub async fn list_posts(pool: &PgPool, page: Page) -> Result<Vec<Post>, sqlx::Error> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT p.id, p.text, p.author_id, u.username AS author, p.image, p.group_id, p.pub_date
        FROM posts p
        JOIN users u ON u.id = p.author_id
        ORDER BY p.pub_date DESC, p.id DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Get a single post by ID
pub async fn get_post_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT p.id, p.text, p.author_id, u.username AS author, p.image, p.group_id, p.pub_date
        FROM posts p
        JOIN users u ON u.id = p.author_id
        WHERE p.id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Overwrite the provided fields, leaving the rest untouched.
///
/// `image` and `group_id` carry a "was sent" flag so an explicit `null`
/// clears the column.
pub async fn update_post(
    pool: &PgPool,
    post_id: Uuid,
    changes: &PostChanges,
) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        WITH updated AS (
            UPDATE posts
            SET text = COALESCE($2, text),
                image = CASE WHEN $3 THEN $4 ELSE image END,
                group_id = CASE WHEN $5 THEN $6 ELSE group_id END
            WHERE id = $1
            RETURNING id, text, author_id, image, group_id, pub_date
        )
        SELECT p.id, p.text, p.author_id, u.username AS author, p.image, p.group_id, p.pub_date
        FROM updated p
        JOIN users u ON u.id = p.author_id
        "#,
    )
    .bind(post_id)
    .bind(&changes.text)
    .bind(changes.image.is_some())
    .bind(changes.image.clone().flatten())
    .bind(changes.group_id.is_some())
    .bind(changes.group_id.flatten())
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Delete a post; its comments go with it via `ON DELETE CASCADE`
pub async fn delete_post(pool: &PgPool, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
