use crate::models::{Group, NewGroup, Page};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a new group
pub async fn create_group(pool: &PgPool, group: &NewGroup) -> Result<Group, sqlx::Error> {
    let group = sqlx::query_as::<_, Group>(
        r#"
        INSERT INTO groups (id, title, slug, description)
        VALUES ($1, $2, $3, $4)
        RETURNING id, title, slug, description
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&group.title)
    .bind(&group.slug)
    .bind(&group.description)
    .fetch_one(pool)
    .await?;

    Ok(group)
}

/// List groups ordered by title
pub async fn list_groups(pool: &PgPool, page: Page) -> Result<Vec<Group>, sqlx::Error> {
    let groups = sqlx::query_as::<_, Group>(
        r#"
        SELECT id, title, slug, description
        FROM groups
        ORDER BY title ASC, id ASC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(pool)
    .await?;

    Ok(groups)
}

/// Get a single group by ID
pub async fn get_group_by_id(pool: &PgPool, group_id: Uuid) -> Result<Option<Group>, sqlx::Error> {
    let group = sqlx::query_as::<_, Group>(
        r#"
        SELECT id, title, slug, description
        FROM groups
        WHERE id = $1
        "#,
    )
    .bind(group_id)
    .fetch_optional(pool)
    .await?;

    Ok(group)
}
