use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category a post may belong to. Managed by administrators, read-only over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    /// Unique human-readable key
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewGroup {
    pub title: String,
    pub slug: String,
    pub description: String,
}
