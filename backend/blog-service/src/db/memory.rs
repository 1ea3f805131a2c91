/// Process-local [`BlogRepository`].
///
/// Rows live behind a single `RwLock`; the author username is joined on
/// read, the same way the PostgreSQL queries do it.
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::BlogRepository;
use crate::error::{AppError, Result};
use crate::models::{
    Comment, CommentChanges, Group, NewComment, NewGroup, NewPost, Page, Post, PostChanges, User,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    groups: Vec<Group>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

impl Tables {
    fn username(&self, user_id: Uuid) -> Result<String> {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.username.clone())
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".into()))
    }
}

#[derive(Default)]
pub struct MemoryBlogRepository {
    tables: RwLock<Tables>,
}

impl MemoryBlogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn paginate<T: Clone>(rows: &[T], page: Page) -> Vec<T> {
    let offset = usize::try_from(page.offset).unwrap_or(0);
    let iter = rows.iter().skip(offset).cloned();
    match page.limit {
        Some(limit) => iter.take(usize::try_from(limit).unwrap_or(0)).collect(),
        None => iter.collect(),
    }
}

#[async_trait]
impl BlogRepository for MemoryBlogRepository {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == username) {
            return Err(AppError::Conflict(format!(
                "username '{}' is already taken",
                username
            )));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_group(&self, group: NewGroup) -> Result<Group> {
        let mut tables = self.tables.write().await;
        if tables.groups.iter().any(|g| g.slug == group.slug) {
            return Err(AppError::Conflict(format!(
                "group slug '{}' is already taken",
                group.slug
            )));
        }

        let group = Group {
            id: Uuid::new_v4(),
            title: group.title,
            slug: group.slug,
            description: group.description,
        };
        tables.groups.push(group.clone());
        Ok(group)
    }

    async fn list_groups(&self, page: Page) -> Result<Vec<Group>> {
        let tables = self.tables.read().await;
        let mut groups = tables.groups.clone();
        groups.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(paginate(&groups, page))
    }

    async fn find_group(&self, id: Uuid) -> Result<Option<Group>> {
        let tables = self.tables.read().await;
        Ok(tables.groups.iter().find(|g| g.id == id).cloned())
    }

    async fn list_posts(&self, page: Page) -> Result<Vec<Post>> {
        let tables = self.tables.read().await;
        // Insertion order breaks ties between equal timestamps.
        let mut posts: Vec<Post> = tables.posts.iter().rev().cloned().collect();
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
        Ok(paginate(&posts, page))
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_post(&self, post: NewPost) -> Result<Post> {
        let mut tables = self.tables.write().await;
        let post = Post {
            id: Uuid::new_v4(),
            text: post.text,
            author_id: post.author_id,
            author: tables.username(post.author_id)?,
            image: post.image,
            group_id: post.group_id,
            pub_date: Utc::now(),
        };
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>> {
        let mut tables = self.tables.write().await;
        let Some(post) = tables.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        if let Some(text) = changes.text {
            post.text = text;
        }
        if let Some(image) = changes.image {
            post.image = image;
        }
        if let Some(group_id) = changes.group_id {
            post.group_id = group_id;
        }
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        if tables.posts.len() == before {
            return Ok(false);
        }

        tables.comments.retain(|c| c.post_id != id);
        Ok(true)
    }

    async fn list_comments(&self, post_id: Uuid, page: Page) -> Result<Vec<Comment>> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .iter()
            .rev()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created.cmp(&a.created));
        Ok(paginate(&comments, page))
    }

    async fn find_comment(&self, post_id: Uuid, id: Uuid) -> Result<Option<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .find(|c| c.id == id && c.post_id == post_id)
            .cloned())
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment> {
        let mut tables = self.tables.write().await;
        if !tables.posts.iter().any(|p| p.id == comment.post_id) {
            return Err(AppError::NotFound(format!(
                "Post {} not found",
                comment.post_id
            )));
        }

        let comment = Comment {
            id: Uuid::new_v4(),
            author_id: comment.author_id,
            author: tables.username(comment.author_id)?,
            post_id: comment.post_id,
            text: comment.text,
            created: Utc::now(),
        };
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn update_comment(&self, id: Uuid, changes: CommentChanges) -> Result<Option<Comment>> {
        let mut tables = self.tables.write().await;
        let Some(comment) = tables.comments.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        if let Some(text) = changes.text {
            comment.text = text;
        }
        Ok(Some(comment.clone()))
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        Ok(tables.comments.len() < before)
    }
}
