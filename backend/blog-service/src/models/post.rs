use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{check_text, WriteMode};
use crate::error::FieldErrors;

const MAX_IMAGE_LEN: usize = 255;

/// Published post.
///
/// Serialized as `{id, text, author, image, group, pub_date}` where `author`
/// is the author's username.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub text: String,
    #[serde(skip_serializing)]
    pub author_id: Uuid,
    /// Username of the author
    pub author: String,
    pub image: Option<String>,
    #[serde(rename = "group")]
    pub group_id: Option<Uuid>,
    pub pub_date: DateTime<Utc>,
}

/// Request body for creating or updating a post.
///
/// `author` and `pub_date` are server-assigned; clients sending them are ignored.
/// `image` and `group` distinguish an omitted key (`None`) from an explicit
/// `null` (`Some(None)`), which clears the stored value.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PostPayload {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub group: Option<Option<Uuid>>,
}

/// Marks a key that appeared in the body, even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl PostPayload {
    /// Shape errors for this payload. Group existence is checked by the service.
    pub fn field_errors(&self, mode: WriteMode) -> FieldErrors {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };
        check_text(self.text.as_deref(), mode, &mut errors);
        if let Some(Some(image)) = &self.image {
            if image.chars().count() > MAX_IMAGE_LEN {
                errors.add(
                    "image",
                    format!(
                        "Ensure this field has no more than {} characters.",
                        MAX_IMAGE_LEN
                    ),
                );
            }
        }
        errors
    }

    /// Group the payload names, if any.
    pub fn group_id(&self) -> Option<Uuid> {
        self.group.flatten()
    }

    pub fn into_changes(self) -> PostChanges {
        PostChanges {
            text: self.text,
            image: self.image,
            group_id: self.group,
        }
    }
}

/// Insert parameters; the author comes from the request context.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: Uuid,
    pub text: String,
    pub image: Option<String>,
    pub group_id: Option<Uuid>,
}

/// Fields to overwrite. `None` leaves the stored value untouched;
/// `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub text: Option<String>,
    pub image: Option<Option<String>>,
    pub group_id: Option<Option<Uuid>>,
}
