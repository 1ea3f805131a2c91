use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Account that can authenticate and author content.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// Argon2id PHC string; never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Body of the token endpoint.
#[derive(Debug, Default, serde::Deserialize)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    /// Both fields must be present and non-blank.
    pub fn into_parts(self) -> crate::error::Result<(String, String)> {
        let mut errors = crate::error::FieldErrors::new();
        let username = required(self.username, "username", &mut errors);
        let password = required(self.password, "password", &mut errors);
        errors.into_result()?;
        Ok((username, password))
    }
}

fn required(
    value: Option<String>,
    field: &str,
    errors: &mut crate::error::FieldErrors,
) -> String {
    match value {
        None => {
            errors.add(field, crate::error::FIELD_REQUIRED);
            String::new()
        }
        Some(v) if v.trim().is_empty() => {
            errors.add(field, crate::error::FIELD_BLANK);
            String::new()
        }
        Some(v) => v,
    }
}
