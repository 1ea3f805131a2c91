/// Auth service - user provisioning and credential exchange
use crate::db::BlogRepository;
use crate::error::{AppError, FieldErrors, Result};
use crate::models::{Credentials, User};
use crate::security::{hash_password, verify_password, TokenService};
use std::sync::Arc;

const INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials.";

pub struct AuthService {
    repo: Arc<dyn BlogRepository>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(repo: Arc<dyn BlogRepository>, tokens: Arc<TokenService>) -> Self {
        Self { repo, tokens }
    }

    /// Create an account. Only reachable from the admin CLI.
    pub async fn register(&self, username: &str, password: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::BadRequest("Username must not be blank".into()));
        }

        let password_hash = hash_password(password)?;
        let user = self.repo.create_user(username, &password_hash).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "user created");
        Ok(user)
    }

    /// Exchange a username/password pair for an access token.
    ///
    /// Unknown users and wrong passwords are indistinguishable to the caller.
    pub async fn obtain_token(&self, credentials: Credentials) -> Result<String> {
        let (username, password) = credentials.into_parts()?;

        let Some(user) = self.repo.find_user_by_username(&username).await? else {
            tracing::debug!(%username, "token request for unknown user");
            return Err(AppError::Validation(FieldErrors::non_field(
                INVALID_CREDENTIALS,
            )));
        };

        if !verify_password(&password, &user.password_hash)? {
            tracing::warn!(user_id = %user.id, "token request with wrong password");
            return Err(AppError::Validation(FieldErrors::non_field(
                INVALID_CREDENTIALS,
            )));
        }

        self.tokens.issue(&user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryBlogRepository;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(MemoryBlogRepository::new()),
            Arc::new(TokenService::new(&"k".repeat(32), 3600)),
        )
    }

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    #[tokio::test]
    async fn test_round_trip_login() {
        let auth = service();
        let user = auth.register("alice", "correct horse").await.unwrap();

        let token = auth
            .obtain_token(credentials("alice", "correct horse"))
            .await
            .unwrap();
        let claims = auth.tokens.validate(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user.id);
    }

    #[tokio::test]
    async fn test_bad_credentials_are_non_field_errors() {
        let auth = service();
        auth.register("alice", "correct horse").await.unwrap();

        for attempt in [
            credentials("alice", "wrong password"),
            credentials("nobody", "correct horse"),
        ] {
            match auth.obtain_token(attempt).await {
                Err(AppError::Validation(fields)) => {
                    assert_eq!(
                        fields.get("non_field_errors"),
                        Some(&[INVALID_CREDENTIALS.to_string()][..])
                    );
                }
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_missing_fields_are_reported() {
        match service().obtain_token(Credentials::default()).await {
            Err(AppError::Validation(fields)) => {
                assert!(fields.get("username").is_some());
                assert!(fields.get("password").is_some());
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
