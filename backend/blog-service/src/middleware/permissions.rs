/// Authorization module for blog-service
///
/// Provides the ownership-based permission check shared by posts and
/// comments. Reads are always allowed; creation needs an authenticated actor;
/// update and delete need the actor to be the entity's author.
use uuid::Uuid;

use super::{Actor, RequestContext};
use crate::error::{AppError, Result};
use crate::metrics::AUTHORIZATION_DENIED_TOTAL;
use crate::models::{Comment, Post};

/// An entity with a single owning author.
pub trait Owned {
    /// Label used in denial messages and metrics.
    const KIND: &'static str;

    fn author_id(&self) -> Uuid;
}

impl Owned for Post {
    const KIND: &'static str = "post";

    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

impl Owned for Comment {
    const KIND: &'static str = "comment";

    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

/// Whether `actor` may perform the operation on `entity`.
///
/// Safe methods are always allowed. Otherwise the actor must be the author;
/// an anonymous actor never is.
pub fn is_write_allowed<E: Owned>(actor: Option<&Actor>, entity: &E, is_safe_method: bool) -> bool {
    if is_safe_method {
        return true;
    }

    actor.is_some_and(|actor| entity.author_id() == actor.id)
}

/// Policy applied by the services before touching the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy {
    /// Require authentication for list/retrieve as well.
    pub require_auth_for_reads: bool,
}

impl AccessPolicy {
    pub fn new(require_auth_for_reads: bool) -> Self {
        Self {
            require_auth_for_reads,
        }
    }

    /// Gate for list/retrieve.
    pub fn check_read(&self, ctx: &RequestContext) -> Result<()> {
        if self.require_auth_for_reads && ctx.actor().is_none() {
            deny_unauthenticated("read");
            return Err(AppError::Unauthorized(
                "Authentication credentials were not provided".into(),
            ));
        }
        Ok(())
    }

    /// Gate for every write: the caller must be authenticated.
    ///
    /// Creation needs nothing more; ownership is assigned, not checked.
    pub fn require_actor<'a>(&self, ctx: &'a RequestContext) -> Result<&'a Actor> {
        ctx.actor().ok_or_else(|| {
            deny_unauthenticated("write");
            AppError::Unauthorized("Authentication credentials were not provided".into())
        })
    }

    /// Object-level check for update/delete (and reads, which always pass).
    pub fn check_object<E: Owned>(&self, ctx: &RequestContext, entity: &E) -> Result<()> {
        if ctx.operation().is_safe() {
            return self.check_read(ctx);
        }

        if is_write_allowed(ctx.actor(), entity, false) {
            return Ok(());
        }

        match ctx.actor() {
            None => {
                deny_unauthenticated(E::KIND);
                Err(AppError::Unauthorized(
                    "Authentication credentials were not provided".into(),
                ))
            }
            Some(actor) => {
                AUTHORIZATION_DENIED_TOTAL
                    .with_label_values(&[E::KIND, "not_owner"])
                    .inc();
                tracing::warn!(
                    actor_id = %actor.id,
                    author_id = %entity.author_id(),
                    kind = E::KIND,
                    "write denied: actor is not the author"
                );
                Err(AppError::Forbidden(format!(
                    "You don't have permission to modify this {}",
                    E::KIND
                )))
            }
        }
    }
}

fn deny_unauthenticated(kind: &str) {
    AUTHORIZATION_DENIED_TOTAL
        .with_label_values(&[kind, "unauthenticated"])
        .inc();
}
