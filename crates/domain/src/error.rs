//! Common error types used across the workspace.
//!
//! Every layer returns [`LocpackError`]. Each variant wraps a typed detail
//! error so callers can match on the exact cause, and adapters convert their
//! own failures into [`LocpackError::Storage`].

/// Top-level error returned by every service operation.
#[derive(Debug, thiserror::Error)]
pub enum LocpackError {
    /// The referenced public id has no matching record.
    #[error("not found: {0}")]
    NotFound(#[from] NotFoundError),

    /// A required input is missing or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),

    /// The caller lacks the authorship required for the mutation.
    #[error("forbidden: {0}")]
    Forbidden(#[from] ForbiddenError),

    /// The requested state transition is impossible.
    #[error("invalid operation: {0}")]
    InvalidOperation(#[from] InvalidOperationError),

    /// The underlying store failed.
    #[error("storage error")]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

/// A lookup by public id found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} `{id}` does not exist")]
pub struct NotFoundError {
    /// Kind of record that was looked up (`"User"`, `"Place"`, …).
    pub entity: &'static str,
    /// The public id that failed to resolve.
    pub id: String,
}

/// Input validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("search query must not be empty")]
    EmptyQuery,

    #[error("username must not be empty")]
    EmptyUsername,

    #[error("public id must not be empty")]
    EmptyPublicId,

    #[error("username `{0}` is already taken")]
    UsernameTaken(String),
}

/// Authorization failures on mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForbiddenError {
    /// Only the author may change the record's content.
    #[error("only the author may modify {entity} `{id}`")]
    NotAuthor {
        /// Kind of record the caller tried to modify.
        entity: &'static str,
        /// Public id of that record.
        id: String,
    },
}

/// Semantically impossible state transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidOperationError {
    /// Authorship is fixed at creation and cannot be requested via update.
    #[error("a collection cannot be promoted to authored through an update")]
    PromoteToAuthor,
}
