//! Validation and authorization helpers shared by the services.

use locpack_domain::error::{ForbiddenError, LocpackError, NotFoundError, ValidationError};
use locpack_domain::id::PublicId;
use locpack_domain::user::User;

use crate::ports::UserRepository;

/// Build a [`LocpackError::NotFound`] for `entity` with public id `id`.
pub(crate) fn not_found(entity: &'static str, id: &PublicId) -> LocpackError {
    NotFoundError {
        entity,
        id: id.to_string(),
    }
    .into()
}

/// Trim a search query, rejecting blank input.
pub(crate) fn search_query(query: &str) -> Result<&str, ValidationError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyQuery);
    }
    Ok(trimmed)
}

/// Load the calling user or fail with `NotFound`.
pub(crate) async fn load_caller<U: UserRepository>(
    users: &U,
    caller: &PublicId,
) -> Result<User, LocpackError> {
    users
        .get_by_public_id(caller)
        .await?
        .ok_or_else(|| not_found("User", caller))
}

/// Fail with `Forbidden` unless `is_author` holds.
pub(crate) fn require_author(
    is_author: bool,
    entity: &'static str,
    id: &PublicId,
) -> Result<(), ForbiddenError> {
    if is_author {
        Ok(())
    } else {
        Err(ForbiddenError::NotAuthor {
            entity,
            id: id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_trim_query() {
        assert_eq!(search_query("  hik ").unwrap(), "hik");
    }

    #[test]
    fn should_reject_blank_query() {
        assert_eq!(search_query(" \t"), Err(ValidationError::EmptyQuery));
    }

    #[test]
    fn should_forbid_non_author() {
        let id: PublicId = "abcd1234".parse().unwrap();
        assert!(require_author(true, "Place", &id).is_ok());
        assert_eq!(
            require_author(false, "Place", &id),
            Err(ForbiddenError::NotAuthor {
                entity: "Place",
                id: "abcd1234".to_string(),
            })
        );
    }
}
