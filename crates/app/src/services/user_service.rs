//! User service: registration, lookup and rename.

use locpack_domain::error::{LocpackError, ValidationError};
use locpack_domain::id::PublicId;
use locpack_domain::time::now;
use locpack_domain::user::User;
use locpack_domain::view::UserView;

use crate::ports::UserRepository;
use crate::services::guard::{load_caller, not_found};

/// What happens to a user's public id when they change username.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenamePolicy {
    /// The public id stays as assigned at registration, so shared links
    /// keep resolving.
    #[default]
    KeepPublicId,
    /// The public id is rewritten to the new username.
    FollowUsername,
}

/// Fields a user may change about themselves.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub username: String,
}

/// Application service for user records.
pub struct UserService<U> {
    users: U,
    rename_policy: RenamePolicy,
}

impl<U: UserRepository> UserService<U> {
    /// Create a new service backed by the given repository.
    pub fn new(users: U) -> Self {
        Self {
            users,
            rename_policy: RenamePolicy::default(),
        }
    }

    /// Override the [`RenamePolicy`].
    #[must_use]
    pub fn with_rename_policy(mut self, rename_policy: RenamePolicy) -> Self {
        self.rename_policy = rename_policy;
        self
    }

    /// Create the local record for an identity registered with the external
    /// provider.
    ///
    /// # Errors
    ///
    /// Returns [`LocpackError::InvalidArgument`] when the username is blank or
    /// already taken, or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn register(&self, username: &str) -> Result<UserView, LocpackError> {
        let user = User::register(username)?;
        self.ensure_available(&user.username, &user.public_id, None)
            .await?;
        let created = self.users.create(user).await?;
        tracing::info!(user_id = %created.public_id, "user registered");
        Ok(UserView::from(&created))
    }

    /// Look up a user by public id.
    ///
    /// # Errors
    ///
    /// Returns [`LocpackError::NotFound`] when no user has that public id,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: &PublicId) -> Result<UserView, LocpackError> {
        let user = self
            .users
            .get_by_public_id(id)
            .await?
            .ok_or_else(|| not_found("User", id))?;
        Ok(UserView::from(&user))
    }

    /// Change a user's username, and their public id when the
    /// [`RenamePolicy`] says so.
    ///
    /// # Errors
    ///
    /// Returns [`LocpackError::NotFound`] when no user has that public id,
    /// [`LocpackError::InvalidArgument`] when the new username is blank or
    /// held by someone else, or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn update_by_id(
        &self,
        id: &PublicId,
        update: UserUpdate,
    ) -> Result<UserView, LocpackError> {
        let mut user = load_caller(&self.users, id).await?;
        let normalized = PublicId::from_username(&update.username)?;
        let username = update.username.trim().to_string();

        if username == user.username {
            return Ok(UserView::from(&user));
        }

        let public_id = match self.rename_policy {
            RenamePolicy::KeepPublicId => user.public_id.clone(),
            RenamePolicy::FollowUsername => normalized,
        };
        self.ensure_available(&username, &public_id, Some(&user))
            .await?;

        user.username = username;
        user.public_id = public_id;
        user.updated_at = now();
        let saved = self.users.update(user).await?;
        Ok(UserView::from(&saved))
    }

    async fn ensure_available(
        &self,
        username: &str,
        public_id: &PublicId,
        current: Option<&User>,
    ) -> Result<(), LocpackError> {
        let is_other = |found: &User| current.is_none_or(|me| me.id != found.id);

        let by_name = self.users.find_by_username(username).await?;
        let by_id = self.users.get_by_public_id(public_id).await?;
        if by_name.iter().chain(by_id.iter()).any(is_other) {
            return Err(ValidationError::UsernameTaken(username.to_string()).into());
        }
        Ok(())
    }
}
