//! `SQLite` implementation of [`UserRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use locpack_app::ports::UserRepository;
use locpack_domain::error::{LocpackError, ValidationError};
use locpack_domain::id::PublicId;
use locpack_domain::user::User;

use crate::error::{StorageError, is_unique_violation};
use crate::row::{encode_timestamp, fold, parsed, public_id, timestamp};

struct Wrapper(User);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<User> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(User {
            id: parsed(row, "id")?,
            public_id: public_id(row, "public_id")?,
            username: row.try_get("username")?,
            created_at: timestamp(row, "created_at")?,
            updated_at: timestamp(row, "updated_at")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO users (id, public_id, username, username_folded, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?)
";
const SELECT_BY_PUBLIC_ID: &str = r"
    SELECT id, public_id, username, created_at, updated_at
    FROM users WHERE public_id = ? COLLATE NOCASE
";
const SELECT_BY_USERNAME: &str = r"
    SELECT id, public_id, username, created_at, updated_at
    FROM users WHERE username_folded = ?
";
const UPDATE: &str = r"
    UPDATE users SET public_id = ?, username = ?, username_folded = ?, updated_at = ?
    WHERE id = ?
";

/// A unique violation on `users` means another registration won the race
/// for this username or public id.
fn write_error(err: sqlx::Error, user: &User) -> LocpackError {
    if is_unique_violation(&err) {
        ValidationError::UsernameTaken(user.username.clone()).into()
    } else {
        StorageError::from(err).into()
    }
}

/// `SQLite`-backed user repository.
#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl UserRepository for SqliteUserRepository {
    fn create(&self, user: User) -> impl Future<Output = Result<User, LocpackError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(user.id.to_string())
                .bind(user.public_id.as_str())
                .bind(&user.username)
                .bind(fold(&user.username))
                .bind(encode_timestamp(&user.created_at))
                .bind(encode_timestamp(&user.updated_at))
                .execute(&pool)
                .await
                .map_err(|err| write_error(err, &user))?;

            Ok(user)
        }
    }

    fn get_by_public_id(
        &self,
        id: &PublicId,
    ) -> impl Future<Output = Result<Option<User>, LocpackError>> + Send {
        let pool = self.pool.clone();
        let id = id.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_PUBLIC_ID)
                .bind(fold(id.as_str()))
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, LocpackError>> + Send {
        let pool = self.pool.clone();
        let username = fold(username);
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_USERNAME)
                .bind(&username)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn update(&self, user: User) -> impl Future<Output = Result<User, LocpackError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPDATE)
                .bind(user.public_id.as_str())
                .bind(&user.username)
                .bind(fold(&user.username))
                .bind(encode_timestamp(&user.updated_at))
                .bind(user.id.to_string())
                .execute(&pool)
                .await
                .map_err(|err| write_error(err, &user))?;

            Ok(user)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn setup() -> SqliteUserRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteUserRepository::new(db.pool().clone())
    }

    fn id(value: &str) -> PublicId {
        value.parse().unwrap()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_user_ignoring_case() {
        let repo = setup().await;
        let user = User::register("alice").unwrap();
        let user_id = user.id;
        repo.create(user).await.unwrap();

        let fetched = repo.get_by_public_id(&id("ALICE")).await.unwrap().unwrap();
        assert_eq!(fetched.id, user_id);
        assert_eq!(fetched.username, "alice");
    }

    #[tokio::test]
    async fn should_return_none_when_user_not_found() {
        let repo = setup().await;
        assert!(repo.get_by_public_id(&id("ghost")).await.unwrap().is_none());
        assert!(repo.find_by_username("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_report_username_taken_when_insert_hits_unique_constraint() {
        let repo = setup().await;
        repo.create(User::register("Alice").unwrap()).await.unwrap();

        for duplicate in ["Alice", "ALICE"] {
            let result = repo.create(User::register(duplicate).unwrap()).await;
            assert!(matches!(
                result,
                Err(LocpackError::InvalidArgument(ValidationError::UsernameTaken(_)))
            ));
        }
    }

    #[tokio::test]
    async fn should_keep_username_case_and_match_it_ignoring_case() {
        let repo = setup().await;
        repo.create(User::register("Élodie").unwrap()).await.unwrap();

        let fetched = repo.find_by_username("ÉLODIE").await.unwrap().unwrap();
        assert_eq!(fetched.username, "Élodie");
        assert_eq!(fetched.public_id, id("élodie"));

        let by_id = repo.get_by_public_id(&id("ÉLODIE")).await.unwrap().unwrap();
        assert_eq!(by_id.id, fetched.id);

        let result = repo.create(User::register("élodie").unwrap()).await;
        assert!(matches!(
            result,
            Err(LocpackError::InvalidArgument(ValidationError::UsernameTaken(_)))
        ));
    }

    #[tokio::test]
    async fn should_report_username_taken_when_rename_hits_unique_constraint() {
        let repo = setup().await;
        repo.create(User::register("alice").unwrap()).await.unwrap();
        let mut bob = User::register("bob").unwrap();
        repo.create(bob.clone()).await.unwrap();

        bob.username = "Alice".to_string();
        let result = repo.update(bob).await;
        assert!(matches!(
            result,
            Err(LocpackError::InvalidArgument(ValidationError::UsernameTaken(_)))
        ));
    }

    #[tokio::test]
    async fn should_update_username_and_public_id() {
        let repo = setup().await;
        let mut user = User::register("alice").unwrap();
        repo.create(user.clone()).await.unwrap();

        user.username = "Alicia".to_string();
        user.public_id = id("alicia");
        repo.update(user).await.unwrap();

        assert!(repo.get_by_public_id(&id("alice")).await.unwrap().is_none());
        let fetched = repo.find_by_username("alicia").await.unwrap().unwrap();
        assert_eq!(fetched.public_id, id("alicia"));
        assert_eq!(fetched.username, "Alicia");
    }
}
