//! `SQLite` implementation of [`CollectionRepository`].
//!
//! Followers and member places are stored in `collection_followers` and
//! `collection_places`. An update rewrites both relation sets inside one
//! transaction. Text search matches the folded name and the author's folded
//! username.

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection, SqlitePool};

use locpack_app::ports::CollectionRepository;
use locpack_domain::collection::Collection;
use locpack_domain::error::LocpackError;
use locpack_domain::id::{CollectionId, PlaceId, PublicId, UserId};
use locpack_domain::place::Place;

use crate::error::{StorageError, is_unique_violation};
use crate::place_repo::member_places;
use crate::row::{UserRefRow, encode_timestamp, fold, parsed, public_id, timestamp, user_ref};

struct Wrapper(Collection);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Collection {
            id: parsed(row, "id")?,
            public_id: public_id(row, "public_id")?,
            name: row.try_get("name")?,
            author: user_ref(row, "author_")?,
            followers: Vec::new(),
            member_ids: Vec::new(),
            created_at: timestamp(row, "created_at")?,
            updated_at: timestamp(row, "updated_at")?,
        }))
    }
}

struct MemberRow(PlaceId);

impl<'r> FromRow<'r, SqliteRow> for MemberRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        parsed(row, "place_id").map(Self)
    }
}

const INSERT: &str = r"
    INSERT INTO collections (id, public_id, name, name_folded, author_id, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";
const UPDATE: &str =
    "UPDATE collections SET name = ?, name_folded = ?, updated_at = ? WHERE id = ?";

const SELECT_BY_PUBLIC_ID: &str = r"
    SELECT c.id, c.public_id, c.name, c.created_at, c.updated_at,
           u.id AS author_id, u.public_id AS author_public_id, u.username AS author_username
    FROM collections c JOIN users u ON u.id = c.author_id
    WHERE c.public_id = ?
";
const SELECT_BY_TEXT: &str = r"
    SELECT c.id, c.public_id, c.name, c.created_at, c.updated_at,
           u.id AS author_id, u.public_id AS author_public_id, u.username AS author_username
    FROM collections c JOIN users u ON u.id = c.author_id
    WHERE instr(c.name_folded, ?) > 0 OR instr(u.username_folded, ?) > 0
    ORDER BY c.created_at, c.rowid
";
const SELECT_FOLLOWED_BY: &str = r"
    SELECT c.id, c.public_id, c.name, c.created_at, c.updated_at,
           u.id AS author_id, u.public_id AS author_public_id, u.username AS author_username
    FROM collection_followers f
    JOIN collections c ON c.id = f.collection_id
    JOIN users u ON u.id = c.author_id
    WHERE f.user_id = ?
    ORDER BY c.created_at, c.rowid
";
const SELECT_CREATED_BY: &str = r"
    SELECT c.id, c.public_id, c.name, c.created_at, c.updated_at,
           u.id AS author_id, u.public_id AS author_public_id, u.username AS author_username
    FROM collections c JOIN users u ON u.id = c.author_id
    WHERE c.author_id = ?
    ORDER BY c.created_at, c.rowid
";

const SELECT_FOLLOWERS: &str = r"
    SELECT u.id, u.public_id, u.username
    FROM collection_followers f JOIN users u ON u.id = f.user_id
    WHERE f.collection_id = ?
    ORDER BY f.rowid
";
const SELECT_MEMBERS: &str =
    "SELECT place_id FROM collection_places WHERE collection_id = ? ORDER BY position";
const DELETE_FOLLOWERS: &str = "DELETE FROM collection_followers WHERE collection_id = ?";
const INSERT_FOLLOWER: &str =
    "INSERT INTO collection_followers (collection_id, user_id) VALUES (?, ?)";
const DELETE_MEMBERS: &str = "DELETE FROM collection_places WHERE collection_id = ?";
const INSERT_MEMBER: &str =
    "INSERT INTO collection_places (collection_id, place_id, position) VALUES (?, ?, ?)";

async fn with_relations(
    pool: &SqlitePool,
    rows: Vec<Wrapper>,
) -> Result<Vec<Collection>, sqlx::Error> {
    let mut collections = Vec::with_capacity(rows.len());
    for Wrapper(mut collection) in rows {
        let followers: Vec<UserRefRow> = sqlx::query_as(SELECT_FOLLOWERS)
            .bind(collection.id.to_string())
            .fetch_all(pool)
            .await?;
        let members: Vec<MemberRow> = sqlx::query_as(SELECT_MEMBERS)
            .bind(collection.id.to_string())
            .fetch_all(pool)
            .await?;
        collection.followers = followers.into_iter().map(|r| r.0).collect();
        collection.member_ids = members.into_iter().map(|r| r.0).collect();
        collections.push(collection);
    }
    Ok(collections)
}

async fn replace_relations(
    conn: &mut SqliteConnection,
    collection: &Collection,
) -> Result<(), sqlx::Error> {
    let id = collection.id.to_string();
    sqlx::query(DELETE_FOLLOWERS)
        .bind(&id)
        .execute(&mut *conn)
        .await?;
    for follower in &collection.followers {
        sqlx::query(INSERT_FOLLOWER)
            .bind(&id)
            .bind(follower.id.to_string())
            .execute(&mut *conn)
            .await?;
    }
    sqlx::query(DELETE_MEMBERS)
        .bind(&id)
        .execute(&mut *conn)
        .await?;
    for (position, place_id) in (0_i64..).zip(&collection.member_ids) {
        sqlx::query(INSERT_MEMBER)
            .bind(&id)
            .bind(place_id.to_string())
            .bind(position)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn insert(pool: &SqlitePool, collection: &Collection) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query(INSERT)
        .bind(collection.id.to_string())
        .bind(collection.public_id.as_str())
        .bind(&collection.name)
        .bind(fold(&collection.name))
        .bind(collection.author.id.to_string())
        .bind(encode_timestamp(&collection.created_at))
        .bind(encode_timestamp(&collection.updated_at))
        .execute(&mut *tx)
        .await?;
    replace_relations(&mut tx, collection).await?;
    tx.commit().await
}

/// `SQLite`-backed collection repository.
#[derive(Clone)]
pub struct SqliteCollectionRepository {
    pool: SqlitePool,
}

impl SqliteCollectionRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, sql: &'static str, key: String) -> Result<Vec<Collection>, LocpackError> {
        let rows: Vec<Wrapper> = sqlx::query_as(sql)
            .bind(key)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(with_relations(&self.pool, rows)
            .await
            .map_err(StorageError::from)?)
    }
}

impl CollectionRepository for SqliteCollectionRepository {
    fn create(
        &self,
        mut collection: Collection,
    ) -> impl Future<Output = Result<Collection, LocpackError>> + Send {
        let pool = self.pool.clone();
        async move {
            let inserted = match insert(&pool, &collection).await {
                Err(err) if is_unique_violation(&err) => {
                    collection.public_id = PublicId::generate();
                    insert(&pool, &collection).await
                }
                other => other,
            };
            inserted.map_err(StorageError::from)?;

            Ok(collection)
        }
    }

    fn get_by_public_id(
        &self,
        id: &PublicId,
    ) -> impl Future<Output = Result<Option<Collection>, LocpackError>> + Send {
        let id = id.to_string();
        async move {
            let found = self.fetch(SELECT_BY_PUBLIC_ID, id).await?;
            Ok(found.into_iter().next())
        }
    }

    fn find_by_text(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Collection>, LocpackError>> + Send {
        let pool = self.pool.clone();
        let query = fold(query);
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_TEXT)
                .bind(&query)
                .bind(&query)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(with_relations(&pool, rows)
                .await
                .map_err(StorageError::from)?)
        }
    }

    fn find_followed_by(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<Vec<Collection>, LocpackError>> + Send {
        self.fetch(SELECT_FOLLOWED_BY, user.to_string())
    }

    fn find_created_by(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<Vec<Collection>, LocpackError>> + Send {
        self.fetch(SELECT_CREATED_BY, user.to_string())
    }

    fn get_member_places(
        &self,
        id: CollectionId,
    ) -> impl Future<Output = Result<Vec<Place>, LocpackError>> + Send {
        let pool = self.pool.clone();
        async move { Ok(member_places(&pool, id).await.map_err(StorageError::from)?) }
    }

    fn update(
        &self,
        collection: Collection,
    ) -> impl Future<Output = Result<Collection, LocpackError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;
            sqlx::query(UPDATE)
                .bind(&collection.name)
                .bind(fold(&collection.name))
                .bind(encode_timestamp(&collection.updated_at))
                .bind(collection.id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            replace_relations(&mut tx, &collection)
                .await
                .map_err(StorageError::from)?;
            tx.commit().await.map_err(StorageError::from)?;

            Ok(collection)
        }
    }
}
