//! `SQLite` implementation of [`PlaceRepository`].
//!
//! A place row is joined with its author; visitors live in `place_visitors`
//! and are loaded per place. Name and address are also stored folded to
//! lowercase for text search.

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection, SqlitePool};

use locpack_app::ports::PlaceRepository;
use locpack_domain::error::LocpackError;
use locpack_domain::id::{CollectionId, PlaceId, PublicId};
use locpack_domain::place::Place;
use locpack_domain::user::UserRef;

use crate::error::{StorageError, is_unique_violation};
use crate::row::{UserRefRow, encode_timestamp, fold, parsed, public_id, timestamp, user_ref};

struct Wrapper(Place);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(Place {
            id: parsed(row, "id")?,
            public_id: public_id(row, "public_id")?,
            name: row.try_get("name")?,
            address: row.try_get("address")?,
            author: user_ref(row, "author_")?,
            visitors: Vec::new(),
            created_at: timestamp(row, "created_at")?,
            updated_at: timestamp(row, "updated_at")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO places
        (id, public_id, name, address, name_folded, address_folded, author_id, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
";
const UPDATE: &str = r"
    UPDATE places SET name = ?, address = ?, name_folded = ?, address_folded = ?, updated_at = ?
    WHERE id = ?
";

const SELECT_BY_PUBLIC_ID: &str = r"
    SELECT p.id, p.public_id, p.name, p.address, p.created_at, p.updated_at,
           u.id AS author_id, u.public_id AS author_public_id, u.username AS author_username
    FROM places p JOIN users u ON u.id = p.author_id
    WHERE p.public_id = ?
";
const SELECT_BY_TEXT: &str = r"
    SELECT p.id, p.public_id, p.name, p.address, p.created_at, p.updated_at,
           u.id AS author_id, u.public_id AS author_public_id, u.username AS author_username
    FROM places p JOIN users u ON u.id = p.author_id
    WHERE instr(p.name_folded, ?) > 0 OR instr(p.address_folded, ?) > 0
    ORDER BY p.created_at, p.rowid
";
const SELECT_BY_COLLECTION: &str = r"
    SELECT p.id, p.public_id, p.name, p.address, p.created_at, p.updated_at,
           u.id AS author_id, u.public_id AS author_public_id, u.username AS author_username
    FROM collection_places cp
    JOIN places p ON p.id = cp.place_id
    JOIN users u ON u.id = p.author_id
    WHERE cp.collection_id = ?
    ORDER BY cp.position
";

const SELECT_VISITORS: &str = r"
    SELECT u.id, u.public_id, u.username
    FROM place_visitors v JOIN users u ON u.id = v.user_id
    WHERE v.place_id = ?
    ORDER BY v.rowid
";
const DELETE_VISITORS: &str = "DELETE FROM place_visitors WHERE place_id = ?";
const INSERT_VISITOR: &str = "INSERT INTO place_visitors (place_id, user_id) VALUES (?, ?)";

async fn load_visitors(pool: &SqlitePool, id: PlaceId) -> Result<Vec<UserRef>, sqlx::Error> {
    let rows: Vec<UserRefRow> = sqlx::query_as(SELECT_VISITORS)
        .bind(id.to_string())
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|r| r.0).collect())
}

async fn with_visitors(pool: &SqlitePool, rows: Vec<Wrapper>) -> Result<Vec<Place>, sqlx::Error> {
    let mut places = Vec::with_capacity(rows.len());
    for Wrapper(mut place) in rows {
        place.visitors = load_visitors(pool, place.id).await?;
        places.push(place);
    }
    Ok(places)
}

async fn replace_visitors(
    conn: &mut SqliteConnection,
    id: PlaceId,
    visitors: &[UserRef],
) -> Result<(), sqlx::Error> {
    sqlx::query(DELETE_VISITORS)
        .bind(id.to_string())
        .execute(&mut *conn)
        .await?;
    for visitor in visitors {
        sqlx::query(INSERT_VISITOR)
            .bind(id.to_string())
            .bind(visitor.id.to_string())
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn insert(pool: &SqlitePool, place: &Place) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query(INSERT)
        .bind(place.id.to_string())
        .bind(place.public_id.as_str())
        .bind(&place.name)
        .bind(&place.address)
        .bind(fold(&place.name))
        .bind(fold(&place.address))
        .bind(place.author.id.to_string())
        .bind(encode_timestamp(&place.created_at))
        .bind(encode_timestamp(&place.updated_at))
        .execute(&mut *tx)
        .await?;
    replace_visitors(&mut tx, place.id, &place.visitors).await?;
    tx.commit().await
}

/// Member places of a collection in stored order, visitors included.
pub(crate) async fn member_places(
    pool: &SqlitePool,
    id: CollectionId,
) -> Result<Vec<Place>, sqlx::Error> {
    let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_COLLECTION)
        .bind(id.to_string())
        .fetch_all(pool)
        .await?;
    with_visitors(pool, rows).await
}

/// `SQLite`-backed place repository.
#[derive(Clone)]
pub struct SqlitePlaceRepository {
    pool: SqlitePool,
}

impl SqlitePlaceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl PlaceRepository for SqlitePlaceRepository {
    fn create(
        &self,
        mut place: Place,
    ) -> impl Future<Output = Result<Place, LocpackError>> + Send {
        let pool = self.pool.clone();
        async move {
            // Generated public ids are short; draw a fresh one once on collision.
            let inserted = match insert(&pool, &place).await {
                Err(err) if is_unique_violation(&err) => {
                    place.public_id = PublicId::generate();
                    insert(&pool, &place).await
                }
                other => other,
            };
            inserted.map_err(StorageError::from)?;

            Ok(place)
        }
    }

    fn get_by_public_id(
        &self,
        id: &PublicId,
    ) -> impl Future<Output = Result<Option<Place>, LocpackError>> + Send {
        let pool = self.pool.clone();
        let id = id.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_PUBLIC_ID)
                .bind(id.as_str())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            let places = with_visitors(&pool, row.into_iter().collect())
                .await
                .map_err(StorageError::from)?;
            Ok(places.into_iter().next())
        }
    }

    fn find_by_text(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Place>, LocpackError>> + Send {
        let pool = self.pool.clone();
        let query = fold(query);
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_TEXT)
                .bind(&query)
                .bind(&query)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(with_visitors(&pool, rows)
                .await
                .map_err(StorageError::from)?)
        }
    }

    fn update(&self, place: Place) -> impl Future<Output = Result<Place, LocpackError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;
            sqlx::query(UPDATE)
                .bind(&place.name)
                .bind(&place.address)
                .bind(fold(&place.name))
                .bind(fold(&place.address))
                .bind(encode_timestamp(&place.updated_at))
                .bind(place.id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            replace_visitors(&mut tx, place.id, &place.visitors)
                .await
                .map_err(StorageError::from)?;
            tx.commit().await.map_err(StorageError::from)?;

            Ok(place)
        }
    }
}
